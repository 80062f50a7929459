use crate::{
    context::AppContext,
    database::json_to_document,
    models::{Collection, UpdateOutcome},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

/// POST /users - create or refresh a profile, keyed on `uid`.
/// Fields in the payload overwrite stored ones; others are left alone.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = Object,
    responses(
        (status = 200, description = "Upsert result", body = UpdateOutcome),
        (status = 400, description = "Body is not an object or has no uid"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upsert_user(
    ctx: web::Data<AppContext>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let profile = json_to_document(body.into_inner())?;
    let uid = profile
        .get("uid")
        .cloned()
        .ok_or_else(|| AppError::InvalidRequest("uid is required".to_string()))?;

    log::info!("👤 POST /users - uid: {}", uid);

    let result = ctx
        .store
        .update_one(Collection::Users, doc! { "uid": uid }, profile, true)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
