use crate::{
    context::AppContext,
    database::{document_to_json, documents_to_json, json_to_document},
    models::{Collection, InsertOutcome, UpdateOutcome},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

/// GET /reviews - public, every review
#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "All reviews, possibly empty", body = [Object])
    )
)]
pub async fn list_reviews(ctx: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /reviews");

    let reviews = ctx.store.find(Collection::Reviews, doc! {}).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(reviews)))
}

/// GET /reviews/{uid} - first review written by `uid`, or null
#[utoipa::path(
    get,
    path = "/reviews/{uid}",
    tag = "Reviews",
    params(
        ("uid" = String, Path, description = "Subject identifier")
    ),
    responses(
        (status = 200, description = "First review by uid, or null", body = Object),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_review(
    ctx: web::Data<AppContext>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let uid = uid.into_inner();
    log::info!("🔍 GET /reviews/{}", uid);

    let review = ctx
        .store
        .find_one(Collection::Reviews, doc! { "uid": &uid })
        .await?;

    Ok(HttpResponse::Ok().json(review.map(document_to_json)))
}

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "Reviews",
    request_body = Object,
    responses(
        (status = 200, description = "Insert result", body = InsertOutcome),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_review(
    ctx: web::Data<AppContext>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /reviews");

    let review = json_to_document(body.into_inner())?;
    let result = ctx.store.insert_one(Collection::Reviews, review).await?;

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    patch,
    path = "/reviews/{uid}",
    tag = "Reviews",
    params(
        ("uid" = String, Path, description = "Subject identifier")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcome),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_review(
    ctx: web::Data<AppContext>,
    uid: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let uid = uid.into_inner();
    log::info!("🔧 PATCH /reviews/{}", uid);

    let changes = json_to_document(body.into_inner())?;
    let result = ctx
        .store
        .update_one(Collection::Reviews, doc! { "uid": &uid }, changes, false)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
