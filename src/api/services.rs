use crate::{
    context::AppContext,
    database::{documents_to_json, json_to_document, parse_object_id},
    models::{Collection, DeleteOutcome, InsertOutcome, UpdateOutcome},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

#[utoipa::path(
    get,
    path = "/services",
    tag = "Services",
    responses(
        (status = 200, description = "All services", body = [Object]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_services(ctx: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /services");

    let services = ctx.store.find(Collection::Services, doc! {}).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(services)))
}

#[utoipa::path(
    post,
    path = "/services",
    tag = "Services",
    request_body = Object,
    responses(
        (status = 200, description = "Insert result", body = InsertOutcome),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_service(
    ctx: web::Data<AppContext>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /services");

    let service = json_to_document(body.into_inner())?;
    let result = ctx.store.insert_one(Collection::Services, service).await?;

    log::info!("✅ Service created: {}", result.inserted_id);
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    patch,
    path = "/services/{id}",
    tag = "Services",
    params(
        ("id" = String, Path, description = "Document ObjectId as hex")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Update result", body = UpdateOutcome),
        (status = 400, description = "Malformed id or body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_service(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /services/{}", id);

    let object_id = parse_object_id(&id)?;
    let changes = json_to_document(body.into_inner())?;
    let result = ctx
        .store
        .update_one(Collection::Services, doc! { "_id": object_id }, changes, false)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// DELETE /services/{id} - an unknown id reports `deletedCount: 0`
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "Services",
    params(
        ("id" = String, Path, description = "Document ObjectId as hex")
    ),
    responses(
        (status = 200, description = "Delete result", body = DeleteOutcome),
        (status = 400, description = "Malformed id or body"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_service(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /services/{}", id);

    let object_id = parse_object_id(&id)?;
    let result = ctx
        .store
        .delete_one(Collection::Services, doc! { "_id": object_id })
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
