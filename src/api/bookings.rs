use crate::{
    context::AppContext,
    database::{documents_to_json, json_to_document, parse_object_id},
    models::{Collection, InsertOutcome, UpdateOutcome},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

/// GET /bookings - admin view of every booking
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    responses(
        (status = 200, description = "All bookings", body = [Object]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an admin")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_bookings(ctx: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /bookings");

    let bookings = ctx.store.find(Collection::Bookings, doc! {}).await?;
    Ok(HttpResponse::Ok().json(documents_to_json(bookings)))
}

#[utoipa::path(
    get,
    path = "/bookings/{uid}",
    tag = "Bookings",
    params(
        ("uid" = String, Path, description = "Subject identifier")
    ),
    responses(
        (status = 200, description = "Bookings owned by uid", body = [Object]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_user_bookings(
    ctx: web::Data<AppContext>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let uid = uid.into_inner();
    log::info!("📋 GET /bookings/{}", uid);

    let bookings = ctx
        .store
        .find(Collection::Bookings, doc! { "uid": &uid })
        .await?;
    Ok(HttpResponse::Ok().json(documents_to_json(bookings)))
}

/// POST /payments - records a booking after the client reports a successful
/// payment. The payment itself is not checked with the processor.
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Bookings",
    request_body = Object,
    responses(
        (status = 200, description = "Insert result", body = InsertOutcome),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn record_booking(
    ctx: web::Data<AppContext>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("🧾 POST /payments");

    let booking = json_to_document(body.into_inner())?;
    let result = ctx.store.insert_one(Collection::Bookings, booking).await?;

    log::info!("✅ Booking recorded: {}", result.inserted_id);
    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "Bookings",
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
pub async fn update_booking(
    ctx: web::Data<AppContext>,
    id: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PATCH /bookings/{}", id);

    let object_id = parse_object_id(&id)?;
    let changes = json_to_document(body.into_inner())?;
    let result = ctx
        .store
        .update_one(Collection::Bookings, doc! { "_id": object_id }, changes, false)
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
