use crate::{
    context::AppContext,
    models::{is_admin, AdminStatus, AuthUser, Collection},
    utils::AppError,
};
use actix_web::{web, HttpResponse};
use mongodb::bson::doc;

/// GET /admin/{uid} - lets a signed-in user ask whether they are an admin.
/// Asking about anyone else is forbidden, whatever either role is.
#[utoipa::path(
    get,
    path = "/admin/{uid}",
    tag = "Users",
    params(
        ("uid" = String, Path, description = "Subject identifier of the caller")
    ),
    responses(
        (status = 200, description = "Admin flag for the caller", body = AdminStatus),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "uid does not belong to the caller")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_admin(
    user: web::ReqData<AuthUser>,
    ctx: web::Data<AppContext>,
    uid: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let uid = uid.into_inner();
    log::info!("🛡️  GET /admin/{}", uid);

    if user.uid != uid {
        log::warn!("⛔ {} asked for admin status of {}", user.uid, uid);
        return Err(AppError::Forbidden);
    }

    let record = ctx.store.find_one(Collection::Users, doc! { "uid": &uid }).await?;

    Ok(HttpResponse::Ok().json(AdminStatus {
        is_admin: is_admin(record.as_ref()),
    }))
}
