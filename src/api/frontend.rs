use crate::context::AppContext;
use actix_web::{http::header, web, HttpResponse};

/// GET / - the API has no landing page, send browsers to the frontend
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 302, description = "Redirect to the frontend")
    )
)]
pub async fn redirect_to_frontend(ctx: web::Data<AppContext>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, ctx.frontend_url.as_str()))
        .finish()
}
