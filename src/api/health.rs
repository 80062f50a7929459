use crate::context::AppContext;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthReport {
    /// `healthy` or `degraded`
    pub status: String,
    /// `ok` or `unavailable`
    pub database: String,
    pub version: String,
    pub timestamp: i64,
}

/// GET /health - liveness plus a store round-trip; 503 when the store
/// does not answer.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable", body = HealthReport),
        (status = 503, description = "Store unreachable", body = HealthReport)
    )
)]
pub async fn health_check(ctx: web::Data<AppContext>) -> HttpResponse {
    let database_ok = match ctx.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("🩺 Health check: store unavailable: {}", e);
            false
        }
    };

    let report = HealthReport {
        status: if database_ok { "healthy" } else { "degraded" }.to_string(),
        database: if database_ok { "ok" } else { "unavailable" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    if database_ok {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
