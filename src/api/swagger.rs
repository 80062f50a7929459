use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parlour Service API",
        version = "1.0.0",
        description = "Backend for the parlour booking site. \n\n**Authentication:** send a Firebase ID token as `Authorization: Bearer <token>`. Service and booking management additionally requires the admin role."
    ),
    paths(
        crate::api::frontend::redirect_to_frontend,
        crate::api::health::health_check,
        crate::api::admin::check_admin,
        crate::api::users::upsert_user,
        crate::api::reviews::list_reviews,
        crate::api::reviews::get_review,
        crate::api::reviews::create_review,
        crate::api::reviews::update_review,
        crate::api::services::list_services,
        crate::api::services::create_service,
        crate::api::services::update_service,
        crate::api::services::delete_service,
        crate::api::bookings::list_bookings,
        crate::api::bookings::list_user_bookings,
        crate::api::bookings::update_booking,
        crate::api::bookings::record_booking,
        crate::api::payments::create_payment_intent,
    ),
    components(
        schemas(
            crate::api::health::HealthReport,
            crate::models::AdminStatus,
            crate::models::CreatePaymentIntentRequest,
            crate::models::CreatePaymentIntentResponse,
            crate::models::InsertOutcome,
            crate::models::UpdateOutcome,
            crate::models::DeleteOutcome,
        )
    ),
    tags(
        (name = "Health", description = "Liveness check and frontend redirect."),
        (name = "Users", description = "Profiles and the admin self-check."),
        (name = "Reviews", description = "Customer reviews."),
        (name = "Services", description = "Service catalogue; writes are admin only."),
        (name = "Bookings", description = "Bookings recorded after payment."),
        (name = "Payments", description = "Stripe payment intents."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Firebase ID token"))
                        .build()
                ),
            );
        }
    }
}
