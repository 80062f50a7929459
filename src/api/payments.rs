use crate::{
    context::AppContext,
    models::{CreatePaymentIntentRequest, CreatePaymentIntentResponse, PaymentIntentRequest},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for the new payment intent", body = CreatePaymentIntentResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Payment processor error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_payment_intent(
    ctx: web::Data<AppContext>,
    body: web::Json<CreatePaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("💳 POST /create-payment-intent - price: {}", body.price);

    let request = PaymentIntentRequest::from_price(body.price);
    let intent = ctx.payments.create_payment_intent(&request).await?;

    Ok(HttpResponse::Ok().json(CreatePaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}
