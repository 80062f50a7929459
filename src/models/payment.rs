use serde::{Deserialize, Serialize};

pub const PAYMENT_CURRENCY: &str = "usd";
pub const PAYMENT_METHOD_CARD: &str = "card";

/// Body of `POST /create-payment-intent`. Price is in whole currency units.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePaymentIntentRequest {
    pub price: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// What gets sent to the processor
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntentRequest {
    /// Minor units (cents)
    pub amount: i64,
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

impl PaymentIntentRequest {
    pub fn from_price(price: f64) -> Self {
        Self {
            // 19.99 * 100 is 1998.999..., round back to whole cents
            amount: (price * 100.0).round() as i64,
            currency: PAYMENT_CURRENCY.to_string(),
            payment_method_types: vec![PAYMENT_METHOD_CARD.to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}
