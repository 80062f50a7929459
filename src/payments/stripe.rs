use super::PaymentGateway;
use crate::{
    models::{PaymentIntent, PaymentIntentRequest},
    utils::AppError,
};
use async_trait::async_trait;
use serde::Deserialize;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Creates payment intents through Stripe's REST API. Nothing is persisted
/// here; the frontend confirms the payment with the returned client secret.
pub struct StripeGateway {
    secret_key: String,
    api_base: String,
    http: reqwest::Client,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: STRIPE_API_BASE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    #[cfg(test)]
    pub fn with_api_base(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::new(secret_key)
        }
    }
}

/// Stripe wants form encoding, with list entries as `key[]`.
pub fn form_fields(request: &PaymentIntentRequest) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("amount", request.amount.to_string()),
        ("currency", request.currency.clone()),
    ];
    fields.extend(
        request
            .payment_method_types
            .iter()
            .map(|method| ("payment_method_types[]", method.clone())),
    );
    fields
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, AppError> {
        log::info!(
            "💳 Creating payment intent: {} {}",
            request.amount,
            request.currency
        );

        let response = self
            .http
            .post(format!("{}/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form_fields(request))
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| AppError::PaymentError(format!("Failed to reach Stripe: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::PaymentError(detail));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .map_err(|e| AppError::PaymentError(format!("Failed to parse Stripe response: {}", e)))?;

        log::info!("✅ Payment intent created: {}", intent.id);
        Ok(intent)
    }
}
