pub mod stripe;

use crate::{
    models::{PaymentIntent, PaymentIntentRequest},
    utils::AppError,
};
use async_trait::async_trait;

pub use stripe::StripeGateway;

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, AppError>;
}
