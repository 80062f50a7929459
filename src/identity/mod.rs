pub mod firebase;

use crate::utils::AppError;
use async_trait::async_trait;

pub use firebase::FirebaseVerifier;

/// Turns a bearer token into the identity provider's subject identifier.
/// Every failure is `AppError::Unauthorized` and has no side effects.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<String, AppError>;
}
