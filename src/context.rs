use crate::{database::DocumentStore, identity::IdentityVerifier, payments::PaymentGateway};
use std::sync::Arc;

/// Everything a request needs, built once in `main` and shared by all
/// workers. Tests swap in doubles for the store, verifier and gateway.
pub struct AppContext {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub payments: Arc<dyn PaymentGateway>,
    pub frontend_url: String,
}
