//! Doubles for the external collaborators, shared by the unit tests.

use crate::{
    context::AppContext,
    database::memory::InMemoryStore,
    identity::IdentityVerifier,
    models::{PaymentIntent, PaymentIntentRequest},
    payments::PaymentGateway,
    utils::AppError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const USER_TOKEN: &str = "token-user";
pub const ADMIN_TOKEN: &str = "token-admin";
pub const OTHER_TOKEN: &str = "token-other";
pub const FRONTEND_URL: &str = "https://frontend.test/";

/// Accepts a fixed set of tokens
pub struct StaticVerifier {
    tokens: HashMap<String, String>,
}

impl StaticVerifier {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            tokens: pairs
                .iter()
                .map(|(token, uid)| (token.to_string(), uid.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<String, AppError> {
        self.tokens.get(token).cloned().ok_or(AppError::Unauthorized)
    }
}

/// Remembers every intent request and hands back a canned secret
#[derive(Default)]
pub struct RecordingGateway {
    requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl RecordingGateway {
    pub fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, AppError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request.clone());
        Ok(PaymentIntent {
            id: format!("pi_{}", requests.len()),
            client_secret: format!("pi_{}_secret_test", requests.len()),
        })
    }
}

pub fn test_context() -> (AppContext, Arc<InMemoryStore>) {
    let (ctx, store, _) = test_context_with_gateway();
    (ctx, store)
}

pub fn test_context_with_gateway() -> (AppContext, Arc<InMemoryStore>, Arc<RecordingGateway>) {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(RecordingGateway::default());
    let verifier = StaticVerifier::new(&[
        (USER_TOKEN, "user-uid"),
        (ADMIN_TOKEN, "admin-uid"),
        (OTHER_TOKEN, "other-uid"),
    ]);

    let ctx = AppContext {
        store: store.clone(),
        verifier: Arc::new(verifier),
        payments: gateway.clone(),
        frontend_url: FRONTEND_URL.to_string(),
    };
    (ctx, store, gateway)
}
