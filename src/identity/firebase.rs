use super::IdentityVerifier;
use crate::utils::AppError;
use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const GOOGLE_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";
const DEFAULT_KEYS_TTL: Duration = Duration::from_secs(3600);
const CLOCK_SKEW_SECS: i64 = 60;

// Firebase ID token claims
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    iat: Option<i64>,
}

struct SigningKeys {
    keys: HashMap<String, DecodingKey>,
    expires_at: Instant,
}

/// Verifies Firebase ID tokens against Google's published signing keys.
pub struct FirebaseVerifier {
    project_id: String,
    jwks_url: String,
    http: reqwest::Client,
    keys: RwLock<Option<SigningKeys>>,
}

impl FirebaseVerifier {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            http: reqwest::Client::new(),
            keys: RwLock::new(None),
        }
    }

    /// Fetches keys from `jwks_url` instead of Google, starting with an empty cache.
    #[cfg(test)]
    pub fn with_jwks_url(project_id: impl Into<String>, jwks_url: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            ..Self::new(project_id)
        }
    }

    /// Starts from a fixed key set that stays fresh for an hour.
    #[cfg(test)]
    pub fn with_keys(project_id: impl Into<String>, keys: HashMap<String, DecodingKey>) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: GOOGLE_JWKS_URL.to_string(),
            http: reqwest::Client::new(),
            keys: RwLock::new(Some(SigningKeys {
                keys,
                expires_at: Instant::now() + DEFAULT_KEYS_TTL,
            })),
        }
    }

    fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[self.issuer()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);
        validation.leeway = CLOCK_SKEW_SECS as u64;
        validation
    }

    async fn signing_key(&self, kid: &str) -> Result<DecodingKey, AppError> {
        {
            let cache = self.keys.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.expires_at > Instant::now()) {
                // Fresh cache and unknown kid: reject, no refetch
                return cached.keys.get(kid).cloned().ok_or(AppError::Unauthorized);
            }
        }

        let fresh = self.fetch_keys().await?;
        let key = fresh.keys.get(kid).cloned();
        *self.keys.write().await = Some(fresh);

        key.ok_or(AppError::Unauthorized)
    }

    async fn fetch_keys(&self) -> Result<SigningKeys, AppError> {
        log::info!("🔑 Fetching Firebase signing keys");

        let response = self
            .http
            .get(&self.jwks_url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ Failed to fetch signing keys: {}", e);
                AppError::Unauthorized
            })?;

        if !response.status().is_success() {
            log::error!("❌ Signing key endpoint returned {}", response.status());
            return Err(AppError::Unauthorized);
        }

        let ttl = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(max_age)
            .unwrap_or(DEFAULT_KEYS_TTL);

        let jwks: JwkSet = response.json().await.map_err(|e| {
            log::error!("❌ Failed to parse signing keys: {}", e);
            AppError::Unauthorized
        })?;

        let keys: HashMap<String, DecodingKey> = jwks
            .keys
            .iter()
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                DecodingKey::from_jwk(jwk).ok().map(|key| (kid, key))
            })
            .collect();

        log::info!("✅ Loaded {} signing keys (valid for {}s)", keys.len(), ttl.as_secs());

        Ok(SigningKeys {
            keys,
            expires_at: Instant::now() + ttl,
        })
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<String, AppError> {
        let header = decode_header(token).map_err(|_| AppError::Unauthorized)?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthorized);
        }
        let kid = header.kid.ok_or(AppError::Unauthorized)?;
        let key = self.signing_key(&kid).await?;

        let claims = decode::<FirebaseClaims>(token, &key, &self.validation())
            .map_err(|e| {
                log::warn!("⚠️ Rejected ID token: {}", e);
                AppError::Unauthorized
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(AppError::Unauthorized);
        }
        if let Some(iat) = claims.iat {
            if iat > chrono::Utc::now().timestamp() + CLOCK_SKEW_SECS {
                return Err(AppError::Unauthorized);
            }
        }

        Ok(claims.sub)
    }
}

/// `max-age` from a Cache-Control header value
fn max_age(cache_control: &str) -> Option<Duration> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROJECT: &str = "parlour-test";
    const KID: &str = "test-key";
    const PRIVATE_PEM: &str = include_str!("testdata/signing_key.pem");
    const PUBLIC_PEM: &str = include_str!("testdata/signing_key.pub.pem");
    const JWKS: &str = include_str!("testdata/jwks.json");

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        aud: String,
        iss: String,
        iat: i64,
        exp: i64,
    }

    fn verifier() -> FirebaseVerifier {
        let mut keys = HashMap::new();
        keys.insert(
            KID.to_string(),
            DecodingKey::from_rsa_pem(PUBLIC_PEM.as_bytes()).unwrap(),
        );
        FirebaseVerifier::with_keys(PROJECT, keys)
    }

    fn claims(sub: &str) -> TestClaims {
        let now = chrono::Utc::now().timestamp();
        TestClaims {
            sub: sub.to_string(),
            aud: PROJECT.to_string(),
            iss: format!("https://securetoken.google.com/{}", PROJECT),
            iat: now - 10,
            exp: now + 3600,
        }
    }

    fn sign(claims: &TestClaims, kid: &str) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(kid.to_string());
        encode(
            &header,
            claims,
            &EncodingKey::from_rsa_pem(PRIVATE_PEM.as_bytes()).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_yields_subject() {
        let token = sign(&claims("uid-123"), KID);
        assert_eq!(verifier().verify(&token).await.unwrap(), "uid-123");
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let mut expired = claims("uid-123");
        expired.iat -= 7200;
        expired.exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign(&expired, KID);
        assert!(matches!(verifier().verify(&token).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_wrong_audience_rejected() {
        let mut other = claims("uid-123");
        other.aud = "someone-elses-project".to_string();
        let token = sign(&other, KID);
        assert!(matches!(verifier().verify(&token).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_wrong_issuer_rejected() {
        let mut other = claims("uid-123");
        other.iss = "https://accounts.example.com".to_string();
        let token = sign(&other, KID);
        assert!(matches!(verifier().verify(&token).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let genuine = sign(&claims("uid-123"), KID);
        let forged = sign(&claims("uid-admin"), KID);
        let genuine: Vec<&str> = genuine.split('.').collect();
        let forged: Vec<&str> = forged.split('.').collect();
        let tampered = format!("{}.{}.{}", genuine[0], forged[1], genuine[2]);
        assert!(matches!(verifier().verify(&tampered).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unknown_kid_rejected_without_refetch() {
        let token = sign(&claims("uid-123"), "rotated-away");
        assert!(matches!(verifier().verify(&token).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        assert!(matches!(verifier().verify("not-a-jwt").await, Err(AppError::Unauthorized)));
        assert!(matches!(verifier().verify("").await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_issued_in_future_rejected() {
        let mut future = claims("uid-123");
        future.iat = chrono::Utc::now().timestamp() + 3600;
        let token = sign(&future, KID);
        assert!(matches!(verifier().verify(&token).await, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_max_age_parsing() {
        assert_eq!(
            max_age("public, max-age=19204, must-revalidate, no-transform"),
            Some(Duration::from_secs(19204))
        );
        assert_eq!(max_age("no-cache"), None);
    }

    fn jwks_response(cache_control: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("cache-control", cache_control)
            .set_body_raw(JWKS, "application/json")
    }

    #[tokio::test]
    async fn test_keys_fetched_once_while_fresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(jwks_response("public, max-age=3600"))
            .expect(1)
            .mount(&server)
            .await;

        let verifier = FirebaseVerifier::with_jwks_url(PROJECT, format!("{}/jwks", server.uri()));
        let token = sign(&claims("uid-123"), KID);
        assert_eq!(verifier.verify(&token).await.unwrap(), "uid-123");
        assert_eq!(verifier.verify(&token).await.unwrap(), "uid-123");

        // Fresh cache: an unknown kid does not trigger another fetch
        let rotated = sign(&claims("uid-123"), "rotated-away");
        assert!(matches!(verifier.verify(&rotated).await, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_keys_refetched_after_max_age() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(jwks_response("public, max-age=0"))
            .expect(2)
            .mount(&server)
            .await;

        let verifier = FirebaseVerifier::with_jwks_url(PROJECT, format!("{}/jwks", server.uri()));
        let token = sign(&claims("uid-123"), KID);
        assert_eq!(verifier.verify(&token).await.unwrap(), "uid-123");
        assert_eq!(verifier.verify(&token).await.unwrap(), "uid-123");
    }

    #[tokio::test]
    async fn test_key_endpoint_failure_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let verifier = FirebaseVerifier::with_jwks_url(PROJECT, format!("{}/jwks", server.uri()));
        let token = sign(&claims("uid-123"), KID);
        assert!(matches!(verifier.verify(&token).await, Err(AppError::Unauthorized)));
    }
}
