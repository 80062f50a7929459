use crate::utils::AppError;
use serde::Deserialize;
use std::env;

const DEFAULT_FRONTEND_URL: &str = "https://gs-jerins-parlour-frontend.vercel.app/";
const DEFAULT_DB_NAME: &str = "JerinsParlourDB";

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub firebase_project_id: String,
    pub stripe_secret_key: String,
    pub frontend_url: String,
}

/// Service-account blob from `FB_CREDENTIALS`. Only the project id is needed
/// to verify ID tokens.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseCredentials {
    project_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::ConfigError(format!("{} must be set", key)))
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::ConfigError(format!("PORT is not a valid port: {}", raw)))?,
            None => 5000,
        };

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => atlas_uri(
                &required("DB_USERNAME")?,
                &required("DB_PASSWORD")?,
                &required("DB_CLUSTER")?,
            ),
        };
        let database_name = lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        let firebase_project_id = match lookup("FIREBASE_PROJECT_ID") {
            Some(id) => id,
            None => {
                let raw = required("FB_CREDENTIALS")?;
                let creds: FirebaseCredentials = serde_json::from_str(&raw).map_err(|e| {
                    AppError::ConfigError(format!("FB_CREDENTIALS is not valid JSON: {}", e))
                })?;
                creds.project_id
            }
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            firebase_project_id,
            stripe_secret_key: required("STRIPE_SECRET_KEY")?,
            frontend_url: lookup("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn atlas_uri(username: &str, password: &str, cluster: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}.mongodb.net/?retryWrites=true&w=majority",
        urlencoding::encode(username),
        urlencoding::encode(password),
        cluster
    )
}
