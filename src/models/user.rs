use mongodb::bson::Document;
use serde::Serialize;

pub const ADMIN_ROLE: &str = "admin";

/// Principal attached to the request once the bearer token is verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
}

/// A missing user record is never an admin.
pub fn is_admin(user: Option<&Document>) -> bool {
    user.and_then(|u| u.get_str("role").ok()) == Some(ADMIN_ROLE)
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatus {
    pub is_admin: bool,
}
