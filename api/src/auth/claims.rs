use db::models::user::Role;
use serde::{Deserialize, Serialize};

/// Verified JWT payload. Token issuance lives in the identity service;
/// this API only verifies and trusts these fields.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

/// The authenticated caller, inserted into request extensions by the auth
/// guards and extractable directly in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
