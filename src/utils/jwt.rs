use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::auth::AuthConfig;
use crate::utils::errors::AppError;

/// Claims carried by a session token issued by the auth provider.
///
/// The token only proves who the caller is. The role claim is not trusted
/// from the token; the role gate resolves the current role through the
/// provider on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Provider-issued user id.
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

pub fn verify_session_token(token: &str, config: &AuthConfig) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Authentication required"))
}
