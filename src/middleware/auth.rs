use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::integrations::auth_provider::ProviderUser;
use crate::modules::users::model::{Role, UnknownRole};
use crate::utils::errors::AppError;

/// The authenticated subject of a request.
///
/// Built by the role gate from the provider's user record and attached to
/// the request extensions; handlers read it through [`CurrentIdentity`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn from_provider(user: ProviderUser) -> Result<Self, UnknownRole> {
        let role = Role::from_claim(user.role.as_deref())?;
        Ok(Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image_url: user.image_url,
            role,
        })
    }
}

/// Pull the bearer token out of the `Authorization` header, if any.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Extractor for the identity a role gate resolved earlier in the chain.
///
/// Rejects with 401 when no gate ran on the route; the gate itself is the
/// only writer of the extension.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_strips_the_scheme() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn bearer_token_handles_missing_header() {
        let parts = parts_with_auth(None);
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn identity_rejects_unknown_provider_roles() {
        let user = ProviderUser {
            id: "user_1".to_string(),
            name: "Test".to_string(),
            email: None,
            image_url: None,
            role: Some("owner".to_string()),
        };
        assert!(Identity::from_provider(user).is_err());
    }

    #[test]
    fn identity_defaults_to_ordinary_user_without_a_claim() {
        let user = ProviderUser {
            id: "user_1".to_string(),
            name: "Test".to_string(),
            email: None,
            image_url: None,
            role: None,
        };
        let identity = Identity::from_provider(user).unwrap();
        assert_eq!(identity.role, Role::User);
    }
}
