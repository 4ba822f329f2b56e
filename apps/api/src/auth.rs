//! Bearer-token authentication.
//!
//! Tokens are issued by the external identity provider; this service only verifies
//! them (HS256, shared `JWT_SECRET`) and exposes the caller through extractors.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, request::Parts};
use axum::extract::FromRequestParts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub exp: usize,
}

/// Any caller holding a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

/// A caller whose token carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Verifies signature and expiry and returns the claims.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!(error = %e, "JWT validation failed");
        AppError::Unauthorized
    })
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            debug!("Missing Authorization header");
            AppError::Unauthorized
        })?;

        let claims = decode_token(token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            warn!(user_id = %user.id, "Non-admin attempted admin route");
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(AdminUser(user))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_valid_token_decodes() {
        let user_id = Uuid::new_v4();
        let token = make_token(user_id, Role::Admin, TEST_SECRET, 3600);

        let claims = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = make_token(Uuid::new_v4(), Role::User, "other-secret", 3600);
        assert!(matches!(
            decode_token(&token, TEST_SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = make_token(Uuid::new_v4(), Role::User, TEST_SECRET, -3600);
        assert!(matches!(
            decode_token(&token, TEST_SECRET),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_role_defaults_to_user() {
        let json = format!(r#"{{"sub":"{}","exp":1}}"#, Uuid::new_v4());
        let claims: Claims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims.role, Role::User);
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));

        let (parts, _) = Request::builder()
            .header(AUTHORIZATION, "Bearer ")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
