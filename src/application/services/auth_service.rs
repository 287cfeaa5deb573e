//! Authentication service translating Bearer tokens into caller identities.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{Identity, Owner, Role};
use crate::error::AppError;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID of the caller.
    pub sub: i64,
    pub role: String,
    pub exp: i64,
}

/// Verifies HS256 tokens issued with the shared `JWT_SECRET`.
///
/// The link service never sees tokens: handlers receive an [`Identity`]
/// resolved here by the auth middleware.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(secret: &str) -> Self {
        // `sub` is numeric, which jsonwebtoken's required-claim check does not
        // recognise; deserializing into `Claims` already requires it.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Resolves a raw Bearer token to an identity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthenticated`] if the signature is invalid, the
    /// token has expired or the role claim is unknown.
    pub fn identify(&self, token: &str) -> Result<Identity, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::unauthenticated(
                "Unauthenticated",
                json!({ "reason": "Invalid or expired token" }),
            )
        })?;

        let role = data.claims.role.parse::<Role>().map_err(|e| {
            AppError::unauthenticated("Unauthenticated", json!({ "reason": e.to_string() }))
        })?;

        Ok(Identity::new(Owner::User(data.claims.sub), role))
    }

    /// Signs a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if encoding fails.
    pub fn issue_token(&self, user_id: i64, role: Role, ttl: Duration) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            role: role.as_str().to_string(),
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AppError::internal("Failed to issue token", json!({}))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-signing-secret")
    }

    #[test]
    fn test_issue_and_identify() {
        let svc = service();

        let token = svc.issue_token(42, Role::User, Duration::hours(1)).unwrap();
        let identity = svc.identify(&token).unwrap();

        assert_eq!(identity, Identity::user(42));
    }

    #[test]
    fn test_admin_role_is_preserved() {
        let svc = service();

        let token = svc.issue_token(1, Role::Admin, Duration::hours(1)).unwrap();

        assert_eq!(svc.identify(&token).unwrap().role, Role::Admin);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = service();

        let token = svc.issue_token(42, Role::User, Duration::hours(-2)).unwrap();
        let result = svc.identify(&token);

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = AuthService::new("another-secret");
        let token = other.issue_token(42, Role::Admin, Duration::hours(1)).unwrap();

        let result = service().identify(&token);

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let svc = service();
        let claims = Claims {
            sub: 42,
            role: "Superuser".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &svc.encoding_key).unwrap();

        let result = svc.identify(&token);

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_numeric_subject_is_accepted() {
        let svc = service();
        let token = svc.issue_token(42, Role::User, Duration::hours(1)).unwrap();

        let data = decode::<Claims>(&token, &svc.decoding_key, &svc.validation).unwrap();

        assert_eq!(data.claims.sub, 42);
    }

    #[test]
    fn test_missing_subject_is_rejected() {
        let svc = service();
        let claims = json!({
            "role": "User",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });
        let token = encode(&Header::default(), &claims, &svc.encoding_key).unwrap();

        let result = svc.identify(&token);

        assert!(matches!(result, Err(AppError::Unauthenticated { .. })));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(service().identify("not-a-jwt").is_err());
    }
}
