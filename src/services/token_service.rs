use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

use crate::types::internal::{Principal, SessionClaims};

/// Session verification failure. APIs map both cases to a 401 in their
/// own error vocabulary; no detail leaks to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session token has expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,

    #[error("Failed to sign session token: {0}")]
    SigningFailed(String),
}

/// Manages the `token` session cookie JWT for admins and resellers
pub struct TokenService {
    jwt_secret: String,
    session_expiration_hours: i64,
}

impl TokenService {
    /// Create a new TokenService with the given JWT secret
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            session_expiration_hours: 24,
        }
    }

    /// Sign a session JWT for the given principal
    pub fn issue_session(&self, principal: &Principal) -> Result<String, SessionError> {
        let now = Utc::now().timestamp();
        let expiration = now + self.session_expiration_hours * 60 * 60;

        let claims = match principal {
            Principal::Admin { email } => SessionClaims {
                sub: email.clone(),
                role: "admin".to_string(),
                id: None,
                username: None,
                exp: expiration,
                iat: now,
            },
            Principal::Reseller { id, username } => SessionClaims {
                sub: id.to_string(),
                role: "reseller".to_string(),
                id: Some(*id),
                username: Some(username.clone()),
                exp: expiration,
                iat: now,
            },
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| SessionError::SigningFailed(e.to_string()))
    }

    /// Decode and validate a session token, returning the principal.
    /// Never panics; absent reseller claims read as an invalid token.
    pub fn verify_session(&self, token: &str) -> Result<Principal, SessionError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid,
        })?;

        let claims = token_data.claims;
        match claims.role.as_str() {
            "admin" => Ok(Principal::Admin { email: claims.sub }),
            "reseller" => {
                let id = claims.id.ok_or(SessionError::Invalid)?;
                let username = claims.username.ok_or(SessionError::Invalid)?;
                Ok(Principal::Reseller { id, username })
            }
            _ => Err(SessionError::Invalid),
        }
    }

    /// Build the Set-Cookie header value for a freshly issued session
    pub fn session_cookie(&self, token: &str) -> String {
        format!(
            "token={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
            token,
            self.session_expiration_hours * 60 * 60
        )
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("session_expiration_hours", &self.session_expiration_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn service() -> TokenService {
        TokenService::new(SECRET.to_string())
    }

    #[test]
    fn test_admin_session_round_trip() {
        let token_service = service();
        let principal = Principal::Admin {
            email: "admin@example.com".to_string(),
        };

        let token = token_service.issue_session(&principal).unwrap();
        let decoded = token_service.verify_session(&token).unwrap();

        assert_eq!(decoded, principal);
    }

    #[test]
    fn test_reseller_session_round_trip() {
        let token_service = service();
        let principal = Principal::Reseller {
            id: 42,
            username: "reseller1".to_string(),
        };

        let token = token_service.issue_session(&principal).unwrap();
        let decoded = token_service.verify_session(&token).unwrap();

        assert_eq!(decoded, principal);
    }

    #[test]
    fn test_verify_rejects_garbage_token() {
        let token_service = service();

        let result = token_service.verify_session("not-a-jwt");

        assert!(matches!(result, Err(SessionError::Invalid)));
    }

    #[test]
    fn test_verify_rejects_token_signed_with_other_secret() {
        let token_service = service();
        let other = TokenService::new("another-secret-key-that-is-32-chars!".to_string());

        let token = other
            .issue_session(&Principal::Admin {
                email: "admin@example.com".to_string(),
            })
            .unwrap();

        assert!(matches!(
            token_service.verify_session(&token),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let token_service = service();
        let now = Utc::now().timestamp();

        let claims = SessionClaims {
            sub: "admin@example.com".to_string(),
            role: "admin".to_string(),
            id: None,
            username: None,
            exp: now - 3600,
            iat: now - 7200,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            token_service.verify_session(&token),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn test_verify_rejects_reseller_token_without_id() {
        let token_service = service();
        let now = Utc::now().timestamp();

        // Role claims a reseller but carries no id/username
        let claims = SessionClaims {
            sub: "7".to_string(),
            role: "reseller".to_string(),
            id: None,
            username: None,
            exp: now + 3600,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            token_service.verify_session(&token),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_verify_rejects_unknown_role() {
        let token_service = service();
        let now = Utc::now().timestamp();

        let claims = SessionClaims {
            sub: "someone".to_string(),
            role: "superuser".to_string(),
            id: None,
            username: None,
            exp: now + 3600,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            token_service.verify_session(&token),
            Err(SessionError::Invalid)
        ));
    }

    #[test]
    fn test_session_cookie_shape() {
        let token_service = service();

        let cookie = token_service.session_cookie("abc123");

        assert!(cookie.starts_with("token=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));
    }
}
