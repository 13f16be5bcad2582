use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::services::TokenService;
use crate::stores::{AdminStore, LicenseStore, ResellerStore};
use crate::types::dto::auth::{ActivateRequest, ActivateResponse, LoginRequest, LoginResponse};
use crate::types::internal::Principal;

/// Unauthenticated endpoints: license-holder activation and the
/// admin/reseller session login
pub struct AuthApi {
    license_store: Arc<LicenseStore>,
    admin_store: Arc<AdminStore>,
    reseller_store: Arc<ResellerStore>,
    token_service: Arc<TokenService>,
}

impl AuthApi {
    pub fn new(
        license_store: Arc<LicenseStore>,
        admin_store: Arc<AdminStore>,
        reseller_store: Arc<ResellerStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            license_store,
            admin_store,
            reseller_store,
            token_service,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

/// Login success carries the session cookie alongside the body
#[derive(ApiResponse)]
pub enum LoginResult {
    /// Session established
    #[oai(status = 200)]
    Ok(Json<LoginResponse>, #[oai(header = "Set-Cookie")] String),
}

#[OpenApi]
impl AuthApi {
    /// Activate a license from a client device
    ///
    /// Validates the license credentials, status flags, expiry, and the
    /// device binding. The first successful activation binds the
    /// supplied HWID permanently.
    #[oai(path = "/auth", method = "post", tag = "AuthTags::Authentication")]
    async fn activate(
        &self,
        body: Json<ActivateRequest>,
    ) -> Result<Json<ActivateResponse>, AuthError> {
        self.license_store
            .activate(&body.username, &body.password, body.hwid.as_deref())
            .await?;

        Ok(Json(ActivateResponse {
            success: true,
            message: "Login successful".to_string(),
        }))
    }

    /// Log in as admin (email) or reseller (username)
    ///
    /// Issues a session JWT in the `token` cookie. The identity field
    /// picks the principal type: `email` for admins, `username` for
    /// resellers.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<LoginResult, AuthError> {
        let principal = if let Some(email) = &body.email {
            let account = self
                .admin_store
                .verify_admin_credentials(email, &body.password)
                .await?;
            Principal::Admin {
                email: account.email,
            }
        } else if let Some(username) = &body.username {
            let account = self
                .reseller_store
                .verify_reseller_credentials(username, &body.password)
                .await?;
            Principal::Reseller {
                id: account.id,
                username: account.username,
            }
        } else {
            return Err(AuthError::missing_login_identity());
        };

        let role = if principal.is_admin() {
            "admin"
        } else {
            "reseller"
        };

        let token = self
            .token_service
            .issue_session(&principal)
            .map_err(|e| AuthError::internal_error(e.to_string()))?;

        Ok(LoginResult::Ok(
            Json(LoginResponse {
                success: true,
                role: role.to_string(),
            }),
            self.token_service.session_cookie(&token),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    const PEPPER: &str = "test-pepper-for-api-tests";
    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    async fn setup_test_api() -> (DatabaseConnection, AuthApi, Arc<TokenService>) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let license_store = Arc::new(LicenseStore::new(db.clone(), PEPPER.to_string()));
        let admin_store = Arc::new(AdminStore::new(db.clone(), PEPPER.to_string()));
        let reseller_store = Arc::new(ResellerStore::new(db.clone(), PEPPER.to_string()));
        let token_service = Arc::new(TokenService::new(SECRET.to_string()));

        admin_store
            .seed_admin("admin@example.com", "admin123")
            .await
            .expect("Failed to seed admin");
        reseller_store
            .create_reseller("reseller1", "resellerpass", Some(50))
            .await
            .expect("Failed to create reseller");

        let api = AuthApi::new(
            license_store,
            admin_store,
            reseller_store,
            token_service.clone(),
        );
        (db, api, token_service)
    }

    #[tokio::test]
    async fn test_admin_login_issues_admin_session() {
        let (_db, api, token_service) = setup_test_api().await;

        let request = Json(LoginRequest {
            email: Some("admin@example.com".to_string()),
            username: None,
            password: "admin123".to_string(),
        });

        let LoginResult::Ok(body, cookie) = api.login(request).await.expect("login failed");

        assert!(body.success);
        assert_eq!(body.role, "admin");
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));

        let token = cookie
            .strip_prefix("token=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        let principal = token_service.verify_session(token).unwrap();
        assert!(principal.is_admin());
    }

    #[tokio::test]
    async fn test_reseller_login_issues_reseller_session() {
        let (_db, api, token_service) = setup_test_api().await;

        let request = Json(LoginRequest {
            email: None,
            username: Some("reseller1".to_string()),
            password: "resellerpass".to_string(),
        });

        let LoginResult::Ok(body, cookie) = api.login(request).await.expect("login failed");

        assert_eq!(body.role, "reseller");

        let token = cookie
            .strip_prefix("token=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        match token_service.verify_session(token).unwrap() {
            Principal::Reseller { username, .. } => assert_eq!(username, "reseller1"),
            other => panic!("Expected reseller principal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_without_identity_is_400() {
        let (_db, api, _tokens) = setup_test_api().await;

        let request = Json(LoginRequest {
            email: None,
            username: None,
            password: "whatever".to_string(),
        });

        let result = api.login(request).await;

        assert!(matches!(result, Err(AuthError::MissingCredentials(_))));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_401() {
        let (_db, api, _tokens) = setup_test_api().await;

        let request = Json(LoginRequest {
            email: Some("admin@example.com".to_string()),
            username: None,
            password: "wrong".to_string(),
        });

        assert!(matches!(
            api.login(request).await,
            Err(AuthError::InvalidCredentials(_))
        ));

        let request = Json(LoginRequest {
            email: None,
            username: Some("reseller1".to_string()),
            password: "wrong".to_string(),
        });

        assert!(matches!(
            api.login(request).await,
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_activate_endpoint_happy_path() {
        let (_db, api, _tokens) = setup_test_api().await;
        let admin = Principal::Admin {
            email: "admin@example.com".to_string(),
        };
        api.license_store
            .create_license("alice", "pw1", Some(30), None, &admin)
            .await
            .unwrap();

        let request = Json(ActivateRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            hwid: Some("H1".to_string()),
        });

        let response = api.activate(request).await.expect("activation failed");

        assert!(response.success);
        assert_eq!(response.message, "Login successful");
    }

    #[tokio::test]
    async fn test_activate_endpoint_rejects_second_device() {
        let (_db, api, _tokens) = setup_test_api().await;
        let admin = Principal::Admin {
            email: "admin@example.com".to_string(),
        };
        api.license_store
            .create_license("alice", "pw1", Some(30), None, &admin)
            .await
            .unwrap();

        let first = Json(ActivateRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            hwid: Some("H1".to_string()),
        });
        api.activate(first).await.unwrap();

        let second = Json(ActivateRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            hwid: Some("H2".to_string()),
        });
        let result = api.activate(second).await;

        match result {
            Err(AuthError::HwidMismatch(json)) => {
                assert_eq!(json.0.message, "License already in use on another device");
            }
            other => panic!("Expected HwidMismatch, got {:?}", other),
        }
    }
}
