use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::errors::auth::AuthError;
use crate::services::password;
use crate::types::db::admin::{self, Entity as Admin};

/// AdminStore manages admin accounts. Admins are a separate principal
/// type: email-addressed, not subject to credits.
pub struct AdminStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl AdminStore {
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    /// Create the admin account if it does not exist yet. Used by the
    /// startup seed; an existing account is left untouched.
    pub async fn seed_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        let existing = Admin::find()
            .filter(admin::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        if existing.is_some() {
            return Ok(false);
        }

        let password_hash = password::hash_password(&self.password_pepper, password)
            .map_err(|e| AuthError::internal_error(e.to_string()))?;

        let new_admin = admin::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            email: Set(email.to_string()),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().timestamp()),
        };

        new_admin
            .insert(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        Ok(true)
    }

    /// Verify admin credentials and return the account on success
    pub async fn verify_admin_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<admin::Model, AuthError> {
        let account = Admin::find()
            .filter(admin::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_admin_credentials())?
            .ok_or_else(AuthError::invalid_admin_credentials)?;

        if !password::verify_password(&self.password_pepper, password, &account.password_hash) {
            return Err(AuthError::invalid_admin_credentials());
        }

        Ok(account)
    }
}

impl std::fmt::Debug for AdminStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_test_db() -> AdminStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        AdminStore::new(db, "test-pepper-for-unit-tests".to_string())
    }

    #[tokio::test]
    async fn test_seed_admin_creates_account() {
        let store = setup_test_db().await;

        let created = store
            .seed_admin("admin@example.com", "admin123")
            .await
            .expect("seed failed");

        assert!(created);

        let account = store
            .verify_admin_credentials("admin@example.com", "admin123")
            .await
            .expect("verification failed");
        assert_eq!(account.email, "admin@example.com");
    }

    #[tokio::test]
    async fn test_seed_admin_is_idempotent() {
        let store = setup_test_db().await;

        assert!(store.seed_admin("admin@example.com", "admin123").await.unwrap());
        // Second seed must not replace the existing password
        assert!(!store.seed_admin("admin@example.com", "other-pass").await.unwrap());

        assert!(store
            .verify_admin_credentials("admin@example.com", "admin123")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_password() {
        let store = setup_test_db().await;
        store.seed_admin("admin@example.com", "admin123").await.unwrap();

        let result = store
            .verify_admin_credentials("admin@example.com", "wrong")
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_email() {
        let store = setup_test_db().await;

        let result = store
            .verify_admin_credentials("nobody@example.com", "admin123")
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let store = setup_test_db().await;
        store.seed_admin("admin@example.com", "admin123").await.unwrap();

        let account = Admin::find()
            .filter(admin::Column::Email.eq("admin@example.com"))
            .one(&store.db)
            .await
            .expect("query failed")
            .expect("admin not found");

        assert_ne!(account.password_hash, "admin123");
        assert!(account.password_hash.starts_with("$argon2"));
    }
}
