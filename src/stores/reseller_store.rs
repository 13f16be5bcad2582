use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::errors::auth::AuthError;
use crate::errors::reseller::ResellerError;
use crate::services::password;
use crate::types::db::license::{self, Entity as License};
use crate::types::db::user::{self, Entity as User};

/// ResellerStore manages reseller accounts and their credit ledger.
///
/// The ledger is a plain integer balance on the user row: debited on
/// license creation, credited on early deletion, overridden by admins.
/// There is no transaction log.
pub struct ResellerStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl ResellerStore {
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    /// Create a reseller account with an optional starting balance
    pub async fn create_reseller(
        &self,
        username: &str,
        password: &str,
        credits: Option<i32>,
    ) -> Result<user::Model, ResellerError> {
        if username.is_empty() || password.is_empty() {
            return Err(ResellerError::missing_fields());
        }

        let existing = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?;

        if existing.is_some() {
            return Err(ResellerError::duplicate_username());
        }

        let password_hash = password::hash_password(&self.password_pepper, password)
            .map_err(|e| ResellerError::internal_error(e.to_string()))?;

        let new_reseller = user::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            role: Set("reseller".to_string()),
            credits: Set(credits.unwrap_or(0)),
            created_at: Set(Utc::now().timestamp()),
        };

        new_reseller.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ResellerError::duplicate_username()
            } else {
                ResellerError::internal_error(format!("Database error: {}", e))
            }
        })
    }

    /// List all resellers with their owned-license counts, newest first
    pub async fn list_with_counts(&self) -> Result<Vec<(user::Model, i64)>, ResellerError> {
        use sea_orm::PaginatorTrait;

        let resellers = User::find()
            .filter(user::Column::Role.eq("reseller"))
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?;

        let mut rows = Vec::with_capacity(resellers.len());
        for reseller in resellers {
            let count = License::find()
                .filter(license::Column::UserId.eq(reseller.id))
                .count(&self.db)
                .await
                .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?;
            rows.push((reseller, count as i64));
        }

        Ok(rows)
    }

    /// Fetch a reseller by id; 404 when absent or not a reseller
    pub async fn find_reseller(&self, reseller_id: i32) -> Result<user::Model, ResellerError> {
        User::find_by_id(reseller_id)
            .filter(user::Column::Role.eq("reseller"))
            .one(&self.db)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?
            .ok_or_else(ResellerError::not_found)
    }

    /// Admin balance override: replaces the balance directly, no audit
    /// trail (see the ledger contract). The balance invariant still
    /// holds, so a negative replacement is rejected.
    pub async fn set_balance(
        &self,
        reseller_id: i32,
        credits: i32,
    ) -> Result<user::Model, ResellerError> {
        if credits < 0 {
            return Err(ResellerError::invalid_credits());
        }

        let reseller = self.find_reseller(reseller_id).await?;

        let mut active: user::ActiveModel = reseller.into();
        active.credits = Set(credits);

        active
            .update(&self.db)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))
    }

    /// Conditional debit: decrements only when the resulting balance
    /// stays non-negative, in a single statement. Returns false when the
    /// balance was insufficient. Callable inside a transaction so the
    /// debit commits or rolls back with the license insert.
    pub async fn debit<C: ConnectionTrait>(
        conn: &C,
        reseller_id: i32,
        amount: i32,
    ) -> Result<bool, DbErr> {
        let result = User::update_many()
            .col_expr(
                user::Column::Credits,
                Expr::col(user::Column::Credits).sub(amount),
            )
            .filter(user::Column::Id.eq(reseller_id))
            .filter(user::Column::Credits.gte(amount))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Unconditional credit, used for refunds on early deletion
    pub async fn credit<C: ConnectionTrait>(
        conn: &C,
        reseller_id: i32,
        amount: i32,
    ) -> Result<(), DbErr> {
        User::update_many()
            .col_expr(
                user::Column::Credits,
                Expr::col(user::Column::Credits).add(amount),
            )
            .filter(user::Column::Id.eq(reseller_id))
            .exec(conn)
            .await?;

        Ok(())
    }

    /// Delete a reseller and every license it owns, in one transaction
    pub async fn delete_cascade(&self, reseller_id: i32) -> Result<(), ResellerError> {
        // Existence check first so a bad id reads as 404, not success
        self.find_reseller(reseller_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ResellerError::internal_error(format!("Failed to start transaction: {}", e)))?;

        License::delete_many()
            .filter(license::Column::UserId.eq(reseller_id))
            .exec(&txn)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?;

        User::delete_by_id(reseller_id)
            .exec(&txn)
            .await
            .map_err(|e| ResellerError::internal_error(format!("Database error: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| ResellerError::internal_error(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    /// Verify reseller credentials for session login. Accounts without
    /// the reseller role fail exactly like a wrong password.
    pub async fn verify_reseller_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, AuthError> {
        let account = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|_| AuthError::invalid_reseller_credentials())?
            .ok_or_else(AuthError::invalid_reseller_credentials)?;

        if account.role != "reseller" {
            return Err(AuthError::invalid_reseller_credentials());
        }

        if !password::verify_password(&self.password_pepper, password, &account.password_hash) {
            return Err(AuthError::invalid_reseller_credentials());
        }

        Ok(account)
    }
}

impl std::fmt::Debug for ResellerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResellerStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
