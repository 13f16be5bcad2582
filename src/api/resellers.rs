use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::SessionAuth;
use crate::errors::reseller::ResellerError;
use crate::services::TokenService;
use crate::stores::{LicenseStore, ResellerStore};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::license::LicenseDto;
use crate::types::dto::reseller::{
    BulkActionRequest, BulkActionResponse, CreateResellerRequest, DeleteResellerRequest,
    PauseAllRequest, PauseAllResponse, ResellerDetailResponse, ResellerDto, SetCreditsRequest,
};
use crate::types::internal::Principal;

/// Reseller management endpoints. Admin-only except for the scoped
/// license list, which a reseller may read for itself.
pub struct ResellerApi {
    reseller_store: Arc<ResellerStore>,
    license_store: Arc<LicenseStore>,
    token_service: Arc<TokenService>,
}

impl ResellerApi {
    pub fn new(
        reseller_store: Arc<ResellerStore>,
        license_store: Arc<LicenseStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            reseller_store,
            license_store,
            token_service,
        }
    }

    /// Resolve the session cookie to a principal, or 401
    fn principal(&self, auth: &SessionAuth) -> Result<Principal, ResellerError> {
        self.token_service
            .verify_session(&auth.0.key)
            .map_err(|_| ResellerError::unauthorized())
    }

    /// Resolve the session and require the admin role
    fn admin(&self, auth: &SessionAuth) -> Result<Principal, ResellerError> {
        let principal = self.principal(auth)?;
        if !principal.is_admin() {
            return Err(ResellerError::forbidden());
        }
        Ok(principal)
    }

    async fn licenses_of(&self, reseller_id: i32) -> Result<Vec<LicenseDto>, ResellerError> {
        let licenses = self
            .license_store
            .list_by_reseller(reseller_id)
            .await
            .map_err(|e| ResellerError::internal_error(e.message()))?;
        Ok(licenses.into_iter().map(LicenseDto::from).collect())
    }
}

/// API tags for reseller endpoints
#[derive(Tags)]
enum ResellerTags {
    /// Reseller management endpoints
    Resellers,
}

#[OpenApi(prefix_path = "/resellers")]
impl ResellerApi {
    /// List all resellers with their license counts
    #[oai(path = "/", method = "get", tag = "ResellerTags::Resellers")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<ResellerDto>>, ResellerError> {
        self.admin(&auth)?;

        let rows = self.reseller_store.list_with_counts().await?;

        Ok(Json(
            rows.into_iter()
                .map(|(model, count)| ResellerDto::from_model(model, count))
                .collect(),
        ))
    }

    /// Create a reseller account
    #[oai(path = "/", method = "post", tag = "ResellerTags::Resellers")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateResellerRequest>,
    ) -> Result<Json<ResellerDto>, ResellerError> {
        self.admin(&auth)?;

        let created = self
            .reseller_store
            .create_reseller(&body.username, &body.password, body.credits)
            .await?;

        Ok(Json(ResellerDto::from_model(created, 0)))
    }

    /// Delete a reseller addressed by id in the body, cascading to its
    /// licenses
    #[oai(path = "/", method = "delete", tag = "ResellerTags::Resellers")]
    async fn delete(
        &self,
        auth: SessionAuth,
        body: Json<DeleteResellerRequest>,
    ) -> Result<Json<DeleteResponse>, ResellerError> {
        self.admin(&auth)?;

        self.reseller_store.delete_cascade(body.id).await?;

        Ok(Json(DeleteResponse { success: true }))
    }

    /// Pause or unpause every license owned by a reseller
    #[oai(path = "/pauseAll", method = "post", tag = "ResellerTags::Resellers")]
    async fn pause_all(
        &self,
        auth: SessionAuth,
        body: Json<PauseAllRequest>,
    ) -> Result<Json<PauseAllResponse>, ResellerError> {
        self.admin(&auth)?;

        let reseller = self.reseller_store.find_reseller(body.reseller_id).await?;

        let updated_count = self
            .license_store
            .pause_all(reseller.id, body.pause)
            .await
            .map_err(|e| ResellerError::internal_error(e.message()))?;

        let verb = if body.pause { "paused" } else { "unpaused" };
        Ok(Json(PauseAllResponse {
            success: true,
            updated_count,
            message: format!(
                "All licenses for {} have been {}.",
                reseller.username, verb
            ),
        }))
    }

    /// Reseller detail including its licenses
    #[oai(path = "/:id", method = "get", tag = "ResellerTags::Resellers")]
    async fn get_by_id(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<ResellerDetailResponse>, ResellerError> {
        self.admin(&auth)?;

        let reseller = self.reseller_store.find_reseller(id.0).await?;
        let licenses = self.licenses_of(reseller.id).await?;

        Ok(Json(ResellerDetailResponse {
            id: reseller.id,
            username: reseller.username,
            credits: reseller.credits,
            created_at: reseller.created_at,
            licenses,
        }))
    }

    /// Overwrite a reseller's credit balance
    #[oai(path = "/:id", method = "patch", tag = "ResellerTags::Resellers")]
    async fn set_credits(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<SetCreditsRequest>,
    ) -> Result<Json<ResellerDto>, ResellerError> {
        self.admin(&auth)?;

        let updated = self.reseller_store.set_balance(id.0, body.credits).await?;
        let license_count = self.licenses_of(updated.id).await?.len() as i64;

        Ok(Json(ResellerDto::from_model(updated, license_count)))
    }

    /// Delete a reseller, cascading to its licenses
    #[oai(path = "/:id", method = "delete", tag = "ResellerTags::Resellers")]
    async fn delete_by_id(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<DeleteResponse>, ResellerError> {
        self.admin(&auth)?;

        self.reseller_store.delete_cascade(id.0).await?;

        Ok(Json(DeleteResponse { success: true }))
    }

    /// Licenses owned by one reseller. Admins may read any; a reseller
    /// may read only its own list.
    #[oai(path = "/:id/licenses", method = "get", tag = "ResellerTags::Resellers")]
    async fn list_licenses(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<LicenseDto>>, ResellerError> {
        let principal = self.principal(&auth)?;
        match &principal {
            Principal::Admin { .. } => {}
            Principal::Reseller {
                id: caller_id, ..
            } => {
                if *caller_id != id.0 {
                    return Err(ResellerError::forbidden());
                }
            }
        }

        self.reseller_store.find_reseller(id.0).await?;
        let licenses = self.licenses_of(id.0).await?;

        Ok(Json(licenses))
    }

    /// Bulk action on a reseller's licenses. Only "pauseAll" is
    /// recognized.
    #[oai(path = "/:id/licenses", method = "post", tag = "ResellerTags::Resellers")]
    async fn bulk_action(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<BulkActionRequest>,
    ) -> Result<Json<BulkActionResponse>, ResellerError> {
        self.admin(&auth)?;

        if body.action != "pauseAll" {
            return Err(ResellerError::invalid_action());
        }

        let reseller = self.reseller_store.find_reseller(id.0).await?;
        let count = self
            .license_store
            .pause_all(reseller.id, body.paused.unwrap_or(false))
            .await
            .map_err(|e| ResellerError::internal_error(e.message()))?;

        Ok(Json(BulkActionResponse {
            success: true,
            count,
        }))
    }
}
