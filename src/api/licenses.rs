use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use std::sync::Arc;

use crate::api::SessionAuth;
use crate::errors::license::LicenseError;
use crate::services::TokenService;
use crate::stores::{LicenseStore, ResellerStore};
use crate::types::dto::common::DeleteResponse;
use crate::types::dto::license::{
    CreateLicenseRequest, DeleteLicenseRequest, LicenseDto, LicenseListResponse, ResellerSummary,
    ResetHwidResponse, UpdateLicenseByIdRequest, UpdateLicenseRequest,
};
use crate::types::internal::{LicenseUpdateOp, Principal};

/// License management endpoints for admins and resellers
pub struct LicenseApi {
    license_store: Arc<LicenseStore>,
    reseller_store: Arc<ResellerStore>,
    token_service: Arc<TokenService>,
}

impl LicenseApi {
    pub fn new(
        license_store: Arc<LicenseStore>,
        reseller_store: Arc<ResellerStore>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            license_store,
            reseller_store,
            token_service,
        }
    }

    /// Resolve the session cookie to a principal, or 401
    fn principal(&self, auth: &SessionAuth) -> Result<Principal, LicenseError> {
        self.token_service
            .verify_session(&auth.0.key)
            .map_err(|_| LicenseError::unauthorized())
    }
}

/// API tags for license endpoints
#[derive(Tags)]
enum LicenseTags {
    /// License management endpoints
    Licenses,
}

#[OpenApi(prefix_path = "/licenses")]
impl LicenseApi {
    /// List licenses visible to the caller
    ///
    /// Admins see every license. Resellers see only their own, plus a
    /// summary of their account including the credit balance.
    #[oai(path = "/", method = "get", tag = "LicenseTags::Licenses")]
    async fn list(&self, auth: SessionAuth) -> Result<Json<LicenseListResponse>, LicenseError> {
        let principal = self.principal(&auth)?;

        match &principal {
            Principal::Admin { .. } => {
                let licenses = self.license_store.list_all().await?;
                Ok(Json(LicenseListResponse {
                    reseller: None,
                    licenses: licenses.into_iter().map(LicenseDto::from).collect(),
                }))
            }
            Principal::Reseller { id, .. } => {
                let reseller = self
                    .reseller_store
                    .find_reseller(*id)
                    .await
                    .map_err(|_| LicenseError::reseller_not_found())?;
                let licenses = self.license_store.list_by_reseller(*id).await?;
                Ok(Json(LicenseListResponse {
                    reseller: Some(ResellerSummary {
                        id: reseller.id,
                        username: reseller.username,
                        credits: reseller.credits,
                    }),
                    licenses: licenses.into_iter().map(LicenseDto::from).collect(),
                }))
            }
        }
    }

    /// Create a license
    #[oai(path = "/", method = "post", tag = "LicenseTags::Licenses")]
    async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateLicenseRequest>,
    ) -> Result<Json<LicenseDto>, LicenseError> {
        let principal = self.principal(&auth)?;

        let created = self
            .license_store
            .create_license(
                &body.username,
                &body.password,
                body.days,
                body.expires_at.as_deref(),
                &principal,
            )
            .await?;

        Ok(Json(created.into()))
    }

    /// Update a license addressed by id in the body
    #[oai(path = "/", method = "patch", tag = "LicenseTags::Licenses")]
    async fn update(
        &self,
        auth: SessionAuth,
        body: Json<UpdateLicenseByIdRequest>,
    ) -> Result<Json<LicenseDto>, LicenseError> {
        let principal = self.principal(&auth)?;
        let op = body.to_op().ok_or_else(LicenseError::invalid_field)?;

        let updated = self
            .license_store
            .update_license(body.id, op, &principal)
            .await?;

        Ok(Json(updated.into()))
    }

    /// Delete a license addressed by id in the body
    #[oai(path = "/", method = "delete", tag = "LicenseTags::Licenses")]
    async fn delete(
        &self,
        auth: SessionAuth,
        body: Json<DeleteLicenseRequest>,
    ) -> Result<Json<DeleteResponse>, LicenseError> {
        let principal = self.principal(&auth)?;

        self.license_store
            .delete_license(body.id, &principal)
            .await?;

        Ok(Json(DeleteResponse { success: true }))
    }

    /// Fetch a single license
    #[oai(path = "/:id", method = "get", tag = "LicenseTags::Licenses")]
    async fn get_by_id(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<LicenseDto>, LicenseError> {
        let principal = self.principal(&auth)?;

        let record = self.license_store.get_license(id.0, &principal).await?;

        Ok(Json(record.into()))
    }

    /// Update a single license
    #[oai(path = "/:id", method = "patch", tag = "LicenseTags::Licenses")]
    async fn update_by_id(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<UpdateLicenseRequest>,
    ) -> Result<Json<LicenseDto>, LicenseError> {
        let principal = self.principal(&auth)?;
        let op = body.to_op().ok_or_else(LicenseError::invalid_field)?;

        let updated = self
            .license_store
            .update_license(id.0, op, &principal)
            .await?;

        Ok(Json(updated.into()))
    }

    /// Delete a single license
    #[oai(path = "/:id", method = "delete", tag = "LicenseTags::Licenses")]
    async fn delete_by_id(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<DeleteResponse>, LicenseError> {
        let principal = self.principal(&auth)?;

        self.license_store.delete_license(id.0, &principal).await?;

        Ok(Json(DeleteResponse { success: true }))
    }

    /// Reset the bound HWID so a new device can activate
    #[oai(path = "/:id/hwid", method = "post", tag = "LicenseTags::Licenses")]
    async fn reset_hwid(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<ResetHwidResponse>, LicenseError> {
        let principal = self.principal(&auth)?;

        let updated = self
            .license_store
            .update_license(id.0, LicenseUpdateOp::ResetHwid, &principal)
            .await?;

        Ok(Json(ResetHwidResponse {
            success: true,
            license: updated.into(),
        }))
    }
}
