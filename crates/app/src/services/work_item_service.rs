//! Work-item service — line items recorded under a work record.
//!
//! Pair-unique rows (applications, activities, product usages) are written
//! with upsert semantics. Product usage additionally enforces the selection
//! rule: inactive products are only accepted when the record already
//! references them.

use sanitrack_domain::error::{NotFoundError, SanitrackError, ValidationError};
use sanitrack_domain::id::{
    ActivityDefId, ApplicationDefId, FindingId, ProductDefId, WorkRecordId,
};
use sanitrack_domain::work_items::{ActivityLine, Finding, PerformedApplication, ProductUsage};

use crate::ports::{ProductDefRepository, WorkItemRepository};

/// Application service for work-record line items.
pub struct WorkItemService<R, PR> {
    repo: R,
    products: PR,
}

impl<R, PR> WorkItemService<R, PR>
where
    R: WorkItemRepository,
    PR: ProductDefRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, products: PR) -> Self {
        Self { repo, products }
    }

    /// Record that an application was performed. Idempotent per pair.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn set_application(
        &self,
        row: PerformedApplication,
    ) -> Result<PerformedApplication, SanitrackError> {
        self.repo.upsert_application(row).await
    }

    /// Remove a performed-application row.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn remove_application(
        &self,
        work_record_id: WorkRecordId,
        application_id: ApplicationDefId,
    ) -> Result<(), SanitrackError> {
        self.repo
            .remove_application(work_record_id, application_id)
            .await
    }

    /// List the performed applications of a work record.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_applications(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<PerformedApplication>, SanitrackError> {
        self.repo.list_applications(work_record_id).await
    }

    /// Record or refresh an activity row with its status flags.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn set_activity(&self, row: ActivityLine) -> Result<ActivityLine, SanitrackError> {
        self.repo.upsert_activity(row).await
    }

    /// Remove an activity row.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn remove_activity(
        &self,
        work_record_id: WorkRecordId,
        activity_id: ActivityDefId,
    ) -> Result<(), SanitrackError> {
        self.repo.remove_activity(work_record_id, activity_id).await
    }

    /// List the activity rows of a work record.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_activities(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<ActivityLine>, SanitrackError> {
        self.repo.list_activities(work_record_id).await
    }

    /// Add a finding observation. Findings may repeat per record.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn add_finding(&self, finding: Finding) -> Result<Finding, SanitrackError> {
        self.repo.add_finding(finding).await
    }

    /// Remove a finding observation.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn remove_finding(&self, id: FindingId) -> Result<(), SanitrackError> {
        self.repo.remove_finding(id).await
    }

    /// List the findings of a work record.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_findings(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<Finding>, SanitrackError> {
        self.repo.list_findings(work_record_id).await
    }

    /// Record or refresh a product-usage row. An inactive product is only
    /// accepted when this record already references it (historical rows stay
    /// editable, new selections do not).
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the product does not exist,
    /// [`SanitrackError::Validation`] when it is not selectable, or a
    /// storage error from the repository.
    pub async fn record_product_usage(
        &self,
        row: ProductUsage,
    ) -> Result<ProductUsage, SanitrackError> {
        let product = self
            .products
            .get_by_id(row.product_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "ProductDef",
                id: row.product_id.to_string(),
            })?;
        if !product.is_selectable() {
            let existing = self.repo.list_product_usages(row.work_record_id).await?;
            if !existing.iter().any(|u| u.product_id == row.product_id) {
                return Err(ValidationError::ProductNotSelectable.into());
            }
        }
        self.repo.upsert_product_usage(row).await
    }

    /// Remove a product-usage row.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn remove_product_usage(
        &self,
        work_record_id: WorkRecordId,
        product_id: ProductDefId,
    ) -> Result<(), SanitrackError> {
        self.repo
            .remove_product_usage(work_record_id, product_id)
            .await
    }

    /// List the product-usage rows of a work record.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_product_usages(
        &self,
        work_record_id: WorkRecordId,
    ) -> Result<Vec<ProductUsage>, SanitrackError> {
        self.repo.list_product_usages(work_record_id).await
    }
}
