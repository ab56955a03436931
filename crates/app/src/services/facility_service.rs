//! Facility service — use-cases for managing facilities.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::facility::Facility;
use sanitrack_domain::id::{CustomerId, FacilityId};

use crate::ports::{CustomerRepository, FacilityRepository};

/// Application service for facility CRUD operations.
pub struct FacilityService<R, CR> {
    repo: R,
    customers: CR,
}

impl<R, CR> FacilityService<R, CR>
where
    R: FacilityRepository,
    CR: CustomerRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, customers: CR) -> Self {
        Self { repo, customers }
    }

    /// Create a new facility under an existing customer.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the owning customer does not exist,
    /// or [`SanitrackError::Uniqueness`] when the (customer, code) pair is
    /// taken.
    pub async fn create_facility(&self, facility: Facility) -> Result<Facility, SanitrackError> {
        facility.validate()?;
        self.require_customer(facility.customer_id).await?;
        self.repo.create(facility).await
    }

    /// Look up a facility by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no facility with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_facility(&self, id: FacilityId) -> Result<Facility, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Facility",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all facilities, ordered by customer code then facility code.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_facilities(&self) -> Result<Vec<Facility>, SanitrackError> {
        self.repo.get_all().await
    }

    /// List one customer's facilities.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Facility>, SanitrackError> {
        self.repo.find_by_customer(customer_id).await
    }

    /// Update an existing facility. The owning customer is immutable: the
    /// stored owner always wins over whatever the caller sent.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the facility does not exist, or a
    /// storage error from the repository.
    pub async fn update_facility(&self, mut facility: Facility) -> Result<Facility, SanitrackError> {
        facility.validate()?;
        let existing = self.get_facility(facility.id).await?;
        facility.customer_id = existing.customer_id;
        self.repo.update(facility).await
    }

    /// Delete a facility, cascading to its zones and stations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_facility(&self, id: FacilityId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }

    async fn require_customer(&self, id: CustomerId) -> Result<(), SanitrackError> {
        self.customers
            .get_by_id(id)
            .await?
            .map(|_| ())
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Customer",
                    id: id.to_string(),
                }
                .into()
            })
    }
}
