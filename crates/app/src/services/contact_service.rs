//! Contact service — contact management with owner consistency rules.

use sanitrack_domain::contact::{Contact, ContactCategory};
use sanitrack_domain::error::{NotFoundError, SanitrackError, ValidationError};
use sanitrack_domain::id::{ContactId, CustomerId, FacilityId};

use crate::ports::{ContactCategoryRepository, ContactRepository, FacilityRepository};

/// Application service for contacts and contact categories.
pub struct ContactService<R, CCR, FR> {
    repo: R,
    categories: CCR,
    facilities: FR,
}

impl<R, CCR, FR> ContactService<R, CCR, FR>
where
    R: ContactRepository,
    CCR: ContactCategoryRepository,
    FR: FacilityRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, categories: CCR, facilities: FR) -> Self {
        Self {
            repo,
            categories,
            facilities,
        }
    }

    /// Create a new contact.
    ///
    /// A facility-level contact with no customer inherits the facility's
    /// owner; a contact naming both must be consistent.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] when no owner is set or the
    /// facility belongs to a different customer, [`SanitrackError::NotFound`]
    /// when the facility does not exist, or a storage error.
    pub async fn create_contact(&self, mut contact: Contact) -> Result<Contact, SanitrackError> {
        contact.validate()?;
        self.resolve_owner(&mut contact).await?;
        self.repo.create(contact).await
    }

    /// Update an existing contact, applying the same owner rules.
    ///
    /// # Errors
    ///
    /// Same as [`create_contact`](Self::create_contact).
    pub async fn update_contact(&self, mut contact: Contact) -> Result<Contact, SanitrackError> {
        contact.validate()?;
        self.resolve_owner(&mut contact).await?;
        self.repo.update(contact).await
    }

    /// Look up a contact by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no contact with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_contact(&self, id: ContactId) -> Result<Contact, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Contact",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List a customer's contacts.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Contact>, SanitrackError> {
        self.repo.find_by_customer(customer_id).await
    }

    /// List a facility's contacts.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_facility(
        &self,
        facility_id: FacilityId,
    ) -> Result<Vec<Contact>, SanitrackError> {
        self.repo.find_by_facility(facility_id).await
    }

    /// Delete a contact.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_contact(&self, id: ContactId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }

    /// List all contact categories in display order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_categories(&self) -> Result<Vec<ContactCategory>, SanitrackError> {
        self.categories.get_all().await
    }

    async fn resolve_owner(&self, contact: &mut Contact) -> Result<(), SanitrackError> {
        let Some(facility_id) = contact.facility_id else {
            return Ok(());
        };
        let facility = self
            .facilities
            .get_by_id(facility_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Facility",
                id: facility_id.to_string(),
            })?;
        match contact.customer_id {
            Some(customer_id) if customer_id != facility.customer_id => {
                Err(ValidationError::FacilityCustomerMismatch.into())
            }
            Some(_) => Ok(()),
            None => {
                contact.customer_id = Some(facility.customer_id);
                Ok(())
            }
        }
    }
}
