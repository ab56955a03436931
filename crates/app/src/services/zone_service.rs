//! Zone service — use-cases for managing zones.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::{FacilityId, ZoneId};
use sanitrack_domain::zone::Zone;

use crate::ports::{FacilityRepository, ZoneRepository};

/// Application service for zone CRUD operations.
pub struct ZoneService<R, FR> {
    repo: R,
    facilities: FR,
}

impl<R, FR> ZoneService<R, FR>
where
    R: ZoneRepository,
    FR: FacilityRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, facilities: FR) -> Self {
        Self { repo, facilities }
    }

    /// Create a new zone under an existing facility.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the facility does not exist, or
    /// [`SanitrackError::Uniqueness`] when the (facility, code) pair is
    /// taken.
    pub async fn create_zone(&self, zone: Zone) -> Result<Zone, SanitrackError> {
        zone.validate()?;
        if self.facilities.get_by_id(zone.facility_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "Facility",
                id: zone.facility_id.to_string(),
            }
            .into());
        }
        self.repo.create(zone).await
    }

    /// Look up a zone by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no zone with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_zone(&self, id: ZoneId) -> Result<Zone, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Zone",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List one facility's zones ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_facility(
        &self,
        facility_id: FacilityId,
    ) -> Result<Vec<Zone>, SanitrackError> {
        self.repo.find_by_facility(facility_id).await
    }

    /// Update an existing zone. A changed zone code propagates into derived
    /// station codes on each station's next save.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    pub async fn update_zone(&self, zone: Zone) -> Result<Zone, SanitrackError> {
        zone.validate()?;
        self.repo.update(zone).await
    }

    /// Delete a zone, cascading to its stations.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_zone(&self, id: ZoneId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}
