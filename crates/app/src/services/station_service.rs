//! Station service — use-cases for managing stations, including the derived
//! unique code.
//!
//! Every save recomputes `unique_code` from the current ancestor codes, so a
//! renamed customer/facility/zone code propagates the next time the station
//! is written. Collisions surface as uniqueness conflicts.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::{FacilityId, StationId, ZoneId};
use sanitrack_domain::station::Station;

use crate::ports::{StationRepository, ZoneRepository};

/// Application service for station CRUD operations.
pub struct StationService<R, ZR> {
    repo: R,
    zones: ZR,
}

impl<R, ZR> StationService<R, ZR>
where
    R: StationRepository,
    ZR: ZoneRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, zones: ZR) -> Self {
        Self { repo, zones }
    }

    /// Create a new station under an existing zone, deriving its unique
    /// code.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the zone does not exist, or
    /// [`SanitrackError::Uniqueness`] when the (zone, code) pair or the
    /// derived unique code collides.
    pub async fn create_station(&self, mut station: Station) -> Result<Station, SanitrackError> {
        station.validate()?;
        self.derive_unique_code(&mut station).await?;
        self.repo.create(station).await
    }

    /// Look up a station by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no station with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_station(&self, id: StationId) -> Result<Station, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Station",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up a station by its derived unique code.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no station carries the
    /// code, or a storage error from the repository.
    pub async fn get_by_unique_code(&self, unique_code: &str) -> Result<Station, SanitrackError> {
        self.repo
            .find_by_unique_code(unique_code)
            .await?
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Station",
                    id: unique_code.to_string(),
                }
                .into()
            })
    }

    /// List one zone's stations ordered by code.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_zone(&self, zone_id: ZoneId) -> Result<Vec<Station>, SanitrackError> {
        self.repo.find_by_zone(zone_id).await
    }

    /// List the stations under a facility, optionally narrowed to one zone,
    /// in display order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_for_facility(
        &self,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<Vec<Station>, SanitrackError> {
        self.repo.find_by_facility(facility_id, zone_id).await
    }

    /// Update an existing station, re-deriving its unique code from the
    /// current ancestor codes.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the zone is gone, or
    /// [`SanitrackError::Uniqueness`] on a code collision.
    pub async fn update_station(&self, mut station: Station) -> Result<Station, SanitrackError> {
        station.validate()?;
        self.derive_unique_code(&mut station).await?;
        self.repo.update(station).await
    }

    /// Delete a station. Blocked while ledger entries reference it.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::ReferentialIntegrity`] when counts still
    /// reference the station, or a storage error from the repository.
    pub async fn delete_station(&self, id: StationId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }

    async fn derive_unique_code(&self, station: &mut Station) -> Result<(), SanitrackError> {
        let path = self
            .zones
            .code_path(station.zone_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Zone",
                id: station.zone_id.to_string(),
            })?;
        station.recompute_unique_code(&path);
        Ok(())
    }
}
