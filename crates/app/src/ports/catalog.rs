//! Catalog ports — persistence for the customer > facility > zone > station
//! hierarchy.

use std::future::Future;

use sanitrack_domain::customer::Customer;
use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::facility::Facility;
use sanitrack_domain::id::{CustomerId, FacilityId, StationId, ZoneId};
use sanitrack_domain::station::{CodePath, Station};
use sanitrack_domain::zone::Zone;

/// Repository for persisting and querying [`Customer`]s.
pub trait CustomerRepository {
    /// Create a new customer in storage.
    fn create(
        &self,
        customer: Customer,
    ) -> impl Future<Output = Result<Customer, SanitrackError>> + Send;

    /// Get a customer by its unique identifier.
    fn get_by_id(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, SanitrackError>> + Send;

    /// Get a customer by its business code.
    fn get_by_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<Customer>, SanitrackError>> + Send;

    /// Get all customers ordered by code.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Customer>, SanitrackError>> + Send;

    /// Update an existing customer.
    fn update(
        &self,
        customer: Customer,
    ) -> impl Future<Output = Result<Customer, SanitrackError>> + Send;

    /// Delete a customer and, by cascade, its facilities, zones, and
    /// stations.
    fn delete(&self, id: CustomerId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`Facility`]s.
pub trait FacilityRepository {
    /// Create a new facility. Fails with a uniqueness conflict when the
    /// (customer, code) pair already exists.
    fn create(
        &self,
        facility: Facility,
    ) -> impl Future<Output = Result<Facility, SanitrackError>> + Send;

    /// Get a facility by its unique identifier.
    fn get_by_id(
        &self,
        id: FacilityId,
    ) -> impl Future<Output = Result<Option<Facility>, SanitrackError>> + Send;

    /// Get all facilities ordered by customer code then facility code.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Facility>, SanitrackError>> + Send;

    /// Find the facilities of one customer ordered by code.
    fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<Facility>, SanitrackError>> + Send;

    /// Update an existing facility.
    fn update(
        &self,
        facility: Facility,
    ) -> impl Future<Output = Result<Facility, SanitrackError>> + Send;

    /// Delete a facility and, by cascade, its zones and stations.
    fn delete(&self, id: FacilityId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`Zone`]s.
pub trait ZoneRepository {
    /// Create a new zone. Fails with a uniqueness conflict when the
    /// (facility, code) pair already exists.
    fn create(&self, zone: Zone) -> impl Future<Output = Result<Zone, SanitrackError>> + Send;

    /// Get a zone by its unique identifier.
    fn get_by_id(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<Zone>, SanitrackError>> + Send;

    /// Find the zones of one facility ordered by code.
    fn find_by_facility(
        &self,
        facility_id: FacilityId,
    ) -> impl Future<Output = Result<Vec<Zone>, SanitrackError>> + Send;

    /// Update an existing zone.
    fn update(&self, zone: Zone) -> impl Future<Output = Result<Zone, SanitrackError>> + Send;

    /// Delete a zone and, by cascade, its stations.
    fn delete(&self, id: ZoneId) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// The customer/facility/zone codes above a zone, for deriving station
    /// unique codes. `None` when the zone does not exist.
    fn code_path(
        &self,
        id: ZoneId,
    ) -> impl Future<Output = Result<Option<CodePath>, SanitrackError>> + Send;
}

/// Repository for persisting and querying [`Station`]s.
pub trait StationRepository {
    /// Create a new station. Fails with a uniqueness conflict when the
    /// (zone, code) pair or the derived unique code already exists.
    fn create(
        &self,
        station: Station,
    ) -> impl Future<Output = Result<Station, SanitrackError>> + Send;

    /// Get a station by its unique identifier.
    fn get_by_id(
        &self,
        id: StationId,
    ) -> impl Future<Output = Result<Option<Station>, SanitrackError>> + Send;

    /// Find the stations of one zone ordered by code.
    fn find_by_zone(
        &self,
        zone_id: ZoneId,
    ) -> impl Future<Output = Result<Vec<Station>, SanitrackError>> + Send;

    /// Find the stations under a facility, optionally narrowed to one zone,
    /// ordered by zone code then station code.
    fn find_by_facility(
        &self,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> impl Future<Output = Result<Vec<Station>, SanitrackError>> + Send;

    /// Look a station up by its derived unique code.
    fn find_by_unique_code(
        &self,
        unique_code: &str,
    ) -> impl Future<Output = Result<Option<Station>, SanitrackError>> + Send;

    /// Count the stations under a facility, optionally narrowed to one zone.
    fn count_for_facility(
        &self,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> impl Future<Output = Result<u64, SanitrackError>> + Send;

    /// Update an existing station.
    fn update(
        &self,
        station: Station,
    ) -> impl Future<Output = Result<Station, SanitrackError>> + Send;

    /// Delete a station. Blocked while ledger rows reference it.
    fn delete(&self, id: StationId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}
