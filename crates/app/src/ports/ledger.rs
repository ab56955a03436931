//! Ledger port — persistence for per-(work record, station) consumption
//! entries.

use std::future::Future;

use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{FacilityId, StationId, WorkRecordId, ZoneId};
use sanitrack_domain::ledger::StationCount;

/// Repository for the station-count ledger.
///
/// The upsert must be atomic for concurrent writers on the same pair: the
/// adapter implements it as a single conflict-clause statement, with the
/// (work record, station) unique constraint as the safety net.
pub trait StationCountRepository {
    /// Insert the entry, or update `consumption_present` and `note` in place
    /// when the (work record, station) pair already exists.
    fn upsert(
        &self,
        entry: StationCount,
    ) -> impl Future<Output = Result<StationCount, SanitrackError>> + Send;

    /// Get the entry for one pair.
    fn get(
        &self,
        work_record_id: WorkRecordId,
        station_id: StationId,
    ) -> impl Future<Output = Result<Option<StationCount>, SanitrackError>> + Send;

    /// List the entries of one work record.
    fn list_for_work_record(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Vec<StationCount>, SanitrackError>> + Send;

    /// Count the entries of one work record whose stations sit under a
    /// facility, optionally narrowed to one zone.
    fn count_for_facility(
        &self,
        work_record_id: WorkRecordId,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> impl Future<Output = Result<u64, SanitrackError>> + Send;

    /// All entries of the given work records, for report aggregation.
    fn entries_for_records(
        &self,
        work_record_ids: &[WorkRecordId],
    ) -> impl Future<Output = Result<Vec<StationCount>, SanitrackError>> + Send;
}
