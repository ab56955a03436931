//! Station-count service — the ledger use-cases.
//!
//! One row per (work record, station), written with upsert semantics. Every
//! write first checks the work record's lock: once the end time is set the
//! ledger is read-only and writes fail with a locked-record error.

use sanitrack_domain::error::{LockedRecordError, NotFoundError, SanitrackError};
use sanitrack_domain::id::{FacilityId, StationId, WorkRecordId, ZoneId};
use sanitrack_domain::ledger::{LedgerSummary, StationCount};
use sanitrack_domain::station::Station;
use sanitrack_domain::work_record::WorkRecord;

use crate::ports::{StationCountRepository, StationRepository, WorkRecordRepository};

/// One entry of a bulk write.
#[derive(Debug, Clone)]
pub struct BulkCountEntry {
    pub station_id: StationId,
    pub consumption_present: bool,
    pub note: String,
}

/// The stations of a facility partitioned by whether the work record already
/// has an entry for them.
#[derive(Debug, Clone)]
pub struct LedgerBreakdown {
    /// Stations with an entry, paired with the recorded count.
    pub entered: Vec<(Station, StationCount)>,
    /// Stations with no entry for this work record yet.
    pub pending: Vec<Station>,
}

/// Application service for the station-count ledger.
pub struct StationCountService<R, WR, SR> {
    repo: R,
    work_records: WR,
    stations: SR,
}

impl<R, WR, SR> StationCountService<R, WR, SR>
where
    R: StationCountRepository,
    WR: WorkRecordRepository,
    SR: StationRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, work_records: WR, stations: SR) -> Self {
        Self {
            repo,
            work_records,
            stations,
        }
    }

    /// Record (or re-record) the consumption observation for one station.
    /// Calling this twice for the same pair leaves exactly one row holding
    /// the latest values.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Locked`] when the work record has ended,
    /// [`SanitrackError::NotFound`] when the record or station is missing,
    /// or a storage error from the repository.
    pub async fn record_count(
        &self,
        work_record_id: WorkRecordId,
        station_id: StationId,
        consumption_present: bool,
        note: impl Into<String> + Send,
    ) -> Result<StationCount, SanitrackError> {
        self.require_unlocked(work_record_id).await?;
        if self.stations.get_by_id(station_id).await?.is_none() {
            return Err(NotFoundError {
                entity: "Station",
                id: station_id.to_string(),
            }
            .into());
        }
        self.repo
            .upsert(StationCount::new(
                work_record_id,
                station_id,
                consumption_present,
                note,
            ))
            .await
    }

    /// Apply a batch of entries for one work record. Entries referencing a
    /// station that no longer exists are skipped individually; the rest are
    /// still applied. Returns the number of rows actually written.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Locked`] when the work record has ended,
    /// or a storage error from the repository.
    pub async fn bulk_record_count(
        &self,
        work_record_id: WorkRecordId,
        entries: Vec<BulkCountEntry>,
    ) -> Result<usize, SanitrackError> {
        self.require_unlocked(work_record_id).await?;
        let mut applied = 0;
        for entry in entries {
            if self.stations.get_by_id(entry.station_id).await?.is_none() {
                tracing::debug!(station = %entry.station_id, "skipping count for missing station");
                continue;
            }
            self.repo
                .upsert(StationCount::new(
                    work_record_id,
                    entry.station_id,
                    entry.consumption_present,
                    entry.note,
                ))
                .await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Get one pair's entry, if recorded.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn get_count(
        &self,
        work_record_id: WorkRecordId,
        station_id: StationId,
    ) -> Result<Option<StationCount>, SanitrackError> {
        self.repo.get(work_record_id, station_id).await
    }

    /// Entry-coverage summary for a facility (optionally one zone) under a
    /// work record: total stations, entered, and remaining.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the work record is missing,
    /// or a storage error from the repository.
    pub async fn summary(
        &self,
        work_record_id: WorkRecordId,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<LedgerSummary, SanitrackError> {
        self.require_work_record(work_record_id).await?;
        let total = self
            .stations
            .count_for_facility(facility_id, zone_id)
            .await?;
        let entered = self
            .repo
            .count_for_facility(work_record_id, facility_id, zone_id)
            .await?;
        Ok(LedgerSummary::new(total, entered))
    }

    /// Partition the facility's stations into entered / pending sets for
    /// display.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the work record is missing,
    /// or a storage error from the repository.
    pub async fn breakdown(
        &self,
        work_record_id: WorkRecordId,
        facility_id: FacilityId,
        zone_id: Option<ZoneId>,
    ) -> Result<LedgerBreakdown, SanitrackError> {
        self.require_work_record(work_record_id).await?;
        let stations = self.stations.find_by_facility(facility_id, zone_id).await?;
        let entries = self.repo.list_for_work_record(work_record_id).await?;

        let mut entered = Vec::new();
        let mut pending = Vec::new();
        for station in stations {
            match entries.iter().find(|e| e.station_id == station.id) {
                Some(entry) => entered.push((station, entry.clone())),
                None => pending.push(station),
            }
        }
        Ok(LedgerBreakdown { entered, pending })
    }

    async fn require_work_record(
        &self,
        id: WorkRecordId,
    ) -> Result<WorkRecord, SanitrackError> {
        self.work_records.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "WorkRecord",
                id: id.to_string(),
            }
            .into()
        })
    }

    async fn require_unlocked(&self, id: WorkRecordId) -> Result<(), SanitrackError> {
        let record = self.require_work_record(id).await?;
        if record.is_locked() {
            return Err(LockedRecordError {
                work_record: id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanitrack_domain::id::{RequestId, UserId};
    use sanitrack_domain::time::{Date, TimeOfDay};
    use sanitrack_domain::work_record::WorkRecordVisit;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Default)]
    struct InMemoryCountRepo {
        store: Mutex<HashMap<(WorkRecordId, StationId), StationCount>>,
    }

    impl StationCountRepository for InMemoryCountRepo {
        fn upsert(
            &self,
            entry: StationCount,
        ) -> impl Future<Output = Result<StationCount, SanitrackError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert((entry.work_record_id, entry.station_id), entry.clone());
            async { Ok(entry) }
        }

        fn get(
            &self,
            work_record_id: WorkRecordId,
            station_id: StationId,
        ) -> impl Future<Output = Result<Option<StationCount>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&(work_record_id, station_id)).cloned();
            async { Ok(result) }
        }

        fn list_for_work_record(
            &self,
            work_record_id: WorkRecordId,
        ) -> impl Future<Output = Result<Vec<StationCount>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<StationCount> = store
                .values()
                .filter(|e| e.work_record_id == work_record_id)
                .cloned()
                .collect();
            async { Ok(result) }
        }

        fn count_for_facility(
            &self,
            work_record_id: WorkRecordId,
            _facility_id: FacilityId,
            _zone_id: Option<ZoneId>,
        ) -> impl Future<Output = Result<u64, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store
                .values()
                .filter(|e| e.work_record_id == work_record_id)
                .count() as u64;
            async move { Ok(result) }
        }

        fn entries_for_records(
            &self,
            work_record_ids: &[WorkRecordId],
        ) -> impl Future<Output = Result<Vec<StationCount>, SanitrackError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<StationCount> = store
                .values()
                .filter(|e| work_record_ids.contains(&e.work_record_id))
                .cloned()
                .collect();
            async { Ok(result) }
        }
    }

    struct StubWorkRecordRepo {
        record: Mutex<WorkRecord>,
    }

    impl WorkRecordRepository for StubWorkRecordRepo {
        fn create(
            &self,
            record: WorkRecord,
        ) -> impl Future<Output = Result<WorkRecord, SanitrackError>> + Send {
            async { Ok(record) }
        }

        fn get_by_id(
            &self,
            id: WorkRecordId,
        ) -> impl Future<Output = Result<Option<WorkRecord>, SanitrackError>> + Send {
            let record = self.record.lock().unwrap();
            let result = (record.id == id).then(|| record.clone());
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<WorkRecord>, SanitrackError>> + Send {
            async { Ok(vec![]) }
        }

        fn update(
            &self,
            record: WorkRecord,
        ) -> impl Future<Output = Result<WorkRecord, SanitrackError>> + Send {
            async { Ok(record) }
        }

        fn delete(
            &self,
            _id: WorkRecordId,
        ) -> impl Future<Output = Result<(), SanitrackError>> + Send {
            async { Ok(()) }
        }

        fn find_by_closing_request(
            &self,
            _request_id: RequestId,
        ) -> impl Future<Output = Result<Option<WorkRecord>, SanitrackError>> + Send {
            async { Ok(None) }
        }

        fn visits_for_facility(
            &self,
            _facility_id: FacilityId,
            _start: Date,
            _end: Date,
        ) -> impl Future<Output = Result<Vec<WorkRecordVisit>, SanitrackError>> + Send {
            async { Ok(vec![]) }
        }
    }

    struct StubStationRepo {
        stations: Vec<Station>,
    }

    impl StationRepository for StubStationRepo {
        fn create(
            &self,
            station: Station,
        ) -> impl Future<Output = Result<Station, SanitrackError>> + Send {
            async { Ok(station) }
        }

        fn get_by_id(
            &self,
            id: StationId,
        ) -> impl Future<Output = Result<Option<Station>, SanitrackError>> + Send {
            let result = self.stations.iter().find(|s| s.id == id).cloned();
            async { Ok(result) }
        }

        fn find_by_zone(
            &self,
            _zone_id: ZoneId,
        ) -> impl Future<Output = Result<Vec<Station>, SanitrackError>> + Send {
            async { Ok(vec![]) }
        }

        fn find_by_facility(
            &self,
            _facility_id: FacilityId,
            _zone_id: Option<ZoneId>,
        ) -> impl Future<Output = Result<Vec<Station>, SanitrackError>> + Send {
            let result = self.stations.clone();
            async { Ok(result) }
        }

        fn find_by_unique_code(
            &self,
            _unique_code: &str,
        ) -> impl Future<Output = Result<Option<Station>, SanitrackError>> + Send {
            async { Ok(None) }
        }

        fn count_for_facility(
            &self,
            _facility_id: FacilityId,
            _zone_id: Option<ZoneId>,
        ) -> impl Future<Output = Result<u64, SanitrackError>> + Send {
            let result = self.stations.len() as u64;
            async move { Ok(result) }
        }

        fn update(
            &self,
            station: Station,
        ) -> impl Future<Output = Result<Station, SanitrackError>> + Send {
            async { Ok(station) }
        }

        fn delete(
            &self,
            _id: StationId,
        ) -> impl Future<Output = Result<(), SanitrackError>> + Send {
            async { Ok(()) }
        }
    }

    fn station(code: &str) -> Station {
        Station::builder(ZoneId::new())
            .code(code)
            .name(format!("Bait box {code}"))
            .build()
            .unwrap()
    }

    fn make_service(
        stations: Vec<Station>,
    ) -> (
        StationCountService<InMemoryCountRepo, StubWorkRecordRepo, StubStationRepo>,
        WorkRecordId,
    ) {
        let record = WorkRecord::builder(UserId::new()).build();
        let record_id = record.id;
        (
            StationCountService::new(
                InMemoryCountRepo::default(),
                StubWorkRecordRepo {
                    record: Mutex::new(record),
                },
                StubStationRepo { stations },
            ),
            record_id,
        )
    }

    #[tokio::test]
    async fn should_keep_single_row_when_recording_twice() {
        let st = station("S1");
        let station_id = st.id;
        let (svc, record_id) = make_service(vec![st]);

        svc.record_count(record_id, station_id, true, "droppings")
            .await
            .unwrap();
        svc.record_count(record_id, station_id, false, "clean")
            .await
            .unwrap();

        let entry = svc.get_count(record_id, station_id).await.unwrap().unwrap();
        assert!(!entry.consumption_present);
        assert_eq!(entry.note, "clean");
        assert_eq!(svc.repo.store.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_reject_write_when_record_locked() {
        let st = station("S1");
        let station_id = st.id;
        let (svc, record_id) = make_service(vec![st]);
        svc.work_records
            .record
            .lock()
            .unwrap()
            .finish(TimeOfDay::from_hms_opt(17, 0, 0).unwrap());

        let result = svc.record_count(record_id, station_id, true, "").await;

        assert!(matches!(result, Err(SanitrackError::Locked(_))));
        assert!(svc.repo.store.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_skip_missing_stations_in_bulk_write() {
        let st = station("S1");
        let station_id = st.id;
        let (svc, record_id) = make_service(vec![st]);

        let applied = svc
            .bulk_record_count(
                record_id,
                vec![
                    BulkCountEntry {
                        station_id,
                        consumption_present: true,
                        note: String::new(),
                    },
                    BulkCountEntry {
                        station_id: StationId::new(),
                        consumption_present: true,
                        note: String::new(),
                    },
                ],
            )
            .await
            .unwrap();

        assert_eq!(applied, 1);
    }

    #[tokio::test]
    async fn should_summarise_total_entered_and_remaining() {
        let stations = vec![station("S1"), station("S2"), station("S3")];
        let first = stations[0].id;
        let second = stations[1].id;
        let (svc, record_id) = make_service(stations);

        svc.record_count(record_id, first, true, "").await.unwrap();
        svc.record_count(record_id, second, false, "").await.unwrap();

        let summary = svc
            .summary(record_id, FacilityId::new(), None)
            .await
            .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.entered, 2);
        assert_eq!(summary.remaining, 1);
    }

    #[tokio::test]
    async fn should_partition_stations_into_entered_and_pending() {
        let stations = vec![station("S1"), station("S2")];
        let first = stations[0].id;
        let (svc, record_id) = make_service(stations);

        svc.record_count(record_id, first, true, "").await.unwrap();

        let breakdown = svc
            .breakdown(record_id, FacilityId::new(), None)
            .await
            .unwrap();
        assert_eq!(breakdown.entered.len(), 1);
        assert_eq!(breakdown.pending.len(), 1);
        assert_eq!(breakdown.entered[0].0.id, first);
    }

    #[tokio::test]
    async fn should_reject_count_for_unknown_work_record() {
        let st = station("S1");
        let station_id = st.id;
        let (svc, _) = make_service(vec![st]);

        let result = svc
            .record_count(WorkRecordId::new(), station_id, true, "")
            .await;
        assert!(matches!(result, Err(SanitrackError::NotFound(_))));
    }
}
