//! Work-record service — the request/work lifecycle engine.
//!
//! Saving a work record derives its form number, closes the referenced
//! request, and recomputes the previously linked request when the closing
//! edge was rebound. Deleting a record recomputes its request the same way.
//! Recompute paths treat a vanished request as a no-op; only the closing
//! action ever sets a request to done.

use sanitrack_domain::error::{NotFoundError, SanitrackError, UniquenessViolation};
use sanitrack_domain::id::{RequestId, WorkRecordId};
use sanitrack_domain::request::RequestStatus;
use sanitrack_domain::time::TimeOfDay;
use sanitrack_domain::work_record::WorkRecord;

use crate::ports::{RequestRepository, WorkRecordRepository};

/// Application service for work records and the closing lifecycle.
pub struct WorkRecordService<R, RR> {
    repo: R,
    requests: RR,
}

impl<R, RR> WorkRecordService<R, RR>
where
    R: WorkRecordRepository,
    RR: RequestRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(repo: R, requests: RR) -> Self {
        Self { repo, requests }
    }

    /// Create a new work record, deriving the form number and applying the
    /// closing side effect.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the closing request does
    /// not exist, [`SanitrackError::Uniqueness`] when another record already
    /// closes it, or a storage error from the repository.
    pub async fn create_work_record(
        &self,
        mut record: WorkRecord,
    ) -> Result<WorkRecord, SanitrackError> {
        self.derive_form_number(&mut record).await?;
        self.guard_closing_edge(&record).await?;
        let stored = self.repo.create(record).await?;
        self.apply_closing(&stored).await?;
        Ok(stored)
    }

    /// Update an existing work record. When the closing request changed, the
    /// previously linked request is recomputed (scheduled/pending, never
    /// done) and the new one is closed.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the record or its closing
    /// request does not exist, [`SanitrackError::Uniqueness`] when another
    /// record already closes the new request, or a storage error.
    pub async fn update_work_record(
        &self,
        mut record: WorkRecord,
    ) -> Result<WorkRecord, SanitrackError> {
        let previous = self.get_work_record(record.id).await?;
        self.derive_form_number(&mut record).await?;
        self.guard_closing_edge(&record).await?;
        let stored = self.repo.update(record).await?;
        self.apply_closing(&stored).await?;
        if let Some(old_request) = previous.closing_request_id {
            if previous.closing_request_id != stored.closing_request_id {
                self.recompute_request(old_request).await?;
            }
        }
        Ok(stored)
    }

    /// Look up a work record by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no record with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_work_record(&self, id: WorkRecordId) -> Result<WorkRecord, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "WorkRecord",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all work records, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_work_records(&self) -> Result<Vec<WorkRecord>, SanitrackError> {
        self.repo.get_all().await
    }

    /// Delete a work record, recomputing the request it closed.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the record does not exist,
    /// or a storage error from the repository.
    pub async fn delete_work_record(&self, id: WorkRecordId) -> Result<(), SanitrackError> {
        let record = self.get_work_record(id).await?;
        self.repo.delete(id).await?;
        if let Some(request_id) = record.closing_request_id {
            self.recompute_request(request_id).await?;
        }
        Ok(())
    }

    /// Mark a record started, stamping the start time on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the record does not exist,
    /// or a storage error from the repository.
    pub async fn start_work_record(
        &self,
        id: WorkRecordId,
        at: TimeOfDay,
    ) -> Result<WorkRecord, SanitrackError> {
        let mut record = self.get_work_record(id).await?;
        record.start(at);
        self.repo.update(record).await
    }

    /// Mark a record finished, stamping the end time on first use. The
    /// record's station counts become read-only from here on.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when the record does not exist,
    /// or a storage error from the repository.
    pub async fn finish_work_record(
        &self,
        id: WorkRecordId,
        at: TimeOfDay,
    ) -> Result<WorkRecord, SanitrackError> {
        let mut record = self.get_work_record(id).await?;
        record.finish(at);
        self.repo.update(record).await
    }

    /// Derive the form number from the closing request's codes. A record
    /// closing nothing keeps an empty form number even when it has its own
    /// customer and facility.
    async fn derive_form_number(&self, record: &mut WorkRecord) -> Result<(), SanitrackError> {
        let codes = match record.closing_request_id {
            Some(request_id) => Some(self.requests.codes(request_id).await?.ok_or_else(|| {
                NotFoundError {
                    entity: "ServiceRequest",
                    id: request_id.to_string(),
                }
            })?),
            None => None,
        };
        record.refresh_form_number(codes.as_ref());
        Ok(())
    }

    /// At most one work record may close a given request. The check here
    /// gives a clean conflict; the storage layer's unique index is the net
    /// for concurrent rebinds.
    async fn guard_closing_edge(&self, record: &WorkRecord) -> Result<(), SanitrackError> {
        let Some(request_id) = record.closing_request_id else {
            return Ok(());
        };
        if let Some(other) = self.repo.find_by_closing_request(request_id).await? {
            if other.id != record.id {
                return Err(UniquenessViolation {
                    entity: "WorkRecord",
                    key: format!("closing_request={request_id}"),
                }
                .into());
            }
        }
        Ok(())
    }

    async fn apply_closing(&self, record: &WorkRecord) -> Result<(), SanitrackError> {
        let Some(request_id) = record.closing_request_id else {
            return Ok(());
        };
        if let Some(request) = self.requests.get_by_id(request_id).await? {
            if request.status != RequestStatus::Done {
                tracing::debug!(request = %request_id, record = %record.id, "closing request");
                self.requests
                    .set_status(request_id, RequestStatus::Done)
                    .await?;
            }
        }
        Ok(())
    }

    /// Recompute a request the closing edge just left. Missing rows are a
    /// no-op: the referencing side has already lost the link.
    async fn recompute_request(&self, request_id: RequestId) -> Result<(), SanitrackError> {
        let Some(mut request) = self.requests.get_by_id(request_id).await? else {
            return Ok(());
        };
        request.recompute_status();
        self.requests.set_status(request_id, request.status).await
    }
}
