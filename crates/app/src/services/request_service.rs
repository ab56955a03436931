//! Request service — use-cases for service requests.
//!
//! Status normalisation happens on every save; the done transition is owned
//! by the work-record service (the closing action), never by this one.

use sanitrack_domain::error::{NotFoundError, SanitrackError};
use sanitrack_domain::id::RequestId;
use sanitrack_domain::request::ServiceRequest;

use crate::ports::RequestRepository;

/// Application service for service-request CRUD and scheduling.
pub struct RequestService<R> {
    repo: R,
}

impl<R: RequestRepository> RequestService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a new request. A request created with both a planned date and
    /// a planned team starts out scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    pub async fn create_request(
        &self,
        mut request: ServiceRequest,
    ) -> Result<ServiceRequest, SanitrackError> {
        request.validate()?;
        request.normalize_status();
        self.repo.create(request).await
    }

    /// Look up a request by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::NotFound`] when no request with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_request(&self, id: RequestId) -> Result<ServiceRequest, SanitrackError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "ServiceRequest",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all requests, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_requests(&self) -> Result<Vec<ServiceRequest>, SanitrackError> {
        self.repo.get_all().await
    }

    /// List the requests a work record may still close (not done yet).
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_open_requests(&self) -> Result<Vec<ServiceRequest>, SanitrackError> {
        self.repo.list_open().await
    }

    /// Update an existing request, re-normalising its status. Filling in
    /// both planning fields promotes a pending request to scheduled; a done
    /// request stays done.
    ///
    /// # Errors
    ///
    /// Returns [`SanitrackError::Validation`] if invariants fail,
    /// [`SanitrackError::NotFound`] when the request does not exist, or a
    /// storage error from the repository.
    pub async fn update_request(
        &self,
        mut request: ServiceRequest,
    ) -> Result<ServiceRequest, SanitrackError> {
        request.validate()?;
        // Preserve the stored status as the normalisation baseline so a
        // caller cannot hand-set done through a plain edit.
        let existing = self.get_request(request.id).await?;
        request.status = existing.status;
        request.normalize_status();
        self.repo.update(request).await
    }

    /// Delete a request.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn delete_request(&self, id: RequestId) -> Result<(), SanitrackError> {
        self.repo.delete(id).await
    }
}
