//! Lifecycle ports — persistence for service requests, work records, and
//! work-record line items.

use std::future::Future;

use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{
    ActivityDefId, ApplicationDefId, FacilityId, FindingId, ProductDefId, RequestId, WorkRecordId,
};
use sanitrack_domain::request::{RequestCodes, RequestStatus, ServiceRequest};
use sanitrack_domain::time::Date;
use sanitrack_domain::work_items::{ActivityLine, Finding, PerformedApplication, ProductUsage};
use sanitrack_domain::work_record::{WorkRecord, WorkRecordVisit};

/// Repository for persisting and querying [`ServiceRequest`]s.
pub trait RequestRepository {
    /// Create a new request.
    fn create(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<ServiceRequest, SanitrackError>> + Send;

    /// Get a request by its unique identifier.
    fn get_by_id(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<ServiceRequest>, SanitrackError>> + Send;

    /// Get all requests ordered by date descending.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ServiceRequest>, SanitrackError>> + Send;

    /// Get the requests that are not done yet, ordered by date descending.
    /// This is the pool a work record may pick its closing request from.
    fn list_open(&self) -> impl Future<Output = Result<Vec<ServiceRequest>, SanitrackError>> + Send;

    /// Update an existing request.
    fn update(
        &self,
        request: ServiceRequest,
    ) -> impl Future<Output = Result<ServiceRequest, SanitrackError>> + Send;

    /// Overwrite only the status column of a request. Used by the lifecycle
    /// engine so concurrent edits to other fields are not clobbered.
    fn set_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// Delete a request.
    fn delete(&self, id: RequestId) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// The customer and facility codes of a request, for form-number
    /// derivation. `None` when the request does not exist.
    fn codes(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<RequestCodes>, SanitrackError>> + Send;
}

/// Repository for persisting and querying [`WorkRecord`]s.
pub trait WorkRecordRepository {
    /// Create a new work record. Fails with a uniqueness conflict when
    /// another record already closes the same request.
    fn create(
        &self,
        record: WorkRecord,
    ) -> impl Future<Output = Result<WorkRecord, SanitrackError>> + Send;

    /// Get a work record by its unique identifier.
    fn get_by_id(
        &self,
        id: WorkRecordId,
    ) -> impl Future<Output = Result<Option<WorkRecord>, SanitrackError>> + Send;

    /// Get all work records ordered by date descending.
    fn get_all(&self) -> impl Future<Output = Result<Vec<WorkRecord>, SanitrackError>> + Send;

    /// Update an existing work record. Same closing-request uniqueness rule
    /// as [`create`](WorkRecordRepository::create).
    fn update(
        &self,
        record: WorkRecord,
    ) -> impl Future<Output = Result<WorkRecord, SanitrackError>> + Send;

    /// Delete a work record and, by cascade, its line items and counts.
    fn delete(&self, id: WorkRecordId) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// The record currently closing `request_id`, if any.
    fn find_by_closing_request(
        &self,
        request_id: RequestId,
    ) -> impl Future<Output = Result<Option<WorkRecord>, SanitrackError>> + Send;

    /// Visits relevant to a facility in a date range: work records whose
    /// closing request belongs to the facility or which link the facility
    /// directly, ordered by date ascending.
    fn visits_for_facility(
        &self,
        facility_id: FacilityId,
        start: Date,
        end: Date,
    ) -> impl Future<Output = Result<Vec<WorkRecordVisit>, SanitrackError>> + Send;
}

/// Repository for the line items recorded under a work record.
pub trait WorkItemRepository {
    /// Insert or refresh a performed-application row (unique per pair).
    fn upsert_application(
        &self,
        row: PerformedApplication,
    ) -> impl Future<Output = Result<PerformedApplication, SanitrackError>> + Send;

    /// Remove a performed-application row.
    fn remove_application(
        &self,
        work_record_id: WorkRecordId,
        application_id: ApplicationDefId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// List the performed applications of a work record.
    fn list_applications(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Vec<PerformedApplication>, SanitrackError>> + Send;

    /// Insert or refresh an activity row (unique per pair).
    fn upsert_activity(
        &self,
        row: ActivityLine,
    ) -> impl Future<Output = Result<ActivityLine, SanitrackError>> + Send;

    /// Remove an activity row.
    fn remove_activity(
        &self,
        work_record_id: WorkRecordId,
        activity_id: ActivityDefId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// List the activity rows of a work record.
    fn list_activities(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Vec<ActivityLine>, SanitrackError>> + Send;

    /// Add a finding row. Findings may repeat per work record.
    fn add_finding(
        &self,
        finding: Finding,
    ) -> impl Future<Output = Result<Finding, SanitrackError>> + Send;

    /// Remove a finding row.
    fn remove_finding(
        &self,
        id: FindingId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// List the findings of a work record.
    fn list_findings(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Vec<Finding>, SanitrackError>> + Send;

    /// Insert or refresh a product-usage row (unique per pair).
    fn upsert_product_usage(
        &self,
        row: ProductUsage,
    ) -> impl Future<Output = Result<ProductUsage, SanitrackError>> + Send;

    /// Remove a product-usage row.
    fn remove_product_usage(
        &self,
        work_record_id: WorkRecordId,
        product_id: ProductDefId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;

    /// List the product-usage rows of a work record.
    fn list_product_usages(
        &self,
        work_record_id: WorkRecordId,
    ) -> impl Future<Output = Result<Vec<ProductUsage>, SanitrackError>> + Send;
}
