//! Definition-list ports — persistence for the lookup tables.

use std::future::Future;

use sanitrack_domain::error::SanitrackError;
use sanitrack_domain::id::{
    ActivityDefId, ApplicationDefId, FindingDefId, ProductDefId, RequestTypeId,
};
use sanitrack_domain::lookup::{
    ActivityDef, ApplicationDef, FindingDef, ProductDef, RequestType,
};

/// Repository for persisting and querying [`RequestType`]s.
pub trait RequestTypeRepository {
    /// Create a new request type.
    fn create(
        &self,
        request_type: RequestType,
    ) -> impl Future<Output = Result<RequestType, SanitrackError>> + Send;

    /// Get a request type by its unique identifier.
    fn get_by_id(
        &self,
        id: RequestTypeId,
    ) -> impl Future<Output = Result<Option<RequestType>, SanitrackError>> + Send;

    /// Get a request type by name. Used by the bootstrap routine.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<RequestType>, SanitrackError>> + Send;

    /// Get all request types ordered by position then name.
    fn get_all(&self) -> impl Future<Output = Result<Vec<RequestType>, SanitrackError>> + Send;

    /// Update an existing request type.
    fn update(
        &self,
        request_type: RequestType,
    ) -> impl Future<Output = Result<RequestType, SanitrackError>> + Send;

    /// Delete a request type. Blocked while requests reference it.
    fn delete(
        &self,
        id: RequestTypeId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`ApplicationDef`]s.
pub trait ApplicationDefRepository {
    fn create(
        &self,
        def: ApplicationDef,
    ) -> impl Future<Output = Result<ApplicationDef, SanitrackError>> + Send;

    fn get_by_id(
        &self,
        id: ApplicationDefId,
    ) -> impl Future<Output = Result<Option<ApplicationDef>, SanitrackError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<ApplicationDef>, SanitrackError>> + Send;

    fn update(
        &self,
        def: ApplicationDef,
    ) -> impl Future<Output = Result<ApplicationDef, SanitrackError>> + Send;

    fn delete(
        &self,
        id: ApplicationDefId,
    ) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`ActivityDef`]s.
pub trait ActivityDefRepository {
    fn create(
        &self,
        def: ActivityDef,
    ) -> impl Future<Output = Result<ActivityDef, SanitrackError>> + Send;

    fn get_by_id(
        &self,
        id: ActivityDefId,
    ) -> impl Future<Output = Result<Option<ActivityDef>, SanitrackError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<ActivityDef>, SanitrackError>> + Send;

    fn update(
        &self,
        def: ActivityDef,
    ) -> impl Future<Output = Result<ActivityDef, SanitrackError>> + Send;

    fn delete(&self, id: ActivityDefId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`FindingDef`]s.
pub trait FindingDefRepository {
    fn create(
        &self,
        def: FindingDef,
    ) -> impl Future<Output = Result<FindingDef, SanitrackError>> + Send;

    fn get_by_id(
        &self,
        id: FindingDefId,
    ) -> impl Future<Output = Result<Option<FindingDef>, SanitrackError>> + Send;

    fn get_all(&self) -> impl Future<Output = Result<Vec<FindingDef>, SanitrackError>> + Send;

    fn update(
        &self,
        def: FindingDef,
    ) -> impl Future<Output = Result<FindingDef, SanitrackError>> + Send;

    fn delete(&self, id: FindingDefId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}

/// Repository for persisting and querying [`ProductDef`]s.
pub trait ProductDefRepository {
    fn create(
        &self,
        product: ProductDef,
    ) -> impl Future<Output = Result<ProductDef, SanitrackError>> + Send;

    fn get_by_id(
        &self,
        id: ProductDefId,
    ) -> impl Future<Output = Result<Option<ProductDef>, SanitrackError>> + Send;

    /// Get all products ordered by trade name, active and inactive alike.
    fn get_all(&self) -> impl Future<Output = Result<Vec<ProductDef>, SanitrackError>> + Send;

    fn update(
        &self,
        product: ProductDef,
    ) -> impl Future<Output = Result<ProductDef, SanitrackError>> + Send;

    fn delete(&self, id: ProductDefId) -> impl Future<Output = Result<(), SanitrackError>> + Send;
}
