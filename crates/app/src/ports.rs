//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside
//! world. They are defined here (in `app`) so that both the use-case layer
//! and the adapter layer can depend on them without creating circular
//! dependencies.

pub mod catalog;
pub mod definitions;
pub mod directory;
pub mod ledger;
pub mod lifecycle;
pub mod reporting;

pub use catalog::{CustomerRepository, FacilityRepository, StationRepository, ZoneRepository};
pub use definitions::{
    ActivityDefRepository, ApplicationDefRepository, FindingDefRepository, ProductDefRepository,
    RequestTypeRepository,
};
pub use directory::{ContactCategoryRepository, ContactRepository, TeamRepository, UserRepository};
pub use ledger::StationCountRepository;
pub use lifecycle::{RequestRepository, WorkItemRepository, WorkRecordRepository};
pub use reporting::ActivityReportRepository;

/// Bundle of repository types a fully wired application needs.
///
/// The HTTP adapter's state is generic over one implementation of this trait
/// instead of carrying a type parameter per repository.
pub trait Repositories: Send + Sync + 'static {
    type Customers: CustomerRepository + Send + Sync + 'static;
    type Facilities: FacilityRepository + Send + Sync + 'static;
    type Zones: ZoneRepository + Send + Sync + 'static;
    type Stations: StationRepository + Send + Sync + 'static;
    type Users: UserRepository + Send + Sync + 'static;
    type Teams: TeamRepository + Send + Sync + 'static;
    type RequestTypes: RequestTypeRepository + Send + Sync + 'static;
    type Requests: RequestRepository + Send + Sync + 'static;
    type WorkRecords: WorkRecordRepository + Send + Sync + 'static;
    type StationCounts: StationCountRepository + Send + Sync + 'static;
    type Reports: ActivityReportRepository + Send + Sync + 'static;
}
