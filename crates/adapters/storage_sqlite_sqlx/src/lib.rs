//! # sanitrack-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter built on `sqlx`. Implements every storage
//! port trait defined in `sanitrack-app`, owns the schema migrations, and
//! maps database constraint violations onto the domain error taxonomy.

pub mod error;
pub mod pool;

mod contact_repo;
mod customer_repo;
mod definition_repo;
mod facility_repo;
mod report_repo;
mod request_repo;
mod station_count_repo;
mod station_repo;
mod team_repo;
mod user_repo;
mod work_item_repo;
mod work_record_repo;
mod zone_repo;

pub use contact_repo::{SqliteContactCategoryRepository, SqliteContactRepository};
pub use customer_repo::SqliteCustomerRepository;
pub use definition_repo::{
    SqliteActivityDefRepository, SqliteApplicationDefRepository, SqliteFindingDefRepository,
    SqliteProductDefRepository, SqliteRequestTypeRepository,
};
pub use facility_repo::SqliteFacilityRepository;
pub use pool::{Config, Database};
pub use report_repo::SqliteActivityReportRepository;
pub use request_repo::SqliteRequestRepository;
pub use station_count_repo::SqliteStationCountRepository;
pub use station_repo::SqliteStationRepository;
pub use team_repo::SqliteTeamRepository;
pub use user_repo::SqliteUserRepository;
pub use work_item_repo::SqliteWorkItemRepository;
pub use work_record_repo::SqliteWorkRecordRepository;
pub use zone_repo::SqliteZoneRepository;

use sanitrack_app::ports::Repositories;

/// Type-level bundle tying the port family to the `SQLite` implementations.
/// The HTTP adapter's state is instantiated with this.
pub struct SqliteRepositories;

impl Repositories for SqliteRepositories {
    type Customers = SqliteCustomerRepository;
    type Facilities = SqliteFacilityRepository;
    type Zones = SqliteZoneRepository;
    type Stations = SqliteStationRepository;
    type Users = SqliteUserRepository;
    type Teams = SqliteTeamRepository;
    type RequestTypes = SqliteRequestTypeRepository;
    type Requests = SqliteRequestRepository;
    type WorkRecords = SqliteWorkRecordRepository;
    type StationCounts = SqliteStationCountRepository;
    type Reports = SqliteActivityReportRepository;
}
