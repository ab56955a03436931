//! Shared application state for axum handlers.

use std::sync::Arc;

use sanitrack_app::ports::Repositories;
use sanitrack_app::services::customer_service::CustomerService;
use sanitrack_app::services::definition_service::RequestTypeService;
use sanitrack_app::services::facility_service::FacilityService;
use sanitrack_app::services::report_service::ReportService;
use sanitrack_app::services::request_service::RequestService;
use sanitrack_app::services::station_count_service::StationCountService;
use sanitrack_app::services::station_service::StationService;
use sanitrack_app::services::team_service::TeamService;
use sanitrack_app::services::user_service::UserService;
use sanitrack_app::services::work_record_service::WorkRecordService;
use sanitrack_app::services::zone_service::ZoneService;

/// The report service instantiated over a repository bundle.
pub type BundledReportService<R> = ReportService<
    <R as Repositories>::WorkRecords,
    <R as Repositories>::Stations,
    <R as Repositories>::Zones,
    <R as Repositories>::StationCounts,
    <R as Repositories>::Reports,
    <R as Repositories>::Facilities,
    <R as Repositories>::Customers,
    <R as Repositories>::Requests,
>;

/// Application state shared across all axum handlers.
///
/// Generic over one [`Repositories`] bundle instead of a type parameter per
/// repository. `Clone` is implemented manually so the service types
/// themselves do not need to be `Clone` — only the `Arc` wrappers are
/// cloned.
pub struct AppState<R: Repositories> {
    pub customer_service: Arc<CustomerService<R::Customers>>,
    pub facility_service: Arc<FacilityService<R::Facilities, R::Customers>>,
    pub zone_service: Arc<ZoneService<R::Zones, R::Facilities>>,
    pub station_service: Arc<StationService<R::Stations, R::Zones>>,
    pub user_service: Arc<UserService<R::Users>>,
    pub team_service: Arc<TeamService<R::Teams, R::Users>>,
    pub request_type_service: Arc<RequestTypeService<R::RequestTypes>>,
    pub request_service: Arc<RequestService<R::Requests>>,
    pub work_record_service: Arc<WorkRecordService<R::WorkRecords, R::Requests>>,
    pub station_count_service:
        Arc<StationCountService<R::StationCounts, R::WorkRecords, R::Stations>>,
    pub report_service: Arc<BundledReportService<R>>,
}

impl<R: Repositories> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            customer_service: Arc::clone(&self.customer_service),
            facility_service: Arc::clone(&self.facility_service),
            zone_service: Arc::clone(&self.zone_service),
            station_service: Arc::clone(&self.station_service),
            user_service: Arc::clone(&self.user_service),
            team_service: Arc::clone(&self.team_service),
            request_type_service: Arc::clone(&self.request_type_service),
            request_service: Arc::clone(&self.request_service),
            work_record_service: Arc::clone(&self.work_record_service),
            station_count_service: Arc::clone(&self.station_count_service),
            report_service: Arc::clone(&self.report_service),
        }
    }
}

impl<R: Repositories> AppState<R> {
    /// Create a new application state from service instances.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_service: CustomerService<R::Customers>,
        facility_service: FacilityService<R::Facilities, R::Customers>,
        zone_service: ZoneService<R::Zones, R::Facilities>,
        station_service: StationService<R::Stations, R::Zones>,
        user_service: UserService<R::Users>,
        team_service: TeamService<R::Teams, R::Users>,
        request_type_service: RequestTypeService<R::RequestTypes>,
        request_service: RequestService<R::Requests>,
        work_record_service: WorkRecordService<R::WorkRecords, R::Requests>,
        station_count_service: StationCountService<R::StationCounts, R::WorkRecords, R::Stations>,
        report_service: BundledReportService<R>,
    ) -> Self {
        Self {
            customer_service: Arc::new(customer_service),
            facility_service: Arc::new(facility_service),
            zone_service: Arc::new(zone_service),
            station_service: Arc::new(station_service),
            user_service: Arc::new(user_service),
            team_service: Arc::new(team_service),
            request_type_service: Arc::new(request_type_service),
            request_service: Arc::new(request_service),
            work_record_service: Arc::new(work_record_service),
            station_count_service: Arc::new(station_count_service),
            report_service: Arc::new(report_service),
        }
    }
}
