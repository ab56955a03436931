//! # sanitrackd — sanitrack daemon
//!
//! Composition root that wires the storage adapter, application services,
//! and HTTP adapter together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize tracing
//! - Initialize the `SQLite` connection pool and run migrations
//! - Run the idempotent bootstrap (default categories/types, admin user)
//! - Construct repository implementations and application services
//! - Build the axum router and serve
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use sanitrack_adapter_http_axum::router;
use sanitrack_adapter_http_axum::state::AppState;
use sanitrack_adapter_storage_sqlite_sqlx::{
    Config as DbConfig, SqliteActivityReportRepository, SqliteContactCategoryRepository,
    SqliteCustomerRepository, SqliteFacilityRepository, SqliteRepositories,
    SqliteRequestRepository, SqliteRequestTypeRepository, SqliteStationCountRepository,
    SqliteStationRepository, SqliteTeamRepository, SqliteUserRepository,
    SqliteWorkRecordRepository, SqliteZoneRepository,
};
use sanitrack_app::bootstrap;
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
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // One-time default data, safe to re-run on every start.
    bootstrap::seed_defaults(
        &SqliteContactCategoryRepository::new(pool.clone()),
        &SqliteRequestTypeRepository::new(pool.clone()),
        &SqliteUserRepository::new(pool.clone()),
    )
    .await?;

    // Services over their repositories.
    let state: AppState<SqliteRepositories> = AppState::new(
        CustomerService::new(SqliteCustomerRepository::new(pool.clone())),
        FacilityService::new(
            SqliteFacilityRepository::new(pool.clone()),
            SqliteCustomerRepository::new(pool.clone()),
        ),
        ZoneService::new(
            SqliteZoneRepository::new(pool.clone()),
            SqliteFacilityRepository::new(pool.clone()),
        ),
        StationService::new(
            SqliteStationRepository::new(pool.clone()),
            SqliteZoneRepository::new(pool.clone()),
        ),
        UserService::new(SqliteUserRepository::new(pool.clone())),
        TeamService::new(
            SqliteTeamRepository::new(pool.clone()),
            SqliteUserRepository::new(pool.clone()),
        ),
        RequestTypeService::new(SqliteRequestTypeRepository::new(pool.clone())),
        RequestService::new(SqliteRequestRepository::new(pool.clone())),
        WorkRecordService::new(
            SqliteWorkRecordRepository::new(pool.clone()),
            SqliteRequestRepository::new(pool.clone()),
        ),
        StationCountService::new(
            SqliteStationCountRepository::new(pool.clone()),
            SqliteWorkRecordRepository::new(pool.clone()),
            SqliteStationRepository::new(pool.clone()),
        ),
        ReportService::new(
            SqliteWorkRecordRepository::new(pool.clone()),
            SqliteStationRepository::new(pool.clone()),
            SqliteZoneRepository::new(pool.clone()),
            SqliteStationCountRepository::new(pool.clone()),
            SqliteActivityReportRepository::new(pool.clone()),
            SqliteFacilityRepository::new(pool.clone()),
            SqliteCustomerRepository::new(pool.clone()),
            SqliteRequestRepository::new(pool),
        ),
    );

    let app = router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "sanitrackd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
