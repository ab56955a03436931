//! Axum router assembly.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

use sanitrack_app::ports::Repositories;

use crate::api;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and includes a [`TraceLayer`] that logs
/// each HTTP request/response at the `DEBUG` level using the `tracing`
/// ecosystem.
pub fn build<R: Repositories>(state: AppState<R>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::<R>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Build the `/api` sub-router.
fn routes<R: Repositories>() -> Router<AppState<R>> {
    Router::new()
        // Customers
        .route(
            "/customers",
            get(api::customers::list::<R>).post(api::customers::create::<R>),
        )
        .route(
            "/customers/{id}",
            get(api::customers::get::<R>)
                .put(api::customers::update::<R>)
                .delete(api::customers::delete::<R>),
        )
        // Facilities
        .route(
            "/facilities",
            get(api::facilities::list::<R>).post(api::facilities::create::<R>),
        )
        .route(
            "/facilities/{id}",
            get(api::facilities::get::<R>)
                .put(api::facilities::update::<R>)
                .delete(api::facilities::delete::<R>),
        )
        // Zones & stations under their parents
        .route(
            "/facilities/{id}/zones",
            get(api::zones::list_for_facility::<R>).post(api::zones::create::<R>),
        )
        .route(
            "/facilities/{id}/stations",
            get(api::stations::list_for_facility::<R>),
        )
        .route(
            "/zones/{id}",
            put(api::zones::update::<R>).delete(api::zones::delete::<R>),
        )
        .route("/zones/{id}/stations", post(api::stations::create::<R>))
        .route("/stations", get(api::stations::lookup::<R>))
        .route(
            "/stations/{id}",
            get(api::stations::get::<R>)
                .put(api::stations::update::<R>)
                .delete(api::stations::delete::<R>),
        )
        // Directory
        .route(
            "/users",
            get(api::users::list::<R>).post(api::users::create::<R>),
        )
        .route("/users/{id}/profile", get(api::users::get_profile::<R>))
        .route(
            "/teams",
            get(api::teams::list::<R>).post(api::teams::create::<R>),
        )
        .route(
            "/request-types",
            get(api::request_types::list::<R>).post(api::request_types::create::<R>),
        )
        .route(
            "/request-types/{id}",
            axum::routing::delete(api::request_types::delete::<R>),
        )
        // Service requests
        .route(
            "/requests",
            get(api::requests::list::<R>).post(api::requests::create::<R>),
        )
        .route(
            "/requests/{id}",
            get(api::requests::get::<R>)
                .put(api::requests::update::<R>)
                .delete(api::requests::delete::<R>),
        )
        // Work records & lifecycle
        .route(
            "/work-records",
            get(api::work_records::list::<R>).post(api::work_records::create::<R>),
        )
        .route(
            "/work-records/{id}",
            get(api::work_records::get::<R>)
                .put(api::work_records::update::<R>)
                .delete(api::work_records::delete::<R>),
        )
        .route("/work-records/{id}/start", post(api::work_records::start::<R>))
        .route(
            "/work-records/{id}/finish",
            post(api::work_records::finish::<R>),
        )
        // Station-count ledger
        .route(
            "/work-records/{id}/station-counts",
            get(api::station_counts::view::<R>),
        )
        .route(
            "/work-records/{id}/station-counts/bulk",
            post(api::station_counts::record_bulk::<R>),
        )
        .route(
            "/work-records/{id}/station-counts/{station_id}",
            put(api::station_counts::record::<R>),
        )
        // Reports
        .route(
            "/reports/station-report",
            get(api::reports::station_report::<R>),
        )
        .route(
            "/work-records/{id}/activity-report",
            get(api::reports::get_activity_report::<R>)
                .post(api::reports::generate_activity_report::<R>),
        )
        .route(
            "/work-records/{id}/activity-report/artifact",
            put(api::reports::attach_artifact::<R>),
        )
}
