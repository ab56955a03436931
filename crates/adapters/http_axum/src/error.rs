//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use sanitrack_domain::error::SanitrackError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps errors to HTTP responses with appropriate status codes.
pub enum ApiError {
    /// A domain error from the application services.
    Domain(SanitrackError),
    /// A path parameter that is not a valid identifier.
    InvalidId(&'static str),
}

impl From<SanitrackError> for ApiError {
    fn from(err: SanitrackError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidId(entity) => (
                StatusCode::BAD_REQUEST,
                format!("invalid {entity} identifier"),
            ),
            Self::Domain(err) => match &err {
                SanitrackError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
                SanitrackError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
                SanitrackError::Uniqueness(err) => (StatusCode::CONFLICT, err.to_string()),
                SanitrackError::Locked(err) => (StatusCode::LOCKED, err.to_string()),
                SanitrackError::ReferentialIntegrity(err) => {
                    (StatusCode::CONFLICT, err.to_string())
                }
                SanitrackError::Storage(err) => {
                    tracing::error!(error = %err, "storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanitrack_domain::error::{
        LockedRecordError, NotFoundError, UniquenessViolation, ValidationError,
    };

    fn status_of(err: SanitrackError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn should_map_validation_to_bad_request() {
        assert_eq!(
            status_of(ValidationError::EmptyCode.into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn should_map_not_found_to_404() {
        let err = NotFoundError {
            entity: "Customer",
            id: "x".to_string(),
        };
        assert_eq!(status_of(err.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn should_map_uniqueness_to_conflict() {
        let err = UniquenessViolation {
            entity: "Station",
            key: "C1-F1-Z1-S1".to_string(),
        };
        assert_eq!(status_of(err.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn should_map_locked_to_423() {
        let err = LockedRecordError {
            work_record: "wr".to_string(),
        };
        assert_eq!(status_of(err.into()), StatusCode::LOCKED);
    }

    #[test]
    fn should_map_invalid_id_to_bad_request() {
        assert_eq!(
            ApiError::InvalidId("Station").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
