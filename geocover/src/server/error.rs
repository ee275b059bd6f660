//! Server error type with HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::CoverError;

/// Errors returned by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Covering engine or query layer error
    #[error("{0}")]
    Cover(#[from] CoverError),

    /// Request body could not be read as a form
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Blocking task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Cover(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Cover(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let errors = [
            CoverError::Decode("eof".to_string()),
            CoverError::parameter("lat", "x"),
            CoverError::InvalidLevelRange {
                min_level: 10,
                max_level: 5,
            },
            CoverError::InvalidLevel(31),
            CoverError::InvalidResolution(16),
            CoverError::InvalidRadius(-1.0),
            CoverError::InvalidCoordinate {
                lat: 91.0,
                lng: 0.0,
            },
            CoverError::InvalidGeometry("too few vertices".to_string()),
            CoverError::TooManyCells { limit: 10 },
        ];
        for e in errors {
            assert_eq!(ServerError::from(e).status_code(), StatusCode::BAD_REQUEST);
        }
        assert_eq!(
            ServerError::BadRequest("not a form".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(
            ServerError::Internal("join".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::from(CoverError::InvalidToken("zz".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_message_passes_through() {
        let err = ServerError::from(CoverError::InvalidRadius(-5.0));
        assert_eq!(err.to_string(), "Invalid radius: -5 meters");
    }
}
