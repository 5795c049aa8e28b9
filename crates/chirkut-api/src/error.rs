use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use chirkut_types::api::ErrorBody;

/// Every failure the endpoint can report. The display strings are part of the
/// wire contract: clients match on "Username already taken" in particular.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Incomplete data")]
    IncompleteData,

    #[error("Username already taken")]
    UsernameTaken,

    /// Same text for an unknown user and a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid action")]
    InvalidAction,

    #[error("Database connection failed")]
    StoreUnavailable,

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if chirkut_db::is_unavailable(&err) {
            error!("Store unavailable: {:#}", err);
            ApiError::StoreUnavailable
        } else {
            ApiError::Internal(err)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!("Request failed: {:#}", err);
        }

        // Failures share the success status; only the body tells them apart.
        (
            StatusCode::OK,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirkut_db::StoreUnavailable;

    #[test]
    fn contract_strings() {
        assert_eq!(ApiError::IncompleteData.to_string(), "Incomplete data");
        assert_eq!(ApiError::UsernameTaken.to_string(), "Username already taken");
        assert_eq!(ApiError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(ApiError::InvalidAction.to_string(), "Invalid action");
        assert_eq!(ApiError::StoreUnavailable.to_string(), "Database connection failed");
    }

    #[test]
    fn unreachable_store_maps_to_connection_failure() {
        let err: ApiError = anyhow::Error::new(StoreUnavailable("poisoned".into())).into();
        assert!(matches!(err, ApiError::StoreUnavailable));

        let err: ApiError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn errors_are_status_200() {
        let response = ApiError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
