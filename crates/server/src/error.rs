use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::{ErrorClass, ServiceError};
use log::{error, warn};
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Validation(_)
            | ServiceError::InsufficientFunds { .. }
            | ServiceError::Expired { .. } => StatusCode::BAD_REQUEST,
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::MissingPartition { .. } | ServiceError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self.0.class() {
            ErrorClass::Client => {
                warn!("Request rejected: {}", self.0);
                self.0.to_string()
            }
            // Storage details stay in the log
            ErrorClass::Server => {
                error!("Request failed: {}", self.0);
                if matches!(self.0, ServiceError::MissingPartition { .. }) {
                    self.0.to_string()
                } else {
                    "internal server error".to_string()
                }
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// A request axum could not decode: bad JSON, a malformed path segment or query string
#[derive(Debug)]
pub struct RequestRejection {
    status: StatusCode,
    message: String,
}

impl RequestRejection {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for RequestRejection {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for RequestRejection {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for RequestRejection {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        warn!("Malformed request: {}", self.message);
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sea_orm::DbErr;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                ServiceError::not_found("table", 1),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Conflict("taken".into()),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::InsufficientFunds {
                    required: Decimal::ONE_HUNDRED,
                    available: Decimal::ONE,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Storage(DbErr::Custom("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_rejection_keeps_status_and_message() {
        let response = RequestRejection {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "seats: invalid value".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let response =
            ApiError(ServiceError::Storage(DbErr::Custom("password=hunter2".into()))).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
