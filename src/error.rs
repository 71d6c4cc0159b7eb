//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(what) => PricingErrorResponse {
                error_type: "not_found".to_string(),
                message: format!("{} not found", what),
                details: None,
            },
            AppError::Pricing(e) => PricingErrorResponse {
                error_type: "invalid_input".to_string(),
                message: e.to_string(),
                details: Some(json!({ "field": e.field() })),
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                PricingErrorResponse {
                    error_type: "database".to_string(),
                    message: "Database error".to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::reference::MaterialId;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("material 9".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Pricing(PricingError::UnknownMaterial(MaterialId(9))).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Database(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pricing_error_keeps_message() {
        let err = AppError::from(PricingError::NonPositive {
            field: "width_mm",
            value: 0,
        });
        assert_eq!(err.to_string(), "width_mm must be positive, got 0");
    }
}
