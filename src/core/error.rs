use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// Validation failures carry the name of the offending field in their
/// variant so the API can tell the caller exactly what was wrong, never
/// a generic "bad request".
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Month outside 1..=12 in a save-month request
    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    /// Year below the accepted lower bound
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    /// Negative gross revenue
    #[error("Invalid revenue: {0}")]
    InvalidRevenue(String),

    /// Regime outside the closed set (simples, presumido, real, mei)
    #[error("Invalid regime: {0}")]
    InvalidRegime(String),

    /// Negative taxes-paid amount
    #[error("Invalid taxes: {0}")]
    InvalidTaxes(String),

    /// Revenue above the final bracket limit of the selected table
    #[error("Revenue exceeds regime ceiling: {0}")]
    OutOfRegimeCeiling(String),

    /// Percentage-variation baseline is empty or zero
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Validation errors outside the field-specific taxonomy
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backing-store errors, propagated unchanged
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Stable machine-readable code exposed in the JSON error body
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidMonth(_) => "INVALID_MONTH",
            AppError::InvalidYear(_) => "INVALID_YEAR",
            AppError::InvalidRevenue(_) => "INVALID_REVENUE",
            AppError::InvalidRegime(_) => "INVALID_REGIME",
            AppError::InvalidTaxes(_) => "INVALID_TAXES",
            AppError::OutOfRegimeCeiling(_) => "OUT_OF_REGIME_CEILING",
            AppError::InsufficientData(_) => "INSUFFICIENT_DATA",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "status": status_code.as_u16(),
            }
        }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidMonth(_)
            | AppError::InvalidYear(_)
            | AppError::InvalidRevenue(_)
            | AppError::InvalidRegime(_)
            | AppError::InvalidTaxes(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::OutOfRegimeCeiling(_) | AppError::InsufficientData(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Configuration(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        AppError::Storage(msg.into())
    }
}
