/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Failures become a JSON body with a
/// machine-readable status and code:
///
/// ```json
/// {
///   "status": "error",
///   "error": "validation_error",
///   "message": "Request validation failed",
///   "details": [{ "field": "salary", "message": "The salary must be greater than 0" }]
/// }
/// ```
///
/// Duplicates (an attendance for the same day, a second holiday on a date)
/// are reported as `400` with the `conflict` code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paydesk_shared::{
    auth::{authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError},
    models::{
        attendance::ATTENDANCE_UNIQUE_CONSTRAINT, holiday::HOLIDAY_DATE_CONSTRAINT,
    },
    payroll::{
        period::{MAX_YEAR, MIN_YEAR},
        PayrollError,
    },
    validation::{FieldError, FieldErrors},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Duplicate or still-referenced record (400)
    Conflict(String),

    /// Unprocessable entity (422)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,

    /// Error code (e.g., "not_found", "validation_error")
    pub error: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Single-field validation failure
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::Conflict(msg) => ("conflict", msg, None),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Logged here, never sent to the client
                tracing::error!("Internal error: {}", msg);
                ("internal_error", "An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

fn constraint_message(constraint: &str) -> String {
    match constraint {
        ATTENDANCE_UNIQUE_CONSTRAINT => {
            "Attendance for this employer on this date already exists".to_string()
        }
        HOLIDAY_DATE_CONSTRAINT => "A holiday already exists on this date".to_string(),
        "hr_users_email_key" => "Email already exists".to_string(),
        "departments_name_key" => "Department name already exists".to_string(),
        "employers_national_id_key" => "National id already exists".to_string(),
        other => format!("Constraint violation: {}", other),
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    let message = db_err
                        .constraint()
                        .map(constraint_message)
                        .unwrap_or_else(|| "Duplicate record".to_string());
                    return ApiError::Conflict(message);
                }

                if db_err.is_foreign_key_violation() {
                    return ApiError::Conflict(
                        "The record is referenced by other records".to_string(),
                    );
                }

                if db_err.is_check_violation() {
                    return ApiError::BadRequest(format!(
                        "Value rejected by constraint {}",
                        db_err.constraint().unwrap_or("unknown")
                    ));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<FieldError> for ValidationErrorDetail {
    fn from(error: FieldError) -> Self {
        Self {
            field: error.field,
            message: error.message,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::ValidationError(errors.into_inner().into_iter().map(Into::into).collect())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        FieldErrors::from(errors).into()
    }
}

impl From<PayrollError> for ApiError {
    fn from(err: PayrollError) -> Self {
        match err {
            PayrollError::InvalidPeriod { year, month } => period_errors(year, month).into(),
            PayrollError::EmployerNotFound(_) => {
                ApiError::NotFound("Employer not found".to_string())
            }
            PayrollError::Database(e) => {
                ApiError::InternalError(format!("Salary calculation failed: {}", e))
            }
        }
    }
}

/// Reports an out-of-range period against whichever part is wrong
fn period_errors(year: i32, month: u32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        errors.add(
            "year",
            format!("The year must be between {MIN_YEAR} and {MAX_YEAR}"),
        );
    }
    if !(1..=12).contains(&month) {
        errors.add("month", "The month must be between 1 and 12");
    }

    errors
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::InvalidFormat(msg) => ApiError::Unauthorized(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::Revoked => ApiError::Unauthorized(err.to_string()),
            AuthError::DatabaseError(e) => ApiError::InternalError(format!("Database error: {}", e)),
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            other => ApiError::Unauthorized(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                tracing::debug!(error = %body_text, "JSON data error");
                ApiError::invalid("body", body_text)
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::BadRequest(format!("Invalid JSON syntax: {}", err.body_text()))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("Content-Type must be application/json".to_string())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid("query", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::NotFound(format!("Invalid resource id: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Employer not found".to_string());
        assert_eq!(err.to_string(), "Not found: Employer not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Conflict("dup".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ValidationError(vec![]).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Forbidden("no".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_field_errors_conversion() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required");

        match ApiError::from(errors) {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "name");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_payroll_error_conversion() {
        let err: ApiError = PayrollError::EmployerNotFound(Uuid::new_v4()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let fields = |year: i32, month: u32| {
            match ApiError::from(PayrollError::InvalidPeriod { year, month }) {
                ApiError::ValidationError(details) => {
                    details.into_iter().map(|d| d.field).collect::<Vec<_>>()
                }
                other => panic!("unexpected error: {other}"),
            }
        };

        assert_eq!(fields(1999, 1), vec!["year"]);
        assert_eq!(fields(2024, 13), vec!["month"]);
        assert_eq!(fields(2101, 0), vec!["year", "month"]);
    }

    #[test]
    fn test_constraint_messages() {
        assert_eq!(
            constraint_message(ATTENDANCE_UNIQUE_CONSTRAINT),
            "Attendance for this employer on this date already exists"
        );
        assert_eq!(
            constraint_message("something_else"),
            "Constraint violation: something_else"
        );
    }

    #[tokio::test]
    async fn test_response_body() {
        let response = ApiError::Conflict("A holiday already exists on this date".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "conflict");
        assert!(body.get("details").is_none());
    }
}
