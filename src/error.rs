/// Unified Error Handling Module
///
/// This module provides the error taxonomy for the whole application:
/// 1. Business errors (returned as data with an HTTP success status)
/// 2. Token verification errors
/// 3. Database errors
/// 4. Input validation errors
/// 5. The unified AppError and its HTTP response mapping
///
/// The API contract treats business-rule failures as data: they render as
/// HTTP 200 with a `success:false` payload. Only a rejected refresh token
/// (403), a malformed request (400), and internal faults (500) use error
/// status codes.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. BUSINESS ERRORS
/// ============================================================================

/// Session and credential errors surfaced to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No user record for the supplied username
    UserNotFound,
    /// Password did not match the stored hash at login
    InvalidCredentials,
    /// Token is not the one on record (or failed access-token verification)
    InvalidToken,
    /// Refresh token failed signature/expiry verification; re-authentication required
    Forbidden,
    /// Username uniqueness violated at registration
    DuplicateUser,
    /// A required field is missing from the request
    InvalidRequest,
    /// Old password did not match at password change
    Unauthorized,
}

impl AuthError {
    /// The request field a business error is attributed to, when there is one
    pub fn field_name(&self) -> Option<&'static str> {
        match self {
            AuthError::UserNotFound | AuthError::DuplicateUser => Some("username"),
            AuthError::InvalidCredentials => Some("password"),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::InvalidCredentials => write!(f, "Password is not correct"),
            AuthError::InvalidToken => write!(f, "Token is not correct"),
            AuthError::Forbidden => write!(f, "Refresh token verification failed"),
            AuthError::DuplicateUser => write!(f, "Username is already taken"),
            AuthError::InvalidRequest => write!(f, "Invalid request"),
            AuthError::Unauthorized => write!(f, "Not authorized"),
        }
    }
}

impl StdError for AuthError {}

/// ============================================================================
/// 2. TOKEN ERRORS
/// ============================================================================

/// Signature/expiry verification failures from the token service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    InvalidSignature,
    Malformed(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::InvalidSignature => write!(f, "Token signature is invalid"),
            TokenError::Malformed(msg) => write!(f, "Token is malformed: {}", msg),
        }
    }
}

impl StdError for TokenError {}

/// ============================================================================
/// 3. DATABASE ERRORS
/// ============================================================================

/// Credential store operation errors
#[derive(Debug)]
pub enum DatabaseError {
    UniqueConstraintViolation(String),
    QueryExecution(String),
    ConnectionPool(String),
    UnexpectedError(String),
}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseError::UniqueConstraintViolation(msg) => {
                write!(f, "Duplicate entry: {}", msg)
            }
            DatabaseError::QueryExecution(msg) => write!(f, "Query error: {}", msg),
            DatabaseError::ConnectionPool(msg) => write!(f, "Database connection error: {}", msg),
            DatabaseError::UnexpectedError(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl StdError for DatabaseError {}

/// ============================================================================
/// 4. VALIDATION ERRORS
/// ============================================================================

/// Input validation errors for registration fields
#[derive(Debug, Clone)]
pub enum ValidationError {
    EmptyField(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    InvalidFormat(&'static str),
    SuspiciousContent(&'static str),
}

impl ValidationError {
    /// The request field the validation failure is attributed to
    pub fn field_name(&self) -> &'static str {
        match self {
            ValidationError::EmptyField(field)
            | ValidationError::TooShort(field, _)
            | ValidationError::TooLong(field, _)
            | ValidationError::InvalidFormat(field)
            | ValidationError::SuspiciousContent(field) => field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField(field) => write!(f, "{} is empty", field),
            ValidationError::TooShort(field, min) => {
                write!(f, "{} is too short (minimum {} characters)", field, min)
            }
            ValidationError::TooLong(field, max) => {
                write!(f, "{} is too long (maximum {} characters)", field, max)
            }
            ValidationError::InvalidFormat(field) => write!(f, "{} has invalid format", field),
            ValidationError::SuspiciousContent(field) => {
                write!(f, "{} contains suspicious content", field)
            }
        }
    }
}

impl StdError for ValidationError {}

/// ============================================================================
/// 5. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

/// Central error type that all application errors map to
#[derive(Debug)]
pub enum AppError {
    Auth(AuthError),
    Token(TokenError),
    Database(DatabaseError),
    Validation(ValidationError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Auth(e) => write!(f, "{}", e),
            AppError::Token(e) => write!(f, "{}", e),
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for AppError {}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Token(err)
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        AppError::Database(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let error_msg = err.to_string();

        if error_msg.contains("duplicate key") || error_msg.contains("unique constraint") {
            AppError::Auth(AuthError::DuplicateUser)
        } else if error_msg.contains("pool") || error_msg.contains("connect") {
            AppError::Database(DatabaseError::ConnectionPool(error_msg))
        } else {
            AppError::Database(DatabaseError::UnexpectedError(error_msg))
        }
    }
}

/// ============================================================================
/// HTTP RESPONSE MAPPING
/// ============================================================================

impl AppError {
    fn log(&self) {
        match self {
            AppError::Auth(e) => {
                tracing::warn!(error = %e, "Business rule rejected request");
            }
            AppError::Token(e) => {
                tracing::warn!(error = %e, "Token verification error");
            }
            AppError::Validation(e) => {
                tracing::warn!(error = %e, field = e.field_name(), "Validation error");
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
            }
        }
    }
}

impl ResponseError for AppError {
    /// Renders the wire contract. Business errors are data, not status codes:
    /// they carry `success:false` in an HTTP 200 body. Errors attributed to a
    /// request field use the structured `error` object, the rest a bare
    /// `message`.
    fn error_response(&self) -> HttpResponse {
        self.log();

        match self {
            AppError::Auth(e) => match e {
                AuthError::Forbidden => HttpResponse::Forbidden().finish(),
                AuthError::InvalidRequest => HttpResponse::BadRequest().json(serde_json::json!({
                    "message": "Invalid request",
                })),
                AuthError::InvalidToken | AuthError::Unauthorized => {
                    HttpResponse::Ok().json(serde_json::json!({
                        "success": false,
                        "message": e.to_string(),
                    }))
                }
                _ => HttpResponse::Ok().json(serde_json::json!({
                    "success": false,
                    "error": {
                        "message": e.to_string(),
                        "fieldName": e.field_name(),
                    },
                })),
            },
            AppError::Validation(e) => HttpResponse::Ok().json(serde_json::json!({
                "success": false,
                "error": {
                    "message": e.to_string(),
                    "fieldName": e.field_name(),
                },
            })),
            AppError::Token(_) | AppError::Database(_) | AppError::Internal(_) => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "success": false,
                    "message": self.to_string(),
                }))
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            AppError::Auth(AuthError::InvalidRequest) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) | AppError::Validation(_) => StatusCode::OK,
            AppError::Token(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_use_a_success_status() {
        assert_eq!(
            AppError::Auth(AuthError::UserNotFound).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            AppError::Auth(AuthError::InvalidCredentials).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            AppError::Auth(AuthError::DuplicateUser).status_code(),
            StatusCode::OK
        );
        assert_eq!(
            AppError::Auth(AuthError::Unauthorized).status_code(),
            StatusCode::OK
        );
    }

    #[test]
    fn rejected_refresh_is_forbidden() {
        assert_eq!(
            AppError::Auth(AuthError::Forbidden).status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn missing_fields_are_a_bad_request() {
        assert_eq!(
            AppError::Auth(AuthError::InvalidRequest).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn infrastructure_failures_are_internal() {
        assert_eq!(
            AppError::Token(TokenError::Expired).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn field_attribution() {
        assert_eq!(AuthError::UserNotFound.field_name(), Some("username"));
        assert_eq!(AuthError::InvalidCredentials.field_name(), Some("password"));
        assert_eq!(AuthError::DuplicateUser.field_name(), Some("username"));
        assert_eq!(AuthError::InvalidToken.field_name(), None);
    }

    #[test]
    fn display_matches_wire_messages() {
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Password is not correct"
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Token is not correct");
        assert_eq!(AuthError::Unauthorized.to_string(), "Not authorized");
    }

    #[test]
    fn sqlx_unique_violation_becomes_duplicate_user() {
        let err = sqlx::Error::Protocol(
            "duplicate key value violates unique constraint \"users_username_key\"".into(),
        );
        match AppError::from(err) {
            AppError::Auth(AuthError::DuplicateUser) => (),
            other => panic!("expected DuplicateUser, got {:?}", other),
        }
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError::EmptyField("username");
        assert_eq!(err.to_string(), "username is empty");
        assert_eq!(err.field_name(), "username");
    }
}
