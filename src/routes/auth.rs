/// Authentication Routes
///
/// Request/response shapes and handlers for the five session endpoints.
/// Handlers parse and validate input, delegate to the session manager,
/// and wrap its results in the response envelopes; every failure path is
/// rendered by the `AppError` response mapping.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AuthError, ValidationError};
use crate::model::UserProfile;
use crate::session::{NewRegistration, SessionManager, SessionUser};
use crate::validators::{is_valid_email, is_valid_username};

/// Login request
#[derive(Deserialize)]
pub struct AuthenticateRequest {
    pub username: String,
    pub password: String,
}

/// Identity lookup request
#[derive(Deserialize)]
pub struct IdentifyRequest {
    pub access_token: String,
}

/// Token exchange request; the field is optional so its absence renders
/// as the contract's 400 rather than a deserialization error
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub photo_url: Option<String>,
    pub display_name: Option<String>,
}

/// Password change request; both password fields are preconditions
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub username: String,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// Envelope for authenticate/getUserByToken
#[derive(Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub user: SessionUser,
}

/// Envelope for refreshToken
#[derive(Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub data: String,
}

/// Envelope for register/changePassword
#[derive(Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub message: String,
    pub data: UserProfile,
}

/// POST /authenticate
///
/// Check credentials, issue a token pair, and return the session.
pub async fn authenticate(
    form: web::Json<AuthenticateRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let session = sessions.authenticate(&form.username, &form.password).await?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        success: true,
        message: "Token generated Successfully".to_string(),
        user: session,
    }))
}

/// POST /getUserByToken
///
/// Resolve the session behind an access token, echoing the token back.
pub async fn get_user_by_token(
    form: web::Json<IdentifyRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let session = sessions.identify(&form.access_token).await?;

    Ok(HttpResponse::Ok().json(SessionResponse {
        success: true,
        message: "Token generated Successfully".to_string(),
        user: session,
    }))
}

/// POST /refreshToken
///
/// Exchange the stored refresh token for a new access token. A missing
/// field is a 400; a token nobody holds is a business failure; a stored
/// token that fails verification is a bare 403.
pub async fn refresh_token(
    form: web::Json<RefreshRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let supplied = form
        .into_inner()
        .refresh_token
        .ok_or(AuthError::InvalidRequest)?;

    let access_token = sessions.refresh(&supplied).await?;

    Ok(HttpResponse::Ok().json(TokenResponse {
        success: true,
        data: access_token,
    }))
}

/// POST /register
///
/// Create a user. Username and email are validated; any non-empty
/// password is accepted.
pub async fn register(
    form: web::Json<RegisterRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let username = is_valid_username(&form.username)?;
    let email = is_valid_email(&form.email)?;
    if form.password.is_empty() {
        return Err(ValidationError::EmptyField("password").into());
    }

    let user = sessions
        .register(NewRegistration {
            username,
            email,
            password: form.password,
            photo_url: form.photo_url,
            display_name: form.display_name,
        })
        .await?;

    Ok(HttpResponse::Ok().json(RecordResponse {
        success: true,
        message: "User Successfully created".to_string(),
        data: UserProfile::from(&user),
    }))
}

/// POST /changePassword
///
/// Replace the password after checking the current one. Both password
/// fields must be present or the call short-circuits with a 400.
pub async fn change_password(
    form: web::Json<ChangePasswordRequest>,
    sessions: web::Data<SessionManager>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    let (old_password, new_password) = match (form.old_password, form.new_password) {
        (Some(old), Some(new)) => (old, new),
        _ => return Err(AuthError::InvalidRequest.into()),
    };

    let user = sessions
        .change_password(&form.username, &old_password, &new_password)
        .await?;

    Ok(HttpResponse::Ok().json(RecordResponse {
        success: true,
        message: "Password has changed".to_string(),
        data: UserProfile::from(&user),
    }))
}
