//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use common::AppResult;
use domain::{
    AccountResponse, CreateAccount, Credentials, LoginResponse, RegisterAccount,
    MAX_PASSWORD_BYTES,
};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Longer passwords cannot be hashed without losing bytes.
fn password_fits_hasher(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message =
            Some(format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// Account creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Password (6 characters to 71 bytes)
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "password_fits_hasher")
    )]
    #[schema(example = "secret123", min_length = 6, max_length = 71)]
    pub password: String,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    /// Password (6 characters to 71 bytes)
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "password_fits_hasher")
    )]
    #[schema(example = "secret123", min_length = 6, max_length = 71)]
    pub password: String,
    /// Must equal `password`
    #[serde(alias = "passwordConfirmation", alias = "password2")]
    #[schema(example = "secret123")]
    pub password_confirmation: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret123")]
    pub password: String,
}

impl From<CreateAccountRequest> for CreateAccount {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            email: request.email,
            name: request.name,
            password: request.password,
        }
    }
}

impl From<RegisterRequest> for RegisterAccount {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            name: request.name,
            password: request.password,
            password_confirmation: request.password_confirmation,
        }
    }
}

impl From<LoginRequest> for Credentials {
    fn from(request: LoginRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
        }
    }
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create an account without logging in
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Authentication",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Validation error or email already used"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAccountRequest>,
) -> AppResult<(StatusCode, Json<AccountResponse>)> {
    let account = state.auth_service.create_account(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// Register a new account and get a token
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered", body = LoginResponse),
        (status = 400, description = "Validation error, password mismatch or email already used"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let response = state.auth_service.register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login and get a token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let response = state.auth_service.login(payload.into()).await?;

    Ok(Json(response))
}
