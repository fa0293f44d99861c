//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::auth_handler::{CreateAccountRequest, LoginRequest, RegisterRequest};
use domain::{AccountResponse, LoginResponse};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::create_account,
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
    ),
    components(
        schemas(
            CreateAccountRequest,
            RegisterRequest,
            LoginRequest,
            AccountResponse,
            LoginResponse,
        )
    ),
    tags(
        (name = "Authentication", description = "Account creation, registration and login"),
    )
)]
pub struct ApiDoc;
