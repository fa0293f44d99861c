//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::repository::AccountStore;
use auth_service_lib::service::AuthService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub store: Arc<dyn AccountStore>,
}

impl AppState {
    /// Create new app state.
    pub fn new(auth_service: Arc<dyn AuthService>, store: Arc<dyn AccountStore>) -> Self {
        Self {
            auth_service,
            store,
        }
    }
}
