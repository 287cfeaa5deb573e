//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkService};
use crate::domain::repositories::LinkRepository;

/// Application state cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub fn new(link_service: LinkService<dyn LinkRepository>, auth_service: AuthService) -> Self {
        Self {
            link_service: Arc::new(link_service),
            auth_service: Arc::new(auth_service),
        }
    }
}
