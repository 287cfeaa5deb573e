#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use link_management_service::api;
use link_management_service::api::handlers::health_handler;
use link_management_service::application::services::{AuthService, LinkService};
use link_management_service::domain::entities::{Link, Owner, Role};
use link_management_service::domain::policy::LinkPolicy;
use link_management_service::domain::repositories::LinkRepository;
use link_management_service::infrastructure::cache::{
    CacheError, CacheInvalidator, CacheResult, DispatchMode, InvalidationDispatcher,
};
use link_management_service::infrastructure::persistence::MemoryLinkRepository;
use link_management_service::state::AppState;
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "test-signing-secret";

/// Records every short code it is asked to invalidate.
#[derive(Default)]
pub struct RecordingInvalidator {
    pub codes: Mutex<Vec<String>>,
    pub fail: bool,
    pub healthy: bool,
}

impl RecordingInvalidator {
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            healthy: true,
            ..Default::default()
        }
    }

    pub fn codes(&self) -> Vec<String> {
        self.codes.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingInvalidator {
    async fn invalidate(&self, short_code: &str) -> CacheResult<()> {
        self.codes.lock().unwrap().push(short_code.to_string());
        if self.fail {
            Err(CacheError::ConnectionError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn backend(&self) -> &'static str {
        "recording"
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub repo: MemoryLinkRepository,
    pub invalidator: Arc<RecordingInvalidator>,
    pub auth: AuthService,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_invalidator(RecordingInvalidator::healthy())
    }

    /// Invalidations run inline so assertions can follow the response directly.
    pub fn with_invalidator(invalidator: RecordingInvalidator) -> Self {
        let repo = MemoryLinkRepository::new();
        let invalidator = Arc::new(invalidator);
        let state = create_test_state(repo.clone(), invalidator.clone());

        let app = Router::new()
            .route("/health", get(health_handler))
            .nest("/api", api::routes::link_routes(state.clone()))
            .with_state(state);

        Self {
            server: TestServer::new(app).unwrap(),
            repo,
            invalidator,
            auth: AuthService::new(TEST_SECRET),
        }
    }

    pub fn token(&self, user_id: i64, role: Role) -> String {
        self.auth
            .issue_token(user_id, role, Duration::hours(1))
            .unwrap()
    }

    pub fn user_token(&self, user_id: i64) -> String {
        self.token(user_id, Role::User)
    }

    pub fn admin_token(&self, user_id: i64) -> String {
        self.token(user_id, Role::Admin)
    }
}

pub fn create_test_state(
    repo: MemoryLinkRepository,
    invalidator: Arc<RecordingInvalidator>,
) -> AppState {
    let dispatcher = InvalidationDispatcher::new(invalidator, std::time::Duration::from_secs(1))
        .with_mode(DispatchMode::Inline);

    let repo: Arc<dyn LinkRepository> = Arc::new(repo);
    let link_service = LinkService::new(repo, dispatcher, LinkPolicy::default());

    AppState::new(link_service, AuthService::new(TEST_SECRET))
}

pub fn custom_link(code: &str, owner: Owner) -> Link {
    Link {
        short_code: code.to_string(),
        original_url: "https://example.com".to_string(),
        owner,
        created_at: Utc::now(),
        expires_at: None,
        click_count: 0,
        custom_alias: Some(code.to_string()),
        is_active: true,
    }
}

pub fn standard_link(code: &str, owner: Owner) -> Link {
    Link {
        custom_alias: None,
        ..custom_link(code, owner)
    }
}

/// Seeds `count` generated-code links owned by `user_id`.
pub async fn seed_standard_links(repo: &MemoryLinkRepository, user_id: i64, count: usize) {
    for i in 0..count {
        repo.insert_raw(standard_link(&format!("seed{user_id}x{i:04}"), Owner::User(user_id)))
            .await;
    }
}
