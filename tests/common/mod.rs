#![allow(dead_code)]

//! Shared test fixtures: in-memory repositories and a router builder.
//!
//! Handler tests run against the real services and routes with the database
//! swapped for in-memory stores, so the suite needs no running Postgres.

use async_trait::async_trait;
use axum::{Router, middleware};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shortly::application::services::{AuthService, LinkService};
use shortly::domain::entities::{Link, NewLink, NewSession, NewUser, Session, User};
use shortly::domain::repositories::{LinkRepository, SessionRepository, UserRepository};
use shortly::error::AppError;
use shortly::infrastructure::title_fetcher::{TitleFetchError, TitleFetcher};
use shortly::state::AppState;
use shortly::web;
use shortly::web::middleware::session_auth;

const TEST_BASE_URL: &str = "https://s.example.com";

#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    pub fn link_count(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn visits_of(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.visits)
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut links = self.links.lock().unwrap();

        // Mirror the upsert: a concurrent insert of the same URL wins.
        if let Some(existing) = links.iter().find(|l| l.url == new_link.url) {
            return Ok(existing.clone());
        }
        if links.iter().any(|l| l.code == new_link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                serde_json::json!({ "constraint": "links_code_key" }),
            ));
        }

        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            url: new_link.url,
            code: new_link.code,
            title: new_link.title,
            base_url: new_link.base_url,
            visits: 0,
            created_at: Utc::now(),
        };
        links.push(link.clone());
        Ok(link)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.url == url)
            .cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.links.lock().unwrap().clone())
    }

    async fn increment_visits(&self, code: &str) -> Result<bool, AppError> {
        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.code == code) {
            Some(link) => {
                link.visits += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(AppError::conflict(
                "Username already taken",
                serde_json::json!({ "username": new_user.username }),
            ));
        }

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<Vec<Session>>,
    next_id: AtomicI64,
}

impl InMemorySessionRepository {
    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, new_session: NewSession) -> Result<Session, AppError> {
        let session = Session {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            token_hash: new_session.token_hash,
            username: new_session.username,
            created_at: Utc::now(),
            expires_at: new_session.expires_at,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), AppError> {
        self.sessions
            .lock()
            .unwrap()
            .retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        let now = Utc::now();
        sessions.retain(|s| s.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

/// Title fetcher returning a fixed result without any network I/O.
pub struct StubTitleFetcher {
    title: Option<String>,
}

impl StubTitleFetcher {
    pub fn new(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
        }
    }
}

#[async_trait]
impl TitleFetcher for StubTitleFetcher {
    async fn fetch_title(&self, _url: &str) -> Result<Option<String>, TitleFetchError> {
        Ok(self.title.clone())
    }
}

/// Everything a handler test needs: state for routing plus repository handles
/// for direct assertions.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
}

pub fn create_test_context(title: Option<&str>) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());
    let sessions = Arc::new(InMemorySessionRepository::default());

    let link_service = Arc::new(LinkService::new(
        links.clone(),
        Arc::new(StubTitleFetcher::new(title)),
        TEST_BASE_URL.to_string(),
        Duration::from_millis(100),
    ));
    let auth_service = Arc::new(AuthService::new(
        users.clone(),
        sessions.clone(),
        "test-signing-secret".to_string(),
        Duration::from_secs(3600),
    ));

    TestContext {
        state: AppState::new(link_service, auth_service),
        links,
        users,
        sessions,
    }
}

/// Builds the application router (session gate included) for a test state.
pub fn test_router(state: AppState) -> Router {
    let protected = web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        session_auth::layer,
    ));

    Router::new()
        .merge(protected)
        .merge(web::routes::public_routes())
        .with_state(state)
}
