#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::ConnectInfo;
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tower::Layer;

use snaplink::domain::click_queue::{ClickReceiver, click_queue};
use snaplink::domain::entities::{Click, Link, LinkHealth, NewClick, NewLink};
use snaplink::domain::repositories::{ClickRepository, LinkRepository};
use snaplink::error::AppError;
use snaplink::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";

/// Link storage backed by a vector, with a switch to simulate an outage.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
    offline: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a link directly, bypassing code generation.
    pub fn insert(&self, code: &str, long_url: &str) -> Link {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let link = Link::new(id, code.to_string(), long_url.to_string(), Utc::now());
        self.links.lock().unwrap().push(link.clone());
        link
    }

    pub fn get(&self, id: i64) -> Option<Link> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), AppError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::internal("Database error", json!({})))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_online()?;

        if self
            .links
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.code == new_link.code)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "links_code_key" }),
            ));
        }

        Ok(self.insert(&new_link.code, &new_link.long_url))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check_online()?;

        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        self.check_online()?;

        Ok(self.links.lock().unwrap().clone())
    }

    async fn update_health(&self, health: LinkHealth) -> Result<(), AppError> {
        self.check_online()?;

        let mut links = self.links.lock().unwrap();
        match links.iter_mut().find(|l| l.id == health.link_id) {
            Some(link) => {
                link.reachable = Some(health.reachable);
                link.last_checked_at = Some(health.checked_at);
                Ok(())
            }
            None => Err(AppError::not_found(
                "Link not found",
                json!({ "link_id": health.link_id }),
            )),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_online()
    }
}

/// Click storage that can be told to reject writes for chosen links.
#[derive(Default)]
pub struct InMemoryClickRepository {
    clicks: Mutex<Vec<Click>>,
    failing_links: Mutex<HashSet<i64>>,
    next_id: AtomicI64,
}

impl InMemoryClickRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, link_id: i64) {
        self.failing_links.lock().unwrap().insert(link_id);
    }

    pub fn recorded(&self) -> Vec<Click> {
        self.clicks.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClickRepository for InMemoryClickRepository {
    async fn create_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        if self
            .failing_links
            .lock()
            .unwrap()
            .contains(&new_click.link_id)
        {
            return Err(AppError::internal("Database error", json!({})));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let click = Click::new(id, new_click.link_id, new_click.clicked_at);
        self.clicks.lock().unwrap().push(click.clone());
        Ok(click)
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self
            .clicks
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.link_id == link_id)
            .count() as i64)
    }
}

/// Click storage whose writes wait until [`GatedClickRepository::release`].
pub struct GatedClickRepository {
    inner: Arc<InMemoryClickRepository>,
    entered: Notify,
    released: CancellationToken,
}

impl GatedClickRepository {
    pub fn new(inner: Arc<InMemoryClickRepository>) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            released: CancellationToken::new(),
        }
    }

    /// Resolves once a worker is blocked inside `create_click`.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.cancel();
    }
}

#[async_trait]
impl ClickRepository for GatedClickRepository {
    async fn create_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        self.entered.notify_one();
        self.released.cancelled().await;
        self.inner.create_click(new_click).await
    }

    async fn count_by_link_id(&self, link_id: i64) -> Result<i64, AppError> {
        self.inner.count_by_link_id(link_id).await
    }
}

/// Application state wired to in-memory storage, plus handles for assertions.
pub struct TestApp {
    pub state: AppState,
    pub receiver: ClickReceiver,
    pub links: Arc<InMemoryLinkRepository>,
    pub clicks: Arc<InMemoryClickRepository>,
}

/// Builds state with a click queue of `capacity` and no workers running.
pub fn create_test_app(capacity: usize) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::new());
    let clicks = Arc::new(InMemoryClickRepository::new());
    let (sender, receiver) = click_queue(capacity).unwrap();

    let state = AppState::new(links.clone(), clicks.clone(), sender, BASE_URL);

    TestApp {
        state,
        receiver,
        links,
        clicks,
    }
}

/// Injects a fixed peer address, as `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Router with every endpoint, as served in production minus path normalization.
pub fn test_router(state: AppState) -> axum::Router {
    use axum::routing::get;
    use snaplink::api::handlers::{health_handler, redirect_handler};

    axum::Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", snaplink::api::routes::v1_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
}
