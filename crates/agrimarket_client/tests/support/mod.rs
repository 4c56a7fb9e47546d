//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use agrimarket_client::{ApiClient, MemoryStore, Services, SessionStore};
use agrimarket_config::ApiConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wiremock::MockServer;

pub type TestSession = Arc<SessionStore<MemoryStore>>;

pub fn session() -> TestSession {
    Arc::new(SessionStore::new(MemoryStore::new()))
}

pub fn client_for(server: &MockServer, session: &TestSession) -> ApiClient {
    ApiClient::new(&ApiConfig::new(server.uri()), session.clone()).unwrap()
}

pub fn services_for(server: &MockServer) -> (Services, TestSession) {
    let session = session();
    let client = client_for(server, &session);
    (Services::new(Arc::new(client), session.clone()), session)
}

/// Counts ERROR events emitted on the current thread.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Installs an error-counting subscriber for the current thread. Use with
/// the default current-thread `#[tokio::test]` runtime.
pub fn capture_errors() -> (ErrorCounter, DefaultGuard) {
    let counter = ErrorCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (counter, guard)
}
