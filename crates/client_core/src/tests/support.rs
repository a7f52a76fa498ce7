use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::{get, post},
    Router,
};
use shared::{
    domain::{Amount, Envelope},
    protocol::SponsorshipRequest,
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api::EnvelopeApi, error::ClientError};

pub(crate) const TWO_ENVELOPES_JSON: &str = r#"[{"number":1,"amount":50},{"number":2,"amount":100}]"#;

pub(crate) fn two_envelopes() -> Vec<Envelope> {
    vec![
        Envelope::new(1, Amount::from_cents(5_000)),
        Envelope::new(2, Amount::from_cents(10_000)),
    ]
}

#[derive(Clone)]
pub(crate) struct MockState {
    catalog: Arc<Mutex<(StatusCode, String)>>,
    sponsor_status: Arc<Mutex<StatusCode>>,
    posts: Arc<Mutex<Vec<String>>>,
    catalog_hits: Arc<AtomicUsize>,
}

impl MockState {
    pub(crate) async fn set_sponsor_status(&self, status: StatusCode) {
        *self.sponsor_status.lock().await = status;
    }

    pub(crate) async fn posts(&self) -> Vec<String> {
        self.posts.lock().await.clone()
    }

    pub(crate) fn catalog_hits(&self) -> usize {
        self.catalog_hits.load(Ordering::SeqCst)
    }
}

pub(crate) struct MockServer {
    pub(crate) url: String,
    pub(crate) state: MockState,
}

async fn list_envelopes(
    State(state): State<MockState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.catalog_hits.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.catalog.lock().await.clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

async fn sponsor(State(state): State<MockState>, body: String) -> StatusCode {
    state.posts.lock().await.push(body);
    *state.sponsor_status.lock().await
}

pub(crate) async fn spawn_mock_server(catalog_status: StatusCode, catalog_body: &str) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let state = MockState {
        catalog: Arc::new(Mutex::new((catalog_status, catalog_body.to_string()))),
        sponsor_status: Arc::new(Mutex::new(StatusCode::OK)),
        posts: Arc::new(Mutex::new(Vec::new())),
        catalog_hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route("/api/envelopes", get(list_envelopes))
        .route("/api/sponsorships", post(sponsor))
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer {
        url: format!("http://{addr}"),
        state,
    }
}

/// In-memory API. `hanging` makes every call wait forever;
/// `with_pending_submit` only stalls submits.
pub(crate) struct StubApi {
    catalog: Vec<Envelope>,
    submit_results: std::sync::Mutex<VecDeque<Result<(), ClientError>>>,
    submitted: std::sync::Mutex<Vec<SponsorshipRequest>>,
    list_calls: AtomicUsize,
    hang_catalog: bool,
    hang_submit: bool,
}

impl StubApi {
    pub(crate) fn with_catalog(catalog: Vec<Envelope>) -> Self {
        Self {
            catalog,
            submit_results: std::sync::Mutex::new(VecDeque::new()),
            submitted: std::sync::Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
            hang_catalog: false,
            hang_submit: false,
        }
    }

    pub(crate) fn hanging(mut self) -> Self {
        self.hang_catalog = true;
        self.hang_submit = true;
        self
    }

    pub(crate) fn with_pending_submit(mut self) -> Self {
        self.hang_submit = true;
        self
    }

    /// Queues submit outcomes; once drained every submit succeeds.
    pub(crate) fn with_submit_results(self, results: Vec<Result<(), ClientError>>) -> Self {
        *self.submit_results.lock().expect("submit results") = results.into();
        self
    }

    pub(crate) fn submitted(&self) -> Vec<SponsorshipRequest> {
        self.submitted.lock().expect("submitted").clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EnvelopeApi for StubApi {
    async fn list_envelopes(&self) -> Result<Vec<Envelope>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_catalog {
            std::future::pending::<()>().await;
        }
        Ok(self.catalog.clone())
    }

    async fn submit_sponsorship(&self, request: &SponsorshipRequest) -> Result<(), ClientError> {
        self.submitted
            .lock()
            .expect("submitted")
            .push(request.clone());
        if self.hang_submit {
            std::future::pending::<()>().await;
        }
        self.submit_results
            .lock()
            .expect("submit results")
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
