//! Envelope catalog, fetched once per mounted lifetime.

use shared::domain::{Envelope, EnvelopeNumber};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{api::EnvelopeApi, error::ClientError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    /// The fetch failed; the list stays empty and nothing is shown to the user.
    Failed(ClientError),
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    envelopes: Vec<Envelope>,
    status: CatalogStatus,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the single load for this catalog. Returns false once any load
    /// has been started.
    pub fn begin_load(&mut self) -> bool {
        if self.status != CatalogStatus::NotLoaded {
            return false;
        }
        self.status = CatalogStatus::Loading;
        true
    }

    pub fn finish_load(&mut self, result: Result<Vec<Envelope>, ClientError>) {
        match result {
            Ok(envelopes) => {
                info!(count = envelopes.len(), "envelope catalog loaded");
                self.envelopes = envelopes;
                self.status = CatalogStatus::Loaded;
            }
            Err(err) => {
                warn!("envelope catalog fetch failed: {err}");
                self.envelopes.clear();
                self.status = CatalogStatus::Failed(err);
            }
        }
    }

    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    pub fn get(&self, number: EnvelopeNumber) -> Option<&Envelope> {
        self.envelopes.iter().find(|envelope| envelope.number == number)
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }
}

/// Fetches the catalog unless it was already claimed. A result arriving after
/// `cancel` fires is dropped without touching the catalog.
pub async fn load_catalog<A>(api: &A, catalog: &mut Catalog, cancel: &CancellationToken)
where
    A: EnvelopeApi + ?Sized,
{
    if !catalog.begin_load() {
        return;
    }

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = api.list_envelopes() => Some(result),
    };

    match result {
        Some(result) if !cancel.is_cancelled() => catalog.finish_load(result),
        _ => info!("catalog load abandoned after unmount"),
    }
}
