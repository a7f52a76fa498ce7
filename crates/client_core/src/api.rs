//! REST seam for the envelope catalog and sponsorship endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Envelope,
    protocol::{decode_catalog, EnvelopeRecord, SponsorshipRequest, ENVELOPES_PATH, SPONSORSHIPS_PATH},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::ClientError, settings::ClientSettings};

#[async_trait]
pub trait EnvelopeApi: Send + Sync {
    async fn list_envelopes(&self) -> Result<Vec<Envelope>, ClientError>;
    /// Only the status is consulted; any response body is discarded.
    async fn submit_sponsorship(&self, request: &SponsorshipRequest) -> Result<(), ClientError>;
}

pub struct HttpEnvelopeApi {
    http: Client,
    envelopes_url: Url,
    sponsorships_url: Url,
}

impl HttpEnvelopeApi {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = parse_base_url(server_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            envelopes_url: join_endpoint(&base, ENVELOPES_PATH)?,
            sponsorships_url: join_endpoint(&base, SPONSORSHIPS_PATH)?,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::new(&settings.server_url, settings.request_timeout())
    }

    pub fn envelopes_url(&self) -> &Url {
        &self.envelopes_url
    }

    pub fn sponsorships_url(&self) -> &Url {
        &self.sponsorships_url
    }
}

#[async_trait]
impl EnvelopeApi for HttpEnvelopeApi {
    async fn list_envelopes(&self) -> Result<Vec<Envelope>, ClientError> {
        let body = self
            .http
            .get(self.envelopes_url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let records: Vec<EnvelopeRecord> = serde_json::from_str(&body).map_err(|err| {
            warn!("envelope catalog did not match schema: {err}");
            ClientError::MalformedResponse(err.to_string())
        })?;
        let envelopes = decode_catalog(records)?;
        debug!(count = envelopes.len(), "fetched envelope catalog");
        Ok(envelopes)
    }

    async fn submit_sponsorship(&self, request: &SponsorshipRequest) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.sponsorships_url.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

fn parse_base_url(server_url: &str) -> Result<Url, ClientError> {
    let trimmed = server_url.trim();
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidServerUrl(format!("{trimmed}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidServerUrl(format!(
            "{trimmed}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

/// Appends an endpoint path to the base, keeping any path prefix the base
/// already carries (e.g. a reverse-proxy mount point).
fn join_endpoint(base: &Url, path: &str) -> Result<Url, ClientError> {
    let prefix = base.path().trim_end_matches('/');
    let mut url = base.clone();
    url.set_path(&format!("{prefix}{path}"));
    url.set_query(None);
    url.set_fragment(None);
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidServerUrl(base.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
