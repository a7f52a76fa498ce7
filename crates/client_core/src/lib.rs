use std::sync::Arc;

use shared::domain::{Envelope, EnvelopeNumber};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub mod api;
pub mod catalog;
pub mod error;
pub mod form;
pub mod notify;
pub mod settings;

pub use api::{EnvelopeApi, HttpEnvelopeApi};
pub use catalog::{load_catalog, Catalog, CatalogStatus};
pub use error::ClientError;
pub use form::{Field, FormPhase, SponsorshipForm, SubmissionTicket};
pub use notify::{Notice, NoticeKind, Notifier, RecordingNotifier};
pub use settings::{load_settings, ClientSettings};

/// Everything the envelope widget knows about, owned by whoever drives it.
#[derive(Debug, Clone, Default)]
pub struct ChallengeState {
    pub catalog: Catalog,
    pub form: SponsorshipForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(ClientError),
    /// The widget was unmounted while the request was in flight; state was
    /// left as it was.
    Abandoned,
}

pub struct EnvelopeChallenge<A: EnvelopeApi> {
    api: A,
    notifier: Arc<dyn Notifier>,
    state: ChallengeState,
    mounted: CancellationToken,
}

impl<A: EnvelopeApi> EnvelopeChallenge<A> {
    pub fn new(api: A, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: ChallengeState::default(),
            mounted: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &ChallengeState {
        &self.state
    }

    pub fn envelopes(&self) -> &[Envelope] {
        self.state.catalog.envelopes()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Token that fires when the widget is unmounted. Cancelling a clone
    /// unmounts the widget.
    pub fn lifetime(&self) -> CancellationToken {
        self.mounted.clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.mounted.is_cancelled()
    }

    /// Loads the catalog. Only the first call per widget issues a request.
    pub async fn mount(&mut self) {
        load_catalog(&self.api, &mut self.state.catalog, &self.mounted).await;
    }

    pub fn unmount(&mut self) {
        if !self.mounted.is_cancelled() {
            info!("envelope widget unmounted");
            self.mounted.cancel();
        }
    }

    pub fn select(&mut self, number: EnvelopeNumber) -> Result<bool, ClientError> {
        self.state.form.select(&self.state.catalog, number)
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        self.state.form.update_field(field, value);
    }

    /// Submits the current draft. Local guard failures come back as `Err`
    /// without a request or a notice; server and transport failures come back
    /// as `Rejected` after the failure notice. An unmounted widget sends
    /// nothing.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ClientError> {
        if self.mounted.is_cancelled() {
            info!("submit ignored on unmounted widget");
            return Ok(SubmitOutcome::Abandoned);
        }
        let ticket = self.state.form.begin_submit()?;

        let result = tokio::select! {
            biased;
            _ = self.mounted.cancelled() => None,
            result = self.api.submit_sponsorship(ticket.request()) => Some(result),
        };
        let Some(result) = result.filter(|_| !self.mounted.is_cancelled()) else {
            info!(
                envelope_number = ticket.envelope_number().0,
                "submission outcome dropped after unmount"
            );
            return Ok(SubmitOutcome::Abandoned);
        };

        let outcome = match &result {
            Ok(()) => SubmitOutcome::Accepted,
            Err(err) => SubmitOutcome::Rejected(err.clone()),
        };
        if let Some(notice) = self.state.form.finish_submit(ticket, result) {
            self.notifier.notify(notice);
        }
        Ok(outcome)
    }
}

impl<A: EnvelopeApi> Drop for EnvelopeChallenge<A> {
    fn drop(&mut self) {
        self.mounted.cancel();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
