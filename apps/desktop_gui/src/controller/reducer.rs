//! State transitions driven by UI actions and backend events.

use client_core::{CatalogStatus, ChallengeState, ClientError, Notice};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// What the shell should show after an event was applied.
#[derive(Debug)]
pub enum Reaction {
    Nothing,
    Status(String),
    Notice(Notice),
    Error(UiError),
}

/// The catalog request for this window, issued at most once.
pub fn mount_command(state: &mut ChallengeState) -> Option<BackendCommand> {
    state
        .catalog
        .begin_load()
        .then_some(BackendCommand::LoadCatalog)
}

/// Starts a submit. Guard failures leave the state untouched and come back
/// as a validation error for the form.
pub fn submit_command(state: &mut ChallengeState) -> Result<BackendCommand, UiError> {
    state
        .form
        .begin_submit()
        .map(|ticket| BackendCommand::SubmitSponsorship { ticket })
        .map_err(|err| UiError::from_client_error(UiErrorContext::Sponsorship, &err))
}

/// Settles a command that never reached the worker: a lost submit is failed
/// so the form can be retried, a lost catalog load counts as a failed fetch.
pub fn command_undelivered(state: &mut ChallengeState, cmd: BackendCommand) -> Option<Notice> {
    let unavailable = || ClientError::Transport("backend worker unavailable".to_string());
    match cmd {
        BackendCommand::SubmitSponsorship { ticket } => {
            state.form.finish_submit(ticket, Err(unavailable()))
        }
        BackendCommand::LoadCatalog => {
            state.catalog.finish_load(Err(unavailable()));
            None
        }
        BackendCommand::Shutdown => None,
    }
}

pub fn reduce(state: &mut ChallengeState, event: UiEvent) -> Reaction {
    match event {
        UiEvent::Info(message) => Reaction::Status(message),
        UiEvent::BackendReady => Reaction::Status("Backend worker ready".to_string()),
        UiEvent::CatalogLoaded(result) => {
            if *state.catalog.status() != CatalogStatus::Loading {
                tracing::warn!("ignoring catalog result that was not requested");
                return Reaction::Nothing;
            }
            state.catalog.finish_load(result);
            match state.catalog.status() {
                CatalogStatus::Loaded => Reaction::Status(format!(
                    "{} envelopes available",
                    state.catalog.envelopes().len()
                )),
                _ => Reaction::Nothing,
            }
        }
        UiEvent::SponsorshipFinished { ticket, result } => {
            match state.form.finish_submit(ticket, result) {
                Some(notice) => Reaction::Notice(notice),
                None => Reaction::Nothing,
            }
        }
        UiEvent::Error(err) => {
            // A worker that never started will not answer the queued load.
            if err.context() == UiErrorContext::BackendStartup
                && *state.catalog.status() == CatalogStatus::Loading
            {
                state
                    .catalog
                    .finish_load(Err(ClientError::Transport(err.message().to_string())));
            }
            Reaction::Error(err)
        }
    }
}
