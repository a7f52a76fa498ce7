//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{ClientSettings, EnvelopeApi, HttpEnvelopeApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: ClientSettings,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let api = match HttpEnvelopeApi::from_settings(&settings) {
            Ok(api) => api,
            Err(err) => {
                tracing::error!(server_url = %settings.server_url, "backend: invalid settings: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_client_error(
                    UiErrorContext::BackendStartup,
                    &err,
                )));
                return;
            }
        };

        let _ = ui_tx.try_send(UiEvent::BackendReady);
        runtime.block_on(serve_commands(&api, &cmd_rx, &ui_tx));
        tracing::info!("backend worker stopped");
    })
}

/// Runs commands until shutdown, a dropped command queue, or a UI that went
/// away. Results are delivered with a blocking send so a busy UI never loses
/// the outcome of an in-flight submit.
pub async fn serve_commands<A: EnvelopeApi>(
    api: &A,
    cmd_rx: &Receiver<BackendCommand>,
    ui_tx: &Sender<UiEvent>,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        let event = match cmd {
            BackendCommand::LoadCatalog => {
                tracing::info!("backend: load_catalog");
                UiEvent::CatalogLoaded(api.list_envelopes().await)
            }
            BackendCommand::SubmitSponsorship { ticket } => {
                tracing::info!(
                    envelope_number = ticket.envelope_number().0,
                    ticket = ticket.id(),
                    "backend: submit_sponsorship"
                );
                let result = api.submit_sponsorship(ticket.request()).await;
                if let Err(err) = &result {
                    tracing::error!(
                        envelope_number = ticket.envelope_number().0,
                        "backend: submit_sponsorship failed: {err}"
                    );
                }
                UiEvent::SponsorshipFinished { ticket, result }
            }
            BackendCommand::Shutdown => break,
        };

        if ui_tx.send(event).is_err() {
            tracing::info!("backend: ui receiver dropped; discarding result");
            break;
        }
    }
}
