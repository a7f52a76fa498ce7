use std::{collections::VecDeque, time::Duration};

use chrono::Local;
use client_core::{CatalogStatus, ChallengeState, ClientSettings, Field, FormPhase, Notice, NoticeKind};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Envelope, EnvelopeNumber};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    command_undelivered, mount_command, reduce, submit_command, Reaction,
};
use crate::ui::theme;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub request_timeout_secs: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

impl From<&ClientSettings> for StartupConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            server_url: settings.server_url.clone(),
            request_timeout_secs: settings.request_timeout_secs,
        }
    }
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    server_url: String,
    request_timeout_secs: u64,
    state: ChallengeState,
    notices: VecDeque<Notice>,
    form_error: Option<UiError>,
    status: String,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            server_url: startup.server_url,
            request_timeout_secs: startup.request_timeout_secs,
            state: ChallengeState::default(),
            notices: VecDeque::new(),
            form_error: None,
            status: "Loading envelopes...".to_string(),
        };
        app.mount();
        app
    }

    fn mount(&mut self) {
        if let Some(cmd) = mount_command(&mut self.state) {
            self.dispatch(cmd);
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        if let Err(cmd) = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            tracing::warn!(command = cmd.name(), "backend command was not delivered");
            if let Some(notice) = command_undelivered(&mut self.state, cmd) {
                self.notices.push_back(notice);
            }
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match reduce(&mut self.state, event) {
                Reaction::Nothing => {}
                Reaction::Status(message) => self.status = message,
                Reaction::Notice(notice) => self.notices.push_back(notice),
                Reaction::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.hint();
                    if err.context() == UiErrorContext::Sponsorship {
                        self.form_error = Some(err);
                    }
                }
            }
        }
    }

    fn select(&mut self, number: EnvelopeNumber) {
        match self.state.form.select(&self.state.catalog, number) {
            Ok(_) => self.form_error = None,
            Err(err) => {
                self.form_error = Some(UiError::from_client_error(
                    UiErrorContext::Sponsorship,
                    &err,
                ))
            }
        }
    }

    fn try_submit(&mut self) {
        match submit_command(&mut self.state) {
            Ok(cmd) => {
                self.form_error = None;
                self.dispatch(cmd);
            }
            Err(err) => self.form_error = Some(err),
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(
                egui::RichText::new("Rotary Envelope Challenge")
                    .size(30.0)
                    .strong()
                    .color(theme::HEADING),
            );
            ui.label(
                egui::RichText::new("Help support our community initiatives!")
                    .size(16.0)
                    .color(theme::MUTED),
            );
            ui.add_space(16.0);
        });
    }

    fn show_envelopes(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Available Envelopes")
                .size(20.0)
                .strong()
                .color(theme::HEADING),
        );
        ui.add_space(8.0);

        if *self.state.catalog.status() == CatalogStatus::Loading {
            ui.label(egui::RichText::new("Loading envelopes...").color(theme::MUTED));
            return;
        }

        let mut clicked = None;
        egui::Grid::new("envelope_grid")
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (index, envelope) in self.state.catalog.envelopes().iter().enumerate() {
                    let selected = self.state.form.is_selected(envelope.number);
                    if envelope_card(ui, envelope, selected).clicked() {
                        clicked = Some(envelope.number);
                    }
                    if (index + 1) % theme::GRID_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });
        if let Some(number) = clicked {
            self.select(number);
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let Some(envelope) = self.state.form.selected().copied() else {
            return;
        };

        ui.add_space(24.0);
        egui::Frame::new()
            .fill(egui::Color32::WHITE)
            .stroke(theme::card_stroke())
            .corner_radius(8.0)
            .inner_margin(egui::Margin::same(16))
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(format!("Sponsor Envelope #{}", envelope.number))
                        .size(20.0)
                        .strong()
                        .color(theme::HEADING),
                );
                ui.add_space(8.0);

                let mut submit_requested = false;
                for field in Field::ALL {
                    ui.label(egui::RichText::new(field.label()).color(theme::MUTED));
                    let mut value = self.state.form.field(field).to_owned();
                    let editor = match field {
                        Field::Address => egui::TextEdit::multiline(&mut value).desired_rows(3),
                        Field::Name | Field::Email => egui::TextEdit::singleline(&mut value),
                    };
                    let response = ui.add(editor.desired_width(f32::INFINITY));
                    if response.changed() {
                        self.state.form.update_field(field, value);
                    }
                    // Enter in a single-line field submits, like a browser form.
                    if field != Field::Address
                        && response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    {
                        submit_requested = true;
                    }
                    ui.add_space(6.0);
                }

                let submitting = self.state.form.phase() == FormPhase::Submitting;
                let label = if submitting {
                    "Sponsoring..."
                } else {
                    "Sponsor Envelope"
                };
                let button = egui::Button::new(
                    egui::RichText::new(label).color(egui::Color32::WHITE),
                )
                .fill(theme::ACCENT)
                .min_size(egui::vec2(ui.available_width(), 32.0));
                if ui.add_enabled(!submitting, button).clicked() {
                    submit_requested = true;
                }
                if submit_requested && !submitting {
                    self.try_submit();
                }

                if let Some(err) = &self.form_error {
                    ui.colored_label(theme::ERROR, err.hint());
                }
            });
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.add_space(32.0);
        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new("© 2023 Rotary Club. All rights reserved.")
                    .small()
                    .color(theme::MUTED),
            );
            ui.label(
                egui::RichText::new(format!(
                    "{} | {} ({}s timeout)",
                    self.status, self.server_url, self.request_timeout_secs
                ))
                    .small()
                    .color(theme::MUTED),
            );
        });
    }

    fn show_notice_modal(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };

        let mut acknowledged = false;
        egui::Modal::new(egui::Id::new("sponsorship_notice")).show(ctx, |ui| {
            ui.set_width(320.0);
            let color = match notice.kind {
                NoticeKind::Success => theme::HEADING,
                NoticeKind::Failure => theme::ERROR,
            };
            ui.label(egui::RichText::new(&notice.message).color(color));
            ui.label(
                egui::RichText::new(
                    notice
                        .at
                        .with_timezone(&Local)
                        .format("%H:%M:%S")
                        .to_string(),
                )
                .small()
                .color(theme::MUTED),
            );
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                acknowledged = true;
            }
        });
        if acknowledged {
            self.notices.pop_front();
        }
    }
}

fn envelope_card(ui: &mut egui::Ui, envelope: &Envelope, selected: bool) -> egui::Response {
    let text = egui::RichText::new(format!(
        "Envelope #{}\n$ {}",
        envelope.number,
        envelope.amount.dollars_text()
    ))
    .color(theme::HEADING);
    let stroke = if selected {
        theme::selected_card_stroke()
    } else {
        theme::card_stroke()
    };
    ui.add(
        egui::Button::new(text)
            .fill(theme::CARD_FILL)
            .stroke(stroke)
            .corner_radius(6.0)
            .min_size(egui::vec2(theme::CARD_SIZE[0], theme::CARD_SIZE[1]))
            .selected(selected),
    )
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_max_width(theme::CONTENT_MAX_WIDTH);
                self.show_header(ui);
                self.show_envelopes(ui);
                self.show_form(ui);
                self.show_footer(ui);
            });
        });
        self.show_notice_modal(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

impl Drop for DesktopGuiApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.try_send(BackendCommand::Shutdown);
    }
}
