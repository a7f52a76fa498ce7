//! Sponsorship form: envelope selection, field editing and the submit
//! lifecycle.
//!
//! The form moves between three phases:
//!
//! * `Idle` - nothing selected.
//! * `Editing` - an envelope is selected and the fields are being filled.
//! * `Submitting` - a request built by [`SponsorshipForm::begin_submit`] is in
//!   flight. Selection and fields stay editable, but a second submit is
//!   refused until [`SponsorshipForm::finish_submit`] runs.
//!
//! The request is snapshotted when the submit begins, so re-selecting while a
//! submit is in flight never changes which envelope that submit sponsors.

use std::fmt;

use shared::{
    domain::{Envelope, EnvelopeNumber},
    protocol::SponsorshipRequest,
};
use tracing::{debug, info, warn};

use crate::{catalog::Catalog, error::ClientError, notify::Notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Address,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Address];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Address => "Mailing Address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Address => "address",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
}

/// A submit that has left the form. Hand it back to `finish_submit` together
/// with the server outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    id: u64,
    request: SponsorshipRequest,
}

impl SubmissionTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &SponsorshipRequest {
        &self.request
    }

    pub fn envelope_number(&self) -> EnvelopeNumber {
        self.request.envelope_number
    }
}

#[derive(Debug, Clone, Default)]
pub struct SponsorshipForm {
    selected: Option<Envelope>,
    name: String,
    email: String,
    address: String,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl SponsorshipForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FormPhase {
        if self.in_flight.is_some() {
            FormPhase::Submitting
        } else if self.selected.is_some() {
            FormPhase::Editing
        } else {
            FormPhase::Idle
        }
    }

    pub fn selected(&self) -> Option<&Envelope> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, number: EnvelopeNumber) -> bool {
        self.selected.is_some_and(|envelope| envelope.number == number)
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Address => &self.address,
        }
    }

    /// Selects an envelope from the catalog. Entered fields are kept so the
    /// user can switch envelopes without retyping. Returns whether the
    /// selection changed.
    pub fn select(&mut self, catalog: &Catalog, number: EnvelopeNumber) -> Result<bool, ClientError> {
        let envelope = *catalog
            .get(number)
            .ok_or(ClientError::UnknownEnvelope(number))?;
        if self.is_selected(number) {
            return Ok(false);
        }
        debug!(envelope_number = number.0, "envelope selected");
        self.selected = Some(envelope);
        Ok(true)
    }

    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Address => self.address = value,
        }
    }

    /// Builds the request the current state would submit, applying the
    /// required-field and email-format checks a browser form performs.
    pub fn compose(&self) -> Result<SponsorshipRequest, ClientError> {
        let envelope = self.selected.ok_or(ClientError::NoSelection)?;
        if self.name.is_empty() {
            return Err(ClientError::MissingField(Field::Name));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ClientError::MissingField(Field::Email));
        }
        if !is_valid_email(email) {
            return Err(ClientError::InvalidEmail);
        }
        if self.address.is_empty() {
            return Err(ClientError::MissingField(Field::Address));
        }

        Ok(SponsorshipRequest {
            envelope_number: envelope.number,
            name: self.name.clone(),
            email: email.to_string(),
            address: self.address.clone(),
        })
    }

    /// Moves to `Submitting` and snapshots the request. A failed guard leaves
    /// the form untouched.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, ClientError> {
        if self.in_flight.is_some() {
            return Err(ClientError::SubmissionInFlight);
        }
        let request = self.compose()?;

        let id = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.in_flight = Some(id);
        info!(
            envelope_number = request.envelope_number.0,
            ticket = id,
            "sponsorship submit started"
        );
        Ok(SubmissionTicket { id, request })
    }

    /// Applies the server outcome of a submit. Success clears the selection
    /// and every field; failure keeps everything for a manual retry. Returns
    /// the notice to show, or `None` for a ticket that is no longer current.
    pub fn finish_submit(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<(), ClientError>,
    ) -> Option<Notice> {
        if self.in_flight != Some(ticket.id) {
            warn!(ticket = ticket.id, "ignoring outcome for stale submission");
            return None;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                info!(
                    envelope_number = ticket.envelope_number().0,
                    "sponsorship accepted"
                );
                self.reset();
                Some(Notice::sponsorship_succeeded())
            }
            Err(err) => {
                warn!(
                    envelope_number = ticket.envelope_number().0,
                    "sponsorship failed: {err}"
                );
                Some(Notice::sponsorship_failed())
            }
        }
    }

    fn reset(&mut self) {
        self.selected = None;
        self.name.clear();
        self.email.clear();
        self.address.clear();
    }
}

/// Mirrors the HTML `type="email"` check: `local@label(.label)*` with no
/// whitespace.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_email_local_char) {
        return false;
    }
    !domain.is_empty() && domain.split('.').all(is_domain_label)
}

fn is_email_local_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn is_domain_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        && bytes.first() != Some(&b'-')
        && bytes.last() != Some(&b'-')
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
