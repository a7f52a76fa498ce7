//! Backend commands queued from UI to backend worker.

use client_core::SubmissionTicket;

#[derive(Debug)]
pub enum BackendCommand {
    LoadCatalog,
    SubmitSponsorship { ticket: SubmissionTicket },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadCatalog => "load_catalog",
            BackendCommand::SubmitSponsorship { .. } => "submit_sponsorship",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
