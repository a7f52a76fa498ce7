use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, EnvelopeApi, EnvelopeChallenge, Field, FormPhase, HttpEnvelopeApi, Notice,
    NoticeKind, Notifier, SubmitOutcome,
};
use shared::domain::{Envelope, EnvelopeNumber};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod session;

use session::{parse_line, SessionCommand, HELP};

#[derive(Parser, Debug)]
#[command(name = "envelopes", about = "Rotary Envelope Challenge client")]
struct Args {
    /// Overrides `server_url` from envelopes.toml / APP__SERVER_URL.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the envelopes available for sponsorship.
    List,
    /// Sponsor one envelope in a single shot.
    Sponsor {
        #[arg(long)]
        envelope: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        address: String,
    },
    /// Interactive select / fill / submit loop on stdin.
    Session,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Success => println!("{}", notice.message),
            NoticeKind::Failure => eprintln!("{}", notice.message),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = timeout_secs;
    }
    tracing::debug!(server_url = %settings.server_url, "using envelope server");

    let api = HttpEnvelopeApi::from_settings(&settings).context("invalid client settings")?;
    let mut challenge = EnvelopeChallenge::new(api, Arc::new(ConsoleNotifier));
    challenge.mount().await;

    match args.command {
        Command::List => {
            print_catalog(challenge.envelopes(), None);
            Ok(())
        }
        Command::Sponsor {
            envelope,
            name,
            email,
            address,
        } => {
            challenge
                .select(EnvelopeNumber(envelope))
                .with_context(|| format!("cannot sponsor envelope #{envelope}"))?;
            challenge.update_field(Field::Name, name);
            challenge.update_field(Field::Email, email);
            challenge.update_field(Field::Address, address);
            match challenge.submit().await? {
                SubmitOutcome::Accepted => Ok(()),
                SubmitOutcome::Rejected(err) => bail!("sponsorship rejected: {err}"),
                SubmitOutcome::Abandoned => bail!("sponsorship abandoned"),
            }
        }
        Command::Session => run_session(&mut challenge).await,
    }
}

fn print_catalog(envelopes: &[Envelope], selected: Option<EnvelopeNumber>) {
    if envelopes.is_empty() {
        println!("No envelopes available.");
        return;
    }
    for envelope in envelopes {
        let marker = if Some(envelope.number) == selected { '*' } else { ' ' };
        println!("{}", format_envelope_row(envelope, marker));
    }
}

fn format_envelope_row(envelope: &Envelope, marker: char) -> String {
    format!(
        "{marker} Envelope #{:<5} {:>10}",
        envelope.number.0,
        format!("$ {}", envelope.amount.dollars_text())
    )
}

async fn run_session<A: EnvelopeApi>(challenge: &mut EnvelopeChallenge<A>) -> Result<()> {
    println!("Rotary Envelope Challenge - help support our community initiatives!");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            SessionCommand::List => {
                let selected = challenge.state().form.selected().map(|e| e.number);
                print_catalog(challenge.envelopes(), selected);
            }
            SessionCommand::Select(number) => match challenge.select(number) {
                Ok(_) => println!("Sponsor Envelope #{number}"),
                Err(err) => eprintln!("{err}"),
            },
            SessionCommand::Set(field, value) => {
                if challenge.state().form.phase() == FormPhase::Idle {
                    eprintln!("select an envelope first");
                } else {
                    challenge.update_field(field, value);
                }
            }
            SessionCommand::Show => print_draft(challenge),
            SessionCommand::Submit => {
                if let Err(err) = challenge.submit().await {
                    eprintln!("{err}");
                }
            }
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Quit => break,
        }
    }

    challenge.unmount();
    Ok(())
}

fn print_draft<A: EnvelopeApi>(challenge: &EnvelopeChallenge<A>) {
    let form = &challenge.state().form;
    let Some(envelope) = form.selected() else {
        println!("No envelope selected.");
        return;
    };
    println!("Sponsor Envelope #{} ({})", envelope.number, envelope.amount);
    for field in Field::ALL {
        println!("  {:<16} {}", format!("{}:", field.label()), form.field(field));
    }
}
