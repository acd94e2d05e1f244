//! VIGIA Reference Screens: Demo CLI
//!
//! Runs the reference scenarios, or a single scripted self-diagnosis built
//! from command-line answers.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- diagnose --symptom fever --illness diabetes \
//!       --travel no --confirmed-contact no --suspected-contact yes --age 42
//!   cargo run -p demo -- track [--denied]
//!   cargo run -p demo -- alerts
//!   cargo run -p demo -- --config vigia.toml run-all

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vigia_config::AppConfig;
use vigia_contracts::{
    answer::{Answer, AnswerUpdate, ContactQuestion, Illness, Selection, Symptom},
    error::VigiaResult,
};
use vigia_ref_mobile::scenarios::{
    location_alerts, map_tracking,
    self_diagnosis::{self, DiagnosisScript},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIA: self-diagnosis questionnaire and location alerts demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "VIGIA reference screens demo",
    long_about = "Runs the VIGIA reference screens against a simulated phone:\n\
                  self-diagnosis, map tracking with alert zones, and location alerts."
)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Fill in the questionnaire from the given answers and submit it.
    Diagnose(DiagnoseArgs),
    /// Scenario 2: map tracking along a simulated walk.
    Track {
        /// Simulate a device that refuses location access.
        #[arg(long)]
        denied: bool,
    },
    /// Scenario 3: location alerts status line.
    Alerts,
}

#[derive(clap::Args)]
struct DiagnoseArgs {
    /// Symptom to tick. Repeatable.
    #[arg(long = "symptom")]
    symptoms: Vec<Symptom>,

    /// Pre-existing condition to tick. Repeatable.
    #[arg(long = "illness")]
    illnesses: Vec<Illness>,

    /// Travelled abroad recently (yes/no).
    #[arg(long)]
    travel: Option<Answer>,

    /// Contact with a confirmed case (yes/no).
    #[arg(long)]
    confirmed_contact: Option<Answer>,

    /// Contact with a suspected case (yes/no).
    #[arg(long)]
    suspected_contact: Option<Answer>,

    /// Age, as typed.
    #[arg(long)]
    age: Option<String>,
}

impl DiagnoseArgs {
    fn into_script(self) -> DiagnosisScript {
        let selections = self
            .symptoms
            .into_iter()
            .map(Selection::Symptom)
            .chain(self.illnesses.into_iter().map(Selection::Illness))
            .collect();

        let contacts = [
            (ContactQuestion::Travel, self.travel),
            (ContactQuestion::ConfirmedContact, self.confirmed_contact),
            (ContactQuestion::SuspectedContact, self.suspected_contact),
        ];
        let answers = contacts
            .into_iter()
            .filter_map(|(question, answer)| answer.map(|a| AnswerUpdate::Contact(question, a)))
            .chain(self.age.map(AnswerUpdate::Age))
            .collect();

        DiagnosisScript {
            selections,
            answers,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = AppConfig::load(cli.config.as_deref()).and_then(|config| {
        info!(
            contacts = config.emergency_contacts.len(),
            zones = config.alert_zones.len(),
            outcome = %config.classification.outcome,
            "configuration loaded"
        );
        dispatch(cli.command, &config)
    });

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn dispatch(command: Command, config: &AppConfig) -> VigiaResult<()> {
    match command {
        Command::RunAll => {
            self_diagnosis::run_scenario(config)?;
            map_tracking::run_scenario(config, false)?;
            location_alerts::run_scenario(config)
        }
        Command::Diagnose(args) => {
            println!("=== Self-diagnosis ===");
            println!();
            self_diagnosis::run_script(config, &args.into_script()).map(|_| ())
        }
        Command::Track { denied } => map_tracking::run_scenario(config, denied),
        Command::Alerts => location_alerts::run_scenario(config),
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VIGIA: Self-diagnosis and Location Alerts");
    println!("Reference Screens Demo");
    println!("==========================================");
    println!();
    println!("Questionnaire: submit appears once every question is answered:");
    println!("  [1] at least one symptom and one pre-existing condition ticked");
    println!("  [2] travel, confirmed-contact and suspected-contact answered");
    println!("  [3] an age greater than zero");
    println!("Location: background task → mailbox → hub pump → subscribed screens");
    println!();
}
