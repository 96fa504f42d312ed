//! arb-cli — `run` drives the production queue consumer without the status
//! server; `dry-run` replays one scripted pair through a fully faked engine
//! and prints every emitted event, the Rust-native counterpart of the
//! Python audit/trial harnesses this system used to ship with.

use anyhow::{Context, Result};
use arb_gateway::MockProviderAdapter;
use arb_schemas::{BetOutcome, PairRequest, SettlementStatus};
use arb_testkit::Harness;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arb")]
#[command(about = "Bet-pair execution engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the production queue consumer against real collaborators,
    /// without the HTTP status server arb-daemon also exposes.
    Run,

    /// Replay one scripted pair request through a fully faked engine and
    /// print every emitted event as pretty JSON.
    DryRun {
        /// Path to a dry-run scenario document.
        scenario: PathBuf,
    },
}

/// A scenario document: the request plus the scripted provider responses
/// that drive it deterministically, since `dry-run` has no real provider to
/// talk to. `positive_outcome`/`hedge_outcome` carry their own ticket ids,
/// so the settlement statuses below can be queued against them up front.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DryRunScenario {
    request: PairRequest,
    positive_outcome: BetOutcome,
    hedge_outcome: BetOutcome,
    #[serde(default)]
    positive_statuses: Vec<SettlementStatus>,
    #[serde(default)]
    hedge_statuses: Vec<SettlementStatus>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    arb_daemon::bootstrap::init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Run => run().await,
        Commands::DryRun { scenario } => dry_run(&scenario).await,
    }
}

async fn run() -> Result<()> {
    let shutdown = tokio_util::sync::CancellationToken::new();
    let state = arb_daemon::bootstrap::bootstrap(shutdown.clone()).await?;

    let consumer_shutdown = shutdown.clone();
    let consumer = tokio::spawn(arb_daemon::bootstrap::run_consumer(state, consumer_shutdown));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received shutdown signal");
        }
        result = consumer => {
            tracing::error!(?result, "queue consumer loop exited unexpectedly");
        }
    }

    shutdown.cancel();
    Ok(())
}

async fn dry_run(scenario_path: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(scenario_path)
        .with_context(|| format!("reading scenario file {}", scenario_path.display()))?;
    let scenario: DryRunScenario =
        serde_json::from_str(&raw).with_context(|| format!("parsing scenario file {}", scenario_path.display()))?;

    let adapter = MockProviderAdapter::new();
    adapter.queue_outcome(scenario.request.positive_bet.bet_id.clone(), scenario.positive_outcome.clone());
    adapter.queue_outcome(scenario.request.hedge_bet.bet_id.clone(), scenario.hedge_outcome.clone());
    if let Some(ticket_id) = scenario.positive_outcome.ticket_id() {
        adapter.queue_statuses(ticket_id.to_string(), scenario.positive_statuses.clone());
    }
    if let Some(ticket_id) = scenario.hedge_outcome.ticket_id() {
        adapter.queue_statuses(ticket_id.to_string(), scenario.hedge_statuses.clone());
    }

    let harness = Harness::with_adapter(adapter);
    let outcome = harness.execute(scenario.request).await;
    eprintln!("execution outcome: {outcome:?}");

    if matches!(outcome, arb_execution::ExecutionOutcome::Success { .. }) {
        harness
            .wait_for(|| {
                let kinds = harness.reporter.kinds();
                kinds.contains(&"pair_reconciled") || kinds.contains(&"exposure_alert")
            })
            .await;
    }

    let events = harness.reporter.events();
    println!("{}", serde_json::to_string_pretty(&events)?);

    Ok(())
}
