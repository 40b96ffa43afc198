//! PROPEDGE — Contest Prop EV & Correlated Parlay Engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! reads a quote snapshot from disk, and runs one engine pass: odds
//! normalization → opportunity analysis → parlay generation → anchor
//! grouping, printed as a ranked report.

use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use propedge::config::AppConfig;
use propedge::engine::Engine;
use propedge::types::Snapshot;

const BANNER: &str = r#"
 ____  ____   ___  ____  _____ ____   ____ _____
|  _ \|  _ \ / _ \|  _ \| ____|  _ \ / ___| ____|
| |_) | |_) | | | | |_) |  _| | | | | |  _|  _|
|  __/|  _ <| |_| |  __/| |___| |_| | |_| | |___
|_|   |_| \_\\___/|_|   |_____|____/ \____|_____|

  Contest Prop EV & Correlated Parlay Engine
  v0.1.0
"#;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let snapshot_path = args
        .next()
        .context("Usage: propedge <snapshot.json> [config.toml]")?;
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    init_logging();
    let cfg = AppConfig::load_or_default(&config_path)?;

    println!("{BANNER}");
    info!(
        sport = %cfg.engine.sport,
        contest = %cfg.contest.contest_type,
        bankroll = %cfg.contest.bankroll,
        "PROPEDGE starting up"
    );

    let contents = fs::read_to_string(&snapshot_path)
        .with_context(|| format!("Failed to read snapshot file: {snapshot_path}"))?;
    let snapshot: Snapshot = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot file: {snapshot_path}"))?;

    let engine = Engine::new(&cfg);
    let report = engine.run(&snapshot)?;
    print!("{report}");

    info!(
        opportunities = report.opportunities.len(),
        parlays = report.parlays.len(),
        anchors = report.anchor_sections.len(),
        "Run complete"
    );
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("propedge=info"));

    let json_logging = std::env::var("PROPEDGE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
