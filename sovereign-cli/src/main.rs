//! Sovereign CLI
//!
//! Operates on a local snapshot of identities. Each mutating command loads
//! the snapshot, runs one operation as `--caller`, and writes it back.
//!
//! ## Usage
//!
//! ```bash
//! # Create your own identity
//! sovereignctl --caller <hex> create
//!
//! # Delegate the trading dimension to an oracle
//! sovereignctl --caller <owner> set-authority <owner> trading <oracle>
//!
//! # Submit a score as the oracle
//! sovereignctl --caller <oracle> update-score <identity-address> trading 7500
//!
//! # Read
//! sovereignctl show <owner>
//! sovereignctl tier <owner>
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use sovereign::{
    identity_address, tier_name, Address, DetailMetrics, Dimension, DimensionScores, Principal,
    Sovereign, SovereignConfig, SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "sovereignctl")]
#[command(about = "Multi-dimensional reputation identities")]
struct Cli {
    /// Path to config file
    #[arg(short, long, env = "SOVEREIGN_CONFIG")]
    config: Option<PathBuf>,

    /// Storage directory (overrides config file)
    #[arg(long, env = "SOVEREIGN_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Principal acting on this invocation (hex)
    #[arg(long, env = "SOVEREIGN_CALLER")]
    caller: Option<Principal>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an identity owned by the caller
    Create,

    /// Point one dimension of an identity at a new authority
    SetAuthority {
        owner: Principal,
        dimension: Dimension,
        new_authority: Principal,
    },

    /// Write a dimension score as its authority
    UpdateScore {
        identity: Address,
        dimension: Dimension,
        score: u16,
    },

    /// Write detail metrics as the dimension authority
    Detail {
        identity: Address,
        /// e.g. '{"trading":{"win_rate_bps":6000,...}}'
        metrics: String,
    },

    /// Print an identity record (fails if absent)
    Show { owner: Principal },

    /// Print the dimension scores (defaults if absent)
    Scores { owner: Principal },

    /// Print the tier and composite (defaults if absent)
    Tier { owner: Principal },

    /// Print the derived identity address of an owner
    Address { owner: Principal },

    /// Compute a composite and tier without touching any record
    Composite {
        trading: u16,
        civic: u16,
        developer: u16,
        infra: u16,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sovereign=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SovereignConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SovereignConfig::default(),
    };
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    let snapshot_path = config.snapshot_path();
    debug!(snapshot = %snapshot_path.display(), "Using snapshot");

    // Pure commands do not need state.
    match &cli.command {
        Command::Address { owner } => {
            println!("{}", identity_address(owner));
            return Ok(());
        }
        Command::Composite {
            trading,
            civic,
            developer,
            infra,
        } => {
            let (composite, tier) =
                sovereign::compute(&DimensionScores::new(*trading, *civic, *developer, *infra));
            println!("composite {composite} tier {tier} ({})", tier_name(tier));
            return Ok(());
        }
        _ => {}
    }

    let state = Sovereign::load_snapshot(&snapshot_path, &config, Arc::new(SystemClock))
        .with_context(|| format!("loading snapshot {}", snapshot_path.display()))?;
    let caller = || cli.caller.context("--caller is required for this command");

    let mutated = match &cli.command {
        Command::Create => {
            let address = state.create_identity(caller()?)?;
            println!("{address}");
            true
        }
        Command::SetAuthority {
            owner,
            dimension,
            new_authority,
        } => {
            state.set_authority(&caller()?, owner, *dimension, *new_authority)?;
            true
        }
        Command::UpdateScore {
            identity,
            dimension,
            score,
        } => {
            let record = state.update_score(&caller()?, identity, *dimension, *score)?;
            println!(
                "composite {} tier {} ({})",
                record.composite_score(),
                record.tier(),
                tier_name(record.tier())
            );
            true
        }
        Command::Detail { identity, metrics } => {
            let metrics: DetailMetrics =
                serde_json::from_str(metrics).context("parsing detail metrics")?;
            state.upsert_detail(&caller()?, identity, metrics)?;
            true
        }
        Command::Show { owner } => {
            let record = state.get_identity(owner)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            false
        }
        Command::Scores { owner } => {
            println!("{}", serde_json::to_string_pretty(&state.get_scores(owner))?);
            false
        }
        Command::Tier { owner } => {
            let view = state.view_identity(owner);
            println!(
                "composite {} tier {} ({}){}",
                view.composite_score,
                view.tier,
                tier_name(view.tier),
                if view.exists { "" } else { " [no identity]" }
            );
            false
        }
        Command::Address { .. } | Command::Composite { .. } => false,
    };

    if mutated {
        state
            .save_snapshot(&snapshot_path)
            .with_context(|| format!("saving snapshot {}", snapshot_path.display()))?;
        info!("Done");
    }
    Ok(())
}
