//! Teeter: policy-gradient training for cart-pole balancing.
//!
//! Provides one subcommand per algorithm:
//!
//! - `a2c` -- advantage actor-critic
//! - `ppo` -- proximal policy optimization with a clipped surrogate
//!
//! Both train against the built-in cart-pole simulation until the smoothed
//! running reward clears the solve threshold, then run a short greedy
//! evaluation and exit. Hyperparameters have built-in defaults; a JSON file
//! passed via `--config` can override them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::backend::{Autodiff, NdArray};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use teeter::config::TeeterConfig;
use teeter::env::cartpole::{CartPoleConfig, CartPoleEnv};
use teeter::env::Environment;
use teeter::training::{A2cAgent, PpoAgent, PolicyGradient, TrainerSession, TrainingReport};

type Backend = Autodiff<NdArray>;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Teeter: policy-gradient training for cart-pole balancing.
#[derive(Parser)]
#[command(name = "teeter", version, about)]
struct Cli {
    /// Path to a JSON configuration file (uses defaults if not provided).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for action sampling and environment reset noise.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train with advantage actor-critic.
    A2c,

    /// Train with proximal policy optimization.
    Ppo,
}

// ---------------------------------------------------------------------------
// Entrypoint
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // Initialise tracing (reads RUST_LOG env var, defaults to info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load or create configuration.
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str::<TeeterConfig>(&text)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        }
        None => TeeterConfig::default(),
    };

    let device = <Backend as burn::tensor::backend::Backend>::Device::default();
    let env = make_env(cli.seed);

    match cli.command {
        Commands::A2c => {
            let agent = A2cAgent::<Backend>::new(
                env.state_dim(),
                env.action_dim(),
                config.a2c.clone(),
                device.clone(),
            );
            run_session(env, agent, &config, cli.seed, device)
        }
        Commands::Ppo => {
            let agent = PpoAgent::<Backend>::new(
                env.state_dim(),
                env.action_dim(),
                config.ppo.clone(),
                device.clone(),
            );
            run_session(env, agent, &config, cli.seed, device)
        }
    }
}

fn run_session<A: PolicyGradient<Backend>>(
    env: CartPoleEnv,
    agent: A,
    config: &TeeterConfig,
    seed: Option<u64>,
    device: <Backend as burn::tensor::backend::Backend>::Device,
) -> Result<()> {
    let mut session = TrainerSession::new(env, agent, config.run.clone(), seed, device);
    let report = session.run()?;
    summarize(&report);
    Ok(())
}

fn summarize(report: &TrainingReport) {
    tracing::info!(
        episodes = report.episodes,
        running_reward = report.running_reward,
        solved = report.solved,
        "training finished"
    );
    for (episode, length) in report.eval_lengths.iter().copied().enumerate() {
        tracing::info!(episode = episode + 1, length, "evaluation summary");
    }
}

fn make_env(seed: Option<u64>) -> CartPoleEnv {
    match seed {
        Some(seed) => CartPoleEnv::with_seed(CartPoleConfig::default(), seed),
        None => CartPoleEnv::new(CartPoleConfig::default()),
    }
}
