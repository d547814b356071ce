//! Peasant/Elite Bargaining Simulation
//!
//! Runs one configured bargaining game and writes its round records as
//! JSON Lines for downstream plotting.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bargain_core::output::{write_summary, JsonlReporter};
use bargain_core::{
    build_driver, default_config_toml, initial_payoffs, AllocationPolicy, BargainingFormula,
    DecisionPolicy, Preset, SimConfig, UtilityPolicy,
};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "bargain_sim")]
#[command(about = "Two-party peasant/elite bargaining simulation")]
struct Args {
    /// TOML run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Policy preset, applied before individual policy overrides
    #[arg(long)]
    preset: Option<Preset>,

    #[arg(long)]
    bargaining_formula: Option<BargainingFormula>,

    #[arg(long)]
    utility_policy: Option<UtilityPolicy>,

    #[arg(long)]
    decision_policy: Option<DecisionPolicy>,

    #[arg(long)]
    allocation_policy: Option<AllocationPolicy>,

    #[arg(long)]
    resilience_damping: Option<f64>,

    /// Number of rounds to play
    #[arg(long)]
    rounds: Option<u64>,

    /// Fraction of realized utility reinvested each round
    #[arg(long)]
    scale: Option<f64>,

    /// Round log output (JSON Lines)
    #[arg(long, default_value = "output/rounds.jsonl")]
    output: PathBuf,

    /// Run summary output (JSON)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Print both agents' starting payoffs and exit
    #[arg(long)]
    print_initial: bool,

    /// Print the default configuration file and exit
    #[arg(long)]
    dump_config: bool,

    /// Log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn resolve_config(&self) -> Result<SimConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_file(path)?,
            None => SimConfig::default(),
        };

        if let Some(preset) = self.preset {
            config.policy = preset.config();
        }
        if let Some(formula) = self.bargaining_formula {
            config.policy = config.policy.with_formula(formula);
        }
        if let Some(policy) = self.utility_policy {
            config.policy = config.policy.with_utility(policy);
        }
        if let Some(policy) = self.decision_policy {
            config.policy = config.policy.with_decision(policy);
        }
        if let Some(policy) = self.allocation_policy {
            config.policy = config.policy.with_allocation(policy);
        }
        if let Some(damping) = self.resilience_damping {
            config.policy = config.policy.with_resilience_damping(damping);
        }
        if let Some(rounds) = self.rounds {
            config.simulation.rounds = rounds;
        }
        if let Some(scale) = self.scale {
            config.simulation.scale = scale;
        }

        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.resolve_config()?;

    if args.print_initial {
        let payoffs = initial_payoffs(&config)?;
        println!("peasant_u={:.3}", payoffs.peasant.util);
        println!("elite_u={:.3}", payoffs.elite.util);
        return Ok(());
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut driver = build_driver(&config)?;
    let mut log = JsonlReporter::new(&args.output)?;
    let summary = driver.run(config.simulation.rounds, &mut log)?;

    tracing::info!(
        records = log.record_count(),
        path = %args.output.display(),
        "Wrote round log"
    );
    if let Some(last) = summary.final_utility {
        println!("final peasant_u={:.3} elite_u={:.3}", last.peasant, last.elite);
    }
    if let Some(rate) = summary.agreement_rate {
        println!("agreement rate {:.1}%", rate * 100.0);
    }

    if let Some(path) = &args.summary {
        write_summary(&summary, path)?;
        tracing::info!(path = %path.display(), "Wrote run summary");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.dump_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
