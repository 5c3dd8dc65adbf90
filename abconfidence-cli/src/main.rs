use abconfidence::{
    await_ready, estimate, run_experiments_find_confidence_and_power, AbError, BetaParams,
    BinomialType, ComparisonMethod, Delta, DeltaType, EstimateOptions, ExperimentReport,
    PairwiseMethod, SimulationConfig,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "abconfidence", version, about = "Bayesian A/B test confidence tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate experiments and print the empirical confidence/power report as JSON
    Run(RunArgs),
    /// Run simulations over a grid of significance levels and sample sizes
    Sweep(SweepArgs),
    /// Estimate P(A < B) for two observed arms
    Estimate(EstimateArgs),
}

#[derive(Args)]
struct RunArgs {
    /// JSON config file; flags are ignored when set
    #[arg(long, env = "ABCONFIDENCE_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "ABCONFIDENCE_SIGNIFICANCE", default_value_t = 0.1)]
    significance: f64,
    #[command(flatten)]
    harness: HarnessArgs,
}

#[derive(Args)]
struct SweepArgs {
    #[arg(long, value_delimiter = ',', default_value = "0.01,0.05,0.1")]
    alphas: Vec<f64>,
    #[arg(long, value_delimiter = ',', default_value = "10,100,1000")]
    sample_sizes: Vec<u64>,
    #[command(flatten)]
    harness: HarnessArgs,
}

#[derive(Args, Clone)]
struct HarnessArgs {
    #[arg(long, env = "ABCONFIDENCE_EXPERIMENTS", default_value_t = 1000)]
    experiments: u64,
    #[arg(long, env = "ABCONFIDENCE_PER_EXPERIMENT", default_value_t = 100)]
    per_experiment: u64,
    /// normalApprox, summation, integration or monteCarlo
    #[arg(long, env = "ABCONFIDENCE_METHOD")]
    method: Option<ComparisonMethod>,
    #[command(flatten)]
    delta: DeltaArgs,
    #[arg(long, env = "ABCONFIDENCE_BINOMIAL", default_value = "optimized")]
    binomial: BinomialType,
    #[command(flatten)]
    tuning: TuningArgs,
    /// Base seed; sweep cells use seed + cell index
    #[arg(long, env = "ABCONFIDENCE_SEED")]
    seed: Option<u64>,
}

#[derive(Args, Clone)]
struct DeltaArgs {
    /// Minimum effect B must beat A by
    #[arg(long, env = "ABCONFIDENCE_DELTA", allow_hyphen_values = true)]
    delta: Option<f64>,
    /// constant, relative or logit
    #[arg(long, env = "ABCONFIDENCE_DELTA_TYPE", default_value = "constant")]
    delta_type: DeltaType,
}

#[derive(Args, Clone)]
struct TuningArgs {
    #[arg(long, default_value_t = abconfidence::constants::MONTE_CARLO_DEFAULT_SAMPLE_SIZE)]
    samples: usize,
    #[arg(long, default_value_t = abconfidence::constants::NUMERICAL_INTEGRAL_DEFAULT_STEPS)]
    steps: usize,
    /// naive or mann-whitney
    #[arg(long, default_value = "mann-whitney")]
    pairwise: PairwiseMethod,
}

#[derive(Args)]
struct EstimateArgs {
    /// Arm A as successes,failures
    #[arg(long, value_parser = parse_counts)]
    a: BetaParams,
    /// Arm B as successes,failures
    #[arg(long, value_parser = parse_counts)]
    b: BetaParams,
    #[arg(long)]
    method: Option<ComparisonMethod>,
    #[command(flatten)]
    delta: DeltaArgs,
    #[command(flatten)]
    tuning: TuningArgs,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SweepCell {
    significance: f64,
    n_per_experiment: u64,
    report: ExperimentReport,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateOutput {
    method: ComparisonMethod,
    a: BetaParams,
    b: BetaParams,
    delta: Option<Delta>,
    probability: f64,
}

impl DeltaArgs {
    fn resolve(&self) -> Option<Delta> {
        self.delta.map(|value| Delta {
            kind: self.delta_type,
            value,
        })
    }
}

impl TuningArgs {
    fn options(&self) -> EstimateOptions {
        EstimateOptions {
            samples: self.samples,
            steps: self.steps,
            pairwise: self.pairwise,
        }
    }
}

impl HarnessArgs {
    fn to_config(&self, significance: f64, n_per_experiment: u64) -> SimulationConfig {
        let mut config = SimulationConfig::new(self.experiments, n_per_experiment, significance);
        config.delta = self.delta.resolve();
        config.binomial_type = self.binomial;
        config.comparison_method = self.method;
        config.monte_carlo_samples = self.tuning.samples;
        config.integration_steps = self.tuning.steps;
        config.pairwise_method = self.tuning.pairwise;
        config.seed = self.seed;
        config
    }
}

fn parse_counts(s: &str) -> Result<BetaParams, String> {
    let (successes, failures) = s
        .split_once(',')
        .ok_or_else(|| format!("expected successes,failures but got '{}'", s))?;
    let successes: u64 = successes
        .trim()
        .parse()
        .map_err(|e| format!("invalid successes '{}': {}", successes, e))?;
    let failures: u64 = failures
        .trim()
        .parse()
        .map_err(|e| format!("invalid failures '{}': {}", failures, e))?;
    Ok(BetaParams::from_counts(successes, failures))
}

fn run_config(args: &RunArgs) -> Result<SimulationConfig, AbError> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => args.harness.to_config(args.significance, args.harness.per_experiment),
    };
    config.validate()?;
    Ok(config)
}

fn sweep_configs(args: &SweepArgs) -> Result<Vec<SimulationConfig>, AbError> {
    let mut configs = Vec::with_capacity(args.alphas.len() * args.sample_sizes.len());
    for &alpha in &args.alphas {
        for &n in &args.sample_sizes {
            let mut config = args.harness.to_config(alpha, n);
            config.seed = args.harness.seed.map(|s| s.wrapping_add(configs.len() as u64));
            config.validate()?;
            configs.push(config);
        }
    }
    Ok(configs)
}

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = run_config(&args)?;
    let report =
        tokio::task::spawn_blocking(move || run_experiments_find_confidence_and_power(&config))
            .await??;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn sweep(args: SweepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let configs = sweep_configs(&args)?;
    tracing::info!("Sweeping {} cells", configs.len());

    let handles: Vec<_> = configs
        .into_iter()
        .map(|config| {
            tokio::task::spawn_blocking(move || {
                run_experiments_find_confidence_and_power(&config).map(|report| SweepCell {
                    significance: config.significance,
                    n_per_experiment: config.n_per_experiment,
                    report,
                })
            })
        })
        .collect();

    // Awaited in spawn order so output follows the grid.
    for handle in handles {
        let cell = handle.await??;
        println!("{}", serde_json::to_string(&cell)?);
    }
    Ok(())
}

fn estimate_one(args: &EstimateArgs) -> Result<EstimateOutput, AbError> {
    let delta = args.delta.resolve();
    let method = args
        .method
        .unwrap_or_else(|| ComparisonMethod::default_for(delta.as_ref()));
    let probability = estimate(method, &args.a, &args.b, delta.as_ref(), &args.tuning.options())?
        .ok_or_else(|| AbError::ComparisonFailed {
            method: method.to_string(),
        })?;
    Ok(EstimateOutput {
        method,
        a: args.a,
        b: args.b,
        delta,
        probability,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !await_ready() {
        tracing::warn!("Special-function self-check failed; estimates may be unreliable");
    }

    let result = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Sweep(args) => sweep(args).await,
        Command::Estimate(args) => print_estimate(&args),
    };
    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_estimate(args: &EstimateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let output = estimate_one(args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
