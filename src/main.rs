use anyhow::Context;
use clap::{Parser, ValueEnum};
use deal_flow::config::PipelineConfig;
use deal_flow::engine::{Orchestrator, StrategyKind};
use deal_flow::ops::telemetry;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "deal-flow")]
#[command(about = "Extracts normalized product data from a storefront link")]
#[command(version)]
struct Args {
    /// Product or short/affiliate link to extract
    url: String,

    /// Extraction strategy
    #[arg(short, long, value_enum, default_value_t = StrategyArg::Heuristic)]
    strategy: StrategyArg,

    /// JSON file with known categories (`[{"id": ..., "name": ...}]`)
    #[arg(long)]
    categories_file: Option<PathBuf>,

    /// Hosted AI extraction endpoint (overrides DEAL_FLOW_AI_ENDPOINT)
    #[arg(long)]
    ai_endpoint: Option<String>,

    /// Pretty-print the extracted record
    #[arg(long)]
    pretty: bool,

    /// Print Prometheus metrics to stderr after the run
    #[arg(long)]
    metrics: bool,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    human_logs: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Heuristic,
    Ai,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Heuristic => StrategyKind::Heuristic,
            StrategyArg::Ai => StrategyKind::Ai,
        }
    }
}

fn build_config(args: &Args) -> anyhow::Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("Failed to read environment configuration")?;

    if let Some(path) = &args.categories_file {
        config.categories = PipelineConfig::load_categories(path)
            .with_context(|| format!("Failed to load categories from {}", path.display()))?;
    }
    if let Some(endpoint) = &args.ai_endpoint {
        config.ai_endpoint = Some(endpoint.clone());
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.human_logs {
        telemetry::init_tracing_pretty(&args.log_level);
    } else {
        telemetry::init_tracing_with_level(&args.log_level);
    }

    let config = build_config(&args)?;
    let orchestrator = Orchestrator::from_config(&config).context("Failed to initialize extraction pipeline")?;
    let strategy = StrategyKind::from(args.strategy);

    tracing::info!(url = %args.url, strategy = %strategy, categories = config.categories.len(), "Deal-Flow extraction started");

    let outcome = orchestrator.run(&args.url, strategy).await;

    if args.metrics {
        eprintln!("{}", telemetry::get_metrics_string());
    }

    match outcome {
        Ok(product) => {
            let json = if args.pretty {
                product.to_json_pretty()
            } else {
                product.to_json()
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("error[{}]: {e}", e.kind());
            eprintln!("hint: retry with --strategy {}", strategy.alternate());
            Ok(ExitCode::FAILURE)
        }
    }
}
