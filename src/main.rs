use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launch_ledger::api;
use launch_ledger::config::AppConfig;
use launch_ledger::dataset::DatasetHandle;
use launch_ledger::query::QueryEngine;

#[derive(Parser)]
#[command(name = "launch-ledger")]
#[command(about = "Analytics over a space-launch mission dataset")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(short, long)]
        bind: Option<String>,

        /// Mission CSV file
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
    /// Run a single query and print the result as JSON
    Query {
        /// Mission CSV file
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[command(subcommand)]
        op: QueryOp,
    },
}

#[derive(Subcommand)]
enum QueryOp {
    /// Top N companies by mission count
    Top { n: usize },
    /// Missions launched by a company
    Count { company: String },
    /// Success rate of a company (0.0 to 1.0)
    SuccessRate { company: String },
    /// Mission names launched between two dates (inclusive)
    Range { start: String, end: String },
    /// Missions per status
    Status,
    /// Missions launched in a year
    Year { year: i32 },
    /// Most used rocket and its mission count
    Rocket,
    /// Average missions per year over a year range (inclusive)
    Average { start: i32, end: i32 },
    /// All companies, alphabetically
    Companies,
    /// Missions for every year from first launch to last
    Years,
}

/// Initialize tracing with output to stderr (for query mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "launch_ledger=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Query mode: keep stdout clean for the JSON result
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_dataset(config: &AppConfig) -> anyhow::Result<DatasetHandle> {
    DatasetHandle::open(&config.data_path).with_context(|| {
        format!(
            "Failed to load mission dataset from {}",
            config.data_path.display()
        )
    })
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let dataset = open_dataset(&config)?;
    let app = api::create_router_with_config(dataset, &config);

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Launch Ledger listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_query(config: &AppConfig, op: QueryOp) -> anyhow::Result<()> {
    let engine = QueryEngine::new(open_dataset(config)?.snapshot());

    match op {
        QueryOp::Top { n } => print_json(&engine.top_companies_by_mission_count(n)),
        QueryOp::Count { company } => print_json(&engine.mission_count_by_company(&company)),
        QueryOp::SuccessRate { company } => print_json(&engine.success_rate(&company)),
        QueryOp::Range { start, end } => {
            print_json(&engine.missions_by_date_range(&start, &end))
        }
        QueryOp::Status => print_json(&engine.mission_status_count()),
        QueryOp::Year { year } => print_json(&engine.missions_by_year(year)),
        QueryOp::Rocket => print_json(&engine.most_used_rocket_usage()?),
        QueryOp::Average { start, end } => {
            print_json(&engine.average_missions_per_year(start, end))
        }
        QueryOp::Companies => print_json(&engine.companies()),
        QueryOp::Years => print_json(&engine.missions_per_year()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = matches!(cli.command, Some(Commands::Query { .. }));
    init_tracing(use_stderr);

    let mut config = AppConfig::load();

    match cli.command {
        Some(Commands::Serve { port, bind, data }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(data) = data {
                config.data_path = data;
            }
            serve(config).await?;
        }
        Some(Commands::Query { data, op }) => {
            if let Some(data) = data {
                config.data_path = data;
            }
            run_query(&config, op)?;
        }
        None => {
            // Default: start server
            serve(config).await?;
        }
    }

    Ok(())
}
