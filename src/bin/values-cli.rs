//! CLI exercising the values API through the correlated client.
//!
//! Stands in for the original single-page app: each invocation makes one
//! correlated call and reports the outcome.

use clap::{Parser, Subcommand};

use correlation_demo::client::{ClientTelemetry, CorrelatedClient};
use correlation_demo::config::{ClientConfig, TelemetryConfig};
use correlation_demo::lifecycle::Shutdown;
use correlation_demo::telemetry::TelemetryChannel;

#[derive(Parser)]
#[command(name = "values-cli")]
#[command(about = "Call the values API with correlated requests", long_about = None)]
struct Cli {
    /// Base URL of the values API.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Total attempts per call (1 initial + retries).
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Fixed delay between retry attempts in milliseconds.
    #[arg(long, default_value_t = 3000)]
    retry_delay_ms: u64,

    /// Telemetry ingestion endpoint; telemetry is disabled when omitted.
    #[arg(long)]
    telemetry_endpoint: Option<String>,

    /// Instrumentation key sent with telemetry records.
    #[arg(long, default_value = "")]
    instrumentation_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all values
    GetAll,
    /// Fetch a single value by id
    Get { id: String },
    /// Trigger the server's failure route
    Fail,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "correlation_demo=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let telemetry_config = TelemetryConfig {
        enabled: cli.telemetry_endpoint.is_some(),
        instrumentation_key: cli.instrumentation_key.clone(),
        ingestion_endpoint: cli
            .telemetry_endpoint
            .clone()
            .unwrap_or_else(|| TelemetryConfig::default().ingestion_endpoint),
        ..TelemetryConfig::default()
    };
    let client_config = ClientConfig {
        api_base_url: cli.url.clone(),
        max_attempts: cli.max_attempts,
        retry_delay_ms: cli.retry_delay_ms,
    };

    let shutdown = Shutdown::new();
    let (channel, worker) = TelemetryChannel::from_config(&telemetry_config);
    let worker_handle = worker.map(|worker| {
        let rx = shutdown.subscribe();
        tokio::spawn(worker.run(rx))
    });

    let client = CorrelatedClient::new(&client_config, ClientTelemetry::new(channel))?;

    let outcome: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::GetAll => match client.get_values().await {
            Ok(values) => {
                println!("{}", serde_json::to_string_pretty(&values)?);
                Ok(())
            }
            Err(error) => Err(error.into()),
        },
        Commands::Get { id } => match client.get(&format!("/api/v1.0/values/{}", id)).await {
            Ok(response) => {
                println!("{}", response.text().await?);
                Ok(())
            }
            Err(error) => Err(error.into()),
        },
        Commands::Fail => match client.get("/api/v1.0/values/fail").await {
            Ok(response) => {
                println!("unexpected success: {}", response.status());
                Ok(())
            }
            Err(error) => {
                eprintln!("request failed as expected: {}", error);
                Ok(())
            }
        },
    };

    // Drain any queued telemetry before exiting.
    shutdown.trigger();
    if let Some(handle) = worker_handle {
        let _ = handle.await;
    }

    outcome
}
