//! datacollector
//!
//! Starts data collection and syncs time on client registration.
//!
//! # Architecture Overview
//!
//! ```text
//!   AMQP broker                    datacollector                      device-management
//!                    ┌────────────────────────────────────────────┐        server
//!   fanout exchange  │  ┌──────────┐   ┌──────────┐   ┌─────────┐ │
//!   ─────────────────┼─▶│  broker  │──▶│ dispatch │──▶│ handler │─┼──▶ PUT  /3/0/13
//!                    │  │ consumer │   │  (1 at a │   │         │ │    POST /{obj}/0/observe
//!                    │  └──────────┘   │   time)  │   └────┬────┘ │
//!                    │                 └──────────┘        │      │
//!                    │                            ┌────────▼────┐ │
//!                    │                            │ resilience  │ │
//!                    │                            │ retry+linear│ │
//!                    │                            │   backoff   │ │
//!                    │                            └─────────────┘ │
//!                    │  config · observability · lifecycle        │
//!                    └────────────────────────────────────────────┘
//! ```

use clap::Parser;

use datacollector::broker::RegistrationConsumer;
use datacollector::cli::Cli;
use datacollector::lifecycle::{signals, Shutdown};
use datacollector::observability::{logging, metrics};
use datacollector::RegistrationHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.load_config()?;

    let _log_guard = logging::init_logging(&config.logging, cli.stdout)?;

    tracing::info!("datacollector v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %cli.config.display(),
        broker = %config.broker.host,
        server = %config.server.host,
        max_attempts = config.retries.max_attempts,
        objects = ?config.provisioning.objects,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let handler = RegistrationHandler::from_config(&config)?;

    let shutdown = Shutdown::new();
    let dispatcher_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown.clone());

    let consumer = RegistrationConsumer::connect(&config.broker).await?;
    tracing::info!(queue = consumer.queue_name(), "Consuming registration events");

    let stats = consumer.run(&handler, dispatcher_shutdown).await?;

    tracing::info!(
        received = stats.received,
        provisioned = stats.provisioned,
        partial = stats.partial,
        failed = stats.failed,
        "Shutdown complete"
    );
    Ok(())
}
