// ignition-core/src/bin/startup_trace.rs
//
// Runs a simulated application startup, records it, and prints the
// resulting timeline as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use ignition_core::{BufferingStartup, RecorderConfig};
use ignition_probes::{
    ApplicationAvailability, AvailabilityChangeEvent, LIVENESS_PROBE, ProbesEndpoint,
    READINESS_PROBE,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SUBSYSTEMS: &[(&str, u64)] = &[
    ("datasource", 40),
    ("web.server", 25),
    ("cache", 10),
    ("scheduler", 5),
];

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_env("IGNITION_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = RecorderConfig::from_env().context("reading recorder config")?;
    tracing::info!("startup-trace: capacity={} include={:?}", config.capacity, config.include_prefixes);

    let startup = Arc::new(BufferingStartup::new(&config));
    let availability = Arc::new(ApplicationAvailability::new());
    let probes = ProbesEndpoint::new(availability.clone());

    let mut root = startup
        .start("application.start", None)
        .context("starting root step")?;
    root.tag("main", env!("CARGO_PKG_NAME"));
    let root_id = root.id();

    // Subsystems come up concurrently, each with a couple of nested steps.
    let mut tasks = Vec::new();
    for &(name, millis) in SUBSYSTEMS {
        let startup = startup.clone();
        tasks.push(tokio::spawn(async move {
            let mut step = startup.start(format!("subsystem.{name}"), Some(root_id))?;
            step.tag("subsystem", name);

            let mut configure = startup.start(format!("subsystem.{name}.configure"), Some(step.id()))?;
            configure.tag_with("delayMs", || millis.to_string());
            tokio::time::sleep(Duration::from_millis(millis)).await;
            configure.end();

            let warmup = startup.start(format!("subsystem.{name}.warmup"), Some(step.id()))?;
            tokio::time::sleep(Duration::from_millis(millis / 2)).await;
            warmup.end();

            step.end();
            Ok::<_, ignition_core::StartupError>(())
        }));
    }

    for task in tasks {
        task.await.context("subsystem task panicked")??;
    }
    root.end();

    availability.publish(AvailabilityChangeEvent::ready());
    for name in [LIVENESS_PROBE, READINESS_PROBE] {
        if let Some(report) = probes.probe(name) {
            tracing::info!("probe {}: {:?}", name, report.status);
        }
    }

    let timeline = startup.drain_buffered_timeline();
    tracing::info!(
        "recorded {} steps (dropped {})",
        timeline.events().len(),
        startup.buffer().dropped()
    );

    let json = serde_json::to_string_pretty(&timeline).context("serializing timeline")?;
    println!("{json}");

    Ok(())
}
