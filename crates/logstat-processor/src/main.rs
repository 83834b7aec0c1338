// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;
mod error;

use std::{fs, process};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use logstat::{
    download::DownloadParser,
    logstat::LogStats,
    source::DirectorySource,
    stats::StatsAggregator,
    store::MemoryStore,
    store_service::StoreService,
};

use crate::config::ProcessorConfig;
use crate::error::ProcessorError;

#[tokio::main]
pub async fn main() {
    let config = ProcessorConfig::from_env();
    let log_level = config
        .as_ref()
        .map(|c| c.log_level.as_str())
        .unwrap_or("info");

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter(log_level))
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    debug!("Logging subsystem enabled");
    info!("RubyGems.org stats processor");

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            error!("Error creating config on stats processor startup: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Stats processing failed: {e}");
        process::exit(1);
    }
}

/// Filter for a validated log level; anything unparsable falls back to `info`.
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

async fn run(config: ProcessorConfig) -> Result<(), ProcessorError> {
    let today = config
        .date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let parser = DownloadParser::new()?;

    // 1. Create the store service
    let (service, handle) = StoreService::new(MemoryStore::default());

    // 2. Start the store service in the background
    let service_task = tokio::spawn(service.run());

    // 3. Process batches off the async runtime; the handle is cheap to clone
    let logstat = LogStats::new(
        parser,
        StatsAggregator::new(),
        handle.clone(),
    );
    let source = DirectorySource::new(&config.log_dir);
    let selector = config.selector();
    let summary = tokio::task::spawn_blocking(move || logstat.run(&source, &selector, today))
        .await
        .map_err(|e| ProcessorError::StoreService(format!("Processing task failed: {e}")))??;

    info!(
        "Processed {} lines: {} downloads, {} skipped, {} mutations",
        summary.lines, summary.downloads, summary.skipped, summary.mutations
    );
    if summary.dropped > 0 {
        warn!("{} mutations were dropped before reaching the store", summary.dropped);
    }

    let flushed = handle.flush().await.map_err(ProcessorError::StoreService)?;
    info!(
        "Applied {} mutations, {} failed",
        flushed.applied, flushed.failed
    );

    handle
        .shutdown()
        .map_err(|e| ProcessorError::StoreService(e.to_string()))?;
    let store = service_task
        .await
        .map_err(|e| ProcessorError::StoreService(format!("Store service task failed: {e}")))?;

    let report = serde_json::to_string_pretty(&store.snapshot())?;
    match &config.report_path {
        Some(path) => {
            fs::write(path, report)?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{report}"),
    }

    Ok(())
}
