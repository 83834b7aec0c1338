// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batch processing of download logs.
//!
//! A batch is split into lines, each line is parsed into a [`Download`] and mapped to store
//! mutations, and the mutations are handed to the store service before the next line is
//! looked at. Lines that fail to parse are logged and skipped; they never abort the batch.
//!
//! [`Download`]: crate::download::Download

use chrono::NaiveDate;
use tracing::{debug, error, info, trace};

use crate::download::DownloadParser;
use crate::errors::{ParseError, SourceError};
use crate::source::BatchSource;
use crate::stats::StatsAggregator;
use crate::store_service::StoreHandle;

/// Line counts for one or more processed batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Non-empty lines seen.
    pub lines: usize,
    pub downloads: usize,
    pub skipped: usize,
    /// Mutations handed to the store.
    pub mutations: usize,
    /// Mutations lost because the store service was gone.
    pub dropped: usize,
}

/// What happened to the mutations of one parsed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    Sent(usize),
    Dropped(usize),
}

impl BatchSummary {
    pub fn merge(&mut self, other: BatchSummary) {
        self.lines += other.lines;
        self.downloads += other.downloads;
        self.skipped += other.skipped;
        self.mutations += other.mutations;
        self.dropped += other.dropped;
    }
}

pub struct LogStats {
    parser: DownloadParser,
    aggregator: StatsAggregator,
    store_handle: StoreHandle,
}

impl LogStats {
    pub fn new(
        parser: DownloadParser,
        aggregator: StatsAggregator,
        store_handle: StoreHandle,
    ) -> LogStats {
        LogStats {
            parser,
            aggregator,
            store_handle,
        }
    }

    /// Processes every batch matching `selector`, in key order.
    ///
    /// A batch that cannot be fetched is logged and skipped; only a failure to list batches
    /// is returned.
    pub fn run(
        &self,
        source: &dyn BatchSource,
        selector: &str,
        today: NaiveDate,
    ) -> Result<BatchSummary, SourceError> {
        info!("Looking for log batches starting with `{}`", selector);
        let keys = source.list(selector)?;
        if keys.is_empty() {
            info!("No log batches match `{}`", selector);
        }

        let mut total = BatchSummary::default();
        for key in keys {
            info!("Found {}, processing...", key);
            let content = match source.fetch(&key) {
                Ok(content) => content,
                Err(e) => {
                    error!("Skipping batch {}: {}", key, e);
                    continue;
                }
            };

            let summary = self.process_batch(&content, today);
            info!(
                "Processed {}: {} downloads, {} skipped lines, {} mutations",
                key, summary.downloads, summary.skipped, summary.mutations
            );
            total.merge(summary);
        }

        Ok(total)
    }

    /// Processes one batch of newline separated log lines.
    pub fn process_batch(&self, content: &str, today: NaiveDate) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for line in content.split('\n') {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            summary.lines += 1;

            match self.process_line(line, today) {
                Ok(handoff) => {
                    summary.downloads += 1;
                    match handoff {
                        Handoff::Sent(count) => summary.mutations += count,
                        Handoff::Dropped(count) => summary.dropped += count,
                    }
                }
                Err(e) => {
                    summary.skipped += 1;
                    match e {
                        // Requests for the bare `/gems/.gem` path show up in every batch
                        ParseError::EmptyPackageToken(_) => debug!("Skipping line. {}", e),
                        ParseError::MalformedLine(_) => error!("Failed to parse line. {}", e),
                    }
                }
            }
        }

        summary
    }

    /// Parses one line and hands its mutations to the store.
    pub fn process_line(&self, line: &str, today: NaiveDate) -> Result<Handoff, ParseError> {
        let download = self.parser.parse(line)?;
        trace!("Parsed {:?}", download);

        let mutations = self.aggregator.mutations(&download, today);
        let count = mutations.len();
        for mutation in &mutations {
            trace!("  - {}", mutation);
        }

        match self.store_handle.apply(mutations) {
            Ok(()) => Ok(Handoff::Sent(count)),
            Err(e) => {
                error!("Failed to send {} mutations to store: {}", count, e);
                Ok(Handoff::Dropped(count))
            }
        }
    }
}
