// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors that can stop a processing run
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build log parser: {0}")]
    Parser(#[from] logstat::errors::Creation),

    #[error("Failed to list log batches: {0}")]
    Source(#[from] logstat::errors::SourceError),

    #[error("Store service error: {0}")]
    StoreService(String),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
