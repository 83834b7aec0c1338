// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Error types for log parsing, store mutation and batch retrieval.

use std::path::PathBuf;

/// Why a single log line could not be turned into a download.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line does not match the download log format: {0}")]
    MalformedLine(String),
    #[error("download line has an empty package token: {0}")]
    EmptyPackageToken(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("key {key} holds a {actual}, not a {expected}")]
    WrongType {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("batch source root {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read batch {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Creation {
    #[error("invalid log pattern: {0}")]
    Pattern(#[from] regex::Error),
}
