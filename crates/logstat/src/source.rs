// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Where raw log batches come from.
//!
//! Batches are addressed by `/`-separated keys, the same way the CDN writes them to object
//! storage: `{environment}/{timestamp}-{suffix}.log`. A selector is a key prefix.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::SourceError;

pub trait BatchSource {
    /// Keys of every batch starting with `selector`, in ascending order.
    fn list(&self, selector: &str) -> Result<Vec<String>, SourceError>;

    fn fetch(&self, key: &str) -> Result<String, SourceError>;
}

/// Reads batches from a local directory tree mirroring the bucket layout.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collect_keys(&self, dir: &Path, keys: &mut Vec<String>) -> Result<(), SourceError> {
        let io_error = |source| SourceError::Io {
            key: dir.display().to_string(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let file_type = entry.file_type().map_err(io_error)?;
            let path = entry.path();
            if file_type.is_symlink() {
                debug!("Not following symlink {}", path.display());
            } else if file_type.is_dir() {
                self.collect_keys(&path, keys)?;
            } else if let Ok(relative) = path.strip_prefix(&self.root) {
                let key = relative
                    .iter()
                    .map(|part| part.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                keys.push(key);
            }
        }
        Ok(())
    }
}

impl BatchSource for DirectorySource {
    fn list(&self, selector: &str) -> Result<Vec<String>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotFound(self.root.clone()));
        }

        let mut keys = Vec::new();
        self.collect_keys(&self.root, &mut keys)?;
        keys.retain(|key| key.starts_with(selector));
        keys.sort();

        debug!(
            "Found {} batches under {} matching {:?}",
            keys.len(),
            self.root.display(),
            selector
        );
        Ok(keys)
    }

    fn fetch(&self, key: &str) -> Result<String, SourceError> {
        fs::read_to_string(self.root.join(key)).map_err(|source| SourceError::Io {
            key: key.to_string(),
            source,
        })
    }
}

/// Batches held in memory, keyed like a bucket.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    batches: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.batches.insert(key.into(), content.into());
    }
}

impl BatchSource for MemorySource {
    fn list(&self, selector: &str) -> Result<Vec<String>, SourceError> {
        Ok(self
            .batches
            .keys()
            .filter(|key| key.starts_with(selector))
            .cloned()
            .collect())
    }

    fn fetch(&self, key: &str) -> Result<String, SourceError> {
        self.batches.get(key).cloned().ok_or_else(|| SourceError::Io {
            key: key.to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }
}
