// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::mutation::Mutation;
use crate::store::Store;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

#[derive(Debug)]
pub enum StoreCommand {
    Apply(Vec<Mutation>),
    Flush(oneshot::Sender<FlushResponse>),
    Shutdown,
}

/// Mutation outcomes since the previous flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushResponse {
    pub applied: u64,
    pub failed: u64,
}

#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

impl StoreHandle {
    /// Hands the mutations to the store without waiting for them to be applied.
    pub fn apply(
        &self,
        mutations: Vec<Mutation>,
    ) -> Result<(), mpsc::error::SendError<StoreCommand>> {
        self.tx.send(StoreCommand::Apply(mutations))
    }

    /// Waits until every mutation sent before this call has been applied.
    pub async fn flush(&self) -> Result<FlushResponse, String> {
        let (response_tx, response_rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Flush(response_tx))
            .map_err(|e| format!("Failed to send flush command: {}", e))?;

        response_rx
            .await
            .map_err(|e| format!("Failed to receive flush response: {}", e))
    }

    pub fn shutdown(&self) -> Result<(), mpsc::error::SendError<StoreCommand>> {
        self.tx.send(StoreCommand::Shutdown)
    }
}

/// Owns the store and applies mutations in the order they were handed off.
pub struct StoreService<S> {
    store: S,
    rx: mpsc::UnboundedReceiver<StoreCommand>,
    pending: FlushResponse,
}

impl<S: Store> StoreService<S> {
    pub fn new(store: S) -> (Self, StoreHandle) {
        let (tx, rx) = mpsc::unbounded_channel();

        let service = Self {
            store,
            rx,
            pending: FlushResponse::default(),
        };

        let handle = StoreHandle { tx };

        (service, handle)
    }

    /// Runs until shut down or every handle is dropped, then gives the store back.
    pub async fn run(mut self) -> S {
        debug!("Store service started");

        while let Some(command) = self.rx.recv().await {
            match command {
                StoreCommand::Apply(mutations) => {
                    let mut apply_errors = 0;
                    for mutation in &mutations {
                        if let Err(e) = mutation.apply(&mut self.store) {
                            debug!("Failed to apply {}: {}", mutation, e);
                            apply_errors += 1;
                        }
                    }
                    if apply_errors > 0 {
                        warn!("Total of {} mutations failed to apply", apply_errors);
                    }
                    self.pending.failed += apply_errors;
                    self.pending.applied += mutations.len() as u64 - apply_errors;
                }

                StoreCommand::Flush(response_tx) => {
                    let response = std::mem::take(&mut self.pending);
                    if response_tx.send(response).is_err() {
                        error!("Failed to send flush response - receiver dropped");
                    }
                }

                StoreCommand::Shutdown => {
                    debug!("Store service shutting down");
                    break;
                }
            }
        }

        debug!("Store service stopped");
        self.store
    }
}
