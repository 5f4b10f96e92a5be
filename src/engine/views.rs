//! Fire-and-forget view counting.
//!
//! Reads hand the record key to a single background worker and move on. The
//! worker applies increments in arrival order; failures are logged and
//! dropped. The queue is bounded: when it is full the increment is dropped
//! with a warning rather than stalling the read. Dropping the recorder drains
//! the queue before returning.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::store::{DocumentStore, StoreError};
use crate::types::identifiers::HashedKey;

/// Pending increments allowed before new ones are dropped.
pub const VIEW_QUEUE_CAPACITY: usize = 1024;

pub struct ViewRecorder {
    tx: Option<SyncSender<HashedKey>>,
    worker: Option<JoinHandle<()>>,
}

impl ViewRecorder {
    pub fn spawn<S>(store: Arc<S>) -> std::io::Result<Self>
    where
        S: DocumentStore + ?Sized + 'static,
    {
        Self::with_capacity(store, VIEW_QUEUE_CAPACITY)
    }

    pub fn with_capacity<S>(store: Arc<S>, capacity: usize) -> std::io::Result<Self>
    where
        S: DocumentStore + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<HashedKey>(capacity);
        let worker = std::thread::Builder::new()
            .name("snippet-views".to_string())
            .spawn(move || {
                for key in rx {
                    match store.increment_views(&key) {
                        Ok(()) => {}
                        // Volatile documents are usually gone by now.
                        Err(StoreError::NotFound) => {
                            tracing::debug!("View increment skipped, {} no longer exists", key)
                        }
                        Err(e) => tracing::warn!("Couldn't increment views for {}: {}", key, e),
                    }
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Queue one view for `key`. Never blocks and never fails the caller.
    pub fn record(&self, key: HashedKey) {
        if let Some(tx) = &self.tx {
            match tx.try_send(key) {
                Ok(()) => {}
                Err(TrySendError::Full(key)) => {
                    tracing::warn!("View queue is full, dropping view increment for {}", key)
                }
                Err(TrySendError::Disconnected(_)) => {
                    tracing::warn!("View recorder is gone, dropping view increment")
                }
            }
        }
    }
}

impl Drop for ViewRecorder {
    fn drop(&mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("View recorder thread panicked");
            }
        }
    }
}
