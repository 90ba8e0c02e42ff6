//! Background storage worker.
//!
//! A single worker thread owns the `Storage` connection; everything else
//! talks to it through typed requests with per-request reply channels. This
//! keeps the interactive surface responsive while writes run, and gives the
//! database exactly one writer.

use std::path::Path;
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::coin::CoinSlot;
use crate::error::{Error, Result};
use crate::storage::{CollectionSummary, Storage, StorageStats};
use crate::upgrade::{self, UpgradeReport};

/// Requests the worker understands. Each carries its own reply channel.
#[derive(Debug)]
enum Request {
    CreateCollection {
        name: String,
        series: String,
        slots: Vec<CoinSlot>,
        reply: oneshot::Sender<Result<usize>>,
    },
    CollectionExists {
        name: String,
        reply: oneshot::Sender<Result<bool>>,
    },
    ListCollections {
        reply: oneshot::Sender<Result<Vec<CollectionSummary>>>,
    },
    Slots {
        name: String,
        reply: oneshot::Sender<Result<Vec<CoinSlot>>>,
    },
    SetCollected {
        name: String,
        identifier: String,
        mint_mark: String,
        collected: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    DeleteCollection {
        name: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Upgrade {
        reply: oneshot::Sender<Result<UpgradeReport>>,
    },
    Stats {
        reply: oneshot::Sender<Result<StorageStats>>,
    },
}

/// Handle to the storage worker thread.
///
/// All methods block the calling thread until the worker replies. Dropping
/// the handle closes the request channel, which shuts the worker down.
#[derive(Debug)]
pub struct StorageWorker {
    tx: Option<mpsc::Sender<Request>>,
    join: Option<thread::JoinHandle<()>>,
}

impl StorageWorker {
    /// Open the database at `path` and spawn the worker thread around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self> {
        let storage = Storage::open(path)?;
        Ok(Self::spawn_with(storage))
    }

    /// Spawn the worker thread around an already-open storage instance.
    #[must_use]
    pub fn spawn_with(storage: Storage) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let join = thread::Builder::new()
            .name("coinshelf-storage".to_string())
            .spawn(move || run(storage, rx));
        match join {
            Ok(join) => Self {
                tx: Some(tx),
                join: Some(join),
            },
            Err(err) => {
                // Thread spawn only fails when the OS is out of resources;
                // leave the handle unusable rather than panic.
                error!("Failed to spawn storage worker: {}", err);
                Self {
                    tx: None,
                    join: None,
                }
            }
        }
    }

    /// Create a collection with the given slots.
    ///
    /// # Errors
    ///
    /// Propagates storage errors, or [`Error::WorkerGone`] if the worker
    /// has shut down.
    pub fn create_collection(
        &self,
        name: impl Into<String>,
        series: impl Into<String>,
        slots: Vec<CoinSlot>,
    ) -> Result<usize> {
        self.request(|reply| Request::CreateCollection {
            name: name.into(),
            series: series.into(),
            slots,
            reply,
        })
    }

    /// Check whether a collection name is taken.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn collection_exists(&self, name: impl Into<String>) -> Result<bool> {
        self.request(|reply| Request::CollectionExists {
            name: name.into(),
            reply,
        })
    }

    /// List all collections with progress counts.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn list_collections(&self) -> Result<Vec<CollectionSummary>> {
        self.request(|reply| Request::ListCollections { reply })
    }

    /// Fetch a collection's slots.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn slots(&self, name: impl Into<String>) -> Result<Vec<CoinSlot>> {
        self.request(|reply| Request::Slots {
            name: name.into(),
            reply,
        })
    }

    /// Set a slot's collected flag.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn set_collected(
        &self,
        name: impl Into<String>,
        identifier: impl Into<String>,
        mint_mark: impl Into<String>,
        collected: bool,
    ) -> Result<()> {
        self.request(|reply| Request::SetCollected {
            name: name.into(),
            identifier: identifier.into(),
            mint_mark: mint_mark.into(),
            collected,
            reply,
        })
    }

    /// Delete a collection.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn delete_collection(&self, name: impl Into<String>) -> Result<()> {
        self.request(|reply| Request::DeleteCollection {
            name: name.into(),
            reply,
        })
    }

    /// Run the catalog upgrade stepper.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn upgrade(&self) -> Result<UpgradeReport> {
        self.request(|reply| Request::Upgrade { reply })
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Propagates storage errors or [`Error::WorkerGone`].
    pub fn stats(&self) -> Result<StorageStats> {
        self.request(|reply| Request::Stats { reply })
    }

    fn request<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Request) -> Result<T> {
        let tx = self.tx.as_ref().ok_or(Error::WorkerGone)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.blocking_send(make(reply_tx))
            .map_err(|_| Error::WorkerGone)?;
        reply_rx.blocking_recv().map_err(|_| Error::WorkerGone)?
    }
}

impl Drop for StorageWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        drop(self.tx.take());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// The worker loop: take requests until the channel closes.
fn run(mut storage: Storage, mut rx: mpsc::Receiver<Request>) {
    debug!("Storage worker started");
    while let Some(request) = rx.blocking_recv() {
        match request {
            Request::CreateCollection {
                name,
                series,
                slots,
                reply,
            } => {
                let result = storage.create_collection(&name, &series, &slots);
                let _ = reply.send(result);
            }
            Request::CollectionExists { name, reply } => {
                let _ = reply.send(storage.collection_exists(&name));
            }
            Request::ListCollections { reply } => {
                let _ = reply.send(storage.list_collections());
            }
            Request::Slots { name, reply } => {
                let _ = reply.send(storage.slots(&name));
            }
            Request::SetCollected {
                name,
                identifier,
                mint_mark,
                collected,
                reply,
            } => {
                let _ = reply.send(storage.set_collected(&name, &identifier, &mint_mark, collected));
            }
            Request::DeleteCollection { name, reply } => {
                let _ = reply.send(storage.delete_collection(&name));
            }
            Request::Upgrade { reply } => {
                let _ = reply.send(upgrade::run_catalog_upgrade(&mut storage));
            }
            Request::Stats { reply } => {
                let _ = reply.send(storage.stats());
            }
        }
    }
    debug!("Storage worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator;
    use crate::params::GenerationPlan;

    fn test_worker() -> StorageWorker {
        StorageWorker::spawn_with(Storage::open_in_memory().expect("in-memory storage"))
    }

    fn sample_slots() -> Vec<CoinSlot> {
        generator::generate(&GenerationPlan {
            start_year: 2009,
            stop_year: 2011,
            mint_marks: vec!["P".to_string()],
        })
    }

    #[test]
    fn test_create_and_list_through_worker() {
        let worker = test_worker();
        let inserted = worker
            .create_collection("Mine", "Native American Dollars", sample_slots())
            .unwrap();
        assert_eq!(inserted, 3);

        let collections = worker.list_collections().unwrap();
        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].name, "Mine");
    }

    #[test]
    fn test_collection_exists() {
        let worker = test_worker();
        assert!(!worker.collection_exists("Mine").unwrap());
        worker
            .create_collection("Mine", "Native American Dollars", sample_slots())
            .unwrap();
        assert!(worker.collection_exists("Mine").unwrap());
    }

    #[test]
    fn test_set_collected_through_worker() {
        let worker = test_worker();
        worker
            .create_collection("Mine", "Native American Dollars", sample_slots())
            .unwrap();
        worker.set_collected("Mine", "2010", "P", true).unwrap();

        let slots = worker.slots("Mine").unwrap();
        let slot = slots.iter().find(|s| s.matches("2010", "P")).unwrap();
        assert!(slot.collected);
    }

    #[test]
    fn test_errors_propagate() {
        let worker = test_worker();
        let err = worker.slots("Nope").unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound { .. }));

        worker
            .create_collection("Dup", "Presidential Dollars", sample_slots())
            .unwrap();
        let err = worker
            .create_collection("Dup", "Presidential Dollars", sample_slots())
            .unwrap_err();
        assert!(matches!(err, Error::CollectionExists { .. }));
    }

    #[test]
    fn test_delete_through_worker() {
        let worker = test_worker();
        worker
            .create_collection("Gone", "Presidential Dollars", sample_slots())
            .unwrap();
        worker.delete_collection("Gone").unwrap();
        assert!(!worker.collection_exists("Gone").unwrap());
    }

    #[test]
    fn test_upgrade_through_worker() {
        let worker = test_worker();
        worker
            .create_collection("Fresh", "Native American Dollars", sample_slots())
            .unwrap();
        // Fresh database: already at the current catalog version
        let report = worker.upgrade().unwrap();
        assert!(report.is_noop());
    }

    #[test]
    fn test_stats_through_worker() {
        let worker = test_worker();
        worker
            .create_collection("Mine", "Native American Dollars", sample_slots())
            .unwrap();
        let stats = worker.stats().unwrap();
        assert_eq!(stats.total_collections, 1);
        assert_eq!(stats.total_slots, 3);
    }

    #[test]
    fn test_worker_shuts_down_on_drop() {
        let worker = test_worker();
        drop(worker); // must not hang
    }
}
