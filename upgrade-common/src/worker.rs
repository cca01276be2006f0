//! Worker Boundary
//!
//! The upgrade daemon does the actual compatibility checking; the screens
//! only consume what it reports. Workers deliver [`WorkerEvent`]s over a
//! channel, and components receive the worker through their constructor.

use crate::error::WorkerError;
use crate::evaluation::DesktopMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Duration;

/// Notifications from the upgrade worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum WorkerEvent {
    /// Check progress, 0-100
    CheckProgress(i32),
    /// Full package -> desktop entries map, replacing any earlier one
    AppsAvailable(DesktopMap),
    /// Verdict for one package; status 1 means compatible
    MigrateStatus { package: String, status: i32 },
}

/// A source of worker events
pub trait UpgradeWorker: Send + Sync {
    /// Start delivering events. Delivery stops once the receiver is dropped.
    fn start(&self, sender: Sender<WorkerEvent>) -> anyhow::Result<()>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Plays back a fixed list of events on a background thread
#[derive(Debug, Clone)]
pub struct ReplayWorker {
    events: Vec<WorkerEvent>,
    interval: Duration,
}

impl ReplayWorker {
    pub fn new(events: Vec<WorkerEvent>, interval: Duration) -> Self {
        Self { events, interval }
    }

    /// Load events from a JSON array file
    pub fn from_json_file(path: &Path, interval: Duration) -> Result<Self, WorkerError> {
        let contents = std::fs::read_to_string(path).map_err(|source| WorkerError::ReadEvents {
            path: path.to_path_buf(),
            source,
        })?;
        let events = serde_json::from_str(&contents).map_err(|source| WorkerError::DecodeEvents {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(events, interval))
    }
}

impl UpgradeWorker for ReplayWorker {
    fn start(&self, sender: Sender<WorkerEvent>) -> anyhow::Result<()> {
        let events = self.events.clone();
        let interval = self.interval;

        thread::Builder::new()
            .name("replay-worker".to_string())
            .spawn(move || {
                for event in events {
                    if !interval.is_zero() {
                        thread::sleep(interval);
                    }
                    if sender.send(event).is_err() {
                        tracing::debug!("Event receiver dropped, stopping replay");
                        break;
                    }
                }
            })
            .map_err(WorkerError::Spawn)?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!("replay of {} events", self.events.len())
    }
}
