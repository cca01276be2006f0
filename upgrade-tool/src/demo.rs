//! Demo Worker - Simulated evaluation
//!
//! Lets the screens run without the upgrade daemon: every desktop entry in
//! the applications directory becomes a pseudo-package named after its
//! file stem, verdicts alternate between compatible and incompatible, and
//! progress ramps up to 100.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;
use upgrade_common::evaluation::{DesktopMap, STATUS_COMPATIBLE};
use upgrade_common::paths;
use upgrade_common::worker::{ReplayWorker, UpgradeWorker, WorkerEvent};

/// Upper bound on simulated packages so the demo stays short
pub const MAX_DEMO_PACKAGES: usize = 24;

/// Delay between simulated events
const DEMO_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug, Clone)]
pub struct DemoWorker {
    applications_dir: PathBuf,
}

impl DemoWorker {
    pub fn new(applications_dir: impl Into<PathBuf>) -> Self {
        Self {
            applications_dir: applications_dir.into(),
        }
    }
}

impl UpgradeWorker for DemoWorker {
    fn start(&self, sender: Sender<WorkerEvent>) -> Result<()> {
        let events = demo_events(&self.applications_dir);
        tracing::info!(
            "Demo mode: simulating {} events from {:?}",
            events.len(),
            self.applications_dir
        );
        ReplayWorker::new(events, DEMO_INTERVAL).start(sender)
    }

    fn describe(&self) -> String {
        format!("demo from {}", self.applications_dir.display())
    }
}

/// Build a plausible event sequence from the desktop entries in `dir`
pub fn demo_events(dir: &Path) -> Vec<WorkerEvent> {
    let mut filenames: Vec<String> = match std::fs::read_dir(dir) {
        Ok(read_dir) => read_dir
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| paths::desktop::is_desktop_file(path))
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect(),
        Err(e) => {
            tracing::warn!("Cannot scan {:?} for demo entries: {}", dir, e);
            Vec::new()
        }
    };
    filenames.sort();
    filenames.truncate(MAX_DEMO_PACKAGES);

    let packages: Vec<(String, String)> = filenames
        .into_iter()
        .map(|filename| {
            let package = filename
                .strip_suffix(".desktop")
                .unwrap_or(&filename)
                .to_string();
            (package, filename)
        })
        .collect();

    let map: DesktopMap = packages
        .iter()
        .map(|(package, filename)| (package.clone(), vec![filename.clone()]))
        .collect();

    let mut events = vec![
        WorkerEvent::CheckProgress(1),
        WorkerEvent::AppsAvailable(map),
    ];

    let total = packages.len().max(1);
    for (i, (package, _)) in packages.into_iter().enumerate() {
        let status = if i % 2 == 0 { STATUS_COMPATIBLE } else { 0 };
        events.push(WorkerEvent::MigrateStatus { package, status });
        // Stay below 100 until every verdict has been sent
        let progress = ((i + 1) * 99 / total) as i32;
        events.push(WorkerEvent::CheckProgress(progress));
    }
    events.push(WorkerEvent::CheckProgress(100));

    events
}
