//! Compatibility Check Progress
//!
//! Tracks the worker's progress percentage and fires completion callbacks
//! exactly once, when a value of exactly 100 arrives.

use crate::worker::WorkerEvent;
use std::fmt;

/// Percentage that completes the check
pub const PROGRESS_DONE: i32 = 100;

/// Value shown before the first update arrives
pub const INITIAL_PROGRESS: i32 = 1;

/// Progress state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Still checking; holds the last reported value
    Running(i32),
    /// The worker reported 100
    Done,
}

type DoneCallback = Box<dyn FnMut()>;

/// Progress reporter for the compatibility check
pub struct CheckProgress {
    state: CheckState,
    on_done: Vec<DoneCallback>,
}

impl CheckProgress {
    pub fn new() -> Self {
        Self {
            state: CheckState::Running(INITIAL_PROGRESS),
            on_done: Vec::new(),
        }
    }

    /// Register a callback invoked when the check completes
    pub fn connect_done<F: FnMut() + 'static>(&mut self, callback: F) {
        self.on_done.push(Box::new(callback));
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == CheckState::Done
    }

    /// Displayed percentage, clamped to 0..=100
    pub fn percent(&self) -> i32 {
        match self.state {
            CheckState::Running(value) => value.clamp(0, PROGRESS_DONE),
            CheckState::Done => PROGRESS_DONE,
        }
    }

    /// Displayed fraction for progress bars
    pub fn fraction(&self) -> f64 {
        f64::from(self.percent()) / f64::from(PROGRESS_DONE)
    }

    /// Feed a progress value.
    ///
    /// Returns true when this value completed the check. Values arriving
    /// after completion are ignored.
    pub fn update(&mut self, progress: i32) -> bool {
        match self.state {
            CheckState::Done => {
                tracing::debug!("Ignoring progress {} after completion", progress);
                false
            }
            CheckState::Running(_) if progress == PROGRESS_DONE => {
                self.state = CheckState::Done;
                tracing::info!("Compatibility check complete");
                for callback in self.on_done.iter_mut() {
                    callback();
                }
                true
            }
            CheckState::Running(_) => {
                self.state = CheckState::Running(progress);
                false
            }
        }
    }

    /// Apply a worker event; returns true when it completed the check
    pub fn handle_event(&mut self, event: &WorkerEvent) -> bool {
        match event {
            WorkerEvent::CheckProgress(progress) => self.update(*progress),
            _ => false,
        }
    }
}

impl Default for CheckProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CheckProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckProgress")
            .field("state", &self.state)
            .field("callbacks", &self.on_done.len())
            .finish()
    }
}
