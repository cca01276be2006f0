//! Evaluation Session
//!
//! Routes worker events to the progress reporter and the evaluation
//! presenter. The GUI wires pages to the two halves separately; headless
//! runs drive a whole session directly.

use crate::evaluation::SoftwareEvaluation;
use crate::progress::CheckProgress;
use crate::worker::WorkerEvent;
use std::path::PathBuf;

/// What a single event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Progress moved but the check is still running
    Progress(i32),
    /// This event completed the check
    CheckDone,
    /// Desktop map or classification changed
    Evaluation,
    /// Nothing changed (e.g. progress after completion)
    Ignored,
}

#[derive(Debug)]
pub struct EvaluationSession {
    progress: CheckProgress,
    evaluation: SoftwareEvaluation,
}

impl EvaluationSession {
    pub fn new(applications_dir: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            progress: CheckProgress::new(),
            evaluation: SoftwareEvaluation::new(applications_dir, locale),
        }
    }

    pub fn progress(&self) -> &CheckProgress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut CheckProgress {
        &mut self.progress
    }

    pub fn evaluation(&self) -> &SoftwareEvaluation {
        &self.evaluation
    }

    pub fn is_done(&self) -> bool {
        self.progress.is_done()
    }

    /// Apply one worker event
    pub fn handle(&mut self, event: &WorkerEvent) -> SessionUpdate {
        match event {
            WorkerEvent::CheckProgress(value) => {
                if self.progress.is_done() {
                    SessionUpdate::Ignored
                } else if self.progress.handle_event(event) {
                    SessionUpdate::CheckDone
                } else {
                    SessionUpdate::Progress(*value)
                }
            }
            WorkerEvent::AppsAvailable(_) | WorkerEvent::MigrateStatus { .. } => {
                self.evaluation.handle_event(event);
                SessionUpdate::Evaluation
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::DesktopMap;

    #[test]
    fn test_full_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("foo.desktop"),
            "Name=Foo App\nName[zh_CN]=福\nIcon=foo-icon\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("bar.desktop"), "Name=Bar\n").unwrap();

        let mut session = EvaluationSession::new(dir.path(), "zh_CN");
        let events = [
            WorkerEvent::CheckProgress(1),
            WorkerEvent::AppsAvailable(DesktopMap::from([
                ("foo".to_string(), vec!["foo.desktop".to_string()]),
                ("bar".to_string(), vec!["bar.desktop".to_string()]),
            ])),
            WorkerEvent::MigrateStatus {
                package: "foo".to_string(),
                status: 1,
            },
            WorkerEvent::MigrateStatus {
                package: "bar".to_string(),
                status: 0,
            },
            WorkerEvent::CheckProgress(100),
            WorkerEvent::CheckProgress(100),
        ];

        let updates: Vec<_> = events.iter().map(|e| session.handle(e)).collect();
        assert_eq!(
            updates,
            [
                SessionUpdate::Progress(1),
                SessionUpdate::Evaluation,
                SessionUpdate::Evaluation,
                SessionUpdate::Evaluation,
                SessionUpdate::CheckDone,
                SessionUpdate::Ignored,
            ]
        );

        assert!(session.is_done());
        assert_eq!(session.evaluation().compatible()[0].name, "福");
        assert_eq!(session.evaluation().incompatible()[0].name, "Bar");
    }

    #[test]
    fn test_done_callback_through_session() {
        use std::cell::Cell;
        use std::rc::Rc;

        let dir = tempfile::tempdir().unwrap();
        let mut session = EvaluationSession::new(dir.path(), "C");
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        session
            .progress_mut()
            .connect_done(move || counter.set(counter.get() + 1));

        session.handle(&WorkerEvent::CheckProgress(99));
        assert_eq!(fired.get(), 0);
        session.handle(&WorkerEvent::CheckProgress(100));
        assert_eq!(fired.get(), 1);
    }
}
