//! Wizard Stack - Software evaluation flow
//!
//! Uses AdwCarousel for page transitions. The wizard owns the worker's
//! event receiver and dispatches events to the pages from the GTK main
//! loop; when the check completes it fills the result table and moves on.

use crate::settings::Settings;
use crate::ui::pages::{CheckProgressPage, EvaluationPage};
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use upgrade_common::evaluation::DesktopMap;
use upgrade_common::worker::{UpgradeWorker, WorkerEvent};

/// How often pending worker events are drained
const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(16);

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct WizardStack {
        pub carousel: RefCell<Option<adw::Carousel>>,
        pub check_page: RefCell<Option<CheckProgressPage>>,
        pub evaluation_page: RefCell<Option<EvaluationPage>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for WizardStack {
        const NAME: &'static str = "UpgradeWizardStack";
        type Type = super::WizardStack;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for WizardStack {
        fn signals() -> &'static [glib::subclass::Signal] {
            use std::sync::OnceLock;
            static SIGNALS: OnceLock<Vec<glib::subclass::Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| {
                vec![glib::subclass::Signal::builder("evaluation-complete").build()]
            })
        }
    }

    impl WidgetImpl for WizardStack {}
    impl BoxImpl for WizardStack {}
}

glib::wrapper! {
    pub struct WizardStack(ObjectSubclass<imp::WizardStack>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl WizardStack {
    pub fn new(worker: Arc<dyn UpgradeWorker>, settings: &Settings) -> Self {
        let obj: Self = glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("vexpand", true)
            .build();

        obj.setup_ui(settings);
        obj.start_evaluation(worker);

        obj
    }

    fn setup_ui(&self, settings: &Settings) {
        let imp = self.imp();

        let carousel = adw::Carousel::builder()
            .interactive(false) // Disable swipe - controlled programmatically
            .allow_scroll_wheel(false)
            .allow_mouse_drag(false)
            .vexpand(true)
            .build();

        let check_page = CheckProgressPage::new();
        carousel.append(&check_page);

        let evaluation_page = EvaluationPage::new(settings);
        carousel.append(&evaluation_page);

        // Connect check progress -> evaluation result transition
        check_page.connect_local(
            "check-done",
            false,
            glib::clone!(@weak self as wizard, @weak carousel, @weak evaluation_page => @default-return None, move |_| {
                evaluation_page.fill_table();
                carousel.scroll_to(&evaluation_page, true);
                wizard.emit_by_name::<()>("evaluation-complete", &[]);
                None
            }),
        );

        self.append(&carousel);

        *imp.carousel.borrow_mut() = Some(carousel);
        *imp.check_page.borrow_mut() = Some(check_page);
        *imp.evaluation_page.borrow_mut() = Some(evaluation_page);
    }

    /// Start the worker and route its events to the pages
    fn start_evaluation(&self, worker: Arc<dyn UpgradeWorker>) {
        let imp = self.imp();
        let (Some(check_page), Some(evaluation_page)) = (
            imp.check_page.borrow().clone(),
            imp.evaluation_page.borrow().clone(),
        ) else {
            return;
        };

        evaluation_page.clear_app_infos();

        let (sender, receiver) = mpsc::channel::<WorkerEvent>();
        if let Err(e) = worker.start(sender) {
            tracing::error!("Failed to start worker ({}): {:#}", worker.describe(), e);
            check_page.show_error("Unable to reach the upgrade service.");
            return;
        }
        tracing::info!("Evaluating with {}", worker.describe());

        // Poll the receiver from the GTK main thread
        glib::timeout_add_local(
            POLL_INTERVAL,
            glib::clone!(@weak check_page, @weak evaluation_page => @default-return glib::ControlFlow::Break, move || {
                let pages = WizardPages {
                    check: &check_page,
                    evaluation: &evaluation_page,
                };
                drain_events(&receiver, &pages)
            }),
        );
    }
}

/// Receives worker events on the GTK main thread
trait EventTarget {
    fn check_progress(&self, progress: i32);
    fn apps_available(&self, map: DesktopMap);
    fn migrate_status(&self, package: &str, status: i32);
    fn worker_finished(&self);
}

struct WizardPages<'a> {
    check: &'a CheckProgressPage,
    evaluation: &'a EvaluationPage,
}

impl EventTarget for WizardPages<'_> {
    fn check_progress(&self, progress: i32) {
        self.check.on_check_progress_update(progress);
    }

    fn apps_available(&self, map: DesktopMap) {
        self.evaluation.set_desktop_map(map);
    }

    fn migrate_status(&self, package: &str, status: i32) {
        self.evaluation.update_app_infos(package, status);
    }

    fn worker_finished(&self) {
        if !self.check.is_done() {
            tracing::warn!("Worker stopped before the check completed");
            self.check
                .show_error("The upgrade service stopped before the check completed.");
        }
    }
}

/// Dispatch every pending event; stop polling once the worker is gone
fn drain_events(receiver: &Receiver<WorkerEvent>, target: &impl EventTarget) -> glib::ControlFlow {
    loop {
        match receiver.try_recv() {
            Ok(WorkerEvent::CheckProgress(progress)) => target.check_progress(progress),
            Ok(WorkerEvent::AppsAvailable(map)) => target.apps_available(map),
            Ok(WorkerEvent::MigrateStatus { package, status }) => {
                target.migrate_status(&package, status);
            }
            Err(TryRecvError::Empty) => return glib::ControlFlow::Continue,
            Err(TryRecvError::Disconnected) => {
                tracing::info!("Worker finished sending events");
                target.worker_finished();
                return glib::ControlFlow::Break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl EventTarget for Recorder {
        fn check_progress(&self, progress: i32) {
            self.calls.borrow_mut().push(format!("progress {}", progress));
        }

        fn apps_available(&self, map: DesktopMap) {
            self.calls.borrow_mut().push(format!("map {}", map.len()));
        }

        fn migrate_status(&self, package: &str, status: i32) {
            self.calls.borrow_mut().push(format!("status {} {}", package, status));
        }

        fn worker_finished(&self) {
            self.calls.borrow_mut().push("finished".to_string());
        }
    }

    #[test]
    fn test_drain_dispatches_pending_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(WorkerEvent::AppsAvailable(DesktopMap::new())).unwrap();
        tx.send(WorkerEvent::MigrateStatus {
            package: "foo".to_string(),
            status: 1,
        })
        .unwrap();
        tx.send(WorkerEvent::CheckProgress(40)).unwrap();

        let recorder = Recorder::default();
        assert_eq!(drain_events(&rx, &recorder), glib::ControlFlow::Continue);
        assert_eq!(
            *recorder.calls.borrow(),
            ["map 0", "status foo 1", "progress 40"]
        );
        drop(tx);
    }

    #[test]
    fn test_drain_reports_worker_exit() {
        let (tx, rx) = mpsc::channel();
        tx.send(WorkerEvent::CheckProgress(10)).unwrap();
        drop(tx);

        let recorder = Recorder::default();
        assert_eq!(drain_events(&rx, &recorder), glib::ControlFlow::Break);
        assert_eq!(*recorder.calls.borrow(), ["progress 10", "finished"]);
    }
}
