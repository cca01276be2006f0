//! Check Progress Page - Compatibility check in progress
//!
//! Mirrors the worker's progress percentage and emits `check-done` once
//! the worker reports 100.

use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;
use upgrade_common::progress::CheckProgress;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct CheckProgressPage {
        pub progress: RefCell<CheckProgress>,
        pub progress_bar: RefCell<Option<gtk::ProgressBar>>,
        pub percent_label: RefCell<Option<gtk::Label>>,
        pub status_label: RefCell<Option<gtk::Label>>,
        pub spinner: RefCell<Option<gtk::Spinner>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for CheckProgressPage {
        const NAME: &'static str = "UpgradeCheckProgressPage";
        type Type = super::CheckProgressPage;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for CheckProgressPage {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }

        fn signals() -> &'static [glib::subclass::Signal] {
            use std::sync::OnceLock;
            static SIGNALS: OnceLock<Vec<glib::subclass::Signal>> = OnceLock::new();
            SIGNALS.get_or_init(|| vec![glib::subclass::Signal::builder("check-done").build()])
        }
    }

    impl WidgetImpl for CheckProgressPage {}
    impl BoxImpl for CheckProgressPage {}
}

glib::wrapper! {
    pub struct CheckProgressPage(ObjectSubclass<imp::CheckProgressPage>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl CheckProgressPage {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("spacing", 16)
            .property("valign", gtk::Align::Center)
            .property("vexpand", true)
            .build()
    }

    fn setup_ui(&self) {
        let imp = self.imp();

        let spinner = gtk::Spinner::builder()
            .width_request(48)
            .height_request(48)
            .spinning(true)
            .margin_bottom(16)
            .build();

        let progress_bar = gtk::ProgressBar::builder()
            .show_text(false)
            .width_request(300)
            .halign(gtk::Align::Center)
            .css_classes(["osd"])
            .build();

        let percent_label = gtk::Label::builder()
            .css_classes(["title-3", "numeric"])
            .build();

        let title_label = gtk::Label::builder()
            .label("Software Evaluation")
            .css_classes(["title-1"])
            .margin_top(20)
            .build();

        let status_label = gtk::Label::builder()
            .label("Evaluate the compatibility of installed apps in the new system")
            .css_classes(["dim-label"])
            .wrap(true)
            .justify(gtk::Justification::Center)
            .build();

        self.append(&spinner);
        self.append(&progress_bar);
        self.append(&percent_label);
        self.append(&title_label);
        self.append(&status_label);

        *imp.progress_bar.borrow_mut() = Some(progress_bar);
        *imp.percent_label.borrow_mut() = Some(percent_label);
        *imp.status_label.borrow_mut() = Some(status_label);
        *imp.spinner.borrow_mut() = Some(spinner);

        // Emit from an idle callback so handlers never run while the
        // progress model is still borrowed
        let page = self.downgrade();
        imp.progress.borrow_mut().connect_done(move || {
            let page = page.clone();
            glib::idle_add_local_once(move || {
                if let Some(page) = page.upgrade() {
                    page.emit_by_name::<()>("check-done", &[]);
                }
            });
        });

        self.refresh();
    }

    /// Apply a progress value from the worker
    pub fn on_check_progress_update(&self, progress: i32) {
        let completed = self.imp().progress.borrow_mut().update(progress);
        self.refresh();

        if completed {
            if let Some(ref spinner) = *self.imp().spinner.borrow() {
                spinner.set_spinning(false);
            }
        }
    }

    pub fn is_done(&self) -> bool {
        self.imp().progress.borrow().is_done()
    }

    /// Show a failure instead of the subtitle
    pub fn show_error(&self, message: &str) {
        let imp = self.imp();
        if let Some(ref label) = *imp.status_label.borrow() {
            label.set_label(message);
            label.add_css_class("error");
        }
        if let Some(ref spinner) = *imp.spinner.borrow() {
            spinner.set_spinning(false);
        }
    }

    fn refresh(&self) {
        let imp = self.imp();
        let progress = imp.progress.borrow();

        if let Some(ref bar) = *imp.progress_bar.borrow() {
            bar.set_fraction(progress.fraction());
        }

        if let Some(ref label) = *imp.percent_label.borrow() {
            label.set_label(&format!("{}%", progress.percent()));
        }
    }
}

impl Default for CheckProgressPage {
    fn default() -> Self {
        Self::new()
    }
}
