//! Upgrade Application - GTK4 Application Setup
//!
//! Initializes the GTK4/Libadwaita application and handles the main event loop.

use crate::settings::Settings;
use crate::ui::window::UpgradeWindow;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::gio;
use std::cell::RefCell;
use std::sync::Arc;
use upgrade_common::worker::UpgradeWorker;

/// Application ID for the upgrade tool
const APP_ID: &str = "org.deepin.SystemUpgradeTool";

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct UpgradeApplication {
        pub worker: RefCell<Option<Arc<dyn UpgradeWorker>>>,
        pub settings: RefCell<Settings>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for UpgradeApplication {
        const NAME: &'static str = "UpgradeApplication";
        type Type = super::UpgradeApplication;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for UpgradeApplication {}

    impl ApplicationImpl for UpgradeApplication {
        fn activate(&self) {
            let app = self.obj();

            if let Some(window) = app.active_window() {
                window.present();
                return;
            }

            let Some(worker) = self.worker.borrow().clone() else {
                tracing::error!("Application activated without a worker");
                return;
            };

            let window = UpgradeWindow::new(&app, worker, &self.settings.borrow());
            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            if let Some(display) = gtk::gdk::Display::default() {
                let provider = gtk::CssProvider::new();
                provider.load_from_data(include_str!("styles.css"));
                gtk::style_context_add_provider_for_display(
                    &display,
                    &provider,
                    gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
                );
            }

            let app = self.obj();
            let quit = gio::ActionEntry::builder("quit")
                .activate(|app: &super::UpgradeApplication, _, _| app.quit())
                .build();
            app.add_action_entries([quit]);
            app.set_accels_for_action("app.quit", &["<Ctrl>q"]);
        }
    }

    impl GtkApplicationImpl for UpgradeApplication {}
    impl AdwApplicationImpl for UpgradeApplication {}
}

glib::wrapper! {
    pub struct UpgradeApplication(ObjectSubclass<imp::UpgradeApplication>)
        @extends adw::Application, gtk::Application, gio::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl UpgradeApplication {
    pub fn new(worker: Arc<dyn UpgradeWorker>, settings: Settings) -> Self {
        let app: Self = glib::Object::builder()
            .property("application-id", APP_ID)
            .property("flags", gio::ApplicationFlags::FLAGS_NONE)
            .build();

        let imp = app.imp();
        *imp.worker.borrow_mut() = Some(worker);
        *imp.settings.borrow_mut() = settings;

        app
    }

    pub fn run(&self) -> glib::ExitCode {
        // Command-line arguments were already parsed by clap
        ApplicationExtManual::run_with_args::<&str>(self, &[])
    }
}
