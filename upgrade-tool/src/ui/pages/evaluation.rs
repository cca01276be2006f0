//! Evaluation Page - Compatible and incompatible applications
//!
//! Collects verdicts while the check runs and shows them in a two-column
//! table once [`EvaluationPage::fill_table`] is called.

use crate::settings::Settings;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::cell::RefCell;
use upgrade_common::desktop_entry::AppInfo;
use upgrade_common::evaluation::{CompatStatus, DesktopMap, SoftwareEvaluation, TABLE_HEADERS};
use upgrade_common::icon::{IconSource, CELL_ICON_SIZE, FALLBACK_ICON};

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct EvaluationPage {
        pub evaluation: RefCell<Option<SoftwareEvaluation>>,
        pub table: RefCell<Option<gtk::Grid>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for EvaluationPage {
        const NAME: &'static str = "UpgradeEvaluationPage";
        type Type = super::EvaluationPage;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for EvaluationPage {}

    impl WidgetImpl for EvaluationPage {}
    impl BoxImpl for EvaluationPage {}
}

glib::wrapper! {
    pub struct EvaluationPage(ObjectSubclass<imp::EvaluationPage>)
        @extends gtk::Box, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Orientable;
}

impl EvaluationPage {
    pub fn new(settings: &Settings) -> Self {
        let obj: Self = glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("spacing", 20)
            .property("margin-start", 74)
            .property("margin-end", 74)
            .property("margin-top", 30)
            .property("vexpand", true)
            .build();

        *obj.imp().evaluation.borrow_mut() = Some(SoftwareEvaluation::new(
            &settings.applications_dir,
            settings.locale.as_str(),
        ));

        add_icon_search_path(settings);
        obj.setup_ui();

        obj
    }

    fn setup_ui(&self) {
        let title_label = gtk::Label::builder()
            .label("Evaluation Result")
            .css_classes(["title-2"])
            .halign(gtk::Align::Center)
            .build();

        let table = gtk::Grid::builder()
            .column_homogeneous(true)
            .row_spacing(8)
            .column_spacing(16)
            .css_classes(["evaluation-table"])
            .build();

        let scrolled = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .child(&table)
            .build();

        let power_tip_label = gtk::Label::builder()
            .label("The upgrade may take a long time. Please plug in to avoid interruption.")
            .css_classes(["caption", "dim-label"])
            .halign(gtk::Align::Center)
            .margin_bottom(8)
            .build();

        self.append(&title_label);
        self.append(&scrolled);
        self.append(&power_tip_label);

        *self.imp().table.borrow_mut() = Some(table);
        self.fill_table();
    }

    fn with_evaluation<R>(&self, f: impl FnOnce(&mut SoftwareEvaluation) -> R) -> Option<R> {
        self.imp().evaluation.borrow_mut().as_mut().map(f)
    }

    /// Replace the package -> desktop entries map
    pub fn set_desktop_map(&self, map: DesktopMap) {
        self.with_evaluation(|evaluation| evaluation.set_desktop_map(map));
    }

    /// Record a verdict for one package
    pub fn update_app_infos(&self, package: &str, status: i32) {
        self.with_evaluation(|evaluation| {
            evaluation.update_app_infos(package, CompatStatus::from_code(status))
        });
    }

    /// Forget all classified applications before a new run
    pub fn clear_app_infos(&self) {
        self.with_evaluation(|evaluation| evaluation.clear_app_infos());
    }

    /// Rebuild the result table from the classified applications
    pub fn fill_table(&self) {
        let imp = self.imp();
        let table = imp.table.borrow();
        let evaluation = imp.evaluation.borrow();
        let (Some(table), Some(evaluation)) = (table.as_ref(), evaluation.as_ref()) else {
            return;
        };

        while let Some(child) = table.first_child() {
            table.remove(&child);
        }

        for (column, header) in TABLE_HEADERS.iter().enumerate() {
            let label = gtk::Label::builder()
                .label(*header)
                .css_classes(["heading"])
                .halign(gtk::Align::Start)
                .build();
            table.attach(&label, column as i32, 0, 1, 1);
        }

        for (row, cells) in evaluation.table_rows().into_iter().enumerate() {
            for (column, info) in cells.into_iter().enumerate() {
                if let Some(info) = info {
                    table.attach(&cell_widget(info), column as i32, row as i32 + 1, 1, 1);
                }
            }
        }

        for info in evaluation.compatible() {
            tracing::debug!("compat app: {}", info.name);
        }
        for info in evaluation.incompatible() {
            tracing::debug!("incompat app: {}", info.name);
        }
        tracing::info!(
            "Evaluation table filled: {} compatible, {} incompatible",
            evaluation.compatible().len(),
            evaluation.incompatible().len()
        );
    }
}

/// Icon and name for one application
fn cell_widget(info: &AppInfo) -> gtk::Box {
    let cell = gtk::Box::builder()
        .orientation(gtk::Orientation::Horizontal)
        .spacing(10)
        .build();

    let icon = icon_image(&IconSource::from_icon_name(&info.icon_name));
    icon.set_pixel_size(CELL_ICON_SIZE);

    let name = gtk::Label::builder()
        .label(info.name.as_str())
        .halign(gtk::Align::Start)
        .ellipsize(gtk::pango::EllipsizeMode::End)
        .build();

    cell.append(&icon);
    cell.append(&name);
    cell
}

/// Load an icon, falling back to the generic executable icon
fn icon_image(source: &IconSource) -> gtk::Image {
    match source {
        IconSource::File(path) if path.exists() => gtk::Image::from_file(path),
        IconSource::Themed(name) if has_themed_icon(name) => gtk::Image::from_icon_name(name),
        _ => gtk::Image::from_icon_name(FALLBACK_ICON),
    }
}

fn has_themed_icon(name: &str) -> bool {
    gtk::gdk::Display::default()
        .map(|display| gtk::IconTheme::for_display(&display).has_icon(name))
        .unwrap_or(false)
}

fn add_icon_search_path(settings: &Settings) {
    match gtk::gdk::Display::default() {
        Some(display) => {
            gtk::IconTheme::for_display(&display).add_search_path(&settings.icons_dir);
        }
        None => tracing::warn!("No display available, icon search path not updated"),
    }
}
