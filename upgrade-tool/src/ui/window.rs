//! Upgrade Window - Main window hosting the evaluation wizard

use crate::settings::Settings;
use crate::ui::app::UpgradeApplication;
use crate::ui::wizard::WizardStack;
use adw::prelude::*;
use adw::subclass::prelude::*;
use gtk::glib;
use std::sync::Arc;
use upgrade_common::worker::UpgradeWorker;

mod imp {
    use super::*;

    #[derive(gtk::CompositeTemplate, Default)]
    #[template(string = r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <interface>
            <template class="UpgradeWindow" parent="AdwApplicationWindow">
                <property name="default-width">820</property>
                <property name="default-height">620</property>
                <property name="title">System Upgrade</property>
                <style>
                    <class name="upgrade-window"/>
                </style>
                <property name="content">
                    <object class="GtkBox">
                        <property name="orientation">vertical</property>
                        <child>
                            <object class="AdwHeaderBar">
                                <style>
                                    <class name="flat"/>
                                </style>
                            </object>
                        </child>
                        <child>
                            <object class="GtkBox" id="content_box">
                                <property name="orientation">vertical</property>
                                <property name="vexpand">true</property>
                                <property name="margin-bottom">24</property>
                            </object>
                        </child>
                    </object>
                </property>
            </template>
        </interface>
    "#)]
    pub struct UpgradeWindow {
        #[template_child]
        pub content_box: TemplateChild<gtk::Box>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for UpgradeWindow {
        const NAME: &'static str = "UpgradeWindow";
        type Type = super::UpgradeWindow;
        type ParentType = adw::ApplicationWindow;

        fn class_init(klass: &mut Self::Class) {
            klass.bind_template();
        }

        fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
            obj.init_template();
        }
    }

    impl ObjectImpl for UpgradeWindow {}
    impl WidgetImpl for UpgradeWindow {}
    impl WindowImpl for UpgradeWindow {}
    impl ApplicationWindowImpl for UpgradeWindow {}
    impl AdwApplicationWindowImpl for UpgradeWindow {}
}

glib::wrapper! {
    pub struct UpgradeWindow(ObjectSubclass<imp::UpgradeWindow>)
        @extends adw::ApplicationWindow, gtk::ApplicationWindow, gtk::Window, gtk::Widget,
        @implements gtk::Accessible, gtk::Buildable, gtk::ConstraintTarget, gtk::Native, gtk::Root, gtk::ShortcutManager;
}

impl UpgradeWindow {
    pub fn new(
        app: &UpgradeApplication,
        worker: Arc<dyn UpgradeWorker>,
        settings: &Settings,
    ) -> Self {
        let window: Self = glib::Object::builder()
            .property("application", app)
            .build();

        let wizard = WizardStack::new(worker, settings);
        window.imp().content_box.append(&wizard);

        wizard.connect_local(
            "evaluation-complete",
            false,
            glib::clone!(@weak window => @default-return None, move |_| {
                window.set_title(Some("Evaluation Result"));
                None
            }),
        );

        window
    }
}
