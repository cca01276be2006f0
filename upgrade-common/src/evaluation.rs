//! Software Evaluation
//!
//! Classifies installed applications as compatible or incompatible with
//! the target system. The worker first publishes which desktop entries
//! belong to which package, then streams one verdict per package; each
//! verdict turns the package's desktop entries into [`AppInfo`] rows.

use crate::desktop_entry::AppInfo;
use crate::paths;
use crate::worker::WorkerEvent;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// Package identifier -> desktop entry filenames, in declaration order
pub type DesktopMap = HashMap<String, Vec<String>>;

/// Wire code the worker uses for a compatible package
pub const STATUS_COMPATIBLE: i32 = 1;

/// Column headers of the result table
pub const TABLE_HEADERS: [&str; 2] = ["Compatible Apps", "Incompatible Apps"];

/// Compatibility verdict for one package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatStatus {
    Compatible,
    Incompatible,
}

impl CompatStatus {
    /// Decode the worker's status code; anything but 1 is incompatible
    pub fn from_code(code: i32) -> Self {
        if code == STATUS_COMPATIBLE {
            CompatStatus::Compatible
        } else {
            CompatStatus::Incompatible
        }
    }
}

/// Holds the latest desktop map as an immutable snapshot.
///
/// Updates swap the whole map; readers keep whichever snapshot they
/// grabbed, so a partially replaced map is never observed.
#[derive(Debug, Default)]
pub struct DesktopMapStore {
    current: RwLock<Arc<DesktopMap>>,
}

impl DesktopMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the map wholesale
    pub fn replace(&self, map: DesktopMap) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(map);
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<DesktopMap> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// One row of the two-column result table
pub type TableRow<'a> = [Option<&'a AppInfo>; 2];

/// Accumulates compatible and incompatible applications for one run
#[derive(Debug)]
pub struct SoftwareEvaluation {
    desktop_map: DesktopMapStore,
    applications_dir: PathBuf,
    locale: String,
    compatible: Vec<AppInfo>,
    incompatible: Vec<AppInfo>,
}

impl SoftwareEvaluation {
    /// Create an evaluation reading desktop entries from `applications_dir`
    pub fn new(applications_dir: impl Into<PathBuf>, locale: impl Into<String>) -> Self {
        Self {
            desktop_map: DesktopMapStore::new(),
            applications_dir: applications_dir.into(),
            locale: locale.into(),
            compatible: Vec::new(),
            incompatible: Vec::new(),
        }
    }

    /// Replace the package -> desktop entries map
    pub fn set_desktop_map(&self, map: DesktopMap) {
        tracing::debug!("Desktop map replaced: {} packages", map.len());
        self.desktop_map.replace(map);
    }

    /// Record a verdict for `package`.
    ///
    /// Unknown packages are ignored. Returns how many applications were added.
    pub fn update_app_infos(&mut self, package: &str, status: CompatStatus) -> usize {
        let snapshot = self.desktop_map.snapshot();
        let Some(filenames) = snapshot.get(package) else {
            tracing::debug!("No desktop entries known for {}, ignoring verdict", package);
            return 0;
        };

        for filename in filenames {
            let path = paths::desktop::resolve(&self.applications_dir, filename);
            let info = AppInfo::from_desktop_file(&path, &self.locale);
            tracing::debug!("Adding desktop entry {} for {}", filename, package);

            match status {
                CompatStatus::Compatible => self.compatible.push(info),
                CompatStatus::Incompatible => self.incompatible.push(info),
            }
        }

        filenames.len()
    }

    /// Apply the evaluation-related worker events; others are ignored
    pub fn handle_event(&mut self, event: &WorkerEvent) {
        match event {
            WorkerEvent::AppsAvailable(map) => self.set_desktop_map(map.clone()),
            WorkerEvent::MigrateStatus { package, status } => {
                self.update_app_infos(package, CompatStatus::from_code(*status));
            }
            WorkerEvent::CheckProgress(_) => {}
        }
    }

    /// Forget all classified applications before a new run
    pub fn clear_app_infos(&mut self) {
        self.compatible.clear();
        self.incompatible.clear();
    }

    pub fn compatible(&self) -> &[AppInfo] {
        &self.compatible
    }

    pub fn incompatible(&self) -> &[AppInfo] {
        &self.incompatible
    }

    /// Number of table rows needed to show both columns
    pub fn row_count(&self) -> usize {
        self.compatible.len().max(self.incompatible.len())
    }

    /// Rows for the result table: compatible apps left, incompatible right
    pub fn table_rows(&self) -> Vec<TableRow<'_>> {
        (0..self.row_count())
            .map(|i| [self.compatible.get(i), self.incompatible.get(i)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, SoftwareEvaluation) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("foo.desktop"), "Name=Foo App\nIcon=foo-icon\n").unwrap();
        std::fs::write(dir.path().join("bar.desktop"), "Name=Bar\nIcon=/opt/bar.png\n").unwrap();
        std::fs::write(
            dir.path().join("bar-settings.desktop"),
            "Name=Bar Settings\nNoDisplay=true\n",
        )
        .unwrap();

        let evaluation = SoftwareEvaluation::new(dir.path(), "C");
        evaluation.set_desktop_map(DesktopMap::from([
            ("foo".to_string(), vec!["foo.desktop".to_string()]),
            (
                "bar".to_string(),
                vec!["bar.desktop".to_string(), "bar-settings.desktop".to_string()],
            ),
            ("ghost".to_string(), vec!["ghost.desktop".to_string()]),
        ]));

        (dir, evaluation)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CompatStatus::from_code(1), CompatStatus::Compatible);
        assert_eq!(CompatStatus::from_code(0), CompatStatus::Incompatible);
        assert_eq!(CompatStatus::from_code(2), CompatStatus::Incompatible);
        assert_eq!(CompatStatus::from_code(-1), CompatStatus::Incompatible);
    }

    #[test]
    fn test_compatible_package() {
        let (_dir, mut evaluation) = setup();

        assert_eq!(evaluation.update_app_infos("foo", CompatStatus::Compatible), 1);
        assert_eq!(
            evaluation.compatible(),
            &[AppInfo {
                name: "Foo App".to_string(),
                icon_name: "foo-icon".to_string(),
                no_display: false,
            }]
        );
        assert!(evaluation.incompatible().is_empty());
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let (_dir, mut evaluation) = setup();

        evaluation.update_app_infos("bar", CompatStatus::Incompatible);
        let names: Vec<_> = evaluation.incompatible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Bar", "Bar Settings"]);
        assert!(evaluation.incompatible()[1].no_display);
        assert!(evaluation.compatible().is_empty());
    }

    #[test]
    fn test_compatible_declaration_order_is_kept() {
        let (_dir, mut evaluation) = setup();

        assert_eq!(evaluation.update_app_infos("bar", CompatStatus::from_code(1)), 2);
        let names: Vec<_> = evaluation.compatible().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Bar", "Bar Settings"]);
        assert_eq!(evaluation.compatible()[0].icon_name, "/opt/bar.png");
        assert!(evaluation.incompatible().is_empty());
    }

    #[test]
    fn test_unknown_package_is_ignored() {
        let (_dir, mut evaluation) = setup();
        evaluation.update_app_infos("foo", CompatStatus::Compatible);

        assert_eq!(evaluation.update_app_infos("nope", CompatStatus::Compatible), 0);
        assert_eq!(evaluation.update_app_infos("nope", CompatStatus::Incompatible), 0);
        assert_eq!(evaluation.compatible().len(), 1);
        assert!(evaluation.incompatible().is_empty());
    }

    #[test]
    fn test_missing_entry_file_uses_path() {
        let (dir, mut evaluation) = setup();

        evaluation.update_app_infos("ghost", CompatStatus::Incompatible);
        let expected = dir.path().join("ghost.desktop").display().to_string();
        assert_eq!(evaluation.incompatible()[0].name, expected);
    }

    #[test]
    fn test_lists_accumulate_until_cleared() {
        let (_dir, mut evaluation) = setup();

        evaluation.update_app_infos("foo", CompatStatus::Compatible);
        evaluation.update_app_infos("foo", CompatStatus::Compatible);
        assert_eq!(evaluation.compatible().len(), 2);

        evaluation.clear_app_infos();
        assert!(evaluation.compatible().is_empty());
        assert!(evaluation.incompatible().is_empty());
        assert_eq!(evaluation.row_count(), 0);
    }

    #[test]
    fn test_map_is_replaced_not_merged() {
        let (_dir, mut evaluation) = setup();

        evaluation.set_desktop_map(DesktopMap::from([(
            "baz".to_string(),
            vec!["foo.desktop".to_string()],
        )]));

        assert_eq!(evaluation.update_app_infos("foo", CompatStatus::Compatible), 0);
        assert_eq!(evaluation.update_app_infos("baz", CompatStatus::Compatible), 1);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = DesktopMapStore::new();
        store.replace(DesktopMap::from([("a".to_string(), vec![])]));

        let old = store.snapshot();
        store.replace(DesktopMap::new());

        assert!(old.contains_key("a"));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_handle_event() {
        let (_dir, mut evaluation) = setup();

        evaluation.handle_event(&WorkerEvent::CheckProgress(50));
        evaluation.handle_event(&WorkerEvent::MigrateStatus {
            package: "foo".to_string(),
            status: 1,
        });
        evaluation.handle_event(&WorkerEvent::MigrateStatus {
            package: "bar".to_string(),
            status: 3,
        });

        assert_eq!(evaluation.compatible().len(), 1);
        assert_eq!(evaluation.incompatible().len(), 2);
    }

    #[test]
    fn test_table_rows() {
        let (_dir, mut evaluation) = setup();
        evaluation.update_app_infos("foo", CompatStatus::Compatible);
        evaluation.update_app_infos("bar", CompatStatus::Incompatible);

        let rows = evaluation.table_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].map(|a| a.name.as_str()), Some("Foo App"));
        assert_eq!(rows[0][1].map(|a| a.name.as_str()), Some("Bar"));
        assert!(rows[1][0].is_none());
        assert_eq!(rows[1][1].map(|a| a.name.as_str()), Some("Bar Settings"));
    }
}
