//! Upgrade Tool - Software evaluation screens
//!
//! This is the main entry point for the evaluation phase of the system
//! upgrade tool. It handles:
//! 1. CLI argument parsing (--report, --demo, --replay, path overrides)
//! 2. Loading the configuration file
//! 3. Choosing the worker (upgrade daemon on D-Bus, demo or replay)
//! 4. Launching the GTK4/Libadwaita wizard or the headless report

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use upgrade_common::config::{AssistantConfig, BusKind};
use upgrade_common::worker::{ReplayWorker, UpgradeWorker};
use upgrade_tool::dbus::DbusWorker;
use upgrade_tool::demo::DemoWorker;
use upgrade_tool::report::{self, ReportFormat};
use upgrade_tool::settings::Settings;
use upgrade_tool::ui;

/// Delay between replayed events
const REPLAY_INTERVAL: Duration = Duration::from_millis(50);

/// Upgrade Tool - Evaluate installed applications before a system upgrade
#[derive(Parser, Debug)]
#[command(name = "upgrade-tool")]
#[command(about = "Evaluate the compatibility of installed apps in the new system")]
#[command(version)]
struct Args {
    /// Config file (default: ~/.config/upgrade-assistant/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Simulate the upgrade daemon using local desktop entries
    #[arg(long, conflicts_with = "replay")]
    demo: bool,

    /// Replay recorded worker events from a JSON file
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Run without GUI and print the evaluation result
    #[arg(long)]
    report: bool,

    /// Print the report as JSON
    #[arg(long, requires = "report")]
    json: bool,

    /// Directory desktop entry filenames are resolved against
    #[arg(long, value_name = "DIR")]
    applications_dir: Option<PathBuf>,

    /// Icon theme directory
    #[arg(long, value_name = "DIR")]
    icons_dir: Option<PathBuf>,

    /// Locale for localized application names (e.g. zh_CN)
    #[arg(long)]
    locale: Option<String>,

    /// Listen on the session bus instead of the system bus
    #[arg(long)]
    session_bus: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _ = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();

    info!("Upgrade Tool v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => AssistantConfig::from_file(path)?,
        None => AssistantConfig::load()?,
    };
    let settings = resolve_settings(&args, &config);
    info!(
        "Applications: {:?}, locale: {}",
        settings.applications_dir, settings.locale
    );

    let worker = select_worker(&args, &settings)?;

    if args.report {
        let format = if args.json {
            ReportFormat::Json
        } else {
            ReportFormat::Table
        };
        report::run_report(worker, &settings, format)
    } else {
        run_gui(worker, settings)
    }
}

/// Apply command-line overrides on top of the config file
fn resolve_settings(args: &Args, config: &AssistantConfig) -> Settings {
    let mut settings = Settings::from_config(config);

    if let Some(dir) = &args.applications_dir {
        settings.applications_dir = dir.clone();
    }
    if let Some(dir) = &args.icons_dir {
        settings.icons_dir = dir.clone();
    }
    if let Some(locale) = &args.locale {
        settings.locale = locale.clone();
    }
    if args.session_bus {
        settings.dbus.bus = BusKind::Session;
    }

    settings
}

fn select_worker(args: &Args, settings: &Settings) -> Result<Arc<dyn UpgradeWorker>> {
    let worker: Arc<dyn UpgradeWorker> = if let Some(path) = &args.replay {
        let replay = ReplayWorker::from_json_file(path, REPLAY_INTERVAL)
            .context("Cannot load replay events")?;
        Arc::new(replay)
    } else if args.demo {
        Arc::new(DemoWorker::new(&settings.applications_dir))
    } else {
        Arc::new(DbusWorker::new(settings.dbus.clone()))
    };

    info!("Worker: {}", worker.describe());
    Ok(worker)
}

fn run_gui(worker: Arc<dyn UpgradeWorker>, settings: Settings) -> Result<()> {
    // Check for display availability before initializing GTK
    if std::env::var("DISPLAY").is_err() && std::env::var("WAYLAND_DISPLAY").is_err() {
        eprintln!("Error: No display server detected (X11 or Wayland).");
        eprintln!();
        eprintln!("To evaluate without a display, use:");
        eprintln!("  {} --report", std::env::current_exe()?.display());
        std::process::exit(1);
    }

    if let Err(e) = gtk::init() {
        eprintln!("Failed to initialize GTK4: {}", e);
        eprintln!("Please ensure GTK4 is installed on your system.");
        std::process::exit(1);
    }

    if let Err(e) = adw::init() {
        eprintln!("Failed to initialize Libadwaita: {}", e);
        eprintln!("Please ensure Libadwaita is installed on your system.");
        std::process::exit(1);
    }

    let app = ui::app::UpgradeApplication::new(worker, settings);
    let exit_code = app.run();

    std::process::exit(exit_code.value());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "upgrade-tool",
            "--applications-dir",
            "/tmp/apps",
            "--locale",
            "zh_CN",
            "--session-bus",
        ]);
        let settings = resolve_settings(&args, &AssistantConfig::default());

        assert_eq!(settings.applications_dir, PathBuf::from("/tmp/apps"));
        assert_eq!(settings.icons_dir, PathBuf::from("/usr/share/icons"));
        assert_eq!(settings.locale, "zh_CN");
        assert_eq!(settings.dbus.bus, BusKind::Session);
    }

    #[test]
    fn test_json_requires_report() {
        assert!(Args::try_parse_from(["upgrade-tool", "--json"]).is_err());
        assert!(Args::try_parse_from(["upgrade-tool", "--report", "--json"]).is_ok());
    }

    #[test]
    fn test_demo_conflicts_with_replay() {
        assert!(Args::try_parse_from(["upgrade-tool", "--demo", "--replay", "x.json"]).is_err());
    }

    #[test]
    fn test_select_worker() {
        let settings = Settings::default();

        let args = Args::parse_from(["upgrade-tool", "--demo"]);
        assert!(select_worker(&args, &settings).unwrap().describe().starts_with("demo"));

        let args = Args::parse_from(["upgrade-tool"]);
        assert!(select_worker(&args, &settings)
            .unwrap()
            .describe()
            .contains("org.deepin.SystemUpgrade1"));

        let args = Args::parse_from(["upgrade-tool", "--replay", "/nonexistent/events.json"]);
        assert!(select_worker(&args, &settings).is_err());
    }
}
