//! D-Bus Worker - Upgrade daemon signals
//!
//! Listens to the upgrade daemon's evaluation signals and forwards them as
//! [`WorkerEvent`]s.
//!
//! ARCHITECTURE: runs on a separate OS thread with its own Tokio runtime so
//! the GTK main thread never blocks on the bus. Events cross over through
//! the std::sync::mpsc sender handed to [`UpgradeWorker::start`].

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::thread;
use tokio_stream::StreamExt;
use upgrade_common::config::{BusKind, DbusConfig};
use upgrade_common::worker::{UpgradeWorker, WorkerEvent};
use zbus::{Connection, Message, Proxy};

/// Signal carrying the check progress (`i`)
pub const SIGNAL_PROGRESS: &str = "AppCheckProgressUpdate";

/// Signal carrying the package -> desktop entries map (`a{sas}`)
pub const SIGNAL_APPS_AVAILABLE: &str = "AppsAvailable";

/// Signal carrying one package verdict (`si`)
pub const SIGNAL_MIGRATE_STATUS: &str = "MigrateStatus";

/// Worker backed by the upgrade daemon on D-Bus
#[derive(Debug, Clone)]
pub struct DbusWorker {
    config: DbusConfig,
}

impl DbusWorker {
    pub fn new(config: DbusConfig) -> Self {
        Self { config }
    }
}

impl UpgradeWorker for DbusWorker {
    fn start(&self, sender: Sender<WorkerEvent>) -> Result<()> {
        let config = self.config.clone();

        thread::Builder::new()
            .name("dbus-worker".to_string())
            .spawn(move || {
                // Create Tokio runtime inside the worker thread
                let rt = match tokio::runtime::Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        tracing::error!("Failed to initialize async runtime: {}", e);
                        return;
                    }
                };

                if let Err(e) = rt.block_on(listen(config, sender)) {
                    tracing::error!("Upgrade daemon listener stopped: {:#}", e);
                }
            })
            .context("Failed to spawn D-Bus worker thread")?;

        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "{} {} on the {:?} bus",
            self.config.service, self.config.path, self.config.bus
        )
    }
}

/// Forward daemon signals until the bus closes or the receiver goes away
async fn listen(config: DbusConfig, sender: Sender<WorkerEvent>) -> Result<()> {
    let connection = match config.bus {
        BusKind::System => Connection::system()
            .await
            .context("Failed to connect to system D-Bus")?,
        BusKind::Session => Connection::session()
            .await
            .context("Failed to connect to session D-Bus")?,
    };

    let proxy = Proxy::new(
        &connection,
        config.service.clone(),
        config.path.clone(),
        config.interface.clone(),
    )
    .await
    .context("Failed to create upgrade daemon proxy")?;

    let signals = proxy
        .receive_all_signals()
        .await
        .context("Failed to subscribe to upgrade daemon signals")?;
    tokio::pin!(signals);

    tracing::info!("Listening for evaluation signals from {}", config.service);

    while let Some(message) = signals.next().await {
        let event = match decode_signal(&message) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping malformed signal: {:#}", e);
                continue;
            }
        };

        if sender.send(event).is_err() {
            tracing::debug!("Event receiver dropped, stopping D-Bus listener");
            break;
        }
    }

    Ok(())
}

/// Decode one daemon signal; unknown members yield `None`
fn decode_signal(message: &Message) -> Result<Option<WorkerEvent>> {
    let header = message.header();
    let Some(member) = header.member() else {
        return Ok(None);
    };
    let body = message.body();

    let event = match member.as_str() {
        SIGNAL_PROGRESS => {
            let progress: i32 = body.deserialize().context("Bad progress signal body")?;
            WorkerEvent::CheckProgress(progress)
        }
        SIGNAL_APPS_AVAILABLE => {
            let map: HashMap<String, Vec<String>> =
                body.deserialize().context("Bad apps-available signal body")?;
            tracing::debug!("Desktop map received: {} packages", map.len());
            WorkerEvent::AppsAvailable(map)
        }
        SIGNAL_MIGRATE_STATUS => {
            let (package, status): (String, i32) =
                body.deserialize().context("Bad migrate-status signal body")?;
            WorkerEvent::MigrateStatus { package, status }
        }
        other => {
            tracing::debug!("Ignoring signal {}", other);
            return Ok(None);
        }
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal<B>(member: &str, body: &B) -> Message
    where
        B: serde::Serialize + zbus::zvariant::DynamicType,
    {
        Message::signal("/org/deepin/SystemUpgrade1", "org.deepin.SystemUpgrade1", member)
            .unwrap()
            .build(body)
            .unwrap()
    }

    #[test]
    fn test_decode_progress() {
        let event = decode_signal(&signal(SIGNAL_PROGRESS, &42i32)).unwrap();
        assert_eq!(event, Some(WorkerEvent::CheckProgress(42)));
    }

    #[test]
    fn test_decode_apps_available() {
        let map = HashMap::from([(
            "foo".to_string(),
            vec!["foo.desktop".to_string(), "foo-helper.desktop".to_string()],
        )]);
        let event = decode_signal(&signal(SIGNAL_APPS_AVAILABLE, &map)).unwrap();
        assert_eq!(event, Some(WorkerEvent::AppsAvailable(map)));
    }

    #[test]
    fn test_decode_migrate_status() {
        let event =
            decode_signal(&signal(SIGNAL_MIGRATE_STATUS, &("foo".to_string(), 1i32))).unwrap();
        assert_eq!(
            event,
            Some(WorkerEvent::MigrateStatus {
                package: "foo".to_string(),
                status: 1,
            })
        );
    }

    #[test]
    fn test_unknown_signal_is_ignored() {
        let event = decode_signal(&signal("SomethingElse", &7i32)).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn test_wrong_body_is_an_error() {
        assert!(decode_signal(&signal(SIGNAL_PROGRESS, &"fifty".to_string())).is_err());
    }

    #[test]
    fn test_describe() {
        let worker = DbusWorker::new(DbusConfig::default());
        assert!(worker.describe().contains("org.deepin.SystemUpgrade1"));
    }
}
