use super::IReminderSettingsRepo;
use anyhow::Context;
use portal_scheduler_domain::ReminderSettings;
use std::path::PathBuf;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

/// Keeps the reminder settings in a JSON file.
///
/// The file is read once when opened, later reads are served from memory.
pub struct FileReminderSettingsRepo {
    path: PathBuf,
    settings: watch::Sender<ReminderSettings>,
    // Serializes writers so that the file always holds the last saved value
    write_lock: Mutex<()>,
}

impl FileReminderSettingsRepo {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<ReminderSettings>(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(
                        "The reminder preferences at {} are malformed, using the defaults: {}",
                        path.display(),
                        e
                    );
                    ReminderSettings::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No reminder preferences at {}, using the defaults",
                    path.display()
                );
                ReminderSettings::default()
            }
            Err(e) => {
                warn!(
                    "Unable to read the reminder preferences at {}, using the defaults: {}",
                    path.display(),
                    e
                );
                ReminderSettings::default()
            }
        };
        let (settings, _) = watch::channel(settings);
        Self {
            path,
            settings,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderSettingsRepo for FileReminderSettingsRepo {
    async fn get(&self) -> ReminderSettings {
        self.settings.borrow().clone()
    }

    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let raw = serde_json::to_string_pretty(settings)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, raw)
            .await
            .with_context(|| format!("Unable to write {}", self.path.display()))?;
        self.settings.send_replace(settings.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<ReminderSettings> {
        self.settings.subscribe()
    }
}
