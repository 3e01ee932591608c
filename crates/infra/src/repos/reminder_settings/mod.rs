mod file;
mod inmemory;

pub use file::FileReminderSettingsRepo;
pub use inmemory::InMemoryReminderSettingsRepo;
use portal_scheduler_domain::ReminderSettings;
use tokio::sync::watch;

/// Local preference store holding the viewer's reminder settings
#[async_trait::async_trait]
pub trait IReminderSettingsRepo: Send + Sync {
    async fn get(&self) -> ReminderSettings;
    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()>;
    /// Receives the settings every time they are saved
    fn subscribe(&self) -> watch::Receiver<ReminderSettings>;
}
