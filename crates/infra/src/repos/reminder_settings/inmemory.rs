use super::IReminderSettingsRepo;
use portal_scheduler_domain::ReminderSettings;
use tokio::sync::watch;

pub struct InMemoryReminderSettingsRepo {
    settings: watch::Sender<ReminderSettings>,
}

impl InMemoryReminderSettingsRepo {
    pub fn new() -> Self {
        Self::with_settings(Default::default())
    }

    pub fn with_settings(settings: ReminderSettings) -> Self {
        let (settings, _) = watch::channel(settings);
        Self { settings }
    }
}

impl Default for InMemoryReminderSettingsRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderSettingsRepo for InMemoryReminderSettingsRepo {
    async fn get(&self) -> ReminderSettings {
        self.settings.borrow().clone()
    }

    async fn save(&self, settings: &ReminderSettings) -> anyhow::Result<()> {
        self.settings.send_replace(settings.clone());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<ReminderSettings> {
        self.settings.subscribe()
    }
}
