mod audit_log;
mod catalog;
mod reminder_settings;
mod session_flags;
mod shared;

pub use audit_log::{IAuditLogRepo, InMemoryAuditLogRepo};
pub use catalog::{load_catalog, parse_catalog, ICatalogRepo, InMemoryCatalogRepo};
pub use reminder_settings::{
    FileReminderSettingsRepo, IReminderSettingsRepo, InMemoryReminderSettingsRepo,
};
pub use session_flags::{ISessionFlagsRepo, InMemorySessionFlagsRepo};

use crate::Config;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub catalog: Arc<dyn ICatalogRepo>,
    pub reminder_settings: Arc<dyn IReminderSettingsRepo>,
    pub audit_log: Arc<dyn IAuditLogRepo>,
    pub session_flags: Arc<dyn ISessionFlagsRepo>,
}

impl Repos {
    /// Repositories backed by the local files named in the config.
    /// Without a catalog file the catalog starts empty, without a
    /// preferences file the settings only live in memory.
    pub async fn create_local(config: &Config) -> anyhow::Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => InMemoryCatalogRepo::from_events(load_catalog(path).await?),
            None => {
                info!("No CATALOG_PATH given, starting with an empty catalog");
                InMemoryCatalogRepo::new()
            }
        };
        let reminder_settings: Arc<dyn IReminderSettingsRepo> = match &config.preferences_path {
            Some(path) => Arc::new(FileReminderSettingsRepo::open(path).await),
            None => Arc::new(InMemoryReminderSettingsRepo::new()),
        };

        Ok(Self {
            catalog: Arc::new(catalog),
            reminder_settings,
            audit_log: Arc::new(InMemoryAuditLogRepo::new()),
            session_flags: Arc::new(InMemorySessionFlagsRepo::new()),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalogRepo::new()),
            reminder_settings: Arc::new(InMemoryReminderSettingsRepo::new()),
            audit_log: Arc::new(InMemoryAuditLogRepo::new()),
            session_flags: Arc::new(InMemorySessionFlagsRepo::new()),
        }
    }
}
