use super::IAuditLogRepo;
use crate::repos::shared::inmemory_repo::*;
use portal_scheduler_domain::AuditLogEntry;

pub struct InMemoryAuditLogRepo {
    entries: std::sync::Mutex<Vec<AuditLogEntry>>,
}

impl InMemoryAuditLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAuditLogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IAuditLogRepo for InMemoryAuditLogRepo {
    async fn insert(&self, entry: &AuditLogEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn find_all(&self) -> Vec<AuditLogEntry> {
        let mut entries = find_by(&self.entries, |_| true);
        entries.reverse();
        entries
    }
}
