mod inmemory;

pub use inmemory::InMemoryAuditLogRepo;
use portal_scheduler_domain::AuditLogEntry;

#[async_trait::async_trait]
pub trait IAuditLogRepo: Send + Sync {
    async fn insert(&self, entry: &AuditLogEntry) -> anyhow::Result<()>;
    /// Most recent entry first
    async fn find_all(&self) -> Vec<AuditLogEntry>;
}
