mod inmemory;

pub use inmemory::InMemorySessionFlagsRepo;
use portal_scheduler_domain::LogoutReason;

/// Short-lived flags handed from one session to the next view
#[async_trait::async_trait]
pub trait ISessionFlagsRepo: Send + Sync {
    async fn set_logout_reason(&self, reason: LogoutReason) -> anyhow::Result<()>;
    /// Returns the logout reason at most once
    async fn take_logout_reason(&self) -> Option<LogoutReason>;
}
