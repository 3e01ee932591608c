use super::ISessionFlagsRepo;
use crate::repos::shared::inmemory_repo::lock;
use portal_scheduler_domain::LogoutReason;
use std::sync::Mutex;

pub struct InMemorySessionFlagsRepo {
    logout_reason: Mutex<Option<LogoutReason>>,
}

impl InMemorySessionFlagsRepo {
    pub fn new() -> Self {
        Self {
            logout_reason: Mutex::new(None),
        }
    }
}

impl Default for InMemorySessionFlagsRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISessionFlagsRepo for InMemorySessionFlagsRepo {
    async fn set_logout_reason(&self, reason: LogoutReason) -> anyhow::Result<()> {
        *lock(&self.logout_reason) = Some(reason);
        Ok(())
    }

    async fn take_logout_reason(&self) -> Option<LogoutReason> {
        lock(&self.logout_reason).take()
    }
}
