use super::watchdog::{InactivityWatchdog, SessionTerminator, WatchdogHandle};
use crate::notifications::NotificationStore;
use crate::reminders::{ReminderScheduler, SchedulerHandle};
use portal_scheduler_domain::{
    date::millis_to_utc, AuditAction, AuditLogEntry, AuditSeverity, Viewer,
};
use portal_scheduler_infra::PortalContext;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything that runs while a viewer is signed in: the notifications,
/// the reminder scheduler and the inactivity watchdog.
///
/// Ending or dropping the session stops the scheduler and the watchdog.
pub struct Session {
    viewer: Viewer,
    notifications: NotificationStore,
    scheduler: SchedulerHandle,
    watchdog: WatchdogHandle,
    ended: bool,
}

impl Session {
    /// Must be called from within a tokio runtime
    pub async fn start(
        ctx: &PortalContext,
        viewer: Viewer,
        terminator: Arc<dyn SessionTerminator>,
    ) -> Self {
        info!("Starting session for {} ({})", viewer.name, viewer.role.as_str());
        audit(ctx, &viewer, AuditAction::Login, "Signed in", AuditSeverity::Info).await;

        let notifications = NotificationStore::from_context(ctx);
        let scheduler =
            ReminderScheduler::start(ctx.clone(), viewer.clone(), notifications.clone());
        let watchdog = InactivityWatchdog::start(ctx, terminator);

        Self {
            viewer,
            notifications,
            scheduler,
            watchdog,
            ended: false,
        }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    pub fn watchdog(&self) -> &WatchdogHandle {
        &self.watchdog
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn end(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.scheduler.stop();
        self.watchdog.stop();
        self.notifications.shutdown();
        info!("Session of {} ended", self.viewer.name);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("viewer", &self.viewer)
            .field("scheduler", &self.scheduler.phase())
            .field("ended", &self.ended)
            .finish()
    }
}

/// Audit entries are best effort, a failure never affects the session
pub(crate) async fn audit(
    ctx: &PortalContext,
    viewer: &Viewer,
    action: AuditAction,
    details: &str,
    severity: AuditSeverity,
) {
    let timestamp = match millis_to_utc(ctx.sys.get_timestamp_millis()) {
        Some(timestamp) => timestamp,
        None => return,
    };
    let entry = AuditLogEntry::new(viewer, action, details, severity, timestamp);
    if let Err(e) = ctx.repos.audit_log.insert(&entry).await {
        warn!("Unable to write the {:?} audit entry: {:?}", action, e);
    }
}
