use chrono::{DateTime, FixedOffset};
use portal_scheduler_api::Session;
use portal_scheduler_domain::{CalendarEvent, LogoutReason, Viewer};
use portal_scheduler_infra::{PortalContext, SimulatedSys};
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct TestApp {
    pub ctx: PortalContext,
    pub session: Session,
    /// Every call the watchdog makes to end the session
    pub terminations: mpsc::UnboundedReceiver<LogoutReason>,
}

pub fn create_context(start: DateTime<FixedOffset>) -> PortalContext {
    let mut ctx = PortalContext::create_inmemory();
    ctx.sys = Arc::new(SimulatedSys::new(start));
    ctx.config.reminder_tick_secs = 60;
    ctx.config.toast_lifetime_millis = 5000;
    ctx.config.inactivity_timeout_minutes = 15;
    ctx.config.inactivity_check_secs = 60;
    ctx
}

// Starts a session for the viewer with a clock frozen at `start`.
// Time only moves when the paused tokio clock is advanced.
pub async fn spawn_session(
    start: DateTime<FixedOffset>,
    viewer: Viewer,
    events: Vec<CalendarEvent>,
) -> TestApp {
    let ctx = create_context(start);
    ctx.repos
        .catalog
        .replace(events)
        .await
        .expect("To seed the catalog");

    let (tx, terminations) = mpsc::unbounded_channel();
    let terminator = move |reason: LogoutReason| {
        let _ = tx.send(reason);
    };
    let session = Session::start(&ctx, viewer, Arc::new(terminator)).await;

    TestApp {
        ctx,
        session,
        terminations,
    }
}
