use portal_scheduler_domain::{ActivityClock, ActivitySignal, LogoutReason};
use portal_scheduler_infra::{ActivityBus, ListenerId, PortalContext};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Ends the session of the viewer. Logging out is not done by the
/// watchdog itself.
pub trait SessionTerminator: Send + Sync {
    fn terminate(&self, reason: LogoutReason);
}

impl<F> SessionTerminator for F
where
    F: Fn(LogoutReason) + Send + Sync,
{
    fn terminate(&self, reason: LogoutReason) {
        self(reason)
    }
}

struct WatchdogState {
    active: bool,
    clock: ActivityClock,
    listener: Option<ListenerId>,
}

type SharedWatchdogState = Arc<Mutex<WatchdogState>>;

fn lock(state: &Mutex<WatchdogState>) -> MutexGuard<'_, WatchdogState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Ends the session once the viewer has not interacted with the portal
/// for the configured inactivity timeout
pub struct InactivityWatchdog;

impl InactivityWatchdog {
    pub fn start(ctx: &PortalContext, terminator: Arc<dyn SessionTerminator>) -> WatchdogHandle {
        let sys = ctx.sys.clone();
        let state = Arc::new(Mutex::new(WatchdogState {
            active: true,
            clock: ActivityClock::new(sys.get_timestamp_millis()),
            listener: None,
        }));

        let listener_state = state.clone();
        let listener_sys = sys.clone();
        let listener = ctx.activity.register(Arc::new(move |signal: ActivitySignal| {
            let mut state = lock(&listener_state);
            if state.active {
                state.clock.record(listener_sys.get_timestamp_millis());
                debug!("Activity recorded: {:?}", signal);
            }
        }));
        match listener {
            Ok(id) => lock(&state).listener = Some(id),
            Err(e) => warn!(
                "Unable to listen for activity, inactivity is only polled: {}",
                e
            ),
        }

        let check = InactivityCheck {
            ctx: ctx.clone(),
            state: state.clone(),
            terminator,
        };
        let task = tokio::spawn(check.run());
        info!(
            "Inactivity watchdog started, timeout: {} minutes",
            ctx.config.inactivity_timeout_minutes
        );

        WatchdogHandle {
            state,
            bus: ctx.activity.clone(),
            task: Some(task),
        }
    }
}

struct InactivityCheck {
    ctx: PortalContext,
    state: SharedWatchdogState,
    terminator: Arc<dyn SessionTerminator>,
}

impl InactivityCheck {
    async fn run(self) {
        let period = Duration::from_secs(self.ctx.config.inactivity_check_secs.max(1));
        let timeout_millis = self.ctx.config.inactivity_timeout_millis();
        let mut checks = interval_at(Instant::now() + period, period);
        checks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            checks.tick().await;
            let now = self.ctx.sys.get_timestamp_millis();
            let listener = {
                let mut state = lock(&self.state);
                if !state.active {
                    return;
                }
                if !state.clock.is_idle(now, timeout_millis) {
                    continue;
                }
                state.active = false;
                state.listener.take()
            };
            if let Some(listener) = listener {
                self.ctx.activity.unregister(listener);
            }

            let reason = LogoutReason::Inactivity {
                idle_minutes: self.ctx.config.inactivity_timeout_minutes,
            };
            info!("Ending the session: {}", reason);
            if let Err(e) = self
                .ctx
                .repos
                .session_flags
                .set_logout_reason(reason)
                .await
            {
                warn!("Unable to keep the logout reason: {:?}", e);
            }
            self.terminator.terminate(reason);
            return;
        }
    }
}

/// Releasing the handle stops the watchdog and removes its listener
pub struct WatchdogHandle {
    state: SharedWatchdogState,
    bus: ActivityBus,
    task: Option<JoinHandle<()>>,
}

impl WatchdogHandle {
    pub fn stop(&mut self) {
        let listener = {
            let mut state = lock(&self.state);
            state.active = false;
            state.listener.take()
        };
        if let Some(listener) = listener {
            self.bus.unregister(listener);
        }
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Inactivity watchdog stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    pub fn last_activity_at(&self) -> i64 {
        lock(&self.state).clock.last_activity_at()
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
