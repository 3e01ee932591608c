use crate::notifications::NotificationStore;
use portal_scheduler_domain::{evaluate_reminders, DedupTracker, ReminderSettings, Viewer};
use portal_scheduler_infra::PortalContext;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No session, or reminders are disabled
    Idle,
    /// Evaluating reminders on every tick
    Armed,
}

/// State shared by the loop and its handle. Every effect of a tick happens
/// while holding it, after checking `active`.
struct TickState {
    active: bool,
    phase: SchedulerPhase,
    tracker: DedupTracker,
}

type SharedTickState = Arc<Mutex<TickState>>;

fn lock(state: &Mutex<TickState>) -> MutexGuard<'_, TickState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// Periodically turns the catalog of the session viewer into reminders
pub struct ReminderScheduler {
    ctx: PortalContext,
    viewer: Viewer,
    notifications: NotificationStore,
    state: SharedTickState,
}

impl ReminderScheduler {
    /// Spawns the loop on the current tokio runtime. Reminders that are
    /// already due are evaluated right away.
    pub fn start(
        ctx: PortalContext,
        viewer: Viewer,
        notifications: NotificationStore,
    ) -> SchedulerHandle {
        let state = Arc::new(Mutex::new(TickState {
            active: true,
            phase: SchedulerPhase::Idle,
            tracker: DedupTracker::new(),
        }));
        let scheduler = Self {
            ctx,
            viewer,
            notifications,
            state: state.clone(),
        };
        info!("Starting reminder scheduler for {}", scheduler.viewer.name);
        let task = tokio::spawn(scheduler.run());
        SchedulerHandle {
            state,
            task: Some(task),
        }
    }

    fn tick_period(&self) -> Duration {
        Duration::from_secs(self.ctx.config.reminder_tick_secs.max(1))
    }

    async fn run(self) {
        let mut catalog_changes = self.ctx.repos.catalog.subscribe();
        let mut settings_changes = self.ctx.repos.reminder_settings.subscribe();
        let mut catalog_open = true;

        loop {
            let settings = settings_changes.borrow_and_update().clone();
            if !settings.enabled {
                if !self.set_phase(SchedulerPhase::Idle) {
                    return;
                }
                debug!("Reminders are disabled, waiting for the settings to change");
                if settings_changes.changed().await.is_err() {
                    return;
                }
                continue;
            }

            // Armed until the settings disable reminders again
            let mut ticks = interval(self.tick_period());
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {}
                    changed = catalog_changes.changed(), if catalog_open => {
                        if changed.is_err() {
                            catalog_open = false;
                            continue;
                        }
                        debug!("Catalog changed, evaluating reminders");
                    }
                    changed = settings_changes.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        debug!("Reminder settings changed, evaluating reminders");
                    }
                }

                let settings = settings_changes.borrow_and_update().clone();
                if !settings.enabled {
                    break;
                }
                catalog_changes.borrow_and_update();
                if !self.tick(&settings).await {
                    return;
                }
            }
        }
    }

    /// Returns false once the scheduler was stopped
    fn set_phase(&self, phase: SchedulerPhase) -> bool {
        let mut state = lock(&self.state);
        if !state.active {
            return false;
        }
        if state.phase != phase {
            info!("Reminder scheduler is now {:?}", phase);
            state.phase = phase;
        }
        true
    }

    /// Returns false once the scheduler was stopped
    async fn tick(&self, settings: &ReminderSettings) -> bool {
        let catalog = self.ctx.repos.catalog.snapshot().await.visible_to(&self.viewer);
        let now = self.ctx.sys.local_now();

        let mut state = lock(&self.state);
        // Stopped while the catalog was loading
        if !state.active {
            return false;
        }
        if state.phase != SchedulerPhase::Armed {
            info!("Reminder scheduler is now {:?}", SchedulerPhase::Armed);
            state.phase = SchedulerPhase::Armed;
        }
        let sys = &self.ctx.sys;
        let reminders = evaluate_reminders(
            &now,
            |date, time| sys.local_instant(date, time),
            &catalog,
            settings,
            &mut state.tracker,
        );
        debug!(
            "Evaluated {} calendar events at {}, {} reminders due",
            catalog.len(),
            now,
            reminders.len()
        );
        for reminder in reminders {
            self.notifications.emit(
                reminder.message,
                reminder.kind,
                Some(reminder.target_page.as_str().to_string()),
                Some(reminder.resource_id.as_string()),
            );
        }
        true
    }
}

/// Releasing the handle stops the scheduler
pub struct SchedulerHandle {
    state: SharedTickState,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// When this returns no more reminders are emitted, even by a tick
    /// that was already running
    pub fn stop(&mut self) {
        {
            let mut state = lock(&self.state);
            state.active = false;
            state.phase = SchedulerPhase::Idle;
        }
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Reminder scheduler stopped");
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        lock(&self.state).phase
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).active
    }

    /// Number of alert windows that already produced a reminder
    pub fn consumed_windows(&self) -> usize {
        lock(&self.state).tracker.len()
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use portal_scheduler_domain::{
        CalendarEvent, Course, EventCatalog, Exam, Meet, NotificationKind, Role, ID,
    };
    use portal_scheduler_infra::{ICatalogRepo, InMemoryCatalogRepo, SimulatedSys};
    use tokio::sync::Notify;

    const MINUTE: Duration = Duration::from_secs(60);

    struct TestContext {
        ctx: PortalContext,
        store: NotificationStore,
        start: DateTime<FixedOffset>,
    }

    // 2024-01-01 is a Monday
    fn setup(h: u32, m: u32) -> TestContext {
        let start = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, h, m, 0)
            .unwrap();
        let mut ctx = PortalContext::create_inmemory();
        ctx.sys = Arc::new(SimulatedSys::new(start));
        ctx.config.reminder_tick_secs = 60;
        let store = NotificationStore::new(ctx.sys.clone(), Duration::from_millis(5000));
        TestContext { ctx, store, start }
    }

    fn viewer() -> Viewer {
        Viewer::new("Aminata", Role::Student, Some(class_id()))
    }

    fn class_id() -> ID {
        "l3".parse().unwrap()
    }

    fn course(id: &str, start_time: &str) -> CalendarEvent {
        Course {
            id: id.parse().unwrap(),
            subject: "Algorithms".into(),
            teacher: "M. Fall".into(),
            room: "S202".into(),
            day_of_week: 1,
            start_time: start_time.into(),
            end_time: None,
            class_id: class_id(),
        }
        .into()
    }

    fn exam(id: &str, occurs_at: DateTime<FixedOffset>) -> CalendarEvent {
        Exam {
            id: id.parse().unwrap(),
            subject: "SQL".into(),
            room: "Amphi A".into(),
            occurs_at: occurs_at.with_timezone(&Utc),
            duration_minutes: 120,
            notes: None,
            class_id: class_id(),
        }
        .into()
    }

    fn meet(id: &str, occurs_at: DateTime<FixedOffset>, class: &str) -> CalendarEvent {
        Meet {
            id: id.parse().unwrap(),
            subject: "React".into(),
            teacher_name: "M. Diop".into(),
            link: None,
            occurs_at: occurs_at.with_timezone(&Utc),
            class_id: class.parse().unwrap(),
        }
        .into()
    }

    fn messages(store: &NotificationStore) -> Vec<String> {
        store
            .history()
            .into_iter()
            .rev()
            .map(|n| n.message)
            .collect()
    }

    /// Lets the spawned tasks run without moving the clock
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn evaluates_immediately_and_once_per_day() {
        let t = setup(7, 50);
        t.ctx.repos.catalog.insert(&course("c1", "08:00")).await.unwrap();

        let handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        settle().await;
        assert_eq!(handle.phase(), SchedulerPhase::Armed);
        assert_eq!(messages(&t.store), vec!["Reminder: Algorithms in 10 min (S202)"]);

        let reminder = &t.store.history()[0];
        assert_eq!(reminder.kind, NotificationKind::Info);
        assert_eq!(reminder.target_page.as_deref(), Some("timetable"));
        assert_eq!(reminder.resource_id.as_deref(), Some("c1"));

        // 07:52 and every later tick of the window
        tokio::time::sleep(MINUTE * 9).await;
        settle().await;
        assert_eq!(t.store.history().len(), 1);
        assert_eq!(handle.consumed_windows(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn exam_fires_once_when_entering_its_window() {
        let t = setup(8, 0);
        let occurs_at = t.start + chrono::Duration::minutes(90);
        t.ctx.repos.catalog.insert(&exam("e1", occurs_at)).await.unwrap();
        let mut settings = ReminderSettings::default();
        settings.exam_delay_minutes = 60;
        t.ctx.repos.reminder_settings.save(&settings).await.unwrap();

        let _handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        settle().await;
        assert!(t.store.history().is_empty());

        tokio::time::sleep(MINUTE * 35).await;
        settle().await;
        // The window opened at +30 min, the reminder fired on that tick
        let history = t.store.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "Exam reminder: SQL in 60 min");
        assert_eq!(history[0].kind, NotificationKind::Warning);

        tokio::time::sleep(MINUTE * 60).await;
        settle().await;
        assert_eq!(t.store.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn catalog_changes_are_evaluated_without_waiting_for_a_tick() {
        let t = setup(8, 0);
        let _handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        settle().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        let occurs_at = t.start + chrono::Duration::minutes(20);
        t.ctx
            .repos
            .catalog
            .insert(&meet("m1", occurs_at, "l3"))
            .await
            .unwrap();
        // A meet of another class is never visible to the viewer
        t.ctx
            .repos
            .catalog
            .insert(&meet("m2", occurs_at, "m1-info"))
            .await
            .unwrap();
        settle().await;

        assert_eq!(messages(&t.store), vec!["Video reminder: React starts in 19 min"]);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_settings_idle_the_scheduler() {
        let t = setup(7, 50);
        t.ctx
            .repos
            .reminder_settings
            .save(&ReminderSettings::disabled())
            .await
            .unwrap();
        t.ctx.repos.catalog.insert(&course("c1", "08:00")).await.unwrap();

        let handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        tokio::time::sleep(MINUTE * 5).await;
        settle().await;
        assert_eq!(handle.phase(), SchedulerPhase::Idle);
        assert!(t.store.history().is_empty());
        assert_eq!(handle.consumed_windows(), 0);

        // 07:55, re-enabling evaluates right away
        t.ctx
            .repos
            .reminder_settings
            .save(&ReminderSettings::default())
            .await
            .unwrap();
        settle().await;
        assert_eq!(handle.phase(), SchedulerPhase::Armed);
        assert_eq!(messages(&t.store), vec!["Reminder: Algorithms in 5 min (S202)"]);
    }

    #[tokio::test(start_paused = true)]
    async fn reenabling_does_not_replay_closed_windows() {
        let t = setup(7, 50);
        t.ctx
            .repos
            .reminder_settings
            .save(&ReminderSettings::disabled())
            .await
            .unwrap();
        t.ctx.repos.catalog.insert(&course("c1", "08:00")).await.unwrap();

        let _handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        tokio::time::sleep(MINUTE * 15).await;
        t.ctx
            .repos
            .reminder_settings
            .save(&ReminderSettings::default())
            .await
            .unwrap();
        settle().await;
        assert!(t.store.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_emitted_after_stop() {
        let t = setup(7, 40);
        t.ctx.repos.catalog.insert(&course("c1", "08:00")).await.unwrap();

        let mut handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        settle().await;
        handle.stop();
        assert!(!handle.is_active());
        assert_eq!(handle.phase(), SchedulerPhase::Idle);

        tokio::time::sleep(MINUTE * 30).await;
        t.ctx.repos.catalog.insert(&course("c2", "08:20")).await.unwrap();
        settle().await;
        assert!(t.store.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_loop() {
        let t = setup(7, 40);
        t.ctx.repos.catalog.insert(&course("c1", "08:00")).await.unwrap();

        let handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        drop(handle);

        tokio::time::sleep(MINUTE * 10).await;
        settle().await;
        assert!(t.store.history().is_empty());
    }

    /// Catalog whose snapshots wait until they are released
    struct GatedCatalogRepo {
        events: InMemoryCatalogRepo,
        loading: Notify,
        release: Notify,
    }

    #[async_trait::async_trait]
    impl ICatalogRepo for GatedCatalogRepo {
        async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()> {
            self.events.insert(event).await
        }

        async fn delete(&self, event_id: &ID) -> Option<CalendarEvent> {
            self.events.delete(event_id).await
        }

        async fn replace(&self, events: Vec<CalendarEvent>) -> anyhow::Result<()> {
            self.events.replace(events).await
        }

        async fn snapshot(&self) -> EventCatalog {
            self.loading.notify_one();
            self.release.notified().await;
            self.events.snapshot().await
        }

        fn subscribe(&self) -> watch::Receiver<u64> {
            self.events.subscribe()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_during_a_tick_emits_nothing_from_it() {
        let mut t = setup(7, 50);
        let catalog = Arc::new(GatedCatalogRepo {
            events: InMemoryCatalogRepo::from_events(vec![course("c1", "08:00")]),
            loading: Notify::new(),
            release: Notify::new(),
        });
        t.ctx.repos.catalog = catalog.clone();

        let mut handle = ReminderScheduler::start(t.ctx.clone(), viewer(), t.store.clone());
        // The first tick is waiting for the catalog
        catalog.loading.notified().await;
        handle.stop();
        catalog.release.notify_one();
        settle().await;

        assert!(t.store.history().is_empty());
        assert_eq!(handle.consumed_windows(), 0);
        assert_eq!(handle.phase(), SchedulerPhase::Idle);
    }
}
