use chrono::{DateTime, Utc};
use portal_scheduler_domain::{Notification, NotificationKind, ID};
use portal_scheduler_infra::{ISys, PortalContext};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

const BROADCAST_CAPACITY: usize = 64;

#[derive(Default)]
struct StoreState {
    /// Oldest first
    toasts: Vec<Notification>,
    /// Most recent first
    history: Vec<Notification>,
    expiry_timers: HashMap<ID, JoinHandle<()>>,
}

impl StoreState {
    /// Removal by id is idempotent, so a dismiss racing the expiry timer
    /// removes the toast exactly once
    fn remove_toast(&mut self, id: &ID) -> bool {
        match self.toasts.iter().position(|n| n.id == *id) {
            Some(i) => {
                self.toasts.remove(i);
                true
            }
            None => false,
        }
    }

    fn history_entry(&mut self, id: &ID) -> Option<&mut Notification> {
        self.history.iter_mut().find(|n| n.id == *id)
    }
}

impl Drop for StoreState {
    fn drop(&mut self) {
        for (_, timer) in self.expiry_timers.drain() {
            timer.abort();
        }
    }
}

/// Holds the notifications of a session in two places: a queue of toasts
/// that expire on their own and the history the viewer manages.
///
/// The store is a cheap handle, clones share the same notifications.
#[derive(Clone)]
pub struct NotificationStore {
    state: Arc<Mutex<StoreState>>,
    sys: Arc<dyn ISys>,
    toast_lifetime: Duration,
    events: broadcast::Sender<Notification>,
}

impl NotificationStore {
    pub fn new(sys: Arc<dyn ISys>, toast_lifetime: Duration) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            state: Default::default(),
            sys,
            toast_lifetime,
            events,
        }
    }

    pub fn from_context(ctx: &PortalContext) -> Self {
        Self::new(
            ctx.sys.clone(),
            Duration::from_millis(ctx.config.toast_lifetime_millis),
        )
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        lock_state(&self.state)
    }

    fn now(&self) -> DateTime<Utc> {
        let millis = self.sys.get_timestamp_millis();
        portal_scheduler_domain::date::millis_to_utc(millis).unwrap_or_else(Utc::now)
    }

    /// Shows a new notification as a toast and records it unread in the
    /// history. The toast is removed after the toast lifetime.
    ///
    /// Must be called from within a tokio runtime.
    pub fn emit(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        target_page: Option<String>,
        resource_id: Option<String>,
    ) -> Notification {
        let notification = Notification::new(ID::new(), message, kind, self.now())
            .with_target(target_page, resource_id);
        debug!("Emitting notification: {}", notification.message);

        let expires_at = Instant::now() + self.toast_lifetime;
        let mut state = self.lock();
        state.toasts.push(notification.clone());
        state.history.insert(0, notification.clone());
        let timer = self.spawn_expiry_timer(notification.id.clone(), expires_at);
        state.expiry_timers.insert(notification.id.clone(), timer);
        drop(state);

        // Nobody listening is fine
        let _ = self.events.send(notification.clone());
        notification
    }

    /// The deadline is fixed by the caller, so a task that is polled late
    /// does not extend the toast lifetime
    fn spawn_expiry_timer(&self, id: ID, expires_at: Instant) -> JoinHandle<()> {
        let state = Arc::downgrade(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            expire_toast(state, &id);
        })
    }

    /// Closes a toast. The history keeps the notification.
    pub fn dismiss(&self, id: &ID) -> bool {
        let mut state = self.lock();
        if let Some(timer) = state.expiry_timers.remove(id) {
            timer.abort();
        }
        state.remove_toast(id)
    }

    pub fn mark_read(&self, id: &ID) -> bool {
        match self.lock().history_entry(id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&self) {
        for notification in self.lock().history.iter_mut() {
            notification.read = true;
        }
    }

    /// Removes the notification from the history only
    pub fn delete(&self, id: &ID) -> Option<Notification> {
        let mut state = self.lock();
        let i = state.history.iter().position(|n| n.id == *id)?;
        Some(state.history.remove(i))
    }

    pub fn clear(&self) {
        self.lock().history.clear();
    }

    pub fn toasts(&self) -> Vec<Notification> {
        self.lock().toasts.clone()
    }

    pub fn history(&self) -> Vec<Notification> {
        self.lock().history.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.lock().history.iter().filter(|n| !n.read).count()
    }

    /// Receives every emitted notification
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    /// Cancels the pending expiry timers and removes every toast.
    /// The history is left untouched.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        for (_, timer) in state.expiry_timers.drain() {
            timer.abort();
        }
        state.toasts.clear();
    }
}

fn lock_state(state: &Mutex<StoreState>) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn expire_toast(state: Weak<Mutex<StoreState>>, id: &ID) {
    // The store is gone, so is the toast
    let state = match state.upgrade() {
        Some(state) => state,
        None => return,
    };
    let mut state = lock_state(&state);
    state.expiry_timers.remove(id);
    if state.remove_toast(id) {
        debug!("Toast {} expired", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::prelude::*;
    use portal_scheduler_infra::SimulatedSys;

    const LIFETIME: Duration = Duration::from_millis(5000);

    fn store() -> NotificationStore {
        let start = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 8, 0, 0)
            .unwrap();
        NotificationStore::new(Arc::new(SimulatedSys::new(start)), LIFETIME)
    }

    fn info(store: &NotificationStore, message: &str) -> Notification {
        store.emit(message, NotificationKind::Info, None, None)
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emit_records_toast_and_unread_history() {
        let store = store();
        let first = info(&store, "first");
        let second = store.emit(
            "Exam reminder: SQL in 55 min",
            NotificationKind::Warning,
            Some("exams".into()),
            Some("e1".into()),
        );

        let toasts = store.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].id, first.id);

        let history = store.history();
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert!(history.iter().all(|n| !n.read));
        assert_eq!(history[0].target_page.as_deref(), Some("exams"));
        assert_eq!(history[0].resource_id.as_deref(), Some("e1"));
        assert_eq!(
            history[0].created_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(store.unread_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_keeps_history() {
        let store = store();
        let n = info(&store, "hello");

        assert!(store.dismiss(&n.id));
        assert!(store.toasts().is_empty());
        assert!(!store.dismiss(&n.id));

        let history = store.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].read);
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_after_their_lifetime() {
        let store = store();
        info(&store, "first");
        tokio::time::advance(Duration::from_millis(1000)).await;
        let second = info(&store, "second");

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert_eq!(store.toasts().len(), 2);

        // Just past the deadline of the first toast
        tokio::time::sleep(Duration::from_millis(2)).await;
        let toasts = store.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].id, second.id);

        tokio::time::sleep(LIFETIME).await;
        assert!(store.toasts().is_empty());
        assert_eq!(store.history().len(), 2);
        assert!(lock_state(&store.state).expiry_timers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn lifetime_counts_from_emit_not_from_the_first_poll() {
        let store = store();
        let n = info(&store, "late");

        // The clock moves before the expiry task ever runs
        tokio::time::advance(LIFETIME + Duration::from_millis(1)).await;
        settle().await;
        assert!(store.toasts().is_empty());
        assert!(!store.dismiss(&n.id));
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_racing_expiry_removes_once() {
        let store = store();
        let n = info(&store, "racing");
        let other = info(&store, "other");

        tokio::time::sleep(LIFETIME + Duration::from_millis(1)).await;
        // Both expired, dismissing afterwards is a no-op
        assert!(!store.dismiss(&n.id));
        assert!(!store.dismiss(&other.id));
        assert!(store.toasts().is_empty());
        assert_eq!(store.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn history_operations_never_touch_toasts() {
        let store = store();
        let a = info(&store, "a");
        let b = info(&store, "b");
        let c = info(&store, "c");

        assert!(store.mark_read(&a.id));
        assert!(!store.mark_read(&ID::new()));
        assert_eq!(store.unread_count(), 2);

        assert_eq!(store.delete(&b.id).map(|n| n.id), Some(b.id.clone()));
        assert!(store.delete(&b.id).is_none());
        assert_eq!(store.toasts().len(), 3);

        store.mark_all_read();
        assert_eq!(store.unread_count(), 0);
        assert_eq!(store.history()[0].id, c.id);

        store.clear();
        assert!(store.history().is_empty());
        assert_eq!(store.toasts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_receive_emitted_notifications() {
        let store = store();
        let mut receiver = store.subscribe();
        let n = info(&store, "hello");
        assert_eq!(receiver.recv().await.unwrap(), n);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_timers() {
        let store = store();
        info(&store, "a");
        info(&store, "b");

        store.shutdown();
        assert!(store.toasts().is_empty());
        assert!(lock_state(&store.state).expiry_timers.is_empty());
        assert_eq!(store.history().len(), 2);

        tokio::time::sleep(LIFETIME * 2).await;
        assert_eq!(store.history().len(), 2);
    }
}
