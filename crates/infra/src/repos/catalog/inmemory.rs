use super::ICatalogRepo;
use crate::repos::shared::inmemory_repo::*;
use portal_scheduler_domain::{CalendarEvent, EventCatalog, ID};
use tokio::sync::watch;

pub struct InMemoryCatalogRepo {
    events: std::sync::Mutex<Vec<CalendarEvent>>,
    revision: watch::Sender<u64>,
}

impl InMemoryCatalogRepo {
    pub fn new() -> Self {
        Self::from_events(Vec::new())
    }

    pub fn from_events(events: Vec<CalendarEvent>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            events: std::sync::Mutex::new(events),
            revision,
        }
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl Default for InMemoryCatalogRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ICatalogRepo for InMemoryCatalogRepo {
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()> {
        upsert(event, &self.events);
        self.bump_revision();
        Ok(())
    }

    async fn delete(&self, event_id: &ID) -> Option<CalendarEvent> {
        let deleted = delete(event_id, &self.events);
        if deleted.is_some() {
            self.bump_revision();
        }
        deleted
    }

    async fn replace(&self, events: Vec<CalendarEvent>) -> anyhow::Result<()> {
        replace_all(events, &self.events);
        self.bump_revision();
        Ok(())
    }

    async fn snapshot(&self) -> EventCatalog {
        find_by(&self.events, |_| true).into_iter().collect()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
