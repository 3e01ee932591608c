mod inmemory;
mod loader;

pub use inmemory::InMemoryCatalogRepo;
pub use loader::{load_catalog, parse_catalog};
use portal_scheduler_domain::{CalendarEvent, EventCatalog, ID};
use tokio::sync::watch;

/// The courses, exams and meets known to the portal.
///
/// Every change bumps a revision number that subscribers can wait on.
#[async_trait::async_trait]
pub trait ICatalogRepo: Send + Sync {
    /// Inserts the event, replacing the stored event with the same id
    async fn insert(&self, event: &CalendarEvent) -> anyhow::Result<()>;
    async fn delete(&self, event_id: &ID) -> Option<CalendarEvent>;
    async fn replace(&self, events: Vec<CalendarEvent>) -> anyhow::Result<()>;
    async fn snapshot(&self) -> EventCatalog;
    fn subscribe(&self) -> watch::Receiver<u64>;
}
