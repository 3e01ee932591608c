use anyhow::Context;
use portal_scheduler_domain::{CalendarEvent, Course, Exam, Meet};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Reads a catalog export of the form
/// `{"courses": [...], "exams": [...], "meets": [...]}`.
pub async fn load_catalog(path: &Path) -> anyhow::Result<Vec<CalendarEvent>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Unable to read the catalog at {}", path.display()))?;
    let events = parse_catalog(&raw)?;
    info!("Loaded {} calendar events from {}", events.len(), path.display());
    Ok(events)
}

/// Entities are parsed one by one so that a single malformed entity
/// is skipped instead of rejecting the whole catalog.
pub fn parse_catalog(raw: &str) -> anyhow::Result<Vec<CalendarEvent>> {
    let root: Value = serde_json::from_str(raw).context("The catalog is not valid JSON")?;
    let root = root
        .as_object()
        .context("The catalog must be a JSON object")?;

    let mut events = Vec::new();
    parse_section::<Course>(root.get("courses"), "courses", &mut events);
    parse_section::<Exam>(root.get("exams"), "exams", &mut events);
    parse_section::<Meet>(root.get("meets"), "meets", &mut events);
    Ok(events)
}

fn parse_section<T>(section: Option<&Value>, name: &str, events: &mut Vec<CalendarEvent>)
where
    T: DeserializeOwned + Into<CalendarEvent>,
{
    let entries = match section {
        None | Some(Value::Null) => return,
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            warn!("Ignoring catalog section {}: expected an array", name);
            return;
        }
    };
    for (i, entry) in entries.iter().enumerate() {
        match T::deserialize(entry) {
            Ok(entity) => events.push(entity.into()),
            Err(e) => warn!("Skipping malformed entry {} of {}: {}", i, name, e),
        }
    }
}
