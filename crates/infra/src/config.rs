use portal_scheduler_domain::{Role, Viewer, ID};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

const DEFAULT_INACTIVITY_TIMEOUT_MINUTES: i64 = 15;
/// One week
const MAX_INACTIVITY_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Period in seconds between two runs of the reminder evaluator
    pub reminder_tick_secs: u64,
    /// How long a toast stays in the ephemeral queue before it is removed
    pub toast_lifetime_millis: u64,
    /// A session without any interaction for this long is ended
    pub inactivity_timeout_minutes: i64,
    /// Period in seconds between two inactivity checks
    pub inactivity_check_secs: u64,
    /// JSON file holding the reminder preferences. When absent the
    /// preferences only live in memory.
    pub preferences_path: Option<PathBuf>,
    /// JSON file used to seed the event catalog
    pub catalog_path: Option<PathBuf>,
    /// The viewer the local session runs for
    pub viewer: Viewer,
}

impl Config {
    pub fn new() -> Self {
        let viewer_role = parse_env("VIEWER_ROLE", Role::Student);
        let viewer_class_id = match std::env::var("VIEWER_CLASS_ID") {
            Ok(class_id) => match class_id.parse::<ID>() {
                Ok(class_id) => Some(class_id),
                Err(e) => {
                    warn!("Ignoring VIEWER_CLASS_ID: {}", e);
                    None
                }
            },
            Err(_) => None,
        };
        let viewer_name = std::env::var("VIEWER_NAME").unwrap_or_else(|_| "Guest".into());
        let mut viewer = Viewer::new(viewer_name, viewer_role, viewer_class_id);
        if let Some(id) = std::env::var("VIEWER_ID")
            .ok()
            .and_then(|id| id.parse::<ID>().ok())
        {
            viewer.id = id;
        }
        info!(
            "Session viewer: {} ({}), class: {:?}",
            viewer.name,
            viewer.role.as_str(),
            viewer.class_id.as_ref().map(|id| id.as_str())
        );

        let mut inactivity_timeout_minutes = parse_env(
            "INACTIVITY_TIMEOUT_MINUTES",
            DEFAULT_INACTIVITY_TIMEOUT_MINUTES,
        );
        if !(1..=MAX_INACTIVITY_TIMEOUT_MINUTES).contains(&inactivity_timeout_minutes) {
            warn!(
                "The given INACTIVITY_TIMEOUT_MINUTES: {} is not between 1 and {}, falling back to the default: {}.",
                inactivity_timeout_minutes,
                MAX_INACTIVITY_TIMEOUT_MINUTES,
                DEFAULT_INACTIVITY_TIMEOUT_MINUTES
            );
            inactivity_timeout_minutes = DEFAULT_INACTIVITY_TIMEOUT_MINUTES;
        }

        Self {
            reminder_tick_secs: parse_env("REMINDER_TICK_SECS", 60),
            toast_lifetime_millis: parse_env("TOAST_LIFETIME_MILLIS", 5000),
            inactivity_timeout_minutes,
            inactivity_check_secs: parse_env("INACTIVITY_CHECK_SECS", 60),
            preferences_path: std::env::var("PREFERENCES_PATH").ok().map(PathBuf::from),
            catalog_path: std::env::var("CATALOG_PATH").ok().map(PathBuf::from),
            viewer,
        }
    }

    pub fn inactivity_timeout_millis(&self) -> i64 {
        self.inactivity_timeout_minutes.saturating_mul(60 * 1000)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
{
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {:?}.",
                key, value, default
            );
            default
        }
    }
}
