mod activity;
mod audit;
mod catalog;
pub mod date;
mod event;
mod notification;
mod reminder;
mod settings;
mod shared;
mod user;

pub use activity::{ActivityClock, ActivitySignal, LogoutReason};
pub use audit::{AuditAction, AuditLogEntry, AuditSeverity};
pub use catalog::EventCatalog;
pub use event::{CalendarEvent, Course, DedupKey, Exam, Meet};
pub use notification::{Notification, NotificationKind, TargetPage};
pub use reminder::{evaluate_reminders, DedupTracker, ReminderIntent};
pub use settings::{InvalidReminderSettings, ReminderSettings};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use user::{Role, Viewer};
