mod error;
mod notifications;
mod reminders;
mod session;
mod settings;
mod shared;

pub use error::PortalError;
pub use notifications::NotificationStore;
pub use reminders::{ReminderScheduler, SchedulerHandle, SchedulerPhase};
pub use session::{
    end_session, take_logout_reason, EndSessionUseCase, InactivityWatchdog, Session,
    SessionTerminator, TakeLogoutReasonUseCase, WatchdogHandle,
};
pub use settings::{update_reminder_settings, UpdateReminderSettingsUseCase};
pub use shared::usecase::{execute, UseCase};
