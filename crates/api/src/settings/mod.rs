mod update_reminder_settings;

pub use update_reminder_settings::{update_reminder_settings, UpdateReminderSettingsUseCase};
