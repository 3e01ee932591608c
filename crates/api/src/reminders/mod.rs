mod scheduler;

pub use scheduler::{ReminderScheduler, SchedulerHandle, SchedulerPhase};
