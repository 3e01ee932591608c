mod end_session;
mod lifecycle;
mod take_logout_reason;
mod watchdog;

pub use end_session::{end_session, EndSessionUseCase};
pub use lifecycle::Session;
pub use take_logout_reason::{take_logout_reason, TakeLogoutReasonUseCase};
pub use watchdog::{InactivityWatchdog, SessionTerminator, WatchdogHandle};
