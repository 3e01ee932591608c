use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// User interactions that count as activity for the inactivity watchdog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    Click,
    Scroll,
    TouchStart,
}

/// Tracks when the viewer last interacted with the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityClock {
    last_activity_at: i64,
}

impl ActivityClock {
    pub fn new(now: i64) -> Self {
        Self {
            last_activity_at: now,
        }
    }

    pub fn last_activity_at(&self) -> i64 {
        self.last_activity_at
    }

    pub fn record(&mut self, now: i64) {
        // Listener callbacks may race with a check reading an older clock
        if now > self.last_activity_at {
            self.last_activity_at = now;
        }
    }

    pub fn idle_millis(&self, now: i64) -> i64 {
        (now - self.last_activity_at).max(0)
    }

    /// Idle for at least `timeout_millis`
    pub fn is_idle(&self, now: i64, timeout_millis: i64) -> bool {
        self.idle_millis(now) >= timeout_millis
    }
}

/// Why a session ended, shown once on the next unauthenticated view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum LogoutReason {
    Inactivity { idle_minutes: i64 },
    UserRequested,
}

impl LogoutReason {
    pub fn message(&self) -> String {
        match self {
            Self::Inactivity { idle_minutes } => {
                format!("signed out after {} minutes of inactivity", idle_minutes)
            }
            Self::UserRequested => "signed out".into(),
        }
    }
}

impl Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
