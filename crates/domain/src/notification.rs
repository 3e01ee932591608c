use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Portal views a notification can link to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPage {
    Timetable,
    Exams,
    Meet,
}

impl TargetPage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timetable => "timetable",
            Self::Exams => "exams",
            Self::Meet => "meet",
        }
    }
}

impl Display for TargetPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: ID,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub target_page: Option<String>,
    pub resource_id: Option<String>,
}

impl Notification {
    pub fn new(
        id: ID,
        message: impl Into<String>,
        kind: NotificationKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            message: message.into(),
            kind,
            created_at,
            read: false,
            target_page: None,
            resource_id: None,
        }
    }

    pub fn with_target(
        mut self,
        target_page: Option<String>,
        resource_id: Option<String>,
    ) -> Self {
        self.target_page = target_page;
        self.resource_id = resource_id;
        self
    }
}

impl Entity for Notification {
    fn id(&self) -> &ID {
        &self.id
    }
}
