use crate::shared::entity::{Entity, ID};
use crate::user::{Role, Viewer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Login,
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditSeverity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: ID,
    pub action: AuditAction,
    pub details: String,
    pub author: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    pub severity: AuditSeverity,
}

impl AuditLogEntry {
    pub fn new(
        viewer: &Viewer,
        action: AuditAction,
        details: impl Into<String>,
        severity: AuditSeverity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Default::default(),
            action,
            details: details.into(),
            author: viewer.name.clone(),
            role: viewer.role,
            timestamp,
            severity,
        }
    }
}

impl Entity for AuditLogEntry {
    fn id(&self) -> &ID {
        &self.id
    }
}
