use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Responsible,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Responsible => "RESPONSIBLE",
            Self::Student => "STUDENT",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "RESPONSIBLE" => Ok(Self::Responsible),
            "STUDENT" => Ok(Self::Student),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The authenticated user a session is running for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: ID,
    pub name: String,
    pub role: Role,
    pub class_id: Option<ID>,
}

impl Viewer {
    pub fn new(name: impl Into<String>, role: Role, class_id: Option<ID>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            role,
            class_id,
        }
    }

    /// Elevated viewers see the calendar of every class
    pub fn is_elevated(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn can_see_class(&self, class_id: &ID) -> bool {
        self.is_elevated() || self.class_id.as_ref() == Some(class_id)
    }
}

impl Entity for Viewer {
    fn id(&self) -> &ID {
        &self.id
    }
}
