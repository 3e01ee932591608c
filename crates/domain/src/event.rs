use crate::date::{parse_time_of_day, InvalidTimeOfDay};
use crate::shared::entity::{Entity, ID};
use chrono::{prelude::*, Duration};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A weekly recurring class session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: ID,
    pub subject: String,
    #[serde(default)]
    pub teacher: String,
    pub room: String,
    /// 0 is Sunday, 6 is Saturday
    pub day_of_week: u8,
    /// Wall-clock start in the form `HH:MM`. Kept as given by the store
    /// and parsed on use, so that one malformed course can be skipped
    /// without rejecting the rest of the timetable.
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    pub class_id: ID,
}

impl Course {
    pub fn start_time_of_day(&self) -> Result<NaiveTime, InvalidTimeOfDay> {
        parse_time_of_day(&self.start_time)
    }

    pub fn has_valid_day(&self) -> bool {
        self.day_of_week <= 6
    }
}

impl Entity for Course {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ID,
    pub subject: String,
    pub room: String,
    #[serde(alias = "date")]
    pub occurs_at: DateTime<Utc>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
    pub class_id: ID,
}

impl Exam {
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.occurs_at + Duration::minutes(self.duration_minutes)
    }
}

impl Entity for Exam {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// A one-off live video session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meet {
    pub id: ID,
    pub subject: String,
    pub teacher_name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(alias = "date")]
    pub occurs_at: DateTime<Utc>,
    pub class_id: ID,
}

impl Meet {
    /// Meets have no stored duration, they are displayed as lasting one hour
    pub const NOMINAL_DURATION_MINUTES: i64 = 60;

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.occurs_at + Duration::minutes(Self::NOMINAL_DURATION_MINUTES)
    }
}

impl Entity for Meet {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalendarEvent {
    Course(Course),
    Exam(Exam),
    Meet(Meet),
}

impl Entity for CalendarEvent {
    fn id(&self) -> &ID {
        match self {
            Self::Course(c) => &c.id,
            Self::Exam(e) => &e.id,
            Self::Meet(m) => &m.id,
        }
    }
}

impl From<Course> for CalendarEvent {
    fn from(c: Course) -> Self {
        Self::Course(c)
    }
}

impl From<Exam> for CalendarEvent {
    fn from(e: Exam) -> Self {
        Self::Exam(e)
    }
}

impl From<Meet> for CalendarEvent {
    fn from(m: Meet) -> Self {
        Self::Meet(m)
    }
}

/// Opaque marker for an alert window that has already fired
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn course(course_id: &ID, day: NaiveDate) -> Self {
        Self(format!("course:{}:{}", course_id, day.format("%Y-%m-%d")))
    }

    pub fn exam(exam_id: &ID) -> Self {
        Self(format!("exam:{}", exam_id))
    }

    pub fn meet(meet_id: &ID) -> Self {
        Self(format!("meet:{}", meet_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
