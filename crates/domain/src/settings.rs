use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long before each kind of event the viewer wants to be reminded.
///
/// Missing fields take their default and unknown fields are ignored, so
/// preferences written by older clients still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    pub enabled: bool,
    #[serde(alias = "courseDelay")]
    pub course_delay_minutes: i64,
    #[serde(alias = "examDelay")]
    pub exam_delay_minutes: i64,
    #[serde(alias = "meetDelay")]
    pub meet_delay_minutes: i64,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderSettings {
    #[error("{field} must be between 0 and {max} minutes, got {value}")]
    DelayOutOfRange {
        field: &'static str,
        value: i64,
        max: i64,
    },
}

impl ReminderSettings {
    /// One week
    pub const MAX_DELAY_MINUTES: i64 = 60 * 24 * 7;

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), InvalidReminderSettings> {
        let delays = [
            ("courseDelayMinutes", self.course_delay_minutes),
            ("examDelayMinutes", self.exam_delay_minutes),
            ("meetDelayMinutes", self.meet_delay_minutes),
        ];
        for (field, value) in delays.iter() {
            if *value < 0 || *value > Self::MAX_DELAY_MINUTES {
                return Err(InvalidReminderSettings::DelayOutOfRange {
                    field,
                    value: *value,
                    max: Self::MAX_DELAY_MINUTES,
                });
            }
        }
        Ok(())
    }
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            course_delay_minutes: 15,
            exam_delay_minutes: 60 * 24,
            meet_delay_minutes: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = ReminderSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.course_delay_minutes, 15);
        assert_eq!(settings.exam_delay_minutes, 1440);
        assert_eq!(settings.meet_delay_minutes, 30);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn it_accepts_short_keys_and_ignores_unknown_fields() {
        let json = r#"{"enabled": false, "courseDelay": 5, "examDelay": 120, "theme": "dark"}"#;
        let settings: ReminderSettings = serde_json::from_str(json).unwrap();
        assert_eq!(
            settings,
            ReminderSettings {
                enabled: false,
                course_delay_minutes: 5,
                exam_delay_minutes: 120,
                meet_delay_minutes: 30,
            }
        );
    }

    #[test]
    fn it_serializes_camel_case() {
        let json = serde_json::to_value(ReminderSettings::default()).unwrap();
        assert_eq!(json["courseDelayMinutes"], 15);
        assert_eq!(json["examDelayMinutes"], 1440);
        assert_eq!(json["meetDelayMinutes"], 30);
        assert_eq!(json["enabled"], true);
    }

    #[test]
    fn it_rejects_out_of_range_delays() {
        let mut settings = ReminderSettings::default();
        settings.meet_delay_minutes = -1;
        assert!(settings.validate().is_err());

        settings.meet_delay_minutes = ReminderSettings::MAX_DELAY_MINUTES;
        assert!(settings.validate().is_ok());

        settings.exam_delay_minutes = ReminderSettings::MAX_DELAY_MINUTES + 1;
        assert_eq!(
            settings.validate(),
            Err(InvalidReminderSettings::DelayOutOfRange {
                field: "examDelayMinutes",
                value: ReminderSettings::MAX_DELAY_MINUTES + 1,
                max: ReminderSettings::MAX_DELAY_MINUTES,
            })
        );
    }
}
