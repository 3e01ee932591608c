use crate::catalog::EventCatalog;
use crate::date::{format_lead_time, minutes_until, weekday_index};
use crate::event::{Course, DedupKey, Exam, Meet};
use crate::notification::{NotificationKind, TargetPage};
use crate::settings::ReminderSettings;
use crate::shared::entity::{Entity, ID};
use chrono::prelude::*;
use std::collections::HashSet;
use tracing::debug;

/// The alert windows that already produced a reminder.
///
/// Lives in memory for one session only, so a fresh session may alert
/// again for a window that is still open.
#[derive(Debug, Default)]
pub struct DedupTracker {
    consumed: HashSet<DedupKey>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the key was already consumed
    pub fn consume(&mut self, key: DedupKey) -> bool {
        self.consumed.insert(key)
    }

    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}

/// A reminder that is due and should be emitted as a notification
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderIntent {
    pub key: DedupKey,
    pub message: String,
    pub kind: NotificationKind,
    pub target_page: TargetPage,
    pub resource_id: ID,
    /// Minutes left until the event at evaluation time
    pub lead_minutes: i64,
}

fn in_window(diff: i64, delay: i64) -> bool {
    diff > 0 && diff <= delay
}

fn course_lead_minutes<L>(
    course: &Course,
    now: &DateTime<FixedOffset>,
    local_instant: &L,
) -> Option<i64>
where
    L: Fn(NaiveDate, NaiveTime) -> Option<DateTime<FixedOffset>>,
{
    if !course.has_valid_day() {
        debug!(
            "Skipping course {} with invalid day {}",
            course.id, course.day_of_week
        );
        return None;
    }
    if weekday_index(&now.date_naive()) != course.day_of_week {
        return None;
    }
    let start = match course.start_time_of_day() {
        Ok(start) => start,
        Err(e) => {
            debug!("Skipping course {}: {}", course.id, e);
            return None;
        }
    };
    let instant = match local_instant(now.date_naive(), start) {
        Some(instant) => instant,
        None => {
            debug!("Skipping course {}, {} does not exist today", course.id, start);
            return None;
        }
    };
    Some(minutes_until(now, &instant))
}

fn course_reminder(course: &Course, diff: i64, key: DedupKey) -> ReminderIntent {
    ReminderIntent {
        key,
        message: format!(
            "Reminder: {} in {} min ({})",
            course.subject, diff, course.room
        ),
        kind: NotificationKind::Info,
        target_page: TargetPage::Timetable,
        resource_id: course.id.clone(),
        lead_minutes: diff,
    }
}

fn exam_reminder(exam: &Exam, diff: i64, key: DedupKey) -> ReminderIntent {
    ReminderIntent {
        key,
        message: format!(
            "Exam reminder: {} in {}",
            exam.subject,
            format_lead_time(diff)
        ),
        kind: NotificationKind::Warning,
        target_page: TargetPage::Exams,
        resource_id: exam.id.clone(),
        lead_minutes: diff,
    }
}

fn meet_reminder(meet: &Meet, diff: i64, key: DedupKey) -> ReminderIntent {
    ReminderIntent {
        key,
        message: format!("Video reminder: {} starts in {} min", meet.subject, diff),
        kind: NotificationKind::Info,
        target_page: TargetPage::Meet,
        resource_id: meet.id.clone(),
        lead_minutes: diff,
    }
}

/// Finds the reminders that are due at `now` and consumes their dedup keys.
///
/// Reminders are produced for courses first, then exams, then meets, each in
/// catalog order. An event fires when `0 < minutes left <= delay`, so an event
/// that already started never fires and a window that was missed entirely is
/// not backfilled. Entities with malformed data are skipped.
///
/// The start of a course is resolved with `local_instant`, which maps a local
/// date and time to an instant with the offset in effect at that instant.
///
/// Disabled settings produce nothing and leave the tracker untouched.
pub fn evaluate_reminders<L>(
    now: &DateTime<FixedOffset>,
    local_instant: L,
    catalog: &EventCatalog,
    settings: &ReminderSettings,
    tracker: &mut DedupTracker,
) -> Vec<ReminderIntent>
where
    L: Fn(NaiveDate, NaiveTime) -> Option<DateTime<FixedOffset>>,
{
    let mut reminders = Vec::new();
    if !settings.enabled {
        return reminders;
    }
    let today = now.date_naive();

    for course in &catalog.courses {
        let diff = match course_lead_minutes(course, now, &local_instant) {
            Some(diff) => diff,
            None => continue,
        };
        if !in_window(diff, settings.course_delay_minutes) {
            continue;
        }
        let key = DedupKey::course(course.id(), today);
        if tracker.consume(key.clone()) {
            reminders.push(course_reminder(course, diff, key));
        }
    }

    for exam in &catalog.exams {
        let diff = minutes_until(now, &exam.occurs_at);
        if !in_window(diff, settings.exam_delay_minutes) {
            continue;
        }
        let key = DedupKey::exam(exam.id());
        if tracker.consume(key.clone()) {
            reminders.push(exam_reminder(exam, diff, key));
        }
    }

    for meet in &catalog.meets {
        let diff = minutes_until(now, &meet.occurs_at);
        if !in_window(diff, settings.meet_delay_minutes) {
            continue;
        }
        let key = DedupKey::meet(meet.id());
        if tracker.consume(key.clone()) {
            reminders.push(meet_reminder(meet, diff, key));
        }
    }

    reminders
}
