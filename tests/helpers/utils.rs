use chrono::prelude::*;
use portal_scheduler_api::NotificationStore;
use portal_scheduler_domain::{CalendarEvent, Course, Exam, Meet, ID};

/// 2024-01-01 is a Monday
pub fn monday_at(h: u32, m: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 1, h, m, 0)
        .unwrap()
}

pub fn id(val: &str) -> ID {
    val.parse().unwrap()
}

pub fn course(
    course_id: &str,
    class_id: &str,
    day_of_week: u8,
    start_time: &str,
) -> CalendarEvent {
    CalendarEvent::Course(Course {
        id: id(course_id),
        subject: "Algorithms".into(),
        teacher: "M. Fall".into(),
        room: "S202".into(),
        day_of_week,
        start_time: start_time.into(),
        end_time: None,
        class_id: id(class_id),
    })
}

pub fn exam(exam_id: &str, class_id: &str, occurs_at: DateTime<FixedOffset>) -> CalendarEvent {
    CalendarEvent::Exam(Exam {
        id: id(exam_id),
        subject: "SQL".into(),
        room: "Amphi A".into(),
        occurs_at: occurs_at.with_timezone(&Utc),
        duration_minutes: 120,
        notes: None,
        class_id: id(class_id),
    })
}

pub fn meet(meet_id: &str, class_id: &str, occurs_at: DateTime<FixedOffset>) -> CalendarEvent {
    CalendarEvent::Meet(Meet {
        id: id(meet_id),
        subject: "React".into(),
        teacher_name: "M. Diop".into(),
        link: Some("https://meet.example.org/react".into()),
        occurs_at: occurs_at.with_timezone(&Utc),
        class_id: id(class_id),
    })
}

/// History messages in emission order
pub fn messages(store: &NotificationStore) -> Vec<String> {
    store
        .history()
        .into_iter()
        .rev()
        .map(|n| n.message)
        .collect()
}

/// Lets spawned tasks run without moving the clock
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
