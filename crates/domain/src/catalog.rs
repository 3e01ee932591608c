use crate::event::{CalendarEvent, Course, Exam, Meet};
use crate::user::Viewer;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the calendar entities a viewer can be reminded about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCatalog {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub meets: Vec<Meet>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CalendarEvent) {
        match event {
            CalendarEvent::Course(c) => self.courses.push(c),
            CalendarEvent::Exam(e) => self.exams.push(e),
            CalendarEvent::Meet(m) => self.meets.push(m),
        }
    }

    /// Restricts the catalog to the classes `viewer` may see.
    /// Elevated viewers get everything, others only their own class.
    pub fn visible_to(&self, viewer: &Viewer) -> Self {
        if viewer.is_elevated() {
            return self.clone();
        }
        Self {
            courses: self
                .courses
                .iter()
                .filter(|c| viewer.can_see_class(&c.class_id))
                .cloned()
                .collect(),
            exams: self
                .exams
                .iter()
                .filter(|e| viewer.can_see_class(&e.class_id))
                .cloned()
                .collect(),
            meets: self
                .meets
                .iter()
                .filter(|m| viewer.can_see_class(&m.class_id))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len() + self.exams.len() + self.meets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<CalendarEvent> for EventCatalog {
    fn from_iter<I: IntoIterator<Item = CalendarEvent>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for event in iter {
            catalog.push(event);
        }
        catalog
    }
}
