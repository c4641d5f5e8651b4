//! Lesson catalog and completion tracking.

mod catalog;

pub use catalog::{GUEST_LESSON, LESSONS, Lesson, LessonTrack, find_lesson};

use serde::{Deserialize, Serialize};

use crate::store::{StoreRecord, keys};

/// Ids of lessons the user has marked complete, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletedLessons {
    pub ids: Vec<String>,
}

impl StoreRecord for CompletedLessons {
    const KEY: &'static str = keys::COMPLETED_LESSONS;
}

impl CompletedLessons {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|done| done == id)
    }

    /// Returns `true` if the lesson was not already complete.
    pub fn mark(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_is_idempotent() {
        let mut done = CompletedLessons::default();
        assert!(done.mark("grounding-101"));
        assert!(!done.mark("grounding-101"));
        assert_eq!(done.ids, vec!["grounding-101".to_string()]);
    }
}
