use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
pub enum LessonTrack {
    #[strum(serialize = "Quick Relief")]
    QuickRelief,
    #[strum(serialize = "Understanding Anxiety")]
    Understanding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub minutes: u32,
    pub description: &'static str,
    #[serde(skip)]
    pub content: &'static str,
    pub track: LessonTrack,
}

pub static LESSONS: [Lesson; 6] = [
    Lesson {
        id: "grounding-101",
        title: "5-4-3-2-1 Grounding Technique",
        minutes: 3,
        description: "Learn this powerful grounding technique to calm anxiety in the moment",
        content: include_str!("../../content/lessons/grounding-101.md"),
        track: LessonTrack::QuickRelief,
    },
    Lesson {
        id: "breathing-basics",
        title: "Box Breathing for Anxiety",
        minutes: 4,
        description: "Master the box breathing technique used by Navy SEALs",
        content: include_str!("../../content/lessons/breathing-basics.md"),
        track: LessonTrack::QuickRelief,
    },
    Lesson {
        id: "panic-first-aid",
        title: "Panic Attack First Aid",
        minutes: 5,
        description: "Essential steps to take during a panic attack",
        content: include_str!("../../content/lessons/panic-first-aid.md"),
        track: LessonTrack::QuickRelief,
    },
    Lesson {
        id: "understanding-anxiety",
        title: "Understanding Your Anxiety",
        minutes: 8,
        description: "Learn what anxiety is and why it happens",
        content: include_str!("../../content/lessons/understanding-anxiety.md"),
        track: LessonTrack::Understanding,
    },
    Lesson {
        id: "lifestyle-changes",
        title: "Lifestyle Changes for Anxiety",
        minutes: 10,
        description: "Simple daily habits that reduce anxiety over time",
        content: include_str!("../../content/lessons/lifestyle-changes.md"),
        track: LessonTrack::Understanding,
    },
    Lesson {
        id: "cognitive-strategies",
        title: "Changing Anxious Thoughts",
        minutes: 12,
        description: "Cognitive techniques to challenge and reframe negative thinking",
        content: include_str!("../../content/lessons/cognitive-strategies.md"),
        track: LessonTrack::Understanding,
    },
];

/// The one lesson open to guests.
pub const GUEST_LESSON: &str = "grounding-101";

pub fn find_lesson(id: &str) -> Option<&'static Lesson> {
    LESSONS.iter().find(|l| l.id == id)
}

impl Lesson {
    /// Guests may only open the first quick-relief lesson.
    pub fn is_open_to(&self, guest: bool) -> bool {
        !guest || self.id == GUEST_LESSON
    }

    pub fn duration_label(&self) -> String {
        format!("{} min", self.minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        for lesson in &LESSONS {
            assert!(!lesson.content.trim().is_empty(), "{} has no body", lesson.id);
        }
        let quick = LESSONS
            .iter()
            .filter(|l| l.track == LessonTrack::QuickRelief)
            .count();
        assert_eq!(quick, 3);
        assert_eq!(LESSONS[0].id, GUEST_LESSON);
    }

    #[test]
    fn test_guest_gating() {
        let open: Vec<_> = LESSONS.iter().filter(|l| l.is_open_to(true)).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, GUEST_LESSON);
        assert!(LESSONS.iter().all(|l| l.is_open_to(false)));
        assert_eq!(find_lesson("panic-first-aid").unwrap().duration_label(), "5 min");
    }
}
