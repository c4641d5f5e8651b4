use serde::{Deserialize, Serialize};
use strum::Display;

/// The kind of guidance a panic step gives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StepKind {
    Reassurance,
    Breathing,
    Grounding,
    Affirmation,
    Education,
    Completion,
}

/// One screen of the guided panic-relief flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicStep {
    pub title: &'static str,
    pub body: &'static str,
    pub action_label: &'static str,
    pub kind: StepKind,
    pub spoken: &'static str,
}

/// Index of the step that embeds the breathing timer.
pub const BREATHING_STEP: usize = 1;

/// The fixed panic-relief script.
pub static PANIC_STEPS: [PanicStep; 6] = [
    PanicStep {
        title: "You're Safe",
        body: "Take a deep breath. You are in a safe place right now. This feeling will pass.",
        action_label: "I understand",
        kind: StepKind::Reassurance,
        spoken: "You are safe. Take a deep breath. You are in a safe place right now, \
                 and this feeling will pass.",
    },
    PanicStep {
        title: "Breathe with Me",
        body: "Let's breathe together. Inhale for 4 counts, hold for 4, exhale for 6. \
               You're doing great.",
        action_label: "I'm breathing",
        kind: StepKind::Breathing,
        spoken: "Let's breathe together. In for four, hold for four, and out for six. \
                 Follow the circle with me.",
    },
    PanicStep {
        title: "5-4-3-2-1 Grounding",
        body: "Name 5 things you can see, 4 you can touch, 3 you can hear, 2 you can smell, \
               1 you can taste.",
        action_label: "I'm trying this",
        kind: StepKind::Grounding,
        spoken: "Now let's ground ourselves. Name five things you can see, four you can touch, \
                 three you can hear, two you can smell, and one you can taste.",
    },
    PanicStep {
        title: "You're Stronger",
        body: "You've overcome difficult moments before, and you will overcome this one too. \
               You are resilient.",
        action_label: "I'm feeling better",
        kind: StepKind::Affirmation,
        spoken: "You have overcome difficult moments before, and you will overcome this one too. \
                 You are resilient.",
    },
    PanicStep {
        title: "What's Happening",
        body: "Panic is your body's alarm going off when there is no real danger. \
               It peaks within minutes and cannot harm you.",
        action_label: "That makes sense",
        kind: StepKind::Education,
        spoken: "What you are feeling is your body's alarm system. It is uncomfortable, \
                 but it cannot harm you, and it always passes.",
    },
    PanicStep {
        title: "You Did It",
        body: "You made it through. Be gentle with yourself and take a moment to rest.",
        action_label: "Finish",
        kind: StepKind::Completion,
        spoken: "You did it. You made it through. Be gentle with yourself and take a moment to rest.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_order() {
        let kinds: Vec<_> = PANIC_STEPS.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                StepKind::Reassurance,
                StepKind::Breathing,
                StepKind::Grounding,
                StepKind::Affirmation,
                StepKind::Education,
                StepKind::Completion,
            ]
        );
        assert_eq!(PANIC_STEPS[BREATHING_STEP].kind, StepKind::Breathing);
    }
}
