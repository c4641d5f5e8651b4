use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visualization {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: [&'static str; 6],
}

pub static VISUALIZATIONS: [Visualization; 3] = [
    Visualization {
        id: "beach",
        title: "Beach Relaxation",
        description: "Imagine yourself on a peaceful beach",
        steps: [
            "Close your eyes and take three deep breaths",
            "Picture yourself sitting on soft, warm sand",
            "Feel the gentle ocean breeze on your skin",
            "Listen to the rhythmic sound of waves",
            "Notice the warm sun gently warming your body",
            "Let all your worries wash away with the tide",
        ],
    },
    Visualization {
        id: "forest",
        title: "Forest Walk",
        description: "Take a peaceful walk through nature",
        steps: [
            "Breathe deeply and imagine standing at a forest entrance",
            "Step onto a soft, moss-covered path",
            "Notice the tall trees creating a natural canopy above",
            "Hear birds singing and leaves rustling gently",
            "Feel the cool, fresh air filling your lungs",
            "Experience the deep peace of nature surrounding you",
        ],
    },
    Visualization {
        id: "mountain",
        title: "Mountain Peak",
        description: "Find strength and perspective on a mountain",
        steps: [
            "Imagine yourself standing on a peaceful mountain peak",
            "Feel the solid ground beneath your feet",
            "Look out at the vast, beautiful landscape below",
            "Breathe in the crisp, clean mountain air",
            "Feel your inner strength and resilience",
            "Know that you can overcome any challenge",
        ],
    },
];

pub fn find_visualization(id: &str) -> Option<&'static Visualization> {
    VISUALIZATIONS.iter().find(|v| v.id == id)
}
