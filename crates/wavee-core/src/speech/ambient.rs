use serde::Serialize;

/// Id of the catalog entry that plays nothing.
pub const SILENCE: &str = "silence";

/// A looping background track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmbientSound {
    pub id: &'static str,
    pub name: &'static str,
    /// `None` for silence.
    pub url: Option<&'static str>,
    pub icon: &'static str,
}

pub static AMBIENT_SOUNDS: [AmbientSound; 5] = [
    AmbientSound {
        id: "ocean",
        name: "Ocean Waves",
        url: Some("https://cdn.pixabay.com/audio/2022/05/27/audio_1808fbf07a.mp3"),
        icon: "🌊",
    },
    AmbientSound {
        id: "rain",
        name: "Gentle Rain",
        url: Some("https://cdn.pixabay.com/audio/2021/08/04/audio_12b0c7443a.mp3"),
        icon: "🌧️",
    },
    AmbientSound {
        id: "forest",
        name: "Forest Sounds",
        url: Some("https://cdn.pixabay.com/audio/2022/03/20/audio_4985af5753.mp3"),
        icon: "🌲",
    },
    AmbientSound {
        id: "whitenoise",
        name: "White Noise",
        url: Some("https://cdn.pixabay.com/audio/2022/11/27/audio_7c2b6b8a27.mp3"),
        icon: "⚪",
    },
    AmbientSound {
        id: SILENCE,
        name: "Silence",
        url: None,
        icon: "🔇",
    },
];

pub fn find_ambient(id: &str) -> Option<&'static AmbientSound> {
    AMBIENT_SOUNDS.iter().find(|s| s.id == id)
}
