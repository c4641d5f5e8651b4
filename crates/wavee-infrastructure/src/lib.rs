pub mod config_service;
pub mod elevenlabs;
pub mod paths;
pub mod process;
pub mod process_audio;
pub mod secret_service;
pub mod storage;
pub mod system_speech;

pub use crate::config_service::ConfigService;
pub use crate::elevenlabs::ElevenLabsClient;
pub use crate::paths::{PathType, ServiceType, WaveePaths};
pub use crate::process_audio::ProcessAudioOutput;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{JsonFileStore, MemoryStore};
pub use crate::system_speech::SystemSpeech;
