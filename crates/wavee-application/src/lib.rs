pub mod account_service;
pub mod breathing_service;
pub mod context;
pub mod journal_service;
pub mod lesson_service;
pub mod panic_session_service;
pub mod progress_service;
pub mod speech_service;
pub mod visualization_service;

pub use crate::account_service::AccountService;
pub use crate::breathing_service::{BreathingService, ExerciseEvent, ExerciseSnapshot};
pub use crate::context::{AppContext, ContextOptions};
pub use crate::journal_service::JournalService;
pub use crate::lesson_service::{LessonEntry, LessonService};
pub use crate::panic_session_service::{PanicEvent, PanicSessionService};
pub use crate::progress_service::ProgressService;
pub use crate::speech_service::{RemoteBackend, SpeechCallback, SpeechService};
pub use crate::visualization_service::VisualizationService;
