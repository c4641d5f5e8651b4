//! Application wiring.
//!
//! [`AppContext`] builds and owns every service. There are no globals: the
//! front end creates one context, calls [`AppContext::dispose`] on the way
//! out, and reaches services through its fields.

use std::path::PathBuf;
use std::sync::Arc;

use wavee_core::clock::{Clock, SystemClock};
use wavee_core::config::RootConfig;
use wavee_core::error::{Result, WaveeError};
use wavee_core::secret::SecretService;
use wavee_core::speech::{AudioOutput, SpeechBackend};
use wavee_core::store::{KeyValueStore, RecordStore};
use wavee_infrastructure::{
    ConfigService, ElevenLabsClient, JsonFileStore, MemoryStore, ProcessAudioOutput,
    SecretServiceImpl, ServiceType, SystemSpeech, WaveePaths,
};

use crate::account_service::AccountService;
use crate::breathing_service::BreathingService;
use crate::journal_service::JournalService;
use crate::lesson_service::LessonService;
use crate::panic_session_service::PanicSessionService;
use crate::progress_service::ProgressService;
use crate::speech_service::{RemoteBackend, SpeechService};
use crate::visualization_service::VisualizationService;

/// How the context should be built.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    /// Root for config and data; `None` uses the platform directories.
    pub base_dir: Option<PathBuf>,
    /// Overrides the key-value store directory.
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory for this run.
    pub ephemeral: bool,
    /// Build the speech service and audio output.
    pub speech: bool,
}

pub struct AppContext {
    pub config: RootConfig,
    pub records: RecordStore,
    pub speech: Option<Arc<SpeechService>>,
    pub progress: ProgressService,
    pub journal: JournalService,
    pub accounts: AccountService,
    pub lessons: LessonService,
    pub visualizations: VisualizationService,
    pub breathing: BreathingService,
    pub panic: PanicSessionService,
}

impl AppContext {
    /// Loads configuration, opens the store and starts the speech service.
    ///
    /// Missing speech programs or an invalid API key only reduce what the
    /// speech service can do; they never fail initialization.
    ///
    /// # Errors
    ///
    /// Returns an error when the store location cannot be determined or the
    /// saved audio preferences cannot be read.
    pub async fn initialize(options: ContextOptions) -> Result<Self> {
        let base = options.base_dir.as_deref();
        let config = ConfigService::new(base)?.get_config();

        let store: Arc<dyn KeyValueStore> = if options.ephemeral {
            tracing::info!("[AppContext] Using in-memory store");
            Arc::new(MemoryStore::new())
        } else {
            let dir = match options.data_dir.clone().or_else(|| config.storage.data_dir.clone()) {
                Some(dir) => dir,
                None => WaveePaths::new(base)
                    .get_path(ServiceType::Store)
                    .map_err(|e| WaveeError::config(e.to_string()))?
                    .into_path_buf(),
            };
            tracing::debug!("[AppContext] Store directory: {}", dir.display());
            Arc::new(JsonFileStore::with_dir(dir))
        };
        let records = RecordStore::new(store);

        let speech = if options.speech {
            let speech = Arc::new(build_speech(&config, base, records.clone()).await);
            speech.initialize().await?;
            Some(speech)
        } else {
            None
        };

        Ok(Self::assemble(config, records, speech, Arc::new(SystemClock)))
    }

    /// Wires services around an existing store and speech service.
    pub fn assemble(
        config: RootConfig,
        records: RecordStore,
        speech: Option<Arc<SpeechService>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let progress = ProgressService::new(records.clone(), clock.clone());
        let accounts = AccountService::new(records.clone(), clock.clone());

        Self {
            journal: JournalService::new(records.clone(), progress.clone(), clock.clone()),
            lessons: LessonService::new(records.clone(), accounts.clone(), progress.clone()),
            visualizations: VisualizationService::new(progress.clone(), speech.clone()),
            breathing: BreathingService::new(progress.clone(), speech.clone()),
            panic: PanicSessionService::new(records.clone(), progress.clone(), speech.clone(), clock),
            config,
            records,
            speech,
            progress,
            accounts,
        }
    }

    /// Stops timers and audio.
    pub async fn dispose(&self) {
        self.breathing.reset();
        if let Err(e) = self.panic.exit().await {
            tracing::warn!("[AppContext] Failed to record abandoned session: {}", e);
        }
        self.visualizations.stop().await;
        if let Some(speech) = &self.speech {
            speech.dispose().await;
        }
        tracing::debug!("[AppContext] Disposed");
    }
}

async fn build_speech(
    config: &RootConfig,
    base: Option<&std::path::Path>,
    records: RecordStore,
) -> SpeechService {
    let output: Arc<dyn AudioOutput> =
        Arc::new(ProcessAudioOutput::new(config.audio.player_command.clone()));
    let local: Arc<dyn SpeechBackend> =
        Arc::new(SystemSpeech::new(config.audio.speech_command.clone()));
    let remote = remote_backend(config, base, output.clone()).await;

    SpeechService::new(remote, local, output, records)
}

/// Builds the remote backend when an API key is available.
async fn remote_backend(
    config: &RootConfig,
    base: Option<&std::path::Path>,
    output: Arc<dyn AudioOutput>,
) -> Option<Arc<dyn SpeechBackend>> {
    let secrets = match SecretServiceImpl::new(base) {
        Ok(service) => service,
        Err(e) => {
            tracing::debug!("[AppContext] Secret service unavailable: {}", e);
            return None;
        }
    };

    let Some(api_key) = secrets.elevenlabs_api_key().await else {
        tracing::info!("[AppContext] No ElevenLabs API key, using local speech only");
        return None;
    };

    match ElevenLabsClient::new(&api_key, config.speech.clone()) {
        Ok(client) => Some(Arc::new(RemoteBackend::new(Arc::new(client), output))),
        Err(e) => {
            tracing::warn!("[AppContext] Failed to create TTS client: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavee_core::journal::Mood;
    use wavee_core::progress::Tool;

    #[tokio::test]
    async fn test_file_backed_context_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let options = ContextOptions {
            base_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        let ctx = AppContext::initialize(options.clone()).await.unwrap();
        assert!(ctx.speech.is_none());
        ctx.journal.save(Some(Mood::Good), "slept well").await.unwrap();
        ctx.dispose().await;

        let ctx = AppContext::initialize(options).await.unwrap();
        let entries = ctx.journal.list().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(ctx.progress.stats().await.unwrap().count(Tool::Journal), 1);
        assert!(dir.path().join("config").join("config.toml").exists());
        assert!(dir.path().join("data").join("store").is_dir());
    }

    #[tokio::test]
    async fn test_ephemeral_context_writes_no_store_files() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::initialize(ContextOptions {
            base_dir: Some(dir.path().to_path_buf()),
            ephemeral: true,
            ..Default::default()
        })
        .await
        .unwrap();

        ctx.accounts.sign_up("sam@example.com").await.unwrap();
        assert!(!ctx.accounts.is_guest().await.unwrap());
        assert!(!dir.path().join("data").exists());
    }

    #[tokio::test]
    async fn test_dispose_abandons_running_panic_session() {
        let ctx = AppContext::assemble(
            RootConfig::default(),
            RecordStore::new(Arc::new(MemoryStore::new())),
            None,
            Arc::new(SystemClock),
        );
        ctx.panic.start();
        ctx.dispose().await;

        let history = ctx.panic.history().await.unwrap();
        assert_eq!(history.sessions.len(), 1);
        assert_eq!(history.completed_count(), 0);
    }
}
