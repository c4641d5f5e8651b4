//! Guided visualizations.

use std::sync::Arc;
use tokio::sync::Mutex;

use wavee_core::error::{Result, WaveeError};
use wavee_core::progress::Tool;
use wavee_core::speech::SpeechOptions;
use wavee_core::visualization::{
    VISUALIZATIONS, Visualization, VisualizationProgress, VisualizationSession, find_visualization,
};

use crate::progress_service::ProgressService;
use crate::speech_service::SpeechService;

/// Runs at most one visualization at a time, narrating each step.
pub struct VisualizationService {
    progress: ProgressService,
    speech: Option<Arc<SpeechService>>,
    session: Mutex<Option<VisualizationSession>>,
}

impl VisualizationService {
    pub fn new(progress: ProgressService, speech: Option<Arc<SpeechService>>) -> Self {
        Self {
            progress,
            speech,
            session: Mutex::new(None),
        }
    }

    pub fn catalog(&self) -> &'static [Visualization] {
        &VISUALIZATIONS
    }

    /// Starts `id` from its first step, replacing any running session.
    pub async fn start(&self, id: &str) -> Result<VisualizationSession> {
        let visualization =
            find_visualization(id).ok_or_else(|| WaveeError::not_found("visualization", id))?;
        let session = VisualizationSession::new(visualization);

        *self.session.lock().await = Some(session.clone());
        tracing::debug!("[VisualizationService] Started {}", visualization.id);
        self.narrate(&session);
        Ok(session)
    }

    /// Snapshot of the running session.
    pub async fn current(&self) -> Option<VisualizationSession> {
        self.session.lock().await.clone()
    }

    /// Moves to the next step, or completes on the last one.
    ///
    /// Completion records one visualization use and ends the session.
    pub async fn next(&self) -> Result<VisualizationProgress> {
        let (progress, snapshot) = {
            let mut guard = self.session.lock().await;
            let Some(session) = guard.as_mut() else {
                return Ok(VisualizationProgress::Idle);
            };
            let progress = session.next();
            let snapshot = session.clone();
            if progress == VisualizationProgress::Completed {
                *guard = None;
            }
            (progress, snapshot)
        };

        match progress {
            VisualizationProgress::Step(_) => self.narrate(&snapshot),
            VisualizationProgress::Completed => {
                self.progress.record_use(Tool::Visualizations).await?;
                tracing::info!(
                    "[VisualizationService] Completed {}",
                    snapshot.visualization().id
                );
            }
            VisualizationProgress::Idle => {}
        }
        Ok(progress)
    }

    /// Abandons the running session without recording a use.
    pub async fn stop(&self) -> bool {
        let stopped = self.session.lock().await.take().is_some();
        if stopped {
            if let Some(speech) = &self.speech {
                speech.stop_speech().await;
            }
        }
        stopped
    }

    fn narrate(&self, session: &VisualizationSession) {
        if let (Some(speech), Some(text)) = (&self.speech, session.current_text()) {
            speech.speak_in_background(text, SpeechOptions::default().with_rate(0.85));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress_service::tests::FixedClock;
    use wavee_core::store::RecordStore;
    use wavee_infrastructure::MemoryStore;

    fn service() -> (VisualizationService, ProgressService) {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        let progress = ProgressService::new(records, Arc::new(FixedClock::new()));
        (VisualizationService::new(progress.clone(), None), progress)
    }

    #[tokio::test]
    async fn test_walk_through_to_completion() {
        let (service, progress) = service();
        let session = service.start("forest").await.unwrap();
        assert_eq!(session.current_index(), 0);

        for expected in 1..6 {
            assert_eq!(
                service.next().await.unwrap(),
                VisualizationProgress::Step(expected)
            );
        }
        assert_eq!(service.next().await.unwrap(), VisualizationProgress::Completed);
        assert_eq!(service.next().await.unwrap(), VisualizationProgress::Idle);
        assert!(service.current().await.is_none());
        assert_eq!(progress.stats().await.unwrap().count(Tool::Visualizations), 1);
    }

    #[tokio::test]
    async fn test_stop_records_nothing() {
        let (service, progress) = service();
        service.start("beach").await.unwrap();
        service.next().await.unwrap();
        assert!(service.stop().await);
        assert!(!service.stop().await);
        assert_eq!(progress.stats().await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn test_unknown_visualization() {
        let (service, _) = service();
        assert!(service.start("desert").await.unwrap_err().is_not_found());
    }
}
