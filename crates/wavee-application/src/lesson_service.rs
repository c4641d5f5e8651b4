//! Lesson library with guest gating and completion tracking.

use wavee_core::error::{Result, WaveeError};
use wavee_core::lesson::{CompletedLessons, LESSONS, Lesson, find_lesson};
use wavee_core::progress::Tool;
use wavee_core::store::RecordStore;

use crate::account_service::AccountService;
use crate::progress_service::ProgressService;

/// One row of the lesson list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonEntry {
    pub lesson: &'static Lesson,
    pub locked: bool,
    pub completed: bool,
}

#[derive(Clone)]
pub struct LessonService {
    records: RecordStore,
    accounts: AccountService,
    progress: ProgressService,
}

impl LessonService {
    pub fn new(records: RecordStore, accounts: AccountService, progress: ProgressService) -> Self {
        Self {
            records,
            accounts,
            progress,
        }
    }

    /// Every lesson in catalog order, with lock and completion flags for
    /// the current account.
    pub async fn list(&self) -> Result<Vec<LessonEntry>> {
        let guest = self.accounts.is_guest().await?;
        let completed = self.records.load::<CompletedLessons>().await?;

        Ok(LESSONS
            .iter()
            .map(|lesson| LessonEntry {
                lesson,
                locked: !lesson.is_open_to(guest),
                completed: completed.contains(lesson.id),
            })
            .collect())
    }

    /// Opens a lesson for reading.
    ///
    /// # Errors
    ///
    /// - [`WaveeError::NotFound`] for an unknown id
    /// - [`WaveeError::Validation`] when a guest opens a locked lesson
    pub async fn open(&self, id: &str) -> Result<&'static Lesson> {
        let lesson = find_lesson(id).ok_or_else(|| WaveeError::not_found("lesson", id))?;
        if !lesson.is_open_to(self.accounts.is_guest().await?) {
            return Err(WaveeError::validation(format!(
                "'{}' is available after signing up",
                lesson.title
            )));
        }
        Ok(lesson)
    }

    /// Marks a lesson complete.
    ///
    /// Returns `true` the first time; repeated calls change nothing and do
    /// not count as another use.
    pub async fn complete(&self, id: &str) -> Result<bool> {
        let lesson = self.open(id).await?;

        let mut newly_completed = false;
        self.records
            .update::<CompletedLessons, _>(|done| newly_completed = done.mark(lesson.id))
            .await?;

        if newly_completed {
            self.progress.record_use(Tool::Lessons).await?;
            tracing::info!("[LessonService] Completed lesson {}", lesson.id);
        }
        Ok(newly_completed)
    }
}
