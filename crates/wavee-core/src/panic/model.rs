use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::store::{StoreRecord, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    Abandoned,
}

/// One run through the panic-relief flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanicSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Step indices in the order they were completed.
    pub completed_steps: Vec<usize>,
    pub status: SessionStatus,
    pub duration_ms: u64,
}

impl PanicSession {
    pub fn begin(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: now,
            ended_at: None,
            completed_steps: Vec::new(),
            status: SessionStatus::InProgress,
            duration_ms: 0,
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    pub(crate) fn finish(&mut self, status: SessionStatus, now: DateTime<Utc>) {
        self.status = status;
        self.ended_at = Some(now);
        self.duration_ms = (now - self.started_at).num_milliseconds().max(0) as u64;
    }
}

/// Append-only log of finished panic sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanicSessionLog {
    pub sessions: Vec<PanicSession>,
}

impl StoreRecord for PanicSessionLog {
    const KEY: &'static str = keys::PANIC_SESSIONS;
}

impl PanicSessionLog {
    pub fn append(&mut self, session: PanicSession) {
        self.sessions.push(session);
    }

    pub fn completed_count(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .count()
    }
}
