//! Local speech synthesis through a system program.
//!
//! Supports `espeak-ng`, `espeak`, macOS `say` and `spd-say`, or any command
//! configured in `[audio] speech_command` (which receives the text as its last
//! argument).

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use wavee_core::error::{Result, WaveeError};
use wavee_core::speech::{BackendKind, DEFAULT_LOCAL_RATE, SpeechBackend, Utterance};

use crate::process;

const CANDIDATES: &[&str] = &["espeak-ng", "espeak", "say", "spd-say"];

/// Words per minute at rate 1.0.
const BASE_WPM: f64 = 175.0;

pub struct SystemSpeech {
    configured: Option<String>,
    program: OnceCell<Option<String>>,
}

impl SystemSpeech {
    /// `command` overrides program detection.
    pub fn new(command: Option<String>) -> Self {
        Self {
            configured: command.filter(|c| !c.trim().is_empty()),
            program: OnceCell::new(),
        }
    }

    async fn program(&self) -> Option<&str> {
        self.program
            .get_or_init(|| async {
                match &self.configured {
                    Some(cmd) => Some(cmd.clone()),
                    None => process::first_available(CANDIDATES).await,
                }
            })
            .await
            .as_deref()
    }
}

/// Builds the argument list for a known synthesizer.
fn build_args(program: &str, utterance: &Utterance) -> Vec<String> {
    let rate = utterance.options.rate.unwrap_or(DEFAULT_LOCAL_RATE);
    let wpm = (BASE_WPM * rate).round().max(80.0) as u32;
    let name = std::path::Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut text = utterance.text.clone();
    let mut args = match name.as_str() {
        "espeak" | "espeak-ng" => {
            let mut args = vec![
                "-s".to_string(),
                wpm.to_string(),
                "-a".to_string(),
                ((utterance.volume * 200.0).round() as u32).to_string(),
            ];
            if let Some(pitch) = utterance.options.pitch {
                args.push("-p".to_string());
                args.push(((pitch * 50.0).round().clamp(0.0, 99.0) as u32).to_string());
            }
            args
        }
        "say" => {
            // `say` has no volume flag; it reads an embedded volume command.
            text = format!("[[volm {:.2}]] {}", utterance.volume.clamp(0.0, 1.0), text);
            vec!["-r".to_string(), wpm.to_string()]
        }
        "spd-say" => vec![
            "--wait".to_string(),
            "-r".to_string(),
            (((rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32).to_string(),
            "-i".to_string(),
            (((utterance.volume * 200.0) - 100.0).round() as i32).to_string(),
        ],
        _ => Vec::new(),
    };
    args.push(text);
    args
}

#[async_trait]
impl SpeechBackend for SystemSpeech {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn prepare(&self) -> Result<()> {
        match self.program().await {
            Some(program) => {
                tracing::debug!("[SystemSpeech] Using {}", program);
                Ok(())
            }
            None => Err(WaveeError::speech(format!(
                "no speech synthesizer found (tried {})",
                CANDIDATES.join(", ")
            ))),
        }
    }

    async fn speak(&self, utterance: &Utterance, cancel: CancellationToken) -> Result<()> {
        let program = self
            .program()
            .await
            .ok_or_else(|| WaveeError::speech("no speech synthesizer available"))?;

        let mut cmd = Command::new(program);
        cmd.args(build_args(program, utterance));
        process::run_cancellable(cmd, cancel, WaveeError::Speech).await
    }

    async fn release(&self) {}
}
