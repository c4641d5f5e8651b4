//! Audio playback through an external player program.
//!
//! Remote speech clips are written to a temporary file and played to the end;
//! the ambient loop is a long-running player process restarted whenever its
//! source or volume changes.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::{Child, Command};
use tokio::sync::{Mutex, OnceCell};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use wavee_core::error::{Result, WaveeError};
use wavee_core::speech::{AudioClip, AudioOutput};

use crate::process;

const CANDIDATES: &[&str] = &["mpv", "ffplay", "afplay", "paplay"];

/// A running ambient loop.
struct LoopHandle {
    child: Child,
    source: String,
}

pub struct ProcessAudioOutput {
    configured: Option<String>,
    player: OnceCell<Option<String>>,
    ambient: Mutex<Option<LoopHandle>>,
    temp_dir: PathBuf,
}

impl ProcessAudioOutput {
    /// `command` overrides player detection.
    pub fn new(command: Option<String>) -> Self {
        Self {
            configured: command.filter(|c| !c.trim().is_empty()),
            player: OnceCell::new(),
            ambient: Mutex::new(None),
            temp_dir: std::env::temp_dir(),
        }
    }

    async fn player(&self) -> Result<&str> {
        self.player
            .get_or_init(|| async {
                match &self.configured {
                    Some(cmd) => Some(cmd.clone()),
                    None => process::first_available(CANDIDATES).await,
                }
            })
            .await
            .as_deref()
            .ok_or_else(|| {
                WaveeError::audio(format!(
                    "no audio player found (tried {})",
                    CANDIDATES.join(", ")
                ))
            })
    }

    async fn kill_loop(handle: &mut LoopHandle) {
        if let Err(e) = handle.child.kill().await {
            tracing::debug!("[ProcessAudio] Ambient player already gone: {}", e);
        }
    }
}

/// Builds the player argument list, or `None` if the player cannot loop.
///
/// `afplay` and `paplay` only play local files once, so they are used for
/// speech clips but never for the streamed ambient tracks.
fn build_args(player: &str, source: &str, volume: f64, looping: bool) -> Option<Vec<String>> {
    let percent = ((volume.clamp(0.0, 1.0)) * 100.0).round() as u32;
    let name = std::path::Path::new(player)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut args = match name.as_str() {
        "mpv" => {
            let mut args = vec![
                "--no-video".to_string(),
                "--really-quiet".to_string(),
                format!("--volume={percent}"),
            ];
            if looping {
                args.push("--loop=inf".to_string());
            }
            args
        }
        "ffplay" => {
            let mut args = vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
                "-volume".to_string(),
                percent.to_string(),
            ];
            if looping {
                args.push("-loop".to_string());
                args.push("0".to_string());
            }
            args
        }
        "afplay" | "paplay" if looping => return None,
        "afplay" => vec!["-v".to_string(), format!("{:.2}", volume.clamp(0.0, 1.0))],
        "paplay" => vec![format!("--volume={}", (volume.clamp(0.0, 1.0) * 65536.0) as u32)],
        _ => Vec::new(),
    };
    args.push(source.to_string());
    Some(args)
}

#[async_trait]
impl AudioOutput for ProcessAudioOutput {
    async fn play_clip(
        &self,
        clip: &AudioClip,
        volume: f64,
        cancel: CancellationToken,
    ) -> Result<()> {
        let player = self.player().await?;
        let path = self
            .temp_dir
            .join(format!("wavee-{}.{}", Uuid::new_v4(), clip.extension()));
        tokio::fs::write(&path, clip.data.as_slice()).await?;

        let source = path.to_string_lossy().into_owned();
        let result = match build_args(player, &source, volume, false) {
            Some(args) => {
                let mut cmd = Command::new(player);
                cmd.args(args);
                process::run_cancellable(cmd, cancel, WaveeError::Audio).await
            }
            None => Err(WaveeError::audio(format!("{player} cannot play clips"))),
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::debug!("[ProcessAudio] Failed to remove {}: {}", path.display(), e);
        }
        result
    }

    async fn start_loop(&self, source: &str, volume: f64) -> Result<()> {
        let player = self.player().await?;
        let mut ambient = self.ambient.lock().await;
        if let Some(mut previous) = ambient.take() {
            Self::kill_loop(&mut previous).await;
        }

        *ambient = Some(spawn_loop(player, source, volume)?);
        tracing::debug!("[ProcessAudio] Ambient loop started: {}", source);
        Ok(())
    }

    async fn stop_loop(&self) {
        if let Some(mut handle) = self.ambient.lock().await.take() {
            Self::kill_loop(&mut handle).await;
            tracing::debug!("[ProcessAudio] Ambient loop stopped: {}", handle.source);
        }
    }

    async fn set_loop_volume(&self, volume: f64) -> Result<()> {
        let player = self.player().await?;
        // The restart happens under the lock so a concurrent stop cannot be undone.
        let mut ambient = self.ambient.lock().await;
        let Some(mut current) = ambient.take() else {
            return Ok(());
        };
        Self::kill_loop(&mut current).await;

        *ambient = Some(spawn_loop(player, &current.source, volume)?);
        tracing::debug!("[ProcessAudio] Ambient volume set to {:.2}", volume);
        Ok(())
    }
}

fn spawn_loop(player: &str, source: &str, volume: f64) -> Result<LoopHandle> {
    let args = build_args(player, source, volume, true).ok_or_else(|| {
        WaveeError::audio(format!(
            "{player} cannot loop streamed audio; set [audio] player_command to mpv or ffplay"
        ))
    })?;

    let child = Command::new(player)
        .args(args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| WaveeError::audio(format!("Failed to spawn {player}: {e}")))?;

    Ok(LoopHandle {
        child,
        source: source.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mpv_loop_args() {
        let args = build_args("mpv", "https://example.com/rain.mp3", 0.3, true).unwrap();
        assert_eq!(
            args,
            vec![
                "--no-video",
                "--really-quiet",
                "--volume=30",
                "--loop=inf",
                "https://example.com/rain.mp3"
            ]
        );
    }

    #[test]
    fn test_ffplay_clip_args() {
        let args = build_args("/usr/bin/ffplay", "/tmp/a.mp3", 1.0, false).unwrap();
        assert_eq!(args.last().unwrap(), "/tmp/a.mp3");
        assert!(args.contains(&"-autoexit".to_string()));
        assert!(!args.contains(&"-loop".to_string()));
    }

    #[test]
    fn test_afplay_cannot_loop() {
        assert!(build_args("afplay", "x.mp3", 0.5, true).is_none());
        assert_eq!(
            build_args("afplay", "x.mp3", 0.5, false).unwrap(),
            vec!["-v", "0.50", "x.mp3"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clip_plays_with_configured_player() {
        let output = ProcessAudioOutput::new(Some("true".to_string()));
        let clip = AudioClip::new(b"ID3".to_vec(), "audio/mpeg");
        output
            .play_clip(&clip, 0.8, CancellationToken::new())
            .await
            .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_loop_replace_and_stop() {
        let output = ProcessAudioOutput::new(Some("sleep".to_string()));
        output.start_loop("30", 0.3).await.unwrap();
        output.start_loop("31", 0.3).await.unwrap();
        assert_eq!(
            output.ambient.lock().await.as_ref().unwrap().source,
            "31"
        );

        output.set_loop_volume(0.6).await.unwrap();
        assert_eq!(
            output.ambient.lock().await.as_ref().unwrap().source,
            "31"
        );

        output.stop_loop().await;
        assert!(output.ambient.lock().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_volume_change_does_not_revive_stopped_loop() {
        let output = ProcessAudioOutput::new(Some("sleep".to_string()));
        output.start_loop("30", 0.3).await.unwrap();

        let (changed, ()) = tokio::join!(output.set_loop_volume(0.6), output.stop_loop());
        changed.unwrap();
        assert!(output.ambient.lock().await.is_none());

        output.set_loop_volume(0.9).await.unwrap();
        assert!(output.ambient.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_non_looping_player_points_at_config() {
        let output = ProcessAudioOutput::new(Some("afplay".to_string()));
        let err = output
            .start_loop("https://example.com/rain.mp3", 0.3)
            .await
            .unwrap_err();
        assert!(matches!(err, WaveeError::Audio(_)));
        assert!(err.to_string().contains("player_command"));
        assert!(output.ambient.lock().await.is_none());
    }
}
