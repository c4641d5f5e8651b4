use anyhow::{Result, bail};
use colored::Colorize;

use wavee_application::AppContext;
use wavee_core::preferences::AudioPreferences;
use wavee_core::speech::AMBIENT_SOUNDS;

use super::ui::{self, Input};

async fn preferences(ctx: &AppContext) -> Result<AudioPreferences> {
    Ok(match &ctx.speech {
        Some(speech) => speech.preferences().await,
        None => ctx.records.load::<AudioPreferences>().await?.normalized(),
    })
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    let prefs = preferences(ctx).await?;

    ui::heading("Audio");
    let speech = if prefs.speech_enabled {
        "on".green()
    } else {
        "off".red()
    };
    println!("  Speech:         {speech}");
    println!("  Speech volume:  {:.0}%", prefs.speech_volume * 100.0);
    println!("  Ambient sound:  {}", prefs.ambient_sound_id.bold());
    println!("  Ambient volume: {:.0}%", prefs.ambient_volume * 100.0);

    match &ctx.speech {
        Some(speech) if speech.is_remote_enabled().await => {
            println!("  Voice:          {}", "ElevenLabs".cyan());
        }
        Some(_) => println!("  Voice:          system synthesizer"),
        None => ui::hint("  Audio is disabled for this run."),
    }
    Ok(())
}

pub async fn sounds(ctx: &AppContext) -> Result<()> {
    let current = preferences(ctx).await?.ambient_sound_id;

    ui::heading("Ambient sounds");
    for sound in &AMBIENT_SOUNDS {
        let marker = if sound.id == current { "▶" } else { " " };
        println!(
            " {} {} {} {}",
            marker.green(),
            sound.icon,
            format!("{:<11}", sound.id).bold(),
            sound.name
        );
    }
    Ok(())
}

pub async fn set(
    ctx: &AppContext,
    speech_enabled: Option<bool>,
    speech_volume: Option<f64>,
    ambient_volume: Option<f64>,
) -> Result<()> {
    if speech_enabled.is_none() && speech_volume.is_none() && ambient_volume.is_none() {
        bail!("nothing to change; see `wavee audio set --help`");
    }

    match &ctx.speech {
        Some(speech) => {
            if let Some(enabled) = speech_enabled {
                speech.set_speech_enabled(enabled).await?;
            }
            if let Some(volume) = speech_volume {
                speech.set_speech_volume(volume).await?;
            }
            if let Some(volume) = ambient_volume {
                speech.set_ambient_volume(volume).await?;
            }
        }
        None => {
            ctx.records
                .update::<AudioPreferences, _>(|prefs| {
                    if let Some(enabled) = speech_enabled {
                        prefs.speech_enabled = enabled;
                    }
                    if let Some(volume) = speech_volume {
                        prefs.set_speech_volume(volume);
                    }
                    if let Some(volume) = ambient_volume {
                        prefs.set_ambient_volume(volume);
                    }
                })
                .await?;
        }
    }

    show(ctx).await
}

pub async fn ambient(ctx: &AppContext, id: &str) -> Result<()> {
    let Some(speech) = &ctx.speech else {
        bail!("audio is disabled for this run");
    };
    if !AMBIENT_SOUNDS.iter().any(|s| s.id == id) {
        bail!("unknown ambient sound '{id}'; see `wavee audio sounds`");
    }

    speech.play_ambient(id).await?;
    if speech.is_ambient_playing().await {
        println!("Playing {}. Press Enter to stop.", id.bold());
        Input::new().next_line().await;
        speech.stop_ambient().await;
    } else {
        println!("Ambient sound set to {}.", id.bold());
    }
    Ok(())
}
