use anyhow::Result;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;

use wavee_application::{AppContext, ExerciseEvent};
use wavee_core::breathing::ExerciseLength;

use super::ui::{self, Input};

pub async fn run(ctx: &AppContext, length: ExerciseLength) -> Result<()> {
    let breathing = &ctx.breathing;
    let mut events = breathing.subscribe();
    let mut input = Input::new();

    if let Some(speech) = &ctx.speech {
        speech.resume_ambient().await?;
    }

    breathing.set_length(length);
    ui::heading(&format!("Breathing exercise ({length} min)"));
    ui::hint("In for 4, hold for 4, out for 6. Enter pauses or resumes, r restarts, q quits.");
    breathing.start();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ExerciseEvent::Tick(snapshot)) => {
                    let left = format!("{:>3}s left", snapshot.time_left);
                    ui::render_breath(&snapshot.state, snapshot.scale, &left);
                }
                Ok(ExerciseEvent::PhaseChanged(_)) => {}
                Ok(ExerciseEvent::Finished) => {
                    println!();
                    println!("{} Well done. Notice how you feel now.", "✓".green().bold());
                    break;
                }
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            line = input.next_line() => {
                if ui::is_quit(&line) {
                    breathing.reset();
                    println!();
                    break;
                }
                if line.as_deref() == Some("r") {
                    breathing.reset();
                    breathing.start();
                } else {
                    breathing.toggle();
                    if !breathing.snapshot().active {
                        println!("{}", "  (paused)".yellow());
                    }
                }
            }
        }
    }
    Ok(())
}
