use anyhow::Result;
use colored::Colorize;
use tokio::sync::broadcast::error::RecvError;

use wavee_application::{AppContext, PanicEvent};
use wavee_core::panic::{PanicStep, StepKind};

use super::ui::{self, Input};

pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut events = ctx.panic.subscribe();
    let mut input = Input::new();

    if let Some(speech) = &ctx.speech {
        speech.resume_ambient().await?;
    }

    ctx.panic.start();
    ui::hint("Press Enter to continue, p to pause breathing, q to leave.");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PanicEvent::StepChanged { index, step }) => {
                    render_step(index, ctx.panic.step_count(), step);
                }
                Ok(PanicEvent::BreathingStarted) => {
                    println!("{}", "  Follow the rhythm...".italic());
                }
                Ok(PanicEvent::BreathingTick { state, scale }) => ui::render_breath(&state, scale, ""),
                Ok(PanicEvent::Completed(session)) => {
                    println!();
                    println!(
                        "{} You made it through. ({}s)",
                        "✓".green().bold(),
                        session.duration_ms / 1000
                    );
                    break;
                }
                Ok(PanicEvent::Exited(_)) => break,
                Ok(PanicEvent::Started { .. }) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("[panic] Skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            line = input.next_line() => {
                if ui::is_quit(&line) {
                    if ctx.panic.exit().await?.is_some() {
                        println!();
                        println!("Take care. You can come back any time.");
                    }
                    break;
                }
                if line.as_deref() == Some("p") {
                    ctx.panic.toggle_breathing();
                } else {
                    ctx.panic.advance().await?;
                }
            }
        }
    }
    Ok(())
}

fn render_step(index: usize, total: usize, step: &PanicStep) {
    println!();
    println!(
        "{} {}",
        format!("[{}/{}]", index + 1, total).dimmed(),
        step.title.bold().cyan()
    );
    println!("{}", step.body);
    if step.kind == StepKind::Breathing {
        ui::hint("The breathing guide starts in a moment.");
    }
    println!("{}", format!("[Enter] {}", step.action_label).green());
}
