use anyhow::Result;
use colored::Colorize;

use wavee_application::AppContext;
use wavee_core::visualization::{VisualizationProgress, VisualizationSession};

use super::ui::{self, Input};

pub async fn run(ctx: &AppContext, id: Option<&str>) -> Result<()> {
    let Some(id) = id else {
        ui::heading("Guided visualizations");
        for visualization in ctx.visualizations.catalog() {
            println!(
                "  {} {} - {}",
                format!("{:<10}", visualization.id).bold(),
                visualization.title,
                visualization.description.dimmed()
            );
        }
        return Ok(());
    };

    if let Some(speech) = &ctx.speech {
        speech.resume_ambient().await?;
    }

    let session = ctx.visualizations.start(id).await?;
    ui::heading(session.visualization().title);
    ui::hint("Press Enter for the next step, q to stop.");
    render(&session);

    let mut input = Input::new();
    loop {
        let line = input.next_line().await;
        if ui::is_quit(&line) {
            ctx.visualizations.stop().await;
            break;
        }

        match ctx.visualizations.next().await? {
            VisualizationProgress::Step(_) => {
                if let Some(session) = ctx.visualizations.current().await {
                    render(&session);
                }
            }
            VisualizationProgress::Completed => {
                println!(
                    "{} Take this calm with you into the rest of your day.",
                    "✓".green().bold()
                );
                break;
            }
            VisualizationProgress::Idle => break,
        }
    }
    Ok(())
}

fn render(session: &VisualizationSession) {
    if let Some(text) = session.current_text() {
        println!();
        println!(
            "{} {}",
            format!("{:>3.0}%", session.progress() * 100.0).dimmed(),
            text
        );
        println!("{}", format!("[Enter] {}", session.action_label()).green());
    }
}
