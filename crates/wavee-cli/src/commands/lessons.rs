use anyhow::Result;
use colored::Colorize;

use wavee_application::AppContext;

use super::ui;

pub async fn list(ctx: &AppContext) -> Result<()> {
    let entries = ctx.lessons.list().await?;
    let mut track = None;

    for entry in &entries {
        let lesson = entry.lesson;
        if track != Some(lesson.track) {
            track = Some(lesson.track);
            ui::heading(&lesson.track.to_string());
        }

        let marker = if entry.locked {
            "🔒".to_string()
        } else if entry.completed {
            "✓".green().to_string()
        } else {
            " ".to_string()
        };
        println!(
            " {} {} {} {}",
            marker,
            format!("{:<22}", lesson.id).bold(),
            lesson.title,
            format!("({})", lesson.duration_label()).dimmed()
        );
    }

    if entries.iter().any(|e| e.locked) {
        println!();
        ui::hint("Sign up to unlock every lesson: wavee account signup <email>");
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let lesson = ctx.lessons.open(id).await?;
    ui::heading(lesson.title);
    ui::hint(&format!("{} · {}", lesson.track, lesson.duration_label()));
    println!();
    println!("{}", lesson.content.trim_end());
    println!();
    ui::hint(&format!("Done? wavee lessons complete {}", lesson.id));
    Ok(())
}

pub async fn complete(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx.lessons.complete(id).await? {
        println!("{} Lesson complete.", "✓".green().bold());
    } else {
        println!("Already completed.");
    }
    Ok(())
}
