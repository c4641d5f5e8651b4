use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use wavee_application::AppContext;
use wavee_core::journal::Mood;

use super::ui;

pub async fn add(ctx: &AppContext, mood: Option<Mood>, text: &str) -> Result<()> {
    let entry = ctx.journal.save(mood, text).await?;
    println!(
        "{} Saved {} {} entry.",
        "✓".green().bold(),
        entry.mood.emoji(),
        entry.mood.label()
    );
    Ok(())
}

pub async fn list(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    let entries = ctx.journal.list().await?;
    if entries.is_empty() {
        ui::hint("No entries yet. Try: wavee journal add --mood okay \"Today I...\"");
        return Ok(());
    }

    ui::heading("Journal");
    for entry in entries.iter().take(limit.unwrap_or(usize::MAX)) {
        let when = entry.created_at.with_timezone(&Local);
        println!(
            "{} {} {}",
            when.format("%a %b %e, %H:%M").to_string().dimmed(),
            entry.mood.emoji(),
            entry.mood.label().bold()
        );
        println!("  {}", entry.text);
    }
    Ok(())
}
