use anyhow::Result;
use colored::Colorize;

use wavee_application::AppContext;

use super::ui;

pub async fn show(ctx: &AppContext) -> Result<()> {
    let summary = ctx.progress.summary().await?;

    ui::heading("Your progress");
    println!("  Total sessions: {}", summary.total_sessions.to_string().bold());
    println!("  Current streak: {} day(s)", summary.streak_days.to_string().bold());
    match summary.days_since_last_use {
        Some(0) => println!("  Last used: today"),
        Some(1) => println!("  Last used: yesterday"),
        Some(days) => println!("  Last used: {days} days ago"),
        None => ui::hint("  Nothing recorded yet."),
    }

    ui::heading("Tools");
    for usage in &summary.tools {
        println!(
            "  {} {} {}",
            format!("{:<15}", usage.tool.label()),
            ui::share_bar(usage.share, 20).cyan(),
            usage.count
        );
    }

    ui::heading("Achievements");
    for achievement in &summary.unlocked {
        println!(
            "  {} {} - {}",
            achievement.icon,
            achievement.title.bold(),
            achievement.description
        );
    }
    if let Some(next) = summary.next_locked {
        println!(
            "  {} {}",
            "Next:".dimmed(),
            format!("{} - {}", next.title, next.description).dimmed()
        );
    }
    Ok(())
}
