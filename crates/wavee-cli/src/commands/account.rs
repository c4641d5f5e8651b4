use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use wavee_application::AppContext;

pub async fn status(ctx: &AppContext) -> Result<()> {
    let state = ctx.accounts.status().await?;
    match (&state.email, state.since) {
        (Some(email), Some(since)) if !state.is_guest() => println!(
            "Signed in as {} since {}",
            email.bold(),
            since.with_timezone(&Local).format("%Y-%m-%d")
        ),
        _ => println!("{} Some lessons are locked.", "Guest mode.".yellow()),
    }
    Ok(())
}

pub async fn sign_up(ctx: &AppContext, email: &str) -> Result<()> {
    let state = ctx.accounts.sign_up(email).await?;
    welcome(state.email.as_deref());
    Ok(())
}

pub async fn log_in(ctx: &AppContext, email: &str) -> Result<()> {
    let state = ctx.accounts.log_in(email).await?;
    welcome(state.email.as_deref());
    Ok(())
}

pub async fn sign_out(ctx: &AppContext) -> Result<()> {
    ctx.accounts.sign_out().await?;
    println!("Signed out. You are in guest mode.");
    Ok(())
}

fn welcome(email: Option<&str>) {
    println!(
        "{} Welcome, {}. All lessons are unlocked.",
        "✓".green().bold(),
        email.unwrap_or("friend")
    );
}
