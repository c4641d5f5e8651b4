//! Terminal helpers shared by the interactive commands.

use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use wavee_core::breathing::{BASE_SCALE, BreathingState, MAX_SCALE};

/// Line-oriented stdin that can be awaited inside `tokio::select!`.
pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next trimmed line, or `None` at end of input.
    pub async fn next_line(&mut self) -> Option<String> {
        match self.lines.next_line().await {
            Ok(line) => line.map(|l| l.trim().to_lowercase()),
            Err(e) => {
                tracing::warn!("[Input] Failed to read stdin: {}", e);
                None
            }
        }
    }
}

pub fn is_quit(line: &Option<String>) -> bool {
    matches!(line.as_deref(), None | Some("q") | Some("quit") | Some("exit"))
}

/// Redraws the breathing line in place, followed by `extra`.
pub fn render_breath(state: &BreathingState, scale: f64, extra: &str) {
    const WIDTH: f64 = 24.0;
    let fraction = ((scale - BASE_SCALE) / (MAX_SCALE - BASE_SCALE)).clamp(0.0, 1.0);
    let filled = 4 + (fraction * (WIDTH - 4.0)).round() as usize;
    let bar = "●".repeat(filled);

    print!(
        "\r  {} {:>2}s  {}  cycles: {}  {}",
        format!("{:<12}", state.phase.label()).bold(),
        state.seconds_remaining,
        format!("{bar:<24}").cyan(),
        state.cycles_completed,
        extra.dimmed()
    );
    let _ = std::io::stdout().flush();
}

pub fn heading(text: &str) {
    println!();
    println!("{}", text.bold().cyan());
    println!("{}", "─".repeat(text.chars().count()).dimmed());
}

pub fn hint(text: &str) {
    println!("{}", text.dimmed());
}

/// Horizontal bar for a `0.0..=1.0` share.
pub fn share_bar(share: f64, width: usize) -> String {
    let filled = (share.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
