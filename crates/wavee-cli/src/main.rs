use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

use wavee_application::{AppContext, ContextOptions};
use wavee_core::breathing::ExerciseLength;
use wavee_core::journal::Mood;
use wavee_infrastructure::{ServiceType, WaveePaths};

mod commands;

#[derive(Parser)]
#[command(name = "wavee")]
#[command(about = "Wavee - panic relief, breathing and journaling in your terminal", long_about = None)]
struct Cli {
    /// Keep all data in memory for this run
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Directory for saved data (overrides the config file)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Run without speech or ambient sound
    #[arg(long, global = true)]
    no_speech: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the guided panic-relief flow
    Panic,
    /// Run a timed breathing exercise
    Breathe {
        /// Exercise length in minutes (1, 3 or 5)
        #[arg(long, short, default_value = "1")]
        minutes: ExerciseLength,
    },
    /// Walk through a guided visualization (lists them without an id)
    Visualize { id: Option<String> },
    /// Mood journal
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Short lessons about anxiety
    Lessons {
        #[command(subcommand)]
        action: LessonsAction,
    },
    /// Usage dashboard and achievements
    Progress,
    /// Speech and ambient sound settings
    Audio {
        #[command(subcommand)]
        action: AudioAction,
    },
    /// Sign up, log in or out
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum JournalAction {
    /// Write a new entry
    Add {
        /// great, good, okay, low or anxious
        #[arg(long, short)]
        mood: Option<Mood>,
        text: Vec<String>,
    },
    /// Show entries, newest first
    List {
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum LessonsAction {
    List,
    Show { id: String },
    Complete { id: String },
}

#[derive(Subcommand)]
enum AudioAction {
    /// Show current audio preferences
    Show,
    /// List ambient sounds
    Sounds,
    /// Change audio preferences
    Set {
        /// Turn speech on or off
        #[arg(long)]
        speech: Option<bool>,
        #[arg(long, value_name = "0.0-1.0")]
        speech_volume: Option<f64>,
        #[arg(long, value_name = "0.0-1.0")]
        ambient_volume: Option<f64>,
    },
    /// Play an ambient sound until Enter is pressed, and keep it as the default
    Ambient { id: String },
}

#[derive(Subcommand)]
enum AccountAction {
    Status,
    Signup { email: String },
    Login { email: String },
    Signout,
}

impl Commands {
    fn uses_audio(&self) -> bool {
        matches!(
            self,
            Self::Panic | Self::Breathe { .. } | Self::Visualize { .. } | Self::Audio { .. }
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging();

    let options = ContextOptions {
        base_dir: None,
        data_dir: cli.data_dir.clone(),
        ephemeral: cli.ephemeral,
        speech: !cli.no_speech && cli.command.uses_audio(),
    };
    let ctx = AppContext::initialize(options)
        .await
        .context("Failed to start Wavee")?;

    let result = match cli.command {
        Commands::Panic => commands::panic::run(&ctx).await,
        Commands::Breathe { minutes } => commands::breathe::run(&ctx, minutes).await,
        Commands::Visualize { id } => commands::visualize::run(&ctx, id.as_deref()).await,
        Commands::Journal { action } => match action {
            JournalAction::Add { mood, text } => commands::journal::add(&ctx, mood, &text.join(" ")).await,
            JournalAction::List { limit } => commands::journal::list(&ctx, limit).await,
        },
        Commands::Lessons { action } => match action {
            LessonsAction::List => commands::lessons::list(&ctx).await,
            LessonsAction::Show { id } => commands::lessons::show(&ctx, &id).await,
            LessonsAction::Complete { id } => commands::lessons::complete(&ctx, &id).await,
        },
        Commands::Progress => commands::progress::show(&ctx).await,
        Commands::Audio { action } => match action {
            AudioAction::Show => commands::audio::show(&ctx).await,
            AudioAction::Sounds => commands::audio::sounds(&ctx).await,
            AudioAction::Set {
                speech,
                speech_volume,
                ambient_volume,
            } => commands::audio::set(&ctx, speech, speech_volume, ambient_volume).await,
            AudioAction::Ambient { id } => commands::audio::ambient(&ctx, &id).await,
        },
        Commands::Account { action } => match action {
            AccountAction::Status => commands::account::status(&ctx).await,
            AccountAction::Signup { email } => commands::account::sign_up(&ctx, &email).await,
            AccountAction::Login { email } => commands::account::log_in(&ctx, &email).await,
            AccountAction::Signout => commands::account::sign_out(&ctx).await,
        },
    };

    ctx.dispose().await;
    result
}

/// Installs the stderr and daily-rolling file loggers.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> Option<WorkerGuard> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "wavee=info".into());

    // Only warnings go to the terminal; the file gets everything the filter allows.
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);

    let logs_dir = WaveePaths::new(None)
        .get_path(ServiceType::Logs)
        .ok()
        .map(|p| p.into_path_buf())
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    let (file, guard) = match logs_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "wavee.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .init();

    guard
}
