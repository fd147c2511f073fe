use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mindease", version, about = "MindEase CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current mood
    Mood {
        #[command(subcommand)]
        action: commands::mood::MoodAction,
    },
    /// Select a mood and check in for today
    Checkin(commands::checkin::CheckinArgs),
    /// Record a completed exercise
    Exercise(commands::exercise::ExerciseArgs),
    /// Streak and exercise progress
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Run a guided breathing session until Ctrl-C
    Breathe(commands::breathe::BreatheArgs),
    /// Breathing sound cues
    Sound {
        #[command(subcommand)]
        action: commands::sound::SoundAction,
    },
    /// Ask the wellness assistant
    Chat(commands::chat::ChatArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Mood { action } => commands::mood::run(action),
        Commands::Checkin(args) => commands::checkin::run(args),
        Commands::Exercise(args) => commands::exercise::run(args),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Breathe(args) => commands::breathe::run(args),
        Commands::Sound { action } => commands::sound::run(action),
        Commands::Chat(args) => commands::chat::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
