use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use streakboard::config::Config;
use streakboard::leaderboard::TimePeriod;
use streakboard::store::PointsStore;

mod cli;

#[derive(Parser)]
#[command(name = "streakboard")]
#[command(about = "Progression math and group leaderboards")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.streakboard/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the points database (overrides the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the level for an XP total
    Level {
        /// Total XP
        #[arg(allow_hyphen_values = true)]
        xp: i64,
    },

    /// Show streak milestones for a streak length
    Streak {
        /// Current streak in days
        days: u32,

        /// Previous streak length, to report a newly crossed milestone
        #[arg(long)]
        previous: Option<u32>,
    },

    /// Show the ranked leaderboard for a viewer
    Leaderboard {
        /// Viewer user id
        #[arg(long)]
        viewer: Option<String>,

        /// Maximum entries
        #[arg(long)]
        limit: Option<usize>,

        /// overall, week, or month
        #[arg(long, default_value = "overall")]
        period: String,

        /// Explicit group or challenge id (skips the aggregate scorer)
        #[arg(long)]
        group: Option<String>,
    },

    /// Record points for a user in a group
    Record {
        user: String,
        group: String,
        #[arg(long, default_value_t = 0)]
        performance: u32,
        #[arg(long, default_value_t = 0)]
        recovery: u32,
        #[arg(long, default_value_t = 0)]
        synergy: u32,
        /// Streak length after this activity
        #[arg(long, default_value_t = 0)]
        streak: u32,
    },

    /// Add a user to a group (the latest join is their current group)
    Join { user: String, group: String },

    /// Set a user's display name and avatar
    Profile {
        user: String,
        name: String,
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.database.path = Some(db);
    }
    let open_store = || PointsStore::with_path(&config.database_path());

    match cli.command {
        Commands::Level { xp } => {
            cli::progress::level_command(xp, cli.json)?;
        }
        Commands::Streak { days, previous } => {
            cli::progress::streak_command(days, previous, cli.json)?;
        }
        Commands::Leaderboard {
            viewer,
            limit,
            period,
            group,
        } => {
            let period = TimePeriod::from_str(&period)
                .ok_or_else(|| anyhow!("Unknown period: {period} (expected overall, week, month)"))?;
            let args = cli::leaderboard::LeaderboardArgs {
                viewer,
                limit,
                period,
                group,
                json: cli.json,
            };
            cli::leaderboard::leaderboard_command(&config, &open_store()?, args).await?;
        }
        Commands::Record {
            user,
            group,
            performance,
            recovery,
            synergy,
            streak,
        } => {
            let args = cli::record::PointArgs {
                performance,
                recovery,
                synergy,
                streak,
            };
            cli::record::record_command(&open_store()?, &user, &group, args)?;
        }
        Commands::Join { user, group } => {
            cli::record::join_command(&open_store()?, &user, &group)?;
        }
        Commands::Profile { user, name, avatar } => {
            cli::record::profile_command(&open_store()?, &user, &name, avatar.as_deref())?;
        }
        Commands::Init { force } => {
            cli::init::init_command(cli.config, force)?;
        }
    }

    Ok(())
}
