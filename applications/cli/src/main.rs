/// Greenroom - command line scrobbler
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use greenroom_cli::{
    commands::{self, FeedArgs, RecordArgs, ScrobblingAction},
    App, GreenroomConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "greenroom")]
#[command(about = "Greenroom scrobbler and recently-played feed", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "GREENROOM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long, env = "GREENROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Queue a play for the next sync
    Record {
        /// Track title
        #[arg(short, long)]
        track: String,
        /// Artist name
        #[arg(short, long)]
        artist: String,
        /// Album name
        #[arg(long)]
        album: Option<String>,
        /// Play length in milliseconds
        #[arg(short, long, default_value_t = 180_000)]
        duration_ms: u64,
        /// When playback started (RFC 3339), defaults to now
        #[arg(long)]
        played_at: Option<DateTime<Utc>>,
        /// Sync right away instead of leaving the play queued
        #[arg(long)]
        sync: bool,
    },
    /// List plays waiting to sync
    Pending {
        /// How many to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Send pending plays to the server
    Sync,
    /// Show confirmed scrobbles
    History {
        /// Pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Ask the server to look up artwork for a scrobble again
    RefreshArtwork {
        /// Scrobble ID
        id: String,
    },
    /// Show the recently-played feed
    Feed {
        /// Track playing right now
        #[arg(long, requires = "now_artist")]
        now_track: Option<String>,
        /// Artist playing right now
        #[arg(long, requires = "now_track")]
        now_artist: Option<String>,
        /// Keep printing while rows are being enriched
        #[arg(short, long)]
        watch: bool,
    },
    /// Resolve the play link for a JSON file of track and band links
    Links {
        /// Path to the links file
        path: PathBuf,
    },
    /// Turn scrobbling on or off
    Scrobbling {
        #[arg(value_enum, default_value_t = Toggle::Status)]
        action: Toggle,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
    Status,
}

impl From<Toggle> for ScrobblingAction {
    fn from(toggle: Toggle) -> Self {
        match toggle {
            Toggle::On => ScrobblingAction::On,
            Toggle::Off => ScrobblingAction::Off,
            Toggle::Status => ScrobblingAction::Status,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenroom=info,greenroom_cli=info,greenroom_scrobble=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = GreenroomConfig::load(cli.config.as_deref())?;
    let app = App::open(config).await?;

    let result = run(&app, cli.command).await;
    app.close().await?;
    result?;

    Ok(())
}

async fn run(app: &App, command: Commands) -> greenroom_cli::Result<()> {
    match command {
        Commands::Login { email, password } => commands::login(app, &email, &password).await,
        Commands::Logout => commands::logout(app).await,
        Commands::Whoami => commands::whoami(app).await,
        Commands::Record {
            track,
            artist,
            album,
            duration_ms,
            played_at,
            sync,
        } => {
            commands::record(
                app,
                RecordArgs {
                    track,
                    artist,
                    album,
                    duration_ms,
                    played_at,
                    sync,
                },
            )
            .await
        }
        Commands::Pending { limit } => commands::pending(app, limit).await,
        Commands::Sync => commands::sync(app).await,
        Commands::History { pages } => commands::history(app, pages).await,
        Commands::RefreshArtwork { id } => commands::refresh_artwork(app, &id).await,
        Commands::Feed {
            now_track,
            now_artist,
            watch,
        } => {
            commands::feed(
                app,
                FeedArgs {
                    now_track,
                    now_artist,
                    watch,
                },
            )
            .await
        }
        Commands::Links { path } => commands::links(app, &path).await,
        Commands::Scrobbling { action } => commands::scrobbling(app, action.into()).await,
    }
}
