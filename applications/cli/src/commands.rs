/// Subcommand implementations
use crate::app::App;
use crate::error::{CliError, Result};
use chrono::{DateTime, Utc};
use greenroom_core::{
    BandLinks, DisplayTrack, NowPlaying, PendingPlay, PendingPlayQueue, ScrobblingStatus,
    TrackLinks,
};
use greenroom_feed::{resolve, LinkKind, PlayAction, RecentlyPlayedFeed};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    let user = app.client().login(email, password).await?;
    info!(user_id = %user.id, "Logged in");
    println!("Logged in as {} ({:?})", user.username, user.role);
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.client().logout();
    app.scrobbles().reset();
    println!("Logged out");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    if !app.client().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let user = app.client().current_user().await?;
    println!("{} ({:?})", user.username, user.role);
    if let Some(email) = &user.email {
        println!("  email: {}", email);
    }
    Ok(())
}

/// A play typed in on the command line
#[derive(Debug, Clone)]
pub struct RecordArgs {
    pub track: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration_ms: u64,
    pub played_at: Option<DateTime<Utc>>,
    pub sync: bool,
}

pub async fn record(app: &App, args: RecordArgs) -> Result<()> {
    let status = app.scrobbles().status();
    if status != ScrobblingStatus::Active {
        return Err(CliError::InvalidArgument(format!(
            "scrobbling is {} (run `greenroom scrobbling on`)",
            status
        )));
    }

    let mut play = PendingPlay::new(
        args.track,
        args.artist,
        args.duration_ms,
        app.config().scrobble.device_name.clone(),
        args.played_at.unwrap_or_else(Utc::now),
    );
    if let Some(album) = args.album {
        play = play.with_album(album);
    }

    let pending = app.scrobbles().record_play(&play).await?;
    println!("Queued \"{}\" by {} ({} pending)", play.track_name, play.artist_name, pending);

    // The debounced sync would die with the process; sync in the foreground instead
    if args.sync {
        sync(app).await?;
    }
    Ok(())
}

pub async fn pending(app: &App, limit: usize) -> Result<()> {
    let count = app.queue().count().await?;
    if count == 0 {
        println!("No pending plays");
        return Ok(());
    }

    println!("{} pending plays", count);
    for play in app.queue().oldest(limit).await? {
        println!(
            "  {}  {} - {}",
            play.played_at.format("%Y-%m-%d %H:%M"),
            play.artist_name,
            play.track_name
        );
    }
    if count > limit {
        println!("  ... and {} more", count - limit);
    }
    Ok(())
}

pub async fn sync(app: &App) -> Result<()> {
    if !app.client().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    let before = app.scrobbles().state().pending_count;
    let synced = app.scrobbles().sync_now().await;
    let after = app.scrobbles().state().pending_count;

    if synced {
        println!("Synced {} plays ({} still pending)", before.saturating_sub(after), after);
    } else if before == 0 {
        println!("Nothing to sync");
    } else {
        println!("Sync failed; {} plays stay queued", after);
    }
    Ok(())
}

pub async fn history(app: &App, pages: usize) -> Result<()> {
    if !app.client().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    let store = app.scrobbles();
    store.fetch_latest().await?;
    for _ in 1..pages {
        if !store.load_more().await? {
            break;
        }
    }

    let state = store.state();
    if state.scrobbles.is_empty() {
        println!("No scrobbles yet");
        return Ok(());
    }
    for scrobble in &state.scrobbles {
        println!("{}", format_track(&DisplayTrack::from(scrobble)));
    }
    if state.has_more() {
        println!("  (more available, use --pages)");
    }
    Ok(())
}

pub async fn refresh_artwork(app: &App, scrobble_id: &str) -> Result<()> {
    if !app.client().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    let response = app.scrobbles().refresh_artwork(scrobble_id).await?;
    match response.album_art_url {
        Some(url) => println!("{:?}: {}", response.status, url),
        None => println!("{:?}", response.status),
    }
    Ok(())
}

/// What is playing on this machine, if the caller says so
#[derive(Debug, Clone, Default)]
pub struct FeedArgs {
    pub now_track: Option<String>,
    pub now_artist: Option<String>,
    pub watch: bool,
}

pub async fn feed(app: &App, args: FeedArgs) -> Result<()> {
    if !app.client().is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    let now = match (args.now_track, args.now_artist) {
        (Some(track), Some(artist)) => Some(NowPlaying {
            started_at: Some(Utc::now()),
            ..NowPlaying::new(track, artist)
        }),
        (None, None) => None,
        _ => {
            return Err(CliError::InvalidArgument(
                "--now-track and --now-artist go together".to_string(),
            ))
        }
    };

    let feed = RecentlyPlayedFeed::new(app.client().clone(), app.config().feed.recent_limit);
    feed.refresh().await;
    print_feed(&feed.merged(now.as_ref()));

    if args.watch {
        let mut updates = feed.subscribe();
        while feed.is_polling() {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    println!();
                    print_feed(&feed.merged(now.as_ref()));
                }
                () = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
        }
        debug!("Feed settled");
    }
    Ok(())
}

fn print_feed(tracks: &[DisplayTrack]) {
    if tracks.is_empty() {
        println!("Nothing played recently");
    }
    for track in tracks {
        println!("{}", format_track(track));
    }
}

fn format_track(track: &DisplayTrack) -> String {
    let marker = if track.now_playing { "*" } else { " " };
    let when = track
        .played_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "                ".to_string());
    let mut line = format!("{} {}  {} - {}", marker, when, track.artist, track.name);
    if let Some(album) = &track.album {
        line.push_str(&format!(" [{}]", album));
    }
    if track.is_pending() {
        line.push_str(" (enriching)");
    }
    line
}

#[derive(Debug, Default, Deserialize)]
struct LinkFile {
    #[serde(default)]
    track: TrackLinks,
    #[serde(default)]
    band: BandLinks,
}

/// Resolve the play button for a JSON file of `{ "track": {..}, "band": {..} }` links
pub async fn links(app: &App, path: &Path) -> Result<()> {
    let raw = tokio::fs::read_to_string(path).await?;
    let file: LinkFile = serde_json::from_str(&raw)?;
    let preferred = app.config().preferred_platform()?;

    match resolve(&file.track, &file.band, preferred) {
        PlayAction::Open { url, kind } => println!("open ({}): {}", kind_label(kind), url),
        PlayAction::Choose { links, kind } => {
            println!("choose ({}):", kind_label(kind));
            for link in links {
                println!("  {}: {}", link.platform.display_name(), link.url);
            }
        }
        PlayAction::None => println!("no play link"),
    }
    Ok(())
}

fn kind_label(kind: LinkKind) -> &'static str {
    match kind {
        LinkKind::Direct => "direct",
        LinkKind::Indirect => "indirect",
    }
}

/// `greenroom scrobbling on|off|status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrobblingAction {
    On,
    Off,
    Status,
}

pub async fn scrobbling(app: &App, action: ScrobblingAction) -> Result<()> {
    let store = app.scrobbles();
    let status = match action {
        ScrobblingAction::On => store.set_enabled(true),
        ScrobblingAction::Off => store.set_enabled(false),
        ScrobblingAction::Status => store.status(),
    };
    if action != ScrobblingAction::Status {
        greenroom_storage::settings::save_scrobbling(app.pool(), &store.signals()).await?;
    }

    println!("Scrobbling: {}", status);
    let pending = store.state().pending_count;
    if pending > 0 {
        println!("{} plays waiting to sync", pending);
    }
    Ok(())
}

