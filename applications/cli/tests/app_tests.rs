//! App wiring against a temporary database and a mock API.

use greenroom_cli::commands::{self, RecordArgs, ScrobblingAction};
use greenroom_cli::{App, CliError, GreenroomConfig};
use greenroom_core::{PendingPlayQueue, Role, ScrobblingStatus};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer, dir: &TempDir) -> GreenroomConfig {
    let mut config = GreenroomConfig::default();
    config.api.base_url = server.uri();
    config.storage.database_url = format!("sqlite://{}", dir.path().join("greenroom.db").display());
    config
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access_1",
            "refresh_token": "refresh_1",
            "user": { "id": 7, "username": "kim", "user_type": "admin" }
        })))
        .mount(server)
        .await;
}

fn record_args(track: &str) -> RecordArgs {
    RecordArgs {
        track: track.to_string(),
        artist: "Boards of Canada".to_string(),
        album: Some("Geogaddi".to_string()),
        duration_ms: 240_000,
        played_at: None,
        sync: false,
    }
}

#[tokio::test]
async fn test_login_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert!(!app.client().is_authenticated());
    commands::login(&app, "kim@example.com", "hunter2").await.unwrap();
    app.close().await.unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert!(app.client().is_authenticated());
    let user = app.client().session().user().unwrap();
    assert_eq!(user.id, "7");
    assert_eq!(user.role, Role::Admin);
    app.close().await.unwrap();
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    let dir = TempDir::new().unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    commands::login(&app, "kim@example.com", "hunter2").await.unwrap();
    commands::logout(&app).await.unwrap();
    app.close().await.unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert!(!app.client().is_authenticated());
    app.close().await.unwrap();
}

#[tokio::test]
async fn test_record_requires_scrobbling_on() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert_eq!(app.scrobbles().status(), ScrobblingStatus::NotSetUp);

    let err = commands::record(&app, record_args("Dawn Chorus")).await.unwrap_err();
    assert!(matches!(err, CliError::InvalidArgument(_)));
    assert_eq!(app.queue().count().await.unwrap(), 0);
    app.close().await.unwrap();
}

#[tokio::test]
async fn test_toggle_persists_and_pauses() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    commands::scrobbling(&app, ScrobblingAction::On).await.unwrap();
    assert_eq!(app.scrobbles().status(), ScrobblingStatus::Active);
    commands::scrobbling(&app, ScrobblingAction::Off).await.unwrap();
    app.close().await.unwrap();

    // Set up once, so switching off reads as paused
    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert_eq!(app.scrobbles().status(), ScrobblingStatus::Paused);
    app.close().await.unwrap();
}

#[tokio::test]
async fn test_offline_plays_sync_after_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/scrobbles"))
        .and(header("Authorization", "Bearer access_1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "accepted": 2 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/scrobbles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "scrobbles": [] })))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    // Recorded while signed out: nothing can be sent yet
    let app = App::open(config_for(&server, &dir)).await.unwrap();
    commands::scrobbling(&app, ScrobblingAction::On).await.unwrap();
    commands::record(&app, record_args("Dawn Chorus")).await.unwrap();
    commands::record(&app, record_args("Alpha and Omega")).await.unwrap();
    assert!(matches!(commands::sync(&app).await, Err(CliError::NotLoggedIn)));
    app.close().await.unwrap();

    let app = App::open(config_for(&server, &dir)).await.unwrap();
    assert_eq!(app.scrobbles().state().pending_count, 2);
    commands::login(&app, "kim@example.com", "hunter2").await.unwrap();
    commands::sync(&app).await.unwrap();

    assert_eq!(app.queue().count().await.unwrap(), 0);
    assert_eq!(app.scrobbles().state().pending_count, 0);
    app.close().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&server, &dir);
    config.scrobble.preferred_platform = Some("napster".into());

    assert!(matches!(App::open(config).await, Err(CliError::Config(_))));
}
