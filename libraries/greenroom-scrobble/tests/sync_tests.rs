//! Scrobble store tests against mocked API and an in-memory queue.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use greenroom_core::{
    ConfirmedScrobble, GreenroomError, MemoryPendingQueue, MetadataStatus, MockPendingPlayQueue,
    MockScrobbleApi, PendingPlay, PendingPlayQueue, RefreshArtworkResponse, RefreshArtworkStatus,
    ScrobblePage, ScrobbleSubmission, ScrobblingStatus, SubmitScrobblesResponse,
};
use greenroom_scrobble::{ScrobbleStore, SYNC_BATCH_SIZE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn play(i: i64) -> PendingPlay {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    PendingPlay::new(
        format!("Track {:03}", i),
        "Artist",
        200_000,
        "com.example.player",
        base + ChronoDuration::minutes(i),
    )
}

fn queue_with(n: i64) -> Arc<MemoryPendingQueue> {
    Arc::new(MemoryPendingQueue::with_plays((0..n).map(play)))
}

fn scrobble(id: &str) -> ConfirmedScrobble {
    ConfirmedScrobble {
        id: id.to_string(),
        track_name: format!("Song {}", id),
        artist_name: "Artist".into(),
        album_name: None,
        played_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        duration_ms: None,
        metadata_status: MetadataStatus::Enriched,
        album_art_url: Some(format!("https://img.example/{}.jpg", id)),
        has_preferred_artwork: false,
        can_refresh_artwork: true,
    }
}

fn page(ids: &[&str], next_cursor: Option<&str>) -> ScrobblePage {
    ScrobblePage {
        scrobbles: ids.iter().map(|id| scrobble(id)).collect(),
        next_cursor: next_cursor.map(String::from),
    }
}

/// An API with a session that accepts every batch
fn accepting_api(expected_batches: usize) -> MockScrobbleApi {
    let mut api = MockScrobbleApi::new();
    api.expect_has_session().returning(|| true);
    api.expect_submit_scrobbles()
        .times(expected_batches)
        .returning(|batch| {
            Ok(SubmitScrobblesResponse {
                accepted: batch.len(),
                rejected: 0,
            })
        });
    api.expect_list_scrobbles()
        .returning(|_, _| Ok(ScrobblePage::default()));
    api
}

// =============================================================================
// sync_now
// =============================================================================

mod sync_now {
    use super::*;

    #[tokio::test]
    async fn test_submits_ceil_n_over_50_batches() {
        for n in [1_i64, 49, 50, 51, 100, 120] {
            let expected = (n as usize).div_ceil(SYNC_BATCH_SIZE);
            let queue = queue_with(n);
            let store = ScrobbleStore::new(Arc::new(accepting_api(expected)), queue.clone());

            assert!(store.sync_now().await, "sync of {} plays", n);
            assert_eq!(queue.count().await.unwrap(), 0);
            assert_eq!(store.state().pending_count, 0);
        }
    }

    #[tokio::test]
    async fn test_reads_at_most_1000_plays() {
        let queue = queue_with(1030);
        let store = ScrobbleStore::new(Arc::new(accepting_api(20)), queue.clone());

        assert!(store.sync_now().await);
        assert_eq!(queue.count().await.unwrap(), 30);
        assert_eq!(store.state().pending_count, 30);
    }

    #[tokio::test]
    async fn test_failed_batch_stays_queued() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        {
            let calls = calls.clone();
            api.expect_submit_scrobbles().times(2).returning(move |batch| {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(GreenroomError::network("connection reset"))
                } else {
                    Ok(SubmitScrobblesResponse {
                        accepted: batch.len(),
                        rejected: 0,
                    })
                }
            });
        }
        api.expect_list_scrobbles()
            .times(1)
            .returning(|_, _| Ok(ScrobblePage::default()));

        let queue = queue_with(60);
        let first_batch: Vec<String> = queue.snapshot().await[..50]
            .iter()
            .map(|p| p.local_id.clone())
            .collect();

        let store = ScrobbleStore::new(Arc::new(api), queue.clone());
        assert!(store.sync_now().await);

        let remaining: Vec<String> = queue
            .snapshot()
            .await
            .into_iter()
            .map(|p| p.local_id)
            .collect();
        assert_eq!(remaining, first_batch);
        assert_eq!(store.state().pending_count, 50);
    }

    #[tokio::test]
    async fn test_all_batches_failing_returns_false() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        api.expect_submit_scrobbles()
            .times(2)
            .returning(|_| Err(GreenroomError::network("offline")));
        api.expect_list_scrobbles()
            .returning(|_, _| Err(GreenroomError::network("offline")));

        let queue = queue_with(70);
        let store = ScrobbleStore::new(Arc::new(api), queue.clone());

        assert!(!store.sync_now().await);
        assert_eq!(queue.count().await.unwrap(), 70);
        assert!(!store.is_syncing());
        assert!(store.state().last_synced_at.is_none());
    }

    #[tokio::test]
    async fn test_no_session_short_circuits() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().times(1).returning(|| false);
        api.expect_submit_scrobbles().never();
        api.expect_list_scrobbles().never();

        let mut queue = MockPendingPlayQueue::new();
        queue.expect_oldest().never();

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(queue));
        assert!(!store.sync_now().await);
    }

    #[tokio::test]
    async fn test_empty_queue_is_vacuous_success() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        api.expect_submit_scrobbles().never();
        api.expect_list_scrobbles().never();

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        assert!(store.sync_now().await);
    }

    #[tokio::test]
    async fn test_queue_read_failure_returns_false_and_releases_flag() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        api.expect_submit_scrobbles().never();

        let mut queue = MockPendingPlayQueue::new();
        queue
            .expect_oldest()
            .times(2)
            .returning(|_| Err(GreenroomError::storage("database is locked")));

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(queue));
        assert!(!store.sync_now().await);
        assert!(!store.is_syncing());
        // The flag was cleared, so a second attempt gets as far as the queue again
        assert!(!store.sync_now().await);
    }

    #[tokio::test]
    async fn test_batches_are_oldest_first_with_normalized_durations() {
        let submitted = Arc::new(Mutex::new(Vec::<ScrobbleSubmission>::new()));
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        {
            let submitted = submitted.clone();
            api.expect_submit_scrobbles().returning(move |batch| {
                submitted.lock().unwrap().extend(batch.iter().cloned());
                Ok(SubmitScrobblesResponse::default())
            });
        }
        api.expect_list_scrobbles()
            .returning(|_, _| Ok(ScrobblePage::default()));

        let mut short = play(5);
        short.duration_ms = 5_000;
        let mut long = play(1);
        long.duration_ms = 45_000;
        let queue = Arc::new(MemoryPendingQueue::with_plays([short, play(3), long]));

        let store = ScrobbleStore::new(Arc::new(api), queue);
        assert!(store.sync_now().await);

        let submitted = submitted.lock().unwrap();
        let names: Vec<_> = submitted.iter().map(|s| s.track_name.as_str()).collect();
        assert_eq!(names, ["Track 001", "Track 003", "Track 005"]);
        assert_eq!(submitted[0].duration_ms, 45_000);
        assert_eq!(submitted[2].duration_ms, 30_000);
    }

    #[tokio::test]
    async fn test_sync_refreshes_history() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().returning(|| true);
        api.expect_submit_scrobbles()
            .times(1)
            .returning(|batch| {
                Ok(SubmitScrobblesResponse {
                    accepted: batch.len(),
                    rejected: 0,
                })
            });
        api.expect_list_scrobbles()
            .withf(|cursor, limit| cursor.is_none() && *limit == 20)
            .times(1)
            .returning(|_, _| Ok(page(&["s2", "s1"], Some("c1"))));

        let store = ScrobbleStore::new(Arc::new(api), queue_with(2));
        assert!(store.sync_now().await);

        let state = store.state();
        assert_eq!(state.scrobbles.len(), 2);
        assert!(state.has_more());
        assert!(state.last_synced_at.is_some());
        assert!(!state.syncing);
    }
}

// =============================================================================
// Status and auto-sync
// =============================================================================

mod auto_sync {
    use super::*;

    fn active(store: &ScrobbleStore) {
        store.set_permission_granted(true);
        store.set_enabled(true);
        assert_eq!(store.status(), ScrobblingStatus::Active);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let store = ScrobbleStore::new(
            Arc::new(MockScrobbleApi::new()),
            Arc::new(MemoryPendingQueue::new()),
        );
        assert_eq!(store.status(), ScrobblingStatus::NotSetUp);

        assert_eq!(store.set_enabled(true), ScrobblingStatus::PermissionNeeded);
        assert_eq!(store.set_permission_granted(true), ScrobblingStatus::Active);
        assert_eq!(store.set_enabled(false), ScrobblingStatus::Paused);
        assert_eq!(store.set_enabled(true), ScrobblingStatus::Active);
        assert_eq!(store.set_permission_granted(false), ScrobblingStatus::PermissionNeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_plays_coalesce_into_one_sync() {
        let queue = Arc::new(MemoryPendingQueue::new());
        let store = ScrobbleStore::new(Arc::new(accepting_api(1)), queue.clone());
        active(&store);

        for i in 0..3 {
            store.record_play(&play(i)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(2000)).await;
        }
        assert_eq!(queue.count().await.unwrap(), 3);
        assert!(store.auto_sync_pending());

        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(queue.count().await.unwrap(), 0);
        assert_eq!(store.state().pending_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_sync_does_nothing_unless_active() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().never();
        api.expect_submit_scrobbles().never();

        let queue = Arc::new(MemoryPendingQueue::new());
        let store = ScrobbleStore::new(Arc::new(api), queue.clone());
        store.set_enabled(true); // permission still missing

        store.record_play(&play(0)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(queue.count().await.unwrap(), 1);
        assert_eq!(store.state().pending_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_scheduled_sync() {
        let mut api = MockScrobbleApi::new();
        api.expect_has_session().never();

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        active(&store);

        store.record_play(&play(0)).await.unwrap();
        store.reset();
        assert!(!store.auto_sync_pending());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.state().pending_count, 1);
    }

    #[tokio::test]
    async fn test_record_play_rejects_blank_names() {
        let store = ScrobbleStore::new(
            Arc::new(MockScrobbleApi::new()),
            Arc::new(MemoryPendingQueue::new()),
        );

        assert_eq!(store.record_play(&play(0).with_album("x")).await.unwrap(), 1);

        let mut blank = play(1);
        blank.artist_name = "  ".into();
        let err = store.record_play(&blank).await.unwrap_err();
        assert!(matches!(err, GreenroomError::InvalidInput(_)));
        assert_eq!(store.state().pending_count, 1);
    }
}

// =============================================================================
// History and artwork
// =============================================================================

mod history {
    use super::*;

    #[tokio::test]
    async fn test_load_more_appends_until_exhausted() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles()
            .withf(|cursor, _| cursor.is_none())
            .returning(|_, _| Ok(page(&["s4", "s3"], Some("c1"))));
        api.expect_list_scrobbles()
            .withf(|cursor, _| cursor.as_deref() == Some("c1"))
            .returning(|_, _| Ok(page(&["s3", "s2", "s1"], None)));

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.fetch_latest().await.unwrap();
        assert!(store.load_more().await.unwrap());

        let state = store.state();
        let ids: Vec<_> = state.scrobbles.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["s4", "s3", "s2", "s1"]);
        assert!(!state.has_more());

        assert!(!store.load_more().await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_artwork_updates_entry() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles().returning(|_, _| {
            let mut p = page(&["s1"], None);
            p.scrobbles[0].metadata_status = MetadataStatus::NotFound;
            p.scrobbles[0].album_art_url = None;
            Ok(p)
        });
        api.expect_refresh_artwork()
            .withf(|id| id == "s1")
            .returning(|_| {
                Ok(RefreshArtworkResponse {
                    status: RefreshArtworkStatus::Success,
                    album_art_url: Some("https://img.example/found.jpg".into()),
                })
            });

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.fetch_latest().await.unwrap();

        let response = store.refresh_artwork("s1").await.unwrap();
        assert_eq!(response.status, RefreshArtworkStatus::Success);

        let entry = &store.state().scrobbles[0];
        assert_eq!(entry.album_art_url.as_deref(), Some("https://img.example/found.jpg"));
        assert_eq!(entry.metadata_status, MetadataStatus::Enriched);
    }

    #[tokio::test]
    async fn test_refresh_artwork_without_result_leaves_entry() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles()
            .returning(|_, _| Ok(page(&["s1"], None)));
        api.expect_refresh_artwork().returning(|_| {
            Ok(RefreshArtworkResponse {
                status: RefreshArtworkStatus::NotFound,
                album_art_url: None,
            })
        });

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.fetch_latest().await.unwrap();
        let before = store.state();

        store.refresh_artwork("s1").await.unwrap();
        assert_eq!(store.state(), before);
    }

    #[tokio::test]
    async fn test_set_preferred_artwork_is_optimistic() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles()
            .returning(|_, _| Ok(page(&["s1", "s2"], None)));
        api.expect_set_preferred_artwork()
            .withf(|id, _| id == "s1")
            .returning(|_, _| Ok(()));
        api.expect_set_preferred_artwork()
            .withf(|id, _| id == "s2")
            .returning(|_, _| {
                Err(GreenroomError::Api {
                    status: 422,
                    code: None,
                    message: "Artwork URL is not an image".into(),
                })
            });

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.fetch_latest().await.unwrap();

        store
            .set_preferred_artwork("s1", "https://img.example/pick.jpg")
            .await
            .unwrap();
        let err = store
            .set_preferred_artwork("s2", "https://img.example/bad.txt")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Artwork URL is not an image");

        let state = store.state();
        assert!(state.scrobbles[0].has_preferred_artwork);
        assert_eq!(
            state.scrobbles[0].album_art_url.as_deref(),
            Some("https://img.example/pick.jpg")
        );
        assert!(!state.scrobbles[1].has_preferred_artwork);
        assert_eq!(
            state.scrobbles[1].album_art_url.as_deref(),
            Some("https://img.example/s2.jpg")
        );
    }

    #[tokio::test]
    async fn test_clear_preferred_artwork_reverts_on_failure() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles().returning(|_, _| {
            let mut p = page(&["s1"], None);
            p.scrobbles[0].has_preferred_artwork = true;
            Ok(p)
        });
        api.expect_clear_preferred_artwork()
            .times(1)
            .returning(|_| Err(GreenroomError::network("offline")));

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.fetch_latest().await.unwrap();

        assert!(store.clear_preferred_artwork("s1").await.is_err());
        assert!(store.state().scrobbles[0].has_preferred_artwork);
    }

    #[tokio::test]
    async fn test_reset_forgets_history() {
        let mut api = MockScrobbleApi::new();
        api.expect_list_scrobbles()
            .returning(|_, _| Ok(page(&["s1"], Some("c1"))));

        let store = ScrobbleStore::new(Arc::new(api), Arc::new(MemoryPendingQueue::new()));
        store.set_enabled(true);
        store.fetch_latest().await.unwrap();

        store.reset();

        let state = store.state();
        assert!(state.scrobbles.is_empty());
        assert!(!state.has_more());
        assert!(state.signals.set_up);
    }
}
