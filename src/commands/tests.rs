//! Tests for the sync operations against a mocked Sleeper API

use super::*;
use crate::{
    config::SyncConfig,
    error::SyncError,
    sleeper::http::SleeperClient,
    storage::{MemoryObjectStore, ObjectStore},
    Season,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

struct Harness {
    server: MockServer,
    store: Arc<MemoryObjectStore>,
    cache_dir: TempDir,
}

impl Harness {
    async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            store: Arc::new(MemoryObjectStore::new("ffl-test")),
            cache_dir: TempDir::new().unwrap(),
        }
    }

    fn cache_path(&self) -> PathBuf {
        self.cache_dir.path().join("players_nfl.json")
    }

    fn config(&self, bucket: bool) -> SyncConfig {
        SyncConfig {
            bucket: bucket.then(|| "ffl-test".to_string()),
            players_cache_path: self.cache_path(),
            base_url: self.server.uri(),
            ..SyncConfig::default()
        }
    }

    fn context(&self) -> SyncContext {
        let store: Arc<dyn ObjectStore> = self.store.clone();
        SyncContext::new(
            self.config(true),
            SleeperClient::with_base_url(self.server.uri()).unwrap(),
            Some(store),
        )
    }

    fn context_reading_bucket_players(&self) -> SyncContext {
        let mut config = self.config(true);
        config.use_s3_players = true;
        let store: Arc<dyn ObjectStore> = self.store.clone();
        SyncContext::new(
            config,
            SleeperClient::with_base_url(self.server.uri()).unwrap(),
            Some(store),
        )
    }

    fn publish_players(&self, key: &str, players: Value) {
        crate::storage::put_json(self.store.as_ref(), key, &players).unwrap();
    }

    fn context_without_bucket(&self) -> SyncContext {
        SyncContext::new(
            self.config(false),
            SleeperClient::with_base_url(self.server.uri()).unwrap(),
            None,
        )
    }

    fn stored(&self, key: &str) -> Value {
        let object = self
            .store
            .object(key)
            .unwrap_or_else(|| panic!("missing object {key}"));
        serde_json::from_slice(&object.body).unwrap()
    }

    async fn mount(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    async fn mount_league(&self) {
        self.mount(
            "/user/Gridiron_Guru",
            json!({"user_id": "7001", "username": "Gridiron_Guru", "display_name": "Guru"}),
        )
        .await;
        self.mount(
            "/user/7001",
            json!({"user_id": "7001", "username": "Gridiron_Guru", "display_name": "Guru"}),
        )
        .await;
        self.mount(
            "/user/7001/leagues/nfl/2024",
            json!([
                {"league_id": "100", "name": "Old Timers", "status": "complete"},
                {"league_id": "555", "name": "Dynasty Bros", "status": "in_season",
                 "scoring_settings": {"rec": 1.0}, "roster_positions": ["QB", "RB", "WR"]}
            ]),
        )
        .await;
        self.mount(
            "/league/555/users",
            json!([
                {"user_id": "7001", "username": "Gridiron_Guru", "display_name": "Guru",
                 "metadata": {"team_name": "Blitz Brigade"}},
                {"user_id": "7002", "username": "rival", "display_name": "Rival"}
            ]),
        )
        .await;
        self.mount(
            "/league/555/rosters",
            json!([
                {"league_id": "555", "roster_id": 1, "owner_id": "7001",
                 "players": ["4046", "6794"], "starters": ["4046"], "reserve": ["6794"],
                 "settings": {"wins": 3}},
                {"league_id": "555", "roster_id": 2, "owner_id": "7002", "players": null}
            ]),
        )
        .await;
    }

    async fn mount_players(&self) {
        self.mount(
            "/players/nfl",
            json!({
                "4046": {"full_name": "Patrick Mahomes", "position": "QB", "team": "KC",
                         "bye_week": 6, "status": "Active"},
                "6794": {"first_name": "Justin", "last_name": "Jefferson", "position": "WR",
                         "team": "MIN", "injury_status": "Questionable"}
            }),
        )
        .await;
    }
}

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 15, 17, 3, 9).unwrap()
}

fn request(username: &str) -> RosterRequest {
    RosterRequest {
        username: Some(username.to_string()),
        season: Some(Season::new(2024)),
        ..RosterRequest::default()
    }
}

#[cfg(test)]
mod players_sync_tests {
    use super::*;
    use crate::commands::players_sync::players_sync_at;

    #[tokio::test]
    async fn test_players_sync_publishes_three_objects() {
        let h = Harness::new().await;
        h.mount_players().await;
        let ctx = h.context();

        let report = players_sync_at(&ctx, None, fixed_now()).await.unwrap();

        assert_eq!(report.count, 2);
        assert_eq!(report.fetched_at, "2024-09-15T17:03:09+00:00");
        assert_eq!(
            report.s3_day.as_deref(),
            Some("s3://ffl-test/sleeper/players/2024-09-15.json")
        );
        assert_eq!(
            report.s3_current.as_deref(),
            Some("s3://ffl-test/sleeper/players/current.json")
        );
        assert_eq!(
            report.s3_core.as_deref(),
            Some("s3://ffl-test/sleeper/players/players_core.json")
        );
        assert!(report.warning.is_none());

        let core = h.stored("sleeper/players/players_core.json");
        assert_eq!(core["6794"]["full_name"], "Justin Jefferson");
        assert_eq!(core["6794"]["injury_status"], "Questionable");
        assert_eq!(h.stored("sleeper/players/current.json")["4046"]["team"], "KC");

        assert!(h.cache_path().exists());
    }

    #[tokio::test]
    async fn test_players_sync_without_bucket_warns() {
        let h = Harness::new().await;
        h.mount_players().await;
        let ctx = h.context_without_bucket();
        let out = h.cache_dir.path().join("extra").join("players.json");

        let report = players_sync(&ctx, Some(&out)).await.unwrap();

        assert_eq!(
            report.warning.as_deref(),
            Some("S3_BUCKET not set or publish disabled; wrote local cache only")
        );
        assert!(report.s3_day.is_none());
        assert_eq!(report.local_out.as_deref(), Some(out.as_path()));
        assert!(out.exists());
        assert!(h.store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_players_sync_propagates_api_errors() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/players/nfl"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&h.server)
            .await;

        let result = players_sync(&h.context(), None).await;
        assert!(matches!(result, Err(SyncError::Http(_))));
        assert!(h.store.keys().is_empty());
    }
}

#[cfg(test)]
mod roster_sync_tests {
    use super::*;
    use crate::commands::roster_sync::roster_sync_at;

    #[tokio::test]
    async fn test_roster_sync_snapshot_contents() {
        let h = Harness::new().await;
        h.mount_league().await;
        h.mount_players().await;
        let ctx = h.context();

        let snapshot = roster_sync_at(&ctx, &request("Gridiron_Guru"), fixed_now())
            .await
            .unwrap();

        assert_eq!(snapshot.user.user_id.as_deref(), Some("7001"));
        assert_eq!(snapshot.season, Season::new(2024));
        assert_eq!(snapshot.league.league_id.as_deref(), Some("555"));
        assert_eq!(snapshot.league.scoring_settings, Some(json!({"rec": 1.0})));
        assert_eq!(snapshot.teams.len(), 2);

        let mine = &snapshot.teams[0];
        assert_eq!(mine.manager.team_name.as_deref(), Some("Blitz Brigade"));
        assert_eq!(mine.players[1].name.as_deref(), Some("Justin Jefferson"));
        assert_eq!(mine.starters[0].pos.as_deref(), Some("QB"));
        assert_eq!(mine.reserve, vec!["6794".to_string()]);
        assert_eq!(mine.settings, json!({"wins": 3}));

        let theirs = &snapshot.teams[1];
        assert_eq!(theirs.manager.username.as_deref(), Some("rival"));
        assert!(theirs.players.is_empty());
    }

    #[tokio::test]
    async fn test_roster_sync_writes_all_layouts() {
        let h = Harness::new().await;
        h.mount_league().await;
        h.mount_players().await;
        let ctx = h.context();

        let snapshot = roster_sync_at(&ctx, &request("Gridiron_Guru"), fixed_now())
            .await
            .unwrap();

        let expected = [
            "sleeper/rosters/2024/555/20240915T170309Z.json",
            "sleeper/rosters/2024/555/latest.json",
            "sleeper/rosters/by_user/gridiron_guru/2024/555/roster.json",
            "sleeper/rosters/by_user/7001/2024/555/20240915T170309Z.json",
            "sleeper/rosters/by_user/7001/2024/555/latest.json",
        ];
        for key in expected {
            let body = h.stored(key);
            assert_eq!(body["league"]["league_id"], "555", "{key}");
            assert!(body.get("s3_uri").is_none(), "{key}");
        }

        assert_eq!(
            snapshot.s3_uri.as_deref(),
            Some("s3://ffl-test/sleeper/rosters/2024/555/20240915T170309Z.json")
        );
        assert_eq!(
            snapshot.s3_latest_uri.as_deref(),
            Some("s3://ffl-test/sleeper/rosters/2024/555/latest.json")
        );
        assert_eq!(
            snapshot.s3_user_stable_uri.as_deref(),
            Some("s3://ffl-test/sleeper/rosters/by_user/gridiron_guru/2024/555/roster.json")
        );
        assert!(snapshot.s3_user_uri.is_some());
        assert!(snapshot.s3_user_latest_uri.is_some());
    }

    #[tokio::test]
    async fn test_roster_sync_by_user_id_and_league_name() {
        let h = Harness::new().await;
        h.mount_league().await;
        h.mount_players().await;
        let ctx = h.context_without_bucket();

        let request = RosterRequest {
            user_id: Some("7001".to_string()),
            season: Some(Season::new(2024)),
            league_name: Some("  old timers ".to_string()),
            ..RosterRequest::default()
        };

        h.mount(
            "/league/100/users",
            json!([{"user_id": "7001", "username": "Gridiron_Guru", "display_name": "Guru"}]),
        )
        .await;
        h.mount(
            "/league/100/rosters",
            json!([{"league_id": "100", "roster_id": 4, "owner_id": "7001", "players": ["4046"]}]),
        )
        .await;

        let snapshot = roster_sync(&ctx, &request).await.unwrap();
        assert_eq!(snapshot.league.league_id.as_deref(), Some("100"));
        assert_eq!(snapshot.league.name.as_deref(), Some("Old Timers"));
        assert_eq!(snapshot.teams.len(), 1);
        assert_eq!(snapshot.teams[0].roster_id, Some(4));
        assert_eq!(snapshot.teams[0].players[0].name.as_deref(), Some("Patrick Mahomes"));
        assert!(snapshot.s3_uri.is_none());

        let paths: Vec<String> = h
            .server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert!(paths.iter().any(|p| p == "/user/7001"));
        assert!(!paths.iter().any(|p| p == "/user/Gridiron_Guru"));
        assert!(!paths.iter().any(|p| p.starts_with("/league/555")));
    }

    #[tokio::test]
    async fn test_roster_sync_requires_identity() {
        let h = Harness::new().await;
        let result = roster_sync(&h.context(), &RosterRequest::default()).await;
        assert!(matches!(result, Err(SyncError::MissingUserIdentity)));
    }

    #[tokio::test]
    async fn test_roster_sync_unknown_username() {
        let h = Harness::new().await;
        Mock::given(method("GET"))
            .and(path("/user/ghost"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&h.server)
            .await;

        match roster_sync(&h.context(), &request("ghost")).await {
            Err(SyncError::UserNotFound { user }) => assert_eq!(user, "ghost"),
            other => panic!("Expected UserNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_roster_sync_no_leagues() {
        let h = Harness::new().await;
        h.mount("/user/rookie", json!({"user_id": "42", "username": "rookie"}))
            .await;
        h.mount("/user/42/leagues/nfl/2024", json!([])).await;

        match roster_sync(&h.context(), &request("rookie")).await {
            Err(SyncError::NoLeagues { user, season }) => {
                assert_eq!(user, "rookie");
                assert_eq!(season, 2024);
            }
            other => panic!("Expected NoLeagues, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_roster_sync_unknown_league_id() {
        let h = Harness::new().await;
        h.mount_league().await;

        let request = RosterRequest {
            league_id: Some("999".to_string()),
            ..request("Gridiron_Guru")
        };
        assert!(matches!(
            roster_sync(&h.context(), &request).await,
            Err(SyncError::LeagueNotFound { .. })
        ));
        assert!(h.store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_players_core_read_from_bucket() {
        let h = Harness::new().await;
        h.mount_league().await;
        // No /players/nfl mock: the API must not be needed.
        let ctx = h.context_reading_bucket_players();

        h.publish_players(
            "sleeper/players/players_core.json",
            json!({"4046": {"full_name": "From Bucket", "position": "QB", "team": "KC",
                            "bye_week": null, "status": null, "injury_status": null}}),
        );

        let snapshot = roster_sync(&ctx, &request("Gridiron_Guru")).await.unwrap();
        assert_eq!(snapshot.teams[0].players[0].name.as_deref(), Some("From Bucket"));
        assert_eq!(snapshot.teams[0].players[1].name, None);
    }

    #[tokio::test]
    async fn test_players_core_from_bucket_current_map() {
        let h = Harness::new().await;
        h.mount_league().await;
        let ctx = h.context_reading_bucket_players();

        // Only the full map is published; the core object is missing.
        h.publish_players(
            "sleeper/players/current.json",
            json!({
                "4046": {"first_name": "Patrick", "last_name": "Mahomes", "position": "QB"},
                "6794": {"first_name": "Justin", "last_name": "Jefferson", "team": "MIN"}
            }),
        );

        let snapshot = roster_sync(&ctx, &request("Gridiron_Guru")).await.unwrap();
        let players = &snapshot.teams[0].players;
        assert_eq!(players[0].name.as_deref(), Some("Patrick Mahomes"));
        assert_eq!(players[0].pos.as_deref(), Some("QB"));
        assert_eq!(players[1].name.as_deref(), Some("Justin Jefferson"));
        assert_eq!(players[1].team.as_deref(), Some("MIN"));
    }

    #[tokio::test]
    async fn test_players_core_empty_core_falls_back_to_current() {
        let h = Harness::new().await;
        h.mount_league().await;
        let ctx = h.context_reading_bucket_players();

        h.publish_players("sleeper/players/players_core.json", json!({}));
        h.publish_players(
            "sleeper/players/current.json",
            json!({"4046": {"full_name": "Current Map", "position": "QB"}}),
        );

        let snapshot = roster_sync(&ctx, &request("Gridiron_Guru")).await.unwrap();
        assert_eq!(snapshot.teams[0].players[0].name.as_deref(), Some("Current Map"));
    }

    #[tokio::test]
    async fn test_republished_players_core_reaches_next_sync() {
        let h = Harness::new().await;
        h.mount_league().await;
        let ctx = h.context_reading_bucket_players();
        let core = |name: &str, injury: Option<&str>| {
            json!({"4046": {"full_name": name, "position": "QB", "team": "KC",
                            "bye_week": null, "status": "Active", "injury_status": injury}})
        };

        h.publish_players("sleeper/players/players_core.json", core("Old Name", None));
        let first = roster_sync(&ctx, &request("Gridiron_Guru")).await.unwrap();
        assert_eq!(first.teams[0].players[0].name.as_deref(), Some("Old Name"));

        h.publish_players(
            "sleeper/players/players_core.json",
            core("Refreshed Name", Some("Questionable")),
        );
        let second = roster_sync(&ctx, &request("Gridiron_Guru")).await.unwrap();
        let player = &second.teams[0].players[0];
        assert_eq!(player.name.as_deref(), Some("Refreshed Name"));
        assert_eq!(player.injury_status.as_deref(), Some("Questionable"));
    }

    #[tokio::test]
    async fn test_players_core_from_fresh_local_cache() {
        let h = Harness::new().await;
        h.mount_league().await;
        crate::core::cache::write_string(
            &h.cache_path(),
            r#"{"4046":{"first_name":"Pat","last_name":"Mahomes"}}"#,
        )
        .unwrap();

        let snapshot = roster_sync(&h.context(), &request("Gridiron_Guru"))
            .await
            .unwrap();
        assert_eq!(snapshot.teams[0].players[0].name.as_deref(), Some("Pat Mahomes"));
    }

    #[test]
    fn test_roster_request_lenient_season() {
        let from_string: RosterRequest =
            serde_json::from_value(json!({"username": "a", "season": "2023"})).unwrap();
        assert_eq!(from_string.season, Some(Season::new(2023)));

        let from_number: RosterRequest =
            serde_json::from_value(json!({"user_id": "1", "season": 2022})).unwrap();
        assert_eq!(from_number.season(), Season::new(2022));

        let missing: RosterRequest = serde_json::from_value(json!({"username": "a"})).unwrap();
        assert_eq!(missing.season(), Season::default());

        let zero: RosterRequest =
            serde_json::from_value(json!({"username": "a", "season": 0})).unwrap();
        assert_eq!(zero.season, None);
        assert_eq!(zero.season(), Season::current());

        let zero_text: RosterRequest =
            serde_json::from_value(json!({"username": "a", "season": "0"})).unwrap();
        assert_eq!(zero_text.season, None);

        assert!(serde_json::from_value::<RosterRequest>(json!({"season": "soon"})).is_err());
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[tokio::test]
    async fn test_scheduler_missing_targets() {
        let h = Harness::new().await;
        match run_scheduler(&h.context()).await {
            SchedulerOutcome::MissingTargets(missing) => {
                assert_eq!(
                    missing.error,
                    "No valid targets list at s3://ffl-test/sleeper/config/roster_targets.json"
                );
                assert!(missing.hint.contains("username|user_id"));
            }
            other => panic!("Expected MissingTargets, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scheduler_targets_not_a_list() {
        let h = Harness::new().await;
        crate::storage::put_json(
            h.store.as_ref(),
            "sleeper/config/roster_targets.json",
            &json!({"username": "Gridiron_Guru"}),
        )
        .unwrap();

        assert!(matches!(
            run_scheduler(&h.context()).await,
            SchedulerOutcome::MissingTargets(_)
        ));
    }

    #[tokio::test]
    async fn test_scheduler_records_per_target_results() {
        let h = Harness::new().await;
        h.mount_league().await;
        h.mount_players().await;
        crate::storage::put_json(
            h.store.as_ref(),
            "sleeper/config/roster_targets.json",
            &json!([
                {"username": "Gridiron_Guru", "season": "2024", "league_id": "555"},
                {"league_id": "555"},
                "not-an-object"
            ]),
        )
        .unwrap();

        let SchedulerOutcome::Completed(report) = run_scheduler(&h.context()).await else {
            panic!("Expected Completed");
        };

        assert_eq!(report.count, 3);
        assert_eq!(report.errors, 2);

        match &report.results[0] {
            TargetResult::Synced {
                ok,
                season,
                league_id,
                s3_latest_uri,
            } => {
                assert!(*ok);
                assert_eq!(*season, Season::new(2024));
                assert_eq!(league_id.as_deref(), Some("555"));
                assert_eq!(
                    s3_latest_uri.as_deref(),
                    Some("s3://ffl-test/sleeper/rosters/2024/555/latest.json")
                );
            }
            other => panic!("Expected Synced, got {:?}", other),
        }

        match &report.results[1] {
            TargetResult::Failed { ok, error, target } => {
                assert!(!ok);
                assert_eq!(error, "roster_sync requires 'user_id' or 'username'");
                assert_eq!(target, &json!({"league_id": "555"}));
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
        assert!(!report.results[2].is_ok());
    }

    #[tokio::test]
    async fn test_scheduler_without_bucket() {
        let h = Harness::new().await;
        match run_scheduler(&h.context_without_bucket()).await {
            SchedulerOutcome::MissingTargets(missing) => {
                assert!(missing.error.starts_with("No valid targets list at s3://None/"));
            }
            other => panic!("Expected MissingTargets, got {:?}", other),
        }
    }
}
