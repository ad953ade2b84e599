//! End-to-end tests for the poll/diff loop against a mock NHL feed.

use std::time::Duration;

use chrono::NaiveDate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use goalhorn::config::{ApiConfig, RateLimitConfig};
use goalhorn::error::FeedError;
use goalhorn::monitor::events::GameEvent;
use goalhorn::monitor::schedule::{find_game, GameRef};
use goalhorn::monitor::GameMonitor;
use goalhorn::nhl::model::{Roster, TeamSide};
use goalhorn::nhl::NhlClient;

const GAME_ID: u64 = 2023021001;
const SABRES: u32 = 7;
const LEAFS: u32 = 10;

fn test_client(base_url: String) -> NhlClient {
    let api = ApiConfig {
        base_url,
        request_timeout_seconds: 5,
    };
    let rate_limit = RateLimitConfig {
        requests_per_second: 1000,
        burst_size: 1000,
        max_retries: 1,
        backoff_base_ms: 1,
        backoff_max_ms: 2,
    };
    NhlClient::new(&api, &rate_limit).expect("client should build")
}

fn schedule_body() -> String {
    format!(
        r#"{{
            "gameWeek": [
                {{
                    "date": "2024-03-02",
                    "games": [
                        {{
                            "id": {GAME_ID},
                            "startTimeUTC": "2024-03-03T00:00:00Z",
                            "awayTeam": {{"id": {SABRES}}},
                            "homeTeam": {{"id": {LEAFS}}}
                        }}
                    ]
                }},
                {{"date": "2024-03-03", "games": []}}
            ]
        }}"#
    )
}

/// Live snapshot with the Sabres away. Plays and scores are parameterized so
/// tests can express consecutive polls.
fn live_body(sabres_score: u32, leafs_score: u32, state: &str, plays: &str) -> String {
    format!(
        r#"{{
            "id": {GAME_ID},
            "awayTeam": {{"id": {SABRES}, "abbrev": "BUF", "name": {{"default": "Sabres"}}, "score": {sabres_score}}},
            "homeTeam": {{"id": {LEAFS}, "abbrev": "TOR", "name": {{"default": "Maple Leafs"}}, "score": {leafs_score}}},
            "gameState": "{state}",
            "plays": [{plays}],
            "rosterSpots": [
                {{"teamId": {SABRES}, "playerId": 100, "firstName": {{"default": "Tage"}},
                  "lastName": {{"default": "Thompson"}}, "sweaterNumber": 72}},
                {{"teamId": {SABRES}, "playerId": 200, "firstName": {{"default": "Alex"}},
                  "lastName": {{"default": "Tuch"}}, "sweaterNumber": 89}}
            ]
        }}"#
    )
}

const FACEOFF: &str = r#"{"typeDescKey": "faceoff", "sortOrder": 10}"#;
const SABRES_SHOT: &str = r#"{"typeDescKey": "shot-on-goal", "sortOrder": 20,
    "details": {"eventOwnerTeamId": 7, "xCoord": 55, "yCoord": -10}}"#;
const LEAFS_SHOT: &str = r#"{"typeDescKey": "shot-on-goal", "sortOrder": 30,
    "details": {"eventOwnerTeamId": 10, "xCoord": -60, "yCoord": 12}}"#;
const SABRES_GOAL: &str = r#"{"typeDescKey": "goal", "sortOrder": 40,
    "details": {"eventOwnerTeamId": 7, "xCoord": 80, "yCoord": 2,
                "scoringPlayerId": 100, "assist1PlayerId": 200}}"#;

fn game_ref() -> GameRef {
    GameRef {
        game_id: GAME_ID,
        monitored_side: TeamSide::Away,
        start_time_utc: "2024-03-03T00:00:00Z".parse().unwrap(),
    }
}

fn roster() -> Roster {
    let snapshot = serde_json::from_str(&live_body(0, 0, "LIVE", "")).unwrap();
    Roster::from_snapshot(&snapshot)
}

async fn mount_live(server: &MockServer, body: String, times: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/v1/gamecenter/{GAME_ID}/play-by-play")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body));
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

// ──────────────────────────────────────────
// Daily game lookup
// ──────────────────────────────────────────

#[tokio::test]
async fn lookup_finds_away_game_on_its_date_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/schedule/2024-03-02"))
        .respond_with(ResponseTemplate::new(200).set_body_string(schedule_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/schedule/2024-03-03"))
        .respond_with(ResponseTemplate::new(200).set_body_string(schedule_body()))
        .mount(&server)
        .await;

    let client = test_client(server.uri());

    let game_day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    let week = client.schedule(game_day).await.unwrap();
    let game = find_game(&week, game_day, SABRES).expect("game should be found");
    assert_eq!(game.game_id, GAME_ID);
    assert_eq!(game.monitored_side, TeamSide::Away);

    let off_day = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
    let week = client.schedule(off_day).await.unwrap();
    assert!(find_game(&week, off_day, SABRES).is_none());
}

// ──────────────────────────────────────────
// Poll-and-diff over the live feed
// ──────────────────────────────────────────

#[tokio::test]
async fn unchanged_feed_yields_no_events() {
    let server = MockServer::start().await;
    mount_live(&server, live_body(2, 1, "LIVE", FACEOFF), None).await;

    let client = test_client(server.uri());
    let mut monitor = GameMonitor::new(game_ref(), roster(), Duration::from_millis(5));

    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty());
    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn goal_and_shots_are_classified_and_attributed() {
    let server = MockServer::start().await;
    // Baseline 2-1 with one play; polls one and two both read it.
    mount_live(&server, live_body(2, 1, "LIVE", FACEOFF), Some(3)).await;
    // Then the Sabres score and both teams register a shot.
    let plays = format!("{FACEOFF}, {SABRES_SHOT}, {LEAFS_SHOT}, {SABRES_GOAL}");
    mount_live(&server, live_body(3, 1, "LIVE", &plays), None).await;

    let client = test_client(server.uri());
    let mut monitor = GameMonitor::new(game_ref(), roster(), Duration::from_millis(5));

    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty(), "baseline poll should be quiet");
    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty(), "second unchanged poll should be quiet");

    let events = monitor.poll_once(&client).await.unwrap();

    let goals: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::MonitoredGoal { details, .. } => Some(details),
            _ => None,
        })
        .collect();
    assert_eq!(goals.len(), 1, "2->3 must emit exactly one goal");
    let details = goals[0].as_ref().expect("goal should carry details");
    assert_eq!(details.scorer.as_ref().unwrap().name, "Tage Thompson");
    assert_eq!(details.scorer.as_ref().unwrap().sweater, Some(72));
    assert_eq!(details.assists.len(), 1);
    assert_eq!(details.assists[0].name, "Alex Tuch");

    let shots: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Shot { team_id, .. } => Some(*team_id),
            _ => None,
        })
        .collect();
    assert_eq!(shots, vec![SABRES, LEAFS]);
}

#[tokio::test]
async fn terminal_state_ends_the_game() {
    let server = MockServer::start().await;
    mount_live(&server, live_body(2, 1, "LIVE", ""), Some(2)).await;
    mount_live(&server, live_body(2, 1, "FINAL", ""), None).await;

    let client = test_client(server.uri());
    let mut monitor = GameMonitor::new(game_ref(), roster(), Duration::from_millis(5));

    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty());

    let events = monitor.poll_once(&client).await.unwrap();
    assert_eq!(events.len(), 1);
    match &events[0] {
        GameEvent::GameOver { score } => {
            assert_eq!(score.monitored, 2);
            assert_eq!(score.opponent, 1);
        }
        other => panic!("expected game over, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_skips_one_cycle_then_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/v1/gamecenter/{GAME_ID}/play-by-play")))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_live(&server, live_body(2, 1, "LIVE", ""), None).await;

    let client = test_client(server.uri());
    let mut monitor = GameMonitor::new(game_ref(), roster(), Duration::from_millis(5));

    let err = monitor.poll_once(&client).await.unwrap_err();
    assert!(matches!(err, FeedError::Malformed { .. }));

    // The next cycle re-establishes the baseline and stays quiet.
    let events = monitor.poll_once(&client).await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn unresolved_scorer_is_omitted_from_details() {
    let server = MockServer::start().await;
    mount_live(&server, live_body(0, 0, "LIVE", ""), Some(2)).await;
    let unknown_scorer_goal = r#"{"typeDescKey": "goal", "sortOrder": 15,
        "details": {"eventOwnerTeamId": 7, "xCoord": 70, "yCoord": -3,
                    "scoringPlayerId": 999}}"#;
    mount_live(&server, live_body(1, 0, "LIVE", unknown_scorer_goal), None).await;

    let client = test_client(server.uri());
    let mut monitor = GameMonitor::new(game_ref(), roster(), Duration::from_millis(5));

    monitor.poll_once(&client).await.unwrap();
    let events = monitor.poll_once(&client).await.unwrap();

    match &events[0] {
        GameEvent::MonitoredGoal { details, .. } => {
            let details = details.as_ref().expect("details should be present");
            assert!(details.scorer.is_none(), "unknown id must be omitted");
            assert!(details.assists.is_empty());
        }
        other => panic!("expected goal event, got {other:?}"),
    }
}
