//! Shared scoreboard state read by the visual surfaces.
//!
//! The monitor is the only writer; the dashboard and the terminal
//! scoreboard take cheap read snapshots.

pub mod dashboard;
pub mod tui;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::monitor::events::GameEvent;
use crate::nhl::model::{GameSnapshot, PlayKind, Roster, TeamSide};
use crate::notify::EventSink;

/// How many announcement lines the event log keeps.
const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct ShotMark {
    pub x: f64,
    pub y: f64,
    pub sort_order: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalMark {
    pub x: f64,
    pub y: f64,
    pub sweater: Option<u32>,
    pub sort_order: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GameView {
    pub monitored_abbrev: String,
    pub monitored_name: String,
    pub opponent_abbrev: String,
    pub opponent_name: String,
    pub monitored_score: u32,
    pub opponent_score: u32,
    pub game_state: String,
    /// Monitored-team shots on goal, rink coordinates.
    pub shots: Vec<ShotMark>,
    /// Monitored-team goals with the scorer's sweater number.
    pub goals: Vec<GoalMark>,
    pub log: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GameView {
    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_CAPACITY {
            let excess = self.log.len() - LOG_CAPACITY;
            self.log.drain(..excess);
        }
    }
}

#[derive(Clone, Default)]
pub struct SharedGameView {
    inner: Arc<RwLock<GameView>>,
}

impl SharedGameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> GameView {
        self.inner.read().await.clone()
    }

    /// Initialize the view from a pre-game or in-progress snapshot. For a
    /// game already underway this back-fills the shot and goal marks from
    /// every play seen so far.
    pub async fn seed(
        &self,
        snapshot: &GameSnapshot,
        monitored_side: TeamSide,
        roster: &Roster,
    ) {
        let monitored = snapshot.team(monitored_side);
        let opponent = snapshot.team(monitored_side.opponent());

        let mut view = self.inner.write().await;
        view.monitored_abbrev = monitored.abbrev.clone();
        view.monitored_name = monitored.display_name().to_string();
        view.opponent_abbrev = opponent.abbrev.clone();
        view.opponent_name = opponent.display_name().to_string();
        view.monitored_score = monitored.score.unwrap_or(0);
        view.opponent_score = opponent.score.unwrap_or(0);
        view.game_state = snapshot.game_state.as_str().to_string();
        view.shots.clear();
        view.goals.clear();
        view.updated_at = Some(Utc::now());

        for play in &snapshot.plays {
            let Some(details) = &play.details else {
                continue;
            };
            if details.event_owner_team_id != Some(monitored.id) {
                continue;
            }
            match play.kind {
                PlayKind::ShotOnGoal => {
                    if let (Some(x), Some(y)) = (details.x_coord, details.y_coord) {
                        view.shots.push(ShotMark {
                            x,
                            y,
                            sort_order: play.sort_order,
                        });
                    }
                }
                PlayKind::Goal => {
                    let sweater = details
                        .scoring_player_id
                        .and_then(|id| roster.player(id))
                        .and_then(|spot| spot.sweater_number);
                    view.goals.push(GoalMark {
                        x: details.x_coord.unwrap_or(0.0),
                        y: details.y_coord.unwrap_or(0.0),
                        sweater,
                        sort_order: play.sort_order,
                    });
                }
                PlayKind::Other => {}
            }
        }
    }

    async fn apply(&self, event: &GameEvent, monitored_team_id: u32) {
        let mut view = self.inner.write().await;
        view.updated_at = Some(Utc::now());

        match event {
            GameEvent::MonitoredGoal { score, details } => {
                view.monitored_score = score.monitored;
                view.opponent_score = score.opponent;
                let name = view.monitored_name.clone();
                match details {
                    Some(details) => {
                        view.goals.push(GoalMark {
                            x: details.x,
                            y: details.y,
                            sweater: details.scorer.as_ref().and_then(|p| p.sweater),
                            sort_order: details.sort_order,
                        });
                        view.push_log(format!("{name} score! {}", details.announcement()));
                    }
                    None => view.push_log(format!("{name} score!")),
                }
            }
            GameEvent::OpponentGoal { score } => {
                view.monitored_score = score.monitored;
                view.opponent_score = score.opponent;
                let name = view.opponent_name.clone();
                view.push_log(format!("{name} scored"));
            }
            GameEvent::Shot {
                team_id,
                x,
                y,
                sort_order,
            } => {
                if *team_id == monitored_team_id {
                    view.shots.push(ShotMark {
                        x: *x,
                        y: *y,
                        sort_order: *sort_order,
                    });
                    view.push_log("Shot on goal".to_string());
                }
            }
            GameEvent::GameOver { score } => {
                view.monitored_score = score.monitored;
                view.opponent_score = score.opponent;
                view.game_state = "FINAL".to_string();
                let line = format!(
                    "Final: {} {} — {} {}",
                    view.monitored_abbrev, score.monitored, view.opponent_abbrev, score.opponent
                );
                view.push_log(line);
            }
        }
    }
}

/// Folds classified events into the shared view.
pub struct ViewSink {
    view: SharedGameView,
    monitored_team_id: u32,
}

impl ViewSink {
    pub fn new(view: SharedGameView, monitored_team_id: u32) -> Self {
        Self {
            view,
            monitored_team_id,
        }
    }
}

#[async_trait]
impl EventSink for ViewSink {
    fn name(&self) -> &str {
        "view"
    }

    async fn deliver(&self, event: &GameEvent) -> Result<()> {
        self.view.apply(event, self.monitored_team_id).await;
        Ok(())
    }
}
