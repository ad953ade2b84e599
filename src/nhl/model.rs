//! Typed views of the NHL web API responses.
//!
//! Only the fields the monitor reads are modeled; everything else in the feed
//! is ignored by serde. Field names mirror `api-web.nhle.com` v1 JSON.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Which bench the monitored team occupies for a given game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            Self::Home => Self::Away,
            Self::Away => Self::Home,
        }
    }
}

// === Schedule feed (`/v1/schedule/{date}`) ===

/// One week of scheduled games, as returned by the schedule-by-date endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWeek {
    #[serde(default)]
    pub game_week: Vec<GameDay>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub games: Vec<ScheduledGame>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGame {
    pub id: u64,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: DateTime<Utc>,
    pub away_team: ScheduledTeam,
    pub home_team: ScheduledTeam,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTeam {
    pub id: u32,
}

// === Live game feed (`/v1/gamecenter/{id}/play-by-play`) ===

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: u64,
    pub away_team: TeamInfo,
    pub home_team: TeamInfo,
    pub game_state: GameState,
    #[serde(default)]
    pub plays: Vec<PlayEvent>,
    #[serde(default)]
    pub roster_spots: Vec<RosterSpot>,
}

impl GameSnapshot {
    pub fn team(&self, side: TeamSide) -> &TeamInfo {
        match side {
            TeamSide::Home => &self.home_team,
            TeamSide::Away => &self.away_team,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub id: u32,
    #[serde(default)]
    pub abbrev: String,
    pub name: Option<LocalizedName>,
    /// Absent until the game starts.
    pub score: Option<u32>,
}

impl TeamInfo {
    pub fn display_name(&self) -> &str {
        self.name
            .as_ref()
            .map(|n| n.default.as_str())
            .unwrap_or(self.abbrev.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedName {
    pub default: String,
}

/// Lifecycle flag of a live game. The feed moves FUT → PRE → LIVE → CRIT →
/// FINAL → OFF; both of the last two are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum GameState {
    Future,
    Pregame,
    Live,
    Critical,
    Final,
    Off,
    Other(String),
}

impl From<String> for GameState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "FUT" => Self::Future,
            "PRE" => Self::Pregame,
            "LIVE" => Self::Live,
            "CRIT" => Self::Critical,
            "FINAL" => Self::Final,
            "OFF" => Self::Off,
            _ => Self::Other(raw),
        }
    }
}

impl GameState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Final | Self::Off)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Future => "FUT",
            Self::Pregame => "PRE",
            Self::Live => "LIVE",
            Self::Critical => "CRIT",
            Self::Final => "FINAL",
            Self::Off => "OFF",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    #[serde(rename = "typeDescKey")]
    pub kind: PlayKind,
    /// Strictly increasing within a game; never renumbered.
    pub sort_order: u64,
    pub details: Option<PlayDetails>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PlayKind {
    Goal,
    ShotOnGoal,
    Other,
}

impl From<String> for PlayKind {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "goal" => Self::Goal,
            "shot-on-goal" => Self::ShotOnGoal,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayDetails {
    pub event_owner_team_id: Option<u32>,
    pub x_coord: Option<f64>,
    pub y_coord: Option<f64>,
    pub scoring_player_id: Option<u64>,
    #[serde(rename = "assist1PlayerId")]
    pub assist1_player_id: Option<u64>,
    #[serde(rename = "assist2PlayerId")]
    pub assist2_player_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSpot {
    pub team_id: u32,
    pub player_id: u64,
    pub first_name: LocalizedName,
    pub last_name: LocalizedName,
    pub sweater_number: Option<u32>,
}

impl RosterSpot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.default, self.last_name.default)
    }
}

/// Per-game roster, fetched once and read-only for the game's duration.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    spots: Vec<RosterSpot>,
}

impl Roster {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            spots: snapshot.roster_spots.clone(),
        }
    }

    /// Resolve a player id. An id the roster doesn't know yields `None`, which
    /// callers treat as "omit from the notification", never as an error.
    pub fn player(&self, id: u64) -> Option<&RosterSpot> {
        self.spots.iter().find(|spot| spot.player_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
