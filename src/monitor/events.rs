//! Classified events produced by one poll/diff cycle.

use serde::Serialize;

/// Running score from the monitored team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub monitored: u32,
    pub opponent: u32,
}

/// A player credited on a goal, already resolved through the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCredit {
    pub name: String,
    pub sweater: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDetails {
    /// `None` when the scoring player id had no roster entry.
    pub scorer: Option<PlayerCredit>,
    pub assists: Vec<PlayerCredit>,
    pub x: f64,
    pub y: f64,
    pub sort_order: u64,
}

impl GoalDetails {
    /// "Scored by number 72, Tage Thompson. Assists to number 89, Alex Tuch."
    /// Unresolved players are omitted rather than named.
    pub fn announcement(&self) -> String {
        let mut line = String::new();

        if let Some(scorer) = &self.scorer {
            match scorer.sweater {
                Some(number) => {
                    line.push_str(&format!("Scored by number {number}, {}.", scorer.name))
                }
                None => line.push_str(&format!("Scored by {}.", scorer.name)),
            }
        }

        match self.assists.as_slice() {
            [] => {}
            [first] => {
                line.push_str(&format!(" Assists to {}.", credit(first)));
            }
            [first, second, ..] => {
                line.push_str(&format!(
                    " Assists to {}, and {}.",
                    credit(first),
                    credit(second)
                ));
            }
        }

        line.trim().to_string()
    }
}

fn credit(player: &PlayerCredit) -> String {
    match player.sweater {
        Some(number) => format!("number {number}, {}", player.name),
        None => player.name.clone(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The monitored team's score increased.
    MonitoredGoal {
        score: Score,
        details: Option<GoalDetails>,
    },
    /// The opponent's score increased.
    OpponentGoal { score: Score },
    /// A newly seen shot on goal, attributed to its owning team.
    Shot {
        team_id: u32,
        x: f64,
        y: f64,
        sort_order: u64,
    },
    /// The game reached a terminal state.
    GameOver { score: Score },
}
