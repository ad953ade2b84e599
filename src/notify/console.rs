//! Stdout announcements, phrased the way a rink PA would read them.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::monitor::events::{GameEvent, Score};
use crate::notify::EventSink;

/// Names and abbreviations for the two teams in today's game.
#[derive(Debug, Clone)]
pub struct Matchup {
    pub monitored_name: String,
    pub monitored_abbrev: String,
    pub opponent_name: String,
    pub opponent_abbrev: String,
}

impl Matchup {
    fn score_line(&self, score: Score) -> String {
        format!(
            "The score of the game is now {}: {} {}: {}",
            self.monitored_abbrev, score.monitored, self.opponent_abbrev, score.opponent
        )
    }
}

/// Printed once when a game is found for the day.
pub fn announce_matchup(matchup: &Matchup, start_local: DateTime<Local>) {
    println!(
        "The game today is between the {} and the {}. It starts at {} local time",
        matchup.monitored_name,
        matchup.opponent_name,
        start_local.format("%H:%M:%S")
    );
}

pub struct ConsoleSink {
    matchup: Matchup,
}

impl ConsoleSink {
    pub fn new(matchup: Matchup) -> Self {
        Self { matchup }
    }

    fn goal_line(&self, details_line: &str) -> String {
        if details_line.is_empty() {
            format!("{} score!", self.matchup.monitored_name)
        } else {
            format!("{} score! {}", self.matchup.monitored_name, details_line)
        }
    }
}

#[async_trait]
impl EventSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn deliver(&self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::MonitoredGoal { score, details } => {
                let line = details
                    .as_ref()
                    .map(|d| d.announcement())
                    .unwrap_or_default();
                println!("{}", self.goal_line(&line));
                println!("{}", self.matchup.score_line(*score));
            }
            GameEvent::OpponentGoal { score } => {
                println!(
                    "{} scored. {}",
                    self.matchup.opponent_name,
                    self.matchup.score_line(*score)
                );
            }
            GameEvent::GameOver { score } => {
                println!(
                    "The game is over. The final score was {}: {} {}: {}",
                    self.matchup.monitored_abbrev,
                    score.monitored,
                    self.matchup.opponent_abbrev,
                    score.opponent
                );
            }
            GameEvent::Shot { .. } => {}
        }
        Ok(())
    }
}
