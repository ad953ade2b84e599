//! Daily game lookup, countdown wait, and the day-rollover clock.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::info;

use crate::nhl::model::{ScheduleWeek, TeamSide};

/// Identity of today's monitored game. Immutable once determined for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRef {
    pub game_id: u64,
    pub monitored_side: TeamSide,
    pub start_time_utc: DateTime<Utc>,
}

/// Scan a week of schedule data for the monitored team's game on `date`.
///
/// Returns the first match; `None` is the "no game today" sentinel callers
/// must check before proceeding. If the feed ever listed the team twice on
/// one date, the second entry would be ignored.
pub fn find_game(week: &ScheduleWeek, date: NaiveDate, team_id: u32) -> Option<GameRef> {
    let day = week.game_week.iter().find(|day| day.date == date)?;

    day.games.iter().find_map(|game| {
        let monitored_side = if game.away_team.id == team_id {
            TeamSide::Away
        } else if game.home_team.id == team_id {
            TeamSide::Home
        } else {
            return None;
        };
        Some(GameRef {
            game_id: game.id,
            monitored_side,
            start_time_utc: game.start_time_utc,
        })
    })
}

/// Block until `offset` before the scheduled start. Returns immediately if
/// that instant has already passed.
pub async fn wait_for_puck_drop(start_time_utc: DateTime<Utc>, offset: Duration) {
    let offset = chrono::Duration::from_std(offset).unwrap_or_else(|_| chrono::Duration::zero());
    let wake = start_time_utc - offset;
    let remaining = wake - Utc::now();

    match remaining.to_std() {
        Ok(delay) if !delay.is_zero() => {
            info!(
                wait_secs = delay.as_secs(),
                start = %start_time_utc,
                "Waiting for puck drop"
            );
            tokio::time::sleep(delay).await;
        }
        _ => {}
    }
}

/// The instant the daily loop wakes after a no-game day or a finished game:
/// the configured hour of the following day.
pub fn rollover_instant(after: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let next_day = after.date().succ_opt().unwrap_or(after.date());
    next_day
        .and_hms_opt(hour.min(23), 0, 0)
        .unwrap_or_else(|| NaiveDateTime::new(next_day, NaiveTime::MIN))
}
