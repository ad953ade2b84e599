//! Snapshot diffing — the core of the monitor.
//!
//! `diff` is pure and synchronous: given the score board carried from the
//! previously compared snapshot and a freshly fetched one, it emits the
//! classified events in between. Goal attribution reads the same snapshot's
//! play list, so the score and the plays are mutually consistent by
//! construction and no re-fetch heuristic is needed.

use tracing::warn;

use crate::monitor::events::{GameEvent, GoalDetails, PlayerCredit, Score};
use crate::nhl::model::{GameSnapshot, PlayKind, Roster, TeamSide};

/// What the monitor remembers between polls: both scores and how many plays
/// it has already inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBoard {
    pub monitored: u32,
    pub opponent: u32,
    pub plays_seen: usize,
}

impl ScoreBoard {
    pub fn from_snapshot(snapshot: &GameSnapshot, monitored_side: TeamSide) -> Self {
        Self {
            monitored: snapshot.team(monitored_side).score.unwrap_or(0),
            opponent: snapshot.team(monitored_side.opponent()).score.unwrap_or(0),
            plays_seen: snapshot.plays.len(),
        }
    }
}

/// Compare the carried score board against a new snapshot.
///
/// Emits, in order: monitored goals, opponent goals, newly seen shots, and a
/// terminal event if the game is over. An unchanged snapshot yields nothing.
pub fn diff(
    prev: &ScoreBoard,
    next: &GameSnapshot,
    monitored_side: TeamSide,
    roster: &Roster,
) -> Vec<GameEvent> {
    let monitored_team = next.team(monitored_side);
    let score = Score {
        monitored: monitored_team.score.unwrap_or(0),
        opponent: next.team(monitored_side.opponent()).score.unwrap_or(0),
    };

    let mut events = Vec::new();

    if score.monitored > prev.monitored {
        let new_goals = score.monitored - prev.monitored;
        let details = latest_goal_details(next, monitored_team.id, roster);
        if details.is_none() {
            warn!(
                game_id = next.id,
                team_id = monitored_team.id,
                "Score increased but no goal play found in snapshot"
            );
        }
        for nth in 1..=new_goals {
            // Scorer details belong to the newest goal play; earlier
            // increments inside one poll window go out without them.
            let attach = if nth == new_goals {
                details.clone()
            } else {
                None
            };
            events.push(GameEvent::MonitoredGoal {
                score,
                details: attach,
            });
        }
    }

    if score.opponent > prev.opponent {
        for _ in 0..(score.opponent - prev.opponent) {
            events.push(GameEvent::OpponentGoal { score });
        }
    }

    let from = prev.plays_seen.min(next.plays.len());
    for play in &next.plays[from..] {
        if play.kind != PlayKind::ShotOnGoal {
            continue;
        }
        let Some(details) = &play.details else {
            continue;
        };
        if let (Some(team_id), Some(x), Some(y)) =
            (details.event_owner_team_id, details.x_coord, details.y_coord)
        {
            events.push(GameEvent::Shot {
                team_id,
                x,
                y,
                sort_order: play.sort_order,
            });
        }
    }

    if next.game_state.is_terminal() {
        events.push(GameEvent::GameOver { score });
    }

    events
}

/// Walk the play list backward for the scoring team's most recent goal play
/// and resolve its players through the roster.
fn latest_goal_details(
    snapshot: &GameSnapshot,
    team_id: u32,
    roster: &Roster,
) -> Option<GoalDetails> {
    let play = snapshot.plays.iter().rev().find(|play| {
        play.kind == PlayKind::Goal
            && play
                .details
                .as_ref()
                .and_then(|d| d.event_owner_team_id)
                .map(|owner| owner == team_id)
                .unwrap_or(false)
    })?;
    let details = play.details.as_ref()?;

    let assists = [details.assist1_player_id, details.assist2_player_id]
        .into_iter()
        .flatten()
        .filter_map(|id| resolve(roster, id))
        .collect();

    Some(GoalDetails {
        scorer: details.scoring_player_id.and_then(|id| resolve(roster, id)),
        assists,
        x: details.x_coord.unwrap_or(0.0),
        y: details.y_coord.unwrap_or(0.0),
        sort_order: play.sort_order,
    })
}

fn resolve(roster: &Roster, player_id: u64) -> Option<PlayerCredit> {
    roster.player(player_id).map(|spot| PlayerCredit {
        name: spot.full_name(),
        sweater: spot.sweater_number,
    })
}
