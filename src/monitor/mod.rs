//! The polling/diffing core and its orchestration.

pub mod diff;
pub mod events;
pub mod schedule;
pub mod watcher;

pub use diff::ScoreBoard;
pub use events::{GameEvent, GoalDetails, PlayerCredit, Score};
pub use schedule::GameRef;
pub use watcher::{GameMonitor, TeamWatcher};
