//! goalhorn — watches one NHL team's live games and fires notifications
//! (goal songs, announcements, optional scoreboard UI) off the public NHL
//! web API.

pub mod config;
pub mod error;
pub mod monitor;
pub mod monitoring;
pub mod nhl;
pub mod notify;
pub mod ui;
