//! Day-to-day orchestration: find today's game, wait for puck drop, poll
//! until the final horn, sleep until tomorrow.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::{AppConfig, Secrets};
use crate::error::FeedError;
use crate::monitor::diff::{diff, ScoreBoard};
use crate::monitor::events::GameEvent;
use crate::monitor::schedule::{self, GameRef};
use crate::nhl::model::Roster;
use crate::nhl::NhlClient;
use crate::notify::audio::{AudioPlayer, AudioSink, SongBook};
use crate::notify::console::{announce_matchup, ConsoleSink, Matchup};
use crate::notify::webhook::WebhookSink;
use crate::notify::{Dispatcher, EventSink};
use crate::ui::{SharedGameView, ViewSink};

/// Per-game polling state. Carries the score board of the previously
/// compared snapshot; the baseline is fetched lazily on the first call.
pub struct GameMonitor {
    game: GameRef,
    roster: Roster,
    board: Option<ScoreBoard>,
    poll_interval: Duration,
}

impl GameMonitor {
    pub fn new(game: GameRef, roster: Roster, poll_interval: Duration) -> Self {
        Self {
            game,
            roster,
            board: None,
            poll_interval,
        }
    }

    /// One poll cycle: courtesy wait, fetch, diff against the carried board.
    ///
    /// On an error the board is left untouched, so events that land during a
    /// failed cycle are picked up by the next successful one.
    pub async fn poll_once(&mut self, client: &NhlClient) -> Result<Vec<GameEvent>, FeedError> {
        let board = match self.board {
            Some(board) => board,
            None => {
                let baseline = client.play_by_play(self.game.game_id).await?;
                let board = ScoreBoard::from_snapshot(&baseline, self.game.monitored_side);
                self.board = Some(board);
                board
            }
        };

        tokio::time::sleep(self.poll_interval).await;

        let next = client.play_by_play(self.game.game_id).await?;
        let events = diff(&board, &next, self.game.monitored_side, &self.roster);
        self.board = Some(ScoreBoard::from_snapshot(&next, self.game.monitored_side));

        Ok(events)
    }
}

pub struct TeamWatcher {
    config: AppConfig,
    client: NhlClient,
    view: SharedGameView,
    songs: Option<SongBook>,
    player: AudioPlayer,
    webhook_url: Option<String>,
}

impl TeamWatcher {
    pub fn new(
        config: AppConfig,
        secrets: Secrets,
        client: NhlClient,
        view: SharedGameView,
    ) -> Result<Self> {
        let songs = if config.audio.enabled {
            let path = PathBuf::from(&config.audio.song_book_path);
            Some(SongBook::load(&path).context("Failed to load song book")?)
        } else {
            None
        };
        let player = AudioPlayer::new(config.audio.enabled, config.audio.goal_hold());

        Ok(Self {
            config,
            client,
            view,
            songs,
            player,
            webhook_url: secrets.webhook_url,
        })
    }

    /// Run forever: one `watch_day` per calendar day.
    pub async fn run(&self) -> Result<()> {
        loop {
            let today = Local::now().date_naive();
            if let Err(e) = self.watch_day(today).await {
                warn!(error = %e, date = %today, "Day watch failed");
            }

            let wake = schedule::rollover_instant(
                Local::now().naive_local(),
                self.config.monitor.rollover_hour,
            );
            info!(wake = %wake, "Waiting until tomorrow");
            sleep_until_local(wake).await;
        }
    }

    /// Watch a single date and return, used by `run` and by the `--date`
    /// one-shot mode.
    pub async fn watch_day(&self, date: NaiveDate) -> Result<()> {
        let week = self
            .client
            .schedule(date)
            .await
            .context("Failed to fetch schedule")?;

        let Some(game) = schedule::find_game(&week, date, self.config.monitor.team_id) else {
            info!(date = %date, team_id = self.config.monitor.team_id, "No game today");
            return Ok(());
        };

        info!(
            game_id = game.game_id,
            side = ?game.monitored_side,
            start = %game.start_time_utc,
            "Game found"
        );

        // One pre-game fetch for opponent identity and the roster.
        let pregame = self
            .client
            .play_by_play(game.game_id)
            .await
            .context("Failed to fetch pre-game snapshot")?;
        let roster = Roster::from_snapshot(&pregame);
        if roster.is_empty() {
            warn!(game_id = game.game_id, "Roster is empty — goal scorers will be anonymous");
        }

        let monitored = pregame.team(game.monitored_side);
        let opponent = pregame.team(game.monitored_side.opponent());
        let matchup = Matchup {
            monitored_name: monitored.display_name().to_string(),
            monitored_abbrev: monitored.abbrev.clone(),
            opponent_name: opponent.display_name().to_string(),
            opponent_abbrev: opponent.abbrev.clone(),
        };

        announce_matchup(&matchup, game.start_time_utc.with_timezone(&Local));
        self.view.seed(&pregame, game.monitored_side, &roster).await;

        if !pregame.game_state.is_terminal() {
            // The warm-up clip belongs to the countdown; joining a game
            // already underway goes straight to polling.
            let pre_start = Utc::now() < game.start_time_utc;
            schedule::wait_for_puck_drop(game.start_time_utc, self.config.monitor.start_offset())
                .await;
            if pre_start {
                if let Some(clip) = &self.config.audio.warmup_clip {
                    if let Err(e) = self.player.play(PathBuf::from(clip)).await {
                        warn!(error = %e, "Warm-up clip failed");
                    }
                }
            }
        }

        let dispatcher = self.build_dispatcher(&matchup);
        let mut monitor = GameMonitor::new(game, roster, self.config.monitor.poll_interval());

        self.follow_game(&mut monitor, &dispatcher).await;
        Ok(())
    }

    async fn follow_game(&self, monitor: &mut GameMonitor, dispatcher: &Dispatcher) {
        loop {
            match monitor.poll_once(&self.client).await {
                Ok(events) => {
                    let game_over = events
                        .iter()
                        .any(|e| matches!(e, GameEvent::GameOver { .. }));

                    for event in &events {
                        dispatcher.dispatch(event).await;
                    }

                    if game_over {
                        info!("Game over");
                        return;
                    }
                }
                Err(e @ FeedError::Malformed { .. }) => {
                    warn!(error = %e, "Malformed live-game response — skipping this poll");
                }
                Err(e) => {
                    warn!(error = %e, "Live-game fetch failed after retries — skipping this poll");
                }
            }
        }
    }

    fn build_dispatcher(&self, matchup: &Matchup) -> Dispatcher {
        let mut sinks: Vec<Box<dyn EventSink>> = Vec::new();

        sinks.push(Box::new(ConsoleSink::new(matchup.clone())));

        if let Some(songs) = &self.songs {
            let opponent_clip = self
                .config
                .audio
                .opponent_goal_clip
                .as_ref()
                .map(PathBuf::from);
            sinks.push(Box::new(AudioSink::new(
                self.player.clone(),
                songs.clone(),
                opponent_clip,
            )));
        }

        let webhook = WebhookSink::new(self.webhook_url.clone(), matchup.clone());
        if webhook.is_enabled() {
            sinks.push(Box::new(webhook));
        }

        sinks.push(Box::new(ViewSink::new(
            self.view.clone(),
            self.config.monitor.team_id,
        )));

        Dispatcher::new(sinks)
    }
}

async fn sleep_until_local(wake: chrono::NaiveDateTime) {
    let now = Local::now().naive_local();
    let remaining = (wake - now).to_std().unwrap_or_default();
    tokio::time::sleep(remaining).await;
}
