//! Goal songs.
//!
//! The song book is a JSON object mapping player display name to a clip
//! path, with a required `"default"` entry for scorers without their own
//! song. Playback runs on a blocking task; the dispatcher is held until the
//! clip finishes or the configured hold window elapses, which is what makes
//! a goal notification "done".

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::monitor::events::GameEvent;
use crate::notify::EventSink;

#[derive(Debug, Clone)]
pub struct SongBook {
    clips: HashMap<String, PathBuf>,
    default_clip: PathBuf,
}

impl SongBook {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read song book: {}", path.display()))?;
        let raw: HashMap<String, String> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse song book: {}", path.display()))?;
        Self::from_map(raw)
    }

    pub fn from_map(raw: HashMap<String, String>) -> Result<Self> {
        let mut clips: HashMap<String, PathBuf> =
            raw.into_iter().map(|(k, v)| (k, PathBuf::from(v))).collect();
        let default_clip = clips
            .remove("default")
            .context("song book must contain a \"default\" entry")?;
        Ok(Self {
            clips,
            default_clip,
        })
    }

    /// The clip for a scorer, falling back to the default song.
    pub fn clip_for(&self, scorer: Option<&str>) -> &Path {
        scorer
            .and_then(|name| self.clips.get(name))
            .unwrap_or(&self.default_clip)
            .as_path()
    }
}

#[derive(Clone)]
pub struct AudioPlayer {
    enabled: bool,
    hold: Duration,
}

impl AudioPlayer {
    pub fn new(enabled: bool, hold: Duration) -> Self {
        Self { enabled, hold }
    }

    /// Play a clip to completion, bounded by the hold window. A missing
    /// device or clip surfaces as an error for the caller to log.
    pub async fn play(&self, clip: PathBuf) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        info!(clip = %clip.display(), "Playing clip");
        let hold = self.hold;
        tokio::task::spawn_blocking(move || play_blocking(&clip, hold))
            .await
            .context("audio playback task panicked")?
    }
}

fn play_blocking(clip: &Path, hold: Duration) -> Result<()> {
    let (_stream, handle) =
        rodio::OutputStream::try_default().context("no audio output device")?;
    let sink = rodio::Sink::try_new(&handle).context("failed to open audio sink")?;

    let file = File::open(clip)
        .with_context(|| format!("missing audio clip: {}", clip.display()))?;
    let source = rodio::Decoder::new(BufReader::new(file))
        .with_context(|| format!("undecodable audio clip: {}", clip.display()))?;
    sink.append(source);

    let started = Instant::now();
    while !sink.empty() && started.elapsed() < hold {
        std::thread::sleep(Duration::from_millis(200));
    }
    sink.stop();

    Ok(())
}

pub struct AudioSink {
    player: AudioPlayer,
    songs: SongBook,
    opponent_goal_clip: Option<PathBuf>,
}

impl AudioSink {
    pub fn new(player: AudioPlayer, songs: SongBook, opponent_goal_clip: Option<PathBuf>) -> Self {
        Self {
            player,
            songs,
            opponent_goal_clip,
        }
    }
}

#[async_trait]
impl EventSink for AudioSink {
    fn name(&self) -> &str {
        "audio"
    }

    async fn deliver(&self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::MonitoredGoal { details, .. } => {
                let scorer = details
                    .as_ref()
                    .and_then(|d| d.scorer.as_ref())
                    .map(|p| p.name.as_str());
                let clip = self.songs.clip_for(scorer).to_path_buf();
                self.player.play(clip).await
            }
            GameEvent::OpponentGoal { .. } => match &self.opponent_goal_clip {
                Some(clip) => self.player.play(clip.clone()).await,
                None => Ok(()),
            },
            GameEvent::Shot { .. } | GameEvent::GameOver { .. } => Ok(()),
        }
    }
}
