//! Chat-webhook announcements (Discord-compatible payload).
//!
//! Disabled unless a webhook URL is configured via the environment; failures
//! are reported to the dispatcher, which logs and moves on.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::monitor::events::{GameEvent, Score};
use crate::notify::console::Matchup;
use crate::notify::EventSink;

#[derive(Debug, Serialize)]
struct WebhookMessage {
    content: String,
    username: String,
}

pub struct WebhookSink {
    url: Option<String>,
    http: reqwest::Client,
    matchup: Matchup,
}

impl WebhookSink {
    pub fn new(url: Option<String>, matchup: Matchup) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
            matchup,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    fn score_suffix(&self, score: Score) -> String {
        format!(
            "{} {} — {} {}",
            self.matchup.monitored_abbrev,
            score.monitored,
            self.matchup.opponent_abbrev,
            score.opponent
        )
    }

    async fn send(&self, content: String) -> Result<()> {
        let Some(url) = &self.url else {
            return Ok(());
        };

        let payload = WebhookMessage {
            content,
            username: "goalhorn".to_string(),
        };

        let response = self.http.post(url).json(&payload).send().await?;
        if !response.status().is_success() {
            warn!(
                status = %response.status(),
                "Webhook returned non-success status"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, event: &GameEvent) -> Result<()> {
        match event {
            GameEvent::MonitoredGoal { score, details } => {
                let mut content = format!(
                    "**{} score!** {}",
                    self.matchup.monitored_name,
                    self.score_suffix(*score)
                );
                if let Some(line) = details.as_ref().map(|d| d.announcement()) {
                    if !line.is_empty() {
                        content.push('\n');
                        content.push_str(&line);
                    }
                }
                self.send(content).await
            }
            GameEvent::OpponentGoal { score } => {
                self.send(format!(
                    "{} scored. {}",
                    self.matchup.opponent_name,
                    self.score_suffix(*score)
                ))
                .await
            }
            GameEvent::GameOver { score } => {
                self.send(format!("**Final**: {}", self.score_suffix(*score)))
                    .await
            }
            GameEvent::Shot { .. } => Ok(()),
        }
    }
}
