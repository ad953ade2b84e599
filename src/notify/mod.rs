//! Notification fan-out.
//!
//! Every classified event is offered to each sink; a failing sink is logged
//! and skipped so a dead speaker or webhook never stalls the monitor.

pub mod audio;
pub mod console;
pub mod webhook;

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::monitor::events::GameEvent;

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Human-readable name of this sink, for logs.
    fn name(&self) -> &str;

    async fn deliver(&self, event: &GameEvent) -> Result<()>;
}

pub struct Dispatcher {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Box<dyn EventSink>>) -> Self {
        Self { sinks }
    }

    pub async fn dispatch(&self, event: &GameEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(event).await {
                warn!(sink = sink.name(), error = %e, "Notification sink failed");
            }
        }
    }
}
