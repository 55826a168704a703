//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use askbot::completion::CompletionClient;
use askbot::error::{BotError, Result};
use askbot::responder::{ReplyChannel, SelectionPrompt, SelectionReply};
use log::{LevelFilter, Log, Metadata, Record};
use poise::serenity_prelude as serenity;
use url::Url;
use wiremock::MockServer;

/// Start a mock completion server.
pub async fn mock_completion_server() -> MockServer {
    MockServer::start().await
}

/// Create a completion client configured for a mock server.
pub fn test_completion_client(mock_server: &MockServer) -> CompletionClient {
    CompletionClient::new(
        "test-api-key".to_string(),
        Url::parse(&mock_server.uri()).unwrap(),
    )
}

/// One reply operation observed by [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Defer,
    Reply { text: String, ephemeral: bool },
    FollowUp(String),
    Prompt { heading: String, options: Vec<String> },
    SelectionAnswer {
        label: String,
        text: String,
        ephemeral: bool,
    },
}

/// Reply channel that records every operation instead of talking to Discord.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    events: Arc<Mutex<Vec<Event>>>,
    choice: Option<String>,
    fail_follow_up: bool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the invoker picking `label` from the select menu.
    pub fn choosing(label: &str) -> Self {
        Self {
            choice: Some(label.to_string()),
            ..Self::default()
        }
    }

    /// Simulate an interaction that expired before the follow-up.
    pub fn expired() -> Self {
        Self {
            fail_follow_up: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl ReplyChannel for RecordingChannel {
    type Selection = RecordedSelection;

    async fn defer(&self) -> Result<()> {
        self.push(Event::Defer);
        Ok(())
    }

    async fn reply(&self, text: &str, ephemeral: bool) -> Result<()> {
        self.push(Event::Reply {
            text: text.to_string(),
            ephemeral,
        });
        Ok(())
    }

    async fn follow_up(&self, text: &str) -> Result<()> {
        if self.fail_follow_up {
            return Err(BotError::from(serenity::Error::Other("Unknown interaction")));
        }
        self.push(Event::FollowUp(text.to_string()));
        Ok(())
    }

    async fn prompt(&self, prompt: &SelectionPrompt) -> Result<Option<RecordedSelection>> {
        self.push(Event::Prompt {
            heading: prompt.heading().to_string(),
            options: prompt.options().to_vec(),
        });
        Ok(self.choice.clone().map(|label| RecordedSelection {
            label,
            events: Arc::clone(&self.events),
        }))
    }
}

pub struct RecordedSelection {
    label: String,
    events: Arc<Mutex<Vec<Event>>>,
}

impl SelectionReply for RecordedSelection {
    fn label(&self) -> &str {
        &self.label
    }

    async fn answer(self, text: &str, ephemeral: bool) -> Result<()> {
        self.events.lock().unwrap().push(Event::SelectionAnswer {
            label: self.label.clone(),
            text: text.to_string(),
            ephemeral,
        });
        Ok(())
    }
}

/// Logger that keeps every formatted record in memory.
pub struct CaptureLogger {
    records: Mutex<Vec<String>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

/// Install the capturing logger (once per test binary).
pub fn capture_logs() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

/// Captured log lines containing every one of `needles`.
pub fn logs_containing(needles: &[&str]) -> Vec<String> {
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|line| needles.iter().all(|needle| line.contains(needle)))
        .cloned()
        .collect()
}
