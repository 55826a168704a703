//! Static question/answer table backing lookup mode.

use std::collections::HashSet;

use log::debug;

use crate::error::{BotError, Result};

/// Answer given when a selected label has no entry in the table.
pub const FALLBACK_ANSWER: &str = "Sorry, I don't have an answer for that question yet.";

/// Discord select menus hold at most 25 options.
pub const MAX_ENTRIES: usize = 25;

/// Select menu option labels and values are limited to 100 characters.
pub const MAX_LABEL_LEN: usize = 100;

/// Ordered mapping from question label to answer text.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct AnswerTable {
    entries: Vec<(String, String)>,
}

impl AnswerTable {
    /// Build a table, rejecting empty labels, empty answers and duplicate labels.
    pub fn new<I, Q, A>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Q, A)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(q, a)| (q.into(), a.into()))
            .collect();

        if entries.is_empty() {
            return Err(BotError::Config("Answer table is empty".to_string()));
        }
        if entries.len() > MAX_ENTRIES {
            return Err(BotError::Config(format!(
                "Answer table has {} entries, at most {MAX_ENTRIES} are supported",
                entries.len()
            )));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for (label, answer) in &entries {
            if label.trim().is_empty() {
                return Err(BotError::Config("Answer table has an empty label".to_string()));
            }
            if label.chars().count() > MAX_LABEL_LEN {
                return Err(BotError::Config(format!(
                    "Answer table label '{label}' is longer than {MAX_LABEL_LEN} characters"
                )));
            }
            if answer.trim().is_empty() {
                return Err(BotError::Config(format!(
                    "Answer for '{label}' is empty"
                )));
            }
            if !seen.insert(label.clone()) {
                return Err(BotError::Config(format!(
                    "Duplicate answer table label '{label}'"
                )));
            }
        }

        debug!("Answer table built with {} entries", entries.len());
        Ok(Self { entries })
    }

    /// The table shipped with the bot.
    pub fn builtin() -> Result<Self> {
        Self::new([
            (
                "What is Commune AI?",
                "Commune AI is a decentralized network where developers publish, connect and \
                 monetize AI modules. Every module exposes its functions over a common interface \
                 so other modules and users can call them.",
            ),
            (
                "How do I get started?",
                "Install the Commune client, create a key, and register your first module. The \
                 documentation walks through each step and includes a minimal example module.",
            ),
            (
                "What is a module?",
                "A module is a self-contained service with a name, a key and a set of callable \
                 functions. Modules can be served locally or registered on the network.",
            ),
            (
                "How are contributors rewarded?",
                "Modules earn rewards based on usage and on votes from network validators, paid \
                 out in the network's native token.",
            ),
            (
                "Where can I get help?",
                "Ask in this server's support channel or open an issue on the project's GitHub \
                 repository.",
            ),
        ])
    }

    /// Labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Answer for a selected label, or [`FALLBACK_ANSWER`] when absent.
    #[must_use]
    pub fn resolve_by_selection(&self, label: &str) -> &str {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == label)
            .map_or(FALLBACK_ANSWER, |(_, answer)| answer.as_str())
    }
}
