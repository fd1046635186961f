//! Per-conversation state: the buffer store the router mutates and the UI
//! reads.
//!
//! A buffer is one conversation context: the server log, a channel, or a
//! private query. Buffers are created on first reference and never destroyed
//! by the engine; dropping one (e.g. after PART) is the UI's decision.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::casemap::irc_to_lower;

/// Name of the well-known server-context buffer. Exists for the life of a
/// session.
pub const SERVER_BUFFER: &str = "<server>";

/// Sender label used for server diagnostics and engine notices.
pub const NOTICE_LABEL: &str = "<!>";

/// One line of a buffer's message log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Local receive time, generated when the entry is appended.
    pub timestamp: DateTime<Local>,
    /// Sender label (nickname, server name, or [`NOTICE_LABEL`]).
    pub from: String,
    /// Message text.
    pub text: String,
}

/// A named conversation context.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    /// Ordered message log.
    log: Vec<LogEntry>,
    /// Participant nicknames, keyed by casemapped form, valued by the
    /// display form last seen.
    participants: HashMap<String, String>,
    /// Topic text; empty when unset or cleared.
    topic: String,
}

impl Buffer {
    /// The ordered message log.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Current topic text.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Display forms of the participant nicknames, in no particular order.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.participants.values().map(String::as_str)
    }

    /// Number of participants.
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Case-insensitive participant membership test.
    pub fn has_participant(&self, nick: &str) -> bool {
        self.participants.contains_key(&irc_to_lower(nick))
    }
}

/// Mapping from buffer name to [`Buffer`], keyed case-sensitively on the
/// literal name used at creation time.
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: HashMap<String, Buffer>,
}

impl BufferStore {
    /// Create a store holding the well-known server buffer.
    pub fn new() -> BufferStore {
        let mut store = BufferStore {
            buffers: HashMap::new(),
        };
        store.ensure(SERVER_BUFFER);
        store
    }

    /// Create an empty buffer if absent. Idempotent.
    pub fn ensure(&mut self, name: &str) -> &mut Buffer {
        self.buffers.entry(name.to_string()).or_default()
    }

    /// Look up a buffer by its literal name.
    pub fn get(&self, name: &str) -> Option<&Buffer> {
        self.buffers.get(name)
    }

    /// Names of all buffers, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    /// Append a log entry with a freshly generated timestamp, creating the
    /// buffer on first reference.
    pub fn append(&mut self, name: &str, from: &str, text: &str) {
        self.ensure(name).log.push(LogEntry {
            timestamp: Local::now(),
            from: from.to_string(),
            text: text.to_string(),
        });
    }

    /// Replace a buffer's participant set, case-insensitively de-duplicated.
    pub fn set_participants<'a, I>(&mut self, name: &str, nicks: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let buffer = self.ensure(name);
        buffer.participants.clear();
        for nick in nicks {
            buffer
                .participants
                .insert(irc_to_lower(nick), nick.to_string());
        }
    }

    /// Set a buffer's topic text. An empty string clears it.
    pub fn set_topic(&mut self, name: &str, text: &str) {
        self.ensure(name).topic = text.to_string();
    }

    /// Remove a nickname from every buffer's participant set.
    pub fn remove_participant(&mut self, nick: &str) {
        let key = irc_to_lower(nick);
        for buffer in self.buffers.values_mut() {
            buffer.participants.remove(&key);
        }
    }

    /// Rename a participant across every buffer it appears in.
    pub fn rename_participant(&mut self, old: &str, new: &str) {
        let old_key = irc_to_lower(old);
        let new_key = irc_to_lower(new);
        for buffer in self.buffers.values_mut() {
            if buffer.participants.remove(&old_key).is_some() {
                buffer.participants.insert(new_key.clone(), new.to_string());
            }
        }
    }
}
