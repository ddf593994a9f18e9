//! Bounded in-memory conversation transcript.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::Utc;
use sage_core::MessageSurface;
use serde::{Deserialize, Serialize};

/// Default number of retained lines before the oldest are evicted.
pub const DEFAULT_MAX_MESSAGES: usize = 30;

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptRole {
    User,
    Assistant,
}

/// A single line in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: TranscriptRole,
    pub content: String,
    /// Timestamp when the line was appended (ISO 8601 format).
    pub timestamp: String,
}

/// In-memory [`MessageSurface`] with oldest-first eviction.
///
/// Shared freely: appends go through a mutex, and [`TranscriptLog::entries`]
/// returns a snapshot so rendering never holds the lock.
#[derive(Debug)]
pub struct TranscriptLog {
    entries: Mutex<VecDeque<TranscriptEntry>>,
    max_messages: usize,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_MESSAGES)
    }

    pub fn with_capacity(max_messages: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_messages,
        }
    }

    /// Snapshot of the current lines, oldest first.
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranscriptLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSurface for TranscriptLog {
    fn append(&self, text: &str, from_assistant: bool) {
        let entry = TranscriptEntry {
            role: if from_assistant {
                TranscriptRole::Assistant
            } else {
                TranscriptRole::User
            },
            content: text.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };
        let mut entries = self.entries.lock().unwrap();
        entries.push_back(entry);
        while entries.len() > self.max_messages {
            entries.pop_front();
        }
    }

    fn clear_all(&self) {
        self.entries.lock().unwrap().clear();
    }
}
