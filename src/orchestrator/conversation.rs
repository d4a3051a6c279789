use std::sync::RwLock;

use chrono::Utc;
use uuid::Uuid;

use crate::models::internal::{ConversationTurn, NewTurn};

/// Append-only transcript of (question, answer) turns.
///
/// `append` is the only mutator; turns are never edited or removed once
/// committed. Readers take order-preserving snapshots and never block the
/// appender for longer than a clone.
#[derive(Default)]
pub struct ConversationLog {
    turns: RwLock<Vec<ConversationTurn>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit one turn to the transcript and return it with its assigned
    /// id and timestamp.
    pub fn append(&self, turn: NewTurn) -> ConversationTurn {
        let committed = ConversationTurn {
            id: Uuid::new_v4(),
            question: turn.question,
            answer: turn.answer,
            timestamp: Utc::now().naive_utc(),
        };
        self.turns
            .write()
            .expect("conversation log lock poisoned")
            .push(committed.clone());
        committed
    }

    /// Order-preserving copy of all turns committed so far
    pub fn snapshot(&self) -> Vec<ConversationTurn> {
        self.turns
            .read()
            .expect("conversation log lock poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.turns
            .read()
            .expect("conversation log lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
