pub mod internal;

pub use internal::{AnswerCandidate, ConversationTurn, NewTurn, SelectedAnswer};
