//! Dialogue State Tracking
//!
//! Two halves:
//! - [`policy`]: stateless next-question selection from a partial lead
//! - [`tracker`]: builds the lead a turn is judged on from the chat history,
//!   either from the latest user message alone or accumulated across turns

pub mod policy;
pub mod tracker;

pub use policy::{next_question, question_for};
pub use tracker::DialogueStateTracker;
