//! Lead qualification agent
//!
//! Features:
//! - Dialogue policy: the next clarifying question for a partial lead
//! - Field tracking across user turns (reset or accumulate)
//! - Lead scoring
//! - Qualifier orchestration: turn replies and structured leads

pub mod dst;
pub mod lead_scoring;
pub mod qualifier;

pub use dst::{next_question, question_for, DialogueStateTracker};
pub use lead_scoring::{score, LeadScorer, MAX_SCORE};
pub use qualifier::LeadQualifier;

// Re-export the extractor so callers need only this crate
pub use lead_qualifier_text_processing::EntityExtractor;
