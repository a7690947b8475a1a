//! Qualifier orchestration
//!
//! Composes extraction, the next-question policy and scoring into the two
//! things the transport layer asks for: a reply for a chat turn, and a scored
//! lead for CRM delivery. Nothing here fails or performs I/O, which is what
//! lets it serve as the fallback whenever the LLM is unavailable.

use std::fmt::Display;

use lead_qualifier_config::{AgentConfig, FieldMemory};
use lead_qualifier_core::{ChatMessage, LeadRecord, ScoredLead};
use lead_qualifier_text_processing::EntityExtractor;

use crate::dst::{next_question, DialogueStateTracker};
use crate::lead_scoring::LeadScorer;

/// Closing prompt of the completion summary
pub const SUBMIT_PROMPT: &str = "Want me to submit this to an agent and have someone contact you?";

/// Deterministic lead qualifier
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadQualifier {
    extractor: EntityExtractor,
    tracker: DialogueStateTracker,
    scorer: LeadScorer,
}

impl LeadQualifier {
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_memory(config.field_memory)
    }

    pub fn with_memory(memory: FieldMemory) -> Self {
        Self {
            extractor: EntityExtractor::new(),
            tracker: DialogueStateTracker::new(memory),
            scorer: LeadScorer::new(),
        }
    }

    pub fn field_memory(&self) -> FieldMemory {
        self.tracker.memory()
    }

    /// Reply for the current turn of a chat history
    ///
    /// Always produces a reply, including for an empty history.
    pub fn turn_reply(&self, history: &[ChatMessage]) -> String {
        let record = self.tracker.track(history);
        tracing::debug!(
            turns = history.len(),
            memory = ?self.tracker.memory(),
            captured = %record.summary(),
            "Computed local reply"
        );
        self.reply_for(&record)
    }

    /// Reply for a single utterance, ignoring any history
    pub fn local_reply(&self, utterance: &str) -> String {
        self.reply_for(&self.extractor.extract(utterance))
    }

    /// Clarifying question prefixed by a capture summary, or the completion
    /// summary once every required field is present
    pub fn reply_for(&self, record: &LeadRecord) -> String {
        match next_question(record) {
            Some(question) => clarifying_reply(record, question),
            None => completion_reply(record, self.scorer.score(record)),
        }
    }

    /// Scored lead for a transcript, complete or not
    pub fn structured_lead(&self, transcript: &str) -> ScoredLead {
        let lead = self.scorer.scored(self.extractor.extract(transcript));
        tracing::debug!(score = lead.score, captured = %lead.record.summary(), "Structured lead");
        lead
    }
}

fn clarifying_reply(record: &LeadRecord, question: &str) -> String {
    let summary = record.summary();
    if summary.is_empty() {
        question.to_string()
    } else {
        format!("Got it ({}). {}", summary, question)
    }
}

fn completion_reply(record: &LeadRecord, score: u8) -> String {
    let budget = record
        .budget
        .map(|b| b.whole_dollars())
        .unwrap_or_default();

    format!(
        "Thanks! Here’s what I captured:\n\
         - Coverage: {}\n\
         - State: {}\n\
         - Age: {}\n\
         - Budget: ${}/mo\n\
         - Urgency: {}/5\n\
         Lead score: {}/10.\n\
         {}",
        or_blank(record.coverage),
        or_blank(record.state),
        or_blank(record.age),
        budget,
        or_blank(record.urgency),
        score,
        SUBMIT_PROMPT
    )
}

fn or_blank<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
