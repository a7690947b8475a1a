//! Field tracking across chat turns

use lead_qualifier_config::FieldMemory;
use lead_qualifier_core::{ChatMessage, LeadRecord};
use lead_qualifier_text_processing::EntityExtractor;

/// Builds the lead a turn is judged on
///
/// With [`FieldMemory::Reset`] only the latest user message counts, so a user
/// can correct an earlier answer simply by restating it. With
/// [`FieldMemory::Accumulate`] every user message is extracted in order and
/// merged, later values overriding earlier ones. Assistant and system messages
/// are never extracted: they quote example codes like "CA or TX".
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogueStateTracker {
    extractor: EntityExtractor,
    memory: FieldMemory,
}

impl DialogueStateTracker {
    pub fn new(memory: FieldMemory) -> Self {
        Self {
            extractor: EntityExtractor::new(),
            memory,
        }
    }

    pub fn memory(&self) -> FieldMemory {
        self.memory
    }

    /// Lead record for the current turn of `history`
    pub fn track(&self, history: &[ChatMessage]) -> LeadRecord {
        match self.memory {
            FieldMemory::Reset => history
                .iter()
                .rev()
                .find(|m| m.is_user())
                .map(|m| self.extractor.extract(&m.content))
                .unwrap_or_default(),
            FieldMemory::Accumulate => {
                history
                    .iter()
                    .filter(|m| m.is_user())
                    .fold(LeadRecord::new(), |mut acc, m| {
                        acc.merge(&self.extractor.extract(&m.content));
                        acc
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_qualifier_core::Coverage;

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("I live in WA"),
            ChatMessage::assistant("Which U.S. state are you in? (2–letter code like CA or TX)"),
            ChatMessage::user("I need renters insurance"),
        ]
    }

    #[test]
    fn test_reset_uses_latest_user_message() {
        let tracker = DialogueStateTracker::new(FieldMemory::Reset);
        let record = tracker.track(&history());

        assert_eq!(record.coverage, Some(Coverage::Renters));
        assert!(record.state.is_none());
    }

    #[test]
    fn test_accumulate_merges_user_messages() {
        let tracker = DialogueStateTracker::new(FieldMemory::Accumulate);
        let record = tracker.track(&history());

        assert_eq!(record.coverage, Some(Coverage::Renters));
        assert_eq!(record.state.map(|s| s.as_str()), Some("WA"));
    }

    #[test]
    fn test_accumulate_later_value_wins() {
        let tracker = DialogueStateTracker::new(FieldMemory::Accumulate);
        let record = tracker.track(&[
            ChatMessage::user("I'm in TX"),
            ChatMessage::user("sorry, actually I'm in NM"),
        ]);

        assert_eq!(record.state.map(|s| s.as_str()), Some("NM"));
    }

    #[test]
    fn test_assistant_messages_ignored() {
        for memory in [FieldMemory::Reset, FieldMemory::Accumulate] {
            let tracker = DialogueStateTracker::new(memory);
            let record = tracker.track(&[
                ChatMessage::system("You are an intake assistant"),
                ChatMessage::assistant("Code like CA or TX please"),
            ]);
            assert!(record.is_empty(), "{:?}", memory);
        }
    }

    #[test]
    fn test_empty_history() {
        let tracker = DialogueStateTracker::default();
        assert!(tracker.track(&[]).is_empty());
    }
}
