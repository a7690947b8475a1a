//! Lead Scoring
//!
//! Additive completeness/quality score. Each rule is worth one point:
//!
//! | Rule | Points |
//! |---|---|
//! | coverage, state, age, budget, urgency present | 1 each |
//! | budget >= $100/month | 1 |
//! | urgency >= 4 | 1 |
//!
//! The result is capped at [`MAX_SCORE`]; the rules above top out at 7.

use lead_qualifier_core::{LeadField, LeadRecord, ScoredLead};

/// Absolute upper bound of a lead score
pub const MAX_SCORE: u8 = 10;

/// Monthly budget that earns the budget bonus point
pub const HIGH_BUDGET_DOLLARS: f64 = 100.0;

/// Urgency level that earns the urgency bonus point
pub const HIGH_URGENCY: u32 = 4;

/// Score a lead record
pub fn score(record: &LeadRecord) -> u8 {
    let presence = LeadField::REQUIRED
        .iter()
        .filter(|field| record.has(**field))
        .count() as u8;

    let high_budget = record
        .budget
        .is_some_and(|b| b.dollars() >= HIGH_BUDGET_DOLLARS);
    let high_urgency = record.urgency.is_some_and(|u| u.value() >= HIGH_URGENCY);

    let total = presence + u8::from(high_budget) + u8::from(high_urgency);
    total.min(MAX_SCORE)
}

/// Scoring stage of the qualifier
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadScorer;

impl LeadScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, record: &LeadRecord) -> u8 {
        score(record)
    }

    /// Attach the score to a record
    pub fn scored(&self, record: LeadRecord) -> ScoredLead {
        let score = self.score(&record);
        ScoredLead::new(record, score)
    }
}
