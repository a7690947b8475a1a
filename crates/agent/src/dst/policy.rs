//! Next-question policy
//!
//! A strict checklist over the required fields in priority order. Only
//! presence matters; field values never change which question is asked.

use lead_qualifier_core::{LeadField, LeadRecord};

/// Clarifying question for one required field
pub fn question_for(field: LeadField) -> &'static str {
    match field {
        LeadField::Coverage => {
            "What kind of insurance do you need (life, auto, home, renters, health, or business)?"
        }
        LeadField::State => "Which U.S. state are you in? (2–letter code like CA or TX)",
        LeadField::Age => "What is your age?",
        LeadField::Budget => "What is your monthly budget in dollars?",
        LeadField::Urgency => "On a scale of 1–5, how urgent is your request?",
    }
}

/// Question for the first missing required field, `None` once complete
pub fn next_question(record: &LeadRecord) -> Option<&'static str> {
    record.missing_required().first().map(|field| question_for(*field))
}
