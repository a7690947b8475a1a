//! Lead attribute extraction
//!
//! Pulls coverage, budget, age, urgency, state, provider and customer name
//! out of a single free-text utterance using static patterns.
//!
//! ## Static Regex Patterns
//!
//! Patterns are compiled once on first use with `once_cell::sync::Lazy` and
//! are read-only afterwards, so one extractor can be shared freely across
//! request handlers.
//!
//! ## Matching rules
//!
//! Every field is extracted independently. Coverage, budget, age, urgency and
//! provider match against a lowercased copy of the input; state and name also
//! consult the original casing, since capitalization is what separates a state
//! code or a name from an ordinary word.

use once_cell::sync::Lazy;
use regex::Regex;

use lead_qualifier_core::{Age, Budget, Coverage, LeadRecord, StateCode, Urgency};

// =============================================================================
// STATIC TABLES AND PATTERNS
// =============================================================================

/// Coverage keywords in precedence order. The first one found anywhere in the
/// text wins, so earlier entries shadow later ones.
pub const COVERAGE_KEYWORDS: [(&str, Coverage); 7] = [
    ("life", Coverage::Life),
    ("auto", Coverage::Auto),
    ("car", Coverage::Auto),
    ("home", Coverage::Home),
    ("renters", Coverage::Renters),
    ("health", Coverage::Health),
    ("business", Coverage::Business),
];

// Budget: a number shortly after "budget", else a dollar amount
static BUDGET_AFTER_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"budget[^0-9]{0,12}\$?\s*([0-9]+(?:\.[0-9]{1,2})?)").unwrap());

static BUDGET_DOLLAR_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\s*([0-9]+(?:\.[0-9]{1,2})?)\s*(?:/mo|per month|monthly)?").unwrap()
});

// Age: a standalone two-digit number in 16..=99
static AGE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[6-9]|[2-9][0-9])\b").unwrap());

// Urgency: "urgency ... N", else "N/5" or "N of 5"
static URGENCY_AFTER_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\burgency\b[^0-9]{0,8}([1-5])\b").unwrap());

static URGENCY_OUT_OF_FIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([1-5])\s*(?:/|of)\s*5\b").unwrap());

// State: explicit "state: XX" marker, else any all-caps two-letter token
static STATE_EXPLICIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bstate[:\s]+([A-Za-z]{2})\b").unwrap());

static STATE_BARE_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{2})\b").unwrap());

static PROVIDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"provider\s+is\s+([A-Za-z][A-Za-z0-9\- ]{1,40})").unwrap());

// Name: case-insensitive trigger, then one or two capitalized words
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:\bmy\s+name\s+is|\bcall\s+me)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)").unwrap()
});

/// Capitalized words that follow "call me" without being a name
const NAME_EXCLUDE_WORDS: [&str; 8] = [
    "Today", "Tomorrow", "Tonight", "Back", "Later", "Now", "Please", "Anytime",
];

// =============================================================================
// EXTRACTOR
// =============================================================================

/// Rule-based extractor for lead attributes
///
/// Total over its input: malformed or out-of-range text leaves the field
/// absent rather than producing an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every supported field from one utterance
    pub fn extract(&self, text: &str) -> LeadRecord {
        let lower = text.to_lowercase();

        let record = LeadRecord {
            coverage: coverage_in(&lower),
            budget: budget_in(&lower),
            age: self.extract_age(&lower),
            state: self.extract_state(text),
            urgency: urgency_in(&lower),
            provider: provider_in(&lower),
            name: self.extract_name(text),
        };

        tracing::trace!(
            captured = %record.summary(),
            chars = text.chars().count(),
            "Extracted lead fields"
        );

        record
    }

    /// First coverage keyword present in the text
    pub fn extract_coverage(&self, text: &str) -> Option<Coverage> {
        coverage_in(&text.to_lowercase())
    }

    /// Monthly budget in dollars
    pub fn extract_budget(&self, text: &str) -> Option<Budget> {
        budget_in(&text.to_lowercase())
    }

    pub fn extract_age(&self, text: &str) -> Option<Age> {
        AGE_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .and_then(Age::new)
    }

    /// Urgency on a 1-5 scale
    pub fn extract_urgency(&self, text: &str) -> Option<Urgency> {
        urgency_in(&text.to_lowercase())
    }

    /// Two-letter state code
    ///
    /// Takes the original-case text. An explicit `state: XX` marker wins over
    /// a bare all-caps token, so a stray "OK" or "IN" only counts when nothing
    /// more specific was said.
    pub fn extract_state(&self, text: &str) -> Option<StateCode> {
        let explicit = STATE_EXPLICIT
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| StateCode::parse(m.as_str()));

        explicit.or_else(|| {
            STATE_BARE_TOKEN
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .find_map(|m| StateCode::parse(m.as_str()))
        })
    }

    /// Current provider after "provider is", title-cased
    pub fn extract_provider(&self, text: &str) -> Option<String> {
        provider_in(&text.to_lowercase())
    }

    /// Customer name after "my name is" or "call me"
    pub fn extract_name(&self, text: &str) -> Option<String> {
        for caps in NAME_PATTERN.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let name = m.as_str().trim();
            let first = name.split_whitespace().next().unwrap_or_default();
            if NAME_EXCLUDE_WORDS.contains(&first) {
                continue;
            }
            return Some(title_case(name));
        }

        None
    }
}

// Field matchers over already-lowercased text

fn coverage_in(lower: &str) -> Option<Coverage> {
    COVERAGE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, coverage)| *coverage)
}

fn budget_in(lower: &str) -> Option<Budget> {
    first_budget(&BUDGET_AFTER_KEYWORD, lower).or_else(|| first_budget(&BUDGET_DOLLAR_AMOUNT, lower))
}

fn urgency_in(lower: &str) -> Option<Urgency> {
    [&*URGENCY_AFTER_KEYWORD, &*URGENCY_OUT_OF_FIVE]
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(lower)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .and_then(Urgency::new)
}

fn provider_in(lower: &str) -> Option<String> {
    PROVIDER_PATTERN
        .captures(lower)
        .and_then(|caps| caps.get(1))
        .map(|m| title_case(m.as_str().trim()))
        .filter(|p| !p.is_empty())
}

fn first_budget(pattern: &Regex, text: &str) -> Option<Budget> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    match raw.parse::<f64>() {
        Ok(value) => Budget::new(value),
        Err(e) => {
            tracing::debug!(raw, error = %e, "Ignoring unparseable budget");
            None
        }
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
///
/// `"state farm"` becomes `"State Farm"`, `"geico-direct"` becomes
/// `"Geico-Direct"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use lead_qualifier_core::US_STATE_CODES;
    use proptest::prelude::*;

    // -- Strategy helpers --

    /// Keywords and markers the field patterns look for
    const FRAGMENTS: &[&str] = &[
        "budget ", "urgency ", "state: ", "provider is ", "my name is ", "call me ", "$", "/5 ",
        " of 5 ", "life ", "car ", "per month ",
    ];

    /// Text built from the fragments the patterns react to, so generated
    /// inputs actually reach the capture paths
    fn arb_utterance() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                prop::sample::select(FRAGMENTS).prop_map(|s| s.to_string()),
                "[0-9]{1,5}(\\.[0-9]{1,3})? ",
                "[A-Z]{2} ",
                "[A-Z]?[a-z]{1,8} ",
                any::<String>(),
            ],
            0..12,
        )
        .prop_map(|parts| parts.concat())
    }

    fn assert_in_range(record: &LeadRecord) -> Result<(), TestCaseError> {
        if let Some(age) = record.age {
            prop_assert!((16..=99).contains(&age.value()));
        }
        if let Some(urgency) = record.urgency {
            prop_assert!((1..=5).contains(&urgency.value()));
        }
        if let Some(budget) = record.budget {
            prop_assert!(budget.dollars().is_finite() && budget.dollars() >= 0.0);
        }
        if let Some(state) = record.state {
            prop_assert!(US_STATE_CODES.contains(&state.as_str()));
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn arbitrary_text_stays_in_range(text in any::<String>()) {
            assert_in_range(&EntityExtractor::new().extract(&text))?;
        }

        #[test]
        fn shaped_text_stays_in_range(text in arb_utterance()) {
            assert_in_range(&EntityExtractor::new().extract(&text))?;
        }

        #[test]
        fn extraction_is_idempotent(text in arb_utterance()) {
            let extractor = EntityExtractor::new();
            prop_assert_eq!(extractor.extract(&text), extractor.extract(&text));
        }

        #[test]
        fn extract_matches_field_methods(text in arb_utterance()) {
            let extractor = EntityExtractor::new();
            let record = extractor.extract(&text);
            prop_assert_eq!(record.coverage, extractor.extract_coverage(&text));
            prop_assert_eq!(record.budget, extractor.extract_budget(&text));
            prop_assert_eq!(record.urgency, extractor.extract_urgency(&text));
            prop_assert_eq!(record.provider, extractor.extract_provider(&text));
            prop_assert_eq!(record.state, extractor.extract_state(&text));
        }
    }
}
