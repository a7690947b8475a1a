//! Lead record types
//!
//! A `LeadRecord` is what the extractor pulls out of an utterance. Every field
//! is either absent or holds a value that already satisfies its own range or
//! membership rule: the newtypes below cannot be built out of range.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::states::StateCode;

/// Insurance product the customer is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    Life,
    Auto,
    Home,
    Renters,
    Health,
    Business,
}

impl Coverage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coverage::Life => "life",
            Coverage::Auto => "auto",
            Coverage::Home => "home",
            Coverage::Renters => "renters",
            Coverage::Health => "health",
            Coverage::Business => "business",
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer age, always within 16..=99
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Age(u8);

impl Age {
    pub const MIN: u32 = 16;
    pub const MAX: u32 = 99;

    pub fn new(years: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&years)
            .then(|| Age(years as u8))
    }

    pub fn value(&self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for Age {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Age::new(value).ok_or_else(|| format!("age out of range: {}", value))
    }
}

impl From<Age> for u32 {
    fn from(age: Age) -> Self {
        age.value()
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Urgency on a 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Urgency(u8);

impl Urgency {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 5;

    pub fn new(level: u32) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&level)
            .then(|| Urgency(level as u8))
    }

    pub fn value(&self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u32> for Urgency {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Urgency::new(value).ok_or_else(|| format!("urgency out of range: {}", value))
    }
}

impl From<Urgency> for u32 {
    fn from(urgency: Urgency) -> Self {
        urgency.value()
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monthly budget in dollars: finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Budget(f64);

impl Budget {
    pub fn new(dollars: f64) -> Option<Self> {
        (dollars.is_finite() && dollars >= 0.0).then_some(Budget(dollars))
    }

    pub fn dollars(&self) -> f64 {
        self.0
    }

    /// Rounded whole-dollar rendering, e.g. `120` for 119.6
    pub fn whole_dollars(&self) -> String {
        format!("{:.0}", self.0)
    }
}

impl TryFrom<f64> for Budget {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Budget::new(value).ok_or_else(|| format!("invalid budget: {}", value))
    }
}

impl From<Budget> for f64 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

/// Decimal rendering with at least one fractional digit (`120.0`, `99.5`)
impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Fields the qualifier must collect, in the order it asks for them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadField {
    Coverage,
    State,
    Age,
    Budget,
    Urgency,
}

impl LeadField {
    /// Required fields in asking priority
    pub const REQUIRED: [LeadField; 5] = [
        LeadField::Coverage,
        LeadField::State,
        LeadField::Age,
        LeadField::Budget,
        LeadField::Urgency,
    ];
}

/// Structured attributes pulled from a conversation
///
/// Produced fresh by each extraction; nothing here is shared or mutated
/// after the fact except through [`LeadRecord::merge`] on an owned copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub coverage: Option<Coverage>,
    pub budget: Option<Budget>,
    pub age: Option<Age>,
    pub state: Option<StateCode>,
    pub urgency: Option<Urgency>,
    /// Current provider, title-cased
    pub provider: Option<String>,
    /// Customer name, title-cased. Never required and never scored.
    pub name: Option<String>,
}

impl LeadRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field at all was captured
    pub fn is_empty(&self) -> bool {
        self.coverage.is_none()
            && self.budget.is_none()
            && self.age.is_none()
            && self.state.is_none()
            && self.urgency.is_none()
            && self.provider.is_none()
            && self.name.is_none()
    }

    pub fn has(&self, field: LeadField) -> bool {
        match field {
            LeadField::Coverage => self.coverage.is_some(),
            LeadField::State => self.state.is_some(),
            LeadField::Age => self.age.is_some(),
            LeadField::Budget => self.budget.is_some(),
            LeadField::Urgency => self.urgency.is_some(),
        }
    }

    /// Required fields still absent, in asking priority
    pub fn missing_required(&self) -> Vec<LeadField> {
        LeadField::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.has(*f))
            .collect()
    }

    /// Overlay every present field of `newer` onto `self`
    pub fn merge(&mut self, newer: &LeadRecord) {
        if newer.coverage.is_some() {
            self.coverage = newer.coverage;
        }
        if newer.budget.is_some() {
            self.budget = newer.budget;
        }
        if newer.age.is_some() {
            self.age = newer.age;
        }
        if newer.state.is_some() {
            self.state = newer.state;
        }
        if newer.urgency.is_some() {
            self.urgency = newer.urgency;
        }
        if newer.provider.is_some() {
            self.provider = newer.provider.clone();
        }
        if newer.name.is_some() {
            self.name = newer.name.clone();
        }
    }

    /// Captured fields as `(key, value)` pairs, absent fields omitted
    pub fn captured(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(coverage) = self.coverage {
            pairs.push(("coverage", coverage.to_string()));
        }
        if let Some(budget) = self.budget {
            pairs.push(("budget", budget.to_string()));
        }
        if let Some(age) = self.age {
            pairs.push(("age", age.to_string()));
        }
        if let Some(state) = self.state {
            pairs.push(("state", state.to_string()));
        }
        if let Some(urgency) = self.urgency {
            pairs.push(("urgency", urgency.to_string()));
        }
        if let Some(provider) = self.provider.as_deref().filter(|p| !p.is_empty()) {
            pairs.push(("provider", provider.to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        pairs
    }

    /// `key=value` list joined by commas, empty when nothing was captured
    pub fn summary(&self) -> String {
        self.captured()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A lead record with its qualification score attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub record: LeadRecord,
    /// 0..=10
    pub score: u8,
}

impl ScoredLead {
    pub fn new(record: LeadRecord, score: u8) -> Self {
        Self { record, score }
    }
}
