//! U.S. state codes
//!
//! The fixed set of the 50 states plus the District of Columbia.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Two-letter postal codes recognized as a customer's state
pub const US_STATE_CODES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

/// A validated state code
///
/// Only constructible from [`US_STATE_CODES`], so a `StateCode` held anywhere
/// in the system is always a real state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct StateCode(&'static str);

impl StateCode {
    /// Parse a two-letter code, case-insensitively
    pub fn parse(code: &str) -> Option<Self> {
        let upper = code.trim().to_ascii_uppercase();
        US_STATE_CODES
            .iter()
            .find(|c| **c == upper)
            .map(|c| StateCode(c))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<String> for StateCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateCode::parse(&value).ok_or_else(|| format!("unknown state code: {}", value))
    }
}

// Hand-written: the borrowed table entry cannot come from the input
impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        StateCode::try_from(code).map_err(serde::de::Error::custom)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_states_and_dc() {
        assert_eq!(US_STATE_CODES.len(), 51);
        assert!(US_STATE_CODES.contains(&"DC"));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(StateCode::parse("tx").unwrap().as_str(), "TX");
        assert_eq!(StateCode::parse(" Ca ").unwrap().as_str(), "CA");
    }

    #[test]
    fn test_unknown_codes_rejected() {
        assert!(StateCode::parse("ZZ").is_none());
        assert!(StateCode::parse("PR").is_none());
        assert!(StateCode::parse("").is_none());
        assert!(StateCode::parse("CAL").is_none());
    }

    #[test]
    fn test_serde_roundtrip_rejects_unknown() {
        let json = serde_json::to_string(&StateCode::parse("NY").unwrap()).unwrap();
        assert_eq!(json, "\"NY\"");
        assert!(serde_json::from_str::<StateCode>("\"XX\"").is_err());
        assert_eq!(
            serde_json::from_str::<StateCode>("\"ny\"").unwrap().as_str(),
            "NY"
        );
    }
}
