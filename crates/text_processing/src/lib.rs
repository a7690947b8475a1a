//! Text processing for lead intake
//!
//! Deterministic, pattern-based extraction of lead attributes from free text.
//! Everything here is pure: no I/O, no shared mutable state, and no input can
//! make it fail.
//!
//! # Example
//!
//! ```
//! use lead_qualifier_text_processing::EntityExtractor;
//!
//! let extractor = EntityExtractor::new();
//! let record = extractor.extract("I need auto insurance in TX");
//! assert_eq!(record.state.map(|s| s.as_str()), Some("TX"));
//! ```

pub mod slot_extraction;

pub use slot_extraction::{title_case, EntityExtractor, COVERAGE_KEYWORDS};
