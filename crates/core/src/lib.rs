//! Core types for the insurance lead qualifier
//!
//! This crate provides foundational types used across all other crates:
//! - The typed lead record produced by entity extraction
//! - The fixed table of U.S. state codes
//! - Chat message types shared by the transport and LLM layers

pub mod conversation;
pub mod lead;
pub mod states;

pub use conversation::{ChatMessage, Role};
pub use lead::{Age, Budget, Coverage, LeadField, LeadRecord, ScoredLead, Urgency};
pub use states::{StateCode, US_STATE_CODES};
