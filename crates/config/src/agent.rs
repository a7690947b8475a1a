//! Agent configuration

use serde::{Deserialize, Serialize};

/// How the qualifier treats fields revealed in earlier turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldMemory {
    /// Extract from the latest user message only. Earlier answers are
    /// forgotten, which also lets a user restate a field from scratch.
    #[default]
    Reset,
    /// Extract from every user message and keep the latest value seen for
    /// each field.
    Accumulate,
}

/// Agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Cross-turn field handling
    #[serde(default)]
    pub field_memory: FieldMemory,
}
