//! Analyzer configuration

use serde::{Deserialize, Serialize};

/// Debug switches held by the analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Trace entry and exit of every nonterminal and every scope operation
    pub trace: bool,
    /// Log the visible scopes once analysis finishes
    pub dump_scopes: bool,
}

impl AnalyzerConfig {
    /// Read `LILLE_TRACE` and `LILLE_DUMP_SCOPES`
    pub fn from_env() -> Self {
        Self {
            trace: env_flag("LILLE_TRACE"),
            dump_scopes: env_flag("LILLE_DUMP_SCOPES"),
        }
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_dump_scopes(mut self, dump_scopes: bool) -> Self {
        self.dump_scopes = dump_scopes;
        self
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
