//! Locator configuration types
//!
//! Only the knobs the record search itself needs live here. Which tables to
//! build and from which catalogs is the application's business.

use serde::{Deserialize, Serialize};

/// How a search criterion is compared against a log line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Criterion may appear anywhere in the line.
    ///
    /// Overmatches when one token is a substring of another
    /// (e.g. `R5N1_3CCA_0d` inside `R5N1_3CCA_0dx`).
    #[default]
    Substring,
    /// Criterion must equal one whole field of the line, where fields are
    /// separated by whitespace, `,`, `;` or `:`.
    Token,
}

impl MatchMode {
    /// Check whether `needle` matches somewhere in `line`
    pub fn matches(&self, line: &str, needle: &str) -> bool {
        match self {
            MatchMode::Substring => line.contains(needle),
            MatchMode::Token => line
                .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
                .any(|field| field == needle),
        }
    }
}

/// Configuration for the record locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Number of lines after a header searched for the metric line (default: 12)
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,

    /// Marker identifying the metric line (default: "CPU")
    #[serde(default = "default_metric_marker")]
    pub metric_marker: String,

    /// Pattern for the values pulled out of a metric line (default: `[0-9]+`, ASCII digits only)
    #[serde(default = "default_value_pattern")]
    pub value_pattern: String,

    /// Criterion comparison mode
    #[serde(default)]
    pub match_mode: MatchMode,
}

fn default_lookahead() -> usize {
    12
}

fn default_metric_marker() -> String {
    "CPU".to_string()
}

fn default_value_pattern() -> String {
    r"[0-9]+".to_string()
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
            metric_marker: default_metric_marker(),
            value_pattern: default_value_pattern(),
            match_mode: MatchMode::default(),
        }
    }
}

impl LocatorConfig {
    /// Create a new locator configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the lookahead window after a header line
    pub fn with_lookahead(mut self, lines: usize) -> Self {
        self.lookahead = lines;
        self
    }

    /// Builder method: set the metric line marker
    pub fn with_metric_marker(mut self, marker: impl Into<String>) -> Self {
        self.metric_marker = marker.into();
        self
    }

    /// Builder method: set the value extraction pattern
    pub fn with_value_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.value_pattern = pattern.into();
        self
    }

    /// Builder method: set the criterion match mode
    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }
}
