//! Search criteria for a single table cell

use crate::types::{CountermeasureMode, LocatorError, Phase, Result};

/// Token used for absent optional flags (instruction set, AES)
pub const ABSENT_FLAG: &str = "None";

/// TAU selection for a lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Tau {
    /// Derive from the parameter set name
    #[default]
    Default,
    /// Use this value verbatim
    Explicit(String),
}

impl Tau {
    pub fn explicit(value: impl Into<String>) -> Self {
        Tau::Explicit(value.into())
    }

    /// Resolve to the TAU value for `parameter_set`
    ///
    /// Parameter sets with `D` at byte offset 3 (ring, deterministic, e.g.
    /// `R5ND_...`) default to 0, all others to 2.
    pub fn resolve(&self, parameter_set: &str) -> String {
        match self {
            Tau::Explicit(value) => value.clone(),
            Tau::Default => {
                if parameter_set.as_bytes().get(3) == Some(&b'D') {
                    "0".to_string()
                } else {
                    "2".to_string()
                }
            }
        }
    }
}

/// Criteria identifying one benchmark block and one metric line in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub parameter_set: String,
    pub mode: CountermeasureMode,
    pub phase: Phase,
    pub instruction_set: String,
    pub tau: Tau,
    pub aes: String,
    /// Return "not applicable" without reading the log
    pub skip: bool,
}

impl Query {
    /// Create a query with no instruction-set or AES flag and default TAU
    pub fn new(parameter_set: impl Into<String>, mode: CountermeasureMode, phase: Phase) -> Self {
        Self {
            parameter_set: parameter_set.into(),
            mode,
            phase,
            instruction_set: ABSENT_FLAG.to_string(),
            tau: Tau::Default,
            aes: ABSENT_FLAG.to_string(),
            skip: false,
        }
    }

    /// Builder method: set the instruction-set flag token (e.g. "AVX")
    pub fn with_instruction_set(mut self, token: impl Into<String>) -> Self {
        self.instruction_set = token.into();
        self
    }

    /// Builder method: set the TAU selection
    pub fn with_tau(mut self, tau: Tau) -> Self {
        self.tau = tau;
        self
    }

    /// Builder method: set the AES flag token
    pub fn with_aes(mut self, token: impl Into<String>) -> Self {
        self.aes = token.into();
        self
    }

    /// Builder method: mark the cell as not applicable
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    /// The `TAU=<n>` criterion for this query
    pub fn tau_token(&self) -> String {
        format!("TAU={}", self.tau.resolve(&self.parameter_set))
    }

    /// All criteria a header line must satisfy, in match order
    pub fn header_criteria(&self) -> Result<Vec<String>> {
        let criteria = vec![
            self.parameter_set.clone(),
            self.mode.token().to_string(),
            self.instruction_set.clone(),
            self.aes.clone(),
            self.tau_token(),
        ];

        // An empty criterion would match every line
        if criteria.iter().any(|c| c.is_empty()) {
            return Err(LocatorError::InvalidQuery(format!(
                "empty search criterion in {:?}",
                criteria
            )));
        }

        Ok(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_deterministic_defaults_to_tau_0() {
        for name in ["R5ND_1CPA_5d", "R5ND_5CCA_0d", "R5ND_0CPA_2iot", "XXXD"] {
            let query = Query::new(name, CountermeasureMode::None, Phase::Total);
            assert_eq!(query.tau_token(), "TAU=0", "{}", name);
        }
    }

    #[test]
    fn test_other_families_default_to_tau_2() {
        for name in ["R5N1_1CPA_0d", "R5N1_3CCA_0smallCT", "R5nd_1CPA_5d", "R5", ""] {
            let query = Query::new(name, CountermeasureMode::None, Phase::Total);
            assert_eq!(query.tau_token(), "TAU=2", "{}", name);
        }
    }

    #[test]
    fn test_explicit_tau_wins() {
        let query = Query::new("R5ND_1CPA_5d", CountermeasureMode::Cache, Phase::Encapsulate)
            .with_tau(Tau::explicit("1"));
        assert_eq!(query.tau_token(), "TAU=1");
    }

    #[test]
    fn test_header_criteria_order() {
        let query = Query::new("R5N1_1CPA_0d", CountermeasureMode::ConstantTime, Phase::KeyGen)
            .with_instruction_set("AVX");
        let criteria = query.header_criteria().unwrap();
        assert_eq!(criteria, vec!["R5N1_1CPA_0d", "CM_CT", "AVX", "None", "TAU=2"]);
    }

    #[test]
    fn test_empty_criterion_rejected() {
        let query = Query::new("", CountermeasureMode::None, Phase::Total);
        assert!(matches!(
            query.header_criteria(),
            Err(LocatorError::InvalidQuery(_))
        ));
    }
}
