//! Report configuration loading and parsing
//!
//! Catalogs are data: a report file lists the tables, their row blocks and
//! the flag combinations each block is looked up with.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use timing_locator::{CountermeasureMode, LocatorConfig, Tau, ABSENT_FLAG};

/// Placeholder in [`BlockSpec::flags`] replaced by the row's TAU value
pub const TAU_PLACEHOLDER: &str = "{tau}";

/// Complete report definition (loaded from report.toml)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub locator: LocatorConfig,
    pub tables: Vec<TableSpec>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        crate::catalog::default_report()
    }
}

/// One LaTeX table
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TableSpec {
    pub label: String,
    /// Inserted verbatim; must already be valid LaTeX
    pub caption: String,
    pub blocks: Vec<BlockSpec>,
}

/// A group of rows separated from its neighbours by a rule
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BlockSpec {
    pub parameter_sets: Vec<String>,
    /// Text of the "Flags" column; `{tau}` expands to the row's TAU
    #[serde(default)]
    pub flags: String,
    #[serde(default = "absent_flag")]
    pub instruction_set: String,
    #[serde(default = "absent_flag")]
    pub aes: String,
    /// Explicit TAU values, one row group each; empty derives TAU per parameter set
    #[serde(default)]
    pub taus: Vec<String>,
    /// Modes rendered as not applicable
    #[serde(default)]
    pub skip_modes: Vec<CountermeasureMode>,
}

fn absent_flag() -> String {
    ABSENT_FLAG.to_string()
}

/// A single row to look up and render
#[derive(Debug, Clone, PartialEq)]
pub struct RowSpec<'a> {
    pub parameter_set: &'a str,
    pub flags: String,
    pub tau: Tau,
}

impl BlockSpec {
    pub fn new(parameter_sets: Vec<String>) -> Self {
        Self {
            parameter_sets,
            flags: String::new(),
            instruction_set: absent_flag(),
            aes: absent_flag(),
            taus: Vec::new(),
            skip_modes: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    pub fn with_instruction_set(mut self, token: impl Into<String>) -> Self {
        self.instruction_set = token.into();
        self
    }

    pub fn with_aes(mut self, token: impl Into<String>) -> Self {
        self.aes = token.into();
        self
    }

    pub fn with_taus(mut self, taus: Vec<String>) -> Self {
        self.taus = taus;
        self
    }

    pub fn with_skip_modes(mut self, modes: Vec<CountermeasureMode>) -> Self {
        self.skip_modes = modes;
        self
    }

    pub fn skips(&self, mode: CountermeasureMode) -> bool {
        self.skip_modes.contains(&mode)
    }

    /// Rows in print order: TAU-major, then parameter sets
    pub fn rows(&self) -> Vec<RowSpec<'_>> {
        if self.taus.is_empty() {
            return self
                .parameter_sets
                .iter()
                .map(|set| RowSpec {
                    parameter_set: set,
                    flags: self.flags.clone(),
                    tau: Tau::Default,
                })
                .collect();
        }

        self.taus
            .iter()
            .flat_map(|tau| {
                self.parameter_sets.iter().map(move |set| RowSpec {
                    parameter_set: set,
                    flags: self.flags.replace(TAU_PLACEHOLDER, tau),
                    tau: Tau::explicit(tau.as_str()),
                })
            })
            .collect()
    }
}

impl ReportConfig {
    /// Reject definitions that would produce empty tables or match every line
    pub fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            bail!("Report defines no tables");
        }

        for table in &self.tables {
            if table.blocks.is_empty() {
                bail!("Table {:?} has no row blocks", table.label);
            }
            for (i, block) in table.blocks.iter().enumerate() {
                if block.parameter_sets.is_empty() {
                    bail!("Table {:?} block {} lists no parameter sets", table.label, i);
                }
                if block.parameter_sets.iter().any(|s| s.is_empty())
                    || block.instruction_set.is_empty()
                    || block.aes.is_empty()
                    || block.taus.iter().any(|t| t.is_empty())
                {
                    bail!("Table {:?} block {} has an empty search token", table.label, i);
                }
            }
        }

        if self.locator.metric_marker.is_empty() {
            bail!("Locator metric marker must not be empty");
        }

        Ok(())
    }
}

/// Load a report definition from a TOML file
pub fn load_config(path: &Path) -> Result<ReportConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {:?}", path))?;

    let config: ReportConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse report file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid report file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use timing_locator::MatchMode;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [locator]
            lookahead = 8
            match_mode = "token"

            [[tables]]
            label = "tab:avx"
            caption = "AVX2 timings"

            [[tables.blocks]]
            parameter_sets = ["R5N1_1CPA_0d"]
            flags = "AVX2, TAU={tau}"
            instruction_set = "AVX"
            taus = ["0", "1"]
            skip_modes = ["none"]
        "#;

        let config: ReportConfig = toml::from_str(toml_content).unwrap();
        config.validate().unwrap();

        assert_eq!(config.locator.lookahead, 8);
        assert_eq!(config.locator.metric_marker, "CPU");
        assert_eq!(config.locator.match_mode, MatchMode::Token);

        let block = &config.tables[0].blocks[0];
        assert_eq!(block.aes, "None");
        assert!(block.skips(CountermeasureMode::None));
        assert!(!block.skips(CountermeasureMode::Cache));
    }

    #[test]
    fn test_block_defaults() {
        let toml_content = r#"
            [[tables]]
            label = "tab:main"
            caption = "Main"

            [[tables.blocks]]
            parameter_sets = ["R5ND_1CPA_5d", "R5N1_1CPA_0d"]
        "#;

        let config: ReportConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.locator, LocatorConfig::default());

        let rows = config.tables[0].blocks[0].rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.tau == Tau::Default && r.flags.is_empty()));
    }

    #[test]
    fn test_rows_are_tau_major() {
        let block = BlockSpec::new(vec!["A_x".to_string(), "B_y".to_string()])
            .with_flags("AVX2, TAU={tau}")
            .with_taus(vec!["0".to_string(), "1".to_string()]);

        let rows: Vec<_> = block
            .rows()
            .into_iter()
            .map(|r| (r.parameter_set, r.flags, r.tau))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("A_x", "AVX2, TAU=0".to_string(), Tau::explicit("0")),
                ("B_y", "AVX2, TAU=0".to_string(), Tau::explicit("0")),
                ("A_x", "AVX2, TAU=1".to_string(), Tau::explicit("1")),
                ("B_y", "AVX2, TAU=1".to_string(), Tau::explicit("1")),
            ]
        );
    }

    #[test]
    fn test_block_aes_token() {
        let block = BlockSpec::new(vec!["R5ND_1CCA_5d".to_string()]).with_aes("AES");
        assert_eq!(block.aes, "AES");
        assert_eq!(block.instruction_set, "None");

        let mut config = ReportConfig::default();
        config.tables[0].blocks[0] = block.with_aes("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_definitions() {
        let mut config = ReportConfig::default();
        config.validate().unwrap();

        config.tables[0].blocks[0].parameter_sets.clear();
        assert!(config.validate().is_err());

        let mut config = ReportConfig::default();
        config.tables[1].blocks[0].instruction_set.clear();
        assert!(config.validate().is_err());

        let config = ReportConfig {
            locator: LocatorConfig::default(),
            tables: Vec::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_report_round_trips_through_toml() {
        let config = ReportConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ReportConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/report.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read report file"));
    }
}
