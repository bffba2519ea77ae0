//! Built-in Round5 report definition
//!
//! Reproduces the countermeasure comparison tables for the Round5 KEM
//! parameter sets. A TOML report file replaces all of this.

use crate::config::{BlockSpec, ReportConfig, TableSpec};
use timing_locator::{CountermeasureMode, LocatorConfig};

pub const PARAMETER_SETS_CPA: [&str; 9] = [
    "R5ND_1CPA_5d", "R5ND_3CPA_5d", "R5ND_5CPA_5d",
    "R5ND_1CPA_0d", "R5ND_3CPA_0d", "R5ND_5CPA_0d",
    "R5N1_1CPA_0d", "R5N1_3CPA_0d", "R5N1_5CPA_0d",
];

pub const PARAMETER_SETS_CCA: [&str; 9] = [
    "R5ND_1CCA_5d", "R5ND_3CCA_5d", "R5ND_5CCA_5d",
    "R5ND_1CCA_0d", "R5ND_3CCA_0d", "R5ND_5CCA_0d",
    "R5N1_1CCA_0d", "R5N1_3CCA_0d", "R5N1_5CCA_0d",
];

pub const PARAMETER_SETS_SPECIAL: [&str; 3] = ["R5ND_0CPA_2iot", "R5ND_1CPA_4longkey", "R5N1_3CCA_0smallCT"];

pub const PARAMETER_SETS_RING: [&str; 14] = [
    "R5ND_1CPA_5d", "R5ND_3CPA_5d", "R5ND_5CPA_5d",
    "R5ND_1CPA_0d", "R5ND_3CPA_0d", "R5ND_5CPA_0d",
    "R5ND_1CCA_5d", "R5ND_3CCA_5d", "R5ND_5CCA_5d",
    "R5ND_1CCA_0d", "R5ND_3CCA_0d", "R5ND_5CCA_0d",
    "R5ND_0CPA_2iot", "R5ND_1CPA_4longkey",
];

pub const PARAMETER_SETS_NON_RING: [&str; 7] = [
    "R5N1_1CPA_0d", "R5N1_3CPA_0d", "R5N1_5CPA_0d",
    "R5N1_1CCA_0d", "R5N1_3CCA_0d", "R5N1_5CCA_0d",
    "R5N1_3CCA_0smallCT",
];

/// Parameter set whose AVX2 timings are compared across TAU values
pub const TAU_COMPARISON_SET: &str = "R5N1_1CPA_0d";

/// Instruction-set token for AVX2 builds
pub const AVX_TOKEN: &str = "AVX";

const MAIN_CAPTION: &str = r"Performance comparison of Round5 KEMs, r5\_cpa\_kem and r5\_cca\_kem, using different parameter sets and different type of countermeasures against timing attacks. The first three blocks of rows include the performance for IND-CPA secure, IND-CCA secure, and special parameter sets. The following block of rows include performance numbers when AVX2 optimizations are enabled in non-ring parameter sets. The last row block compares performance of R5N1\_1CPA\_0d parameter set for different TAU choices. Numbers are given in thousands of CPU cycles in a machine running at 2.6 GHz.  ";

const AVX2_CAPTION: &str = r"Performance comparison of Round5 KEMs, r5\_cpa\_kem and r5\_cca\_kem, using different parameter sets and different type of countermeasures against timing attacks with AVX2 instructions. The first block of rows include performance numbers for ring parameter sets. The second block of rows shows performance numbers for non-ring parameter sets. last row block compares performance of R5N1\_1CPA\_0d parameter set for different TAU choices. Numbers are given in thousands of CPU cycles in a machine running at 2.6 GHz. ";

fn names(sets: &[&str]) -> Vec<String> {
    sets.iter().map(|s| s.to_string()).collect()
}

/// Portable-code table: CPA, CCA and special parameter sets, every mode
pub fn main_table() -> TableSpec {
    TableSpec {
        label: "tab:timing_countermeasure_comparison".to_string(),
        caption: MAIN_CAPTION.to_string(),
        blocks: vec![
            BlockSpec::new(names(&PARAMETER_SETS_CPA)),
            BlockSpec::new(names(&PARAMETER_SETS_CCA)),
            BlockSpec::new(names(&PARAMETER_SETS_SPECIAL)),
        ],
    }
}

/// AVX2 table: cacheless timings are not tracked for AVX2 builds
pub fn avx2_table() -> TableSpec {
    let avx2 = |sets: &[&str]| {
        BlockSpec::new(names(sets))
            .with_flags("AVX2")
            .with_instruction_set(AVX_TOKEN)
            .with_skip_modes(vec![CountermeasureMode::None])
    };

    TableSpec {
        label: "tab:timing_countermeasure_comparison_avx2".to_string(),
        caption: AVX2_CAPTION.to_string(),
        blocks: vec![
            avx2(&PARAMETER_SETS_RING).with_taus(vec!["0".to_string()]),
            avx2(&PARAMETER_SETS_NON_RING).with_taus(vec!["2".to_string()]),
            avx2(&[TAU_COMPARISON_SET])
                .with_flags("AVX2, TAU={tau}")
                .with_taus(vec!["0".to_string(), "1".to_string()]),
        ],
    }
}

/// Both Round5 tables, in print order
pub fn default_report() -> ReportConfig {
    ReportConfig {
        locator: LocatorConfig::default(),
        tables: vec![main_table(), avx2_table()],
    }
}
