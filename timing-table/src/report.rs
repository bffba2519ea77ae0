//! Report generation
//!
//! Resolves every cell of a [`TableSpec`] through the record locator and
//! renders the result as a LaTeX `tabular` inside a landscape `table*`.

use crate::config::TableSpec;
use anyhow::{Context, Result};
use serde::Serialize;
use timing_locator::{CellValue, CountermeasureMode, Phase, Query, RecordLocator};

/// Escape a label for LaTeX (`_` becomes `\_`)
pub fn escape_label(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '_' {
            escaped.push_str("\\_");
        } else {
            escaped.push(c);
        }
    }
    escaped
}

/// Drop the first and last character of a raw cell value
fn strip_delimiters(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCell {
    pub phase: Phase,
    pub mode: CountermeasureMode,
    pub value: CellValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRow {
    pub parameter_set: String,
    pub flags: String,
    /// Phase-major: every mode of KeyGen, then Enc, Dec, Total
    pub cells: Vec<ResolvedCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTable {
    pub label: String,
    pub blocks: Vec<Vec<ResolvedRow>>,
}

impl ResolvedTable {
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|b| b.len()).sum()
    }

    /// Number of cells that found a record in the log
    pub fn found_count(&self) -> usize {
        self.blocks
            .iter()
            .flatten()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.value.is_found())
            .count()
    }
}

/// Look up every cell of `spec`
///
/// Any locator error (unreadable log) aborts the whole table.
pub fn resolve_table(spec: &TableSpec, locator: &RecordLocator) -> Result<ResolvedTable> {
    let mut blocks = Vec::with_capacity(spec.blocks.len());

    for block in &spec.blocks {
        let mut rows = Vec::new();
        for row in block.rows() {
            let mut cells = Vec::with_capacity(Phase::ALL.len() * CountermeasureMode::ALL.len());
            for phase in Phase::ALL {
                for mode in CountermeasureMode::ALL {
                    let query = Query::new(row.parameter_set, mode, phase)
                        .with_instruction_set(block.instruction_set.as_str())
                        .with_tau(row.tau.clone())
                        .with_aes(block.aes.as_str())
                        .with_skip(block.skips(mode));

                    let value = locator.find(&query).with_context(|| {
                        format!("Lookup failed for {} {} {}", row.parameter_set, mode, phase)
                    })?;
                    cells.push(ResolvedCell { phase, mode, value });
                }
            }
            rows.push(ResolvedRow {
                parameter_set: row.parameter_set.to_string(),
                flags: row.flags,
                cells,
            });
        }
        blocks.push(rows);
    }

    let resolved = ResolvedTable {
        label: spec.label.clone(),
        blocks,
    };
    log::info!(
        "Table {}: {} rows, {} cells with data",
        resolved.label,
        resolved.row_count(),
        resolved.found_count()
    );
    Ok(resolved)
}

fn column_spec() -> String {
    let group = "c".repeat(CountermeasureMode::ALL.len());
    let mut spec = String::from("c|c");
    for _ in Phase::ALL {
        spec.push('|');
        spec.push_str(&group);
    }
    spec
}

fn header_rows() -> String {
    let mut titles = String::from(r" \multirow{2}{*}{Parameter set} & \multirow{2}{*}{Flags}");
    let mut labels = String::from("                                &                       ");
    for phase in Phase::ALL {
        titles.push_str(&format!(
            r" & \multicolumn{{{}}}{{c}}{{{}}}",
            CountermeasureMode::ALL.len(),
            phase
        ));
        for mode in CountermeasureMode::ALL {
            labels.push_str(" & ");
            labels.push_str(&escape_label(mode.label()));
        }
    }
    format!("{titles}\\\\ \n{labels} \\\\ \n")
}

/// Render a resolved table as a LaTeX document fragment
pub fn render_latex(spec: &TableSpec, table: &ResolvedTable) -> String {
    let mut s = String::new();
    s.push_str("\\begin{landscape}\n");
    s.push_str("\\begin{table*}\n");
    s.push_str(&format!("\\caption{{{}}}\n", spec.caption));
    s.push_str(&format!("\\label{{{}}}\n", spec.label));
    s.push_str("\\tiny\n");
    s.push_str("\\begin{center} \n");
    s.push_str(&format!("\\begin{{tabular}}{{{}}} \n", column_spec()));
    s.push_str("\\toprule\n");
    s.push_str(&header_rows());

    for block in &table.blocks {
        s.push_str(" \\midrule\n");
        for row in block {
            s.push_str(&escape_label(&row.parameter_set));
            s.push('&');
            s.push_str(&escape_label(&row.flags));
            for cell in &row.cells {
                s.push('&');
                s.push_str(strip_delimiters(&cell.value.raw()));
            }
            s.push_str("\\\\\n");
        }
    }

    s.push_str("\\bottomrule\n");
    s.push_str("\\end{tabular}\n");
    s.push_str("\\end{center}\n");
    s.push_str("\\end{table*}\n");
    s.push_str("\\end{landscape}\n");
    s
}

/// Resolve and render one table
pub fn build_table(spec: &TableSpec, locator: &RecordLocator) -> Result<String> {
    let resolved = resolve_table(spec, locator)?;
    Ok(render_latex(spec, &resolved))
}
