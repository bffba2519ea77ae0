//! Record locator
//!
//! Finds the first benchmark block in a timing log whose header line matches
//! a [`Query`], then pulls the metric values for the query's phase out of
//! the lines that follow it.
//!
//! Expected log shape (free text, only token presence is checked):
//!
//! ```text
//! R5ND_1CPA_5d CM_CACHE None None TAU=0
//! KeyGen   ms   0.031
//! KeyGen   CPU  81234 80990
//! Enc      CPU  120011 119877
//! ...
//! ```

use crate::config::{LocatorConfig, MatchMode};
use crate::query::Query;
use crate::types::{CellValue, LocatorError, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Locates benchmark records in a timing log file
///
/// Every [`find`](RecordLocator::find) call opens the file and scans it from
/// the start; nothing is cached between lookups.
#[derive(Debug)]
pub struct RecordLocator {
    path: PathBuf,
    config: LocatorConfig,
    value_re: Regex,
}

impl RecordLocator {
    /// Create a locator over the log at `path`
    ///
    /// The file is not opened here. Fails only if the configured value
    /// pattern is not a valid regex.
    pub fn new(path: impl Into<PathBuf>, config: LocatorConfig) -> Result<Self> {
        let value_re = Regex::new(&config.value_pattern)?;
        Ok(Self {
            path: path.into(),
            config,
            value_re,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Look up the cell value for `query`
    ///
    /// Skipped queries return [`CellValue::NotApplicable`] without touching
    /// the file. A missing or unreadable file is an error; a missing record
    /// is [`CellValue::NoData`].
    ///
    /// # Example
    /// ```no_run
    /// use timing_locator::{CountermeasureMode, LocatorConfig, Phase, Query, RecordLocator};
    ///
    /// let locator = RecordLocator::new("timing_results.txt", LocatorConfig::new()).unwrap();
    /// let query = Query::new("R5ND_1CPA_5d", CountermeasureMode::Cache, Phase::Total);
    /// println!("{}", locator.find(&query).unwrap());
    /// ```
    pub fn find(&self, query: &Query) -> Result<CellValue> {
        if query.skip {
            log::trace!("Skipping {} {} {}", query.parameter_set, query.mode, query.phase);
            return Ok(CellValue::NotApplicable);
        }

        let criteria = query.header_criteria()?;
        let file = File::open(&self.path).map_err(|source| LocatorError::Io {
            path: self.path.clone(),
            source,
        })?;

        let value = self.scan(BufReader::new(file), query, &criteria)?;
        log::debug!(
            "{} {} {} {} -> {}",
            query.parameter_set,
            query.mode,
            query.phase,
            query.tau_token(),
            value
        );
        Ok(value)
    }

    /// Scan `reader` for the first header matching `criteria`
    fn scan<R: BufRead>(&self, reader: R, query: &Query, criteria: &[String]) -> Result<CellValue> {
        let mut lines = reader.split(b'\n');
        let mut line_no = 0usize;

        while let Some(line) = lines.next() {
            let line = self.decode_line(line)?;
            line_no += 1;

            if !self.matches_all(&line, criteria) {
                continue;
            }
            log::trace!("Header match at line {}: {}", line_no, line.trim_end());

            let mut remaining = self.config.lookahead;
            while remaining > 0 {
                let Some(candidate) = lines.next() else {
                    break;
                };
                let candidate = self.decode_line(candidate)?;
                line_no += 1;

                if self.is_metric_line(&candidate, query) {
                    log::trace!("Metric line {}: {}", line_no, candidate.trim_end());
                    return Ok(self.extract(&candidate));
                }
                remaining -= 1;
            }

            // The line that closes an exhausted window is consumed without
            // being considered as a header; scanning never rewinds.
            if remaining == 0 {
                if let Some(closing) = lines.next() {
                    self.decode_line(closing)?;
                    line_no += 1;
                }
            }
            log::trace!("No {} line within {} lines of header", query.phase, self.config.lookahead);
        }

        Ok(CellValue::NoData)
    }

    fn decode_line(&self, raw: std::io::Result<Vec<u8>>) -> Result<String> {
        let bytes = raw.map_err(|source| LocatorError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn matches_all(&self, line: &str, criteria: &[String]) -> bool {
        criteria
            .iter()
            .all(|criterion| self.config.match_mode.matches(line, criterion))
    }

    fn is_metric_line(&self, line: &str, query: &Query) -> bool {
        let mode: MatchMode = self.config.match_mode;
        mode.matches(line, query.phase.token()) && mode.matches(line, &self.config.metric_marker)
    }

    /// Pull every value out of a metric line, in order
    ///
    /// A line with no values, or with a value that does not fit `u64`, is
    /// reported as no data.
    fn extract(&self, line: &str) -> CellValue {
        let mut values = Vec::new();
        for m in self.value_re.find_iter(line) {
            match m.as_str().parse::<u64>() {
                Ok(v) => values.push(v),
                Err(e) => {
                    log::warn!("Unparsable value {:?} in {:?}: {}", m.as_str(), line.trim_end(), e);
                    return CellValue::NoData;
                }
            }
        }

        if values.is_empty() {
            log::warn!("Metric line without values: {:?}", line.trim_end());
            return CellValue::NoData;
        }
        CellValue::Cycles(values)
    }
}
