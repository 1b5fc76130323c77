//! Report Module
//!
//! Renders the registry's contents as an aligned text table or as JSON.
//!
//! # Example
//!
//! ```rust
//! use registry::{Registry, Report, ReportConfig, TimeUnit};
//!
//! let registry = Registry::new();
//! registry.record("Calculator.add", 0.010);
//! registry.record("Calculator.add", 0.012);
//!
//! let config = ReportConfig::default().with_unit(TimeUnit::Milliseconds);
//! let report = Report::from_registry(&registry, &config);
//!
//! let mut out = Vec::new();
//! report.render(&mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("Calculator.add"));
//! ```

use crate::error::{ReportError, ReportResult};
use crate::key::MethodKey;
use crate::registry::Registry;
use crate::stats::Statistics;
use crate::Sample;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Environment variable selecting the output format (`table` or `json`).
pub const ENV_FORMAT: &str = "PROFILING_REPORT_FORMAT";
/// Environment variable selecting the time unit (`s`, `ms` or `us`).
pub const ENV_UNIT: &str = "PROFILING_REPORT_UNIT";
/// Environment variable selecting the sort key (`key`, `total`, `mean` or `count`).
pub const ENV_SORT: &str = "PROFILING_REPORT_SORT";
/// Environment variable capping the number of rows.
pub const ENV_LIMIT: &str = "PROFILING_REPORT_LIMIT";

// =============================================================================
// Configuration
// =============================================================================

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Aligned, human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(ReportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Unit used to display durations. Samples are always stored in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Seconds
    #[default]
    Seconds,
    /// Milliseconds
    Milliseconds,
    /// Microseconds
    Microseconds,
}

impl TimeUnit {
    /// Multiplier converting seconds into this unit.
    pub fn scale(self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Milliseconds => 1_000.0,
            Self::Microseconds => 1_000_000.0,
        }
    }

    /// Short suffix shown in table headers.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Microseconds => "us",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(Self::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(Self::Milliseconds),
            "us" | "micros" | "microseconds" => Ok(Self::Microseconds),
            other => Err(ReportError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Row ordering of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Alphabetical by method key
    #[default]
    Key,
    /// Largest total time first
    Total,
    /// Largest mean time first
    Mean,
    /// Most calls first
    Count,
}

impl FromStr for SortKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "key" | "name" => Ok(Self::Key),
            "total" => Ok(Self::Total),
            "mean" => Ok(Self::Mean),
            "count" | "calls" => Ok(Self::Count),
            other => Err(ReportError::InvalidSortKey(other.to_string())),
        }
    }
}

/// Report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Output format
    pub format: ReportFormat,
    /// Display unit for durations
    pub unit: TimeUnit,
    /// Row ordering
    pub sort_by: SortKey,
    /// Whether raw samples are included (JSON only)
    pub include_samples: bool,
    /// Maximum number of rows, `None` for all
    pub limit: Option<usize>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Table,
            unit: TimeUnit::Seconds,
            sort_by: SortKey::Key,
            include_samples: false,
            limit: None,
        }
    }
}

impl ReportConfig {
    /// Builder method to set the output format.
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder method to set the display unit.
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Builder method to set the row ordering.
    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Builder method to include raw samples.
    pub fn with_samples(mut self, include: bool) -> Self {
        self.include_samples = include;
        self
    }

    /// Builder method to cap the number of rows.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ReportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default configuration overridden by the `PROFILING_REPORT_*` variables.
    pub fn from_env() -> ReportResult<Self> {
        Self::default().apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any name → value lookup.
    pub fn apply_overrides<F>(mut self, lookup: F) -> ReportResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(format) = lookup(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(unit) = lookup(ENV_UNIT) {
            self.unit = unit.parse()?;
        }
        if let Some(sort) = lookup(ENV_SORT) {
            self.sort_by = sort.parse()?;
        }
        if let Some(limit) = lookup(ENV_LIMIT) {
            let parsed = limit
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ReportError::InvalidLimit(limit.clone()))?;
            self.limit = Some(parsed);
        }
        Ok(self)
    }
}

// =============================================================================
// Report
// =============================================================================

/// One method's line in a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    /// Method key
    pub key: MethodKey,
    /// Statistics in seconds
    pub statistics: Statistics,
    /// Raw samples in seconds, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Vec<Sample>>,
}

/// A rendered-ready view of the registry at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// When the snapshot was taken
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Display unit for the table format
    pub unit: TimeUnit,
    /// Number of calls across every row
    pub total_calls: usize,
    /// Time spent across every row, in seconds
    pub total_time: f64,
    /// Rows in configured order
    pub rows: Vec<ReportRow>,
    #[serde(skip)]
    format: ReportFormat,
}

impl Report {
    /// Build a report from one snapshot of `registry`.
    pub fn from_registry(registry: &Registry, config: &ReportConfig) -> Self {
        let mut rows: Vec<ReportRow> = registry
            .all()
            .into_iter()
            .map(|(key, samples)| ReportRow {
                statistics: Statistics::from_samples(&samples),
                samples: config.include_samples.then_some(samples),
                key,
            })
            .collect();

        // Snapshot is already ordered by key; stable sorts keep that as tiebreak.
        match config.sort_by {
            SortKey::Key => {}
            SortKey::Total => {
                rows.sort_by(|a, b| b.statistics.total.total_cmp(&a.statistics.total))
            }
            SortKey::Mean => rows.sort_by(|a, b| b.statistics.mean.total_cmp(&a.statistics.mean)),
            SortKey::Count => rows.sort_by(|a, b| b.statistics.count.cmp(&a.statistics.count)),
        }

        let total_calls = rows.iter().map(|r| r.statistics.count).sum();
        let total_time = rows.iter().map(|r| r.statistics.total).sum();

        if let Some(limit) = config.limit {
            rows.truncate(limit);
        }

        Self {
            generated_at: chrono::Utc::now(),
            unit: config.unit,
            total_calls,
            total_time,
            rows,
            format: config.format,
        }
    }

    /// Check if the report has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find a row by key.
    pub fn row(&self, key: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.key.as_str() == key)
    }

    /// Export the report as pretty JSON.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report in its configured format.
    pub fn render<W: Write>(&self, out: &mut W) -> ReportResult<()> {
        match self.format {
            ReportFormat::Json => {
                writeln!(out, "{}", self.to_json()?)?;
            }
            ReportFormat::Table => self.render_table(out)?,
        }
        Ok(())
    }

    fn render_table<W: Write>(&self, out: &mut W) -> ReportResult<()> {
        if self.rows.is_empty() {
            writeln!(out, "No profiling data collected.")?;
            return Ok(());
        }

        let unit = self.unit;
        let key_width = self
            .rows
            .iter()
            .map(|r| r.key.as_str().len())
            .max()
            .unwrap_or(0)
            .max("Method".len());

        writeln!(
            out,
            "{:<kw$} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "Method",
            "Calls",
            format!("Total({})", unit),
            format!("Mean({})", unit),
            format!("Median({})", unit),
            format!("Std({})", unit),
            format!("Min({})", unit),
            format!("Max({})", unit),
            kw = key_width,
        )?;
        writeln!(out, "{}", "-".repeat(key_width + 9 + 13 * 6))?;

        let scale = unit.scale();
        for row in &self.rows {
            let s = &row.statistics;
            writeln!(
                out,
                "{:<kw$} {:>8} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                row.key.as_str(),
                s.count,
                s.total * scale,
                s.mean * scale,
                s.median * scale,
                s.std_dev * scale,
                s.min * scale,
                s.max * scale,
                kw = key_width,
            )?;
        }

        writeln!(out, "{}", "-".repeat(key_width + 9 + 13 * 6))?;
        writeln!(
            out,
            "{} calls across {} methods, {:.6}{} total",
            self.total_calls,
            self.rows.len(),
            self.total_time * scale,
            unit,
        )?;
        Ok(())
    }
}
