//! Measurement Registry
//!
//! This crate holds the shared store behind the call-timing proxy:
//! - Per-method duration samples keyed by `"{TypeName}.{MethodName}"`
//! - Statistics derived on demand (count, mean, median, population std-dev,
//!   min, max, total and tail percentiles)
//! - Snapshot and clear operations reachable without any proxy reference
//! - Report rendering as an aligned table or JSON
//!
//! # Example
//!
//! ```rust
//! use registry::{Registry, MethodKey};
//!
//! let registry = Registry::new();
//! let key = MethodKey::new("Calculator", "add");
//!
//! registry.record(&key, 0.010);
//! registry.record(&key, 0.030);
//!
//! let stats = registry.statistics("Calculator.add");
//! assert_eq!(stats.count, 2);
//! assert!((stats.mean - 0.020).abs() < 1e-12);
//! ```
//!
//! # Process-wide access
//!
//! [`global_registry`] returns the lazily-created instance shared by every
//! proxy that was not handed an explicit registry. The free functions
//! [`record`], [`series`], [`statistics`], [`all`] and [`clear`] operate on it.

mod error;
mod key;
mod registry;
pub mod report;
mod stats;

pub use error::{ReportError, ReportResult};
pub use key::MethodKey;
pub use registry::*;
pub use report::{Report, ReportConfig, ReportFormat, ReportRow, SortKey, TimeUnit};
pub use stats::Statistics;

/// A single call duration in seconds.
pub type Sample = f64;
