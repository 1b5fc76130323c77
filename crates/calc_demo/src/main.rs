//! Calculator profiling demo
//!
//! Wraps a calculator in the call-timing proxy, exercises it, and prints the
//! recorded series, per-method statistics and a summary report.
//!
//! Usage: `calc_demo [ADD_CALLS] [MULTIPLY_CALLS]`
//!
//! The report honours `PROFILING_REPORT_FORMAT`, `PROFILING_REPORT_UNIT`,
//! `PROFILING_REPORT_SORT` and `PROFILING_REPORT_LIMIT`; logging honours
//! `RUST_LOG`.

mod calculator;

use anyhow::{Context, Result};
use calculator::{Arithmetic, Calculator};
use proxy::wrap;
use registry::{global_registry, Report, ReportConfig};
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn parse_count(arg: Option<String>, default: i64, what: &str) -> Result<i64> {
    match arg {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{what} must be an integer, got {raw:?}")),
        None => Ok(default),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let add_calls = parse_count(args.next(), 5, "ADD_CALLS")?;
    let multiply_calls = parse_count(args.next(), 3, "MULTIPLY_CALLS")?;
    let config = ReportConfig::from_env().context("invalid report configuration")?;

    tracing::info!(add_calls, multiply_calls, "starting calculator demo");

    let calc = wrap(Calculator::new());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Performing calculations...")?;
    for i in 0..add_calls {
        writeln!(out, "add({}, {}) = {}", i, i + 1, calc.add(i, i + 1))?;
    }
    for i in 0..multiply_calls {
        writeln!(out, "multiply({}, 2) = {}", i, calc.multiply(i, 2))?;
    }
    writeln!(out, "fibonacci(20) = {}", calc.fibonacci(20))?;

    writeln!(out, "\n--- Profiling Results ---")?;
    for key in ["Calculator.add", "Calculator.multiply"] {
        let series = registry::series(key);
        writeln!(out, "\n{} called {} times", key, series.len())?;
        writeln!(out, "Execution times: {:?}", series)?;
    }

    writeln!(out, "\n--- Statistics ---")?;
    for key in ["Calculator.add", "Calculator.multiply"] {
        let stats = registry::statistics(key);
        writeln!(out, "\n{} statistics:", key)?;
        writeln!(out, "  count: {}", stats.count)?;
        writeln!(out, "  mean: {:.6}", stats.mean)?;
        writeln!(out, "  median: {:.6}", stats.median)?;
        writeln!(out, "  std: {:.6}", stats.std_dev)?;
        writeln!(out, "  min: {:.6}", stats.min)?;
        writeln!(out, "  max: {:.6}", stats.max)?;
        writeln!(out, "  total: {:.6}", stats.total)?;
    }

    writeln!(out, "\n--- All Profiling Data ---")?;
    for (key, times) in registry::all() {
        let total: f64 = times.iter().sum();
        writeln!(out, "{}: {} calls, total time: {:.6}s", key, times.len(), total)?;
    }

    writeln!(out, "\n--- Report ---")?;
    Report::from_registry(global_registry(), &config)
        .render(&mut out)
        .context("failed to render report")?;

    tracing::info!(methods = global_registry().len(), "demo finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(None, 5, "N").unwrap(), 5);
        assert_eq!(parse_count(Some("12".to_string()), 5, "N").unwrap(), 12);

        let err = parse_count(Some("many".to_string()), 5, "N").unwrap_err();
        assert!(err.to_string().contains("N must be an integer"));
    }
}
