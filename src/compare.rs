// SPDX-License-Identifier: Apache-2.0

//! Sequences the two build+profile pipelines and prints their reports in
//! dedup-then-nodedup order.

use std::path::PathBuf;
use std::thread;

use crate::build::{build_design, MakeVars};
use crate::error::BenchError;
use crate::profile::{print_report, profile_binary};
use crate::toolchain_config::Tools;

const SEPARATOR_WIDTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Dedup,
    NoDedup,
}

impl Variant {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Variant::Dedup => "dedup",
            Variant::NoDedup => "nodedup",
        }
    }

    /// Flags forwarded to arcilator through the build tool. The pass
    /// diagnostics flags are always on so the build logs stay comparable.
    pub fn arcilator_args(&self) -> String {
        let dedup = matches!(self, Variant::Dedup);
        format!("--dedup={} --mlir-timing --print-debug-info --mlir-pass-statistics", dedup)
    }

    fn description(&self) -> &'static str {
        match self {
            Variant::Dedup => "enabled",
            Variant::NoDedup => "disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

#[derive(Debug, Clone)]
pub struct BenchOptions {
    pub design: String,
    pub config: String,
    pub simulator: String,
    pub benchmark: PathBuf,
    pub build_root: PathBuf,
    pub repeats: u32,
    pub mode: ExecutionMode,
}

/// Builds and profiles one variant; returns the path to its perf report.
/// The report is not printed here so the caller controls output ordering.
fn run_variant(tools: &Tools, opts: &BenchOptions, variant: Variant) -> Result<PathBuf, BenchError> {
    let build_dir = opts.build_root.join(variant.dir_name());
    let vars = MakeVars {
        sim: Some(opts.simulator.clone()),
        arcilator_args: Some(variant.arcilator_args()),
    };
    let binary = build_design(tools, &opts.design, &opts.config, &build_dir, &vars)?;

    println!(
        "Running the benchmark with deduplication pass {}...",
        variant.description()
    );
    // The build directory doubles as the report output directory.
    profile_binary(tools, &binary, &opts.benchmark, &build_dir, opts.repeats)
}

fn print_separator() {
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
}

/// Runs the dedup and nodedup pipelines and prints both reports, separated
/// by a divider line. The first failure aborts the comparison; artifacts
/// from any completed phase stay on disk for inspection.
pub fn run_comparison(tools: &Tools, opts: &BenchOptions) -> Result<(), BenchError> {
    let variants = [Variant::Dedup, Variant::NoDedup];
    match opts.mode {
        ExecutionMode::Sequential => {
            for (i, variant) in variants.iter().enumerate() {
                if i > 0 {
                    print_separator();
                }
                let report = run_variant(tools, opts, *variant)?;
                print_report(&report)?;
            }
        }
        ExecutionMode::Parallel => {
            // The variants share nothing and write to distinct directories,
            // so two plain threads suffice. Reports are printed only after
            // both join, keeping the output order deterministic.
            let mut handles = Vec::new();
            for variant in variants {
                let tools = tools.clone();
                let opts = opts.clone();
                handles.push(thread::spawn(move || run_variant(&tools, &opts, variant)));
            }
            let mut reports = Vec::new();
            for handle in handles {
                reports.push(handle.join().expect("variant thread panicked")?);
            }
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    print_separator();
                }
                print_report(report)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variant_dir_names_are_distinct() {
        assert_eq!(Variant::Dedup.dir_name(), "dedup");
        assert_eq!(Variant::NoDedup.dir_name(), "nodedup");
    }

    #[test]
    fn test_arcilator_args_toggle_only_the_dedup_flag() {
        assert_eq!(
            Variant::Dedup.arcilator_args(),
            "--dedup=true --mlir-timing --print-debug-info --mlir-pass-statistics"
        );
        assert_eq!(
            Variant::NoDedup.arcilator_args(),
            "--dedup=false --mlir-timing --print-debug-info --mlir-pass-statistics"
        );
    }
}
