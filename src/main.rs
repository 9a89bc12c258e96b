// SPDX-License-Identifier: Apache-2.0

//! Command line driver that measures the effect of arcilator's arc
//! deduplication pass on simulation performance.
//!
//! The design is built twice through the project Makefile — once with
//! `--dedup=true`, once with `--dedup=false` — and each resulting simulator
//! binary is run against the benchmark under `perf stat`. Both perf reports
//! are printed to the console, separated by a divider, so the two
//! configurations can be compared side by side.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- --design rocket --config large-master \
//!     --benchmark benchmarks/dhrystone.riscv
//! $ cargo run -- --toolchain=$HOME/arcbench-toolchain.toml --parallel
//! ```

mod build;
mod compare;
mod error;
mod profile;
mod report_cli_error;
mod toolchain_config;

use clap::{Arg, ArgAction};
use serde::Deserialize;

use crate::compare::{run_comparison, BenchOptions, ExecutionMode};
use crate::report_cli_error::report_cli_error_and_exit;
use crate::toolchain_config::{resolve_tools, ToolchainConfig};

#[derive(Deserialize)]
struct ArcbenchToolchain {
    toolchain: ToolchainConfig,
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "arc-dedup-bench starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("arc-dedup-bench")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a design with the arc dedup pass on and off and profiles both under perf stat")
        .arg(
            Arg::new("toolchain")
                .long("toolchain")
                .value_name("TOOLCHAIN")
                .help("Path to an arcbench-toolchain.toml file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("design")
                .long("design")
                .value_name("DESIGN")
                .help("The design to build")
                .default_value("rocket")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("The build configuration to use")
                .default_value("large-master")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("simulator")
                .long("simulator")
                .value_name("SIMULATOR")
                .help("The simulator to build the design for")
                .default_value("arcilator")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("benchmark")
                .long("benchmark")
                .value_name("PATH")
                .help("The benchmark binary to run (default: <cwd>/benchmarks/dhrystone.riscv)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("build_root")
                .long("build-root")
                .value_name("DIR")
                .help("Parent directory for the per-variant build directories (default: <cwd>/build)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("project_dir")
                .long("project-dir")
                .value_name("DIR")
                .help("Directory containing the buildable project (default: <cwd>/rocket)")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("repeats")
                .long("repeats")
                .value_name("N")
                .help("Number of profiled runs perf aggregates over")
                .default_value("10")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Build and profile the two variants concurrently")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mut toml_path: Option<String> = matches
        .get_one::<String>("toolchain")
        .map(|s| s.to_string());

    // If there is no toolchain flag specified, but there is an
    // arcbench-toolchain.toml in the current directory, use that.
    if toml_path.is_none() {
        let cwd = std::env::current_dir().unwrap();
        let cwd_toml_path = cwd.join("arcbench-toolchain.toml");
        if cwd_toml_path.exists() {
            log::info!(
                "Using arcbench-toolchain.toml in current directory: {}",
                cwd_toml_path.display()
            );
            toml_path = Some(cwd_toml_path.to_str().unwrap().to_string());
        }
    }

    let config: Option<ToolchainConfig> = toml_path.map(|path| {
        if !std::path::Path::new(&path).exists() {
            report_cli_error_and_exit(
                "toolchain toml file does not exist",
                vec![
                    ("path", &path),
                    (
                        "working directory",
                        &std::env::current_dir().unwrap().display().to_string(),
                    ),
                ],
            );
        }
        let toml_str = match std::fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => report_cli_error_and_exit(
                "failed to read toolchain toml file",
                vec![("path", &path), ("error", &e.to_string())],
            ),
        };
        match toml::from_str::<ArcbenchToolchain>(&toml_str) {
            Ok(parsed) => parsed.toolchain,
            Err(e) => report_cli_error_and_exit(
                "failed to parse toolchain toml file",
                vec![("path", &path), ("error", &e.to_string())],
            ),
        }
    });

    let tools = match resolve_tools(&matches, &config) {
        Ok(tools) => tools,
        Err(e) => report_cli_error_and_exit(&e.to_string(), vec![]),
    };

    let cwd = std::env::current_dir().unwrap();
    let benchmark = matches
        .get_one::<String>("benchmark")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| cwd.join("benchmarks").join("dhrystone.riscv"));
    let build_root = matches
        .get_one::<String>("build_root")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| cwd.join("build"));
    let repeats_str = matches.get_one::<String>("repeats").unwrap();
    let repeats: u32 = match repeats_str.parse() {
        Ok(n) => n,
        Err(_) => report_cli_error_and_exit(
            "invalid --repeats value; expected a positive integer",
            vec![("value", repeats_str)],
        ),
    };

    let opts = BenchOptions {
        design: matches.get_one::<String>("design").unwrap().to_string(),
        config: matches.get_one::<String>("config").unwrap().to_string(),
        simulator: matches.get_one::<String>("simulator").unwrap().to_string(),
        benchmark,
        build_root,
        repeats,
        mode: if matches.get_flag("parallel") {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        },
    };

    if let Err(e) = run_comparison(&tools, &opts) {
        report_cli_error_and_exit(&e.to_string(), vec![]);
    }
}
