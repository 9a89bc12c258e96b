// SPDX-License-Identifier: Apache-2.0

//! Runs a built simulator binary under `perf stat` and captures the report.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BenchError;
use crate::toolchain_config::Tools;

fn perf_args(
    bash: &Path,
    binary: &Path,
    benchmark: &Path,
    perf_output: &Path,
    repeats: u32,
) -> Vec<String> {
    vec![
        "stat".to_string(),
        "-r".to_string(),
        repeats.to_string(),
        "-o".to_string(),
        perf_output.display().to_string(),
        "-S".to_string(),
        bash.display().to_string(),
        "-c".to_string(),
        format!("{} --arcs {}", binary.display(), benchmark.display()),
    ]
}

/// Report file name derived from the binary name, e.g. `rocket-main.perf`.
pub fn report_path(output_dir: &Path, binary: &Path) -> PathBuf {
    let stem = binary
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "binary".to_string());
    output_dir.join(format!("{}.perf", stem))
}

/// Profiles `binary` against `benchmark`, repeating the run `repeats` times,
/// and writes the aggregated report to `<output_dir>/<binary_stem>.perf`.
/// Returns the report path.
///
/// The binary's own stdout/stderr during the profiled runs is captured but
/// not persisted; only the profiler's report survives. On failure the
/// profiler's stderr is printed before the error is returned.
pub fn profile_binary(
    tools: &Tools,
    binary: &Path,
    benchmark: &Path,
    output_dir: &Path,
    repeats: u32,
) -> Result<PathBuf, BenchError> {
    std::fs::create_dir_all(output_dir)?;
    let perf_output = report_path(output_dir, binary);

    let args = perf_args(&tools.bash, binary, benchmark, &perf_output, repeats);
    log::info!("Running command: {} {}", tools.perf.display(), args.join(" "));

    let output = Command::new(&tools.perf).args(&args).output()?;
    if !output.status.success() {
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(BenchError::ProfileRun {
            status: output.status,
        });
    }

    Ok(perf_output)
}

/// Prints the report location and the report text verbatim.
pub fn print_report(perf_output: &Path) -> Result<(), BenchError> {
    println!("Perf statistics saved to: {}", perf_output.display());
    let report = std::fs::read_to_string(perf_output)?;
    println!("{}", report);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_path_uses_binary_stem() {
        assert_eq!(
            report_path(Path::new("/b/dedup"), Path::new("/b/dedup/rocket-main")),
            PathBuf::from("/b/dedup/rocket-main.perf")
        );
    }

    #[test]
    fn test_perf_args_shape() {
        let args = perf_args(
            Path::new("/bin/bash"),
            Path::new("/b/dedup/rocket-main"),
            Path::new("/w/benchmarks/dhrystone.riscv"),
            Path::new("/b/dedup/rocket-main.perf"),
            10,
        );
        assert_eq!(
            args.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "stat",
                "-r",
                "10",
                "-o",
                "/b/dedup/rocket-main.perf",
                "-S",
                "/bin/bash",
                "-c",
                "/b/dedup/rocket-main --arcs /w/benchmarks/dhrystone.riscv",
            ]
        );
    }
}
