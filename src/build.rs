// SPDX-License-Identifier: Apache-2.0

//! Invokes the build tool for one variant and captures its combined output
//! to `<build_dir>/build.log`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::BenchError;
use crate::toolchain_config::Tools;

/// Make variables appended to the build invocation as `KEY=value` arguments.
/// The set of keys is fixed here; callers cannot smuggle arbitrary variables
/// into the build command line.
#[derive(Debug, Clone, Default)]
pub struct MakeVars {
    pub sim: Option<String>,
    pub arcilator_args: Option<String>,
}

impl MakeVars {
    fn to_assignments(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(sim) = &self.sim {
            out.push(format!("SIM={}", sim));
        }
        if let Some(args) = &self.arcilator_args {
            out.push(format!("ARCILATOR_ARGS={}", args));
        }
        out
    }
}

/// The build tool drops the simulator binary at a conventional location
/// inside the build directory.
pub fn binary_path(build_dir: &Path, design: &str) -> PathBuf {
    build_dir.join(format!("{}-main", design))
}

fn make_args(tools: &Tools, config: &str, build_dir: &Path, vars: &MakeVars) -> Vec<String> {
    let mut args = vec![
        "-C".to_string(),
        tools.project_dir.display().to_string(),
        "build".to_string(),
        format!("CONFIG={}", config),
        format!("BUILD_DIR={}", build_dir.display()),
    ];
    args.extend(vars.to_assignments());
    args
}

/// Builds the design into `build_dir` and returns the path to the produced
/// binary, verified to exist.
///
/// The invoked command line and the child's interleaved stdout/stderr are
/// appended to `<build_dir>/build.log`, so repeated builds into the same
/// directory keep a transcript of every invocation.
pub fn build_design(
    tools: &Tools,
    design: &str,
    config: &str,
    build_dir: &Path,
    vars: &MakeVars,
) -> Result<PathBuf, BenchError> {
    std::fs::create_dir_all(build_dir)?;
    let build_log = build_dir.join("build.log");

    let args = make_args(tools, config, build_dir, vars);
    let command_line = format!("{} {}", tools.make.display(), args.join(" "));

    let mut log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&build_log)?;
    writeln!(log_file, "\n\n{}", "-".repeat(80))?;
    writeln!(log_file, "Command: {}", command_line)?;

    log::info!("Running command: {}", command_line);
    // Hand the log file to the child for both streams so their interleaving
    // is preserved.
    let status = Command::new(&tools.make)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_file.try_clone()?))
        .stderr(Stdio::from(log_file.try_clone()?))
        .status()?;

    if !status.success() {
        println!("Build failed. Check the build log at: {}", build_log.display());
        return Err(BenchError::Build {
            log: build_log,
            status,
        });
    }

    println!("Build log saved to: {}", build_log.display());

    let binary = binary_path(build_dir, design);
    if !binary.exists() {
        return Err(BenchError::BinaryMissing { binary });
    }
    Ok(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fake_tools() -> Tools {
        Tools {
            make: PathBuf::from("/usr/bin/make"),
            perf: PathBuf::from("/usr/bin/perf"),
            bash: PathBuf::from("/bin/bash"),
            project_dir: PathBuf::from("/work/rocket"),
        }
    }

    #[test]
    fn test_binary_path_follows_convention() {
        assert_eq!(
            binary_path(Path::new("/work/build/dedup"), "rocket"),
            PathBuf::from("/work/build/dedup/rocket-main")
        );
    }

    #[test]
    fn test_make_args_with_all_vars() {
        let vars = MakeVars {
            sim: Some("arcilator".to_string()),
            arcilator_args: Some("--dedup=true".to_string()),
        };
        let args = make_args(&fake_tools(), "large-master", Path::new("/work/build/dedup"), &vars);
        assert_eq!(
            args.iter().map(String::as_str).collect::<Vec<_>>(),
            vec![
                "-C",
                "/work/rocket",
                "build",
                "CONFIG=large-master",
                "BUILD_DIR=/work/build/dedup",
                "SIM=arcilator",
                "ARCILATOR_ARGS=--dedup=true",
            ]
        );
    }

    #[test]
    fn test_make_args_without_vars() {
        let args = make_args(
            &fake_tools(),
            "small",
            Path::new("/tmp/b"),
            &MakeVars::default(),
        );
        assert_eq!(
            args.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["-C", "/work/rocket", "build", "CONFIG=small", "BUILD_DIR=/tmp/b"]
        );
    }
}
