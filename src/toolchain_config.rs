// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ArgMatches;
use serde::Deserialize;
use std::path::PathBuf;

/// Contents of the `[toolchain]` table of an `arcbench-toolchain.toml` file.
/// Everything is optional; command line flags take precedence and anything
/// still unresolved falls back to a `PATH` lookup.
#[derive(Deserialize, Clone)]
pub struct ToolchainConfig {
    /// Directory containing the buildable design project, i.e. the target of
    /// `make -C`.
    pub project_dir: Option<String>,

    /// Path to the build tool (`make` by default).
    pub make_path: Option<String>,

    /// Path to the statistical profiler (`perf` by default).
    pub perf_path: Option<String>,

    /// Path to the shell that `perf` wraps around the simulator invocation
    /// (`bash` by default).
    pub bash_path: Option<String>,
}

/// Resolved locations of the external collaborators the driver invokes.
#[derive(Debug, Clone)]
pub struct Tools {
    pub make: PathBuf,
    pub perf: PathBuf,
    pub bash: PathBuf,
    pub project_dir: PathBuf,
}

fn resolve_tool(
    config_value: Option<&str>,
    name: &'static str,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = config_value {
        return Ok(PathBuf::from(path));
    }
    which::which(name).with_context(|| format!("{} not found on PATH", name))
}

/// Resolves tool locations from the toolchain config with a `PATH` fallback,
/// and the project directory from the command line flag, the config, or the
/// conventional `<cwd>/rocket` location, in that order.
pub fn resolve_tools(
    matches: &ArgMatches,
    config: &Option<ToolchainConfig>,
) -> anyhow::Result<Tools> {
    let config = config.as_ref();
    let make = resolve_tool(config.and_then(|c| c.make_path.as_deref()), "make")?;
    let perf = resolve_tool(config.and_then(|c| c.perf_path.as_deref()), "perf")?;
    let bash = resolve_tool(config.and_then(|c| c.bash_path.as_deref()), "bash")?;

    let project_dir = if let Some(dir) = matches.get_one::<String>("project_dir") {
        PathBuf::from(dir)
    } else if let Some(dir) = config.and_then(|c| c.project_dir.as_deref()) {
        PathBuf::from(dir)
    } else {
        std::env::current_dir()
            .context("cannot determine current directory")?
            .join("rocket")
    };

    Ok(Tools {
        make,
        perf,
        bash,
        project_dir,
    })
}
