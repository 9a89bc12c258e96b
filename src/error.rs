// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::process::ExitStatus;

/// Failure modes of the comparison pipeline. Every variant corresponds to an
/// external command misbehaving; this driver has no failure modes of its own.
#[derive(Debug)]
pub enum BenchError {
    /// The build tool exited non-zero. The build log retains whatever output
    /// preceded the failure.
    Build { log: PathBuf, status: ExitStatus },
    /// The build tool exited zero but the binary named by the
    /// `<build_dir>/<design>-main` convention is not on disk.
    BinaryMissing { binary: PathBuf },
    /// The profiler, or the binary running under it, exited non-zero.
    ProfileRun { status: ExitStatus },
    /// Filesystem trouble while setting up directories or capturing output.
    Io(std::io::Error),
}

impl std::fmt::Display for BenchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BenchError::Build { log, status } => write!(
                f,
                "build failed ({}); see build log at: {}",
                status,
                log.display()
            ),
            BenchError::BinaryMissing { binary } => write!(
                f,
                "build succeeded but binary not found at: {}",
                binary.display()
            ),
            BenchError::ProfileRun { status } => {
                write!(f, "profiling run failed ({})", status)
            }
            BenchError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchError {
    fn from(e: std::io::Error) -> Self {
        BenchError::Io(e)
    }
}
