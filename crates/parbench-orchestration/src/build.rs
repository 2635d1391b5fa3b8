//! Optional worker build step.

use std::path::Path;
use std::process::Command;

use parbench_core::error::BenchError;

/// Run `bash <script>` and fail the run unless it exits successfully.
pub fn run_build_script(script: &Path) -> Result<(), BenchError> {
    if !script.is_file() {
        return Err(BenchError::Build {
            message: format!("build script {} not found", script.display()),
            stderr: String::new(),
        });
    }

    tracing::info!(script = %script.display(), "building worker");
    let output = Command::new("bash")
        .arg(script)
        .output()
        .map_err(|e| BenchError::Build {
            message: format!("could not run bash {}: {e}", script.display()),
            stderr: String::new(),
        })?;

    if !output.status.success() {
        return Err(BenchError::Build {
            message: format!("{} exited with {}", script.display(), output.status),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    tracing::debug!(
        stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
        "build finished"
    );
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn successful_build() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("built");
        let script = dir.path().join("compile.sh");
        std::fs::write(&script, format!("touch '{}'\n", marker.display())).unwrap();

        run_build_script(&script).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn failing_build_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let script = dir.path().join("compile.sh");
        std::fs::write(&script, "echo 'mpicc: command not found' >&2\nexit 127\n").unwrap();

        match run_build_script(&script) {
            Err(BenchError::Build { stderr, .. }) => {
                assert!(stderr.contains("mpicc: command not found"));
            }
            other => panic!("expected build error, got {other:?}"),
        }
    }

    #[test]
    fn missing_script() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_build_script(&dir.path().join("nope.sh")),
            Err(BenchError::Build { .. })
        ));
    }
}
