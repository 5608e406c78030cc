use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::time::timeout;

/// Windows flag to hide console window
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Результат проверки Java
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JavaStatus {
    pub installed: bool,
    /// `java -version` output, or why the check failed
    pub detail: String,
}

impl JavaStatus {
    fn missing(detail: impl Into<String>) -> Self {
        Self {
            installed: false,
            detail: detail.into(),
        }
    }
}

/// Runs `java -version` to find out whether a usable runtime is on the PATH
#[derive(Debug, Clone)]
pub struct JavaProbe {
    program: PathBuf,
    args: Vec<OsString>,
}

impl JavaProbe {
    pub fn new(java_command: impl Into<PathBuf>) -> Self {
        Self {
            program: java_command.into(),
            args: vec![OsString::from("-version")],
        }
    }

    /// Probe with an arbitrary diagnostic command
    pub fn with_command<I, S>(program: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Never fails. `installed` is true only when the command exits with 0
    /// within `limit`; a hung command is killed.
    pub async fn check(&self, limit: Duration) -> JavaStatus {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        cmd.creation_flags(CREATE_NO_WINDOW);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                log::warn!("Java check failed to start {:?}: {}", self.program, e);
                return JavaStatus::missing(e.to_string());
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it
        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let mut detail = String::from_utf8_lossy(&output.stderr).into_owned();
                detail.push_str(&String::from_utf8_lossy(&output.stdout));
                let installed = output.status.success();
                if !installed {
                    log::warn!("Java check exited with {}", output.status);
                }
                JavaStatus {
                    installed,
                    detail: detail.trim().to_string(),
                }
            }
            Ok(Err(e)) => {
                log::warn!("Java check failed: {}", e);
                JavaStatus::missing(e.to_string())
            }
            Err(_) => {
                log::warn!("Timeout checking Java from {:?}", self.program);
                JavaStatus::missing(format!(
                    "Java check timed out after {} ms",
                    limit.as_millis()
                ))
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_successful_command() {
        let probe = JavaProbe::with_command("sh", ["-c", "echo 'openjdk version \"17.0.9\"' >&2"]);
        let status = probe.check(Duration::from_secs(5)).await;
        assert!(status.installed);
        assert!(status.detail.contains("17.0.9"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_installed() {
        let probe = JavaProbe::with_command("sh", ["-c", "exit 3"]);
        let status = probe.check(Duration::from_secs(5)).await;
        assert!(!status.installed);
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let probe = JavaProbe::new("definitely-not-a-java-binary-3f9a");
        let status = probe.check(Duration::from_secs(5)).await;
        assert!(!status.installed);
        assert!(!status.detail.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_command() {
        let probe = JavaProbe::with_command("sleep", ["5"]);
        let started = Instant::now();
        let status = probe.check(Duration::from_millis(50)).await;
        let elapsed = started.elapsed();

        assert!(!status.installed);
        assert!(status.detail.contains("timed out"));
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);

        // the killed child must not produce a second result later
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(status, JavaStatus::missing("Java check timed out after 50 ms"));
    }
}
