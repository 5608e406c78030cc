//! Запуск клиента: проверка Java, затем отсоединённый процесс
//!
//! После запуска лаунчер процессом не управляет, код выхода только пишется
//! в лог. Одновременно идёт один запуск: второй вызов во время проверки
//! или старта первого получает `LaunchInProgress`.

use crate::args::CommandArgs;
use crate::context::LaunchContext;
use crate::java::{JavaProbe, JavaStatus};
use crate::platform::HostPlatform;
use crate::redact::redact;
use microbot_core::{LauncherError, Result};
use serde::Serialize;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x08000000;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x00000008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x00000200;

/// User-facing side of a launch: the two failures the user gets to see
pub trait LaunchReporter: Send + Sync {
    /// No usable Java; offer `download_url`
    fn java_missing(&self, detail: &str, download_url: &str);

    fn launch_failed(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Launched {
    pub pid: u32,
}

pub struct ProcessSupervisor {
    probe: JavaProbe,
    java_command: PathBuf,
    platform: HostPlatform,
    debug_output: bool,
    probe_timeout: Duration,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ProcessSupervisor {
    pub fn new(ctx: &LaunchContext) -> Self {
        Self {
            probe: JavaProbe::new(&ctx.java_command),
            java_command: ctx.java_command.clone(),
            platform: ctx.platform,
            debug_output: ctx.debug_output,
            probe_timeout: ctx.probe_timeout,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_probe(mut self, probe: JavaProbe) -> Self {
        self.probe = probe;
        self
    }

    pub async fn check_java(&self) -> JavaStatus {
        self.probe.check(self.probe_timeout).await
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard(&self.in_flight))
            .map_err(|_| LauncherError::LaunchInProgress)
    }

    /// Probe for Java, then start the client detached from the launcher
    pub async fn launch(
        &self,
        args: &CommandArgs,
        reporter: &dyn LaunchReporter,
    ) -> Result<Launched> {
        let _guard = self.begin().inspect_err(|_| {
            log::warn!("Launch requested while another launch is in progress");
        })?;

        log::info!("Checking Java availability...");
        let status = self.check_java().await;
        if !status.installed {
            log::warn!("Java is not available: {}", status.detail);
            reporter.java_missing(&status.detail, &self.platform.java_download_url());
            return Err(LauncherError::JavaNotFound(status.detail));
        }

        log::info!("Java is installed, running the JAR...");
        log::info!("{} {}", self.java_command.display(), redact(args.as_slice()));

        match self.spawn_detached(args) {
            Ok(pid) => {
                log::info!("Client started with PID: {}", pid);
                Ok(Launched { pid })
            }
            Err(e) => {
                log::error!("Failed to spawn client process: {}", e);
                reporter.launch_failed(&e.to_string());
                Err(LauncherError::SpawnFailed(e.to_string()))
            }
        }
    }

    fn spawn_detached(&self, args: &CommandArgs) -> std::io::Result<u32> {
        let mut cmd = Command::new(&self.java_command);
        cmd.args(args.as_slice()).stdin(Stdio::null());

        if self.debug_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // own process group: the client survives the launcher's terminal going away
            cmd.process_group(0);
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            let mut flags = DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP;
            if !self.debug_output && self.platform.uses_hidden_console() {
                flags |= CREATE_NO_WINDOW;
            }
            cmd.creation_flags(flags);
        }

        let mut child = cmd.spawn()?;
        let pid = child.id();

        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(stderr, "stderr");
        }

        thread::spawn(move || match child.wait() {
            Ok(status) => match status.code() {
                Some(code) => log::info!("Client exited with code {}", code),
                None => log::info!("Client terminated by signal ({})", status),
            },
            Err(e) => log::warn!("Failed to wait for client process: {}", e),
        });

        Ok(pid)
    }
}

fn forward_output<R: Read + Send + 'static>(stream: R, label: &'static str) {
    thread::spawn(move || {
        let reader = BufReader::new(stream);
        for line in reader.lines().map_while(|l| l.ok()) {
            log::info!("[{}] {}", label, line);
        }
    });
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl LaunchReporter for RecordingReporter {
        fn java_missing(&self, _detail: &str, download_url: &str) {
            self.events.lock().unwrap().push(format!("java_missing {}", download_url));
        }

        fn launch_failed(&self, message: &str) {
            self.events.lock().unwrap().push(format!("launch_failed {}", message));
        }
    }

    fn supervisor(java_command: &str, probe: JavaProbe, debug_output: bool) -> ProcessSupervisor {
        let mut ctx = LaunchContext::with_dirs("/tmp/.microbot", "/tmp/.runelite", &["app"]);
        ctx.java_command = PathBuf::from(java_command);
        ctx.debug_output = debug_output;
        ctx.probe_timeout = Duration::from_secs(5);
        ProcessSupervisor::new(&ctx).with_probe(probe)
    }

    fn ok_probe() -> JavaProbe {
        JavaProbe::with_command("true", Vec::<String>::new())
    }

    fn args() -> CommandArgs {
        CommandArgs::from(vec![
            "-jar".to_string(),
            "client.jar".to_string(),
            "-proxy=socks5://user:pass@h:1".to_string(),
        ])
    }

    #[tokio::test]
    async fn test_missing_java_prompts_and_spawns_nothing() {
        let sup = supervisor("true", JavaProbe::new("no-such-java-7c1e"), false);
        let reporter = RecordingReporter::default();

        let result = sup.launch(&args(), &reporter).await;

        assert!(matches!(result, Err(LauncherError::JavaNotFound(_))));
        let events = reporter.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("java_missing https://adoptium.net/"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let sup = supervisor("no-such-java-7c1e", ok_probe(), false);
        let reporter = RecordingReporter::default();

        let result = sup.launch(&args(), &reporter).await;

        assert!(matches!(result, Err(LauncherError::SpawnFailed(_))));
        let events = reporter.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("launch_failed"));
    }

    #[tokio::test]
    async fn test_successful_launch() {
        let sup = supervisor("true", ok_probe(), false);
        let reporter = RecordingReporter::default();

        let launched = sup.launch(&args(), &reporter).await.unwrap();

        assert!(launched.pid > 0);
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_debug_output_launch() {
        let sup = supervisor("echo", ok_probe(), true);
        let reporter = RecordingReporter::default();
        assert!(sup.launch(&args(), &reporter).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_launch_rejected_while_probing() {
        let slow_probe = JavaProbe::with_command("sleep", ["0.3"]);
        let sup = supervisor("true", slow_probe, false);
        let reporter = RecordingReporter::default();
        let args = args();

        let (first, second) = tokio::join!(sup.launch(&args, &reporter), sup.launch(&args, &reporter));

        assert!(first.is_ok());
        assert!(matches!(second, Err(LauncherError::LaunchInProgress)));

        // guard released once the first launch finished
        assert!(sup.launch(&args, &reporter).await.is_ok());
    }
}
