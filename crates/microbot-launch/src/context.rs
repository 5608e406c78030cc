use crate::java::DEFAULT_PROBE_TIMEOUT;
use crate::memory::MemoryPolicy;
use crate::platform::HostPlatform;
use crate::profile::ProfilePreferenceStore;
use crate::proxy::ProxyFormat;
use directories::BaseDirs;
use microbot_core::{LauncherError, Result};
use std::path::PathBuf;
use std::time::Duration;

const PROFILE_PREFERENCE_FILE: &str = "non-jagex-preferred-profile.json";
const ACCOUNTS_FILE: &str = "accounts.json";

/// Имя JAR-файла клиента; версия не может выводить путь за пределы каталога
pub fn client_jar_name(version: &str) -> Result<String> {
    let version = version.trim();
    if version.is_empty() || version.contains(['/', '\\', '\0']) {
        return Err(LauncherError::InvalidConfig(format!(
            "Invalid client version: {:?}",
            version
        )));
    }
    Ok(format!("microbot-{}.jar", version))
}

/// Всё, что нужно для сборки и запуска клиента.
///
/// Создаётся один раз при старте и передаётся по ссылке.
#[derive(Debug, Clone)]
pub struct LaunchContext {
    pub microbot_dir: PathBuf,
    pub runelite_dir: PathBuf,
    pub java_command: PathBuf,
    pub platform: HostPlatform,
    /// Stream client stdout/stderr into the log instead of discarding it
    pub debug_output: bool,
    pub probe_timeout: Duration,
    pub memory: MemoryPolicy,
    pub proxy_format: ProxyFormat,
}

impl LaunchContext {
    /// `~/.microbot` and `~/.runelite` under the user's home directory
    pub fn from_home<S: AsRef<str>>(argv: &[S]) -> Result<Self> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            LauncherError::InvalidConfig("Could not determine home directory".to_string())
        })?;
        Ok(Self::with_dirs(
            base_dirs.home_dir().join(".microbot"),
            base_dirs.home_dir().join(".runelite"),
            argv,
        ))
    }

    pub fn with_dirs<S: AsRef<str>>(
        microbot_dir: impl Into<PathBuf>,
        runelite_dir: impl Into<PathBuf>,
        argv: &[S],
    ) -> Self {
        Self {
            microbot_dir: microbot_dir.into(),
            runelite_dir: runelite_dir.into(),
            java_command: PathBuf::from("java"),
            platform: HostPlatform::current(),
            debug_output: cfg!(debug_assertions),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            memory: MemoryPolicy::from_argv(argv),
            proxy_format: ProxyFormat::Auto,
        }
    }

    /// `microbot-<version>.jar` inside the microbot dir
    pub fn client_jar(&self, version: &str) -> Result<PathBuf> {
        Ok(self.microbot_dir.join(client_jar_name(version)?))
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.microbot_dir.join(ACCOUNTS_FILE)
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.runelite_dir.join("credentials.properties")
    }

    pub fn profile_store(&self) -> ProfilePreferenceStore {
        ProfilePreferenceStore::new(self.microbot_dir.join(PROFILE_PREFERENCE_FILE))
    }
}
