//! Факты о платформе: ОС и архитектура
//!
//! Нужны для скрытой консоли на Windows, флагов `--add-opens` на macOS
//! и ссылки на загрузку Java.

use serde::Serialize;

const TEMURIN_RELEASES: &str = "https://adoptium.net/temurin/releases/";
const RECOMMENDED_JAVA_MAJOR: u32 = 17;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostArch {
    X64,
    Aarch64,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostPlatform {
    pub os: HostOs,
    pub arch: HostArch,
}

/// Opens java.desktop internals the client pokes at on macOS
const MACOS_ADD_OPENS: [&str; 2] = [
    "--add-opens=java.desktop/com.apple.eawt=ALL-UNNAMED",
    "--add-opens=java.desktop/sun.awt=ALL-UNNAMED",
];

impl HostPlatform {
    pub fn new(os: HostOs, arch: HostArch) -> Self {
        Self { os, arch }
    }

    pub fn current() -> Self {
        let os = match std::env::consts::OS {
            "windows" => HostOs::Windows,
            "macos" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            _ => HostOs::Other,
        };
        let arch = match std::env::consts::ARCH {
            "x86_64" => HostArch::X64,
            "aarch64" => HostArch::Aarch64,
            _ => HostArch::Other,
        };
        Self { os, arch }
    }

    /// Windows shows a console window for java.exe unless told otherwise
    pub fn uses_hidden_console(&self) -> bool {
        self.os == HostOs::Windows
    }

    pub fn add_opens_flags(&self) -> &'static [&'static str] {
        match self.os {
            HostOs::MacOs => &MACOS_ADD_OPENS,
            _ => &[],
        }
    }

    /// Страница загрузки JDK для этой платформы
    pub fn java_download_url(&self) -> String {
        let os = match self.os {
            HostOs::Windows => "windows",
            HostOs::MacOs => "mac",
            HostOs::Linux => "linux",
            HostOs::Other => return TEMURIN_RELEASES.to_string(),
        };
        let arch = match self.arch {
            HostArch::X64 => "x64",
            HostArch::Aarch64 => "aarch64",
            HostArch::Other => return TEMURIN_RELEASES.to_string(),
        };
        format!(
            "{}?os={}&arch={}&package=jdk&version={}",
            TEMURIN_RELEASES, os, arch, RECOMMENDED_JAVA_MAJOR
        )
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::current()
    }
}
