//! Настройки памяти JVM (-Xms / -Xmx)
//!
//! Значение пользователя фиксирует обе границы одним размером. Встроенное
//! значение по умолчанию остаётся несимметричной парой 512m / 1g.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub const DEFAULT_XMS_VALUE: &str = "512m";
pub const DEFAULT_XMX_VALUE: &str = "1g";
pub const DEFAULT_CLIENT_RAM: &str = DEFAULT_XMX_VALUE;

static RE_MEMORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)([mg])$").expect("RE_MEMORY regex should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Megabytes,
    Gigabytes,
}

impl MemoryUnit {
    pub fn suffix(&self) -> char {
        match self {
            MemoryUnit::Megabytes => 'm',
            MemoryUnit::Gigabytes => 'g',
        }
    }
}

/// Размер памяти в формате JVM ("2g", "512m")
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySpec {
    amount: f64,
    unit: MemoryUnit,
}

impl MemorySpec {
    /// Parses a free-form memory string. Invalid, zero or negative values yield `None`.
    pub fn normalize(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim().to_lowercase();
        let caps = RE_MEMORY.captures(&trimmed)?;

        let amount: f64 = caps[1].parse().ok()?;
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }

        let unit = match &caps[2] {
            "g" => MemoryUnit::Gigabytes,
            _ => MemoryUnit::Megabytes,
        };

        Some(Self { amount, unit })
    }

    pub fn megabytes(&self) -> f64 {
        match self.unit {
            MemoryUnit::Megabytes => self.amount,
            MemoryUnit::Gigabytes => self.amount * 1024.0,
        }
    }

    /// `-Xms` and `-Xmx` pinned to the same value
    pub fn jvm_args(&self) -> Vec<String> {
        vec![format!("-Xms{}", self), format!("-Xmx{}", self)]
    }
}

impl fmt::Display for MemorySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

/// Аргументы памяти по умолчанию (-Xms512m -Xmx1g)
pub fn default_memory_args() -> Vec<String> {
    vec![
        format!("-Xms{}", DEFAULT_XMS_VALUE),
        format!("-Xmx{}", DEFAULT_XMX_VALUE),
    ]
}

/// Finds `--ram <value>` or `--ram=<value>` in the launcher's own arguments
pub fn extract_ram_value<S: AsRef<str>>(argv: &[S]) -> Option<String> {
    let mut iter = argv.iter().map(AsRef::as_ref);
    while let Some(arg) = iter.next() {
        if arg == "--ram" {
            return iter.next().map(str::to_string);
        }
        if let Some(value) = arg.strip_prefix("--ram=") {
            return Some(value.to_string());
        }
    }
    None
}

fn parse_with_warning(raw: Option<&str>, context_label: &str) -> Option<MemorySpec> {
    let raw = raw.filter(|r| !r.trim().is_empty())?;
    let spec = MemorySpec::normalize(Some(raw));
    if spec.is_none() {
        log::warn!(
            "Invalid {} value \"{}\". Falling back to default memory settings.",
            context_label,
            raw
        );
    }
    spec
}

/// Выбранные аргументы памяти и их источник (для логов)
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySelection {
    pub args: Vec<String>,
    pub source: String,
}

/// Политика памяти лаунчера: `--ram` из командной строки или встроенный default
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicy {
    cli_memory: Option<MemorySpec>,
}

impl MemoryPolicy {
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Self {
        let cli_value = extract_ram_value(argv);
        let cli_memory = parse_with_warning(cli_value.as_deref(), "--ram");
        if let Some(spec) = cli_memory {
            log::info!("Launcher RAM override: {} ({} MB)", spec, spec.megabytes());
        }
        Self { cli_memory }
    }

    pub fn cli_memory(&self) -> Option<MemorySpec> {
        self.cli_memory
    }

    fn launcher_default(&self) -> MemorySelection {
        match self.cli_memory {
            Some(spec) => MemorySelection {
                args: spec.jvm_args(),
                source: format!("CLI --ram ({})", spec),
            },
            None => MemorySelection {
                args: default_memory_args(),
                source: format!("launcher default ({})", DEFAULT_CLIENT_RAM),
            },
        }
    }

    /// A valid client preference wins; anything else falls back to the launcher default
    pub fn select(&self, requested: Option<&str>) -> MemorySelection {
        match parse_with_warning(requested, "client RAM preference") {
            Some(spec) => MemorySelection {
                args: spec.jvm_args(),
                source: format!("client preference ({})", spec),
            },
            None => self.launcher_default(),
        }
    }
}
