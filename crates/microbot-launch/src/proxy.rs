//! Аргументы прокси для клиента
//!
//! Новые клиенты принимают один флаг `-proxy=<uri>`. Старые принимают
//! исходное значение в `-proxy=` и отдельный `-proxy-type=`. Формат
//! выбирается по версии клиента.

use crate::args::CommandArgs;
use microbot_core::{LauncherError, ProxySpec, Result};
use semver::Version;

pub const DEFAULT_PROXY_SCHEME: &str = "socks5";

/// First client version that understands `-proxy=<uri>`
pub const URI_PROXY_MIN_VERSION: &str = "1.9.0";

pub trait ProxyArgStrategy: Send + Sync {
    /// Appends proxy flags. On error `args` is left untouched.
    fn append(&self, args: &mut CommandArgs, proxy: Option<&ProxySpec>) -> Result<()>;
}

/// `-proxy=socks5://[user:pass@]host:port`
#[derive(Debug, Clone, Copy, Default)]
pub struct UriProxyArgs;

/// `-proxy=<raw>` + `-proxy-type=<type>`
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyProxyArgs;

impl ProxyArgStrategy for UriProxyArgs {
    fn append(&self, args: &mut CommandArgs, proxy: Option<&ProxySpec>) -> Result<()> {
        let Some(raw) = proxy.and_then(ProxySpec::value) else {
            return Ok(());
        };

        if raw.contains("://") {
            args.push(format!("-proxy={}", raw));
            return Ok(());
        }

        let parts: Vec<&str> = raw.split(':').collect();
        let uri = match parts.len() {
            2 => {
                let (host, port) = host_and_port(&parts)?;
                format!("{}://{}:{}", DEFAULT_PROXY_SCHEME, host, port)
            }
            n if n >= 4 => {
                let (host, port) = host_and_port(&parts)?;
                let user = urlencoding::encode(parts[2]);
                let pass = urlencoding::encode(&parts[3..].join(":")).into_owned();
                format!("{}://{}:{}@{}:{}", DEFAULT_PROXY_SCHEME, user, pass, host, port)
            }
            _ => {
                // Passed through as-is, the client decides what to do with it
                log::warn!(
                    "Unrecognized proxy format ({} segments), passing it through unchanged",
                    parts.len()
                );
                format!("{}://{}", DEFAULT_PROXY_SCHEME, raw)
            }
        };

        args.push(format!("-proxy={}", uri));
        Ok(())
    }
}

impl ProxyArgStrategy for LegacyProxyArgs {
    fn append(&self, args: &mut CommandArgs, proxy: Option<&ProxySpec>) -> Result<()> {
        let Some(proxy) = proxy else {
            return Ok(());
        };
        let Some(raw) = proxy.value() else {
            return Ok(());
        };

        args.push(format!("-proxy={}", raw));
        if let Some(proxy_type) = proxy.proxy_type.as_deref().filter(|t| !t.trim().is_empty()) {
            args.push(format!("-proxy-type={}", proxy_type.trim()));
        }
        Ok(())
    }
}

/// Host and port are not validated beyond being present; the client reports
/// anything it cannot connect to.
fn host_and_port<'a>(parts: &[&'a str]) -> Result<(&'a str, &'a str)> {
    let (host, port) = (parts[0], parts[1]);
    if host.trim().is_empty() || port.trim().is_empty() {
        return Err(LauncherError::InvalidProxy(
            "cannot build proxy URI without host and port".to_string(),
        ));
    }
    Ok((host, port))
}

/// Appends the proxy flag in the current URI format
pub fn add_proxy_args(args: &mut CommandArgs, proxy: Option<&ProxySpec>) -> Result<()> {
    UriProxyArgs.append(args, proxy)
}

/// Формат флагов прокси
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProxyFormat {
    /// Choose by client version
    #[default]
    Auto,
    Uri,
    Legacy,
}

impl ProxyFormat {
    pub fn for_client(client_version: &str) -> Self {
        match (parse_version(client_version), parse_version(URI_PROXY_MIN_VERSION)) {
            (Some(version), Some(min)) if version < min => ProxyFormat::Legacy,
            _ => ProxyFormat::Uri,
        }
    }

    pub fn strategy(self, client_version: &str) -> &'static dyn ProxyArgStrategy {
        match self {
            ProxyFormat::Auto => ProxyFormat::for_client(client_version).strategy(client_version),
            ProxyFormat::Uri => &UriProxyArgs,
            ProxyFormat::Legacy => &LegacyProxyArgs,
        }
    }
}

/// Парсинг версии клиента в semver ("v1.9", "1.9.8.1" не поддерживается)
fn parse_version(version: &str) -> Option<Version> {
    let cleaned = version.trim().trim_start_matches('v');
    if let Ok(v) = Version::parse(cleaned) {
        return Some(v);
    }

    // 1.9 -> 1.9.0
    if cleaned.split('.').count() == 2 {
        return Version::parse(&format!("{}.0", cleaned)).ok();
    }

    None
}
