use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Proxy chosen by the user for this session.
///
/// `proxy_ip` is either `host:port`, `host:port:user:pass` or a full
/// `scheme://[user:pass@]host:port` URI. Anything that is not a JSON string
/// deserializes to `None` and means "no proxy".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySpec {
    #[serde(default, deserialize_with = "string_or_none")]
    pub proxy_ip: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub proxy_type: Option<String>,
}

impl ProxySpec {
    pub fn new(proxy_ip: impl Into<String>) -> Self {
        Self {
            proxy_ip: Some(proxy_ip.into()),
            proxy_type: None,
        }
    }

    pub fn with_type(mut self, proxy_type: impl Into<String>) -> Self {
        self.proxy_type = Some(proxy_type.into());
        self
    }

    /// Trimmed proxy value, `None` when missing or blank
    pub fn value(&self) -> Option<&str> {
        self.proxy_ip
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

/// null и прочие не-строки превращаются в пустую строку, числа в текст
fn string_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// RFC 3339 строка или миллисекунды Unix; всё остальное считается отсутствующей датой
fn lenient_datetime<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        serde_json::Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// Аккаунт Jagex из accounts.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub account_id: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub display_name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub session_id: String,
    #[serde(default, deserialize_with = "string_or_none", skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_on: Option<DateTime<Utc>>,
}

impl Account {
    /// Non-empty profile name attached to this account
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// Как запускается клиент
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchMode {
    /// Jagex account session, credentials come from credentials.properties
    #[default]
    Account,
    /// Plain login without a Jagex account
    NoJagexAccount,
}

impl LaunchMode {
    /// Extra client flag for this mode
    pub fn client_flag(&self) -> Option<&'static str> {
        match self {
            LaunchMode::Account => None,
            LaunchMode::NoJagexAccount => Some("-clean-jagex-launcher"),
        }
    }
}

/// Запрос на запуск клиента, создаётся на каждое нажатие "Play"
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub client_version: String,
    pub proxy: Option<ProxySpec>,
    pub account: Option<Account>,
    pub ram_preference: Option<String>,
    pub mode: LaunchMode,
}

impl LaunchRequest {
    pub fn new(client_version: impl Into<String>) -> Self {
        Self {
            client_version: client_version.into(),
            ..Default::default()
        }
    }

    pub fn with_proxy(mut self, proxy: ProxySpec) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_ram(mut self, ram: impl Into<String>) -> Self {
        self.ram_preference = Some(ram.into());
        self
    }

    pub fn with_mode(mut self, mode: LaunchMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxy_spec_non_string_ip_is_none() {
        let spec: ProxySpec = serde_json::from_str(r#"{"proxyIp": 1080, "proxyType": "socks"}"#).unwrap();
        assert_eq!(spec.proxy_ip, None);
        assert_eq!(spec.proxy_type.as_deref(), Some("socks"));
        assert_eq!(spec.value(), None);
    }

    #[test]
    fn test_proxy_spec_blank_value() {
        assert_eq!(ProxySpec::new("   ").value(), None);
        assert_eq!(ProxySpec::new(" 1.2.3.4:1080 ").value(), Some("1.2.3.4:1080"));
    }

    #[test]
    fn test_account_deserialize() {
        let account: Account = serde_json::from_str(
            r#"{"accountId":"42","displayName":"Zezima","sessionId":"s","createdOn":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(account.account_id, "42");
        assert_eq!(account.profile(), None);
        assert!(account.created_on.is_some());
    }

    #[test]
    fn test_account_tolerates_nulls_and_odd_values() {
        let account: Account = serde_json::from_str(
            r#"{"accountId":7,"displayName":null,"sessionId":null,"profile":null,"createdOn":"yesterday"}"#,
        )
        .unwrap();
        assert_eq!(account.account_id, "7");
        assert_eq!(account.display_name, "");
        assert_eq!(account.session_id, "");
        assert_eq!(account.profile, None);
        assert_eq!(account.created_on, None);

        let account: Account =
            serde_json::from_str(r#"{"accountId":"8","createdOn":1714557600000}"#).unwrap();
        assert_eq!(
            account.created_on.map(|dt| dt.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_launch_mode_flag() {
        assert_eq!(LaunchMode::Account.client_flag(), None);
        assert_eq!(
            LaunchMode::NoJagexAccount.client_flag(),
            Some("-clean-jagex-launcher")
        );
    }
}
