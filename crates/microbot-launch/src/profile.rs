use microbot_core::{Account, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Имя профиля, которое клиент выбирает сам
pub const DEFAULT_PROFILE: &str = "default";

/// Содержимое файла с предпочтительным профилем (`{ "profile": "..." }`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePreference {
    #[serde(default)]
    pub profile: Option<String>,
}

/// Preferred profile for sessions without a Jagex account.
///
/// The file is written by the UI; this side only reads it.
#[derive(Debug, Clone)]
pub struct ProfilePreferenceStore {
    path: PathBuf,
}

impl ProfilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file is `Ok(None)`; unreadable or corrupt file is an error
    pub async fn load(&self) -> Result<Option<ProfilePreference>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// Picks the value for `-profile=`, if any.
///
/// The account's own profile wins. Otherwise the stored preference is used
/// unless it is empty or `"default"`. A broken preference file is logged and
/// treated as "no preference".
pub async fn resolve_profile(
    account: Option<&Account>,
    store: &ProfilePreferenceStore,
) -> Option<String> {
    if let Some(profile) = account.and_then(Account::profile) {
        return Some(profile.to_string());
    }

    let preference = match store.load().await {
        Ok(preference) => preference?,
        Err(e) => {
            log::warn!(
                "Failed to read profile preference {:?}: {}. Using client default profile",
                store.path(),
                e
            );
            return None;
        }
    };

    preference
        .profile
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty() && p != DEFAULT_PROFILE)
}
