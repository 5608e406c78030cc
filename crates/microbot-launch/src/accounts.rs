//! Аккаунты Jagex, сохранённые при входе (`accounts.json`)

use microbot_core::{Account, Result};
use std::collections::HashSet;
use std::path::Path;
use std::time::SystemTime;

const UNNAMED_ACCOUNT: &str = "Not set";

/// Newest first, one entry per display name.
///
/// Accounts without a display name are shown as "Not set" and are never
/// collapsed into each other. A missing file is an empty list.
pub async fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut accounts: Vec<Account> = serde_json::from_str(&content)?;
    // None < Some, so reversing the comparison puts undated accounts last
    accounts.sort_by(|a, b| b.created_on.cmp(&a.created_on));

    let mut seen = HashSet::new();
    let accounts: Vec<Account> = accounts
        .into_iter()
        .filter_map(|mut account| {
            if account.display_name.trim().is_empty() {
                account.display_name = UNNAMED_ACCOUNT.to_string();
                return Some(account);
            }
            seen.insert(account.display_name.clone()).then_some(account)
        })
        .collect();

    log::debug!("Loaded {} accounts from {:?}", accounts.len(), path);
    Ok(accounts)
}

pub async fn remove_accounts(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            log::info!("Removed accounts file {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Polls the accounts file for changes by modification time
#[derive(Debug, Default)]
pub struct AccountsWatcher {
    last_modified: Option<SystemTime>,
}

impl AccountsWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// True the first time the file is seen and whenever its mtime advances
    pub async fn poll(&mut self, path: &Path) -> bool {
        let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                log::debug!("Error checking accounts file {:?}: {}", path, e);
                return false;
            }
        };

        match self.last_modified {
            Some(last) if modified <= last => false,
            _ => {
                log::info!("Accounts file has been modified");
                self.last_modified = Some(modified);
                true
            }
        }
    }
}
