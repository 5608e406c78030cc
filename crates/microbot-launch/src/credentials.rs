use chrono::Local;
use microbot_core::{Account, Result};
use std::path::Path;

fn render_credentials(account: &Account, stamp: &str) -> String {
    format!(
        "#Do not share this file with anyone\n\
         #{}\n\
         JX_CHARACTER_ID={}\n\
         JX_SESSION_ID={}\n\
         JX_REFRESH_TOKEN=\n\
         JX_DISPLAY_NAME={}\n\
         JX_ACCESS_TOKEN=\n",
        stamp, account.account_id, account.session_id, account.display_name
    )
}

/// Перезаписывает `credentials.properties` клиента данными аккаунта
pub async fn write_credentials(path: &Path, account: &Account) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let stamp = Local::now().format("%a %b %d %Y %H:%M:%S %z").to_string();
    tokio::fs::write(path, render_credentials(account, &stamp)).await?;

    log::info!("credentials.properties updated for {}", account.display_name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account {
            account_id: "123".into(),
            display_name: "Zezima".into(),
            session_id: "abc".into(),
            profile: None,
            created_on: None,
        }
    }

    #[test]
    fn test_render_format() {
        let content = render_credentials(&account(), "Mon Jan 01 2024 00:00:00 +0000");
        assert_eq!(
            content,
            "#Do not share this file with anyone\n\
             #Mon Jan 01 2024 00:00:00 +0000\n\
             JX_CHARACTER_ID=123\n\
             JX_SESSION_ID=abc\n\
             JX_REFRESH_TOKEN=\n\
             JX_DISPLAY_NAME=Zezima\n\
             JX_ACCESS_TOKEN=\n"
        );
    }

    #[tokio::test]
    async fn test_write_creates_parent_and_overwrites() {
        let dir = std::env::temp_dir().join(format!("microbot_creds_{}", uuid::Uuid::new_v4()));
        let path = dir.join(".runelite").join("credentials.properties");

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "JX_CHARACTER_ID=old\nJX_SESSION_ID=old\n").unwrap();

        write_credentials(&path, &account()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("#Do not share this file with anyone\n"));
        assert!(content.contains("JX_CHARACTER_ID=123\n"));
        assert!(content.contains("JX_SESSION_ID=abc\n"));
        assert!(!content.contains("old"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_write_into_missing_dir() {
        let dir = std::env::temp_dir().join(format!("microbot_creds_{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("credentials.properties");
        write_credentials(&path, &account()).await.unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_dir_all(dir);
    }
}
