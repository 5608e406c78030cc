use chrono::{DateTime, Local};
use microbot_core::{LauncherError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

pub static BASE_DIR: OnceLock<PathBuf> = OnceLock::new();

/// `base` is the microbot directory (`~/.microbot`)
pub fn init_paths(base: PathBuf) -> Result<()> {
    BASE_DIR
        .set(base.clone())
        .map_err(|_| LauncherError::InvalidConfig("BASE_DIR already set".to_string()))?;

    fs::create_dir_all(&base)?;
    fs::create_dir_all(base.join("logs"))?;

    Ok(())
}

pub fn get_base_dir() -> &'static Path {
    BASE_DIR.get().expect("BASE_DIR not initialized")
}

/// `launcher_<дата>-<время>.log`; под этот шаблон попадает очистка старых логов
pub fn session_log_name(started: DateTime<Local>) -> String {
    format!("launcher_{}.log", started.format("%Y%m%d-%H%M%S"))
}

pub fn logs_dir() -> PathBuf {
    get_base_dir().join("logs")
}

/// Удаляет `launcher_*.log` старше `keep_days` дней
pub fn cleanup_old_logs(keep_days: u64) -> Result<usize> {
    cleanup_logs_in(&logs_dir(), keep_days)
}

fn cleanup_logs_in(logs_path: &Path, keep_days: u64) -> Result<usize> {
    if !logs_path.exists() {
        return Ok(0);
    }

    let now = SystemTime::now();
    let cutoff = Duration::from_secs(keep_days * 24 * 60 * 60);
    let mut deleted_count = 0;

    for entry in fs::read_dir(logs_path)?.flatten() {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !(name.starts_with("launcher_") && name.ends_with(".log")) {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());

        if matches!(age, Some(age) if age > cutoff) {
            match fs::remove_file(&path) {
                Ok(()) => deleted_count += 1,
                Err(e) => log::warn!("Failed to delete old log {:?}: {}", path, e),
            }
        }
    }

    if deleted_count > 0 {
        log::info!("Cleaned up {} old log files", deleted_count);
    }
    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_only_touches_old_launcher_logs() {
        let dir = std::env::temp_dir().join(format!("microbot_logs_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let old_log = dir.join("launcher_1.log");
        let fresh_log = dir.join("launcher_2.log");
        let other = dir.join("client.txt");
        for path in [&old_log, &fresh_log, &other] {
            fs::write(path, "x").unwrap();
        }

        let long_ago = SystemTime::now() - Duration::from_secs(30 * 24 * 60 * 60);
        for path in [&old_log, &other] {
            fs::File::options()
                .write(true)
                .open(path)
                .unwrap()
                .set_modified(long_ago)
                .unwrap();
        }

        assert_eq!(cleanup_logs_in(&dir, 7).unwrap(), 1);
        assert!(!old_log.exists());
        assert!(fresh_log.exists());
        assert!(other.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_cleanup_missing_dir() {
        let dir = std::env::temp_dir().join(format!("microbot_logs_{}", uuid::Uuid::new_v4()));
        assert_eq!(cleanup_logs_in(&dir, 7).unwrap(), 0);
    }

    #[test]
    fn test_session_log_is_picked_up_by_cleanup() {
        use chrono::TimeZone;

        let started = Local.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap();
        let name = session_log_name(started);
        assert_eq!(name, "launcher_20240501-090307.log");

        let dir = std::env::temp_dir().join(format!("microbot_logs_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let log = dir.join(&name);
        fs::write(&log, "x").unwrap();
        fs::File::options()
            .write(true)
            .open(&log)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(30 * 24 * 60 * 60))
            .unwrap();

        assert_eq!(cleanup_logs_in(&dir, 7).unwrap(), 1);
        let _ = fs::remove_dir_all(dir);
    }
}
