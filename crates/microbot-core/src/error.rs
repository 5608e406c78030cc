use serde::Serialize;
use thiserror::Error;

/// Информация об ошибке с подсказкой для восстановления
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Код ошибки для идентификации
    pub code: String,
    /// Человекочитаемое сообщение
    pub message: String,
    /// Подсказка для исправления
    pub recovery_hint: Option<String>,
    /// Технические детали (для логов)
    pub details: Option<String>,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            recovery_hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("Java runtime not available: {0}")]
    JavaNotFound(String),

    #[error("A launch is already in progress")]
    LaunchInProgress,

    #[error("Failed to start client process: {0}")]
    SpawnFailed(String),

    #[error("Client jar not found: {0}")]
    ClientNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl LauncherError {
    /// Возвращает информацию об ошибке с подсказкой для восстановления
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            LauncherError::Io(e) => {
                let hint = if e.kind() == std::io::ErrorKind::PermissionDenied {
                    "Check access permissions to the .microbot folder"
                } else if e.kind() == std::io::ErrorKind::NotFound {
                    "File or folder not found. Try downloading the client again"
                } else {
                    "Ensure the .microbot folder is accessible and not locked by another process"
                };
                ErrorInfo::new("IO_ERROR", format!("Filesystem error: {}", e.kind()))
                    .with_hint(hint)
                    .with_details(e.to_string())
            }
            LauncherError::Http(e) => {
                let (message, hint) = if e.is_timeout() {
                    ("Server timeout", "Check your internet connection and try again")
                } else if e.is_connect() {
                    (
                        "Failed to connect to server",
                        "Check your internet connection. The server might be temporarily unavailable",
                    )
                } else if e.status().map(|s| s.as_u16()) == Some(404) {
                    ("Resource not found", "The requested client version may have been removed")
                } else {
                    ("Network error", "Check your internet connection")
                };
                ErrorInfo::new("HTTP_ERROR", message)
                    .with_hint(hint)
                    .with_details(e.to_string())
            }
            LauncherError::Json(e) => ErrorInfo::new("JSON_ERROR", "Data processing error")
                .with_hint("A launcher file may be corrupted. Delete it and try again")
                .with_details(e.to_string()),
            LauncherError::InvalidProxy(msg) => {
                ErrorInfo::new("INVALID_PROXY", "Invalid proxy configuration")
                    .with_hint("Use host:port, host:port:user:pass or a full scheme://host:port URI")
                    .with_details(msg.clone())
            }
            LauncherError::JavaNotFound(detail) => {
                ErrorInfo::new("JAVA_NOT_FOUND", "Java is not installed")
                    .with_hint("Install a Java Development Kit (JDK) and restart the launcher")
                    .with_details(detail.clone())
            }
            LauncherError::LaunchInProgress => {
                ErrorInfo::new("LAUNCH_IN_PROGRESS", "A launch is already in progress")
                    .with_hint("Wait for the current launch to finish")
            }
            LauncherError::SpawnFailed(msg) => {
                ErrorInfo::new("SPAWN_FAILED", "Failed to start the client")
                    .with_hint("Check that Java is on your PATH and the client jar is not corrupted")
                    .with_details(msg.clone())
            }
            LauncherError::ClientNotFound(path) => {
                ErrorInfo::new("CLIENT_NOT_FOUND", format!("Client jar '{}' not found", path))
                    .with_hint("Download the client version before launching it")
            }
            LauncherError::InvalidConfig(msg) => {
                ErrorInfo::new("INVALID_CONFIG", "Invalid configuration")
                    .with_hint("Check launcher settings")
                    .with_details(msg.clone())
            }
            LauncherError::DownloadFailed(msg) => ErrorInfo::new("DOWNLOAD_FAILED", "Download failed")
                .with_hint("Check your internet connection and try again")
                .with_details(msg.clone()),
            LauncherError::ApiError(msg) => ErrorInfo::new("API_ERROR", "API error")
                .with_hint("The service may be temporarily unavailable. Try again later")
                .with_details(msg.clone()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LauncherError>;

impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Сериализуем как ErrorInfo для более полной информации
        self.to_error_info().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_codes() {
        assert_eq!(LauncherError::LaunchInProgress.to_error_info().code, "LAUNCH_IN_PROGRESS");
        let info = LauncherError::JavaNotFound("spawn java ENOENT".into()).to_error_info();
        assert_eq!(info.code, "JAVA_NOT_FOUND");
        assert_eq!(info.details.as_deref(), Some("spawn java ENOENT"));
    }

    #[test]
    fn test_serializes_as_error_info() {
        let err = LauncherError::SpawnFailed("No such file or directory".into());
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "SPAWN_FAILED");
        assert_eq!(value["details"], "No such file or directory");
        assert!(value["recovery_hint"].is_string());
    }

    #[test]
    fn test_io_error_hint_by_kind() {
        let err = LauncherError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let info = err.to_error_info();
        assert_eq!(info.code, "IO_ERROR");
        assert!(info.recovery_hint.unwrap().contains("permissions"));
    }
}
