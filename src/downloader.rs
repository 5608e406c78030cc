//! Загрузка JAR-файлов клиента Microbot

use futures::StreamExt;
use microbot_core::{LauncherError, Result};
use microbot_launch::context::client_jar_name;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

pub const API_BASE_URL: &str = "https://microbot.cloud";
pub const FILES_BASE_URL: &str = "https://files.microbot.cloud";

const USER_AGENT: &str = concat!("microbot-launcher/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub version: String,
    pub downloaded: u64,
    pub total: u64,
    pub percent: u8,
}

pub struct ClientDownloader {
    client: reqwest::Client,
    microbot_dir: PathBuf,
    api_base: String,
    files_base: String,
}

impl ClientDownloader {
    pub fn new(microbot_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            microbot_dir: microbot_dir.into(),
            api_base: API_BASE_URL.to_string(),
            files_base: FILES_BASE_URL.to_string(),
        })
    }

    pub fn jar_path(&self, version: &str) -> Result<PathBuf> {
        Ok(self.microbot_dir.join(client_jar_name(version)?))
    }

    pub fn client_exists(&self, version: &str) -> bool {
        self.jar_path(version).is_ok_and(|path| path.is_file())
    }

    /// Имена скачанных JAR-файлов клиента (`microbot-<version>.jar`)
    pub fn list_jars(&self) -> Result<Vec<String>> {
        list_jars_in(&self.microbot_dir)
    }

    /// Latest stable client version as published by the API
    pub async fn fetch_client_version(&self) -> Result<String> {
        let url = format!("{}/api/file/client", self.api_base);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LauncherError::ApiError(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        let body = response.text().await?;
        let version = body.trim().trim_matches('"').to_string();
        if version.is_empty() {
            return Err(LauncherError::ApiError("Empty client version".to_string()));
        }
        log::info!("Latest client version: {}", version);
        Ok(version)
    }

    /// Downloads `microbot-<version>.jar` unless it is already present.
    ///
    /// The body goes to a `.part` file that is renamed into place once
    /// complete, so an interrupted download never looks like a client.
    pub async fn download_client<F>(&self, version: &str, mut on_progress: F) -> Result<PathBuf>
    where
        F: FnMut(DownloadProgress),
    {
        let target = self.jar_path(version)?;
        if target.is_file() {
            log::debug!("Client {} already downloaded", version);
            return Ok(target);
        }

        tokio::fs::create_dir_all(&self.microbot_dir).await?;
        let url = format!(
            "{}/releases/microbot/stable/microbot-{}.jar",
            self.files_base, version
        );
        log::info!("Downloading client {} from {}", version, url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            log::error!("Client download failed: {} returned {}", url, response.status());
            return Err(LauncherError::DownloadFailed(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let total = response.content_length().unwrap_or(0);
        let part_path = target.with_extension("jar.part");
        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;
        let mut last_percent = None;

        while let Some(chunk) = stream.next().await {
            let written = match chunk {
                Ok(chunk) => file
                    .write_all(&chunk)
                    .await
                    .map(|_| chunk.len())
                    .map_err(LauncherError::from),
                Err(e) => Err(e.into()),
            };
            let written = match written {
                Ok(written) => written,
                Err(e) => {
                    log::error!("Client download interrupted: {}", e);
                    drop(file);
                    let _ = tokio::fs::remove_file(&part_path).await;
                    return Err(e);
                }
            };
            downloaded += written as u64;

            let percent = percent_of(downloaded, total);
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                on_progress(DownloadProgress {
                    version: version.to_string(),
                    downloaded,
                    total,
                    percent,
                });
            }
        }

        let finished = match file.flush().await {
            Ok(()) => {
                drop(file);
                tokio::fs::rename(&part_path, &target).await
            }
            Err(e) => Err(e),
        };
        if let Err(e) = finished {
            let _ = tokio::fs::remove_file(&part_path).await;
            return Err(e.into());
        }

        log::info!("Client {} saved to {:?} ({} bytes)", version, target, downloaded);
        Ok(target)
    }
}

fn percent_of(downloaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((downloaded.min(total) * 100) / total) as u8
}

fn list_jars_in(dir: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut jars: Vec<String> = entries
        .flatten()
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            name.starts_with("microbot-")
                && name.ends_with(".jar")
                && name.chars().any(|c| c.is_ascii_digit())
        })
        .collect();
    jars.sort();
    Ok(jars)
}
