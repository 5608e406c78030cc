//! IPC-команды для фронтенда

use crate::dialogs::TauriLaunchReporter;
use crate::downloader::{ClientDownloader, DownloadProgress};
use microbot_core::{Account, LaunchMode, LaunchRequest, LauncherError, ProxySpec, Result};
use microbot_launch::{
    build_command_args, load_accounts, remove_accounts as remove_accounts_file,
    write_credentials, AccountsWatcher, JavaStatus, LaunchContext, LaunchReporter, Launched,
    ProcessSupervisor,
};
use tauri::{AppHandle, Emitter, State};
use tokio::sync::Mutex;

pub struct AppState {
    pub ctx: LaunchContext,
    pub supervisor: ProcessSupervisor,
    pub downloader: ClientDownloader,
    pub accounts_watcher: Mutex<AccountsWatcher>,
}

impl AppState {
    pub fn new(ctx: LaunchContext, downloader: ClientDownloader) -> Self {
        let supervisor = ProcessSupervisor::new(&ctx);
        Self {
            ctx,
            supervisor,
            downloader,
            accounts_watcher: Mutex::new(AccountsWatcher::new()),
        }
    }
}

async fn launch(app: &AppHandle, state: &AppState, request: LaunchRequest) -> Result<Launched> {
    let reporter = TauriLaunchReporter::new(app.clone());

    let jar = state.ctx.client_jar(&request.client_version).and_then(|jar| {
        if jar.is_file() {
            Ok(jar)
        } else {
            Err(LauncherError::ClientNotFound(jar.display().to_string()))
        }
    });
    if let Err(err) = jar {
        log::error!("{}", err);
        reporter.launch_failed(&err.to_string());
        return Err(err);
    }

    let args = match build_command_args(&state.ctx, &request, &state.ctx.profile_store()).await {
        Ok(args) => args,
        Err(e) => {
            reporter.launch_failed(&e.to_string());
            return Err(e);
        }
    };

    state.supervisor.launch(&args, &reporter).await
}

/// Запуск с последним сохранённым аккаунтом Jagex
#[tauri::command]
pub async fn open_client(
    version: String,
    proxy: Option<ProxySpec>,
    ram: Option<String>,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Launched> {
    let account = match load_accounts(&state.ctx.accounts_file()).await {
        Ok(accounts) => accounts.into_iter().next(),
        Err(e) => {
            log::warn!("Failed to load accounts: {}", e);
            None
        }
    };

    let mut request = LaunchRequest::new(version);
    request.proxy = proxy;
    request.ram_preference = ram;

    if let Some(account) = account {
        if let Err(e) = write_credentials(&state.ctx.credentials_file(), &account).await {
            log::warn!("Failed to write credentials.properties: {}", e);
        }
        request = request.with_account(account);
    }

    launch(&app, &state, request).await
}

#[tauri::command]
pub async fn play_no_jagex_account(
    version: String,
    proxy: Option<ProxySpec>,
    ram: Option<String>,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Launched> {
    let mut request = LaunchRequest::new(version).with_mode(LaunchMode::NoJagexAccount);
    request.proxy = proxy;
    request.ram_preference = ram;

    launch(&app, &state, request).await
}

#[tauri::command]
pub async fn check_java(state: State<'_, AppState>) -> Result<JavaStatus> {
    Ok(state.supervisor.check_java().await)
}

#[tauri::command]
pub async fn read_accounts(state: State<'_, AppState>) -> Result<Vec<Account>> {
    load_accounts(&state.ctx.accounts_file()).await
}

#[tauri::command]
pub async fn remove_accounts(state: State<'_, AppState>) -> Result<()> {
    remove_accounts_file(&state.ctx.accounts_file()).await
}

#[tauri::command]
pub async fn check_file_change(state: State<'_, AppState>) -> Result<bool> {
    let path = state.ctx.accounts_file();
    Ok(state.accounts_watcher.lock().await.poll(&path).await)
}

#[tauri::command]
pub async fn overwrite_credential_properties(
    account: Account,
    state: State<'_, AppState>,
) -> Result<()> {
    write_credentials(&state.ctx.credentials_file(), &account).await
}

#[tauri::command]
pub async fn download_client(
    version: String,
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<String> {
    let path = state
        .downloader
        .download_client(&version, |progress: DownloadProgress| {
            let _ = app.emit("download-progress", progress);
        })
        .await?;
    Ok(path.to_string_lossy().into_owned())
}

#[tauri::command]
pub async fn fetch_client_version(state: State<'_, AppState>) -> Result<String> {
    state.downloader.fetch_client_version().await
}

#[tauri::command]
pub fn client_exists(version: String, state: State<'_, AppState>) -> bool {
    state.downloader.client_exists(&version)
}

#[tauri::command]
pub fn list_jars(state: State<'_, AppState>) -> Result<Vec<String>> {
    state.downloader.list_jars()
}
