use chrono::Local;
use microbot_launch::LaunchContext;
use std::fs;
use tauri::Manager;

mod commands;
mod dialogs;
mod downloader;
mod paths;

use commands::AppState;
use downloader::ClientDownloader;

const LOG_RETENTION_DAYS: u64 = 7;

/// Логи лаунчера: файл на каждую сессию в `<microbot dir>/logs`,
/// в debug-сборке дополнительно stdout
fn setup_logging(microbot_dir: &std::path::Path) {
    let logs_dir = microbot_dir.join("logs");
    let _ = fs::create_dir_all(&logs_dir);
    let log_file = logs_dir.join(paths::session_log_name(Local::now()));

    // client stdout/stderr is logged at info
    let base_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(base_level)
        .level_for("microbot_launch", log::LevelFilter::Debug)
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .level_for("tao", log::LevelFilter::Warn)
        .level_for("wry", log::LevelFilter::Warn);

    let dispatch = match fern::log_file(&log_file) {
        Ok(file) => dispatch.chain(file),
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_file, e);
            dispatch
        }
    };

    #[cfg(debug_assertions)]
    let dispatch = dispatch.chain(std::io::stdout());

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    log::info!(
        "=== Microbot Launcher {} started ===",
        env!("CARGO_PKG_VERSION")
    );
    log::info!("Microbot dir: {:?}", microbot_dir);
    log::info!("Log file: {:?}", log_file);
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let argv: Vec<String> = std::env::args().collect();
            let ctx = LaunchContext::from_home(&argv).map_err(|e| e.to_string())?;

            paths::init_paths(ctx.microbot_dir.clone()).map_err(|e| e.to_string())?;
            setup_logging(paths::get_base_dir());

            if let Err(e) = paths::cleanup_old_logs(LOG_RETENTION_DAYS) {
                log::warn!("Failed to cleanup old logs: {}", e);
            }

            log::info!("RuneLite dir: {:?}", ctx.runelite_dir);
            log::info!("Platform: {:?}", ctx.platform);

            let downloader = ClientDownloader::new(&ctx.microbot_dir).map_err(|e| e.to_string())?;
            app.manage(AppState::new(ctx, downloader));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::open_client,
            commands::play_no_jagex_account,
            commands::check_java,
            commands::read_accounts,
            commands::remove_accounts,
            commands::check_file_change,
            commands::overwrite_credential_properties,
            commands::download_client,
            commands::fetch_client_version,
            commands::client_exists,
            commands::list_jars,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
