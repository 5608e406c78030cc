//! Диалоги ошибок запуска

use microbot_launch::LaunchReporter;
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_opener::OpenerExt;

pub struct TauriLaunchReporter {
    app: AppHandle,
}

impl TauriLaunchReporter {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl LaunchReporter for TauriLaunchReporter {
    fn java_missing(&self, detail: &str, download_url: &str) {
        log::debug!("Java check detail: {}", detail);

        let app = self.app.clone();
        let url = download_url.to_string();
        self.app
            .dialog()
            .message("Java is not installed. Would you like to download it now?")
            .title("Java Not Found")
            .kind(MessageDialogKind::Error)
            .buttons(MessageDialogButtons::OkCancelCustom(
                "Yes, Download JDK".to_string(),
                "Cancel".to_string(),
            ))
            .show(move |confirmed| {
                if !confirmed {
                    return;
                }
                log::info!("Opening Java download page: {}", url);
                if let Err(e) = app.opener().open_url(url.as_str(), None::<&str>) {
                    log::error!("Failed to open Java download page: {}", e);
                }
            });
    }

    fn launch_failed(&self, message: &str) {
        self.app
            .dialog()
            .message(message)
            .title("Error running jar!")
            .kind(MessageDialogKind::Error)
            .show(|_| {});
    }
}
