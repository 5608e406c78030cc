pub mod error;
pub mod types;

// Re-export commonly used items
pub use error::{ErrorInfo, LauncherError, Result};
pub use types::{Account, LaunchMode, LaunchRequest, ProxySpec};
