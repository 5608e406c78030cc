pub mod accounts;
pub mod args;
pub mod command;
pub mod context;
pub mod credentials;
pub mod java;
pub mod memory;
pub mod platform;
pub mod profile;
pub mod proxy;
pub mod redact;
pub mod supervisor;

pub use accounts::{load_accounts, remove_accounts, AccountsWatcher};
pub use args::{CommandArgs, RedactedArgs};
pub use command::build_command_args;
pub use context::LaunchContext;
pub use credentials::write_credentials;
pub use java::{JavaProbe, JavaStatus};
pub use memory::{MemoryPolicy, MemorySelection, MemorySpec};
pub use platform::{HostArch, HostOs, HostPlatform};
pub use profile::{resolve_profile, ProfilePreferenceStore};
pub use proxy::{add_proxy_args, ProxyArgStrategy, ProxyFormat};
pub use redact::redact;
pub use supervisor::{LaunchReporter, Launched, ProcessSupervisor};
