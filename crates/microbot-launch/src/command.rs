use crate::args::CommandArgs;
use crate::context::LaunchContext;
use crate::profile::{resolve_profile, ProfilePreferenceStore};
use microbot_core::{LaunchRequest, Result};

/// Builds the JVM arguments for a launch request.
///
/// Order: platform `--add-opens`, heap flags, `-jar <jar>`, mode flag,
/// proxy flags, `-profile=`. A proxy that cannot be turned into a URI is
/// logged and the client starts without it.
pub async fn build_command_args(
    ctx: &LaunchContext,
    request: &LaunchRequest,
    profiles: &ProfilePreferenceStore,
) -> Result<CommandArgs> {
    let mut args = CommandArgs::new();

    args.extend(ctx.platform.add_opens_flags().iter().copied());

    let memory = ctx.memory.select(request.ram_preference.as_deref());
    log::info!("Using memory settings from {}", memory.source);
    args.extend(memory.args);

    let jar = ctx.client_jar(&request.client_version)?;
    args.push("-jar");
    args.push(jar.to_string_lossy());

    if let Some(flag) = request.mode.client_flag() {
        args.push(flag);
    }

    let strategy = ctx.proxy_format.strategy(&request.client_version);
    if let Err(e) = strategy.append(&mut args, request.proxy.as_ref()) {
        log::warn!("Ignoring proxy settings: {}", e);
    }

    if let Some(profile) = resolve_profile(request.account.as_ref(), profiles).await {
        args.push(format!("-profile={}", profile));
    }

    Ok(args)
}
