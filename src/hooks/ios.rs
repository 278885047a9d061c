//! iOS side of the sync hook
//!
//! The Xcode project surgery itself lives in a Ruby configurator shipped
//! with the plugin; this hook drives it and then layers the per-plugin
//! linker flags and the optional Launcher pod on top.

use std::path::PathBuf;
use std::process::Command;

use crate::patch::{PatchRule, PatchSet};
use crate::payloads::{DYNAMICS_LINKER_FLAG, LAUNCHER_POD, LINKER_FLAGS};
use crate::{HookResult, ProjectContext};

use super::{dynamics_pod_line, has_dependency};

/// Patch the generated ios/ tree for the Dynamics runtime
///
/// A no-op when the ios platform has not been added, or on Windows hosts
/// where the CocoaPods tooling is unavailable.
pub(super) fn sync_ios(ctx: &ProjectContext) -> HookResult<()> {
    if !ctx.ios_root().exists() || cfg!(windows) {
        return Ok(());
    }

    run_ruby_configurator(ctx, "install.rb");
    update_linker_flags(ctx)?;
    update_launcher(ctx)?;

    Ok(())
}

/// Invoke the bundled Ruby configurator, logging and swallowing failures:
/// a broken Xcode config is recoverable by re-running sync, while failing
/// the whole hook would leave the project half-patched
pub(super) fn run_ruby_configurator(ctx: &ProjectContext, script: &str) {
    let bundle_id = match ctx.bundle_id() {
        Ok(id) => id.to_string(),
        Err(e) => {
            eprintln!("\nERROR: capacitor-plugin-bbd-base {script} skipped: {e}");
            return;
        }
    };

    let script_path = ctx
        .plugin_root
        .join("scripts")
        .join("hooks")
        .join("ios")
        .join(script);

    let status = Command::new(&script_path)
        .arg("-i")
        .arg(&bundle_id)
        .arg("-p")
        .arg(ctx.ios_root())
        .status();

    match status {
        Ok(status) if status.success() => {}
        _ => eprintln!("\nERROR: capacitor-plugin-bbd-base {script} exited with error!"),
    }
}

/// Append a linker flag to the generated Pods xcconfig files for every
/// Dynamics cordova plugin the app depends on
fn update_linker_flags(ctx: &ProjectContext) -> HookResult<()> {
    let package_json = ctx.package_json()?;

    for (key, flag) in LINKER_FLAGS {
        if !has_dependency(&package_json, &format!("cordova-plugin-bbd-{key}")) {
            continue;
        }
        for build_type in ["debug", "release"] {
            add_linker_for_build_type(ctx, build_type, flag)?;
        }
    }

    Ok(())
}

fn xcconfig_path(ctx: &ProjectContext, build_type: &str) -> PathBuf {
    ctx.ios_root()
        .join("App")
        .join("Pods")
        .join("Target Support Files")
        .join("Pods-App")
        .join(format!("Pods-App.{build_type}.xcconfig"))
}

fn add_linker_for_build_type(ctx: &ProjectContext, build_type: &str, flag: &str) -> HookResult<()> {
    let path = xcconfig_path(ctx, build_type);
    if !path.exists() {
        return Ok(());
    }

    PatchSet::new(vec![PatchRule::literal(
        DYNAMICS_LINKER_FLAG,
        format!("{DYNAMICS_LINKER_FLAG}{flag}"),
    )])
    .with_marker(flag)
    .apply_to_file(&path)?;

    Ok(())
}

/// Add or remove the Launcher pod in the app Podfile depending on whether
/// the launcher plugin is installed
fn update_launcher(ctx: &ProjectContext) -> HookResult<()> {
    let package_json = ctx.package_json()?;
    let podfile = ctx.podfile_path();

    if has_dependency(&package_json, "cordova-plugin-bbd-launcher") {
        let pod_line = dynamics_pod_line(ctx)?;
        PatchSet::new(vec![PatchRule::literal(
            pod_line.as_str(),
            format!("{pod_line}\n\t{LAUNCHER_POD}"),
        )])
        .with_marker(LAUNCHER_POD)
        .apply_to_file(&podfile)?;
    } else {
        PatchSet::new(vec![PatchRule::literal(
            format!("\n\t{LAUNCHER_POD}"),
            "",
        )])
        .apply_to_file(&podfile)?;
    }

    Ok(())
}
