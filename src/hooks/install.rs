//! Plugin install hook
//!
//! Wires the sync command into the app's Capacitor lifecycle scripts and
//! patches the iOS templates that ship with `@capacitor/cli` and
//! `@capacitor/ios` so every regenerated project picks up the Dynamics pod.

use serde_json::Value;

use crate::patch::{PatchRule, PatchSet};
use crate::payloads::{
    platform_ios_line, ADD_YOUR_PODS_HERE, CORDOVA_IMPORT, CORDOVA_POD_DEPENDENCY,
    DYNAMICS_IMPORT, DYNAMICS_POD_DEPENDENCY, INITIALIZATION_MARK, LOAD_WEB_VIEW,
    NOTIFICATION_CENTER_OBSERVER, STATE_CHANGE_HANDLER, SWIFT_VERSION_LINE,
    XCCONFIG_WITHOUT_DYNAMICS, XCCONFIG_WITH_DYNAMICS,
};
use crate::{HookResult, ProjectContext};

use super::{dynamics_pod_line, write_json, HOOKED_SCRIPTS, SYNC_COMMAND};

/// Run the full install hook
pub fn install(ctx: &ProjectContext) -> HookResult<()> {
    wire_sync_scripts(ctx)?;

    // The iOS template surgery relies on CocoaPods tooling that does not
    // exist on Windows hosts
    if cfg!(windows) || !ctx.ios_root().exists() {
        return Ok(());
    }

    patch_cli_podspec_template(ctx)?;
    patch_app_podfile(ctx)?;
    patch_capacitor_podspec(ctx)?;
    bridge_view_controller_patch().apply_to_file(&bridge_view_controller_path(ctx))?;

    Ok(())
}

/// Append the sync command to the `capacitor:*:after` scripts, creating
/// them when absent. Already-wired scripts are left alone.
fn wire_sync_scripts(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.package_json_path();
    let mut package_json = ctx.package_json()?;

    if package_json.get("scripts").and_then(Value::as_object).is_none() {
        package_json["scripts"] = Value::Object(serde_json::Map::new());
    }

    for script in HOOKED_SCRIPTS {
        let current = package_json["scripts"]
            .get(*script)
            .and_then(Value::as_str);

        let wired = match current {
            Some(existing) if existing.contains(SYNC_COMMAND) => continue,
            Some(existing) => format!("{existing} && {SYNC_COMMAND}"),
            None => SYNC_COMMAND.to_string(),
        };

        package_json["scripts"][*script] = Value::String(wired);
    }

    write_json(&path, &package_json)
}

/// Add the Dynamics pod dependency and preprocessor define to the podspec
/// template inside `@capacitor/cli`, so regenerated CordovaPlugins.podspec
/// files carry them
fn patch_cli_podspec_template(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx
        .node_module_path("@capacitor/cli")
        .join("dist")
        .join("ios")
        .join("update.js");

    if !path.exists() {
        eprintln!("File not found at path: {}", path.display());
        return Ok(());
    }

    cli_podspec_template_patch().apply_to_file(&path)?;
    Ok(())
}

pub(super) fn cli_podspec_template_patch() -> PatchSet {
    PatchSet::new(vec![
        PatchRule::literal(
            SWIFT_VERSION_LINE,
            format!("{DYNAMICS_POD_DEPENDENCY}\n\t{SWIFT_VERSION_LINE}"),
        ),
        PatchRule::literal(XCCONFIG_WITHOUT_DYNAMICS, XCCONFIG_WITH_DYNAMICS),
    ])
    .with_marker(DYNAMICS_POD_DEPENDENCY)
}

/// Raise the deployment target and add the Dynamics pod to the app Podfile
fn patch_app_podfile(ctx: &ProjectContext) -> HookResult<()> {
    let pod_line = dynamics_pod_line(ctx)?;

    PatchSet::new(vec![
        PatchRule::literal(platform_ios_line("12.0"), platform_ios_line("14.0")),
        PatchRule::literal(
            ADD_YOUR_PODS_HERE,
            format!("{ADD_YOUR_PODS_HERE}\n\t{pod_line}"),
        ),
    ])
    .with_marker(pod_line)
    .apply_to_file(&ctx.podfile_path())?;

    Ok(())
}

/// Add the Dynamics dependency to Capacitor.podspec in `@capacitor/ios`
fn patch_capacitor_podspec(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.node_module_path("@capacitor/ios").join("Capacitor.podspec");

    PatchSet::new(vec![PatchRule::literal(
        CORDOVA_POD_DEPENDENCY,
        format!("{CORDOVA_POD_DEPENDENCY}\n\t{DYNAMICS_POD_DEPENDENCY}"),
    )])
    .with_marker(DYNAMICS_POD_DEPENDENCY)
    .apply_to_file(&path)?;

    Ok(())
}

/// Patch set that defers the web view load in CAPBridgeViewController.swift
/// until the Dynamics runtime reports authorization
pub(super) fn bridge_view_controller_patch() -> PatchSet {
    PatchSet::new(vec![
        PatchRule::literal(
            CORDOVA_IMPORT,
            format!("{CORDOVA_IMPORT}\n{DYNAMICS_IMPORT}"),
        ),
        PatchRule::literal(LOAD_WEB_VIEW, NOTIFICATION_CENTER_OBSERVER),
        PatchRule::literal(
            INITIALIZATION_MARK,
            format!("{STATE_CHANGE_HANDLER}\n\t{INITIALIZATION_MARK}"),
        ),
    ])
    .with_marker(DYNAMICS_IMPORT)
}

pub(super) fn bridge_view_controller_path(ctx: &ProjectContext) -> std::path::PathBuf {
    ctx.node_module_path("@capacitor/ios")
        .join("Capacitor")
        .join("Capacitor")
        .join("CAPBridgeViewController.swift")
}
