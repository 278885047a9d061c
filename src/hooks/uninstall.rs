//! Plugin uninstall hook
//!
//! Restores everything the install and sync hooks changed: package.json
//! scripts, the Android manifest and gradle versions, the iOS pod files and
//! templates, and the patched Capacitor sources.

use std::fs;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::patch::{read_file, PatchRule, PatchSet};
use crate::payloads::{
    platform_ios_line, APPLICATION_ATTRIBUTES, CORDOVA_ANDROID_VERSION_DEFAULT,
    CORDOVA_POD_DEPENDENCY, DYNAMICS_POD_DEPENDENCY, MIN_SDK_VERSION_DEFAULT,
    XCCONFIG_WITHOUT_DYNAMICS, XCCONFIG_WITH_DYNAMICS, XMLNS_TOOLS_ATTRIBUTE,
};
use crate::xml::remove_attribute_line;
use crate::{HookResult, ProjectContext};

use super::android::{main_activity_patch, CORDOVA_ANDROID_VERSION, MIN_SDK_VERSION};
use super::install::{
    bridge_view_controller_patch, bridge_view_controller_path, cli_podspec_template_patch,
};
use super::ios::run_ruby_configurator;
use super::{write_json, HOOKED_SCRIPTS, SYNC_COMMAND};

static BRIDGE_ACTIVITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z0-9]+\.)+BridgeActivity""#)
        .expect("BRIDGE_ACTIVITY_REF pattern is invalid")
});

static DYNAMICS_POD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"pod 'BlackBerryDynamics', (:podspec|:path) => '(.+)'")
        .expect("DYNAMICS_POD_LINE pattern is invalid")
});

/// Run the full uninstall hook
pub fn uninstall(ctx: &ProjectContext) -> HookResult<()> {
    unwire_sync_scripts(ctx)?;

    if ctx.android_root().exists() {
        cleanup_android(ctx)?;
    }

    if ctx.ios_root().exists() {
        cleanup_ios(ctx)?;
    }

    Ok(())
}

/// Strip the sync command from the `capacitor:*:after` scripts, dropping a
/// script entirely when the command was all it held
fn unwire_sync_scripts(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.package_json_path();
    let mut package_json = ctx.package_json()?;

    let Some(scripts) = package_json
        .get_mut("scripts")
        .and_then(Value::as_object_mut)
    else {
        return Ok(());
    };

    for script in HOOKED_SCRIPTS {
        let Some(current) = scripts.get(*script).and_then(Value::as_str) else {
            continue;
        };

        if current == SYNC_COMMAND {
            scripts.remove(*script);
        } else if current.contains(SYNC_COMMAND) {
            let unwired = current
                .replace(&format!(" && {SYNC_COMMAND}"), "")
                .replace(SYNC_COMMAND, "");
            scripts.insert((*script).to_string(), Value::String(unwired));
        }
    }

    write_json(&path, &package_json)
}

/// Restore the generated android/ tree
fn cleanup_android(ctx: &ProjectContext) -> HookResult<()> {
    let bundle_id = ctx.bundle_id()?.to_string();

    // Remove the Dynamics settings files
    let assets_dir = ctx
        .android_root()
        .join("capacitor-cordova-android-plugins")
        .join("src")
        .join("main")
        .join("assets");
    for name in ["settings.json", "com.blackberry.dynamics.settings.json"] {
        let path = assets_dir.join(name);
        if path.exists() {
            fs::remove_file(&path)?;
        }
    }

    // Point the manifest back at the app's own MainActivity and strip the
    // inserted attributes
    let manifest_path = ctx.android_manifest_path();
    let manifest = read_file(&manifest_path)?;

    let mut manifest = PatchSet::new(vec![PatchRule::pattern(
        BRIDGE_ACTIVITY_REF.clone(),
        format!("{bundle_id}.MainActivity\""),
    )])
    .apply(&manifest);

    manifest = remove_attribute_line(XMLNS_TOOLS_ATTRIBUTE, &manifest);
    for attribute in APPLICATION_ATTRIBUTES {
        manifest = remove_attribute_line(attribute, &manifest);
    }
    fs::write(&manifest_path, manifest)?;

    // Restore the stock gradle versions
    let variables_gradle = ctx.android_root().join("variables.gradle");
    if variables_gradle.exists() {
        PatchSet::new(vec![
            PatchRule::pattern(MIN_SDK_VERSION.clone(), MIN_SDK_VERSION_DEFAULT),
            PatchRule::pattern(
                CORDOVA_ANDROID_VERSION.clone(),
                CORDOVA_ANDROID_VERSION_DEFAULT,
            ),
        ])
        .apply_to_file(&variables_gradle)?;
    }

    // Restore the BridgeActivity import
    let main_activity = ctx.main_activity_path()?;
    if main_activity.exists() {
        main_activity_patch().revert_file(&main_activity)?;
    }

    Ok(())
}

/// Restore the generated ios/ tree and the patched Capacitor sources
fn cleanup_ios(ctx: &ProjectContext) -> HookResult<()> {
    // Pod file surgery is best-effort: a partially regenerated ios/ tree is
    // common during uninstall and must not abort the remaining cleanup
    if let Err(e) = revert_pod_files(ctx) {
        eprintln!("{e}");
    }

    let bridge_view_controller = bridge_view_controller_path(ctx);
    if bridge_view_controller.exists() {
        bridge_view_controller_patch().revert_file(&bridge_view_controller)?;
    }

    run_ruby_configurator(ctx, "uninstall.rb");

    Ok(())
}

fn revert_pod_files(ctx: &ProjectContext) -> HookResult<()> {
    let cordova_plugins_podspec = ctx
        .ios_root()
        .join("capacitor-cordova-ios-plugins")
        .join("CordovaPlugins.podspec");
    PatchSet::new(vec![
        PatchRule::literal(DYNAMICS_POD_DEPENDENCY, ""),
        PatchRule::literal(XCCONFIG_WITH_DYNAMICS, XCCONFIG_WITHOUT_DYNAMICS),
    ])
    .apply_to_file(&cordova_plugins_podspec)?;

    PatchSet::new(vec![
        PatchRule::literal(platform_ios_line("14.0"), platform_ios_line("12.0")),
        PatchRule::pattern(DYNAMICS_POD_LINE.clone(), ""),
    ])
    .apply_to_file(&ctx.podfile_path())?;

    let capacitor_podspec = ctx.node_module_path("@capacitor/ios").join("Capacitor.podspec");
    PatchSet::new(vec![PatchRule::literal(
        format!("{CORDOVA_POD_DEPENDENCY}\n\t{DYNAMICS_POD_DEPENDENCY}"),
        CORDOVA_POD_DEPENDENCY,
    )])
    .apply_to_file(&capacitor_podspec)?;

    let cli_template = ctx
        .node_module_path("@capacitor/cli")
        .join("dist")
        .join("ios")
        .join("update.js");
    if cli_template.exists() {
        cli_podspec_template_patch().revert_file(&cli_template)?;
    }

    Ok(())
}
