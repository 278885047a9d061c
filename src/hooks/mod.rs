//! Lifecycle hook operations
//!
//! One module per hook, mirroring the plugin lifecycle: `install` and
//! `uninstall` run from the npm scripts of the plugin itself, `sync` runs
//! after every `capacitor copy`/`capacitor update`, and `web_assets` runs
//! after the web bundle is compiled into the platform trees.

mod android;
mod install;
mod ios;
mod uninstall;
mod web_assets;

pub use install::install;
pub use uninstall::uninstall;
pub use web_assets::web_assets;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::{HookError, HookResult, Platform, ProjectContext};

/// Command wired into the app's `capacitor:*:after` scripts
pub(crate) const SYNC_COMMAND: &str = "bbd-hooks sync";

/// Scripts in the app's package.json that trigger the sync hook
pub(crate) const HOOKED_SCRIPTS: &[&str] = &["capacitor:copy:after", "capacitor:update:after"];

/// Patch the generated native project for one platform
///
/// A no-op when the platform's directory has not been scaffolded.
pub fn sync(ctx: &ProjectContext, platform: Platform) -> HookResult<()> {
    match platform {
        Platform::Android => android::sync_android(ctx),
        Platform::Ios => ios::sync_ios(ctx),
    }
}

/// True when the app's package.json declares the given dependency
pub(crate) fn has_dependency(package_json: &Value, name: &str) -> bool {
    package_json
        .get("dependencies")
        .and_then(Value::as_object)
        .map(|deps| deps.contains_key(name))
        .unwrap_or(false)
}

/// The `pod 'BlackBerryDynamics', :podspec => ...` line for this plugin,
/// built from the `dynamicsPodSpec` field of the plugin's package.json
pub(crate) fn dynamics_pod_line(ctx: &ProjectContext) -> HookResult<String> {
    let path = ctx.plugin_root.join("package.json");
    let package_json = crate::project::read_json(&path)?;

    let podspec = package_json
        .get("dynamicsPodSpec")
        .and_then(Value::as_str)
        .ok_or_else(|| HookError::MissingAnchor {
            path,
            anchor: "dynamicsPodSpec".to_string(),
        })?;

    Ok(format!("pod 'BlackBerryDynamics', :podspec => '{podspec}'"))
}

/// Serialize a JSON value with two-space indentation and write it in place
pub(crate) fn write_json(path: &Path, value: &Value) -> HookResult<()> {
    let content = serde_json::to_string_pretty(value).map_err(|e| HookError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, content)?;
    Ok(())
}
