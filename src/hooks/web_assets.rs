//! Post-compile rewrite of cordova_plugins.js
//!
//! cordova-sqlite-storage and the Dynamics sqlite plugin both clobber
//! `window.sqlitePlugin`; when both are present the stock plugin must lose
//! its clobbers/merges and become require-only. The plugin list is a JSON
//! array embedded in generated JavaScript, so it is parsed out, transformed,
//! and spliced back without touching the surrounding code.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::patch::read_file;
use crate::{HookError, HookResult, Platform, ProjectContext};

const EXPORTS_ANCHOR: &str = "module.exports = ";
const LIST_END_ANCHOR: &str = "];";

const SQLITE_PLUGIN_ID: &str = "cordova-sqlite-storage";

/// Rewrite every generated cordova_plugins.js copy for the platform
///
/// A no-op when the platform tree has not been built.
pub fn web_assets(ctx: &ProjectContext, platform: Platform) -> HookResult<()> {
    let platform_root = ctx
        .project_root
        .join("platforms")
        .join(platform.dir_name());
    if !platform_root.exists() {
        return Ok(());
    }

    for path in plugin_list_paths(&platform_root, platform) {
        rewrite_plugin_list(&path)?;
    }

    Ok(())
}

/// The two places the build copies cordova_plugins.js to, per platform
fn plugin_list_paths(platform_root: &Path, platform: Platform) -> Vec<PathBuf> {
    let www = match platform {
        Platform::Android => platform_root
            .join("app")
            .join("src")
            .join("main")
            .join("assets")
            .join("www"),
        Platform::Ios => platform_root.join("www"),
    };

    vec![
        platform_root.join("platform_www").join("cordova_plugins.js"),
        www.join("cordova_plugins.js"),
    ]
}

fn rewrite_plugin_list(path: &Path) -> HookResult<()> {
    let content = read_file(path)?;

    let start = content
        .find(EXPORTS_ANCHOR)
        .ok_or_else(|| missing_anchor(path, EXPORTS_ANCHOR))?
        + EXPORTS_ANCHOR.len();
    let end = content
        .find(LIST_END_ANCHOR)
        .ok_or_else(|| missing_anchor(path, LIST_END_ANCHOR))?
        + 1;
    let list_src = &content[start..end];

    let mut plugins: Vec<Value> =
        serde_json::from_str(list_src).map_err(|e| HookError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for plugin in &mut plugins {
        if plugin.get("pluginId").and_then(Value::as_str) != Some(SQLITE_PLUGIN_ID) {
            continue;
        }
        if let Some(entry) = plugin.as_object_mut() {
            entry.remove("clobbers");
            entry.remove("merges");
            entry.insert("runs".to_string(), Value::String("true".to_string()));
        }
    }

    let updated = to_json_four_indent(&plugins, path)?;
    fs::write(path, content.replacen(list_src, &updated, 1))?;
    Ok(())
}

/// Serialize with four-space indentation, matching how the Cordova CLI
/// writes the plugin list
fn to_json_four_indent(plugins: &[Value], path: &Path) -> HookResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    plugins
        .serialize(&mut serializer)
        .map_err(|e| HookError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn missing_anchor(path: &Path, anchor: &str) -> HookError {
    HookError::MissingAnchor {
        path: path.to_path_buf(),
        anchor: anchor.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CORDOVA_PLUGINS_JS: &str = concat!(
        "cordova.define('cordova/plugin_list', function(require, exports, module) {\n",
        "module.exports = [\n",
        "    {\n",
        "        \"id\": \"cordova-sqlite-storage.SQLitePlugin\",\n",
        "        \"file\": \"plugins/cordova-sqlite-storage/www/SQLitePlugin.js\",\n",
        "        \"pluginId\": \"cordova-sqlite-storage\",\n",
        "        \"clobbers\": [\n",
        "            \"SQLitePlugin\"\n",
        "        ]\n",
        "    },\n",
        "    {\n",
        "        \"id\": \"cordova-plugin-device.device\",\n",
        "        \"pluginId\": \"cordova-plugin-device\",\n",
        "        \"clobbers\": [\n",
        "            \"device\"\n",
        "        ]\n",
        "    }\n",
        "];\n",
        "module.exports.metadata = {\n",
        "    \"cordova-sqlite-storage\": \"6.0.0\"\n",
        "};\n",
        "});\n"
    );

    #[test]
    fn test_sqlite_entry_loses_clobbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cordova_plugins.js");
        fs::write(&path, CORDOVA_PLUGINS_JS).unwrap();

        rewrite_plugin_list(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Surrounding JS is untouched
        assert!(content.starts_with("cordova.define('cordova/plugin_list'"));
        assert!(content.contains("module.exports.metadata"));

        let start = content.find(EXPORTS_ANCHOR).unwrap() + EXPORTS_ANCHOR.len();
        let end = content.find(LIST_END_ANCHOR).unwrap() + 1;
        let plugins: Vec<Value> = serde_json::from_str(&content[start..end]).unwrap();

        let sqlite = plugins
            .iter()
            .find(|p| p["pluginId"] == SQLITE_PLUGIN_ID)
            .unwrap();
        assert!(sqlite.get("clobbers").is_none());
        assert_eq!(sqlite["runs"], "true");

        // Other plugins keep their clobbers
        let device = plugins
            .iter()
            .find(|p| p["pluginId"] == "cordova-plugin-device")
            .unwrap();
        assert!(device.get("clobbers").is_some());
    }

    #[test]
    fn test_missing_anchor_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cordova_plugins.js");
        fs::write(&path, "not a plugin list\n").unwrap();

        assert!(matches!(
            rewrite_plugin_list(&path).unwrap_err(),
            HookError::MissingAnchor { .. }
        ));
    }

    #[test]
    fn test_web_assets_noop_without_platform_tree() {
        let dir = TempDir::new().unwrap();
        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        web_assets(&ctx, Platform::Android).unwrap();
    }

    #[test]
    fn test_web_assets_rewrites_both_copies() {
        let dir = TempDir::new().unwrap();
        let platform_www = dir.path().join("platforms/ios/platform_www");
        let www = dir.path().join("platforms/ios/www");
        fs::create_dir_all(&platform_www).unwrap();
        fs::create_dir_all(&www).unwrap();
        fs::write(platform_www.join("cordova_plugins.js"), CORDOVA_PLUGINS_JS).unwrap();
        fs::write(www.join("cordova_plugins.js"), CORDOVA_PLUGINS_JS).unwrap();

        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        web_assets(&ctx, Platform::Ios).unwrap();

        for path in [
            platform_www.join("cordova_plugins.js"),
            www.join("cordova_plugins.js"),
        ] {
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.contains("\"runs\": \"true\""));
        }
    }
}
