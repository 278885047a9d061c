//! Explicit project configuration threaded into every hook
//!
//! The hooks never read ambient process state themselves; everything they
//! need about the app being patched lives in a [`ProjectContext`] built
//! once at startup.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::patch::read_file;
use crate::{HookError, HookResult};

static BUNDLE_ID_TS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"appId: '(([a-zA-Z0-9]+\.)+[a-zA-Z0-9]+)'").expect("BUNDLE_ID_TS pattern is invalid")
});

static MANIFEST_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"package="([^"]+)""#).expect("MANIFEST_PACKAGE pattern is invalid")
});

/// Paths and identity of the Capacitor app being patched
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// Root of the Capacitor app (holds package.json, android/, ios/)
    pub project_root: PathBuf,
    /// Root of this plugin inside node_modules
    pub plugin_root: PathBuf,
    bundle_id: Option<String>,
}

impl ProjectContext {
    /// Build a context, resolving the bundle id from capacitor.config.json
    /// or capacitor.config.ts when either exists
    pub fn discover(
        project_root: impl Into<PathBuf>,
        plugin_root: impl Into<PathBuf>,
    ) -> HookResult<Self> {
        let project_root = project_root.into();
        let bundle_id = read_bundle_id(&project_root)?;

        Ok(Self {
            project_root,
            plugin_root: plugin_root.into(),
            bundle_id,
        })
    }

    /// The app's bundle identifier (appId from the Capacitor config)
    pub fn bundle_id(&self) -> HookResult<&str> {
        self.bundle_id.as_deref().ok_or(HookError::MissingBundleId)
    }

    pub fn android_root(&self) -> PathBuf {
        self.project_root.join("android")
    }

    pub fn ios_root(&self) -> PathBuf {
        self.project_root.join("ios")
    }

    pub fn package_json_path(&self) -> PathBuf {
        self.project_root.join("package.json")
    }

    /// Parse the app's package.json
    pub fn package_json(&self) -> HookResult<Value> {
        read_json(&self.package_json_path())
    }

    pub fn android_manifest_path(&self) -> PathBuf {
        self.android_root()
            .join("app")
            .join("src")
            .join("main")
            .join("AndroidManifest.xml")
    }

    /// Value of the `package` attribute in AndroidManifest.xml
    pub fn android_package_name(&self) -> HookResult<String> {
        let path = self.android_manifest_path();
        let manifest = read_file(&path)?;

        MANIFEST_PACKAGE
            .captures(&manifest)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| HookError::MissingAnchor {
                path,
                anchor: "package=".to_string(),
            })
    }

    /// Path to the generated MainActivity.java, derived from the manifest
    /// package name
    pub fn main_activity_path(&self) -> HookResult<PathBuf> {
        let mut path = self
            .android_root()
            .join("app")
            .join("src")
            .join("main")
            .join("java");
        for segment in self.android_package_name()?.split('.') {
            path.push(segment);
        }
        path.push("MainActivity.java");
        Ok(path)
    }

    /// Path to the settings.json shipped with the cordova android plugins
    pub fn android_settings_json_path(&self) -> PathBuf {
        self.android_root()
            .join("capacitor-cordova-android-plugins")
            .join("src")
            .join("main")
            .join("assets")
            .join("settings.json")
    }

    pub fn podfile_path(&self) -> PathBuf {
        self.ios_root().join("App").join("Podfile")
    }

    pub fn node_module_path(&self, module: &str) -> PathBuf {
        let mut path = self.project_root.join("node_modules");
        for segment in module.split('/') {
            path.push(segment);
        }
        path
    }
}

/// Read the app's bundle id from capacitor.config.json (appId field) or,
/// failing that, from capacitor.config.ts via a regex over the source.
///
/// Returns Ok(None) when neither config file exists.
fn read_bundle_id(project_root: &Path) -> HookResult<Option<String>> {
    let config_json = project_root.join("capacitor.config.json");
    if config_json.exists() {
        let config = read_json(&config_json)?;
        return Ok(config
            .get("appId")
            .and_then(Value::as_str)
            .map(str::to_string));
    }

    let config_ts = project_root.join("capacitor.config.ts");
    if config_ts.exists() {
        let content = read_file(&config_ts)?;
        return Ok(BUNDLE_ID_TS
            .captures(&content)
            .map(|caps| caps[1].to_string()));
    }

    Ok(None)
}

/// Read and parse a JSON file
pub(crate) fn read_json(path: &Path) -> HookResult<Value> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| HookError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_bundle_id_from_config_json() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("capacitor.config.json"),
            r#"{"appId": "com.example.app", "appName": "Example"}"#,
        )
        .unwrap();

        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        assert_eq!(ctx.bundle_id().unwrap(), "com.example.app");
    }

    #[test]
    fn test_bundle_id_from_config_ts() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("capacitor.config.ts"),
            "const config: CapacitorConfig = {\n  appId: 'com.example.app',\n  appName: 'Example',\n};\n",
        )
        .unwrap();

        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        assert_eq!(ctx.bundle_id().unwrap(), "com.example.app");
    }

    #[test]
    fn test_missing_config_means_no_bundle_id() {
        let dir = TempDir::new().unwrap();
        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        assert!(matches!(
            ctx.bundle_id(),
            Err(HookError::MissingBundleId)
        ));
    }

    #[test]
    fn test_android_package_name() {
        let dir = TempDir::new().unwrap();
        let manifest_dir = dir.path().join("android/app/src/main");
        fs::create_dir_all(&manifest_dir).unwrap();
        fs::write(
            manifest_dir.join("AndroidManifest.xml"),
            "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\"\n    package=\"com.example.app\">\n</manifest>",
        )
        .unwrap();

        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        assert_eq!(ctx.android_package_name().unwrap(), "com.example.app");

        let expected = dir
            .path()
            .join("android/app/src/main/java/com/example/app/MainActivity.java");
        assert_eq!(ctx.main_activity_path().unwrap(), expected);
    }

    #[test]
    fn test_android_package_name_missing_anchor() {
        let dir = TempDir::new().unwrap();
        let manifest_dir = dir.path().join("android/app/src/main");
        fs::create_dir_all(&manifest_dir).unwrap();
        fs::write(manifest_dir.join("AndroidManifest.xml"), "<manifest>\n</manifest>").unwrap();

        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        assert!(matches!(
            ctx.android_package_name(),
            Err(HookError::MissingAnchor { .. })
        ));
    }
}
