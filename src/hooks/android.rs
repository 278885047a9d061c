//! Android side of the sync hook
//!
//! Runs after `capacitor copy`/`capacitor update` regenerated the android/
//! tree: points the app at the Dynamics BridgeActivity, inserts the manifest
//! attributes the runtime needs, raises the SDK floor, and stamps the app id
//! into the Dynamics settings file.

use std::fs;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::patch::{read_file, PatchRule, PatchSet};
use crate::payloads::{
    APPLICATION_ATTRIBUTES, CAPACITOR_BRIDGE_ACTIVITY_IMPORT, CORDOVA_ANDROID_VERSION_DYNAMICS,
    DYNAMICS_BRIDGE_ACTIVITY, DYNAMICS_BRIDGE_ACTIVITY_IMPORT, MIN_SDK_VERSION_DYNAMICS,
    XMLNS_TOOLS_ATTRIBUTE,
};
use crate::project::read_json;
use crate::xml::insert_attribute;
use crate::{HookResult, ProjectContext};

static MAIN_ACTIVITY_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([a-zA-Z0-9]+\.)+MainActivity""#).expect("MAIN_ACTIVITY_REF pattern is invalid")
});

pub(super) static MIN_SDK_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"minSdkVersion\s*=\s*\d+").expect("MIN_SDK_VERSION pattern is invalid")
});

pub(super) static CORDOVA_ANDROID_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"cordovaAndroidVersion\s*=\s*'\d+.{1,}\d+'")
        .expect("CORDOVA_ANDROID_VERSION pattern is invalid")
});

/// Patch the generated android/ tree for the Dynamics runtime
///
/// A no-op when the android platform has not been added to the project.
pub(super) fn sync_android(ctx: &ProjectContext) -> HookResult<()> {
    if !ctx.android_root().exists() {
        return Ok(());
    }

    stamp_application_id(ctx)?;
    patch_manifest(ctx)?;
    patch_variables_gradle(ctx)?;
    patch_main_activity(ctx)?;

    Ok(())
}

/// Set GDApplicationID in the cordova plugins settings.json, writing only
/// when the value actually changes
fn stamp_application_id(ctx: &ProjectContext) -> HookResult<()> {
    let bundle_id = ctx.bundle_id()?;
    let path = ctx.android_settings_json_path();
    let mut settings = read_json(&path)?;

    if settings.get("GDApplicationID").and_then(Value::as_str) != Some(bundle_id) {
        settings["GDApplicationID"] = Value::String(bundle_id.to_string());
        super::write_json(&path, &settings)?;
    }

    Ok(())
}

/// Swap MainActivity for the Dynamics BridgeActivity and insert the
/// attributes the runtime needs into the manifest
fn patch_manifest(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.android_manifest_path();
    let manifest = read_file(&path)?;

    let manifest = PatchSet::new(vec![PatchRule::pattern(
        MAIN_ACTIVITY_REF.clone(),
        DYNAMICS_BRIDGE_ACTIVITY,
    )])
    .apply(&manifest);

    let mut manifest = insert_attribute("manifest", XMLNS_TOOLS_ATTRIBUTE, &manifest)?;
    for attribute in APPLICATION_ATTRIBUTES {
        manifest = insert_attribute("application", attribute, &manifest)?;
    }

    fs::write(&path, manifest)?;
    Ok(())
}

/// Raise minSdkVersion and cordovaAndroidVersion to what the Dynamics SDK
/// requires. Skipped when variables.gradle is absent.
fn patch_variables_gradle(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.android_root().join("variables.gradle");
    if !path.exists() {
        return Ok(());
    }

    PatchSet::new(vec![
        PatchRule::pattern(MIN_SDK_VERSION.clone(), MIN_SDK_VERSION_DYNAMICS),
        PatchRule::pattern(
            CORDOVA_ANDROID_VERSION.clone(),
            CORDOVA_ANDROID_VERSION_DYNAMICS,
        ),
    ])
    .apply_to_file(&path)?;

    Ok(())
}

/// Point the BridgeActivity import in MainActivity.java at the Dynamics
/// variant. Skipped when the activity source is not where the manifest
/// package says it should be.
fn patch_main_activity(ctx: &ProjectContext) -> HookResult<()> {
    let path = ctx.main_activity_path()?;
    if !path.exists() {
        return Ok(());
    }

    main_activity_patch().apply_to_file(&path)?;
    Ok(())
}

pub(super) fn main_activity_patch() -> PatchSet {
    PatchSet::new(vec![PatchRule::literal(
        CAPACITOR_BRIDGE_ACTIVITY_IMPORT,
        DYNAMICS_BRIDGE_ACTIVITY_IMPORT,
    )])
    .with_marker(DYNAMICS_BRIDGE_ACTIVITY_IMPORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<manifest xmlns:android=\"http://schemas.android.com/apk/res/android\"\n",
        "\t\tpackage=\"com.example.app\">\n",
        "\t<application\n",
        "\t\tandroid:allowBackup=\"true\">\n",
        "\t\t<activity\n",
        "\t\t\tandroid:name=\"com.example.app.MainActivity\">\n",
        "\t\t</activity>\n",
        "\t</application>\n",
        "</manifest>\n"
    );

    fn fake_project(dir: &TempDir) -> ProjectContext {
        let root = dir.path();
        fs::write(
            root.join("capacitor.config.json"),
            r#"{"appId": "com.example.app"}"#,
        )
        .unwrap();

        let main_dir = root.join("android/app/src/main");
        fs::create_dir_all(&main_dir).unwrap();
        fs::write(main_dir.join("AndroidManifest.xml"), MANIFEST).unwrap();

        let assets_dir = root.join("android/capacitor-cordova-android-plugins/src/main/assets");
        fs::create_dir_all(&assets_dir).unwrap();
        fs::write(assets_dir.join("settings.json"), "{}").unwrap();

        fs::write(
            root.join("android/variables.gradle"),
            "ext {\n    minSdkVersion = 21\n    cordovaAndroidVersion = '7.0.0'\n}\n",
        )
        .unwrap();

        let activity_dir = main_dir.join("java/com/example/app");
        fs::create_dir_all(&activity_dir).unwrap();
        fs::write(
            activity_dir.join("MainActivity.java"),
            "package com.example.app;\n\nimport com.getcapacitor.BridgeActivity;\n\npublic class MainActivity extends BridgeActivity {}\n",
        )
        .unwrap();

        ProjectContext::discover(root, root.join("plugin")).unwrap()
    }

    #[test]
    fn test_sync_android_patches_everything() {
        let dir = TempDir::new().unwrap();
        let ctx = fake_project(&dir);

        sync_android(&ctx).unwrap();

        let manifest =
            fs::read_to_string(dir.path().join("android/app/src/main/AndroidManifest.xml"))
                .unwrap();
        assert!(manifest.contains(DYNAMICS_BRIDGE_ACTIVITY));
        assert!(!manifest.contains("com.example.app.MainActivity\""));
        assert!(manifest.contains(XMLNS_TOOLS_ATTRIBUTE));
        for attribute in APPLICATION_ATTRIBUTES {
            assert!(manifest.contains(attribute), "missing {attribute}");
        }

        let settings =
            fs::read_to_string(dir.path().join(
                "android/capacitor-cordova-android-plugins/src/main/assets/settings.json",
            ))
            .unwrap();
        assert!(settings.contains("\"GDApplicationID\": \"com.example.app\""));

        let gradle = fs::read_to_string(dir.path().join("android/variables.gradle")).unwrap();
        assert!(gradle.contains("minSdkVersion = 28"));
        assert!(gradle.contains("cordovaAndroidVersion = '10.1.1'"));

        let activity = fs::read_to_string(
            dir.path()
                .join("android/app/src/main/java/com/example/app/MainActivity.java"),
        )
        .unwrap();
        assert!(activity.contains(DYNAMICS_BRIDGE_ACTIVITY_IMPORT));
        assert!(!activity.contains(CAPACITOR_BRIDGE_ACTIVITY_IMPORT));
    }

    #[test]
    fn test_sync_android_twice_is_stable() {
        let dir = TempDir::new().unwrap();
        let ctx = fake_project(&dir);

        sync_android(&ctx).unwrap();
        let manifest_path = dir.path().join("android/app/src/main/AndroidManifest.xml");
        let once = fs::read_to_string(&manifest_path).unwrap();

        sync_android(&ctx).unwrap();
        assert_eq!(fs::read_to_string(&manifest_path).unwrap(), once);
    }

    #[test]
    fn test_sync_android_noop_without_platform() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("capacitor.config.json"),
            r#"{"appId": "com.example.app"}"#,
        )
        .unwrap();
        let ctx = ProjectContext::discover(dir.path(), dir.path().join("plugin")).unwrap();
        sync_android(&ctx).unwrap();
    }
}
