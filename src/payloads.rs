//! Literal patch payloads woven into the generated projects
//!
//! Everything here is inserted or removed verbatim, so the exact spelling
//! (including trailing spaces in linker flags) matters.

/// Per-plugin iOS linker flags, keyed by the `cordova-plugin-bbd-<key>`
/// suffix in the app's dependencies
pub const LINKER_FLAGS: &[(&str, &str)] = &[
    ("application", "-framework \"BbdApplicationPlugin\" "),
    ("appkinetics", "-framework \"BbdAppKineticsPlugin\" "),
    ("httprequest", "-framework \"BbdHttpRequestPlugin\" "),
    ("interappcommunication", "-framework \"BbdInterAppCommunicationPlugin\" "),
    ("mailto", "-framework \"BbdMailToPlugin\" "),
    ("push", "-framework \"BbdPushPlugin\" "),
    ("serversideservices", "-framework \"BbdServerSideServicesPlugin\" "),
    ("socket", "-framework \"BbdSocketPlugin\" "),
    ("specificpolicies", "-framework \"BbdSpecificPoliciesPlugin\" "),
    ("storage", "-framework \"BbdStoragePlugin\" "),
    ("tokenhelper", "-framework \"BbdTokenHelperPlugin\" "),
    ("websocket", "-framework \"BbdWebSocketPlugin\" "),
    ("launcher", "-framework \"BbdLauncherPlugin\" "),
];

/// Base linker flag every Dynamics build carries; plugin flags are appended
/// right after it
pub const DYNAMICS_LINKER_FLAG: &str = "-framework \"BlackBerryDynamics\" ";

pub const LAUNCHER_POD: &str =
    "pod 'BlackBerryLauncher', :path => '../../node_modules/cordova-plugin-bbd-launcher'";

pub const DYNAMICS_POD_DEPENDENCY: &str = "s.dependency 'BlackBerryDynamics'";

pub const SWIFT_VERSION_LINE: &str = "s.swift_version  = '5.1'";

pub const CORDOVA_POD_DEPENDENCY: &str = "s.dependency 'CapacitorCordova'";

pub const ADD_YOUR_PODS_HERE: &str = "# Add your Pods here";

pub const XCCONFIG_WITHOUT_DYNAMICS: &str =
    "s.xcconfig = {'GCC_PREPROCESSOR_DEFINITIONS' => '$(inherited) COCOAPODS=1 WK_WEB_VIEW_ONLY=1' }";

pub const XCCONFIG_WITH_DYNAMICS: &str =
    "s.xcconfig = {'GCC_PREPROCESSOR_DEFINITIONS' => '$(inherited) COCOAPODS=1 WK_WEB_VIEW_ONLY=1 BBD_CAPACITOR=1' }";

pub fn platform_ios_line(version: &str) -> String {
    format!("platform :ios, '{version}'")
}

// Swift payloads for CAPBridgeViewController.swift

pub const CORDOVA_IMPORT: &str = "import Cordova";

pub const DYNAMICS_IMPORT: &str = "import BlackBerryDynamics.Runtime";

pub const LOAD_WEB_VIEW: &str = "loadWebView()";

pub const NOTIFICATION_CENTER_OBSERVER: &str = "NotificationCenter.default.addObserver(self, selector: #selector(registerGDStateChangeHandler(notification:)), name: NSNotification.Name.GDStateChange, object: nil)";

pub const INITIALIZATION_MARK: &str = "// MARK: - Initialization";

pub const STATE_CHANGE_HANDLER: &str = r#"@objc func registerGDStateChangeHandler(notification: NSNotification) {
        if (notification.name == NSNotification.Name.GDStateChange)
        {
            let userInfo: NSDictionary = notification.userInfo! as NSDictionary
            let propertyName = userInfo[GDStateChangeKeyProperty]

            if (propertyName as! String == GDKeyIsAuthorized)
            {
                loadWebView()
            }
        }
    }"#;

// Android payloads

pub const DYNAMICS_BRIDGE_ACTIVITY: &str = "com.good.gd.cordova.capacitor.BridgeActivity\"";

pub const CAPACITOR_BRIDGE_ACTIVITY_IMPORT: &str = "import com.getcapacitor.BridgeActivity;";

pub const DYNAMICS_BRIDGE_ACTIVITY_IMPORT: &str =
    "import com.good.gd.cordova.capacitor.BridgeActivity;";

pub const XMLNS_TOOLS_ATTRIBUTE: &str = "xmlns:tools=\"http://schemas.android.com/tools\"";

/// Attributes inserted into `<application>` during sync, removed on
/// uninstall
pub const APPLICATION_ATTRIBUTES: &[&str] = &[
    "tools:replace=\"android:supportsRtl\"",
    "android:supportsRtl=\"true\"",
    "android:name=\"com.good.gd.cordova.core.BBDCordovaApp\"",
];

pub const MIN_SDK_VERSION_DYNAMICS: &str = "minSdkVersion = 28";
pub const MIN_SDK_VERSION_DEFAULT: &str = "minSdkVersion = 21";

pub const CORDOVA_ANDROID_VERSION_DYNAMICS: &str = "cordovaAndroidVersion = '10.1.1'";
pub const CORDOVA_ANDROID_VERSION_DEFAULT: &str = "cordovaAndroidVersion = '7.0.0'";
