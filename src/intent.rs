//! Detection of npm install/uninstall intent
//!
//! The npm lifecycle runs our scripts on every `npm i`, `yarn`, or install
//! of an unrelated module. The hooks must act only when this plugin itself
//! is being installed or removed, so they inspect the original npm argv
//! (the `npm_config_argv` environment variable, a JSON object with an
//! `original` array) and exit quietly otherwise.

use serde::Deserialize;

/// What the surrounding npm invocation is doing with this plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpmIntent {
    Install,
    Uninstall,
}

/// Package names under which this plugin may be installed
const PLUGIN_NAMES: &[&str] = &["capacitor-plugin-bbd-base", "capacitor-base"];

/// Flags stripped from the argv before positional inspection
const IGNORED_FLAGS: &[&str] = &["--save", "--verbose", "--d"];

const INSTALL_VERBS: &[&str] = &["i", "install", "add"];
const UNINSTALL_VERBS: &[&str] = &["uninstall", "remove"];

#[derive(Deserialize)]
struct NpmConfigArgv {
    original: Vec<String>,
}

/// Classify an npm argv as an install or uninstall of this plugin
///
/// Returns None when the invocation does not target this plugin (e.g. a
/// bare `npm i`, `yarn`, or an install of some other module).
pub fn npm_intent(original_argv: &[String]) -> Option<NpmIntent> {
    let filtered: Vec<&str> = original_argv
        .iter()
        .map(String::as_str)
        .filter(|arg| !IGNORED_FLAGS.contains(arg))
        .collect();

    let target = filtered.get(1)?;
    if !PLUGIN_NAMES.iter().any(|name| target.contains(name)) {
        return None;
    }

    if filtered.iter().any(|arg| INSTALL_VERBS.contains(arg)) {
        Some(NpmIntent::Install)
    } else if filtered.iter().any(|arg| UNINSTALL_VERBS.contains(arg)) {
        Some(NpmIntent::Uninstall)
    } else {
        None
    }
}

/// Classify the ambient npm invocation via the `npm_config_argv` variable
pub fn npm_intent_from_env() -> Option<NpmIntent> {
    let raw = std::env::var("npm_config_argv").ok()?;
    let argv: NpmConfigArgv = serde_json::from_str(&raw).ok()?;
    npm_intent(&argv.original)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_install_of_plugin() {
        assert_eq!(
            npm_intent(&argv(&["install", "capacitor-plugin-bbd-base"])),
            Some(NpmIntent::Install)
        );
        assert_eq!(
            npm_intent(&argv(&["i", "capacitor-plugin-bbd-base", "--save"])),
            Some(NpmIntent::Install)
        );
        assert_eq!(
            npm_intent(&argv(&["add", "file:../capacitor-base"])),
            Some(NpmIntent::Install)
        );
    }

    #[test]
    fn test_uninstall_of_plugin() {
        assert_eq!(
            npm_intent(&argv(&["uninstall", "capacitor-plugin-bbd-base"])),
            Some(NpmIntent::Uninstall)
        );
        assert_eq!(
            npm_intent(&argv(&["remove", "capacitor-plugin-bbd-base", "--verbose"])),
            Some(NpmIntent::Uninstall)
        );
    }

    #[test]
    fn test_unrelated_invocations_are_ignored() {
        assert_eq!(npm_intent(&argv(&["install"])), None);
        assert_eq!(npm_intent(&argv(&["i", "left-pad"])), None);
        assert_eq!(npm_intent(&argv(&[])), None);
    }

    #[test]
    fn test_ignored_flags_do_not_shift_the_target() {
        assert_eq!(
            npm_intent(&argv(&["install", "--save", "capacitor-plugin-bbd-base"])),
            Some(NpmIntent::Install)
        );
    }
}
