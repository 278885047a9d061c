//! Capacitor Dynamics Hooks - patch generated native projects for the
//! BlackBerry Dynamics runtime
//!
//! This crate implements the lifecycle hooks that run after a Capacitor
//! scaffolding/sync step. Each hook reads a generated native artifact
//! (AndroidManifest.xml, Podfile, variables.gradle, package.json, ...),
//! performs idempotency-guarded text or JSON edits, and writes the result
//! back in place.
//!
//! # Example
//!
//! ```no_run
//! use capacitor_dynamics_hooks::{hooks, Platform, ProjectContext};
//!
//! let ctx = ProjectContext::discover("/path/to/app", "/path/to/plugin").unwrap();
//! hooks::sync(&ctx, Platform::Android).unwrap();
//! ```

mod intent;
mod patch;
mod payloads;
mod project;
mod xml;

pub mod hooks;

use std::path::PathBuf;
use thiserror::Error;

pub use intent::{npm_intent, npm_intent_from_env, NpmIntent};
pub use patch::{PatchOutcome, PatchRule, PatchSet};
pub use project::ProjectContext;
pub use xml::{insert_attribute, remove_attribute_line};

/// Native platform targeted by a hook run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl Platform {
    /// Returns the directory name Capacitor uses for this platform
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// Errors that can occur while patching a generated project
#[derive(Error, Debug)]
pub enum HookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not exists at path {0}")]
    NotFound(PathBuf),

    #[error("Element <{element}> not found in XML document")]
    ElementNotFound { element: String },

    #[error("Pattern rules cannot be applied in revert mode")]
    IrreversibleRule,

    #[error("Anchor {anchor:?} not found in {path}")]
    MissingAnchor { path: PathBuf, anchor: String },

    #[error("No appId found in capacitor.config.json or capacitor.config.ts")]
    MissingBundleId,

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Result type for hook operations
pub type HookResult<T> = Result<T, HookError>;
