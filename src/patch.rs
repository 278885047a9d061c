//! Ordered find/replace engine for generated project files
//!
//! A [`PatchSet`] is an ordered list of [`PatchRule`]s applied against a
//! whole-file text buffer, with an optional marker string that makes the
//! apply idempotent: when the marker is already present the file is treated
//! as patched and left untouched. Revert mode swaps the search/replacement
//! roles of every rule and ignores the marker guard.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::{NoExpand, Regex};

use crate::{HookError, HookResult};

/// Search side of a patch rule
#[derive(Debug, Clone)]
enum Search {
    Literal(String),
    Pattern(Regex),
}

/// A single ordered find/replace pair
///
/// Literal searches replace the first occurrence only; callers that need
/// every occurrence patched must supply one rule per occurrence. Pattern
/// searches replace the first regex match.
#[derive(Debug, Clone)]
pub struct PatchRule {
    search: Search,
    replace: String,
}

impl PatchRule {
    /// Rule that replaces the first occurrence of a literal string
    pub fn literal(search: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            search: Search::Literal(search.into()),
            replace: replace.into(),
        }
    }

    /// Rule that replaces the first match of a regex pattern
    ///
    /// The replacement is spliced in verbatim; `$` has no special meaning.
    pub fn pattern(search: Regex, replace: impl Into<String>) -> Self {
        Self {
            search: Search::Pattern(search),
            replace: replace.into(),
        }
    }

    fn apply(&self, text: &str) -> String {
        match &self.search {
            Search::Literal(search) => text.replacen(search.as_str(), &self.replace, 1),
            Search::Pattern(search) => search.replace(text, NoExpand(&self.replace)).into_owned(),
        }
    }

    fn revert(&self, text: &str) -> HookResult<String> {
        match &self.search {
            Search::Literal(search) => Ok(text.replacen(self.replace.as_str(), search, 1)),
            Search::Pattern(_) => Err(HookError::IrreversibleRule),
        }
    }
}

/// Result of applying a [`PatchSet`] to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file was rewritten
    Patched,
    /// The idempotency marker was already present; nothing was written
    AlreadyApplied,
}

/// An ordered sequence of patch rules plus an optional idempotency marker
#[derive(Debug, Clone, Default)]
pub struct PatchSet {
    rules: Vec<PatchRule>,
    marker: Option<String>,
}

impl PatchSet {
    pub fn new(rules: Vec<PatchRule>) -> Self {
        Self {
            rules,
            marker: None,
        }
    }

    /// Guard the apply with a marker: if the marker substring is already
    /// present in the file, the whole set is skipped
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Apply every rule in order against a text buffer
    ///
    /// Later rules see the output of earlier rules. The marker guard is a
    /// file-level concern and is not consulted here.
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc))
    }

    /// Apply every rule in order with search and replacement swapped
    pub fn revert(&self, text: &str) -> HookResult<String> {
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule.revert(&out)?;
        }
        Ok(out)
    }

    /// Read the file, apply the set, and write the result back in place
    ///
    /// Fails with [`HookError::NotFound`] when the file is missing. When a
    /// marker is set and already present in the content, nothing is written.
    pub fn apply_to_file(&self, path: &Path) -> HookResult<PatchOutcome> {
        let content = read_file(path)?;

        if let Some(marker) = &self.marker {
            if content.contains(marker.as_str()) {
                return Ok(PatchOutcome::AlreadyApplied);
            }
        }

        fs::write(path, self.apply(&content))?;
        Ok(PatchOutcome::Patched)
    }

    /// Read the file, revert the set, and write the result back in place
    ///
    /// The marker guard is ignored: a revert must run even on a file whose
    /// marker is present, that is the whole point.
    pub fn revert_file(&self, path: &Path) -> HookResult<()> {
        let content = read_file(path)?;
        fs::write(path, self.revert(&content)?)?;
        Ok(())
    }
}

/// Read a whole file, mapping a missing path to [`HookError::NotFound`]
pub(crate) fn read_file(path: &Path) -> HookResult<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            HookError::NotFound(path.to_path_buf())
        } else {
            HookError::Io(e)
        }
    })
}
