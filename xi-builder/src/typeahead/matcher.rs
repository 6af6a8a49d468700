// Candidate matching: case-insensitive substring filter with exclusion.
//
// The filter is stable (universe order is preserved) and never ranks. Prefix
// matches are emphasized by the highlight annotator but not sorted first.

use std::collections::{BTreeSet, HashSet};

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// The ordered list of selectable names for one page.
///
/// Names are trimmed, empty names are dropped, and duplicates keep their first
/// position. Lowercased copies are computed once at construction so filtering
/// does not re-fold every name on every keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    names: Vec<String>,
    folded: Vec<String>,
}

impl Universe {
    /// A universe with no candidates (used before a page has loaded).
    pub const EMPTY: &'static Universe = &Universe::empty();

    pub const fn empty() -> Self {
        Universe {
            names: Vec::new(),
            folded: Vec::new(),
        }
    }

    /// Build a universe from raw names, preserving their order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut universe = Universe::empty();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }
            universe.folded.push(name.to_lowercase());
            universe.names.push(name.to_string());
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Exclusion
// ---------------------------------------------------------------------------

/// Names that must never be suggested (typically the already-chosen squad).
pub trait ExclusionSet {
    fn excludes(&self, candidate: &str) -> bool;
}

/// Exclusion set for pages that allow re-picking the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoExclusion;

impl ExclusionSet for NoExclusion {
    fn excludes(&self, _candidate: &str) -> bool {
        false
    }
}

impl ExclusionSet for HashSet<String> {
    fn excludes(&self, candidate: &str) -> bool {
        self.contains(candidate)
    }
}

impl ExclusionSet for BTreeSet<String> {
    fn excludes(&self, candidate: &str) -> bool {
        self.contains(candidate)
    }
}

impl ExclusionSet for [String] {
    fn excludes(&self, candidate: &str) -> bool {
        self.iter().any(|n| n == candidate)
    }
}

impl<T: ExclusionSet + ?Sized> ExclusionSet for &T {
    fn excludes(&self, candidate: &str) -> bool {
        (**self).excludes(candidate)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Filter `universe` down to the names containing `query`.
///
/// The query is trimmed and compared case-insensitively as a substring.
/// Excluded names are removed unconditionally. An empty query returns every
/// non-excluded name; whether to display that list is the caller's decision.
pub fn filter<'a, E>(query: &str, universe: &'a Universe, exclusion: &E) -> Vec<&'a str>
where
    E: ExclusionSet + ?Sized,
{
    let needle = query.trim().to_lowercase();

    universe
        .names
        .iter()
        .zip(&universe.folded)
        .filter(|(name, _)| !exclusion.excludes(name))
        .filter(|(_, folded)| needle.is_empty() || folded.contains(&needle))
        .map(|(name, _)| name.as_str())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
