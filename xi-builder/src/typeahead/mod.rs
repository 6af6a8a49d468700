// Typeahead selector: query editing, suggestion cursor, and commit.
//
// The selector is a small Closed/Open state machine shared by every page. It
// does not own the candidate universe or the chosen set; both are passed in on
// each call so the suggestion list is always derived from current data.

pub mod highlight;
pub mod matcher;

use std::convert::Infallible;

use highlight::{annotate, Highlight};
use matcher::{filter, ExclusionSet, NoExclusion, Universe};

// ---------------------------------------------------------------------------
// Commit sinks
// ---------------------------------------------------------------------------

/// The host side of a commit: decides whether a candidate is accepted and
/// which names are excluded from suggestions.
pub trait CommitSink: ExclusionSet {
    type Error;

    fn accept(&mut self, candidate: &str) -> Result<(), Self::Error>;
}

/// Sink for single-pick lookups: always accepts, excludes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinglePick;

impl ExclusionSet for SinglePick {
    fn excludes(&self, candidate: &str) -> bool {
        NoExclusion.excludes(candidate)
    }
}

impl CommitSink for SinglePick {
    type Error = Infallible;

    fn accept(&mut self, _candidate: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Closed,
    Open,
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome<E> {
    /// There was nothing to commit (no visible suggestion under the cursor,
    /// or the picked name is not on the list).
    Nothing,
    /// The sink accepted the candidate; the query was cleared and the
    /// selector closed.
    Committed(String),
    /// The sink refused the candidate; the selector is unchanged.
    Rejected { candidate: String, reason: E },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    state: SelectorState,
    query: String,
    cursor: usize,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SelectorState::Open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The control gained focus.
    pub fn focus(&mut self) {
        self.open();
    }

    /// Replace the query. Opens the selector and resets the cursor.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.cursor = 0;
        self.open();
    }

    pub fn insert_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query);
    }

    pub fn backspace(&mut self) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query);
    }

    /// The suggestions currently on display.
    ///
    /// A closed selector shows nothing. So does a blank query, even though the
    /// matcher would return the whole non-excluded universe for it.
    pub fn suggestions<'a, E>(&self, universe: &'a Universe, exclusion: &E) -> Vec<&'a str>
    where
        E: ExclusionSet + ?Sized,
    {
        if !self.is_open() || self.query.trim().is_empty() {
            return Vec::new();
        }
        filter(&self.query, universe, exclusion)
    }

    /// Suggestions annotated with their highlighted prefix.
    pub fn rows<'a, E>(&self, universe: &'a Universe, exclusion: &E) -> Vec<Highlight<'a>>
    where
        E: ExclusionSet + ?Sized,
    {
        self.suggestions(universe, exclusion)
            .into_iter()
            .map(|name| annotate(name, &self.query))
            .collect()
    }

    /// The name under the cursor, if the list is non-empty.
    pub fn highlighted<'a, E>(&self, universe: &'a Universe, exclusion: &E) -> Option<&'a str>
    where
        E: ExclusionSet + ?Sized,
    {
        let suggestions = self.suggestions(universe, exclusion);
        let last = suggestions.len().checked_sub(1)?;
        suggestions.get(self.cursor.min(last)).copied()
    }

    /// Move the cursor one row down, stopping at the last row.
    pub fn move_down<E>(&mut self, universe: &Universe, exclusion: &E)
    where
        E: ExclusionSet + ?Sized,
    {
        if !self.is_open() {
            return;
        }
        let len = self.suggestions(universe, exclusion).len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1).min(len - 1);
    }

    /// Move the cursor one row up, stopping at the first row.
    pub fn move_up(&mut self) {
        if !self.is_open() {
            return;
        }
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Commit the row under the cursor (the Enter key).
    pub fn commit_highlighted<S>(&mut self, universe: &Universe, sink: &mut S) -> CommitOutcome<S::Error>
    where
        S: CommitSink,
    {
        if !self.is_open() {
            return CommitOutcome::Nothing;
        }
        match self.highlighted(universe, &*sink) {
            Some(candidate) => self.offer(candidate.to_string(), sink),
            None => CommitOutcome::Nothing,
        }
    }

    /// Commit a specific row chosen with the pointer.
    pub fn commit_candidate<S>(
        &mut self,
        universe: &Universe,
        candidate: &str,
        sink: &mut S,
    ) -> CommitOutcome<S::Error>
    where
        S: CommitSink,
    {
        let listed = self
            .suggestions(universe, &*sink)
            .into_iter()
            .any(|name| name == candidate);
        if !listed {
            return CommitOutcome::Nothing;
        }
        self.offer(candidate.to_string(), sink)
    }

    /// The control lost focus. Always closes.
    pub fn blur(&mut self) {
        self.state = SelectorState::Closed;
    }

    /// Close, then run the host's on-blur hook with the query left behind.
    pub fn blur_with<F>(&mut self, hook: F)
    where
        F: FnOnce(&str),
    {
        self.blur();
        hook(&self.query);
    }

    fn offer<S>(&mut self, candidate: String, sink: &mut S) -> CommitOutcome<S::Error>
    where
        S: CommitSink,
    {
        match sink.accept(&candidate) {
            Ok(()) => {
                self.query.clear();
                self.cursor = 0;
                self.state = SelectorState::Closed;
                CommitOutcome::Committed(candidate)
            }
            Err(reason) => CommitOutcome::Rejected { candidate, reason },
        }
    }

    fn open(&mut self) {
        if self.state == SelectorState::Closed {
            self.state = SelectorState::Open;
            self.cursor = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
