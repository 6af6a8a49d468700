// Prefix highlighting for suggestion rows.
//
// Only a match at the start of the name is emphasized. A name that merely
// contains the query somewhere else is still listed by the filter but is
// rendered without emphasis.

/// A suggestion split into an emphasized prefix and a plain remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight<'a> {
    pub text: &'a str,
    /// Length in bytes of the emphasized prefix of `text` (0 = no emphasis).
    pub matched_prefix_len: usize,
}

impl<'a> Highlight<'a> {
    pub fn plain(text: &'a str) -> Self {
        Highlight {
            text,
            matched_prefix_len: 0,
        }
    }

    /// The emphasized part of the text.
    pub fn matched(&self) -> &'a str {
        &self.text[..self.matched_prefix_len]
    }

    /// The non-emphasized remainder of the text.
    pub fn rest(&self) -> &'a str {
        &self.text[self.matched_prefix_len..]
    }

    pub fn is_emphasized(&self) -> bool {
        self.matched_prefix_len > 0
    }
}

/// Annotate `text` with the prefix that case-insensitively equals `query`.
///
/// The query is used as typed (untrimmed), so a trailing space never
/// highlights a name whose next character is not a space.
pub fn annotate<'a>(text: &'a str, query: &str) -> Highlight<'a> {
    let mut end = 0;
    let mut text_chars = text.char_indices();

    for q in query.chars() {
        match text_chars.next() {
            Some((i, t)) if t.to_lowercase().eq(q.to_lowercase()) => end = i + t.len_utf8(),
            _ => return Highlight::plain(text),
        }
    }

    Highlight {
        text,
        matched_prefix_len: end,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
