//! Cursor-based scanning over a template string.
//!
//! The scanner never backtracks: every primitive either leaves the cursor where
//! it is or moves it forward, and the cursor never passes the end of input.

use regex::Regex;

use crate::expression::Dependencies;

/// Byte range inside a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Regex class for the whitespace `is_whitespace` accepts
pub const WHITESPACE_CLASS: &str = r"[[\s\x{FEFF}]--\x{85}]";

/// ECMAScript whitespace and line terminators: Unicode `White_Space` plus
/// U+FEFF, minus U+0085.
pub fn is_whitespace(c: char) -> bool {
    c == '\u{feff}' || (c != '\u{85}' && c.is_whitespace())
}

/// Compiled delimiter patterns plus the literal delimiter lengths used to step
/// over a matched delimiter.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub close_delimiter: String,
    pub open_len: usize,
    pub close_len: usize,
    pub open: Regex,
    /// Close delimiter preceded by optional whitespace
    pub close: Regex,
}

/// Mutable state for a single compile call.
pub struct ScanState<'a> {
    pub cursor: usize,
    pub template: &'a str,
    pub output: String,
    pub close_delimiter: &'a str,
    pub open_len: usize,
    pub close_len: usize,
    pub open: &'a Regex,
    pub close: &'a Regex,
    pub dependencies: &'a mut Dependencies,
}

impl<'a> ScanState<'a> {
    pub fn new(template: &'a str, patterns: &'a Patterns, dependencies: &'a mut Dependencies) -> Self {
        Self {
            cursor: 0,
            template,
            output: String::with_capacity(template.len()),
            close_delimiter: &patterns.close_delimiter,
            open_len: patterns.open_len,
            close_len: patterns.close_len,
            open: &patterns.open,
            close: &patterns.close,
            dependencies,
        }
    }

    /// Unscanned remainder of the template
    pub fn tail(&self) -> &'a str {
        let template = self.template;
        &template[self.cursor..]
    }

    /// Character under the cursor, `None` at end of input.
    pub fn peek(&self) -> Option<char> {
        self.tail().chars().next()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.template.len()
    }

    /// Moves the cursor forward by `n` bytes, clamped to the end of input and
    /// rounded up to the next character boundary.
    pub fn advance(&mut self, n: usize) {
        let len = self.template.len();
        let mut cursor = (self.cursor + n).min(len);
        while !self.template.is_char_boundary(cursor) {
            cursor += 1;
        }
        self.cursor = cursor;
    }
}

/// Returns the longest prefix of the unscanned input that does not match
/// `pattern` and moves the cursor past it.
pub fn scan_until<'a>(state: &mut ScanState<'a>, pattern: &Regex) -> &'a str {
    let tail = state.tail();
    let matched = match pattern.find(tail) {
        None => tail,
        Some(m) => &tail[..m.start()],
    };
    state.cursor += matched.len();
    matched
}

/// Skips consecutive whitespace. End of input reads as `None`, which is not
/// whitespace, so the loop stops there without a separate length check.
pub fn scan_whitespace(state: &mut ScanState<'_>) {
    while let Some(c) = state.peek().filter(|&c| is_whitespace(c)) {
        state.cursor += c.len_utf8();
    }
}
