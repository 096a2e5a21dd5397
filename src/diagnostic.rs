//! Parse diagnostics: structured, immutable error records.

use crate::BowString;

/// A single lexical, syntactic, or resource-exhaustion diagnostic.
///
/// `offset` is a byte offset into the source; `line`/`column` are 1-based.
/// Diagnostics are immutable once added to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    offset: u32,
    line: u32,
    column: u32,
    message: BowString,
}

impl Diagnostic {
    pub fn new(offset: u32, line: u32, column: u32, message: impl Into<BowString>) -> Self {
        Self {
            offset,
            line,
            column,
            message: message.into(),
        }
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Message text for the recursion guard, matching spec.md §7's required wording.
pub(crate) fn recursion_limit_message(limit: u32) -> String {
    format!("Maximum recursion depth exceeded: {limit}")
}
