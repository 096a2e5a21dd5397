#![doc = include_str!("../README.md")]

pub mod arena;
mod bowstring;
mod buffer;
mod diagnostic;
mod lexer;
mod metrics;
mod parser;
mod result;
mod strategy;
#[cfg(test)]
mod tests;
mod token;
mod version;

pub use crate::bowstring::BowString;
pub use crate::buffer::SourceBuffer;
pub use crate::diagnostic::Diagnostic;
pub use crate::metrics::{Metrics, MetricsSnapshot};
pub use crate::parser::{IllegalArgument, Parser, SyntaxTree, MAX_INPUT_BYTES};
pub use crate::result::{InvalidParseResult, ParseResult};
pub use crate::token::{Token, TokenKind};
pub use crate::version::LanguageVersion;
