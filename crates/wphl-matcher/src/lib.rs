//! Wikiplus-highlight structural matchers
//!
//! Answers local structural questions about a highlighted wikitext
//! document: which tag balances the one under the cursor, which tag pair,
//! template or comment encloses the cursor. Matchers read the document
//! through the `wphl_lexer::Host` trait, one line at a time, and never
//! look further than the configured scan bounds (except the comment
//! matcher, which searches raw text).
//!
//! Absence is the normal answer: every matcher returns `Ok(None)` when
//! nothing matches. `Err` is reserved for a position outside the
//! document.
//!
//! # Example
//!
//! ```
//! use wphl_lexer::{Document, Position};
//! use wphl_matcher::{find_matching_tag, MatchConfig};
//!
//! let doc = Document::new("<b>bold</b>");
//! let config = MatchConfig::default();
//! let found = find_matching_tag(&doc, Position::new(0, 1), &config).unwrap().unwrap();
//! assert_eq!(found.other().unwrap().from, Position::new(0, 7));
//! ```

pub mod comment;
pub mod config;
pub mod line_scanner;
pub mod tag;
pub mod template;

pub use comment::find_enclosing_comment;
pub use config::MatchConfig;
pub use line_scanner::{Direction, LineScanner};
pub use tag::{
    find_enclosing_tag, find_matching_tag, scan_for_closing_tag, TagMatch, TagPair, TagSpan,
};
pub use template::{find_enclosing_template, scan_for_delimiter_and_bracket, DelimiterScan};

/// Matcher error with position information.
///
/// Only raised for a starting position outside the document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Match error at line {line}, column {column}: {message}")]
pub struct MatchError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

/// Invalid matcher or fold configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Config error: {message}")]
pub struct ConfigError {
    pub message: String,
}
