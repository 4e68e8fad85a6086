//! Wikiplus-highlight lexer layer
//!
//! The data model shared by the structural matchers: cursor positions,
//! ranges and per-char token classification. Also defines the `Host`
//! trait through which matchers read an editor's lines, the adapter from
//! the editor highlighter's token-type strings, and a reference wikitext
//! classifier with an in-memory `Document` host.
//!
//! # Example
//!
//! ```
//! use wphl_lexer::{Document, Host, Role};
//!
//! let doc = Document::new("{{Name|<b>x</b>}}");
//! assert_eq!(doc.token_kind(0, 8).role, Role::TagName);
//! assert!(doc.token_kind(0, 8).is_template_ground());
//! ```

pub mod document;
pub mod host;
pub mod scanner;
pub mod token;

pub use document::Document;
pub use host::Host;
pub use scanner::Scanner;
pub use token::{Position, Range, Role, TokenKind};
