//! Folding and tag highlighting driven by cursor activity.
//!
//! Builds on the matchers in `wphl-matcher`. The editor is reached
//! through the [`Editor`] trait, which adds cursor, selection and range
//! marks to the read-only [`wphl_lexer::Host`].
//!
//! ```
//! use wphl_fold::{enclosing_fold, FoldKind};
//! use wphl_lexer::{Document, Position};
//! use wphl_matcher::MatchConfig;
//!
//! let doc = Document::new("<div>{{Infobox|name=x}}</div>");
//! let target = enclosing_fold(&doc, Position::new(0, 17), &MatchConfig::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(target.kind, FoldKind::Template);
//! ```

pub mod config;
pub mod debounce;
pub mod editor;
pub mod fold;
pub mod highlight;

#[cfg(test)]
mod testing;

pub use config::FoldConfig;
pub use debounce::HideTimer;
pub use editor::{Decoration, Editor};
pub use fold::{enclosing_fold, Fold, FoldController, FoldId, FoldKind, FoldTarget, Tooltip};
pub use highlight::TagHighlighter;
