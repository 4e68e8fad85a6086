use crate::FoldKind;
use serde::Serialize;
use wphl_lexer::{Host, Position, Range};

/// How a marked range is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Decoration {
    /// A tag whose counterpart was found, or the counterpart itself.
    MatchingTag,
    /// A tag without counterpart.
    NonMatchingTag,
    /// The range is collapsed and shown as `glyph`.
    Placeholder { glyph: String, kind: FoldKind },
}

impl Decoration {
    /// CSS class the host applies for highlight decorations.
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Decoration::MatchingTag => Some("cm-matchingtag"),
            Decoration::NonMatchingTag => Some("cm-nonmatchingtag"),
            Decoration::Placeholder { .. } => None,
        }
    }
}

/// The editor operations folding and highlighting need on top of
/// read access to its lines.
///
/// Marks never change the document text; clearing a mark restores the
/// original rendering.
pub trait Editor: Host {
    /// Handle of a marked range.
    type Mark;

    fn cursor(&self) -> Position;

    fn has_selection(&self) -> bool;

    fn mark_range(&mut self, range: Range, decoration: Decoration) -> Self::Mark;

    fn clear_mark(&mut self, mark: Self::Mark);

    /// Run `f` as one atomic batch of reads and mark changes.
    fn operation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        f(self)
    }
}
