use crate::token::{Position, TokenKind};
use std::borrow::Cow;

/// Read access to a line-oriented, already highlighted document.
///
/// Implemented by the editor adapter. Lines may be materialized lazily;
/// `line` returns `None` for a line that is out of range or not yet
/// available, and callers skip such lines instead of failing.
pub trait Host {
    fn first_line(&self) -> usize;

    fn last_line(&self) -> usize;

    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Classification of the char at `column` on `line`.
    fn token_kind(&self, line: usize, column: usize) -> TokenKind;

    /// Classification of the char just before a cursor position.
    ///
    /// At column 0 this is the first char of the line.
    fn kind_before(&self, pos: Position) -> TokenKind {
        self.token_kind(pos.line, pos.column.saturating_sub(1))
    }

    fn contains_line(&self, line: usize) -> bool {
        (self.first_line()..=self.last_line()).contains(&line)
    }
}
