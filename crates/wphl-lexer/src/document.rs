use crate::host::Host;
use crate::scanner::Scanner;
use crate::token::{Position, TokenKind};
use std::borrow::Cow;

/// An in-memory, fully classified document.
///
/// Serves as the host for the command-line tool and for tests. Lines can
/// be marked as not yet loaded to imitate an editor that materializes
/// lines lazily.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<String>,
    kinds: Vec<Vec<TokenKind>>,
    unloaded: Vec<bool>,
}

impl Document {
    pub fn new(source: &str) -> Self {
        let lines: Vec<String> = source
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        let kinds = Scanner::classify(source);
        debug_assert_eq!(lines.len(), kinds.len());
        let unloaded = vec![false; lines.len()];
        Self {
            lines,
            kinds,
            unloaded,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Pretend `line` has not been rendered yet: it reads as unavailable
    /// and unclassified until loaded again.
    pub fn unload_line(&mut self, line: usize) {
        if let Some(flag) = self.unloaded.get_mut(line) {
            *flag = true;
        }
    }

    pub fn load_line(&mut self, line: usize) {
        if let Some(flag) = self.unloaded.get_mut(line) {
            *flag = false;
        }
    }

    /// Position of the first occurrence of `needle`, searching from `start`.
    pub fn find_from(&self, needle: &str, start: Position) -> Option<Position> {
        for (index, line) in self.lines.iter().enumerate().skip(start.line) {
            let skip = if index == start.line { start.column } else { 0 };
            let offset: usize = line.chars().take(skip).map(char::len_utf8).sum();
            if let Some(byte) = line.get(offset..).and_then(|rest| rest.find(needle)) {
                let column = line[..offset + byte].chars().count();
                return Some(Position::new(index, column));
            }
        }
        None
    }

    /// Position of the first occurrence of `needle`.
    pub fn find(&self, needle: &str) -> Option<Position> {
        self.find_from(needle, Position::default())
    }

    fn is_loaded(&self, line: usize) -> bool {
        self.unloaded.get(line).is_some_and(|unloaded| !unloaded)
    }
}

impl Host for Document {
    fn first_line(&self) -> usize {
        0
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if !self.is_loaded(line) {
            return None;
        }
        self.lines.get(line).map(|text| Cow::Borrowed(text.as_str()))
    }

    fn token_kind(&self, line: usize, column: usize) -> TokenKind {
        if !self.is_loaded(line) {
            return TokenKind::TEXT;
        }
        self.kinds
            .get(line)
            .and_then(|kinds| kinds.get(column))
            .copied()
            .unwrap_or(TokenKind::TEXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Role;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines() {
        let doc = Document::new("a\r\nbc\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.lines().collect::<Vec<_>>(), vec!["a", "bc", ""]);
        assert_eq!(doc.last_line(), 2);
    }

    #[test]
    fn test_token_kind() {
        let doc = Document::new("x <b>");
        assert_eq!(doc.token_kind(0, 0), TokenKind::TEXT);
        assert_eq!(doc.token_kind(0, 3).role, Role::TagName);
        assert_eq!(doc.token_kind(0, 99), TokenKind::TEXT);
        assert_eq!(doc.token_kind(7, 0), TokenKind::TEXT);
    }

    #[test]
    fn test_kind_before_cursor() {
        let doc = Document::new("<b>x");
        assert_eq!(doc.kind_before(Position::new(0, 0)).role, Role::TagBracket);
        assert_eq!(doc.kind_before(Position::new(0, 2)).role, Role::TagName);
        assert_eq!(doc.kind_before(Position::new(0, 4)).role, Role::Text);
    }

    #[test]
    fn test_unloaded_line() {
        let mut doc = Document::new("<b>\n<i>");
        doc.unload_line(1);
        assert!(doc.line(1).is_none());
        assert_eq!(doc.token_kind(1, 1), TokenKind::TEXT);
        doc.load_line(1);
        assert_eq!(doc.line(1).as_deref(), Some("<i>"));
    }

    #[test]
    fn test_find() {
        let doc = Document::new("héllo\nwörld wörld");
        assert_eq!(doc.find("llo"), Some(Position::new(0, 2)));
        assert_eq!(doc.find("wörld"), Some(Position::new(1, 0)));
        assert_eq!(
            doc.find_from("wörld", Position::new(1, 1)),
            Some(Position::new(1, 6))
        );
        assert_eq!(doc.find("zzz"), None);
    }
}
