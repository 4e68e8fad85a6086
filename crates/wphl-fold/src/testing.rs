//! An in-memory editor for unit tests.

use crate::editor::{Decoration, Editor};
use std::borrow::Cow;
use wphl_lexer::{Document, Host, Position, Range, TokenKind};

pub(crate) struct FakeEditor {
    pub doc: Document,
    pub cursor: Position,
    pub selection: bool,
    /// Live marks by handle.
    pub marks: Vec<(usize, Range, Decoration)>,
    next_mark: usize,
}

/// Route `log` output of the code under test to the test harness.
pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

impl FakeEditor {
    pub fn new(source: &str) -> Self {
        init();
        Self {
            doc: Document::new(source),
            cursor: Position::default(),
            selection: false,
            marks: Vec::new(),
            next_mark: 0,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.cursor = Position::new(line, column);
        self
    }

    pub fn decorations(&self) -> Vec<(Range, Decoration)> {
        self.marks
            .iter()
            .map(|(_, range, decoration)| (*range, decoration.clone()))
            .collect()
    }

    pub fn text(&self) -> String {
        self.doc.lines().collect::<Vec<_>>().join("\n")
    }
}

impl Host for FakeEditor {
    fn first_line(&self) -> usize {
        self.doc.first_line()
    }

    fn last_line(&self) -> usize {
        self.doc.last_line()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.doc.line(line)
    }

    fn token_kind(&self, line: usize, column: usize) -> TokenKind {
        self.doc.token_kind(line, column)
    }
}

impl Editor for FakeEditor {
    type Mark = usize;

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn has_selection(&self) -> bool {
        self.selection
    }

    fn mark_range(&mut self, range: Range, decoration: Decoration) -> usize {
        let handle = self.next_mark;
        self.next_mark += 1;
        self.marks.push((handle, range, decoration));
        handle
    }

    fn clear_mark(&mut self, mark: usize) {
        self.marks.retain(|(handle, _, _)| *handle != mark);
    }
}
