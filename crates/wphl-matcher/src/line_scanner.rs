use crate::config::MatchConfig;
use crate::MatchError;
use wphl_lexer::{Host, Position, TokenKind};

/// Scan direction through the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Fail with a precondition error when `pos` is not on a document line.
pub(crate) fn check_position<H: Host + ?Sized>(host: &H, pos: Position) -> Result<(), MatchError> {
    if host.contains_line(pos.line) {
        Ok(())
    } else {
        Err(MatchError {
            message: format!(
                "line outside the document (lines {}..={})",
                host.first_line(),
                host.last_line()
            ),
            line: pos.line,
            column: pos.column,
        })
    }
}

/// A bounded, bidirectional cursor over the host's lines.
///
/// The cursor sits between chars: forward scans start with the char at
/// the cursor, backward scans with the char before it. The line range is
/// fixed at construction to `max_scan_lines` lines on either side of the
/// starting line, clamped to the document. Unavailable lines and lines
/// longer than `max_line_length` read as empty.
pub struct LineScanner<'a, H: Host + ?Sized> {
    host: &'a H,
    config: &'a MatchConfig,
    line: usize,
    column: usize,
    text: Vec<char>,
    min: usize,
    max: usize,
}

impl<'a, H: Host + ?Sized> LineScanner<'a, H> {
    pub fn new(host: &'a H, pos: Position, config: &'a MatchConfig) -> Result<Self, MatchError> {
        check_position(host, pos)?;
        let reach = config.max_scan_lines.saturating_sub(1);
        let min = pos.line.saturating_sub(reach).max(host.first_line());
        let max = pos.line.saturating_add(reach).min(host.last_line());
        let mut scanner = Self {
            host,
            config,
            line: pos.line,
            column: 0,
            text: Vec::new(),
            min,
            max,
        };
        scanner.text = scanner.at(pos.line);
        scanner.column = pos.column.min(scanner.text.len());
        Ok(scanner)
    }

    /// Text of `line`, or empty when it is unavailable or too long to scan.
    pub fn at(&self, line: usize) -> Vec<char> {
        let Some(text) = self.host.line(line) else {
            return Vec::new();
        };
        let chars: Vec<char> = text.chars().collect();
        if chars.len() > self.config.max_line_length {
            log::trace!("skipping line {line}: {} chars", chars.len());
            return Vec::new();
        }
        chars
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn set_column(&mut self, column: usize) {
        self.column = column.min(self.text.len());
    }

    /// Chars of the current line.
    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// Classification of the char at `column` on the current line.
    pub fn kind_at(&self, column: usize) -> TokenKind {
        self.host.token_kind(self.line, column)
    }

    /// Classification of the char before the cursor.
    pub fn kind_before(&self) -> TokenKind {
        self.host.kind_before(self.position())
    }

    /// Move to the start of the next line or the end of the previous one.
    /// Returns `false` at the scan bound.
    pub fn advance_line(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => {
                if self.line >= self.max {
                    log::trace!("forward scan bound reached at line {}", self.line);
                    return false;
                }
                self.line += 1;
                self.text = self.at(self.line);
                self.column = 0;
            }
            Direction::Backward => {
                if self.line <= self.min {
                    log::trace!("backward scan bound reached at line {}", self.line);
                    return false;
                }
                self.line -= 1;
                self.text = self.at(self.line);
                self.column = self.text.len();
            }
        }
        true
    }

    /// Find the next char matching `pattern`, moving across lines.
    ///
    /// Going forward the cursor ends up after the match, going backward
    /// before it. Returns the match's position and char, or `None` once
    /// the scan bound is exhausted.
    pub fn scan_to_next_occurrence(
        &mut self,
        pattern: impl Fn(char) -> bool,
        direction: Direction,
    ) -> Option<(Position, char)> {
        loop {
            if let Some(index) = self.find_in_line(&pattern, direction) {
                let found = self.text[index];
                let at = Position::new(self.line, index);
                self.column = match direction {
                    Direction::Forward => index + 1,
                    Direction::Backward => index,
                };
                return Some((at, found));
            }
            if !self.advance_line(direction) {
                return None;
            }
        }
    }

    /// Index of the nearest char matching `pattern` on the current line,
    /// without moving the cursor.
    pub fn find_in_line(&self, pattern: impl Fn(char) -> bool, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Forward => self
                .text
                .iter()
                .skip(self.column)
                .position(|&c| pattern(c))
                .map(|offset| self.column + offset),
            Direction::Backward => self.text[..self.column].iter().rposition(|&c| pattern(c)),
        }
    }
}
