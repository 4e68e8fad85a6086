use crate::line_scanner::check_position;
use crate::MatchError;
use wphl_lexer::{Host, Position, Range};

const OPEN: &str = "<!--";
const CLOSE: &str = "-->";

/// The host's lines joined by `\n` into one char buffer.
///
/// Unavailable lines contribute nothing but their line break.
struct FlatText {
    chars: Vec<char>,
    first_line: usize,
    /// Offset of each line's first char.
    line_starts: Vec<usize>,
}

impl FlatText {
    fn new<H: Host + ?Sized>(host: &H) -> Self {
        let mut chars = Vec::new();
        let mut line_starts = Vec::new();
        for line in host.first_line()..=host.last_line() {
            if line > host.first_line() {
                chars.push('\n');
            }
            line_starts.push(chars.len());
            if let Some(text) = host.line(line) {
                chars.extend(text.chars());
            }
        }
        Self {
            chars,
            first_line: host.first_line(),
            line_starts,
        }
    }

    fn offset(&self, pos: Position) -> usize {
        let index = pos.line - self.first_line;
        let start = self.line_starts[index];
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.chars.len(), |next| next - 1);
        (start + pos.column).min(end)
    }

    fn position(&self, offset: usize) -> Position {
        let index = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Position::new(self.first_line + index, offset - self.line_starts[index])
    }

    fn matches_at(&self, pattern: &[char], offset: usize) -> bool {
        self.chars.get(offset..offset + pattern.len()) == Some(pattern)
    }

    /// Start of the last `pattern` lying entirely before `end`.
    fn rfind(&self, pattern: &str, end: usize) -> Option<usize> {
        let pattern: Vec<char> = pattern.chars().collect();
        let last = end.checked_sub(pattern.len())?;
        (0..=last).rev().find(|&offset| self.matches_at(&pattern, offset))
    }

    /// Start of the first `pattern` at or after `start`.
    fn find(&self, pattern: &str, start: usize) -> Option<usize> {
        let pattern: Vec<char> = pattern.chars().collect();
        (start..self.chars.len()).find(|&offset| self.matches_at(&pattern, offset))
    }
}

/// Find the body of the comment around the cursor, delimiters excluded.
///
/// Works on the raw text rather than on token boundaries, since the
/// whole comment is one opaque token to the highlighter. A cursor on
/// either delimiter yields `None`; an unterminated comment runs to the
/// end of the document.
pub fn find_enclosing_comment<H: Host + ?Sized>(
    host: &H,
    pos: Position,
) -> Result<Option<Range>, MatchError> {
    check_position(host, pos)?;
    if !host.kind_before(pos).is_comment() {
        return Ok(None);
    }

    let text = FlatText::new(host);
    let cursor = text.offset(pos);
    let Some(open) = text.rfind(OPEN, cursor) else {
        return Ok(None);
    };
    let body_start = open + OPEN.len();
    let body_end = text.find(CLOSE, body_start).unwrap_or(text.chars.len());
    if cursor > body_end {
        log::trace!("cursor {pos} is past the comment closing at offset {body_end}");
        return Ok(None);
    }
    Ok(Some(Range::new(
        text.position(body_start),
        text.position(body_end),
    )))
}
