//! Matching of HTML-like tags.
//!
//! Tags are found through the host's classification: only `<` and `>`
//! chars classified as tag brackets count, so markup inside comments or
//! plain-text angle brackets never take part. Tag names are compared in
//! their normalized form (lower-cased unless configured otherwise), and
//! void or self-closed tags never affect nesting.

use crate::config::MatchConfig;
use crate::line_scanner::{Direction, LineScanner};
use crate::MatchError;
use serde::Serialize;
use wphl_lexer::scanner::is_word_char;
use wphl_lexer::{Host, Position, Range};

/// One tag in the document, from its `<` to just after its `>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSpan {
    pub name: String,
    pub from: Position,
    pub to: Position,
}

impl TagSpan {
    pub fn range(&self) -> Range {
        Range::new(self.from, self.to)
    }
}

/// The tag under a cursor together with its counterpart, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "at", rename_all = "camelCase")]
pub enum TagMatch {
    /// A void or self-closed tag; it has no counterpart.
    #[serde(rename = "self")]
    SelfClosing {
        #[serde(rename = "open")]
        tag: TagSpan,
    },
    /// The cursor is in an opening tag.
    Open {
        open: TagSpan,
        close: Option<TagSpan>,
    },
    /// The cursor is in a closing tag.
    Close {
        open: Option<TagSpan>,
        close: TagSpan,
    },
}

impl TagMatch {
    /// The tag the cursor is in.
    pub fn hit(&self) -> &TagSpan {
        match self {
            TagMatch::SelfClosing { tag } => tag,
            TagMatch::Open { open, .. } => open,
            TagMatch::Close { close, .. } => close,
        }
    }

    /// The counterpart of the tag the cursor is in.
    pub fn other(&self) -> Option<&TagSpan> {
        match self {
            TagMatch::SelfClosing { .. } => None,
            TagMatch::Open { close, .. } => close.as_ref(),
            TagMatch::Close { open, .. } => open.as_ref(),
        }
    }
}

/// An opening tag and the closing tag that balances it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagPair {
    pub open: TagSpan,
    pub close: TagSpan,
}

impl TagPair {
    /// The content between the two tags.
    pub fn inner(&self) -> Range {
        Range::new(self.open.to, self.close.from)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagEnd {
    Regular,
    SelfClosing,
}

/// `<` `/`? `[A-Za-z_][A-Za-z0-9_]*`, as found at some column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TagStart {
    closing: bool,
    name: String,
    /// Chars from the `<` to the end of the name.
    len: usize,
}

fn tag_start_at(text: &[char], index: usize) -> Option<TagStart> {
    if text.get(index) != Some(&'<') {
        return None;
    }
    let closing = text.get(index + 1) == Some(&'/');
    let name_start = index + 1 + usize::from(closing);
    let first = *text.get(name_start)?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let name_len = text[name_start..]
        .iter()
        .take_while(|&&c| is_word_char(c))
        .count();
    let name: String = text[name_start..name_start + name_len].iter().collect();
    Some(TagStart {
        closing,
        name,
        len: name_start + name_len - index,
    })
}

/// A `>` at `gt` closes a self-closing tag when the last `/` before it is
/// followed only by whitespace.
fn self_closes(text: &[char], gt: usize) -> bool {
    text[..gt]
        .iter()
        .rposition(|&c| c == '/')
        .is_some_and(|slash| text[slash + 1..gt].iter().all(|c| c.is_whitespace()))
}

/// Tag-aware walker on top of a `LineScanner`.
struct TagIter<'a, H: Host + ?Sized> {
    scanner: LineScanner<'a, H>,
    config: &'a MatchConfig,
}

impl<'a, H: Host + ?Sized> TagIter<'a, H> {
    fn new(host: &'a H, pos: Position, config: &'a MatchConfig) -> Result<Self, MatchError> {
        Ok(Self {
            scanner: LineScanner::new(host, pos, config)?,
            config,
        })
    }

    fn position(&self) -> Position {
        self.scanner.position()
    }

    fn is_tag(&self) -> bool {
        self.scanner.kind_before().is_tag()
    }

    fn bracket_at(&self, column: usize) -> bool {
        self.scanner.kind_at(column).is_tag_bracket()
    }

    /// Move just past the next tag `>` on the current line.
    fn to_tag_end(&mut self) -> Option<TagEnd> {
        loop {
            let gt = self.scanner.find_in_line(|c| c == '>', Direction::Forward)?;
            self.scanner.set_column(gt + 1);
            if !self.bracket_at(gt) {
                continue;
            }
            return Some(if self_closes(self.scanner.text(), gt) {
                TagEnd::SelfClosing
            } else {
                TagEnd::Regular
            });
        }
    }

    /// Move back onto the nearest tag `<` on the current line.
    fn to_tag_start(&mut self) -> Option<TagStart> {
        loop {
            let lt = self.scanner.find_in_line(|c| c == '<', Direction::Backward)?;
            self.scanner.set_column(lt);
            if !self.bracket_at(lt) {
                continue;
            }
            if let Some(start) = tag_start_at(self.scanner.text(), lt) {
                return Some(start);
            }
        }
    }

    /// Move just past the name of the next tag start, across lines.
    /// Returns the column of its `<` along with the start.
    fn to_next_tag(&mut self) -> Option<(usize, TagStart)> {
        loop {
            let text = self.scanner.text();
            let found = (self.scanner.column()..text.len())
                .find_map(|index| tag_start_at(text, index).map(|start| (index, start)));
            let Some((index, start)) = found else {
                if self.scanner.advance_line(Direction::Forward) {
                    continue;
                }
                return None;
            };
            self.scanner.set_column(index + start.len);
            if self.bracket_at(index) {
                return Some((index, start));
            }
        }
    }

    /// Move just past the previous tag `>`, across lines.
    fn to_prev_tag(&mut self) -> Option<TagEnd> {
        loop {
            let Some(gt) = self.scanner.find_in_line(|c| c == '>', Direction::Backward) else {
                if self.scanner.advance_line(Direction::Backward) {
                    continue;
                }
                return None;
            };
            if !self.bracket_at(gt) {
                self.scanner.set_column(gt);
                continue;
            }
            self.scanner.set_column(gt + 1);
            return Some(if self_closes(self.scanner.text(), gt) {
                TagEnd::SelfClosing
            } else {
                TagEnd::Regular
            });
        }
    }

    fn skips(&self, end: TagEnd, name: &str) -> bool {
        end == TagEnd::SelfClosing || self.config.is_void(name)
    }

    /// Scan forward for the closing tag balancing the current nesting
    /// level. With `wanted`, unbalanced closing tags of other names are
    /// passed over.
    fn find_matching_close(&mut self, wanted: Option<&str>) -> Option<TagSpan> {
        let mut stack: Vec<String> = Vec::new();
        loop {
            let (start_column, start) = self.to_next_tag()?;
            let end = self.to_tag_end()?;
            let name = self.config.normalize_name(&start.name);
            if self.skips(end, &name) {
                continue;
            }
            if !start.closing {
                stack.push(name);
                continue;
            }
            if let Some(index) = stack.iter().rposition(|open| *open == name) {
                stack.truncate(index);
            } else if wanted.is_none_or(|wanted| wanted == name) {
                let line = self.scanner.line();
                return Some(TagSpan {
                    name,
                    from: Position::new(line, start_column),
                    to: self.position(),
                });
            }
        }
    }

    /// Scan backward for the opening tag balancing the current nesting
    /// level. With `wanted`, unbalanced opening tags of other names are
    /// passed over.
    fn find_matching_open(&mut self, wanted: Option<&str>) -> Option<TagSpan> {
        let mut stack: Vec<String> = Vec::new();
        loop {
            let end = self.to_prev_tag()?;
            let to = self.position();
            let start = self.to_tag_start()?;
            let name = self.config.normalize_name(&start.name);
            if self.skips(end, &name) {
                continue;
            }
            if start.closing {
                stack.push(name);
                continue;
            }
            if let Some(index) = stack.iter().rposition(|close| *close == name) {
                stack.truncate(index);
            } else if wanted.is_none_or(|wanted| wanted == name) {
                return Some(TagSpan {
                    name,
                    from: self.position(),
                    to,
                });
            }
        }
    }
}

/// Find the tag the cursor is in and its counterpart.
///
/// Returns `Ok(None)` when the cursor is not in a tag, the tag does not
/// close on its own line, or the host's classification is inconsistent.
/// An unbalanced tag is still returned, without counterpart.
pub fn find_matching_tag<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    config: &MatchConfig,
) -> Result<Option<TagMatch>, MatchError> {
    let mut iter = TagIter::new(host, pos, config)?;
    if !iter.is_tag() {
        return Ok(None);
    }
    let Some(end) = iter.to_tag_end() else {
        return Ok(None);
    };
    let to = iter.position();
    let Some(start) = iter.to_tag_start() else {
        return Ok(None);
    };
    if iter.position() > pos {
        log::debug!(
            "tag at {} starts after cursor {pos}, ignoring",
            iter.position()
        );
        return Ok(None);
    }

    let here = TagSpan {
        name: config.normalize_name(&start.name),
        from: iter.position(),
        to,
    };
    if iter.skips(end, &here.name) {
        return Ok(Some(TagMatch::SelfClosing { tag: here }));
    }
    if start.closing {
        let open = iter.find_matching_open(Some(&here.name));
        return Ok(Some(TagMatch::Close { open, close: here }));
    }
    let mut forward = TagIter::new(host, to, config)?;
    let close = forward.find_matching_close(Some(&here.name));
    Ok(Some(TagMatch::Open { open: here, close }))
}

/// Find the innermost tag pair around the cursor, optionally only pairs
/// of the given tag name.
pub fn find_enclosing_tag<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    name: Option<&str>,
    config: &MatchConfig,
) -> Result<Option<TagPair>, MatchError> {
    let wanted = name.map(|name| config.normalize_name(name));
    let mut backward = TagIter::new(host, pos, config)?;
    let Some(open) = backward.find_matching_open(wanted.as_deref()) else {
        return Ok(None);
    };
    let mut forward = TagIter::new(host, pos, config)?;
    Ok(forward
        .find_matching_close(Some(&open.name))
        .map(|close| TagPair { open, close }))
}

/// Find the closing tag named `name` that balances the nesting level at
/// `pos`, as an auto-closing integration needs.
pub fn scan_for_closing_tag<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    name: &str,
    config: &MatchConfig,
) -> Result<Option<TagSpan>, MatchError> {
    let wanted = config.normalize_name(name);
    let mut iter = TagIter::new(host, pos, config)?;
    Ok(iter.find_matching_close(Some(&wanted)))
}
