use crate::token::{Role, TokenKind};

/// An open construct the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `{{ ... }}`; `in_name` until the first top-level `|`.
    Template { in_name: bool },
    /// `{{{ ... }}}`
    Argument,
}

/// Reference wikitext highlighter.
///
/// Classifies every char of a source into a `TokenKind`, one vector per
/// line, the way the MediaWiki editor mode does for the constructs the
/// matchers care about: HTML-like tags, templates, template arguments
/// and comments. Everything else is plain text.
///
/// Never fails: unterminated constructs simply run to the end of input.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    kinds: Vec<Vec<TokenKind>>,
    frames: Vec<Frame>,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            kinds: vec![Vec::new()],
            frames: Vec::new(),
        }
    }

    /// Classify a whole source. The result has one entry per line of
    /// `source.split('\n')`, each holding one kind per char of that line
    /// (a trailing `\r` is not part of the line).
    pub fn classify(source: &str) -> Vec<Vec<TokenKind>> {
        let mut scanner = Scanner::new(source);
        while !scanner.is_at_end() {
            scanner.scan_token();
        }
        scanner.kinds
    }

    fn scan_token(&mut self) {
        match self.peek() {
            '\n' => {
                self.advance();
                self.kinds.push(Vec::new());
            }
            '\r' if self.peek_at(1) == '\n' => self.advance(),
            '<' if self.starts_with("<!--") => self.scan_comment(),
            '<' if self.tag_name_len().is_some() => self.scan_tag(),
            '{' if self.starts_with("{{{") => {
                self.emit_n(Role::ArgumentBracket, 3);
                self.frames.push(Frame::Argument);
            }
            '{' if self.starts_with("{{") => {
                self.emit_n(Role::TemplateBracket, 2);
                self.frames.push(Frame::Template { in_name: true });
            }
            '}' if self.frames.last() == Some(&Frame::Argument) && self.starts_with("}}}") => {
                self.emit_n(Role::ArgumentBracket, 3);
                self.frames.pop();
            }
            '}' if self.in_template_frame() && self.starts_with("}}") => {
                self.emit_n(Role::TemplateBracket, 2);
                self.frames.pop();
            }
            '|' if self.in_template_frame() => {
                self.emit(Role::TemplateDelimiter);
                if let Some(Frame::Template { in_name }) = self.frames.last_mut() {
                    *in_name = false;
                }
            }
            _ if self.in_template_name() => self.emit(Role::TemplateName),
            _ => self.emit(Role::Text),
        }
    }

    /// Scan `<!-- ... -->`, delimiters included, across lines.
    fn scan_comment(&mut self) {
        self.emit_n(Role::Comment, 4);
        while !self.is_at_end() {
            if self.starts_with("-->") {
                self.emit_n(Role::Comment, 3);
                return;
            }
            match self.peek() {
                '\n' => {
                    self.advance();
                    self.kinds.push(Vec::new());
                }
                '\r' if self.peek_at(1) == '\n' => self.advance(),
                _ => self.emit(Role::Comment),
            }
        }
    }

    /// Scan `<name attrs>`, `</name>` or `<name/>`.
    ///
    /// Attributes may span lines. A `/` followed only by whitespace up to
    /// the `>` is part of the closing bracket.
    fn scan_tag(&mut self) {
        let name_len = self.tag_name_len().unwrap_or(0);
        self.emit(Role::TagBracket);
        if self.peek() == '/' {
            self.emit(Role::TagBracket);
        }
        for _ in 0..name_len {
            self.emit(Role::TagName);
        }

        while !self.is_at_end() {
            match self.peek() {
                '>' => {
                    self.emit(Role::TagBracket);
                    return;
                }
                '/' if self.self_closes_here() => self.emit(Role::TagBracket),
                '\n' => {
                    self.advance();
                    self.kinds.push(Vec::new());
                }
                '\r' if self.peek_at(1) == '\n' => self.advance(),
                _ => self.emit(Role::TagAttribute),
            }
        }
    }

    // --- Lookahead ---

    /// Length of the tag name when a tag opens at the cursor.
    /// Matches `<` `/`? `[A-Za-z_][A-Za-z0-9_]*`.
    fn tag_name_len(&self) -> Option<usize> {
        let offset = if self.peek_at(1) == '/' { 2 } else { 1 };
        let first = self.peek_at(offset);
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let mut len = 1;
        while is_word_char(self.peek_at(offset + len)) {
            len += 1;
        }
        Some(len)
    }

    fn self_closes_here(&self) -> bool {
        let mut i = 1;
        while matches!(self.peek_at(i), ' ' | '\t') {
            i += 1;
        }
        self.peek_at(i) == '>'
    }

    fn in_template_frame(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Template { .. }))
    }

    fn in_template_name(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Template { in_name: true }))
    }

    fn inside_template(&self) -> bool {
        self.frames
            .iter()
            .any(|frame| matches!(frame, Frame::Template { .. }))
    }

    // --- Helpers ---

    fn emit(&mut self, role: Role) {
        let in_template = self.inside_template()
            || matches!(
                role,
                Role::TemplateBracket | Role::TemplateName | Role::TemplateDelimiter
            );
        let kind = TokenKind { role, in_template };
        if let Some(line) = self.kinds.last_mut() {
            line.push(kind);
        }
        self.advance();
    }

    fn emit_n(&mut self, role: Role, count: usize) {
        for _ in 0..count {
            self.emit(role);
        }
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == c)
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.chars.get(self.pos + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// `\w` in the ASCII sense.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: roles of the single line of `source`.
    fn roles(source: &str) -> Vec<Role> {
        let kinds = Scanner::classify(source);
        assert_eq!(kinds.len(), 1, "expected a single line");
        kinds[0].iter().map(|k| k.role).collect()
    }

    /// Helper: compact one-letter rendering of a line's roles.
    fn sketch(source: &str) -> String {
        roles(source)
            .into_iter()
            .map(|role| match role {
                Role::Text => '.',
                Role::TagBracket => '<',
                Role::TagName => 'n',
                Role::TagAttribute => 'a',
                Role::TemplateBracket => '{',
                Role::TemplateName => 'N',
                Role::TemplateDelimiter => '|',
                Role::ArgumentBracket => '$',
                Role::Comment => 'c',
            })
            .collect()
    }

    // =========================================================================
    // Lines
    // =========================================================================

    #[test]
    fn test_empty_source() {
        assert_eq!(Scanner::classify(""), vec![Vec::<TokenKind>::new()]);
    }

    #[test]
    fn test_line_lengths() {
        let kinds = Scanner::classify("ab\n\ncde\n");
        let lens: Vec<usize> = kinds.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 0, 3, 0]);
    }

    #[test]
    fn test_windows_line_endings() {
        let kinds = Scanner::classify("ab\r\ncd");
        let lens: Vec<usize> = kinds.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 2]);
    }

    // =========================================================================
    // Tags
    // =========================================================================

    #[test]
    fn test_opening_tag() {
        assert_eq!(sketch("<div>x"), "<nnn<.");
    }

    #[test]
    fn test_closing_tag() {
        assert_eq!(sketch("</b>"), "<<n<");
    }

    #[test]
    fn test_tag_with_attributes() {
        assert_eq!(sketch("<p id=1>"), "<naaaaa<");
    }

    #[test]
    fn test_self_closing_tag() {
        assert_eq!(sketch("<br />"), "<nna<<");
        assert_eq!(sketch("<br/>"), "<nn<<");
    }

    #[test]
    fn test_not_a_tag() {
        assert_eq!(sketch("a < b"), ".....");
        assert_eq!(sketch("<1>"), "...");
    }

    #[test]
    fn test_tag_spanning_lines() {
        let kinds = Scanner::classify("<div\nclass=x>");
        assert_eq!(kinds[1].last().map(|k| k.role), Some(Role::TagBracket));
        assert!(kinds[1][0].is_tag());
    }

    // =========================================================================
    // Templates
    // =========================================================================

    #[test]
    fn test_template_with_parameter() {
        assert_eq!(sketch("{{Name|p}}"), "{{NNNN|.{{");
        let kinds = &Scanner::classify("{{Name|p}}")[0];
        assert!(kinds[7].is_template_ground());
        assert!(!kinds[2].is_template_ground());
    }

    #[test]
    fn test_nested_template() {
        assert_eq!(sketch("{{a|{{b}}|c}}"), "{{N|{{N{{|.{{");
    }

    #[test]
    fn test_template_argument() {
        assert_eq!(sketch("{{{1|x}}}"), "$$$...$$$");
    }

    #[test]
    fn test_stray_closing_braces() {
        assert_eq!(sketch("}}"), "..");
    }

    #[test]
    fn test_tag_inside_template() {
        let kinds = &Scanner::classify("{{a|<b>}}")[0];
        assert_eq!(kinds[4], TokenKind::in_template(Role::TagBracket));
        assert!(kinds[4].is_template_ground());
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_comment() {
        assert_eq!(sketch("a<!-- x -->b"), ".cccccccccc.");
    }

    #[test]
    fn test_comment_hides_markup() {
        assert_eq!(sketch("<!--<b>{{x}}-->"), "ccccccccccccccc");
    }

    #[test]
    fn test_unterminated_comment() {
        let kinds = Scanner::classify("<!-- a\nb");
        assert!(kinds[1][0].is_comment());
    }
}
