use serde::{Deserialize, Serialize};
use std::fmt;

/// A cursor position in a line-oriented document.
///
/// `column` counts chars, not bytes. Positions order by line, then column.
/// On the wire the column is called `ch`, matching the host editor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: usize,
    #[serde(rename = "ch")]
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span of document text, `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub from: Position,
    pub to: Position,
}

impl Range {
    /// Create a range, swapping the ends if they are reversed.
    pub fn new(from: Position, to: Position) -> Self {
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Syntactic role of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    #[default]
    Text,
    // HTML and extension tags
    TagBracket,
    TagName,
    TagAttribute,
    // Templates
    TemplateBracket,
    TemplateName,
    TemplateDelimiter,
    /// `{{{` / `}}}` of a template argument; never counts as a template brace.
    ArgumentBracket,
    Comment,
}

/// Classification of a character as the highlighter sees it.
///
/// `in_template` is set for everything inside a template body (the
/// "ground"), so a tag nested in a template carries both facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenKind {
    pub role: Role,
    pub in_template: bool,
}

impl TokenKind {
    pub const TEXT: Self = Self::new(Role::Text);

    pub const fn new(role: Role) -> Self {
        Self {
            role,
            in_template: false,
        }
    }

    pub const fn in_template(role: Role) -> Self {
        Self {
            role,
            in_template: true,
        }
    }

    /// Any part of an HTML-like tag: bracket, name or attributes.
    pub fn is_tag(&self) -> bool {
        matches!(
            self.role,
            Role::TagBracket | Role::TagName | Role::TagAttribute
        )
    }

    pub fn is_tag_bracket(&self) -> bool {
        self.role == Role::TagBracket
    }

    pub fn is_template_bracket(&self) -> bool {
        self.role == Role::TemplateBracket
    }

    pub fn is_template_delimiter(&self) -> bool {
        self.role == Role::TemplateDelimiter
    }

    /// Inside a template body, excluding its brackets and name.
    pub fn is_template_ground(&self) -> bool {
        self.in_template && !matches!(self.role, Role::TemplateBracket | Role::TemplateName)
    }

    pub fn is_comment(&self) -> bool {
        self.role == Role::Comment
    }

    /// Translate a CodeMirror MediaWiki-mode token type into a `TokenKind`.
    ///
    /// The type is a space-separated class list such as
    /// `"mw-template-ground mw-htmltag-bracket"`. Classes may carry the
    /// `cm-` prefix and numbered nesting variants (`mw-template2-ground`).
    /// Unknown classes are ignored; an empty type is plain text.
    pub fn from_token_type(token_type: &str) -> Self {
        let mut kind = Self::TEXT;
        for class in token_type.split_whitespace() {
            let class = class.strip_prefix("cm-").unwrap_or(class);
            let class = normalize_class(class.strip_prefix("mw-").unwrap_or(class));
            let role = match class.as_str() {
                "htmltag-bracket" | "exttag-bracket" | "bracket" => Some(Role::TagBracket),
                "htmltag-name" | "exttag-name" | "tag" => Some(Role::TagName),
                "htmltag-attribute" | "exttag-attribute" | "attribute" => {
                    Some(Role::TagAttribute)
                }
                "template-ground" => None,
                "template-bracket" => Some(Role::TemplateBracket),
                "template-name" => Some(Role::TemplateName),
                "template-delimiter" => Some(Role::TemplateDelimiter),
                "templatevariable-bracket" => Some(Role::ArgumentBracket),
                "comment" => Some(Role::Comment),
                _ => None,
            };
            if class.starts_with("template-") {
                kind.in_template = true;
            }
            // Comments swallow everything else on the same token.
            if let Some(role) = role.filter(|_| kind.role != Role::Comment) {
                kind.role = role;
            }
        }
        kind
    }
}

/// Strip the nesting depth digits from `template3-ground` and friends.
fn normalize_class(class: &str) -> String {
    match class.strip_prefix("template") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            format!("template{rest}")
        }
        None => class.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Position and Range
    // =========================================================================

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 3) < Position::new(2, 4));
        assert_eq!(Position::new(1, 1).max(Position::new(1, 0)), Position::new(1, 1));
    }

    #[test]
    fn test_range_normalizes_reversed_ends() {
        let range = Range::new(Position::new(3, 0), Position::new(1, 5));
        assert_eq!(range.from, Position::new(1, 5));
        assert_eq!(range.to, Position::new(3, 0));
        assert!(!range.is_empty());
    }

    #[test]
    fn test_display() {
        let range = Range::new(Position::new(0, 4), Position::new(2, 1));
        assert_eq!(range.to_string(), "0:4-2:1");
    }

    // =========================================================================
    // Token type translation
    // =========================================================================

    #[test]
    fn test_from_empty_type() {
        assert_eq!(TokenKind::from_token_type(""), TokenKind::TEXT);
        assert_eq!(TokenKind::from_token_type("mw-link"), TokenKind::TEXT);
    }

    #[test]
    fn test_from_html_tag_types() {
        assert_eq!(
            TokenKind::from_token_type("mw-htmltag-bracket"),
            TokenKind::new(Role::TagBracket)
        );
        assert_eq!(
            TokenKind::from_token_type("cm-mw-exttag-name"),
            TokenKind::new(Role::TagName)
        );
        assert!(TokenKind::from_token_type("mw-htmltag-attribute").is_tag());
        assert!(TokenKind::from_token_type("tag").is_tag());
    }

    #[test]
    fn test_from_template_types() {
        let bracket = TokenKind::from_token_type("mw-template-bracket");
        assert!(bracket.is_template_bracket());
        assert!(!bracket.is_template_ground());

        let ground = TokenKind::from_token_type("mw-template2-ground");
        assert!(ground.is_template_ground());

        let delimiter = TokenKind::from_token_type("mw-template-ground mw-template-delimiter");
        assert!(delimiter.is_template_delimiter());
        assert!(delimiter.is_template_ground());

        let name = TokenKind::from_token_type("mw-template-ground mw-template-name");
        assert!(!name.is_template_ground());
    }

    #[test]
    fn test_tag_inside_template() {
        let kind = TokenKind::from_token_type("mw-template-ground mw-htmltag-bracket");
        assert_eq!(kind, TokenKind::in_template(Role::TagBracket));
        assert!(kind.is_tag_bracket());
        assert!(kind.is_template_ground());
    }

    #[test]
    fn test_argument_brackets_are_not_template_brackets() {
        let kind = TokenKind::from_token_type("mw-templatevariable-bracket");
        assert_eq!(kind.role, Role::ArgumentBracket);
        assert!(!kind.is_template_bracket());
    }

    #[test]
    fn test_comment_wins() {
        let kind = TokenKind::from_token_type("mw-comment mw-htmltag-bracket");
        assert!(kind.is_comment());
    }
}
