use crate::config::MatchConfig;
use crate::line_scanner::{check_position, Direction, LineScanner};
use crate::MatchError;
use serde::Serialize;
use wphl_lexer::{Host, Position, Range};

/// Outcome of a brace scan out of the innermost template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DelimiterScan {
    /// Just after the first top-level `|` met going forward. Backward
    /// scans never record one.
    pub delimiter: Option<Position>,
    /// Going forward, just before the template's closing brace; going
    /// backward, just after its opening brace.
    pub bracket: Option<Position>,
}

/// Walk from `pos` until the scan leaves the innermost enclosing
/// template, keeping a brace depth.
///
/// Only braces the host classifies as template brackets count, so
/// template arguments (`{{{1}}}`) and braces in plain text are ignored.
/// Both fields are `None` when the scan bound runs out first.
pub fn scan_for_delimiter_and_bracket<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    direction: Direction,
    config: &MatchConfig,
) -> Result<DelimiterScan, MatchError> {
    let mut scanner = LineScanner::new(host, pos, config)?;
    let mut depth = 0usize;
    let mut delimiter = None;

    loop {
        let want_pipe = direction == Direction::Forward && delimiter.is_none();
        let pattern = |c: char| c == '{' || c == '}' || (want_pipe && c == '|');
        let Some((at, c)) = scanner.scan_to_next_occurrence(pattern, direction) else {
            return Ok(DelimiterScan::default());
        };
        let kind = host.token_kind(at.line, at.column);

        if c == '|' {
            if depth == 0 && kind.is_template_delimiter() {
                delimiter = Some(Position::new(at.line, at.column + 1));
            }
            continue;
        }
        if !kind.is_template_bracket() {
            continue;
        }

        let nests = match direction {
            Direction::Forward => c == '{',
            Direction::Backward => c == '}',
        };
        if nests {
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
        } else {
            let bracket = match direction {
                Direction::Forward => at,
                Direction::Backward => Position::new(at.line, at.column + 1),
            };
            return Ok(DelimiterScan {
                delimiter,
                bracket: Some(bracket),
            });
        }
    }
}

/// Find the foldable parameter body of the template around the cursor:
/// from just after its first top-level `|` to just before its `}}`.
///
/// `None` when the cursor is not in a template body, when the template
/// has no parameters, or when the body is empty.
pub fn find_enclosing_template<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    config: &MatchConfig,
) -> Result<Option<Range>, MatchError> {
    check_position(host, pos)?;
    if !host.kind_before(pos).is_template_ground() {
        return Ok(None);
    }
    let backward = scan_for_delimiter_and_bracket(host, pos, Direction::Backward, config)?;
    let Some(open) = backward.bracket else {
        return Ok(None);
    };
    let scan = scan_for_delimiter_and_bracket(host, open, Direction::Forward, config)?;
    Ok(match (scan.delimiter, scan.bracket) {
        (Some(from), Some(to)) if from < to => Some(Range::new(from, to)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wphl_lexer::Document;

    fn enclosing(doc: &Document, pos: Position) -> Option<Range> {
        find_enclosing_template(doc, pos, &MatchConfig::default()).unwrap()
    }

    fn range(from: (usize, usize), to: (usize, usize)) -> Range {
        Range::new(Position::new(from.0, from.1), Position::new(to.0, to.1))
    }

    // =========================================================================
    // scanForDelimiterAndBracket
    // =========================================================================

    #[test]
    fn test_scan_backward_finds_opening_bracket() {
        let doc = Document::new("{{Name|param}}");
        let scan = scan_for_delimiter_and_bracket(
            &doc,
            Position::new(0, 9),
            Direction::Backward,
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(
            scan,
            DelimiterScan {
                delimiter: None,
                bracket: Some(Position::new(0, 2)),
            }
        );
    }

    #[test]
    fn test_scan_forward_finds_delimiter_and_closing_bracket() {
        let doc = Document::new("{{Name|a|b}}");
        let scan = scan_for_delimiter_and_bracket(
            &doc,
            Position::new(0, 2),
            Direction::Forward,
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(scan.delimiter, Some(Position::new(0, 7)));
        assert_eq!(scan.bracket, Some(Position::new(0, 10)));
    }

    #[test]
    fn test_scan_skips_nested_templates() {
        let doc = Document::new("{{a|{{b|c}}|d}}");
        let scan = scan_for_delimiter_and_bracket(
            &doc,
            Position::new(0, 2),
            Direction::Forward,
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(scan.delimiter, Some(Position::new(0, 4)));
        assert_eq!(scan.bracket, Some(Position::new(0, 13)));
    }

    #[test]
    fn test_scan_ignores_nested_delimiters() {
        let doc = Document::new("{{a{{b|c}}|d}}");
        let scan = scan_for_delimiter_and_bracket(
            &doc,
            Position::new(0, 2),
            Direction::Forward,
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(scan.delimiter, Some(Position::new(0, 11)));
    }

    #[test]
    fn test_scan_not_found() {
        let doc = Document::new("{{a|b");
        let scan = scan_for_delimiter_and_bracket(
            &doc,
            Position::new(0, 2),
            Direction::Forward,
            &MatchConfig::default(),
        )
        .unwrap();
        assert_eq!(scan, DelimiterScan::default());
    }

    // =========================================================================
    // findEnclosingTemplate
    // =========================================================================

    #[test]
    fn test_template_parameter() {
        let doc = Document::new("{{Name|param}}");
        for column in 8..=12 {
            assert_eq!(
                enclosing(&doc, Position::new(0, column)),
                Some(range((0, 7), (0, 12))),
                "cursor at column {column}"
            );
        }
    }

    #[test]
    fn test_template_without_parameters() {
        let doc = Document::new("{{Name}}");
        for column in 0..=8 {
            assert_eq!(enclosing(&doc, Position::new(0, column)), None);
        }
    }

    #[test]
    fn test_template_with_empty_parameter() {
        let doc = Document::new("{{Name|}}");
        assert_eq!(enclosing(&doc, Position::new(0, 7)), None);
    }

    #[test]
    fn test_cursor_in_name_is_not_foldable() {
        let doc = Document::new("{{Name|x}}");
        assert_eq!(enclosing(&doc, Position::new(0, 4)), None);
    }

    #[test]
    fn test_nested_template_picks_innermost() {
        let doc = Document::new("{{a|x{{b|yy}}z}}");
        assert_eq!(
            enclosing(&doc, Position::new(0, 10)),
            Some(range((0, 9), (0, 11)))
        );
        assert_eq!(
            enclosing(&doc, Position::new(0, 14)),
            Some(range((0, 4), (0, 14)))
        );
    }

    #[test]
    fn test_multiline_template() {
        let doc = Document::new("{{Infobox\n| name = x\n| size = {{small|y}}\n}}");
        assert_eq!(
            enclosing(&doc, Position::new(1, 5)),
            Some(range((1, 1), (3, 0)))
        );
    }

    #[test]
    fn test_argument_braces_do_not_count() {
        let doc = Document::new("{{a|{{{1}}}b}}");
        assert_eq!(
            enclosing(&doc, Position::new(0, 12)),
            Some(range((0, 4), (0, 12)))
        );
    }

    #[test]
    fn test_outside_template() {
        let doc = Document::new("text {{a|b}}");
        assert_eq!(enclosing(&doc, Position::new(0, 2)), None);
    }

    #[test]
    fn test_scan_bound() {
        let body = "x\n".repeat(30);
        let doc = Document::new(&format!("{{{{a|\n{body}}}}}"));
        let config = MatchConfig {
            max_scan_lines: 10,
            ..MatchConfig::default()
        };
        let pos = Position::new(5, 1);
        assert_eq!(find_enclosing_template(&doc, pos, &config).unwrap(), None);
        assert_eq!(enclosing(&doc, pos), Some(range((0, 4), (31, 0))));
    }

    #[test]
    fn test_long_lines_are_skipped() {
        let long = format!("{}|{}", "y".repeat(30), "y".repeat(19));
        let doc = Document::new(&format!("{{{{a\n{long}\n|b}}}}"));
        let config = MatchConfig {
            max_line_length: 20,
            ..MatchConfig::default()
        };
        let pos = Position::new(2, 2);
        assert_eq!(
            find_enclosing_template(&doc, pos, &config).unwrap(),
            Some(range((2, 1), (2, 2)))
        );
        assert_eq!(enclosing(&doc, pos), Some(range((1, 31), (2, 2))));
    }
}
