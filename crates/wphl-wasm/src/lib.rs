//! WASM bindings for Wikiplus-highlight.
//!
//! The matchers read a live CodeMirror 5 instance through [`JsEditor`].
//! Positions go in and out as `{ line, ch }` objects, match results as
//! plain objects, and a missing result as `undefined`. A position
//! outside the document throws.

pub mod editor;
pub mod logger;

pub use editor::JsEditor;

use js_sys::Function;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wphl_fold::{FoldConfig, FoldController, FoldId, TagHighlighter};
use wphl_lexer::Position;
use wphl_matcher::{Direction, MatchConfig};

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// Read an options object; `undefined` and `null` give the defaults.
fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn match_config(value: JsValue) -> Result<MatchConfig, JsError> {
    let config: MatchConfig = from_js(value)?;
    config.validate().map_err(js_error)?;
    Ok(config)
}

fn position(value: JsValue) -> Result<Position, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// `1` / `-1` as the editor integration passes it; zero counts as forward.
fn direction(dir: i32) -> Direction {
    if dir < 0 {
        Direction::Backward
    } else {
        Direction::Forward
    }
}

fn now() -> u64 {
    js_sys::Date::now() as u64
}

/// Find the tag at `pos` and its counterpart:
/// `{ at: "open" | "close" | "self", open, close }`.
#[wasm_bindgen(js_name = findMatchingTag)]
pub fn find_matching_tag(cm: JsValue, pos: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let found = wphl_matcher::find_matching_tag(&editor, position(pos)?, &match_config(config)?)
        .map_err(js_error)?;
    to_js(&found)
}

/// Find the innermost `{ open, close }` tag pair around `pos`,
/// optionally restricted to tags named `tag`.
#[wasm_bindgen(js_name = findEnclosingTag)]
pub fn find_enclosing_tag(
    cm: JsValue,
    pos: JsValue,
    tag: Option<String>,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let pair = wphl_matcher::find_enclosing_tag(
        &editor,
        position(pos)?,
        tag.as_deref(),
        &match_config(config)?,
    )
    .map_err(js_error)?;
    to_js(&pair)
}

/// Find the closing tag named `name` that balances the nesting at `pos`.
#[wasm_bindgen(js_name = scanForClosingTag)]
pub fn scan_for_closing_tag(
    cm: JsValue,
    pos: JsValue,
    name: &str,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let close =
        wphl_matcher::scan_for_closing_tag(&editor, position(pos)?, name, &match_config(config)?)
            .map_err(js_error)?;
    to_js(&close)
}

/// Scan out of the innermost template from `pos`, forward for a
/// positive `dir` and backward for a negative one:
/// `{ delimiter, bracket }`, each a position or `undefined`.
#[wasm_bindgen(js_name = scanForDelimiterAndBracket)]
pub fn scan_for_delimiter_and_bracket(
    cm: JsValue,
    pos: JsValue,
    dir: i32,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let direction = direction(dir);
    let scan = wphl_matcher::scan_for_delimiter_and_bracket(
        &editor,
        position(pos)?,
        direction,
        &match_config(config)?,
    )
    .map_err(js_error)?;
    to_js(&scan)
}

/// Find the parameter body `{ from, to }` of the template around `pos`.
#[wasm_bindgen(js_name = findEnclosingTemplate)]
pub fn find_enclosing_template(
    cm: JsValue,
    pos: JsValue,
    config: JsValue,
) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let range =
        wphl_matcher::find_enclosing_template(&editor, position(pos)?, &match_config(config)?)
            .map_err(js_error)?;
    to_js(&range)
}

/// Find the body `{ from, to }` of the comment around `pos`.
#[wasm_bindgen(js_name = findEnclosingComment)]
pub fn find_enclosing_comment(cm: JsValue, pos: JsValue) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let range =
        wphl_matcher::find_enclosing_comment(&editor, position(pos)?).map_err(js_error)?;
    to_js(&range)
}

/// Resolve what would be folded at `pos`: `{ kind, range }`.
#[wasm_bindgen(js_name = enclosingFold)]
pub fn enclosing_fold(cm: JsValue, pos: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    let editor = JsEditor::new(cm, None);
    let target = wphl_fold::enclosing_fold(&editor, position(pos)?, &match_config(config)?)
        .map_err(js_error)?;
    to_js(&target)
}

/// Fold tooltip state for one editor.
///
/// Wire `cursorActivity` to the editor's `cursorActivity` event, call
/// `tick` from a timer, `tooltipClicked` from the tooltip and
/// `glyphClicked` from the placeholder node with the id that
/// `tooltipClicked` returned.
#[wasm_bindgen]
pub struct FoldSession {
    editor: JsEditor,
    controller: FoldController<JsValue>,
}

#[wasm_bindgen]
impl FoldSession {
    #[wasm_bindgen(constructor)]
    pub fn new(
        cm: JsValue,
        config: JsValue,
        placeholder: Option<Function>,
    ) -> Result<FoldSession, JsError> {
        let config: FoldConfig = from_js(config)?;
        let controller = FoldController::new(config).map_err(js_error)?;
        Ok(Self {
            editor: JsEditor::new(cm, placeholder),
            controller,
        })
    }

    /// Returns the visible tooltip `{ kind, range, anchor }`, if any.
    #[wasm_bindgen(js_name = cursorActivity)]
    pub fn cursor_activity(&mut self) -> Result<JsValue, JsError> {
        let tooltip = self.controller.cursor_activity(&mut self.editor, now());
        to_js(&tooltip)
    }

    /// Returns `true` when the tooltip was just hidden.
    pub fn tick(&mut self) -> bool {
        self.controller.tick(now())
    }

    #[wasm_bindgen(getter)]
    pub fn tooltip(&self) -> Result<JsValue, JsError> {
        to_js(&self.controller.tooltip())
    }

    /// Milliseconds since the epoch at which the tooltip hides.
    #[wasm_bindgen(js_name = hideDeadline)]
    pub fn hide_deadline(&self) -> Option<f64> {
        self.controller.hide_deadline().map(|deadline| deadline as f64)
    }

    #[wasm_bindgen(js_name = tooltipClicked)]
    pub fn tooltip_clicked(&mut self) -> Option<u32> {
        self.controller
            .tooltip_clicked(&mut self.editor)
            .map(|id| id.0)
    }

    #[wasm_bindgen(js_name = glyphClicked)]
    pub fn glyph_clicked(&mut self, id: u32) -> bool {
        self.controller
            .glyph_clicked(&mut self.editor, FoldId(id), now())
    }

    #[wasm_bindgen(js_name = unfoldAll)]
    pub fn unfold_all(&mut self) {
        self.controller.unfold_all(&mut self.editor);
    }

    #[wasm_bindgen(js_name = setEnabled)]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.controller.set_enabled(enabled);
    }

    #[wasm_bindgen(getter = isEnabled)]
    pub fn is_enabled(&self) -> bool {
        self.controller.is_enabled()
    }
}

/// Highlighting of the tag under the cursor and its counterpart.
#[wasm_bindgen]
pub struct TagHighlightSession {
    editor: JsEditor,
    highlighter: TagHighlighter<JsValue>,
}

#[wasm_bindgen]
impl TagHighlightSession {
    #[wasm_bindgen(constructor)]
    pub fn new(cm: JsValue, config: JsValue) -> Result<TagHighlightSession, JsError> {
        Ok(Self {
            editor: JsEditor::new(cm, None),
            highlighter: TagHighlighter::new(match_config(config)?),
        })
    }

    /// Returns the highlighted match, if any.
    #[wasm_bindgen(js_name = cursorActivity)]
    pub fn cursor_activity(&mut self) -> Result<JsValue, JsError> {
        let found = self.highlighter.cursor_activity(&mut self.editor);
        to_js(&found)
    }

    pub fn clear(&mut self) {
        self.highlighter.clear(&mut self.editor);
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wphl_lexer::Document;

    // =========================================================================
    // Native tests (non-WASM): the shapes handed to JavaScript
    // =========================================================================

    #[test]
    fn test_tag_match_shape() {
        let doc = Document::new("<b>x</b>");
        let found =
            wphl_matcher::find_matching_tag(&doc, Position::new(0, 1), &MatchConfig::default())
                .unwrap();
        assert_eq!(
            serde_json::to_value(&found).unwrap(),
            json!({
                "at": "open",
                "open": {"name": "b", "from": {"line": 0, "ch": 0}, "to": {"line": 0, "ch": 3}},
                "close": {"name": "b", "from": {"line": 0, "ch": 4}, "to": {"line": 0, "ch": 8}},
            })
        );
    }

    #[test]
    fn test_self_closing_shape() {
        let doc = Document::new("<br>");
        let found =
            wphl_matcher::find_matching_tag(&doc, Position::new(0, 2), &MatchConfig::default())
                .unwrap();
        let value = serde_json::to_value(&found).unwrap();
        assert_eq!(value["at"], "self");
        assert_eq!(value["open"]["name"], "br");
    }

    #[test]
    fn test_fold_target_shape() {
        let doc = Document::new("{{a|b}}");
        let target =
            wphl_fold::enclosing_fold(&doc, Position::new(0, 5), &MatchConfig::default())
                .unwrap();
        assert_eq!(
            serde_json::to_value(&target).unwrap(),
            json!({
                "kind": "template",
                "range": {"from": {"line": 0, "ch": 4}, "to": {"line": 0, "ch": 5}},
            })
        );
    }

    #[test]
    fn test_position_from_wire() {
        let pos: Position = serde_json::from_value(json!({"line": 3, "ch": 7})).unwrap();
        assert_eq!(pos, Position::new(3, 7));
    }

    #[test]
    fn test_fold_config_from_wire() {
        let config: FoldConfig =
            serde_json::from_value(json!({"voidTags": ["br"], "tooltipTimeoutMs": 100})).unwrap();
        assert_eq!(config.matching.void_tags, vec!["br".to_string()]);
        assert_eq!(config.tooltip_timeout_ms, 100);
    }

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(direction(1), Direction::Forward);
        assert_eq!(direction(-1), Direction::Backward);
        assert_eq!(direction(0), Direction::Forward);
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(logger::level_filter(None), Some(log::LevelFilter::Warn));
        assert_eq!(
            logger::level_filter(Some("debug")),
            Some(log::LevelFilter::Debug)
        );
        assert_eq!(logger::level_filter(Some("loud")), None);
    }

    #[test]
    fn test_version() {
        let v = version();
        assert!(!v.is_empty());
        assert!(v.contains('.'));
    }
}
