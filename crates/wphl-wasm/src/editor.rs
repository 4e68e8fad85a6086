//! CodeMirror 5 as a [`wphl_fold::Editor`].

use js_sys::{Array, Function, Object, Reflect};
use std::borrow::Cow;
use wasm_bindgen::{JsCast, JsValue};
use wphl_fold::{Decoration, Editor};
use wphl_lexer::{Host, Position, Range, TokenKind};

/// Call `target[name](...args)`.
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let function: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    function.apply(target, &args.iter().collect::<Array>())
}

pub fn position_to_js(pos: Position) -> Result<JsValue, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"line".into(), &(pos.line as f64).into())?;
    Reflect::set(&object, &"ch".into(), &(pos.column as f64).into())?;
    Ok(object.into())
}

pub fn position_from_js(value: &JsValue) -> Option<Position> {
    let line = Reflect::get(value, &"line".into()).ok()?.as_f64()?;
    let column = Reflect::get(value, &"ch".into()).ok()?.as_f64()?;
    Some(Position::new(line as usize, column as usize))
}

/// A CodeMirror instance together with the factory for fold placeholders.
///
/// `placeholder(glyph, messageKey)` must return the DOM node shown in
/// place of a folded range. Without it folded ranges are collapsed
/// without a visible glyph.
pub struct JsEditor {
    cm: JsValue,
    placeholder: Option<Function>,
}

impl JsEditor {
    pub fn new(cm: JsValue, placeholder: Option<Function>) -> Self {
        Self { cm, placeholder }
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        match call_method(&self.cm, name, args) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("CodeMirror.{name} failed: {err:?}");
                None
            }
        }
    }

    fn call_usize(&self, name: &str) -> Option<usize> {
        self.call(name, &[])?.as_f64().map(|n| n as usize)
    }

    fn mark_options(&self, decoration: &Decoration) -> Result<JsValue, JsValue> {
        let options = Object::new();
        match decoration {
            Decoration::Placeholder { glyph, kind } => match &self.placeholder {
                Some(factory) => {
                    let element = factory.call2(
                        &JsValue::NULL,
                        &JsValue::from_str(glyph),
                        &JsValue::from_str(kind.message_key()),
                    )?;
                    Reflect::set(&options, &"replacedWith".into(), &element)?;
                }
                None => {
                    Reflect::set(&options, &"collapsed".into(), &JsValue::TRUE)?;
                }
            },
            _ => {
                if let Some(class) = decoration.class_name() {
                    Reflect::set(&options, &"className".into(), &class.into())?;
                }
            }
        }
        Ok(options.into())
    }
}

impl Host for JsEditor {
    fn first_line(&self) -> usize {
        self.call_usize("firstLine").unwrap_or(0)
    }

    fn last_line(&self) -> usize {
        self.call_usize("lastLine").unwrap_or(0)
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        self.call("getLine", &[(line as f64).into()])?
            .as_string()
            .map(Cow::Owned)
    }

    /// `getTokenTypeAt` reports the token left of a cursor, so the char
    /// at `column` is read from the cursor after it.
    fn token_kind(&self, line: usize, column: usize) -> TokenKind {
        let Ok(pos) = position_to_js(Position::new(line, column + 1)) else {
            return TokenKind::TEXT;
        };
        self.call("getTokenTypeAt", &[pos])
            .and_then(|value| value.as_string())
            .map(|token_type| TokenKind::from_token_type(&token_type))
            .unwrap_or(TokenKind::TEXT)
    }
}

impl Editor for JsEditor {
    type Mark = JsValue;

    fn cursor(&self) -> Position {
        self.call("getCursor", &[])
            .and_then(|value| position_from_js(&value))
            .unwrap_or_default()
    }

    fn has_selection(&self) -> bool {
        self.call("somethingSelected", &[])
            .and_then(|value| value.as_bool())
            .unwrap_or(false)
    }

    fn mark_range(&mut self, range: Range, decoration: Decoration) -> JsValue {
        let args = position_to_js(range.from).and_then(|from| {
            let to = position_to_js(range.to)?;
            Ok([from, to, self.mark_options(&decoration)?])
        });
        match args {
            Ok(args) => self.call("markText", &args).unwrap_or(JsValue::UNDEFINED),
            Err(err) => {
                log::warn!("cannot mark {range}: {err:?}");
                JsValue::UNDEFINED
            }
        }
    }

    fn clear_mark(&mut self, mark: JsValue) {
        if mark.is_undefined() {
            return;
        }
        if let Err(err) = call_method(&mark, "clear", &[]) {
            log::warn!("TextMarker.clear failed: {err:?}");
        }
    }

    fn operation<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        self.call("startOperation", &[]);
        let result = f(self);
        self.call("endOperation", &[]);
        result
    }
}
