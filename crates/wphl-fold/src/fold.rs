//! Folding of the construct around the cursor.
//!
//! On every cursor move the controller resolves the innermost foldable
//! range around the cursor and offers it through a tooltip. Clicking the
//! tooltip collapses the range behind a placeholder glyph; clicking the
//! glyph expands it again. Only the current tooltip and the live folds
//! are kept between moves.

use crate::config::FoldConfig;
use crate::debounce::HideTimer;
use crate::editor::{Decoration, Editor};
use serde::Serialize;
use std::fmt;
use wphl_lexer::{Host, Position, Range};
use wphl_matcher::{
    find_enclosing_comment, find_enclosing_tag, find_enclosing_template, ConfigError,
    MatchConfig, MatchError,
};

/// What a foldable range belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FoldKind {
    Comment,
    Template,
    Tag,
}

impl FoldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FoldKind::Comment => "comment",
            FoldKind::Template => "template",
            FoldKind::Tag => "tag",
        }
    }

    /// Key of the localized tooltip label.
    pub fn message_key(self) -> &'static str {
        match self {
            FoldKind::Comment => "fold-comment",
            FoldKind::Template => "fold-template",
            FoldKind::Tag => "fold-tag",
        }
    }
}

impl fmt::Display for FoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A range that can be folded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldTarget {
    pub kind: FoldKind,
    pub range: Range,
}

/// Resolve the innermost foldable range around `pos`.
///
/// A comment always wins. Otherwise the template body is chosen when
/// it starts after the enclosing tag pair's opening tag, and the tag
/// content in every other case. Empty ranges are never offered.
pub fn enclosing_fold<H: Host + ?Sized>(
    host: &H,
    pos: Position,
    config: &MatchConfig,
) -> Result<Option<FoldTarget>, MatchError> {
    if let Some(range) = find_enclosing_comment(host, pos)? {
        return Ok(Some(FoldTarget {
            kind: FoldKind::Comment,
            range,
        })
        .filter(|target| !target.range.is_empty()));
    }

    let template = find_enclosing_template(host, pos, config)?;
    let pair = find_enclosing_tag(host, pos, None, config)?;
    let target = match (template, pair) {
        (None, None) => None,
        (Some(range), None) => Some(FoldTarget {
            kind: FoldKind::Template,
            range,
        }),
        (Some(range), Some(pair)) if range.from > pair.open.to => Some(FoldTarget {
            kind: FoldKind::Template,
            range,
        }),
        (_, Some(pair)) => Some(FoldTarget {
            kind: FoldKind::Tag,
            range: pair.inner(),
        }),
    };
    Ok(target.filter(|target| !target.range.is_empty()))
}

/// The fold currently offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub kind: FoldKind,
    pub range: Range,
    /// Cursor position the tooltip is shown at.
    pub anchor: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FoldId(pub u32);

/// A collapsed range and the placeholder mark hiding it.
#[derive(Debug)]
pub struct Fold<M> {
    pub id: FoldId,
    pub kind: FoldKind,
    pub range: Range,
    mark: M,
}

/// Cursor-driven fold tooltip and the folds it created.
///
/// Time is passed in by the caller in milliseconds; `tick` must be
/// called for a scheduled hide to take effect.
#[derive(Debug)]
pub struct FoldController<M> {
    config: FoldConfig,
    enabled: bool,
    tooltip: Option<Tooltip>,
    timer: HideTimer,
    folds: Vec<Fold<M>>,
    next_id: u32,
}

impl<M> FoldController<M> {
    pub fn new(config: FoldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            enabled: true,
            tooltip: None,
            timer: HideTimer::new(),
            folds: Vec::new(),
            next_id: 0,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn folds(&self) -> &[Fold<M>] {
        &self.folds
    }

    /// When the tooltip will hide, if a hide is pending.
    pub fn hide_deadline(&self) -> Option<u64> {
        self.timer.deadline()
    }

    /// React to a cursor move or selection change.
    ///
    /// Returns the tooltip that is visible afterwards. A tooltip that is
    /// no longer relevant stays visible until its hide comes due.
    pub fn cursor_activity<E>(&mut self, editor: &mut E, now: u64) -> Option<&Tooltip>
    where
        E: Editor<Mark = M>,
    {
        if self.enabled {
            editor.operation(|editor| self.refresh(editor, now));
        }
        self.tooltip.as_ref()
    }

    fn refresh<E: Editor<Mark = M>>(&mut self, editor: &E, now: u64) {
        let hide_delay = self.config.hide_delay_ms;
        if editor.has_selection() {
            self.timer.schedule(now, hide_delay, false);
            return;
        }
        let cursor = editor.cursor();
        match enclosing_fold(editor, cursor, &self.config.matching) {
            Ok(Some(FoldTarget { kind, range })) => {
                log::debug!("offering {kind} fold {range}");
                self.tooltip = Some(Tooltip {
                    kind,
                    range,
                    anchor: cursor,
                });
                self.timer
                    .schedule(now, self.config.tooltip_timeout_ms, true);
            }
            Ok(None) => self.timer.schedule(now, hide_delay, false),
            Err(err) => {
                log::warn!("fold lookup failed: {err}");
                self.timer.schedule(now, hide_delay, false);
            }
        }
    }

    /// Apply a pending hide that has come due. Returns whether the
    /// tooltip was hidden.
    pub fn tick(&mut self, now: u64) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        let hidden = self.tooltip.take().is_some();
        if hidden {
            log::trace!("tooltip hidden at {now}");
        }
        hidden
    }

    /// Collapse the offered range. Returns the new fold, or `None` when no
    /// tooltip is visible.
    pub fn tooltip_clicked<E>(&mut self, editor: &mut E) -> Option<FoldId>
    where
        E: Editor<Mark = M>,
    {
        let Tooltip { kind, range, .. } = self.tooltip.take()?;
        self.timer.cancel();
        let decoration = Decoration::Placeholder {
            glyph: self.config.placeholder.clone(),
            kind,
        };
        let mark = editor.operation(|editor| editor.mark_range(range, decoration));
        let id = FoldId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        log::debug!("folded {kind} {range} as {}", id.0);
        self.folds.push(Fold {
            id,
            kind,
            range,
            mark,
        });
        Some(id)
    }

    /// Expand the fold whose placeholder was clicked, then offer whatever
    /// is foldable at the cursor again. Returns `false` for an unknown id.
    pub fn glyph_clicked<E>(&mut self, editor: &mut E, id: FoldId, now: u64) -> bool
    where
        E: Editor<Mark = M>,
    {
        let Some(index) = self.folds.iter().position(|fold| fold.id == id) else {
            return false;
        };
        let fold = self.folds.remove(index);
        editor.operation(|editor| editor.clear_mark(fold.mark));
        log::debug!("unfolded {} {}", fold.kind, fold.range);
        self.cursor_activity(editor, now);
        true
    }

    /// Expand every fold.
    pub fn unfold_all<E>(&mut self, editor: &mut E)
    where
        E: Editor<Mark = M>,
    {
        let folds = std::mem::take(&mut self.folds);
        editor.operation(|editor| {
            for fold in folds {
                editor.clear_mark(fold.mark);
            }
        });
    }

    /// Turn cursor tracking on or off. Disabling hides the tooltip at
    /// once; existing folds stay until expanded.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.tooltip = None;
            self.timer.cancel();
        }
    }
}
