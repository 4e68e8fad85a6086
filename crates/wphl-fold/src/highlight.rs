use crate::editor::{Decoration, Editor};
use wphl_matcher::{find_matching_tag, MatchConfig, TagMatch};

/// Marks the tag under the cursor and its counterpart.
///
/// The tag under the cursor is marked as matching when a counterpart
/// exists (or it needs none) and as non-matching otherwise. Previous
/// marks are cleared on every cursor move.
#[derive(Debug)]
pub struct TagHighlighter<M> {
    config: MatchConfig,
    marks: Vec<M>,
}

impl<M> TagHighlighter<M> {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            marks: Vec::new(),
        }
    }

    /// Re-highlight for the current cursor. Returns the match that was
    /// highlighted.
    pub fn cursor_activity<E>(&mut self, editor: &mut E) -> Option<TagMatch>
    where
        E: Editor<Mark = M>,
    {
        editor.operation(|editor| {
            self.clear_marks(editor);
            if editor.has_selection() {
                return None;
            }
            let cursor = editor.cursor();
            let found = match find_matching_tag(&*editor, cursor, &self.config) {
                Ok(found) => found?,
                Err(err) => {
                    log::warn!("tag lookup failed: {err}");
                    return None;
                }
            };

            let balanced =
                matches!(found, TagMatch::SelfClosing { .. }) || found.other().is_some();
            let decoration = if balanced {
                Decoration::MatchingTag
            } else {
                Decoration::NonMatchingTag
            };
            self.marks.push(editor.mark_range(found.hit().range(), decoration));
            if let Some(other) = found.other() {
                self.marks
                    .push(editor.mark_range(other.range(), Decoration::MatchingTag));
            }
            Some(found)
        })
    }

    /// Remove every highlight.
    pub fn clear<E>(&mut self, editor: &mut E)
    where
        E: Editor<Mark = M>,
    {
        editor.operation(|editor| self.clear_marks(editor));
    }

    fn clear_marks<E: Editor<Mark = M>>(&mut self, editor: &mut E) {
        for mark in self.marks.drain(..) {
            editor.clear_mark(mark);
        }
    }
}
