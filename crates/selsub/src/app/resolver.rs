//! Resolving the span a command acts on.

use tracing::debug;

use crate::domain::editor::Editor;
use crate::domain::model::{Position, SelectionRange};

/// Whether the editor reports a non-empty selection.
pub fn has_selection(editor: &dyn Editor) -> bool {
    editor.has_selection()
}

/// The full span of the line under the cursor, regardless of the cursor column.
pub fn line_span(editor: &dyn Editor) -> SelectionRange {
    let line = editor.cursor().line;
    let len = editor
        .line_text(line)
        .map(|text| text.chars().count())
        .unwrap_or(0);
    SelectionRange::new(Position::new(line, 0), Position::new(line, len))
}

/// Text the command should transform.
///
/// An existing selection is returned untouched. Otherwise the cursor line becomes the active
/// selection, so a later `replace_selection` rewrites exactly that line.
pub fn resolve_selection_text(editor: &mut dyn Editor) -> String {
    if has_selection(editor) {
        return editor.selection_text();
    }

    let span = line_span(editor);
    debug!(%span, "no selection, selecting cursor line");
    editor.set_selection(span.start(), span.end());
    editor.selection_text()
}
