//! Narrow capability surface the command needs from a host editor.

use crate::domain::model::Position;

/// The six editor operations the find-and-replace command relies on.
pub trait Editor {
    /// True when the current selection spans at least one character.
    fn has_selection(&self) -> bool;

    /// Text of the current selection, lines joined with `\n`.
    fn selection_text(&self) -> String;

    fn cursor(&self) -> Position;

    /// Text of `line` without its terminator, or `None` past the end of the document.
    fn line_text(&self, line: usize) -> Option<String>;

    fn set_selection(&mut self, start: Position, end: Position);

    /// Replace the current selection (or insert at the cursor when it is empty).
    fn replace_selection(&mut self, text: &str);
}

/// Host application exposing the focused editor and a notice area.
pub trait Host {
    /// The editor commands should act on, if one is focused.
    fn active_editor(&mut self) -> Option<&mut dyn Editor>;

    /// Show a short user-facing message.
    fn notice(&mut self, message: &str);
}
