//! Line-based in-memory document implementing the [`Editor`] capability.

use std::fmt;

use crate::domain::editor::Editor;
use crate::domain::model::{Position, SelectionRange};

/// A line terminator. Each loaded line keeps its own; new line breaks use the first one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// The terminator of the first line break in `text`, or LF when there is none.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(index) if text[..index].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// A text document with a cursor and a single anchor/head selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    /// Terminator after each line but the last, so `endings.len() == lines.len() - 1`.
    endings: Vec<LineEnding>,
    line_ending: LineEnding,
    anchor: Position,
    head: Position,
}

impl TextBuffer {
    /// Load text, remembering every line ending. The cursor starts at the top of the document.
    pub fn from_text(text: &str) -> Self {
        let (lines, endings) = split_lines(text);
        Self {
            lines,
            endings,
            line_ending: LineEnding::detect(text),
            anchor: Position::default(),
            head: Position::default(),
        }
    }

    /// Full document text, each line followed by its own terminator.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (line, ending) in self.lines.iter().zip(&self.endings) {
            text.push_str(line);
            text.push_str(ending.as_str());
        }
        if let Some(last) = self.lines.last() {
            text.push_str(last);
        }
        text
    }

    /// Terminator used for line breaks inserted by edits.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether `position` lies inside the document without clamping.
    pub fn contains(&self, position: Position) -> bool {
        self.lines
            .get(position.line)
            .is_some_and(|line| position.ch <= line.chars().count())
    }

    /// Collapse the selection to `position`, clamped into the document.
    pub fn set_cursor(&mut self, position: Position) {
        let position = self.clamp(position);
        self.anchor = position;
        self.head = position;
    }

    /// The current selection, ordered.
    pub fn selection(&self) -> SelectionRange {
        SelectionRange::new(self.anchor, self.head)
    }

    fn clamp(&self, position: Position) -> Position {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let len = self.lines.get(line).map_or(0, |text| text.chars().count());
        Position::new(line, position.ch.min(len))
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl Editor for TextBuffer {
    fn has_selection(&self) -> bool {
        self.anchor != self.head
    }

    fn selection_text(&self) -> String {
        let range = self.selection();
        let (start, end) = (range.start(), range.end());
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_offset(line, start.ch)..byte_offset(line, end.ch)].to_owned();
        }

        let first = &self.lines[start.line];
        let last = &self.lines[end.line];
        let mut parts = Vec::with_capacity(end.line - start.line + 1);
        parts.push(&first[byte_offset(first, start.ch)..]);
        parts.extend(self.lines[start.line + 1..end.line].iter().map(String::as_str));
        parts.push(&last[..byte_offset(last, end.ch)]);
        parts.join("\n")
    }

    fn cursor(&self) -> Position {
        self.head
    }

    fn line_text(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn set_selection(&mut self, start: Position, end: Position) {
        self.anchor = self.clamp(start);
        self.head = self.clamp(end);
    }

    fn replace_selection(&mut self, text: &str) {
        let range = self.selection();
        let (start, end) = (range.start(), range.end());

        let first = &self.lines[start.line];
        let prefix = first[..byte_offset(first, start.ch)].to_owned();
        let last = &self.lines[end.line];
        let suffix = last[byte_offset(last, end.ch)..].to_owned();

        let (mut inserted, _) = split_lines(text);
        let last_index = inserted.len() - 1;
        let cursor_ch = if last_index == 0 {
            start.ch + inserted[0].chars().count()
        } else {
            inserted[last_index].chars().count()
        };
        inserted[0].insert_str(0, &prefix);
        inserted[last_index].push_str(&suffix);

        self.lines.splice(start.line..=end.line, inserted);
        self.endings.splice(
            start.line..end.line,
            std::iter::repeat_n(self.line_ending, last_index),
        );
        let cursor = Position::new(start.line + last_index, cursor_ch);
        self.anchor = cursor;
        self.head = cursor;
    }
}

/// Split on `\n`, recording whether each break was `\r\n`. Always yields at least one line.
fn split_lines(text: &str) -> (Vec<String>, Vec<LineEnding>) {
    let mut lines = Vec::new();
    let mut endings = Vec::new();
    let mut rest = text;
    while let Some(index) = rest.find('\n') {
        let line = &rest[..index];
        match line.strip_suffix('\r') {
            Some(stripped) => {
                lines.push(stripped.to_owned());
                endings.push(LineEnding::CrLf);
            }
            None => {
                lines.push(line.to_owned());
                endings.push(LineEnding::Lf);
            }
        }
        rest = &rest[index + 1..];
    }
    lines.push(rest.to_owned());
    (lines, endings)
}

fn byte_offset(line: &str, ch: usize) -> usize {
    line.char_indices()
        .nth(ch)
        .map_or(line.len(), |(index, _)| index)
}
