//! Domain models for positions, selection spans, and substitution settings.
//!
//! Coordinates are 0-indexed. `ch` counts chars within a line, never bytes, and never includes
//! the line terminator.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A document position: line index and char offset within that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line.cmp(&other.line).then(self.ch.cmp(&other.ch))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

/// A span between two positions with `start <= end` in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SelectionRange {
    start: Position,
    end: Position,
}

impl SelectionRange {
    /// Build a range from two endpoints given in either order.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for SelectionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Substitution settings edited by the user and persisted between runs.
///
/// Every field is always present. An empty `literal_find` or `regex_find` disables that pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub literal_find: String,
    #[serde(default)]
    pub literal_replace: String,
    #[serde(default)]
    pub regex_find: String,
    #[serde(default)]
    pub regex_flags: String,
    #[serde(default)]
    pub regex_replace: String,
}

impl Settings {
    /// Whether neither pass would run.
    pub fn is_identity(&self) -> bool {
        self.literal_find.is_empty() && self.regex_find.is_empty()
    }

    pub fn get(&self, field: SettingField) -> &str {
        match field {
            SettingField::LiteralFind => &self.literal_find,
            SettingField::LiteralReplace => &self.literal_replace,
            SettingField::RegexFind => &self.regex_find,
            SettingField::RegexFlags => &self.regex_flags,
            SettingField::RegexReplace => &self.regex_replace,
        }
    }

    pub fn set(&mut self, field: SettingField, value: impl Into<String>) {
        let slot = match field {
            SettingField::LiteralFind => &mut self.literal_find,
            SettingField::LiteralReplace => &mut self.literal_replace,
            SettingField::RegexFind => &mut self.regex_find,
            SettingField::RegexFlags => &mut self.regex_flags,
            SettingField::RegexReplace => &mut self.regex_replace,
        };
        *slot = value.into();
    }
}

/// The editable settings fields, in the order a settings form presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    LiteralFind,
    LiteralReplace,
    RegexFind,
    RegexFlags,
    RegexReplace,
}

impl SettingField {
    pub const ALL: [SettingField; 5] = [
        SettingField::LiteralFind,
        SettingField::LiteralReplace,
        SettingField::RegexFind,
        SettingField::RegexFlags,
        SettingField::RegexReplace,
    ];

    /// Stable kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            SettingField::LiteralFind => "literal-find",
            SettingField::LiteralReplace => "literal-replace",
            SettingField::RegexFind => "regex-find",
            SettingField::RegexFlags => "regex-flags",
            SettingField::RegexReplace => "regex-replace",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingField::LiteralFind => "Text to find",
            SettingField::LiteralReplace => "Replace text by",
            SettingField::RegexFind => "RegExp to find",
            SettingField::RegexFlags => "RegExp flags",
            SettingField::RegexReplace => "Replace matches by",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SettingField::LiteralFind => "Leave empty to ignore",
            SettingField::LiteralReplace => "Inserted verbatim for every occurrence",
            SettingField::RegexFind => "Leave empty to ignore. Example: (\\w+)\\s(\\w+)",
            SettingField::RegexFlags => "Type \"gmi\" for global, multiline, insensitive",
            SettingField::RegexReplace => "Text to be inserted. Example: $2, $1",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
