//! A file on disk acting as the host's single open editor.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::domain::editor::{Editor, Host};
use crate::domain::errors::DomainError;
use crate::domain::model::Position;
use crate::infra::buffer::TextBuffer;

/// Loads a file into a [`TextBuffer`], lets commands edit it, and writes it back.
#[derive(Debug)]
pub struct FileHost {
    path: PathBuf,
    original: String,
    buffer: TextBuffer,
    notices: Vec<String>,
}

impl FileHost {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let original = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let buffer = TextBuffer::from_text(&original);
        debug!(path = %path.display(), lines = buffer.line_count(), "opened document");
        Ok(Self {
            path,
            original,
            buffer,
            notices: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Place the cursor, rejecting positions outside the document.
    pub fn place_cursor(&mut self, position: Position) -> Result<(), DomainError> {
        self.check(position)?;
        self.buffer.set_cursor(position);
        Ok(())
    }

    /// Select from `anchor` to `head`, rejecting positions outside the document.
    pub fn select(&mut self, anchor: Position, head: Position) -> Result<(), DomainError> {
        self.check(anchor)?;
        self.check(head)?;
        self.buffer.set_selection(anchor, head);
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.to_text() != self.original
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Write the buffer back if it changed. Returns whether anything was written.
    pub fn save(&mut self) -> Result<bool> {
        if !self.is_modified() {
            return Ok(false);
        }
        let text = self.buffer.to_text();
        fs::write(&self.path, &text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        info!(path = %self.path.display(), "document saved");
        self.original = text;
        Ok(true)
    }

    fn check(&self, position: Position) -> Result<(), DomainError> {
        if self.buffer.contains(position) {
            Ok(())
        } else {
            Err(DomainError::InvalidPosition {
                line: position.line,
                ch: position.ch,
            })
        }
    }
}

impl Host for FileHost {
    fn active_editor(&mut self) -> Option<&mut dyn Editor> {
        Some(&mut self.buffer)
    }

    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_owned());
    }
}
