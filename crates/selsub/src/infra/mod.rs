//! Infrastructure adapters for documents, config, and logging.

pub mod buffer;
pub mod config;
pub mod document;
pub mod logging;
