//! Application layer: span resolution, substitution, settings, and command wiring.

pub mod command;
pub mod resolver;
pub mod settings;
pub mod substitute;
