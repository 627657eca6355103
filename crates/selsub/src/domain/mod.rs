//! Pure domain types shared by the application and infrastructure layers.

pub mod editor;
pub mod errors;
pub mod model;
