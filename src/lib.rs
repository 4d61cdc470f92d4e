//! Doc Prefs - reactive preference chooser for generated documentation pages

pub mod core;
pub mod expression;
pub mod page;
pub mod preferences;
