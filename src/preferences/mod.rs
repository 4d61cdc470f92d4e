//! Preference definitions and cascading resolution
//!
//! Preferences are resolved in declared order; later preferences may
//! template their options on the selections of earlier ones.

pub mod catalog;
pub mod resolver;
pub mod schema;
pub mod template;

pub use catalog::OptionCatalog;
pub use resolver::{resolve, resolved_selection, ResolvedPreference};
pub use schema::{OptionSource, PreferenceDefinition, PreferenceOption};
pub use template::{interpolate, validate_dependencies};
