pub mod config;
pub mod error;
pub mod types;

pub use config::ControllerConfig;
pub use error::{PrefsError, Result};
pub use types::{ContentRef, OptionId, PrefId, SelectionState};
