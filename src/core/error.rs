use thiserror::Error;

use crate::core::types::{ContentRef, OptionId, PrefId};
use crate::expression::{DecodeError, EvalError};

#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("Preference {0} is declared more than once")]
    DuplicatePreference(PrefId),

    #[error("Preference {0} has no options after interpolation")]
    EmptyOptions(PrefId),

    #[error("Preference {pref} offers unknown option: {option}")]
    UnknownOption { pref: PrefId, option: OptionId },

    #[error("Preference {pref} references unresolved placeholder {{{placeholder}}}")]
    UnresolvedPlaceholder { pref: PrefId, placeholder: String },

    #[error("Default {default} of preference {pref} is not among its options")]
    DefaultNotOffered { pref: PrefId, default: OptionId },

    #[error("Preferences form a dependency cycle: {}", format_cycle(.0))]
    CyclicPreferences(Vec<PrefId>),

    #[error("Preference {pref} depends on {dependency}, which is declared after it")]
    ForwardReference { pref: PrefId, dependency: PrefId },

    #[error("Unknown preference: {0}")]
    UnknownPreference(PrefId),

    #[error("Content block {0} has no condition")]
    MissingCondition(ContentRef),

    #[error("Content reference {0} appears on more than one block")]
    DuplicateContentBlock(ContentRef),

    #[error("Expression error: {0}")]
    Expression(#[from] EvalError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Missing {role} element: #{id}")]
    MissingElement { role: &'static str, id: String },

    #[error("Page controller used before initialize")]
    NotInitialized,

    #[error("Invalid controller config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
}

impl PrefsError {
    /// True for defects in the page data itself, as opposed to a missing
    /// element or a misused controller.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            PrefsError::MissingElement { .. }
                | PrefsError::NotInitialized
                | PrefsError::InvalidConfig(_)
                | PrefsError::IoError(_)
                | PrefsError::SerdeError(_)
                | PrefsError::ConfigError(_)
        )
    }
}

fn format_cycle(path: &[PrefId]) -> String {
    path.iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, PrefsError>;
