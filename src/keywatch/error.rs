//! Error types for parsing definitions and unfolding registrations

/// A key or sequence definition could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("key definition must not be empty")]
    EmptyKey,

    #[error("a key sequence must contain at least one key, none provided")]
    EmptySequence,

    #[error("unable to parse key definition #{index} \"{token}\" in sequence \"{definition}\": {source}")]
    InvalidKey {
        index: usize,
        token: String,
        definition: String,
        source: Box<ParseError>,
    },
}

/// A single entry of a batch definition was dropped during unfolding
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("entry #{index} has no key definition")]
    MissingKeys { index: usize },

    #[error("entry #{index} \"{keys}\" has no handler")]
    MissingHandler { index: usize, keys: String },

    #[error("dropping invalid sequence #{index} \"{keys}\": {source}")]
    InvalidSequence {
        index: usize,
        keys: String,
        source: ParseError,
    },
}

impl RegistrationError {
    /// Index of the offending entry within its batch
    pub fn index(&self) -> usize {
        match self {
            RegistrationError::MissingKeys { index }
            | RegistrationError::MissingHandler { index, .. }
            | RegistrationError::InvalidSequence { index, .. } => *index,
        }
    }
}

/// A shortcut file could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid shortcut file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid shortcut tree entry \"{path}\": {reason}")]
    InvalidTree { path: String, reason: String },
}
