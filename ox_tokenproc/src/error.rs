use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single token could not be substituted.
///
/// Every variant carries the literal token text so that a diagnostic can be
/// printed without access to the line it came from. None of these are fatal:
/// the replacer leaves the token verbatim and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("Token {token} is not found in config (missing key '{key}')")]
    KeyNotFound { token: String, key: String },

    #[error("Token {token} is not a terminal string in the config")]
    NotATerminalString { token: String },

    #[error("Token {token} contains an unrecognized transformation function '{name}'")]
    UnknownTransform { token: String, name: String },

    #[error("Token {token} has an empty key path")]
    MalformedToken { token: String },

    #[error("Token {token} exceeds the nesting limit of {depth} (cyclic reference?)")]
    CyclicReference { token: String, depth: usize },

    #[error("Token {token} exceeds the expansion limit of {limit} embedded tokens")]
    ExpansionLimit { token: String, limit: usize },
}

impl ResolutionError {
    /// The literal token text the error was raised for.
    pub fn token(&self) -> &str {
        match self {
            ResolutionError::KeyNotFound { token, .. }
            | ResolutionError::NotATerminalString { token }
            | ResolutionError::UnknownTransform { token, .. }
            | ResolutionError::MalformedToken { token }
            | ResolutionError::CyclicReference { token, .. }
            | ResolutionError::ExpansionLimit { token, .. } => token,
        }
    }

    /// True for failures that abandon an entire nested expansion rather than
    /// a single embedded token.
    pub fn aborts_expansion(&self) -> bool {
        matches!(
            self,
            ResolutionError::CyclicReference { .. } | ResolutionError::ExpansionLimit { .. }
        )
    }

    /// The same failure, attributed to `token` instead.
    pub(crate) fn charged_to(self, token: &str) -> Self {
        let token = token.to_string();
        match self {
            ResolutionError::KeyNotFound { key, .. } => ResolutionError::KeyNotFound { token, key },
            ResolutionError::NotATerminalString { .. } => ResolutionError::NotATerminalString { token },
            ResolutionError::UnknownTransform { name, .. } => ResolutionError::UnknownTransform { token, name },
            ResolutionError::MalformedToken { .. } => ResolutionError::MalformedToken { token },
            ResolutionError::CyclicReference { depth, .. } => ResolutionError::CyclicReference { token, depth },
            ResolutionError::ExpansionLimit { limit, .. } => ResolutionError::ExpansionLimit { token, limit },
        }
    }
}

/// Failure to produce the configuration tree. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing config ({format}): {message}")]
    Parse { format: &'static str, message: String },

    #[error("Unsupported config file extension: {0}")]
    UnsupportedFormat(String),

    #[error("Config root must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

impl ConfigError {
    pub(crate) fn parse(format: &'static str, err: impl std::fmt::Display) -> Self {
        ConfigError::Parse {
            format,
            message: err.to_string(),
        }
    }
}

/// Failure to read from one of the input sources.
#[derive(Debug, Error)]
#[error("{source_name}: {source}")]
pub struct InputError {
    pub source_name: String,
    #[source]
    pub source: io::Error,
}

/// Failure while driving a whole batch: either an input source failed or
/// the output sink could not be written.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),
}
