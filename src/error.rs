use std::fmt;
use std::io::Error as IoError;

/// Error classes for a comparison run. All of them abort the run that
/// raised them; there is no partial-failure mode.
#[derive(Debug)]
pub enum RatError {
    /// An annotation record or timing label that cannot be parsed.
    Format(String),
    /// An annotation mapping outside the tile array allocated for its chromosome.
    Range(String),
    /// Rejected tile size or minimum distance.
    Config(String),
    Io(IoError),
}

impl fmt::Display for RatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatError::Format(msg) => write!(f, "format error: {}", msg),
            RatError::Range(msg) => write!(f, "range error: {}", msg),
            RatError::Config(msg) => write!(f, "config error: {}", msg),
            RatError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RatError {}

impl From<IoError> for RatError {
    fn from(e: IoError) -> Self {
        RatError::Io(e)
    }
}

impl From<RatError> for IoError {
    fn from(e: RatError) -> Self {
        match e {
            RatError::Io(e) => e,
            other => IoError::new(std::io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}
