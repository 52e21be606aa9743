use std::{error, fmt, io, path::PathBuf};

/// Error type for world files and editor settings.
#[derive(Debug)]
pub enum WorldError {
    /// File I/O error
    Io {
        /// File that was being read or written
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// Settings file is not valid JSON for [`crate::EditorConfig`]
    Json {
        /// Settings file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },
    /// A world file record could not be parsed
    Parse {
        /// 1-based line number of the offending record
        line: usize,
        /// What was wrong with it
        message: String,
    },
    /// The world file parsed but does not describe a usable grid
    InvalidWorld(String),
    /// Settings that cannot produce a grid
    InvalidConfig(String),
}

impl WorldError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        WorldError::Parse {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            WorldError::Json { path, source } => {
                write!(f, "Failed to parse settings {}: {}", path.display(), source)
            }
            WorldError::Parse { line, message } => {
                write!(f, "World file line {}: {}", line, message)
            }
            WorldError::InvalidWorld(msg) => write!(f, "Invalid world: {}", msg),
            WorldError::InvalidConfig(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl error::Error for WorldError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            WorldError::Io { source, .. } => Some(source),
            WorldError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
