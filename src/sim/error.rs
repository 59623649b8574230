use std::fmt;

use super::entity::EntityId;

/// What was wrong with a level line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// First token is not one of the known entity tags
    UnknownTag,
    /// Tag was followed by the wrong number of arguments
    WrongArity { expected: usize, found: usize },
    /// A coordinate was not an integer
    InvalidNumber(String),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownTag => write!(f, "unknown tag"),
            ParseErrorKind::WrongArity { expected, found } => {
                write!(f, "expected {} arguments, found {}", expected, found)
            }
            ParseErrorKind::InvalidNumber(token) => {
                write!(f, "'{}' is not an integer coordinate", token)
            }
        }
    }
}

/// A malformed line in a level description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelParseError {
    /// 1-based line number
    pub line: usize,
    /// Tag token of the offending line
    pub tag: String,
    pub kind: ParseErrorKind,
}

impl fmt::Display for LevelParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {} ('{}'): {}", self.line, self.tag, self.kind)
    }
}

impl std::error::Error for LevelParseError {}

/// Errors surfaced by the simulation core
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Level text could not be resolved or read
    ResourceNotFound { name: String, reason: String },

    /// Level text was found but is malformed
    LevelParse(LevelParseError),

    /// Movement resolution kept bouncing between obstacles.
    /// The mover has been put back where it started.
    UnresolvableCollision { iterations: usize },

    /// No live entity with this ID
    UnknownEntity(EntityId),

    /// Settings file unreadable or malformed
    Settings(String),

    /// Scene snapshot could not be encoded
    Serialization(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::ResourceNotFound { name, reason } => {
                write!(f, "level '{}' not found: {}", name, reason)
            }
            SimError::LevelParse(err) => write!(f, "level parse error at {}", err),
            SimError::UnresolvableCollision { iterations } => {
                write!(f, "collision unresolved after {} pushes", iterations)
            }
            SimError::UnknownEntity(id) => write!(f, "no live entity with id {}", id.0),
            SimError::Settings(reason) => write!(f, "invalid settings: {}", reason),
            SimError::Serialization(reason) => write!(f, "serialization failed: {}", reason),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::LevelParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LevelParseError> for SimError {
    fn from(error: LevelParseError) -> Self {
        SimError::LevelParse(error)
    }
}
