use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::template::EntityKind;

pub type Result<T> = std::result::Result<T, MapiError>;

#[derive(Debug, Error)]
pub enum MapiError {
    #[error("Project path not configured. Please run 'mapi configure <path>'")]
    NotConfigured,

    #[error("Error configuring project path: the given path does not exist ({})", .0.display())]
    InvalidPath(PathBuf),

    #[error("{} {name} already exists", .kind.title())]
    AlreadyExists { kind: EntityKind, name: String },

    #[error("Invalid name '{0}': use letters, digits, '_', '-' or '.'")]
    InvalidName(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot locate the home directory; pass --state-file <path>")]
    NoHomeDir,
}

impl MapiError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        MapiError::Io {
            context: context.into(),
            source,
        }
    }

    /// Only a missing configuration and genuine I/O failures end the process
    /// with a failure status; every other error is reported and exits cleanly.
    pub fn exit_code(&self) -> u8 {
        match self {
            MapiError::NotConfigured | MapiError::Io { .. } | MapiError::NoHomeDir => 1,
            MapiError::InvalidPath(_)
            | MapiError::AlreadyExists { .. }
            | MapiError::InvalidName(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_keep_not_configured_fatal() {
        assert_eq!(MapiError::NotConfigured.exit_code(), 1);
        assert_eq!(
            MapiError::AlreadyExists {
                kind: EntityKind::Feature,
                name: "billing".into()
            }
            .exit_code(),
            0
        );
        assert_eq!(MapiError::InvalidPath(PathBuf::from("/nope")).exit_code(), 0);
    }

    #[test]
    fn already_exists_message_names_the_kind() {
        let err = MapiError::AlreadyExists {
            kind: EntityKind::TestScenario,
            name: "login".into(),
        };
        assert_eq!(err.to_string(), "Test scenario login already exists");
    }
}
