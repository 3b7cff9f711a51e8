use std::fmt;
use std::path::PathBuf;

use crate::entity::{Deletion, EntityManager};
use crate::error::{MapiError, Result};
use crate::package_manager::PackageManager;
use crate::prompt::Confirm;
use crate::store::PathStore;
use crate::template::EntityKind;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Configure(PathBuf),
    Init(String),
    Create(EntityKind, String),
    DeleteProject,
    Delete(EntityKind, String),
}

/// Token lists that do not form a command. Each is reported without
/// touching the filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    MissingCommand,
    MissingPath,
    MissingProjectName,
    MissingCreateArgs,
    MissingDeleteTarget,
    MissingName(EntityKind),
    UnknownCommand(String),
    UnknownType(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingCommand => f.write_str("Please provide a command"),
            Rejection::MissingPath => f.write_str("Please provide a project path"),
            Rejection::MissingProjectName => f.write_str("Please provide a project name"),
            Rejection::MissingCreateArgs => f.write_str("Please provide a feature or helper name"),
            Rejection::MissingDeleteTarget => {
                f.write_str("Please provide a project, feature or helper name")
            }
            Rejection::MissingName(kind) => write!(f, "Please provide a {kind} name"),
            Rejection::UnknownCommand(_) => f.write_str("Unknown command"),
            Rejection::UnknownType(_) => f.write_str("Unknown type"),
        }
    }
}

impl Command {
    /// Interprets the tokens following the program name. Surplus tokens are
    /// ignored.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> std::result::Result<Self, Rejection> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();

        match tokens.as_slice() {
            [] => Err(Rejection::MissingCommand),
            ["configure"] => Err(Rejection::MissingPath),
            ["configure", path, ..] => Ok(Command::Configure(PathBuf::from(*path))),
            ["init"] => Err(Rejection::MissingProjectName),
            ["init", name, ..] => Ok(Command::Init(name.to_string())),
            ["create"] | ["create", _] => Err(Rejection::MissingCreateArgs),
            ["create", kind, name, ..] => {
                let kind = match *kind {
                    "feature" => EntityKind::Feature,
                    "helper" => EntityKind::Helper,
                    "test" => EntityKind::TestScenario,
                    other => return Err(Rejection::UnknownType(other.to_string())),
                };
                Ok(Command::Create(kind, name.to_string()))
            }
            ["delete"] => Err(Rejection::MissingDeleteTarget),
            ["delete", "project", ..] => Ok(Command::DeleteProject),
            ["delete", kind, rest @ ..] => {
                let kind = match *kind {
                    "feature" => EntityKind::Feature,
                    "helper" => EntityKind::Helper,
                    other => return Err(Rejection::UnknownType(other.to_string())),
                };
                match rest.first() {
                    Some(name) => Ok(Command::Delete(kind, name.to_string())),
                    None => Err(Rejection::MissingName(kind)),
                }
            }
            [other, ..] => Err(Rejection::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Configured,
    Created(EntityKind, String),
    ProjectDeleted(Deletion),
    Deleted(EntityKind, String, Deletion),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Configured => f.write_str("Project path updated successfully."),
            Outcome::Created(EntityKind::Project, name) => {
                write!(f, "Project {name} initialized successfully")
            }
            Outcome::Created(kind, name) => write!(f, "{} {name} created successfully", kind.title()),
            Outcome::ProjectDeleted(Deletion::Cancelled) => f.write_str("Project deletion cancelled"),
            Outcome::ProjectDeleted(_) => f.write_str("Project deleted successfully"),
            Outcome::Deleted(kind, name, deletion) => {
                let title = kind.title();
                match deletion {
                    Deletion::Removed => write!(f, "{title} {name} deleted successfully"),
                    Deletion::Missing => write!(f, "{title} {name} does not exist"),
                    Deletion::Cancelled => write!(f, "{title} {name} deletion cancelled"),
                }
            }
        }
    }
}

/// Collaborators a command runs against.
pub struct Context<'a> {
    pub store: &'a dyn PathStore,
    pub package_manager: &'a dyn PackageManager,
    pub confirm: &'a dyn Confirm,
}

impl<'a> Context<'a> {
    fn entities(&self) -> EntityManager<'a> {
        EntityManager::new(self.store, self.package_manager, self.confirm)
    }
}

pub fn dispatch(command: &Command, ctx: &Context<'_>) -> Result<Outcome> {
    match command {
        Command::Configure(path) => {
            ctx.store.set(path)?;
            Ok(Outcome::Configured)
        }
        Command::Init(name) => {
            ctx.entities().create(EntityKind::Project, name)?;
            Ok(Outcome::Created(EntityKind::Project, name.clone()))
        }
        Command::Create(kind, name) => {
            ctx.entities().create(*kind, name)?;
            Ok(Outcome::Created(*kind, name.clone()))
        }
        Command::DeleteProject => ctx.entities().delete_project().map(Outcome::ProjectDeleted),
        Command::Delete(kind, name) => ctx
            .entities()
            .delete(*kind, name)
            .map(|deletion| Outcome::Deleted(*kind, name.clone(), deletion)),
    }
}

/// What to print and which status to exit with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub message: String,
    pub exit_code: u8,
}

impl From<Rejection> for Report {
    fn from(rejection: Rejection) -> Self {
        Report {
            message: rejection.to_string(),
            exit_code: 0,
        }
    }
}

impl From<Outcome> for Report {
    fn from(outcome: Outcome) -> Self {
        Report {
            message: outcome.to_string(),
            exit_code: 0,
        }
    }
}

impl From<MapiError> for Report {
    fn from(err: MapiError) -> Self {
        Report {
            message: err.to_string(),
            exit_code: err.exit_code(),
        }
    }
}

/// Parses and executes one invocation, folding every result into a report.
pub fn run<S: AsRef<str>>(tokens: &[S], ctx: &Context<'_>) -> Report {
    let command = match Command::parse(tokens) {
        Ok(command) => command,
        Err(rejection) => {
            tracing::debug!(?rejection, "rejected arguments");
            return rejection.into();
        }
    };
    tracing::debug!(?command, "dispatching");
    match dispatch(&command, ctx) {
        Ok(outcome) => outcome.into(),
        Err(err) => err.into(),
    }
}
