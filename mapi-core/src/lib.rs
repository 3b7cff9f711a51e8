pub mod config;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod file_utils;
pub mod package_manager;
pub mod prompt;
pub mod store;
pub mod template;

pub use config::{Args, Settings};
pub use dispatch::{dispatch, run, Command, Context, Outcome, Report};
pub use entity::{Deletion, EntityManager};
pub use error::{MapiError, Result};
pub use store::{FileStore, MemoryStore, PathStore};
pub use template::{EntityKind, Template};
