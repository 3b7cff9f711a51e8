use std::path::PathBuf;

use crate::error::{MapiError, Result};
use crate::file_utils::FileUtils;
use crate::package_manager::PackageManager;
use crate::prompt::Confirm;
use crate::store::PathStore;
use crate::template::{EntityKind, Template};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deletion {
    Removed,
    Missing,
    Cancelled,
}

/// Creates and removes entities below the configured project root. An
/// entity's presence on disk is its only state.
pub struct EntityManager<'a> {
    store: &'a dyn PathStore,
    package_manager: &'a dyn PackageManager,
    confirm: &'a dyn Confirm,
}

impl<'a> EntityManager<'a> {
    pub fn new(
        store: &'a dyn PathStore,
        package_manager: &'a dyn PackageManager,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            store,
            package_manager,
            confirm,
        }
    }

    /// Scaffolds a new entity and returns its directory. Nothing is rolled
    /// back if a write fails part way.
    pub fn create(&self, kind: EntityKind, name: &str) -> Result<PathBuf> {
        let root = self.store.get()?;
        ensure_safe_name(name)?;

        let target = kind.location(&root, name);
        if target.exists() {
            return Err(MapiError::AlreadyExists {
                kind,
                name: name.to_string(),
            });
        }

        tracing::info!(%kind, name, target = %target.display(), "creating");
        FileUtils::create_dir(&target)?;

        if kind == EntityKind::Project {
            self.package_manager.init_manifest(&target);
            self.package_manager.install_test_framework(&target);
        }

        Template::for_kind(kind, name).emit(&target)?;
        Ok(target)
    }

    /// Removes the whole configured root after confirmation.
    pub fn delete_project(&self) -> Result<Deletion> {
        let root = self.store.get()?;
        if !self
            .confirm
            .confirm("Are you sure you want to delete the project? (yes/no) ")
        {
            return Ok(Deletion::Cancelled);
        }
        FileUtils::remove_tree(&root)?;
        Ok(Deletion::Removed)
    }

    pub fn delete(&self, kind: EntityKind, name: &str) -> Result<Deletion> {
        let root = self.store.get()?;
        ensure_safe_name(name)?;

        let question = format!("Are you sure you want to delete the {kind} {name}? (yes/no) ");
        if !self.confirm.confirm(&question) {
            return Ok(Deletion::Cancelled);
        }

        let target = kind.location(&root, name);
        if !target.exists() {
            return Ok(Deletion::Missing);
        }
        FileUtils::remove_tree(&target)?;
        Ok(Deletion::Removed)
    }
}

fn ensure_safe_name(name: &str) -> Result<()> {
    if FileUtils::is_safe_name(name) {
        Ok(())
    } else {
        Err(MapiError::InvalidName(name.to_string()))
    }
}
