use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::PackageManagerSettings;

/// External toolchain used while initializing a project. Results are
/// best effort: failures are logged, never returned.
pub trait PackageManager {
    fn init_manifest(&self, project_dir: &Path);
    fn install_test_framework(&self, project_dir: &Path);
}

pub struct SystemPackageManager {
    program: String,
    test_framework: String,
}

impl SystemPackageManager {
    pub fn new(settings: &PackageManagerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            test_framework: settings.test_framework.clone(),
        }
    }

    fn run(&self, args: &[&str], cwd: &Path) {
        tracing::info!(program = %self.program, ?args, cwd = %cwd.display(), "running package manager");
        match Command::new(&self.program).args(args).current_dir(cwd).status() {
            Ok(status) if !status.success() => {
                tracing::warn!("{} {} exited with {}", self.program, args.join(" "), status);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Cannot run {}: {}", self.program, e);
            }
        }
    }
}

impl PackageManager for SystemPackageManager {
    fn init_manifest(&self, project_dir: &Path) {
        self.run(&["init", "-y"], project_dir);
    }

    fn install_test_framework(&self, project_dir: &Path) {
        self.run(&["install", &self.test_framework], project_dir);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    InitManifest(PathBuf),
    InstallTestFramework(PathBuf),
}

/// Records calls instead of spawning anything.
#[derive(Default)]
pub struct RecordingPackageManager {
    pub calls: RefCell<Vec<Invocation>>,
}

impl PackageManager for RecordingPackageManager {
    fn init_manifest(&self, project_dir: &Path) {
        self.calls
            .borrow_mut()
            .push(Invocation::InitManifest(project_dir.to_path_buf()));
    }

    fn install_test_framework(&self, project_dir: &Path) {
        self.calls
            .borrow_mut()
            .push(Invocation::InstallTestFramework(project_dir.to_path_buf()));
    }
}
