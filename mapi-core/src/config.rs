use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::store::default_state_file;

pub const SETTINGS_FILE_NAME: &str = ".mapi.toml";

#[derive(Deserialize, Debug, Default)]
struct RawStore {
    state_file: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
struct RawPackageManager {
    program: Option<String>,
    test_framework: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct RawSettings {
    store: Option<RawStore>,
    package_manager: Option<RawPackageManager>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    /// `None` only when no location was given and there is no home directory.
    pub state_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageManagerSettings {
    pub program: String,
    pub test_framework: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreSettings,
    pub package_manager: PackageManagerSettings,
}

#[derive(Parser, Clone, Debug, Default)]
#[command(
    name = "mapi",
    version,
    about = "Scaffold projects, features, helpers and test scenarios",
    after_help = "Commands:\n  configure <path>\n  init <project_name>\n  create feature|helper|test <name>\n  delete project\n  delete feature|helper <name>"
)]
pub struct Args {
    #[arg(help = "Command followed by its arguments")]
    pub tokens: Vec<String>,

    #[arg(short = 'c', long, help = "Settings file path (default: ~/.mapi.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "State file holding the project root (default: ~/.mapi)")]
    pub state_file: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,
}

impl Settings {
    /// Built-in defaults, then the settings file, then CLI flags. The home
    /// directory is consulted only for locations nothing else provided.
    pub fn new(args: &Args) -> Self {
        let settings_path = args.config.clone().or_else(default_settings_file);
        let mut settings = match settings_path {
            Some(path) => Self::load(&path, Self::builtin()),
            None => Self::builtin(),
        };

        if let Some(state_file) = &args.state_file {
            settings.store.state_file = Some(state_file.clone());
        }
        if settings.store.state_file.is_none() {
            settings.store.state_file = default_state_file();
        }

        settings
    }

    /// Reads `path` over `defaults`. A missing file is silent; a broken one
    /// is logged and ignored.
    pub fn load(path: &Path, defaults: Settings) -> Self {
        if !path.exists() {
            return defaults;
        }

        let mut file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Cannot load settings {}: {}. Using defaults.", path.display(), e);
                return defaults;
            }
        };

        let mut contents = String::new();
        if let Err(e) = file.read_to_string(&mut contents) {
            tracing::warn!("Cannot read settings {}: {}. Using defaults.", path.display(), e);
            return defaults;
        }

        match Self::from_toml(&contents) {
            Ok(raw) => Self::merge(raw, defaults),
            Err(e) => {
                tracing::warn!("Cannot parse settings {}: {}. Using defaults.", path.display(), e);
                defaults
            }
        }
    }

    fn from_toml(contents: &str) -> std::result::Result<RawSettings, toml::de::Error> {
        toml::from_str(contents)
    }

    fn merge(raw: RawSettings, defaults: Settings) -> Self {
        let store = raw.store.unwrap_or_default();
        let package_manager = raw.package_manager.unwrap_or_default();

        Settings {
            store: StoreSettings {
                state_file: store.state_file.or(defaults.store.state_file),
            },
            package_manager: PackageManagerSettings {
                program: package_manager
                    .program
                    .unwrap_or(defaults.package_manager.program),
                test_framework: package_manager
                    .test_framework
                    .unwrap_or(defaults.package_manager.test_framework),
            },
        }
    }

    pub fn with_state_file(state_file: impl Into<PathBuf>) -> Self {
        let mut settings = Self::builtin();
        settings.store.state_file = Some(state_file.into());
        settings
    }

    fn builtin() -> Self {
        Settings {
            store: StoreSettings { state_file: None },
            package_manager: PackageManagerSettings {
                program: "npm".to_string(),
                test_framework: "jest".to_string(),
            },
        }
    }
}

fn default_settings_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(SETTINGS_FILE_NAME))
}
