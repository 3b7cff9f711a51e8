use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::file_utils::FileUtils;

pub const EMPTY_DEFAULT_EXPORT: &str = "export default {};";
pub const EMPTY_MODULE_EXPORT: &str = "module.exports = {}";

pub const PROJECT_DIRS: [&str; 5] = ["__test__", "config", "features", "helpers", "middleware"];
pub const FEATURE_DIRS: [&str; 5] = ["controllers", "db", "useCases", "dataAccess", "router"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Project,
    Feature,
    Helper,
    TestScenario,
}

impl EntityKind {
    /// Directory under the project root holding entities of this kind.
    pub fn parent_dir(self) -> Option<&'static str> {
        match self {
            EntityKind::Project => None,
            EntityKind::Feature => Some("features"),
            EntityKind::Helper => Some("helpers"),
            EntityKind::TestScenario => Some("__test__"),
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Feature => "Feature",
            EntityKind::Helper => "Helper",
            EntityKind::TestScenario => "Test scenario",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Feature => "feature",
            EntityKind::Helper => "helper",
            EntityKind::TestScenario => "test scenario",
        }
    }

    pub fn location(self, root: &Path, name: &str) -> PathBuf {
        match self.parent_dir() {
            Some(parent) => root.join(parent).join(name),
            None => root.join(name),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Relative to the entity's own directory.
    Entity,
    /// Relative to the directory that contains the entity.
    Parent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileOp {
    Write {
        path: PathBuf,
        contents: String,
    },
    Append {
        anchor: Anchor,
        path: PathBuf,
        contents: String,
    },
}

/// The fixed skeleton for one entity. Building it touches nothing; `emit`
/// performs the writes in order and stops at the first failure.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<FileOp>,
}

impl Template {
    pub fn for_kind(kind: EntityKind, name: &str) -> Self {
        match kind {
            EntityKind::Project => Self::project(),
            EntityKind::Feature => Self::feature(),
            EntityKind::Helper => Self::helper(name),
            EntityKind::TestScenario => Self::test_scenario(name),
        }
    }

    fn project() -> Self {
        let mut template = Template {
            dirs: PROJECT_DIRS.iter().map(PathBuf::from).collect(),
            ..Default::default()
        };
        template.write(".babelrc", "{}");
        template.write("eslintrc.js", EMPTY_MODULE_EXPORT);
        template.write(".env", "");
        template.write("index.js", "console.log(\"Hello World\");");
        template.write("jest.config.js", EMPTY_MODULE_EXPORT);
        template.write("jest.setup.js", "");
        template
    }

    fn feature() -> Self {
        let mut template = Template {
            dirs: FEATURE_DIRS.iter().map(PathBuf::from).collect(),
            ..Default::default()
        };
        template.write("index.js", EMPTY_DEFAULT_EXPORT);
        template.write("db/schema.js", EMPTY_DEFAULT_EXPORT);
        for dir in FEATURE_DIRS {
            template.write(format!("{dir}/index.js"), EMPTY_DEFAULT_EXPORT);
        }
        template
    }

    fn helper(name: &str) -> Self {
        let mut template = Template::default();
        template.write("index.js", EMPTY_DEFAULT_EXPORT);
        template.files.push(FileOp::Append {
            anchor: Anchor::Parent,
            path: PathBuf::from("index.js"),
            contents: aggregator_entry(name),
        });
        template
    }

    fn test_scenario(name: &str) -> Self {
        let mut template = Template::default();
        template.write(format!("{name}.spec.js"), placeholder_spec(name));
        template
    }

    fn write(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.push(FileOp::Write {
            path: path.into(),
            contents: contents.into(),
        });
    }

    /// Writes the skeleton into `target`, which must already exist.
    pub fn emit(&self, target: &Path) -> Result<()> {
        for dir in &self.dirs {
            FileUtils::create_dir(&target.join(dir))?;
        }
        for op in &self.files {
            match op {
                FileOp::Write { path, contents } => FileUtils::write(&target.join(path), contents)?,
                FileOp::Append {
                    anchor,
                    path,
                    contents,
                } => {
                    let base = match anchor {
                        Anchor::Entity => target,
                        Anchor::Parent => target.parent().unwrap_or(target),
                    };
                    FileUtils::append(&base.join(path), contents)?;
                }
            }
        }
        Ok(())
    }
}

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// JavaScript binding for a helper directory name: separators start a new
/// camelCase word (`auth-v2` -> `authV2`), and a leading digit or a reserved
/// word gets a `_` prefix.
pub fn binding_name(name: &str) -> String {
    let mut binding = String::with_capacity(name.len());
    for (i, word) in name
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if i == 0 {
                binding.push(first);
            } else {
                binding.push(first.to_ascii_uppercase());
            }
            binding.extend(chars);
        }
    }
    let needs_prefix = binding.is_empty()
        || binding.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED_WORDS.contains(&binding.as_str());
    if needs_prefix {
        binding.insert(0, '_');
    }
    binding
}

/// Import and re-export line pair registering a helper in `helpers/index.js`.
pub fn aggregator_entry(name: &str) -> String {
    let binding = binding_name(name);
    format!("import {binding} from \"./{name}\";\nexport {{ {binding} }};\n")
}

pub fn placeholder_spec(name: &str) -> String {
    format!(
        "describe(\"{name}\", () => {{\n  it(\"should pass\", () => {{\n    expect(true).toBe(true);\n  }});\n}});\n"
    )
}
