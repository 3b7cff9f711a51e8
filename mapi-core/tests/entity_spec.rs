use std::fs;
use std::path::Path;

use mapi_core::config::PackageManagerSettings;
use mapi_core::package_manager::{Invocation, RecordingPackageManager, SystemPackageManager};
use mapi_core::prompt::Scripted;
use mapi_core::{Deletion, EntityKind, EntityManager, MapiError, MemoryStore};
use speculate2::speculate;
use walkdir::WalkDir;

const EMPTY_DEFAULT_EXPORT: &str = "export default {};";

/// Relative paths of everything below `dir`, sorted.
fn tree(dir: &Path) -> Vec<String> {
    let mut entries: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .expect("entry below dir")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    entries.sort();
    entries
}

fn scaffold_root(root: &Path) {
    for dir in ["features", "helpers", "__test__"] {
        fs::create_dir(root.join(dir)).expect("Failed to create parent dir");
    }
}

speculate! {
    before {
        let root_dir = tempfile::tempdir().expect("Failed to create root");
        let root = root_dir.path().to_path_buf();
        scaffold_root(&root);
        let store = MemoryStore::with_root(&root);
        let packages = RecordingPackageManager::default();
        let confirm = Scripted::default();
        let manager = EntityManager::new(&store, &packages, &confirm);
    }

    describe "create" {
        it "scaffolds a feature with every layer" {
            let target = manager.create(EntityKind::Feature, "billing").expect("Failed to create feature");

            assert_eq!(target, root.join("features").join("billing"));
            assert_eq!(tree(&target), vec![
                "controllers",
                "controllers/index.js",
                "dataAccess",
                "dataAccess/index.js",
                "db",
                "db/index.js",
                "db/schema.js",
                "index.js",
                "router",
                "router/index.js",
                "useCases",
                "useCases/index.js",
            ]);
            for file in ["index.js", "db/schema.js", "controllers/index.js", "db/index.js",
                         "useCases/index.js", "dataAccess/index.js", "router/index.js"] {
                let contents = fs::read_to_string(target.join(file)).expect("Failed to read file");
                assert_eq!(contents, EMPTY_DEFAULT_EXPORT, "{file}");
            }
        }

        it "registers a helper in the aggregator" {
            manager.create(EntityKind::Helper, "format").expect("Failed to create helper");
            manager.create(EntityKind::Helper, "clock").expect("Failed to create helper");

            let helper = fs::read_to_string(root.join("helpers/format/index.js")).expect("Failed to read helper");
            assert_eq!(helper, EMPTY_DEFAULT_EXPORT);

            let aggregator = fs::read_to_string(root.join("helpers/index.js")).expect("Failed to read aggregator");
            assert_eq!(
                aggregator,
                "import format from \"./format\";\nexport { format };\n\
                 import clock from \"./clock\";\nexport { clock };\n"
            );
        }

        it "derives a camelCase binding for a hyphenated helper" {
            let target = manager.create(EntityKind::Helper, "auth-v2").expect("Failed to create helper");

            assert_eq!(target, root.join("helpers").join("auth-v2"));
            let aggregator = fs::read_to_string(root.join("helpers/index.js")).expect("Failed to read aggregator");
            assert_eq!(aggregator, "import authV2 from \"./auth-v2\";\nexport { authV2 };\n");
        }

        it "writes a placeholder spec for a test scenario" {
            let target = manager.create(EntityKind::TestScenario, "login").expect("Failed to create test");

            assert_eq!(tree(&target), vec!["login.spec.js"]);
            let spec = fs::read_to_string(target.join("login.spec.js")).expect("Failed to read spec");
            assert_eq!(
                spec,
                "describe(\"login\", () => {\n  it(\"should pass\", () => {\n    expect(true).toBe(true);\n  });\n});\n"
            );
        }

        it "initializes a project and runs the package manager inside it" {
            let target = manager.create(EntityKind::Project, "api").expect("Failed to init project");

            assert_eq!(target, root.join("api"));
            assert_eq!(*packages.calls.borrow(), vec![
                Invocation::InitManifest(target.clone()),
                Invocation::InstallTestFramework(target.clone()),
            ]);
            for dir in ["__test__", "config", "features", "helpers", "middleware"] {
                assert!(target.join(dir).is_dir(), "{dir}");
            }
            let expected = [
                (".babelrc", "{}"),
                ("eslintrc.js", "module.exports = {}"),
                (".env", ""),
                ("index.js", "console.log(\"Hello World\");"),
                ("jest.config.js", "module.exports = {}"),
                ("jest.setup.js", ""),
            ];
            for (file, contents) in expected {
                assert_eq!(fs::read_to_string(target.join(file)).expect("Failed to read file"), contents, "{file}");
            }
        }

        it "initializes a project even when the package manager cannot run" {
            let missing_tool = SystemPackageManager::new(&PackageManagerSettings {
                program: "definitely-not-a-package-manager".to_string(),
                test_framework: "jest".to_string(),
            });
            let manager = EntityManager::new(&store, &missing_tool, &confirm);

            let target = manager.create(EntityKind::Project, "api").expect("Failed to init project");

            assert_eq!(tree(&target), vec![
                ".babelrc",
                ".env",
                "__test__",
                "config",
                "eslintrc.js",
                "features",
                "helpers",
                "index.js",
                "jest.config.js",
                "jest.setup.js",
                "middleware",
            ]);
        }

        it "leaves an existing entity untouched" {
            let existing = root.join("features").join("billing");
            fs::create_dir(&existing).expect("Failed to create dir");
            fs::write(existing.join("keep.txt"), "mine").expect("Failed to write file");
            let snapshot = tree(&root);

            let err = manager.create(EntityKind::Feature, "billing").unwrap_err();

            assert!(matches!(err, MapiError::AlreadyExists { kind: EntityKind::Feature, ref name } if name == "billing"));
            assert_eq!(err.to_string(), "Feature billing already exists");
            assert_eq!(tree(&root), snapshot);
        }

        it "does not run the package manager for an existing project" {
            fs::create_dir(root.join("api")).expect("Failed to create dir");

            assert!(manager.create(EntityKind::Project, "api").is_err());
            assert!(packages.calls.borrow().is_empty());
        }

        it "rejects names that would escape the parent directory" {
            let snapshot = tree(&root);
            let err = manager.create(EntityKind::Feature, "../escape").unwrap_err();

            assert!(matches!(err, MapiError::InvalidName(_)));
            assert_eq!(tree(&root), snapshot);
        }

        it "reports an I/O error when the parent directory is missing" {
            fs::remove_dir(root.join("features")).expect("Failed to remove dir");

            let err = manager.create(EntityKind::Feature, "billing").unwrap_err();
            assert!(matches!(err, MapiError::Io { .. }));
            assert_eq!(err.exit_code(), 1);
        }

        it "requires a configured root" {
            let unconfigured = MemoryStore::new();
            let manager = EntityManager::new(&unconfigured, &packages, &confirm);

            assert!(matches!(manager.create(EntityKind::Helper, "format"), Err(MapiError::NotConfigured)));
        }
    }

    describe "delete" {
        it "removes a feature after confirmation" {
            let confirm = Scripted::new(["yes"]);
            let manager = EntityManager::new(&store, &packages, &confirm);
            manager.create(EntityKind::Feature, "billing").expect("Failed to create feature");

            assert_eq!(manager.delete(EntityKind::Feature, "billing").expect("Failed to delete"), Deletion::Removed);
            assert!(!root.join("features/billing").exists());
            assert_eq!(
                *confirm.questions.borrow(),
                vec!["Are you sure you want to delete the feature billing? (yes/no) ".to_string()]
            );
        }

        it "keeps everything for any answer other than yes" {
            for answer in ["no", "Yes", "YES", "y", ""] {
                let confirm = Scripted::new([answer]);
                let manager = EntityManager::new(&store, &packages, &confirm);
                fs::create_dir_all(root.join("helpers/format")).expect("Failed to create dir");
                let snapshot = tree(&root);

                assert_eq!(manager.delete(EntityKind::Helper, "format").expect("Failed to delete"), Deletion::Cancelled);
                assert_eq!(manager.delete_project().expect("Failed to delete"), Deletion::Cancelled);
                assert_eq!(tree(&root), snapshot, "{answer:?}");
            }
        }

        it "reports a missing feature without touching the tree" {
            let confirm = Scripted::new(["yes"]);
            let manager = EntityManager::new(&store, &packages, &confirm);
            let snapshot = tree(&root);

            assert_eq!(manager.delete(EntityKind::Feature, "ghost").expect("Failed to delete"), Deletion::Missing);
            assert_eq!(tree(&root), snapshot);
        }

        it "removes the whole configured root for a project" {
            let confirm = Scripted::new(["yes"]);
            let manager = EntityManager::new(&store, &packages, &confirm);

            assert_eq!(manager.delete_project().expect("Failed to delete"), Deletion::Removed);
            assert!(!root.exists());
        }

        it "validates the name before asking" {
            let confirm = Scripted::new(["yes"]);
            let manager = EntityManager::new(&store, &packages, &confirm);

            assert!(matches!(manager.delete(EntityKind::Helper, ".."), Err(MapiError::InvalidName(_))));
            assert!(confirm.questions.borrow().is_empty());
            assert!(root.join("helpers").exists());
        }
    }
}
