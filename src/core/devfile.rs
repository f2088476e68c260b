// src/core/devfile.rs

//! # Devfile
//!
//! A `devfile.toml` declares named operations: a script body plus the options and variables it
//! runs with. The file is discovered by walking up from the working directory, the same way a
//! project root is found.

use crate::models::{ExecutionRequest, OpOption};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures while finding, reading or querying a devfile.
#[derive(Error, Debug)]
pub enum DevfileError {
    /// No devfile in the start directory or above it.
    #[error("No '{name}' found in '{start}' or any of its parents.")]
    NotFound {
        /// File name searched for.
        name: String,
        /// Directory the search started in.
        start: String,
    },
    /// The devfile could not be read.
    #[error("Could not read devfile '{path}': {source}")]
    Read {
        /// Path of the devfile.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The devfile is not valid.
    #[error("Failed to parse devfile '{path}': {source}")]
    Parse {
        /// Path of the devfile.
        path: String,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// The requested operation does not exist.
    #[error("Operation '{name}' is not defined in '{path}'.")]
    UnknownOperation {
        /// Requested operation name.
        name: String,
        /// Path of the devfile.
        path: String,
    },
}

/// One named operation of a devfile.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Operation {
    /// Shown by `dev list`.
    #[serde(default)]
    pub description: Option<String>,
    /// Script text, usually a multi-line TOML string.
    pub script: String,
    /// Options always applied to this operation.
    #[serde(default)]
    pub options: BTreeSet<OpOption>,
    /// Default variables. Command-line assignments override them.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl Operation {
    /// The execution request this operation describes on its own, before CLI overrides.
    pub fn to_request(&self) -> ExecutionRequest {
        ExecutionRequest {
            script: self.script.clone(),
            options: self.options.clone(),
            variables: self.variables.clone(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct DevfileDefinition {
    #[serde(default)]
    operations: BTreeMap<String, Operation>,
}

/// A parsed devfile. The only way to obtain one is to parse it from disk.
#[derive(Debug)]
pub struct Devfile {
    path: PathBuf,
    definition: DevfileDefinition,
}

impl Devfile {
    /// Finds `name` in `start` or the closest ancestor that contains it.
    pub fn locate(start: &Path, name: &str) -> Result<PathBuf, DevfileError> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| DevfileError::NotFound {
                name: name.to_string(),
                start: start.display().to_string(),
            })
    }

    /// Locates and parses the devfile governing `start`.
    pub fn load(start: &Path, name: &str) -> Result<Self, DevfileError> {
        let path = Self::locate(start, name)?;
        Self::parse_file(&path)
    }

    /// Parses the devfile at `path`.
    pub fn parse_file(path: &Path) -> Result<Self, DevfileError> {
        let read_error = |source| DevfileError::Read {
            path: path.display().to_string(),
            source,
        };
        let absolute = dunce::canonicalize(path).map_err(read_error)?;
        let content = fs::read_to_string(&absolute).map_err(read_error)?;

        let definition: DevfileDefinition =
            toml::from_str(&content).map_err(|source| DevfileError::Parse {
                path: absolute.display().to_string(),
                source,
            })?;
        log::debug!(
            "Loaded devfile '{}' with {} operation(s)",
            absolute.display(),
            definition.operations.len()
        );

        Ok(Self {
            path: absolute,
            definition,
        })
    }

    /// Canonical path of the parsed file.
    pub fn absolute_path(&self) -> &Path {
        &self.path
    }

    /// All operations, sorted by name.
    pub fn operations(&self) -> &BTreeMap<String, Operation> {
        &self.definition.operations
    }

    /// Looks up an operation by name.
    pub fn operation(&self, name: &str) -> Result<&Operation, DevfileError> {
        self.definition
            .operations
            .get(name)
            .ok_or_else(|| DevfileError::UnknownOperation {
                name: name.to_string(),
                path: self.path.display().to_string(),
            })
    }

    /// Starter content written by `dev init`.
    pub fn template() -> &'static str {
        r#"# Operations run with `dev <name> [key=value ...]`.
# Every variable is visible to the script as DEV_<KEY>.

[operations.hello]
description = "Print a greeting"
script = """
echo "Hello, ${DEV_NAME:-world}!"
"""
variables = { name = "devfile" }

[operations.clean]
description = "Remove build output quietly"
script = "rm -rf target"
options = ["quiet"]
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_locate_walks_up_to_parents() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.path().join("devfile.toml"), "").unwrap();

        let found = Devfile::locate(&nested, "devfile.toml").unwrap();
        assert_eq!(found, root.path().join("devfile.toml"));
    }

    #[test]
    fn test_locate_reports_missing_file() {
        let root = tempdir().unwrap();
        let err = Devfile::locate(root.path(), "no-such-devfile.toml").unwrap_err();
        assert!(matches!(err, DevfileError::NotFound { .. }));
    }

    #[test]
    fn test_parse_operations() {
        let root = tempdir().unwrap();
        let path = root.path().join("devfile.toml");
        fs::write(
            &path,
            r#"
[operations.build]
description = "Build it"
script = "cargo build"
options = ["quiet", "windows-fs"]
variables = { profile = "dev" }
"#,
        )
        .unwrap();

        let devfile = Devfile::parse_file(&path).unwrap();
        assert!(devfile.absolute_path().is_absolute());

        let build = devfile.operation("build").unwrap();
        assert_eq!(build.description.as_deref(), Some("Build it"));

        let request = build.to_request();
        assert_eq!(request.script, "cargo build");
        assert!(request.has(OpOption::Quiet));
        assert!(request.has(OpOption::WindowsFsBridge));
        assert!(!request.has(OpOption::Keep));
        assert_eq!(request.variables.get("profile").map(String::as_str), Some("dev"));
    }

    #[test]
    fn test_unknown_operation() {
        let root = tempdir().unwrap();
        let path = root.path().join("devfile.toml");
        fs::write(&path, "[operations.a]\nscript = \"true\"\n").unwrap();

        let devfile = Devfile::parse_file(&path).unwrap();
        let err = devfile.operation("b").unwrap_err();
        assert!(matches!(err, DevfileError::UnknownOperation { .. }));
    }

    #[test]
    fn test_parse_error_names_file() {
        let root = tempdir().unwrap();
        let path = root.path().join("devfile.toml");
        fs::write(&path, "[operations.a]\noptions = [\"loud\"]\n").unwrap();

        let err = Devfile::parse_file(&path).unwrap_err();
        assert!(matches!(err, DevfileError::Parse { .. }));
        assert!(err.to_string().contains("devfile.toml"));
    }

    #[test]
    fn test_template_parses() {
        let root = tempdir().unwrap();
        let path = root.path().join("devfile.toml");
        fs::write(&path, Devfile::template()).unwrap();

        let devfile = Devfile::parse_file(&path).unwrap();
        assert_eq!(
            devfile.operations().keys().collect::<Vec<_>>(),
            vec!["clean", "hello"]
        );
    }
}
