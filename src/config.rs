//! Toolkit location and fixed file layout.
//!
//! The legacy bridge resolved its root from the environment at import time
//! and every operation read that ambient global. Here the root lives in an
//! explicit [`BoloConfig`] validated at construction; [`BoloConfig::from_env`]
//! exists as a convenience for callers keeping the old `BOLOPATH` contract,
//! but nothing reads the environment after construction.

use crate::errors::{BoloError, BoloResult};
use std::path::{Path, PathBuf};

/// Environment variable naming the toolkit root, honored by
/// [`BoloConfig::from_env`].
pub const ENV_ROOT: &str = "BOLOPATH";

// Relative paths under the toolkit root. These must match the compiled
// Fortran toolkit byte-for-byte.
const CODES_DIR: &str = "BCcodes";
const INPUT_FILE: &str = "input.sample";
const INPUT_FILE_ALL: &str = "input.sample.all";
const SELECTION_FILE: &str = "selectbc.data";
const OUTPUT_FILE: &str = "output.file.all";
const EXECUTABLE: &str = "./bcgo";
const LEGACY_ARG: &str = "0";

/// Which generation of the toolkit executable is installed.
///
/// Legacy builds take a single literal argument and read `input.sample`;
/// current builds take no arguments and read `input.sample.all`. Both write
/// their results to `output.file.all` and run from the codes directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolkitFlavor {
    Legacy,

    #[default]
    Current,
}

/// Validated toolkit location plus invocation flavor.
#[derive(Debug, Clone)]
pub struct BoloConfig {
    root: PathBuf,

    flavor: ToolkitFlavor,
}

impl BoloConfig {
    /// Build a config for a toolkit rooted at `root`.
    ///
    /// Fails with [`BoloError::Configuration`] unless `root` and
    /// `root/BCcodes` are existing directories.
    pub fn new(root: impl Into<PathBuf>) -> BoloResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(BoloError::configuration(format!(
                "toolkit root '{}' is not a directory",
                root.display()
            )));
        }
        if !root.join(CODES_DIR).is_dir() {
            return Err(BoloError::configuration(format!(
                "toolkit root '{}' has no {} directory",
                root.display(),
                CODES_DIR
            )));
        }
        Ok(Self {
            root,
            flavor: ToolkitFlavor::default(),
        })
    }

    /// Resolve the root from the `BOLOPATH` environment variable.
    ///
    /// A missing variable fails before any file is touched.
    pub fn from_env() -> BoloResult<Self> {
        let root = std::env::var(ENV_ROOT).map_err(|_| {
            BoloError::configuration(format!(
                "set {} to point at your compiled bolometric-corrections toolkit",
                ENV_ROOT
            ))
        })?;
        Self::new(root)
    }

    pub fn with_flavor(mut self, flavor: ToolkitFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn flavor(&self) -> ToolkitFlavor {
        self.flavor
    }

    /// Directory the external executable must run from.
    pub fn codes_dir(&self) -> PathBuf {
        self.root.join(CODES_DIR)
    }

    /// Star-parameter input file consumed by the active flavor.
    pub fn input_file(&self) -> PathBuf {
        match self.flavor {
            ToolkitFlavor::Legacy => self.codes_dir().join(INPUT_FILE),
            ToolkitFlavor::Current => self.codes_dir().join(INPUT_FILE_ALL),
        }
    }

    pub fn selection_file(&self) -> PathBuf {
        self.codes_dir().join(SELECTION_FILE)
    }

    pub fn output_file(&self) -> PathBuf {
        self.codes_dir().join(OUTPUT_FILE)
    }

    /// Executable path (relative to the codes directory) and arguments for
    /// the active flavor.
    pub fn invocation(&self) -> (PathBuf, Vec<String>) {
        match self.flavor {
            ToolkitFlavor::Legacy => (PathBuf::from(EXECUTABLE), vec![LEGACY_ARG.to_string()]),
            ToolkitFlavor::Current => (PathBuf::from(EXECUTABLE), Vec::new()),
        }
    }
}
