//! # Configuration Schema and Loading
//!
//! This module defines the data structures that represent the `repobot.yaml`
//! configuration file, as well as the logic for locating and parsing it.
//!
//! The schema is statically shaped: every option a repo set can carry is an
//! enumerated field on one of the structs below, and unknown keys are
//! rejected at load time (`deny_unknown_fields`) rather than silently
//! yielding an empty default at use time.
//!
//! ## Key Components
//!
//! - **`Config`**: the root configuration value, passed immutably to every
//!   component. `Config::load` either takes an explicit repo-set path or
//!   walks up parent directories from the working directory until it finds
//!   a `repobot.yaml`, mirroring how the tool is typically invoked from
//!   somewhere inside a managed checkout.
//! - **`PackagesConfig` / `RefsConfig`**: top-level package names, per-package
//!   ref overrides (a concrete ref, an explicit `null` for untracked
//!   working copies, or absent for default fallback), the ordered default
//!   ref list, names to ignore, and names assumed externally pre-satisfied.
//! - **`InheritConfig`**: base repo-set path and the refs that may be
//!   inherited from it.
//! - **`VcsConfig`**: URL templates and per-package URL overrides for the
//!   primary (git) and legacy (hg) backends, the list of packages still
//!   living in the legacy system, and the legacy ref-name translation table.
//! - **`RegistryConfig` / `BuildConfig`**: collaborator settings - the
//!   registry command, metapackage name, tags, version template, and the
//!   build-tool command.

use crate::error::{Error, Result};
use crate::vcs::VcsKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file marking a repo-set root.
pub const CONFIG_FILE: &str = "repobot.yaml";

/// Root configuration for one repo set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Repo-set root directory. Not part of the file; set by `load`.
    #[serde(skip)]
    pub path: PathBuf,

    /// Package selection and ref resolution options.
    pub packages: PackagesConfig,

    /// Optional inheritance from a separately resolved base repo set.
    #[serde(default)]
    pub inherit: Option<InheritConfig>,

    /// Version-control backend options.
    #[serde(default)]
    pub vcs: VcsConfig,

    /// Package-registry collaborator options.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Build-tool collaborator options.
    #[serde(default)]
    pub build: BuildConfig,
}

/// Package selection options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagesConfig {
    /// Top-level packages that seed transitive dependency discovery.
    pub top: Vec<String>,

    /// Ref override and fallback configuration.
    #[serde(default)]
    pub refs: RefsConfig,

    /// Dependency names dropped before traversal.
    #[serde(default)]
    pub ignore: BTreeSet<String>,

    /// Packages assumed already satisfied by the environment; never cloned
    /// or ordered.
    #[serde(default)]
    pub external: BTreeSet<String>,
}

/// Ref selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefsConfig {
    /// Per-package overrides. A string value pins the package to that ref
    /// with no fallback; an explicit `null` marks the package untracked
    /// (a manually managed working copy on which no VCS operation runs).
    #[serde(default)]
    pub overrides: BTreeMap<String, Option<String>>,

    /// Ordered fallback list tried for packages without an override.
    #[serde(default = "default_ref_list")]
    pub default: Vec<String>,
}

impl Default for RefsConfig {
    fn default() -> Self {
        Self {
            overrides: BTreeMap::new(),
            default: default_ref_list(),
        }
    }
}

fn default_ref_list() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

/// The override state of a single package, as read from `RefsConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefOverride<'a> {
    /// No override configured; the defaults list applies.
    Absent,
    /// Explicit `null`: the package is untracked.
    Untracked,
    /// Concrete pinned ref.
    Pinned(&'a str),
}

impl RefsConfig {
    /// Look up the override state for a package.
    pub fn override_for(&self, package: &str) -> RefOverride<'_> {
        match self.overrides.get(package) {
            None => RefOverride::Absent,
            Some(None) => RefOverride::Untracked,
            Some(Some(r)) => RefOverride::Pinned(r),
        }
    }
}

/// Inheritance options: borrow already-resolved packages from a base set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InheritConfig {
    /// Path of the base repo set, absolute or relative to the current
    /// repo-set root. It must already be resolved (its packages artifact
    /// must exist).
    pub base: PathBuf,

    /// Refs that may be inherited. A base package resolved to any other
    /// ref is never borrowed.
    #[serde(default)]
    pub refs: Vec<String>,
}

/// Version-control backend configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VcsConfig {
    /// Primary backend (git).
    #[serde(default)]
    pub git: VcsBackendConfig,

    /// Legacy backend (hg).
    #[serde(default)]
    pub hg: LegacyVcsConfig,
}

/// Options shared by both backends: where package sources live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VcsBackendConfig {
    /// URL template; `{pkg}` is replaced by the package name.
    #[serde(default)]
    pub url: String,

    /// Per-package URL overrides, consulted before the template.
    #[serde(default)]
    pub url_overrides: BTreeMap<String, String>,
}

/// Legacy-backend options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyVcsConfig {
    /// Packages whose source still lives in the legacy system.
    #[serde(default)]
    pub packages: BTreeSet<String>,

    /// URL template; `{pkg}` is replaced by the package name.
    #[serde(default)]
    pub url: String,

    /// Per-package URL overrides, consulted before the template.
    #[serde(default)]
    pub url_overrides: BTreeMap<String, String>,

    /// Ref-name spelling differences: a ref chosen by the resolver is
    /// translated through this table before the legacy checkout runs.
    /// The untranslated name is what gets recorded and serialized.
    #[serde(default)]
    pub ref_translation: BTreeMap<String, String>,
}

/// Package-registry collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Registry command to invoke.
    #[serde(default = "default_registry_command")]
    pub command: String,

    /// Metapackage name; also names the dependency-table artifact.
    #[serde(default = "default_meta_name")]
    pub meta: String,

    /// Tags assigned to every package after it is declared.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Version template; `{ref}` is replaced by the resolved ref.
    #[serde(default = "default_version_template")]
    pub version: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            command: default_registry_command(),
            meta: default_meta_name(),
            tags: Vec::new(),
            version: default_version_template(),
        }
    }
}

fn default_registry_command() -> String {
    "eups".to_string()
}

fn default_meta_name() -> String {
    "stack".to_string()
}

fn default_version_template() -> String {
    "{ref}".to_string()
}

impl RegistryConfig {
    /// Derive the registry version string for a resolved ref rendering.
    pub fn version_for(&self, ref_name: &str) -> String {
        self.version.replace("{ref}", ref_name)
    }
}

/// Build-tool collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Build command invoked in each package directory.
    #[serde(default = "default_build_command")]
    pub command: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: default_build_command(),
        }
    }
}

fn default_build_command() -> String {
    "scons".to_string()
}

impl Config {
    /// Load the configuration for a repo set.
    ///
    /// With an explicit `path` the file is read from `<path>/repobot.yaml`.
    /// Without one, parent directories are walked up from the working
    /// directory until a `repobot.yaml` is found.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let root = match path {
            Some(p) => p.to_path_buf(),
            None => find_root(&std::env::current_dir()?)?,
        };
        let file = root.join(CONFIG_FILE);
        let text = fs::read_to_string(&file).map_err(|err| Error::Config {
            message: format!("cannot read {}: {}", file.display(), err),
        })?;
        let mut config: Config = serde_yaml::from_str(&text)?;
        if config.packages.top.is_empty() {
            return Err(Error::Config {
                message: format!("packages.top is empty in {}", file.display()),
            });
        }
        config.path = root;
        Ok(config)
    }

    /// Which backend manages a package's source.
    pub fn vcs_kind(&self, package: &str) -> VcsKind {
        if self.vcs.hg.packages.contains(package) {
            VcsKind::Hg
        } else {
            VcsKind::Git
        }
    }

    /// Clone URL for a package: the per-package override if present,
    /// otherwise the backend's URL template with `{pkg}` substituted.
    pub fn url_for(&self, package: &str) -> Result<String> {
        let backend = match self.vcs_kind(package) {
            VcsKind::Git => (&self.vcs.git.url_overrides, &self.vcs.git.url),
            VcsKind::Hg => (&self.vcs.hg.url_overrides, &self.vcs.hg.url),
        };
        if let Some(url) = backend.0.get(package) {
            return Ok(url.clone());
        }
        if backend.1.is_empty() {
            return Err(Error::Config {
                message: format!("no VCS URL template configured for package '{}'", package),
            });
        }
        Ok(backend.1.replace("{pkg}", package))
    }

    /// Translate a ref name for checkout on a legacy-VCS package.
    ///
    /// Packages on the primary backend pass through unchanged.
    pub fn translate_ref<'a>(&'a self, package: &str, ref_name: &'a str) -> &'a str {
        if self.vcs.hg.packages.contains(package) {
            self.vcs
                .hg
                .ref_translation
                .get(ref_name)
                .map(String::as_str)
                .unwrap_or(ref_name)
        } else {
            ref_name
        }
    }
}

/// Walk up from `start` looking for a directory containing `repobot.yaml`.
fn find_root(start: &Path) -> Result<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if dir.join(CONFIG_FILE).exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(Error::Config {
                message: format!(
                    "no {} found in {} or any parent directory",
                    CONFIG_FILE,
                    start.display()
                ),
            });
        }
    }
}
