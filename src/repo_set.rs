//! # Repo-Set Resolver
//!
//! `RepoSet` is the orchestrator: starting from the configured top-level
//! packages it discovers the transitive dependency closure, acquires
//! sources through the VCS adapter, resolves refs, reconciles inheritance
//! against an optional base set, and topologically sorts the managed
//! packages. The batch operations (`build`, `declare`, `pull`, ...) then
//! walk that order.
//!
//! ## Discovery
//!
//! `sync` runs a FIFO worklist guarded by a visited set, so each package
//! name is processed at most once and termination is guaranteed. For each
//! package it:
//!
//! 1. ensures a local source exists - an already-present directory is
//!    optionally fetched, an absent one is satisfied by an inheritance
//!    link or a clone. A failed clone reclassifies the package as
//!    *external* (assumed pre-satisfied by the environment) and drops it
//!    and every edge pointing at it from the graph under construction;
//! 2. resolves and checks out its ref, recording the result;
//! 3. reads its immediate dependencies and enqueues the unvisited ones,
//!    dropping ignored names and stopping at configured externals.
//!
//! A package is *required-external* if some non-optional edge chain from a
//! top package reaches it, otherwise *optional-external*. Dependencies of
//! external packages are never traversed. Diamonds are fine; cycles are
//! detected by the sort step and are fatal.
//!
//! Everything is single-threaded and blocking; the only state is the
//! `RepoSet` being built, and results are published (fields assigned,
//! artifacts written) only after the whole resolution succeeded. A failure
//! partway through leaves some checkouts updated and others not - there is
//! no rollback - but never a half-written artifact.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::builder::{BuildTool, CommandBuildTool};
use crate::config::{Config, RefOverride};
use crate::deps::{DependencyReader, TableReader};
use crate::error::{Error, Result};
use crate::inherit::{self, BaseSet};
use crate::manifest::{self, ListEntry};
use crate::refs::{self, RefValue};
use crate::registry::{CommandRegistry, PackageRegistry};
use crate::vcs::{self, GitVcs, HgVcs, Vcs, VcsKind};

/// Optional steps run by `sync` after a successful resolution.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Fetch new refs into already-present checkouts before checking out.
    pub fetch: bool,
    /// Declare resolved packages to the registry.
    pub declare: bool,
    /// Write the metapackage dependency table.
    pub write_table: bool,
    /// Write the packages-list artifact.
    pub write_list: bool,
    /// Pull the latest changes into every managed checkout.
    pub pull: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            fetch: false,
            declare: true,
            write_table: true,
            write_list: true,
            pull: false,
        }
    }
}

/// How a package's source was satisfied during discovery.
enum Acquisition {
    /// Directory already existed.
    Present,
    /// Freshly cloned.
    Cloned,
    /// Satisfied by a link into the base set, pinned to the carried ref.
    Inherited(String),
    /// No source available; treat as external.
    Unavailable,
}

/// The resolved collection of packages for one configuration root.
pub struct RepoSet {
    config: Config,
    git: Box<dyn Vcs>,
    hg: Box<dyn Vcs>,
    deps: Box<dyn DependencyReader>,
    registry: Box<dyn PackageRegistry>,
    builder: Box<dyn BuildTool>,
    /// Managed packages in dependency order.
    packages: Vec<String>,
    refs: BTreeMap<String, RefValue>,
    /// Discovered external packages, mapped to their required flag.
    external: BTreeMap<String, bool>,
    inherited: BTreeSet<String>,
}

impl RepoSet {
    /// Create a repo set with the default collaborators: the system `git`
    /// and `hg` commands, table-file dependency metadata, and the
    /// configured registry and build commands.
    pub fn new(config: Config) -> Self {
        let registry = CommandRegistry::new(config.registry.command.clone());
        let builder = CommandBuildTool::new(config.build.command.clone());
        Self::with_collaborators(
            config,
            Box::new(GitVcs),
            Box::new(HgVcs),
            Box::new(TableReader),
            Box::new(registry),
            Box::new(builder),
        )
    }

    /// Create a repo set with explicit collaborator implementations.
    ///
    /// This is how tests inject mocks, and how embedders can substitute
    /// their own backends.
    pub fn with_collaborators(
        config: Config,
        git: Box<dyn Vcs>,
        hg: Box<dyn Vcs>,
        deps: Box<dyn DependencyReader>,
        registry: Box<dyn PackageRegistry>,
        builder: Box<dyn BuildTool>,
    ) -> Self {
        Self {
            config,
            git,
            hg,
            deps,
            registry,
            builder,
            packages: Vec::new(),
            refs: BTreeMap::new(),
            external: BTreeMap::new(),
            inherited: BTreeSet::new(),
        }
    }

    /// Managed packages in dependency order.
    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    /// Resolved refs of the managed packages.
    pub fn refs(&self) -> &BTreeMap<String, RefValue> {
        &self.refs
    }

    /// Discovered external packages and their required flags.
    pub fn external(&self) -> &BTreeMap<String, bool> {
        &self.external
    }

    /// Packages satisfied from the inheritance base.
    pub fn inherited(&self) -> &BTreeSet<String> {
        &self.inherited
    }

    /// The checkout directory of a managed package.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.config.path.join(package)
    }

    fn vcs_for(&self, package: &str) -> &dyn Vcs {
        match self.config.vcs_kind(package) {
            VcsKind::Git => self.git.as_ref(),
            VcsKind::Hg => self.hg.as_ref(),
        }
    }

    fn is_untracked(&self, package: &str) -> bool {
        matches!(self.refs.get(package), Some(RefValue::Untracked))
    }

    /// Clone and/or checkout repositories to match the configured package
    /// list, then run the requested follow-up steps.
    ///
    /// This rebuilds the whole repo set from scratch; re-running against
    /// unchanged upstream sources converges on an identical artifact.
    pub fn sync(&mut self, options: &SyncOptions) -> Result<()> {
        let base = match &self.config.inherit {
            Some(inherit_config) => {
                let base_path = if inherit_config.base.is_absolute() {
                    inherit_config.base.clone()
                } else {
                    self.config.path.join(&inherit_config.base)
                };
                Some(BaseSet::load(&base_path)?)
            }
            None => None,
        };

        let mut all_external = self.config.packages.external.clone();
        let mut todo: VecDeque<String> = self.config.packages.top.iter().cloned().collect();
        let mut done: BTreeSet<String> = BTreeSet::new();
        let mut required: BTreeSet<String> = self.config.packages.top.iter().cloned().collect();
        let mut external: BTreeSet<String> = BTreeSet::new();
        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut inherited: BTreeSet<String> = BTreeSet::new();
        let mut refs: BTreeMap<String, RefValue> = BTreeMap::new();

        while let Some(pkg) = todo.pop_front() {
            if !done.insert(pkg.clone()) {
                continue;
            }
            match self.ensure_source(&pkg, options.fetch, base.as_ref())? {
                Acquisition::Unavailable => {
                    dependencies.remove(&pkg);
                    for deps in dependencies.values_mut() {
                        deps.remove(&pkg);
                    }
                    all_external.insert(pkg.clone());
                    external.insert(pkg);
                    continue;
                }
                Acquisition::Inherited(ref_name) => {
                    inherited.insert(pkg.clone());
                    refs.insert(pkg.clone(), RefValue::Named(ref_name));
                }
                Acquisition::Present | Acquisition::Cloned => {
                    let resolved = refs::resolve_ref(
                        self.vcs_for(&pkg),
                        &self.config,
                        &pkg,
                        &self.package_dir(&pkg),
                    )?;
                    refs.insert(pkg.clone(), resolved);
                }
            }
            let pkg_deps = self.deps.read(&self.package_dir(&pkg), &pkg)?;
            let edges = dependencies.entry(pkg.clone()).or_default();
            for dep in pkg_deps {
                if !dep.optional {
                    required.insert(dep.name.clone());
                }
                if all_external.contains(&dep.name) {
                    external.insert(dep.name.clone());
                    continue;
                }
                if self.config.packages.ignore.contains(&dep.name) {
                    continue;
                }
                edges.insert(dep.name.clone());
                if !done.contains(&dep.name) {
                    todo.push_back(dep.name.clone());
                }
            }
        }

        if base.is_some() {
            for pkg in inherit::confirm(&mut inherited, &dependencies) {
                info!("Package '{}' cannot be inherited; cloning fresh.", pkg);
                self.clone_disqualified(&pkg, &refs)?;
            }
        }

        self.packages = crate::topo::sorted_packages(&dependencies)?;
        self.external = external
            .into_iter()
            .map(|pkg| {
                let is_required = required.contains(&pkg);
                (pkg, is_required)
            })
            .collect();
        self.inherited = inherited;
        self.refs = refs;

        if options.declare {
            self.declare()?;
        }
        if options.write_table {
            self.write_table()?;
        }
        if options.write_list {
            self.write_list()?;
        }
        if options.pull {
            self.pull()?;
        }
        Ok(())
    }

    /// Worker for `sync`: make sure a package's source exists locally.
    fn ensure_source(
        &self,
        package: &str,
        fetch: bool,
        base: Option<&BaseSet>,
    ) -> Result<Acquisition> {
        let dir = self.package_dir(package);

        // A symlink is a speculative inheritance link from an earlier
        // resolution: keep it only while inheritance still qualifies.
        let is_link = dir
            .symlink_metadata()
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_link {
            if let Some(base) = base {
                if let Some(ref_name) = inherit::inheritable_ref(base, &self.config, package) {
                    // The link must target this base set; a link left over
                    // from a previous base would keep reading the wrong
                    // checkout under the new base's recorded ref.
                    let target = fs::read_link(&dir)?;
                    if target == base.package_dir(package) {
                        info!(
                            "Package '{}' stays inherited at ref '{}'.",
                            package, ref_name
                        );
                        return Ok(Acquisition::Inherited(ref_name));
                    }
                }
            }
            info!("Dropping stale inheritance link for '{}'.", package);
            fs::remove_file(&dir)?;
        }

        if dir.is_dir() {
            if fetch {
                if let RefOverride::Untracked = self.config.packages.refs.override_for(package) {
                    info!("Not fetching untracked package '{}'.", package);
                } else {
                    info!("Fetching (but not merging) '{}'.", package);
                    self.vcs_for(package).fetch(&dir)?;
                }
            }
            return Ok(Acquisition::Present);
        }

        if let RefOverride::Untracked = self.config.packages.refs.override_for(package) {
            info!(
                "Unmanaged source for '{}' not found; treating as external.",
                package
            );
            return Ok(Acquisition::Unavailable);
        }

        if let Some(base) = base {
            if let Some(ref_name) = inherit::inheritable_ref(base, &self.config, package) {
                let source = base.package_dir(package);
                if source.is_dir() {
                    info!(
                        "Inheriting '{}' at ref '{}' from {}.",
                        package,
                        ref_name,
                        base.path().display()
                    );
                    vcs::link(&source, &dir)?;
                    return Ok(Acquisition::Inherited(ref_name));
                }
            }
        }

        let url = self.config.url_for(package)?;
        info!("Cloning '{}'.", package);
        match self.vcs_for(package).clone_repo(&url, &dir) {
            Ok(()) => Ok(Acquisition::Cloned),
            Err(err) => {
                info!(
                    "Source at '{}' not available ({}); treating as external.",
                    url, err
                );
                Ok(Acquisition::Unavailable)
            }
        }
    }

    /// Replace a disqualified package's inheritance link with a fresh
    /// clone pinned to the ref its dependency edges were read at.
    ///
    /// The policy is clone fresh, never fetch-then-clone: the link never
    /// was a real local checkout, so there is nothing to update in place.
    fn clone_disqualified(&self, package: &str, refs: &BTreeMap<String, RefValue>) -> Result<()> {
        let dir = self.package_dir(package);
        if dir.symlink_metadata().is_ok() {
            fs::remove_file(&dir)?;
        }
        let url = self.config.url_for(package)?;
        self.vcs_for(package).clone_repo(&url, &dir)?;
        let ref_name = refs
            .get(package)
            .and_then(|r| r.name())
            .ok_or_else(|| Error::Config {
                message: format!("no resolved ref recorded for '{}'", package),
            })?;
        self.vcs_for(package)
            .checkout(&dir, self.config.translate_ref(package, ref_name))?;
        Ok(())
    }

    /// Read the packages artifact into this repo set, allowing the batch
    /// operations to run without a sync.
    pub fn read_list(&mut self) -> Result<()> {
        let entries = manifest::read_list(&self.config.path)?;
        self.packages = entries.iter().map(|entry| entry.name.clone()).collect();
        self.refs = entries
            .iter()
            .map(|entry| (entry.name.clone(), entry.r#ref.clone()))
            .collect();
        self.inherited = entries
            .iter()
            .filter(|entry| entry.inherited)
            .map(|entry| entry.name.clone())
            .collect();
        self.external.clear();
        Ok(())
    }

    /// Write the packages-list artifact in dependency order.
    pub fn write_list(&self) -> Result<()> {
        let mut entries = Vec::with_capacity(self.packages.len());
        for pkg in &self.packages {
            entries.push(ListEntry {
                name: pkg.clone(),
                r#ref: self.resolved_ref(pkg)?.clone(),
                inherited: self.inherited.contains(pkg),
            });
        }
        manifest::write_list(&self.config.path, &entries)
    }

    /// Write the metapackage dependency table.
    pub fn write_table(&self) -> Result<()> {
        let mut managed = Vec::with_capacity(self.packages.len());
        for pkg in &self.packages {
            managed.push((pkg.clone(), self.version_for(pkg)?));
        }
        manifest::write_table(
            &self.config.path,
            &self.config.registry.meta,
            &self.external,
            &managed,
        )
    }

    /// Declare all managed packages to the registry in dependency order.
    ///
    /// Inherited packages were declared by the base set already and only
    /// get the configured tags assigned.
    pub fn declare(&self) -> Result<()> {
        for pkg in &self.packages {
            let version = self.version_for(pkg)?;
            if self.inherited.contains(pkg) {
                info!("Tagging inherited {} {}.", pkg, version);
            } else {
                info!("Declaring {} {}.", pkg, version);
                self.registry.declare(pkg, &version, &self.package_dir(pkg))?;
            }
            for tag in &self.config.registry.tags {
                self.registry.assign_tag(tag, pkg, &version)?;
            }
        }
        Ok(())
    }

    /// Undeclare all managed, non-inherited packages from the registry.
    pub fn undeclare(&self) -> Result<()> {
        for pkg in &self.packages {
            if self.inherited.contains(pkg) {
                info!("Skipping inherited package '{}'...", pkg);
                continue;
            }
            let version = self.version_for(pkg)?;
            info!("Undeclaring {} {}.", pkg, version);
            self.registry.undeclare(pkg, &version)?;
        }
        Ok(())
    }

    /// Build all managed packages in dependency order. They must already
    /// be set up.
    pub fn build(&self, args: &[String], skip_inherited: bool, ignore_failed: bool) -> Result<()> {
        for pkg in &self.packages {
            if skip_inherited && self.inherited.contains(pkg) {
                info!("Skipping inherited package '{}'...", pkg);
                continue;
            }
            info!("Building '{}'...", pkg);
            match self.builder.run(&self.package_dir(pkg), args) {
                Err(err) if ignore_failed => {
                    warn!("Build failure on '{}'; continuing: {}", pkg, err);
                }
                result => result?,
            }
        }
        Ok(())
    }

    /// Pull the latest changes into every managed checkout.
    ///
    /// Untracked working copies are left alone, and inherited links are
    /// skipped so the base set is never touched through them.
    pub fn pull(&self) -> Result<()> {
        for pkg in &self.packages {
            if self.is_untracked(pkg) {
                info!("Skipping untracked package '{}'...", pkg);
            } else if self.inherited.contains(pkg) {
                info!("Skipping inherited package '{}'...", pkg);
            } else {
                info!("Pulling changes for '{}'.", pkg);
                self.vcs_for(pkg).run(&self.package_dir(pkg), &["pull"])?;
            }
        }
        Ok(())
    }

    /// Run the same VCS command in each managed checkout, substituting
    /// `{pkg}` in the arguments with the package name.
    pub fn run_each(&self, args: &[String], ignore_failed: bool) -> Result<()> {
        for pkg in &self.packages {
            if self.is_untracked(pkg) || self.inherited.contains(pkg) {
                info!("Skipping package '{}'...", pkg);
                continue;
            }
            info!("Processing '{}'...", pkg);
            let expanded: Vec<String> = args.iter().map(|arg| arg.replace("{pkg}", pkg)).collect();
            let arg_refs: Vec<&str> = expanded.iter().map(String::as_str).collect();
            match self.vcs_for(pkg).run(&self.package_dir(pkg), &arg_refs) {
                Err(err) if ignore_failed => {
                    info!("Failure on '{}'; continuing: {}", pkg, err);
                }
                result => result?,
            }
        }
        Ok(())
    }

    fn resolved_ref(&self, package: &str) -> Result<&RefValue> {
        self.refs.get(package).ok_or_else(|| Error::Config {
            message: format!("no resolved ref recorded for '{}'", package),
        })
    }

    fn version_for(&self, package: &str) -> Result<String> {
        let r = self.resolved_ref(package)?;
        Ok(self.config.registry.version_for(&r.to_string()))
    }
}
