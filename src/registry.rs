//! # Package-Registry Collaborator
//!
//! The registry is where resolved packages get declared so the rest of the
//! toolchain can set them up. The core needs exactly three operations:
//! declare a concrete build, undeclare it, and assign a symbolic tag to a
//! declared version. Managed non-inherited packages get declare + tags in
//! topological order; inherited packages get tags only, since the base set
//! already declared them.
//!
//! `CommandRegistry` shells out to the configured registry command
//! (`eups` by default). The trait exists so the resolver's batch
//! operations can be tested without a registry installed.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Trait for package-registry operations - allows mocking in tests.
pub trait PackageRegistry: Send + Sync {
    /// Register a concrete package build rooted at `dir`.
    fn declare(&self, package: &str, version: &str, dir: &Path) -> Result<()>;

    /// Remove a previously declared package build.
    fn undeclare(&self, package: &str, version: &str) -> Result<()>;

    /// Mark a declared package version as selected by a symbolic tag.
    fn assign_tag(&self, tag: &str, package: &str, version: &str) -> Result<()>;
}

/// Registry backed by an external command.
pub struct CommandRegistry {
    command: String,
}

impl CommandRegistry {
    pub fn new(command: String) -> Self {
        Self { command }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        let command = format!("{} {}", self.command, args.join(" "));
        debug!("Running '{}'.", command);
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .map_err(|err| Error::RegistryCommand {
                command: command.clone(),
                stderr: err.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::RegistryCommand {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl PackageRegistry for CommandRegistry {
    fn declare(&self, package: &str, version: &str, dir: &Path) -> Result<()> {
        let dir = dir.display().to_string();
        self.run(&["declare", "-r", &dir, package, version])
    }

    fn undeclare(&self, package: &str, version: &str) -> Result<()> {
        self.run(&["undeclare", package, version])
    }

    fn assign_tag(&self, tag: &str, package: &str, version: &str) -> Result<()> {
        self.run(&["declare", "-t", tag, package, version])
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every registry call for later assertion.
    #[derive(Default)]
    pub struct MockRegistry {
        pub calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockRegistry {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl PackageRegistry for MockRegistry {
        fn declare(&self, package: &str, version: &str, _dir: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("declare {} {}", package, version));
            Ok(())
        }

        fn undeclare(&self, package: &str, version: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("undeclare {} {}", package, version));
            Ok(())
        }

        fn assign_tag(&self, tag: &str, package: &str, version: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("tag {} {} {}", tag, package, version));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_command_registry_success() {
        // `true` swallows any arguments and exits zero.
        let registry = CommandRegistry::new("true".to_string());
        registry
            .declare("afw", "main", &PathBuf::from("/stack/afw"))
            .unwrap();
        registry.assign_tag("current", "afw", "main").unwrap();
        registry.undeclare("afw", "main").unwrap();
    }

    #[test]
    fn test_command_registry_failure() {
        let registry = CommandRegistry::new("false".to_string());
        let err = registry
            .declare("afw", "main", &PathBuf::from("/stack/afw"))
            .unwrap_err();
        match err {
            Error::RegistryCommand { command, .. } => {
                assert!(command.contains("declare"));
                assert!(command.contains("afw"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_command_registry_missing_command() {
        let registry = CommandRegistry::new("repobot-no-such-registry".to_string());
        let err = registry.undeclare("afw", "main").unwrap_err();
        assert!(matches!(err, Error::RegistryCommand { .. }));
    }
}
