//! # Build-Tool Collaborator
//!
//! Building a package means running the configured build command
//! (`scons` by default) in its checkout directory with whatever extra
//! arguments the user passed through. The packages must already be set up;
//! repobot only sequences the invocations in dependency order.
//!
//! The trait exists so batch builds can be tested without a build tool
//! installed.

use std::path::Path;
use std::process::Command;

use log::info;

use crate::error::{Error, Result};

/// Trait for build-tool invocation - allows mocking in tests.
pub trait BuildTool: Send + Sync {
    /// Run one build in `dir` with additional arguments.
    fn run(&self, dir: &Path, args: &[String]) -> Result<()>;
}

/// Build tool backed by an external command.
pub struct CommandBuildTool {
    command: String,
}

impl CommandBuildTool {
    pub fn new(command: String) -> Self {
        Self { command }
    }
}

impl BuildTool for CommandBuildTool {
    fn run(&self, dir: &Path, args: &[String]) -> Result<()> {
        let command = format!("{} {}", self.command, args.join(" "));
        info!("In {}, running '{}'.", dir.display(), command.trim_end());
        let output = Command::new(&self.command)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|err| Error::BuildCommand {
                command: command.clone(),
                path: dir.display().to_string(),
                stderr: err.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::BuildCommand {
                command,
                path: dir.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_build_tool_success() {
        let temp = TempDir::new().unwrap();
        let tool = CommandBuildTool::new("true".to_string());
        tool.run(temp.path(), &["opt=3".to_string()]).unwrap();
    }

    #[test]
    fn test_command_build_tool_failure() {
        let temp = TempDir::new().unwrap();
        let tool = CommandBuildTool::new("false".to_string());
        let err = tool.run(temp.path(), &[]).unwrap_err();
        assert!(matches!(err, Error::BuildCommand { .. }));
    }
}
