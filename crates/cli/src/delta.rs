//! Driver for the external `delta_plugin` tool.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};

/// Invokes `delta_plugin` subcommands and fails on a non-zero exit status.
#[derive(Clone, Debug)]
pub struct DeltaPlugin {
    program: PathBuf,
}

impl DeltaPlugin {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Merge every ingredient record of the load order into `plugin`.
    pub fn extract_ingredients(&self, plugin: &Path) -> Result<()> {
        self.run([
            OsStr::new("filter"),
            OsStr::new("--all"),
            OsStr::new("-o"),
            plugin.as_os_str(),
            OsStr::new("match"),
            OsStr::new("Ingredient"),
        ])
    }

    /// Convert `input` between plugin and YAML forms, writing into `output_dir`.
    pub fn convert(&self, output_dir: &Path, input: &Path) -> Result<()> {
        self.run([
            OsStr::new("convert"),
            OsStr::new("-o"),
            output_dir.as_os_str(),
            input.as_os_str(),
        ])
    }

    fn run<'a>(&self, args: impl IntoIterator<Item = &'a OsStr>) -> Result<()> {
        let mut command = Command::new(&self.program);
        command.args(args);
        tracing::debug!("Running {:?}", command);

        let status = command
            .status()
            .with_context(|| format!("Failed to start {}", self.program.display()))?;
        if !status.success() {
            bail!("delta_plugin returned error ({}). Aborting...", status);
        }
        Ok(())
    }
}
