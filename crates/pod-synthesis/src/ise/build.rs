//! Running `xtclsh` and retrieving the bitstream.

use std::fs;
use std::path::{Path, PathBuf};

use super::{IseToolchain, BINARY_EXT, BITSTREAM_EXT, TOP_PREFIX};
use crate::config::SynthesisConfig;
use crate::error::{Result, SynthesisError};
use crate::runner::ToolInvocation;
use crate::toolchain::{BuildRunner, SynthesisContext};

impl BuildRunner for IseToolchain {
    fn run_build(
        &self,
        ctx: &SynthesisContext<'_>,
        tool_command: &Path,
        script: &Path,
    ) -> Result<()> {
        let config = ctx.config;
        purge(&config.objs_dir())?;

        let invocation = ToolInvocation {
            program: tool_command.to_path_buf(),
            stdin: script.to_path_buf(),
            cwd: config.synthesis_dir(),
        };
        let exit = ctx
            .runner
            .run(&invocation, &mut |line| ctx.sink.tool_output(line))?;
        if !exit.success() {
            return Err(SynthesisError::ToolFailed {
                command: tool_command.display().to_string(),
                status: exit.to_string(),
            });
        }

        for artifact in retrieve_artifacts(config)? {
            ctx.sink
                .info(&format!("Bitstream copied to {}", artifact.display()));
        }
        Ok(())
    }
}

/// Empty the objects directory, creating it if needed.
fn purge(dir: &Path) -> Result<()> {
    if dir.exists() {
        tracing::debug!("purging {}", dir.display());
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Copy `top_<project>.bit` and `.bin` from objects to binaries.
fn retrieve_artifacts(config: &SynthesisConfig) -> Result<Vec<PathBuf>> {
    let binaries = config.binaries_dir();
    fs::create_dir_all(&binaries)?;

    let mut copied = Vec::new();
    for ext in [BITSTREAM_EXT, BINARY_EXT] {
        let file = format!("{TOP_PREFIX}{}{ext}", config.project_name);
        let source = config.objs_dir().join(&file);
        let target = binaries.join(&file);
        fs::copy(&source, &target).map_err(|source_err| SynthesisError::CopyFailure {
            path: source.clone(),
            source: source_err,
        })?;
        copied.push(target);
    }
    Ok(copied)
}
