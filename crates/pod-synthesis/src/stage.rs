//! Staging component sources into the synthesis directory.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, SynthesisError};
use crate::toolchain::SynthesisContext;

/// Copy each component's HDL files to `<synthesis>/<component>/`.
///
/// Instances of one component share their sources, so only the first
/// (`num == 0`) is staged. An existing staging directory is replaced. On a
/// failed copy the partially staged directory is removed and staging stops.
pub fn stage_sources(ctx: &SynthesisContext<'_>) -> Result<()> {
    let config = ctx.config;
    let synthesis = config.synthesis_dir();

    for instance in ctx.design.instances().filter(|i| i.num == 0) {
        let target_dir = synthesis.join(&instance.component);
        if target_dir.exists() {
            ctx.sink.warn(&format!(
                "{} already exists and will be replaced",
                target_dir.display()
            ));
            fs::remove_dir_all(&target_dir)?;
        }
        fs::create_dir_all(&target_dir)?;

        let source_dir = config.instance_hdl_dir(&instance.name);
        for file in &instance.hdl_files {
            let source = source_dir.join(file);
            let copied = match source.file_name() {
                Some(file_name) => fs::copy(&source, target_dir.join(file_name)).map(drop),
                None => Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "hdl file entry has no file name",
                )),
            };
            if let Err(err) = copied {
                remove_partial(&target_dir);
                return Err(SynthesisError::CopyFailure {
                    path: source,
                    source: err,
                });
            }
        }
        tracing::debug!(
            "staged {} file(s) for {}",
            instance.hdl_files.len(),
            instance.component
        );
    }
    Ok(())
}

fn remove_partial(dir: &Path) {
    if let Err(err) = fs::remove_dir_all(dir) {
        tracing::warn!("can't remove {}: {err}", dir.display());
    }
}
