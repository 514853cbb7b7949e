//! `pod doctor`: project and toolchain diagnostics.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use pod_synthesis::{
    MemorySink, ProcessRunner, Synthesis, SynthesisContext, SynthesisDescriptor,
    ToolchainRegistry,
};

use crate::commands::synthesis::Project;
use crate::manifest::PodManifest;

/// Print project and tool status.
pub fn run(project_dir: &Path) -> Result<()> {
    report(project_dir, &mut io::stdout().lock())
}

/// Write project and tool status to `out`.
pub fn report(project_dir: &Path, out: &mut impl Write) -> Result<()> {
    writeln!(out, "=== pod doctor ===")?;
    writeln!(out)?;
    writeln!(out, "pod version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;

    writeln!(out, "--- Toolchains ---")?;
    let registry = ToolchainRegistry::with_builtin();
    writeln!(out, "  registered: {}", registry.names().join(", "))?;
    writeln!(out)?;

    writeln!(out, "--- Project Status ---")?;
    let (manifest, dir) = match PodManifest::find_and_load(project_dir) {
        Ok(Some(found)) => found,
        Ok(None) => {
            writeln!(out, "  pod.toml: not found")?;
            return Ok(());
        }
        Err(e) => {
            writeln!(out, "  pod.toml: error: {e:#}")?;
            return Ok(());
        }
    };
    writeln!(out, "  pod.toml: found at {}", dir.display())?;
    writeln!(out, "  Project:  {}", manifest.project.name)?;

    let project = match Project::load(&manifest, &dir) {
        Ok(project) => project,
        Err(e) => {
            writeln!(out, "  Design:   error: {e:#}")?;
            return Ok(());
        }
    };
    writeln!(
        out,
        "  Design:   {} ({} instances)",
        project.design.platform().name,
        project.design.instances().count()
    )?;

    let descriptor_path = project.config.descriptor_path();
    match SynthesisDescriptor::load(&descriptor_path) {
        Ok(descriptor) => {
            writeln!(out, "  Toolchain: {}", descriptor.toolchain)?;
            match descriptor.script_name() {
                Ok(script) => writeln!(out, "  Script:   {script}")?,
                Err(_) => writeln!(out, "  Script:   not generated")?,
            }
        }
        Err(e) => {
            writeln!(out, "  Synthesis: {e}")?;
            return Ok(());
        }
    }

    let sink = MemorySink::new();
    let ctx = SynthesisContext {
        design: &project.design,
        config: &project.config,
        sink: &sink,
        runner: &ProcessRunner,
    };
    match Synthesis::open(ctx, &registry).and_then(|s| s.tool_command()) {
        Ok(command) => writeln!(out, "  Tool:     {}", command.display())?,
        Err(e) => writeln!(out, "  Tool:     {e}")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_for(dir: &Path) -> String {
        let mut out = Vec::new();
        report(dir, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn doctor_reports_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let text = report_for(dir.path());
        assert!(text.starts_with("=== pod doctor ===\n"));
        assert!(text.contains("  registered: ise\n"));
        assert!(text.contains("  pod.toml: not found\n"));
        assert!(!text.contains("Design:"));
    }

    #[test]
    fn doctor_reports_broken_design() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pod.toml"), "[project]\nname = \"p\"\n").unwrap();
        let text = report_for(dir.path());
        assert!(text.contains("  pod.toml: found at"));
        assert!(text.contains("  Project:  p\n"));
        assert!(text.contains("  Design:   error: loading design"));
        assert!(!text.contains("Toolchain:"));
    }

    #[test]
    fn doctor_reports_missing_synthesis_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pod.toml"), "[project]\nname = \"p\"\n").unwrap();
        std::fs::write(
            dir.path().join("design.toml"),
            "[platform]\nname = \"board\"\nfamily = \"spartan3\"\ndevice = \"xc3s200a\"\n\
             package = \"ft256\"\nspeed = \"-4\"\n",
        )
        .unwrap();
        let text = report_for(dir.path());
        assert!(text.contains("  Design:   board (0 instances)\n"));
        assert!(text.contains("  Synthesis: "));
        assert!(!text.contains("Tool:"));
    }
}
