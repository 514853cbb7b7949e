//! ISE `xtclsh` project script.
//!
//! The script is run from the synthesis directory and builds the project in
//! the objects directory. Stage order is fixed: each process consumes the
//! previous one's outputs.

use std::io;
use std::path::Path;

use pod_model::Platform;
use walkdir::WalkDir;

use super::{TCL_HEADER, TOP_PREFIX, UCF_EXT, VHDL_EXT};
use crate::config::SynthesisConfig;
use crate::error::Result;

/// Project options applied after the constraint file is registered.
const TOOL_OPTIONS: [&str; 4] = [
    r#"project set "Load Physical Constraints File" "Default" -process "Analyze Power Distribution (XPower Analyzer)""#,
    r#"project set "Load Physical Constraints File" "Default" -process "Generate Text Power Report""#,
    r#"project set "Target UCF File Name" "" -process "Back-annotate Pin Locations""#,
    r#"project set "Ignore User Timing Constraints" "false" -process "Map""#,
];

/// ISE processes, in run order.
pub const BUILD_STAGES: [&str; 7] = [
    "Synthesize",
    "Translate",
    "Map",
    "Place & Route",
    "Generate Programming File",
    "Generate Post-Synthesis Simulation Model",
    "Generate Post-Place & Route Simulation Model",
];

/// Staged source files, as `<subdir>/<file>` relative to `synthesis_dir`,
/// sorted by directory then file name.
///
/// Only files one directory below `synthesis_dir` are listed; the descriptor,
/// script and constraint file at its top level are not sources.
pub fn collect_sources(synthesis_dir: &Path) -> Result<Vec<String>> {
    if !synthesis_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut sources = Vec::new();
    for entry in WalkDir::new(synthesis_dir)
        .min_depth(2)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(synthesis_dir)
            .unwrap_or(entry.path());
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        sources.push(parts.join("/"));
    }
    Ok(sources)
}

/// Render the script for `platform` with the given staged sources.
pub fn render(platform: &Platform, config: &SynthesisConfig, sources: &[String]) -> String {
    let name = &config.project_name;
    let synthesis = format!("../{}", config.layout.synthesis);
    let constraints = format!("{synthesis}/{name}{UCF_EXT}");

    let mut lines = vec![
        TCL_HEADER.to_string(),
        format!("cd ../{}", config.layout.objs),
        format!("project new {name}"),
        "# configure platform params".to_string(),
        format!("project set family {}", platform.family),
        format!("project set device {}", platform.device),
        format!("project set package {}", platform.package),
        format!("project set speed {}", platform.speed),
        "project set {Preferred Language} VHDL".to_string(),
        r#"project set "Create Binary Configuration File" TRUE"#.to_string(),
        "## add components sources file".to_string(),
        "# add top level sources file".to_string(),
        format!("xfile add {synthesis}/{TOP_PREFIX}{name}{VHDL_EXT}"),
    ];
    lines.extend(sources.iter().map(|s| format!("xfile add {synthesis}/{s}")));

    lines.push("# add constraint file".to_string());
    lines.push(format!("xfile add {constraints}"));
    lines.push(format!("set constraints_file {constraints}"));
    lines.extend(TOOL_OPTIONS.iter().map(|o| o.to_string()));

    lines.extend(BUILD_STAGES.iter().map(|s| format!("process run \"{s}\"")));
    lines.push(r#"process run "Implement Design" -force rerun_all"#.to_string());
    lines.push("project close".to_string());

    let mut script = lines.join("\n");
    script.push('\n');
    script
}
