//! Immutable configuration shared by every synthesis component.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory names inside a project, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectLayout {
    /// Build workspace: descriptor, script, constraints, staged sources.
    pub synthesis: String,
    /// Vendor tool working directory, purged before every build.
    pub objs: String,
    /// Canonical output directory for retrieved artifacts.
    pub binaries: String,
    /// Per-instance component sources (`<components>/<instance>/hdl/`).
    pub components: String,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            synthesis: "synthesis".to_string(),
            objs: "objs".to_string(),
            binaries: "binaries".to_string(),
            components: "components".to_string(),
        }
    }
}

/// Configuration for one project, built once and passed by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// Project name; drives generated file names.
    pub project_name: String,
    /// Project root directory.
    pub project_dir: PathBuf,
    pub layout: ProjectLayout,
    /// Colour-tag tool output lines.
    pub color: bool,
    /// Per-tool executable overrides, keyed by tool name.
    pub tool_commands: BTreeMap<String, PathBuf>,
}

impl SynthesisConfig {
    pub fn new(project_name: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            project_dir: project_dir.into(),
            layout: ProjectLayout::default(),
            color: false,
            tool_commands: BTreeMap::new(),
        }
    }

    pub fn synthesis_dir(&self) -> PathBuf {
        self.project_dir.join(&self.layout.synthesis)
    }

    pub fn objs_dir(&self) -> PathBuf {
        self.project_dir.join(&self.layout.objs)
    }

    pub fn binaries_dir(&self) -> PathBuf {
        self.project_dir.join(&self.layout.binaries)
    }

    /// HDL sources shipped with an instance.
    pub fn instance_hdl_dir(&self, instance: &str) -> PathBuf {
        self.project_dir
            .join(&self.layout.components)
            .join(instance)
            .join("hdl")
    }

    /// Path of the synthesis descriptor.
    pub fn descriptor_path(&self) -> PathBuf {
        self.synthesis_dir().join("synthesis.toml")
    }

    /// `<synthesis>/<project><ext>`.
    pub fn synthesis_file(&self, ext: &str) -> PathBuf {
        self.synthesis_dir()
            .join(format!("{}{ext}", self.project_name))
    }

    /// Configured override for a tool, if any.
    pub fn tool_command(&self, tool: &str) -> Option<&Path> {
        self.tool_commands.get(tool).map(PathBuf::as_path)
    }
}
