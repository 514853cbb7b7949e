//! `pod.toml` manifest parsing and project configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pod_synthesis::{ProjectLayout, SynthesisConfig};

pub const MANIFEST_FILE: &str = "pod.toml";

/// The top-level manifest structure for a pod project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodManifest {
    /// Project metadata (required).
    pub project: ProjectSection,
    #[serde(default)]
    pub synthesis: SynthesisSection,
    /// Tool executable overrides, keyed by tool name (e.g. `ise = "/opt/.../xtclsh"`).
    #[serde(default)]
    pub tools: BTreeMap<String, PathBuf>,
    /// Directory name overrides.
    #[serde(default)]
    pub layout: ProjectLayout,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    /// Project name; drives generated file names.
    pub name: String,
    /// Design description, relative to the project directory.
    #[serde(default = "default_design")]
    pub design: PathBuf,
}

fn default_design() -> PathBuf {
    PathBuf::from("design.toml")
}

/// Synthesis output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisSection {
    /// Colour-tag vendor tool output.
    #[serde(default)]
    pub color: bool,
}

impl PodManifest {
    /// Search upward from `start_dir` for a `pod.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PodManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing pod.toml")
    }

    /// Absolute path of the design description.
    pub fn design_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.project.design)
    }

    /// Build the immutable synthesis configuration for `project_dir`.
    ///
    /// Relative tool paths with a directory part are taken relative to the
    /// project; bare command names are left for a `PATH` search.
    pub fn to_config(&self, project_dir: &Path) -> SynthesisConfig {
        let mut config = SynthesisConfig::new(&self.project.name, project_dir);
        config.layout = self.layout.clone();
        config.color = self.synthesis.color;
        config.tool_commands = self
            .tools
            .iter()
            .map(|(tool, path)| {
                let path = if path.is_relative() && path.components().count() > 1 {
                    project_dir.join(path)
                } else {
                    path.clone()
                };
                (tool.clone(), path)
            })
            .collect();
        config
    }
}
