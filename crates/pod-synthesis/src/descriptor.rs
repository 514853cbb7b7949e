//! Synthesis descriptor: the persisted state of a project's synthesis setup.
//!
//! Stored as `<synthesis>/synthesis.toml`:
//!
//! ```toml
//! toolchain = "ise"
//!
//! [tool]
//! name = "ise"
//! command = "xtclsh"
//! default-path = "/opt/Xilinx/14.7/ISE_DS/ISE/bin/lin64"
//!
//! [script]
//! filename = "blinker.tcl"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthesisError};

/// The vendor executable a toolchain drives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolDescriptor {
    /// Tool name; key for `[tools]` overrides.
    pub name: String,
    /// Executable name.
    pub command: String,
    /// Installation directory searched when no override is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
}

impl ToolDescriptor {
    /// `<default_path>/<command>`, or the bare command.
    pub fn default_command(&self) -> PathBuf {
        match &self.default_path {
            Some(dir) if !dir.is_empty() => Path::new(dir).join(&self.command),
            _ => PathBuf::from(&self.command),
        }
    }
}

/// Record of the generated automation script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub filename: String,
}

/// Persisted synthesis setup for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SynthesisDescriptor {
    /// Registered toolchain name.
    pub toolchain: String,
    pub tool: ToolDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptRecord>,
}

impl SynthesisDescriptor {
    pub fn new(toolchain: impl Into<String>, tool: ToolDescriptor) -> Self {
        Self {
            toolchain: toolchain.into(),
            tool,
            script: None,
        }
    }

    /// Load the descriptor; a missing file means no synthesis project exists.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SynthesisError::ProjectNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn script_name(&self) -> Result<&str> {
        self.script
            .as_ref()
            .map(|s| s.filename.as_str())
            .ok_or(SynthesisError::ScriptNotGenerated)
    }

    pub fn set_script_name(&mut self, filename: impl Into<String>) {
        self.script = Some(ScriptRecord {
            filename: filename.into(),
        });
    }
}
