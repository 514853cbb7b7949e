//! Toolchain capability contract and the name → implementation registry.

use std::fmt;
use std::path::{Path, PathBuf};

use pod_model::Design;

use crate::config::SynthesisConfig;
use crate::descriptor::ToolDescriptor;
use crate::error::{Result, SynthesisError};
use crate::ise::IseToolchain;
use crate::runner::CommandRunner;
use crate::sink::MessageSink;

/// Everything a toolchain needs for one generation run.
#[derive(Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub design: &'a Design,
    pub config: &'a SynthesisConfig,
    pub sink: &'a dyn MessageSink,
    pub runner: &'a dyn CommandRunner,
}

/// A vendor toolchain plugin.
///
/// Object-safe so toolchains can be stored in `Box<dyn Toolchain>`.
pub trait Toolchain: fmt::Debug + Send + Sync {
    /// Registry key (e.g. `"ise"`).
    fn name(&self) -> &str;

    /// Tool description written into a freshly initialised descriptor.
    fn default_tool(&self) -> ToolDescriptor;

    /// Write the constraint file; `path` overrides the default location.
    /// Returns the path written.
    fn render_constraints(
        &self,
        ctx: &SynthesisContext<'_>,
        path: Option<&Path>,
    ) -> Result<PathBuf>;

    /// Write the automation script into the synthesis directory.
    /// Returns the script's file name.
    fn render_script(&self, ctx: &SynthesisContext<'_>, filename: Option<&str>) -> Result<String>;

    /// Build-runner capability, if this toolchain has one.
    fn builder(&self) -> Option<&dyn BuildRunner> {
        None
    }
}

/// Optional toolchain capability: drive the vendor tool to a bitstream.
pub trait BuildRunner {
    /// Run the vendor tool on a generated script and retrieve its artifacts.
    fn run_build(
        &self,
        ctx: &SynthesisContext<'_>,
        tool_command: &Path,
        script: &Path,
    ) -> Result<()>;
}

/// The build runner of `toolchain`, or `NotImplemented`.
pub fn require_builder(toolchain: &dyn Toolchain) -> Result<&dyn BuildRunner> {
    toolchain
        .builder()
        .ok_or_else(|| SynthesisError::NotImplemented {
            toolchain: toolchain.name().to_string(),
            capability: "bitstream generation",
        })
}

/// Registry of available toolchains, looked up by name.
#[derive(Debug, Default)]
pub struct ToolchainRegistry {
    toolchains: Vec<Box<dyn Toolchain>>,
}

impl ToolchainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every toolchain shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(IseToolchain));
        registry
    }

    /// Register a toolchain, replacing any previous one with the same name.
    pub fn register(&mut self, toolchain: Box<dyn Toolchain>) {
        self.toolchains.retain(|t| t.name() != toolchain.name());
        self.toolchains.push(toolchain);
    }

    /// Resolve a toolchain by name.
    pub fn select(&self, name: &str) -> Result<&dyn Toolchain> {
        self.toolchains
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
            .ok_or_else(|| SynthesisError::PluginLoad {
                name: name.to_string(),
            })
    }

    /// Registered toolchain names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.toolchains.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names
    }
}
