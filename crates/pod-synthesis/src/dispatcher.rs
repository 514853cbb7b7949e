//! Vendor-independent entry point for synthesis operations.
//!
//! A [`Synthesis`] binds one project's descriptor to the toolchain it names.
//! The toolchain is resolved when the project is opened, so every later call
//! works against a toolchain that is known to exist.

use std::path::{Path, PathBuf};

use crate::descriptor::SynthesisDescriptor;
use crate::error::{Result, SynthesisError};
use crate::stage::stage_sources;
use crate::toolchain::{require_builder, SynthesisContext, Toolchain, ToolchainRegistry};

/// A project's synthesis setup with its selected toolchain.
pub struct Synthesis<'a> {
    ctx: SynthesisContext<'a>,
    registry: &'a ToolchainRegistry,
    toolchain: &'a dyn Toolchain,
    descriptor: SynthesisDescriptor,
}

impl<'a> Synthesis<'a> {
    /// Open the synthesis project described by `<synthesis>/synthesis.toml`.
    pub fn open(ctx: SynthesisContext<'a>, registry: &'a ToolchainRegistry) -> Result<Self> {
        let descriptor = SynthesisDescriptor::load(&ctx.config.descriptor_path())?;
        let toolchain = registry.select(&descriptor.toolchain)?;
        tracing::debug!(
            "opened synthesis project {} with toolchain {}",
            ctx.config.project_name,
            toolchain.name()
        );
        Ok(Self {
            ctx,
            registry,
            toolchain,
            descriptor,
        })
    }

    /// Create (or reset) the synthesis project for `toolchain`.
    pub fn init(
        ctx: SynthesisContext<'a>,
        registry: &'a ToolchainRegistry,
        toolchain: &str,
    ) -> Result<Self> {
        let selected = registry.select(toolchain)?;
        let synthesis = Self {
            ctx,
            registry,
            toolchain: selected,
            descriptor: SynthesisDescriptor::new(selected.name(), selected.default_tool()),
        };
        synthesis.save()?;
        ctx.sink.info(&format!(
            "Synthesis project initialised with toolchain {}",
            selected.name()
        ));
        Ok(synthesis)
    }

    /// Switch to another registered toolchain.
    ///
    /// The tool description is reset to the new toolchain's default and any
    /// recorded script is forgotten.
    pub fn select_toolchain(&mut self, name: &str) -> Result<()> {
        let toolchain = self.registry.select(name)?;
        self.toolchain = toolchain;
        self.descriptor = SynthesisDescriptor::new(toolchain.name(), toolchain.default_tool());
        self.save()
    }

    pub fn toolchain(&self) -> &dyn Toolchain {
        self.toolchain
    }

    pub fn descriptor(&self) -> &SynthesisDescriptor {
        &self.descriptor
    }

    /// Stage component sources into the synthesis directory.
    pub fn generate_project(&self) -> Result<()> {
        stage_sources(&self.ctx)?;
        self.ctx.sink.info("Synthesis project sources staged");
        Ok(())
    }

    /// Render the automation script and record its name.
    pub fn generate_script(&mut self, filename: Option<&str>) -> Result<String> {
        let name = self.toolchain.render_script(&self.ctx, filename)?;
        self.descriptor.set_script_name(name.as_str());
        self.save()?;
        Ok(name)
    }

    /// Render the constraint file; returns the path written.
    pub fn generate_pinout(&self, path: Option<&Path>) -> Result<PathBuf> {
        self.toolchain.render_constraints(&self.ctx, path)
    }

    /// Run the vendor tool on the recorded script.
    pub fn generate_bitstream(&self) -> Result<()> {
        let builder = require_builder(self.toolchain)?;
        let script = self
            .ctx
            .config
            .synthesis_dir()
            .join(self.descriptor.script_name()?);
        let command = self.tool_command()?;
        tracing::info!("running {}", command.display());
        builder.run_build(&self.ctx, &command, &script)
    }

    /// Resolve the tool executable.
    ///
    /// A `[tools]` override wins; otherwise the descriptor's install path is
    /// tried before a plain `PATH` search for the command.
    pub fn tool_command(&self) -> Result<PathBuf> {
        let tool = &self.descriptor.tool;
        if let Some(path) = self.ctx.config.tool_command(&tool.name) {
            return which::which(path).map_err(|_| SynthesisError::ToolCommandNotFound {
                command: path.display().to_string(),
            });
        }
        which::which(tool.default_command())
            .or_else(|_| which::which(&tool.command))
            .map_err(|_| SynthesisError::ToolCommandNotFound {
                command: tool.command.clone(),
            })
    }

    fn save(&self) -> Result<()> {
        self.descriptor.save(&self.ctx.config.descriptor_path())
    }
}
