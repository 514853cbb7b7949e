//! Xilinx ISE toolchain: UCF constraints, an `xtclsh` script, and a build
//! runner that retrieves `top_<project>.bit` / `.bin`.

mod build;
pub mod tcl;
pub mod ucf;

use std::fs;
use std::path::{Path, PathBuf};

use crate::descriptor::ToolDescriptor;
use crate::error::Result;
use crate::resolve::resolve;
use crate::toolchain::{BuildRunner, SynthesisContext, Toolchain};

pub(crate) const TOP_PREFIX: &str = "top_";
pub(crate) const VHDL_EXT: &str = ".vhd";
pub(crate) const UCF_EXT: &str = ".ucf";
pub(crate) const TCL_EXT: &str = ".tcl";
pub(crate) const BITSTREAM_EXT: &str = ".bit";
pub(crate) const BINARY_EXT: &str = ".bin";
pub(crate) const TCL_HEADER: &str = "# TCL script automatically generated by pod";

/// The Xilinx ISE 14.x flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct IseToolchain;

impl Toolchain for IseToolchain {
    fn name(&self) -> &str {
        "ise"
    }

    fn default_tool(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: "ise".to_string(),
            command: "xtclsh".to_string(),
            default_path: Some("/opt/Xilinx/14.7/ISE_DS/ISE/bin/lin64".to_string()),
        }
    }

    fn render_constraints(
        &self,
        ctx: &SynthesisContext<'_>,
        path: Option<&Path>,
    ) -> Result<PathBuf> {
        // Resolve fully before touching the file system.
        let resolved = resolve(ctx.design, ctx.sink)?;
        let text = ucf::render(&resolved);

        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ctx.config.synthesis_file(UCF_EXT));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, text)?;

        ctx.sink.info(&format!(
            "Constraint file generated with name : {}",
            path.display()
        ));
        Ok(path)
    }

    fn render_script(&self, ctx: &SynthesisContext<'_>, filename: Option<&str>) -> Result<String> {
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}{TCL_EXT}", ctx.config.project_name));

        let dir = ctx.config.synthesis_dir();
        let sources = tcl::collect_sources(&dir)?;
        let script = tcl::render(ctx.design.platform(), ctx.config, &sources);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(&filename), script)?;

        ctx.sink
            .info(&format!("TCL script generated with name : {filename}"));
        Ok(filename)
    }

    fn builder(&self) -> Option<&dyn BuildRunner> {
        Some(self)
    }
}
