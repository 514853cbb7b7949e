//! `pod synthesis`: project staging, constraint and script generation, builds.

use std::path::Path;

use anyhow::{bail, Context, Result};

use pod_model::Design;
use pod_synthesis::{
    resolve, MessageSink, ProcessRunner, ResolvedConstraints, Synthesis, SynthesisConfig,
    SynthesisContext, ToolchainRegistry, TracingSink,
};

use crate::manifest::PodManifest;

/// A loaded project: its design and the configuration derived from `pod.toml`.
pub struct Project {
    pub design: Design,
    pub config: SynthesisConfig,
}

impl Project {
    pub fn load(manifest: &PodManifest, project_dir: &Path) -> Result<Self> {
        let design_path = manifest.design_path(project_dir);
        let design = Design::load(&design_path)
            .with_context(|| format!("loading design {}", design_path.display()))?;
        Ok(Self {
            design,
            config: manifest.to_config(project_dir),
        })
    }

    fn context<'a>(&'a self, sink: &'a dyn MessageSink) -> SynthesisContext<'a> {
        SynthesisContext {
            design: &self.design,
            config: &self.config,
            sink,
            runner: &ProcessRunner,
        }
    }

    fn sink(&self) -> TracingSink {
        TracingSink::new(self.config.color)
    }
}

/// Create the synthesis descriptor for `toolchain`.
pub fn init(project: &Project, toolchain: &str) -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    let sink = project.sink();
    Synthesis::init(project.context(&sink), &registry, toolchain)?;
    println!(
        "Initialised {} with toolchain {toolchain}",
        project.config.descriptor_path().display()
    );
    Ok(())
}

/// Stage component sources.
pub fn project(project: &Project) -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    let sink = project.sink();
    Synthesis::open(project.context(&sink), &registry)?.generate_project()?;
    Ok(())
}

/// Generate the automation script.
pub fn script(project: &Project, filename: Option<&str>) -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    let sink = project.sink();
    let mut synthesis = Synthesis::open(project.context(&sink), &registry)?;
    synthesis.generate_script(filename)?;
    Ok(())
}

/// Generate the constraint file.
pub fn pinout(project: &Project, filename: Option<&Path>) -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    let sink = project.sink();
    Synthesis::open(project.context(&sink), &registry)?.generate_pinout(filename)?;
    Ok(())
}

/// Run the vendor tool and retrieve the bitstream.
pub fn bitstream(project: &Project) -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    let sink = project.sink();
    Synthesis::open(project.context(&sink), &registry)?.generate_bitstream()?;
    println!("Bitstream written to {}", project.config.binaries_dir().display());
    Ok(())
}

/// Print resolved pin assignments without writing a constraint file.
pub fn pins(project: &Project, export: Option<&str>) -> Result<()> {
    let sink = project.sink();
    let resolved = resolve(&project.design, &sink)?;
    print!("{}", format_pins(&resolved, export)?);
    Ok(())
}

fn format_pins(resolved: &ResolvedConstraints, export: Option<&str>) -> Result<String> {
    match export.unwrap_or("text") {
        "json" => {
            let mut json = serde_json::to_string_pretty(resolved)?;
            json.push('\n');
            Ok(json)
        }
        "text" => {
            let mut out = String::new();
            for pin in &resolved.pins {
                let mut line = format!(
                    "{:<8} {:<28} {:<10}",
                    pin.location, pin.net, pin.platform_port
                );
                if let Some(standard) = &pin.standard {
                    line.push_str(&format!(" {standard}"));
                }
                if let Some(period) = pin.period_ns {
                    line.push_str(&format!(" ({period} ns)"));
                }
                out.push_str(line.trim_end());
                out.push('\n');
            }
            Ok(out)
        }
        other => bail!("unknown export format '{other}' (expected text or json)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESIGN: &str = r#"
[platform]
name = "apf27"
family = "spartan3"
device = "xc3s200a"
package = "ft256"
speed = "-4"

[[platform.interfaces]]
name = "fpga"

[[platform.interfaces.ports]]
name = "CLK0"
position = "N9"
standard = "LVCMOS33"

[[instances]]
name = "pll0"
component = "pll"
hdl-files = ["pll.vhd"]

[[instances.interfaces]]
name = "clk"

[[instances.interfaces.ports]]
name = "refclk"
frequency = 50000000.0

[[wires]]
from = "apf27.fpga.CLK0.0"
to = "pll0.clk.refclk.0"
"#;

    fn setup(root: &Path) -> Project {
        std::fs::write(root.join("pod.toml"), "[project]\nname = \"blinker\"\n").unwrap();
        std::fs::write(root.join("design.toml"), DESIGN).unwrap();
        let hdl = root.join("components/pll0/hdl");
        std::fs::create_dir_all(&hdl).unwrap();
        std::fs::write(hdl.join("pll.vhd"), "-- pll\n").unwrap();

        let (manifest, dir) = PodManifest::find_and_load(root).unwrap().unwrap();
        Project::load(&manifest, &dir).unwrap()
    }

    #[test]
    fn init_then_generate() {
        let dir = tempfile::tempdir().unwrap();
        let project = setup(dir.path());

        init(&project, "ise").unwrap();
        super::project(&project).unwrap();
        script(&project, None).unwrap();
        pinout(&project, None).unwrap();

        let synthesis = dir.path().join("synthesis");
        assert!(synthesis.join("synthesis.toml").is_file());
        assert!(synthesis.join("pll/pll.vhd").is_file());
        assert!(synthesis.join("blinker.tcl").is_file());
        let ucf = std::fs::read_to_string(synthesis.join("blinker.ucf")).unwrap();
        assert!(ucf.contains("NET \"pll0_refclk\" LOC=\"N9\" | IOSTANDARD=LVCMOS33; # CLK0"));
    }

    #[test]
    fn commands_need_a_synthesis_project() {
        let dir = tempfile::tempdir().unwrap();
        let project = setup(dir.path());
        let err = script(&project, None).unwrap_err();
        assert!(err.to_string().contains("no synthesis project found"));
    }

    #[test]
    fn unknown_toolchain() {
        let dir = tempfile::tempdir().unwrap();
        let project = setup(dir.path());
        assert!(init(&project, "quartus").is_err());
    }

    #[test]
    fn pin_export_formats() {
        let dir = tempfile::tempdir().unwrap();
        let project = setup(dir.path());
        let resolved = resolve(&project.design, &pod_synthesis::MemorySink::new()).unwrap();

        let text = format_pins(&resolved, None).unwrap();
        assert_eq!(
            text.trim_end(),
            "N9       pll0_refclk                  CLK0       LVCMOS33 (20 ns)"
        );

        let json: serde_json::Value =
            serde_json::from_str(&format_pins(&resolved, Some("json")).unwrap()).unwrap();
        assert_eq!(json["pins"][0]["net"], "pll0_refclk");
        assert_eq!(json["pins"][0]["period-ns"], 20.0);

        assert!(format_pins(&resolved, Some("csv")).is_err());
    }
}
