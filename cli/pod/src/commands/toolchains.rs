//! `pod toolchains`: list registered synthesis toolchains.

use anyhow::Result;

use pod_synthesis::{Toolchain, ToolchainRegistry};

/// Print every registered toolchain with its capabilities.
pub fn run() -> Result<()> {
    let registry = ToolchainRegistry::with_builtin();
    for name in registry.names() {
        let toolchain = registry.select(name)?;
        println!("  {name:<10} {}", describe(toolchain));
    }
    Ok(())
}

fn describe(toolchain: &dyn Toolchain) -> String {
    let tool = toolchain.default_tool();
    let mut capabilities = vec!["constraints", "script"];
    if toolchain.builder().is_some() {
        capabilities.push("bitstream");
    }
    format!("{} via {}", capabilities.join(", "), tool.command)
}
