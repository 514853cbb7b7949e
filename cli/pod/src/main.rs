//! pod CLI: generate and build FPGA synthesis projects from a design description.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use commands::synthesis::Project;
use manifest::PodManifest;
use pod_synthesis::{Severity, SynthesisError};

#[derive(Parser)]
#[command(name = "pod", version, about = "FPGA synthesis project generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesis project operations
    Synthesis {
        #[command(subcommand)]
        action: SynthesisAction,
    },
    /// List available synthesis toolchains
    Toolchains,
    /// Check project and tool status
    Doctor,
}

#[derive(Subcommand)]
enum SynthesisAction {
    /// Select a toolchain and create the synthesis descriptor
    Init {
        /// Toolchain name (e.g., ise)
        #[arg(long)]
        toolchain: String,
    },
    /// Stage component sources into the synthesis directory
    Project,
    /// Generate the toolchain automation script
    Script {
        /// Script file name (default: <project>.tcl)
        #[arg(long)]
        filename: Option<String>,
    },
    /// Generate the pin/timing constraint file
    Pinout {
        /// Output path (default: synthesis/<project>.ucf)
        #[arg(long)]
        filename: Option<PathBuf>,
    },
    /// Run the vendor tool and retrieve the bitstream
    Bitstream,
    /// Print resolved pin assignments
    Pins {
        /// Output format (text, json)
        #[arg(long)]
        export: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(cli) {
        let severity = e
            .downcast_ref::<SynthesisError>()
            .map(SynthesisError::severity)
            .unwrap_or(Severity::Error);
        eprintln!("{severity}: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Synthesis { action } => {
            let (manifest, project_dir) = load_manifest_required(&cwd)?;
            tracing::debug!(
                "project {} at {}",
                manifest.project.name,
                project_dir.display()
            );
            let project = Project::load(&manifest, &project_dir)?;
            match action {
                SynthesisAction::Init { toolchain } => {
                    commands::synthesis::init(&project, &toolchain)
                }
                SynthesisAction::Project => commands::synthesis::project(&project),
                SynthesisAction::Script { filename } => {
                    commands::synthesis::script(&project, filename.as_deref())
                }
                SynthesisAction::Pinout { filename } => {
                    commands::synthesis::pinout(&project, filename.as_deref())
                }
                SynthesisAction::Bitstream => commands::synthesis::bitstream(&project),
                SynthesisAction::Pins { export } => {
                    commands::synthesis::pins(&project, export.as_deref())
                }
            }
        }

        Commands::Toolchains => commands::toolchains::run(),

        Commands::Doctor => commands::doctor::run(&cwd),
    }
}

/// Load manifest, returning error if not found.
fn load_manifest_required(cwd: &Path) -> anyhow::Result<(PodManifest, PathBuf)> {
    match PodManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((manifest, dir)),
        None => anyhow::bail!("no pod.toml found in {} or its parents", cwd.display()),
    }
}
