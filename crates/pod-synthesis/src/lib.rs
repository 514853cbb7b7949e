//! Constraint resolution and toolchain dispatch for FPGA synthesis.
//!
//! Given a [`pod_model::Design`], this crate:
//! 1. **Resolves** every platform pin to at most one net ([`resolve()`])
//! 2. **Renders** vendor constraint files and automation scripts through a
//!    [`Toolchain`] selected by name from a [`ToolchainRegistry`]
//! 3. **Builds** by running the vendor tool and retrieving its artifacts
//!
//! [`Synthesis`] ties these together for one project directory.

pub mod config;
pub mod descriptor;
pub mod dispatcher;
pub mod error;
pub mod ise;
pub mod resolve;
pub mod runner;
pub mod sink;
pub mod stage;
pub mod toolchain;

pub use config::{ProjectLayout, SynthesisConfig};
pub use descriptor::{SynthesisDescriptor, ToolDescriptor};
pub use dispatcher::Synthesis;
pub use error::{Result, Severity, SynthesisError};
pub use ise::IseToolchain;
pub use resolve::{resolve, ComponentConstraint, PinAssignment, ResolvedConstraints};
pub use runner::{CommandRunner, ProcessRunner, ToolExit, ToolInvocation};
pub use sink::{MemorySink, MessageSink, SinkEvent, TracingSink};
pub use toolchain::{BuildRunner, SynthesisContext, Toolchain, ToolchainRegistry};
