//! Connectivity model for platform-based FPGA designs.
//!
//! A design is a platform (the board: device identification plus physical
//! I/O) and a set of component instances, wired pin-to-pin:
//! - **Platform / Instance:** owners of named interfaces
//! - **Interface / Port / Pin:** named groups of bits
//! - **Connection:** an edge from one pin to a bit of another port
//! - **Constraint:** clock and placement hints authored by a component
//!
//! The model is materialised once from a TOML description and is read-only
//! afterwards.

pub mod constraint;
pub mod design;
pub mod error;
pub mod load;
pub mod port;

pub use constraint::{Constraint, ConstraintKind};
pub use design::{Design, Instance, Platform};
pub use error::{ModelError, Result};
pub use port::{Connection, Electrical, Interface, Pin, Port};
