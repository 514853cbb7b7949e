//! CLI command implementations.

pub mod doctor;
pub mod synthesis;
pub mod toolchains;
