//! Error types for connectivity model construction and lookup.

use std::path::PathBuf;

/// Errors that can occur while loading or querying a design.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// TOML deserialization error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading a design file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Design file not found.
    #[error("design file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// No instance (or platform) with this name.
    #[error("instance not found: {name}")]
    InstanceNotFound { name: String },

    /// The owner has no interface with this name.
    #[error("interface '{interface}' not found on {owner}")]
    InterfaceNotFound { owner: String, interface: String },

    /// The interface has no port with this name.
    #[error("port '{port}' not found on interface {interface}")]
    PortNotFound { interface: String, port: String },

    /// Two siblings share a name.
    #[error("duplicate {kind} name '{name}' in {scope}")]
    DuplicateName {
        kind: &'static str,
        name: String,
        scope: String,
    },

    /// A wire endpoint string is not `instance.interface.port.pin`.
    #[error("malformed wire endpoint '{endpoint}': expected instance.interface.port.pin")]
    MalformedEndpoint { endpoint: String },

    /// A pin index beyond the port width.
    #[error("pin {pin} out of range for port {port} (size {size})")]
    PinOutOfRange {
        port: String,
        pin: usize,
        size: usize,
    },

    /// Structural problem in a port definition.
    #[error("invalid port {port}: {detail}")]
    InvalidPort { port: String, detail: String },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
