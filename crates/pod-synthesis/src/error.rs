//! Synthesis errors and their severity.

use std::fmt;
use std::path::PathBuf;

use pod_model::ModelError;

/// How serious a reported condition is. The caller decides what is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Errors that can occur while generating or building a synthesis project.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// No synthesis descriptor at the expected path.
    #[error("no synthesis project found at {}", path.display())]
    ProjectNotFound { path: PathBuf },

    /// No toolchain registered under this name.
    #[error("cannot load toolchain '{name}': not registered")]
    PluginLoad { name: String },

    /// The synthesis tool executable could not be found.
    #[error("synthesis tool command '{command}' not found in PATH")]
    ToolCommandNotFound { command: String },

    /// A pin-mapped platform port is not exactly one bit wide.
    #[error("platform port {port} has size {size}, expected 1")]
    MalformedPortWidth { port: String, size: usize },

    /// A component declared a constraint kind no toolchain understands.
    #[error("component {instance} has an unknown constraint type '{kind}'")]
    UnknownConstraintType { instance: String, kind: String },

    /// A component constraint lacks an attribute its kind requires.
    #[error("constraint '{constraint}' of {instance} is missing attribute '{attribute}'")]
    MissingConstraintAttribute {
        instance: String,
        constraint: String,
        attribute: &'static str,
    },

    /// Staging or artifact copy failed.
    #[error("can't copy {}: {source}", path.display())]
    CopyFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected toolchain lacks the requested capability.
    #[error("toolchain '{toolchain}' does not implement {capability}")]
    NotImplemented {
        toolchain: String,
        capability: &'static str,
    },

    /// A build was requested before any script was generated.
    #[error("synthesis script must be generated before building")]
    ScriptNotGenerated,

    /// The external tool exited unsuccessfully.
    #[error("synthesis tool {command} exited with {status}")]
    ToolFailed { command: String, status: String },

    /// Connectivity model lookup failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Descriptor parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Descriptor serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SynthesisError {
    pub fn severity(&self) -> Severity {
        match self {
            SynthesisError::ProjectNotFound { .. } | SynthesisError::ScriptNotGenerated => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// Result type for synthesis operations.
pub type Result<T> = std::result::Result<T, SynthesisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_fatal() {
        let err = SynthesisError::UnknownConstraintType {
            instance: "pll0".into(),
            kind: "area".into(),
        };
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(
            err.to_string(),
            "component pll0 has an unknown constraint type 'area'"
        );
        let err = SynthesisError::MalformedPortWidth {
            port: "IO".into(),
            size: 2,
        };
        assert_eq!(err.severity(), Severity::Error);
    }

    #[test]
    fn missing_project_is_a_warning() {
        let err = SynthesisError::ProjectNotFound {
            path: PathBuf::from("synthesis/synthesis.toml"),
        };
        assert_eq!(err.severity(), Severity::Warning);
        assert!(err.to_string().contains("synthesis/synthesis.toml"));
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
