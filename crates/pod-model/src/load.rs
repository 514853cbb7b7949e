//! TOML design description loading.
//!
//! A design file declares the platform, the component instances, and a flat
//! list of wires. Loading materialises everything into a [`Design`]; shape
//! errors (duplicate names, dangling wires, pins out of range, malformed
//! force-defined ports) are rejected here rather than at generation time.

use std::path::Path;

use serde::Deserialize;

use crate::constraint::{Constraint, ConstraintKind};
use crate::design::{Design, Instance, Platform};
use crate::error::{ModelError, Result};
use crate::port::{Connection, Electrical, Interface, Port};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DesignFile {
    platform: PlatformDef,
    #[serde(default)]
    instances: Vec<InstanceDef>,
    #[serde(default)]
    wires: Vec<WireDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PlatformDef {
    name: String,
    family: String,
    device: String,
    package: String,
    speed: String,
    #[serde(default)]
    interfaces: Vec<InterfaceDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct InstanceDef {
    name: String,
    component: String,
    #[serde(default)]
    num: usize,
    #[serde(default)]
    hdl_files: Vec<String>,
    #[serde(default)]
    interfaces: Vec<InterfaceDef>,
    #[serde(default)]
    constraints: Vec<ConstraintDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct InterfaceDef {
    name: String,
    #[serde(default)]
    ports: Vec<PortDef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PortDef {
    name: String,
    #[serde(default = "default_size")]
    size: usize,
    #[serde(default)]
    standard: Option<String>,
    #[serde(default)]
    drive: Option<String>,
    #[serde(default)]
    option: Option<String>,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    force: Option<String>,
}

fn default_size() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConstraintDef {
    #[serde(rename = "type")]
    kind: String,
    name: String,
    #[serde(default)]
    frequency: Option<f64>,
    #[serde(default)]
    loc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireDef {
    from: String,
    to: String,
}

impl Design {
    /// Parse a design from a TOML string.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: DesignFile = toml::from_str(input)?;
        build(file)
    }

    /// Load a design from a `.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn build(file: DesignFile) -> Result<Design> {
    let def = file.platform;
    let mut platform = Platform::new(def.name, def.family, def.device, def.package, def.speed);
    for iface in def.interfaces {
        let interface = build_interface(iface, true)?;
        platform.add_interface(interface)?;
    }

    let mut design = Design::new(platform);
    for def in file.instances {
        let mut instance = Instance::new(def.name, def.component, def.num);
        instance.hdl_files = def.hdl_files;
        instance.constraints = def.constraints.into_iter().map(build_constraint).collect();
        for iface in def.interfaces {
            let interface = build_interface(iface, false)?;
            instance.add_interface(interface)?;
        }
        design.add_instance(instance)?;
    }

    for wire in &file.wires {
        let from = parse_endpoint(&wire.from)?;
        let to = parse_endpoint(&wire.to)?;
        design.connect(&from, &to)?;
    }

    Ok(design)
}

fn build_interface(def: InterfaceDef, on_platform: bool) -> Result<Interface> {
    let mut interface = Interface::new(def.name);
    for port in def.ports {
        interface.add_port(build_port(port, on_platform)?)?;
    }
    Ok(interface)
}

fn build_port(def: PortDef, on_platform: bool) -> Result<Port> {
    let invalid = |detail: &str| ModelError::InvalidPort {
        port: def.name.clone(),
        detail: detail.to_string(),
    };

    if def.size == 0 {
        return Err(invalid("size must be at least 1"));
    }
    if def.frequency.is_some_and(|f| f <= 0.0 || !f.is_finite()) {
        return Err(invalid("frequency must be a positive number of Hz"));
    }

    let mut port = match (&def.force, &def.position) {
        (Some(_), _) if !on_platform => {
            return Err(invalid("only platform ports can be force-defined"));
        }
        (Some(_), None) => return Err(invalid("force-defined port needs a position")),
        (Some(_), Some(_)) if def.size != 1 => {
            return Err(invalid("force-defined port must have size 1"));
        }
        (Some(value), Some(position)) => Port::forced(&def.name, position, value),
        (None, None) if on_platform => return Err(invalid("platform port needs a position")),
        (None, position) => {
            let mut port = Port::new(&def.name, def.size);
            port.position = position.clone();
            port
        }
    };

    port.electrical = Electrical {
        standard: def.standard,
        drive: def.drive,
        option: def.option,
    };
    port.frequency = def.frequency;
    Ok(port)
}

fn build_constraint(def: ConstraintDef) -> Constraint {
    Constraint {
        kind: ConstraintKind::from(def.kind.as_str()),
        name: def.name,
        frequency: def.frequency,
        loc: def.loc,
    }
}

/// Parse `instance.interface.port.pin`.
fn parse_endpoint(endpoint: &str) -> Result<Connection> {
    let malformed = || ModelError::MalformedEndpoint {
        endpoint: endpoint.to_string(),
    };
    let parts: Vec<&str> = endpoint.split('.').collect();
    let [instance, interface, port, pin] = parts.as_slice() else {
        return Err(malformed());
    };
    if instance.is_empty() || interface.is_empty() || port.is_empty() {
        return Err(malformed());
    }
    let pin = pin.parse::<usize>().map_err(|_| malformed())?;
    Ok(Connection::new(*instance, *interface, *port, pin))
}
