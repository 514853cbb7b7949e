//! Interfaces, ports, pins, and the connections between them.
//!
//! A port is a bundle of `size` pins. Platform ports describe physical I/O
//! and carry a package position; instance ports describe component signals.
//! Connections are stored on both endpoint pins, so either side of a wire can
//! answer connectivity queries.

use indexmap::IndexMap;

use crate::error::{ModelError, Result};

/// An edge from a pin to one bit of another port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Destination instance name (the platform name for platform pins).
    pub instance: String,
    /// Destination interface name.
    pub interface: String,
    /// Destination port name.
    pub port: String,
    /// Destination pin index.
    pub pin: usize,
}

impl Connection {
    pub fn new(
        instance: impl Into<String>,
        interface: impl Into<String>,
        port: impl Into<String>,
        pin: usize,
    ) -> Self {
        Self {
            instance: instance.into(),
            interface: interface.into(),
            port: port.into(),
            pin,
        }
    }

    /// `<instance>_<port>`: the base net name and arbitration label.
    pub fn label(&self) -> String {
        format!("{}_{}", self.instance, self.port)
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.instance, self.interface, self.port, self.pin
        )
    }
}

/// One bit of a port.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    /// Bit index within the owning port, starting at 0.
    pub index: usize,
    /// Connections recorded on this bit, in description order.
    pub connections: Vec<Connection>,
}

impl Pin {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            connections: Vec::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }
}

/// Electrical attributes a port may declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Electrical {
    /// I/O standard (e.g. `LVCMOS33`).
    pub standard: Option<String>,
    /// Drive strength in mA.
    pub drive: Option<String>,
    /// Raw vendor option string appended to the net statement.
    pub option: Option<String>,
}

/// A named group of pins on a platform or instance interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    /// Bit width.
    pub size: usize,
    pub electrical: Electrical,
    /// Declared clock frequency in Hz.
    pub frequency: Option<f64>,
    /// Package location (platform ports only).
    pub position: Option<String>,
    /// Fixed drive value for force-defined platform ports.
    pub force: Option<String>,
    pins: Vec<Pin>,
}

impl Port {
    /// A port of `size` unconnected pins.
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            electrical: Electrical::default(),
            frequency: None,
            position: None,
            force: None,
            pins: (0..size).map(Pin::new).collect(),
        }
    }

    /// A force-defined platform port: routed to a fixed location, no pins.
    pub fn forced(
        name: impl Into<String>,
        position: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            size: 1,
            electrical: Electrical::default(),
            frequency: None,
            position: Some(position.into()),
            force: Some(value.into()),
            pins: Vec::new(),
        }
    }

    pub fn is_force_defined(&self) -> bool {
        self.force.is_some()
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, index: usize) -> Option<&Pin> {
        self.pins.get(index)
    }

    /// True when every bit carries at least one connection.
    pub fn is_fully_connected(&self) -> bool {
        !self.pins.is_empty() && self.pins.iter().all(Pin::is_connected)
    }

    pub(crate) fn pin_mut(&mut self, index: usize) -> Result<&mut Pin> {
        let size = self.pins.len();
        self.pins
            .get_mut(index)
            .ok_or_else(|| ModelError::PinOutOfRange {
                port: self.name.clone(),
                pin: index,
                size,
            })
    }
}

/// A named group of ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    ports: IndexMap<String, Port>,
}

impl Interface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: IndexMap::new(),
        }
    }

    /// Add a port, rejecting duplicate names.
    pub fn add_port(&mut self, port: Port) -> Result<()> {
        if self.ports.contains_key(&port.name) {
            return Err(ModelError::DuplicateName {
                kind: "port",
                name: port.name,
                scope: self.name.clone(),
            });
        }
        self.ports.insert(port.name.clone(), port);
        Ok(())
    }

    /// Ports in declaration order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.values()
    }

    pub fn port(&self, name: &str) -> Result<&Port> {
        self.ports.get(name).ok_or_else(|| ModelError::PortNotFound {
            interface: self.name.clone(),
            port: name.to_string(),
        })
    }

    pub(crate) fn port_mut(&mut self, name: &str) -> Result<&mut Port> {
        let interface = self.name.clone();
        self.ports
            .get_mut(name)
            .ok_or_else(|| ModelError::PortNotFound {
                interface,
                port: name.to_string(),
            })
    }
}
