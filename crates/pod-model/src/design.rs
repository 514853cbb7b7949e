//! Platform, instances, and the design that ties them together.

use indexmap::IndexMap;

use crate::constraint::Constraint;
use crate::error::{ModelError, Result};
use crate::port::{Connection, Interface, Port};

/// The target board: device identification plus physical I/O interfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Platform name; wires address platform ports through it.
    pub name: String,
    pub family: String,
    pub device: String,
    pub package: String,
    pub speed: String,
    interfaces: IndexMap<String, Interface>,
}

impl Platform {
    pub fn new(
        name: impl Into<String>,
        family: impl Into<String>,
        device: impl Into<String>,
        package: impl Into<String>,
        speed: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            family: family.into(),
            device: device.into(),
            package: package.into(),
            speed: speed.into(),
            interfaces: IndexMap::new(),
        }
    }

    pub fn add_interface(&mut self, interface: Interface) -> Result<()> {
        insert_interface(&mut self.interfaces, &self.name, interface)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.values()
    }

    pub fn interface(&self, name: &str) -> Result<&Interface> {
        lookup_interface(&self.interfaces, &self.name, name)
    }
}

/// A placed occurrence of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Unique instance name.
    pub name: String,
    /// Component this instance was created from.
    pub component: String,
    /// Ordinal among instances of the same component.
    pub num: usize,
    /// HDL source files shipped with the component.
    pub hdl_files: Vec<String>,
    pub constraints: Vec<Constraint>,
    interfaces: IndexMap<String, Interface>,
}

impl Instance {
    pub fn new(name: impl Into<String>, component: impl Into<String>, num: usize) -> Self {
        Self {
            name: name.into(),
            component: component.into(),
            num,
            hdl_files: Vec::new(),
            constraints: Vec::new(),
            interfaces: IndexMap::new(),
        }
    }

    pub fn add_interface(&mut self, interface: Interface) -> Result<()> {
        insert_interface(&mut self.interfaces, &self.name, interface)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.values()
    }

    pub fn interface(&self, name: &str) -> Result<&Interface> {
        lookup_interface(&self.interfaces, &self.name, name)
    }
}

fn insert_interface(
    map: &mut IndexMap<String, Interface>,
    owner: &str,
    interface: Interface,
) -> Result<()> {
    if map.contains_key(&interface.name) {
        return Err(ModelError::DuplicateName {
            kind: "interface",
            name: interface.name,
            scope: owner.to_string(),
        });
    }
    map.insert(interface.name.clone(), interface);
    Ok(())
}

fn lookup_interface<'a>(
    map: &'a IndexMap<String, Interface>,
    owner: &str,
    name: &str,
) -> Result<&'a Interface> {
    map.get(name).ok_or_else(|| ModelError::InterfaceNotFound {
        owner: owner.to_string(),
        interface: name.to_string(),
    })
}

/// A platform plus the instances wired onto it.
///
/// Built once by the loader and read-only afterwards; every query the
/// synthesis layer needs goes through the typed accessors here.
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    platform: Platform,
    instances: IndexMap<String, Instance>,
}

impl Design {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            instances: IndexMap::new(),
        }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Instances in declaration order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    pub fn instance(&self, name: &str) -> Result<&Instance> {
        self.instances
            .get(name)
            .ok_or_else(|| ModelError::InstanceNotFound {
                name: name.to_string(),
            })
    }

    /// Add an instance; names must be unique and distinct from the platform's.
    pub fn add_instance(&mut self, instance: Instance) -> Result<()> {
        if instance.name == self.platform.name || self.instances.contains_key(&instance.name) {
            return Err(ModelError::DuplicateName {
                kind: "instance",
                name: instance.name,
                scope: "design".to_string(),
            });
        }
        self.instances.insert(instance.name.clone(), instance);
        Ok(())
    }

    /// Resolve the port a connection points at (instance → interface → port).
    pub fn destination_port(&self, connection: &Connection) -> Result<&Port> {
        let interfaces = if connection.instance == self.platform.name {
            self.platform.interface(&connection.interface)?
        } else {
            self.instance(&connection.instance)?
                .interface(&connection.interface)?
        };
        interfaces.port(&connection.port)
    }

    /// Record a wire on both endpoint pins.
    pub fn connect(&mut self, a: &Connection, b: &Connection) -> Result<()> {
        // Validate both ends before touching either so a bad wire leaves no half-edge.
        self.port_mut(b)?.pin_mut(b.pin)?;
        self.port_mut(a)?.pin_mut(a.pin)?.connections.push(b.clone());
        self.port_mut(b)?.pin_mut(b.pin)?.connections.push(a.clone());
        Ok(())
    }

    fn port_mut(&mut self, endpoint: &Connection) -> Result<&mut Port> {
        let (owner, interfaces) = if endpoint.instance == self.platform.name {
            (&self.platform.name, &mut self.platform.interfaces)
        } else {
            let instance = self.instances.get_mut(&endpoint.instance).ok_or_else(|| {
                ModelError::InstanceNotFound {
                    name: endpoint.instance.clone(),
                }
            })?;
            (&instance.name, &mut instance.interfaces)
        };
        interfaces
            .get_mut(&endpoint.interface)
            .ok_or_else(|| ModelError::InterfaceNotFound {
                owner: owner.clone(),
                interface: endpoint.interface.clone(),
            })?
            .port_mut(&endpoint.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_design() -> Design {
        let mut platform = Platform::new("apf27", "spartan3", "xc3s200a", "ft256", "-4");
        let mut fpga = Interface::new("fpga");
        let mut clk = Port::new("CLK0", 1);
        clk.position = Some("N9".into());
        fpga.add_port(clk).unwrap();
        platform.add_interface(fpga).unwrap();

        let mut design = Design::new(platform);
        let mut pll = Instance::new("pll0", "pll", 0);
        let mut iface = Interface::new("clk");
        iface.add_port(Port::new("refclk", 1)).unwrap();
        pll.add_interface(iface).unwrap();
        design.add_instance(pll).unwrap();
        design
    }

    #[test]
    fn connect_records_both_directions() {
        let mut design = small_design();
        let board = Connection::new("apf27", "fpga", "CLK0", 0);
        let pll = Connection::new("pll0", "clk", "refclk", 0);
        design.connect(&board, &pll).unwrap();

        let clk = design.destination_port(&board).unwrap();
        assert_eq!(clk.pins()[0].connections, vec![pll.clone()]);
        let refclk = design.destination_port(&pll).unwrap();
        assert_eq!(refclk.pins()[0].connections, vec![board]);
        assert!(refclk.is_fully_connected());
    }

    #[test]
    fn connect_rejects_bad_endpoint_without_partial_edge() {
        let mut design = small_design();
        let board = Connection::new("apf27", "fpga", "CLK0", 0);
        let bad = Connection::new("pll0", "clk", "refclk", 3);
        assert!(matches!(
            design.connect(&board, &bad),
            Err(ModelError::PinOutOfRange { pin: 3, .. })
        ));
        let clk = design.destination_port(&board).unwrap();
        assert!(clk.pins()[0].connections.is_empty());
    }

    #[test]
    fn lookup_errors_are_typed() {
        let design = small_design();
        assert!(matches!(
            design.instance("uart0"),
            Err(ModelError::InstanceNotFound { .. })
        ));
        assert!(matches!(
            design.destination_port(&Connection::new("pll0", "bus", "x", 0)),
            Err(ModelError::InterfaceNotFound { .. })
        ));
        assert!(matches!(
            design.destination_port(&Connection::new("pll0", "clk", "x", 0)),
            Err(ModelError::PortNotFound { .. })
        ));
    }

    #[test]
    fn instance_may_not_shadow_platform() {
        let mut design = small_design();
        let err = design.add_instance(Instance::new("apf27", "x", 0)).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateName { kind: "instance", .. }));
    }
}
