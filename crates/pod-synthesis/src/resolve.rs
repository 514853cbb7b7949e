//! Pin and constraint resolution.
//!
//! Walks the platform's physical ports and resolves each pin to at most one
//! net on the instance side, then collects component-declared constraints.
//! The result is vendor-neutral; toolchains render it in their own syntax.
//!
//! Resolution is deterministic: ambiguous pins are arbitrated on the sorted
//! `<instance>_<port>` label, never on connection order.

use serde::Serialize;

use pod_model::{Connection, ConstraintKind, Design, Port};

use crate::error::{Result, SynthesisError};
use crate::sink::MessageSink;

/// One net bound to a platform location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PinAssignment {
    /// Net name as it appears in the constraint file.
    pub net: String,
    /// Package location.
    pub location: String,
    /// Platform port the location belongs to.
    pub platform_port: String,
    pub option: Option<String>,
    pub standard: Option<String>,
    pub drive: Option<String>,
    /// Clock period for nets driven by a declared frequency.
    pub period_ns: Option<f64>,
}

/// A constraint authored by a component, scoped to its instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ComponentConstraint {
    /// Timing constraint on `<instance>/<target>`.
    Clock { path: String, period_ns: f64 },
    /// Location lock of `<instance>/<target>`.
    Placement { path: String, location: String },
}

/// Everything a constraint file needs, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedConstraints {
    pub pins: Vec<PinAssignment>,
    pub components: Vec<ComponentConstraint>,
}

/// Resolve all platform pins and component constraints of `design`.
///
/// Fails on the first structural error; nothing partial is returned.
pub fn resolve(design: &Design, sink: &dyn MessageSink) -> Result<ResolvedConstraints> {
    let mut pins = Vec::new();
    for interface in design.platform().interfaces() {
        for port in interface.ports() {
            if let Some(assignment) = resolve_port(design, port, sink)? {
                pins.push(assignment);
            }
        }
    }

    Ok(ResolvedConstraints {
        pins,
        components: resolve_components(design)?,
    })
}

fn resolve_port(
    design: &Design,
    port: &Port,
    sink: &dyn MessageSink,
) -> Result<Option<PinAssignment>> {
    let location = port.position.clone().unwrap_or_default();

    if port.is_force_defined() {
        return Ok(Some(PinAssignment {
            net: format!("force_{}", port.name),
            location,
            platform_port: port.name.clone(),
            option: None,
            standard: port.electrical.standard.clone(),
            drive: port.electrical.drive.clone(),
            period_ns: None,
        }));
    }

    // Physical pins are scalar; a wider platform port is a modelling error.
    let [pin] = port.pins() else {
        return Err(SynthesisError::MalformedPortWidth {
            port: port.name.clone(),
            size: port.size,
        });
    };

    let Some(connection) = arbitrate(port, &pin.connections, sink) else {
        return Ok(None);
    };
    let destination = design.destination_port(connection)?;
    let dest = &destination.electrical;
    let source = &port.electrical;

    Ok(Some(PinAssignment {
        net: net_name(connection, destination),
        location,
        platform_port: port.name.clone(),
        option: dest.option.clone().or_else(|| source.option.clone()),
        standard: dest.standard.clone().or_else(|| source.standard.clone()),
        drive: dest.drive.clone().or_else(|| source.drive.clone()),
        period_ns: destination.frequency.map(period_ns),
    }))
}

/// Pick the connection a platform pin drives.
fn arbitrate<'c>(
    port: &Port,
    connections: &'c [Connection],
    sink: &dyn MessageSink,
) -> Option<&'c Connection> {
    match connections {
        [] => None,
        [only] => Some(only),
        candidates => {
            sink.warn(&format!("several pins connected to {}", port.name));
            for candidate in candidates {
                sink.warn(&format!("      -> {candidate}"));
            }
            let chosen = candidates
                .iter()
                .min_by(|a, b| arbitration_key(a).cmp(&arbitration_key(b)))?;
            sink.info(&format!("connection name: {chosen}"));
            Some(chosen)
        }
    }
}

/// Label first; interface and pin only break ties between equal labels.
fn arbitration_key(connection: &Connection) -> (String, &str, usize) {
    (
        connection.label(),
        connection.interface.as_str(),
        connection.pin,
    )
}

/// Net name for the bit `connection` lands on.
///
/// A fully wired vector shares one indexed net (`base<i>`); a partially wired
/// one gets a scalar net per bit (`base_pin<i>`) since gaps would make the
/// vector ambiguous.
pub fn net_name(connection: &Connection, destination: &Port) -> String {
    let base = connection.label();
    if destination.size == 1 {
        base
    } else if destination.is_fully_connected() {
        format!("{base}<{}>", connection.pin)
    } else {
        format!("{base}_pin{}", connection.pin)
    }
}

/// Period in nanoseconds of a clock at `frequency_hz`.
pub fn period_ns(frequency_hz: f64) -> f64 {
    1.0e9 / frequency_hz
}

fn resolve_components(design: &Design) -> Result<Vec<ComponentConstraint>> {
    let mut out = Vec::new();
    for instance in design.instances() {
        for constraint in &instance.constraints {
            let missing = |attribute| SynthesisError::MissingConstraintAttribute {
                instance: instance.name.clone(),
                constraint: constraint.name.clone(),
                attribute,
            };
            let path = format!("{}/{}", instance.name, constraint.name);
            match &constraint.kind {
                ConstraintKind::Clock => {
                    let frequency = constraint
                        .frequency
                        .filter(|f| *f > 0.0)
                        .ok_or_else(|| missing("frequency"))?;
                    out.push(ComponentConstraint::Clock {
                        path,
                        period_ns: period_ns(frequency),
                    });
                }
                ConstraintKind::Placement => {
                    let location = constraint.loc.clone().ok_or_else(|| missing("loc"))?;
                    out.push(ComponentConstraint::Placement { path, location });
                }
                ConstraintKind::Other(kind) => {
                    return Err(SynthesisError::UnknownConstraintType {
                        instance: instance.name.clone(),
                        kind: kind.clone(),
                    });
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::sink::MemorySink;

    const PLATFORM: &str = r#"
[platform]
name = "board"
family = "spartan3"
device = "xc3s200a"
package = "ft256"
speed = "-4"

[[platform.interfaces]]
name = "fpga"

[[platform.interfaces.ports]]
name = "CLK0"
position = "N9"
standard = "LVCMOS33"

[[platform.interfaces.ports]]
name = "IO0"
position = "A1"
standard = "LVCMOS33"
drive = "8"

[[platform.interfaces.ports]]
name = "IO1"
position = "A2"
standard = "LVCMOS33"

[[platform.interfaces.ports]]
name = "IO2"
position = "A3"
standard = "LVCMOS33"
option = "PULLUP"
"#;

    fn design(rest: &str) -> Design {
        Design::from_toml_str(&format!("{PLATFORM}{rest}")).unwrap()
    }

    fn resolve_quiet(design: &Design) -> Result<ResolvedConstraints> {
        resolve(design, &MemorySink::new())
    }

    #[test]
    fn clock_pin_gets_period() {
        let d = design(
            r#"
[[instances]]
name = "pll0"
component = "pll"
[[instances.interfaces]]
name = "clk"
[[instances.interfaces.ports]]
name = "refclk"
frequency = 50000000.0

[[wires]]
from = "board.fpga.CLK0.0"
to = "pll0.clk.refclk.0"
"#,
        );
        let resolved = resolve_quiet(&d).unwrap();
        assert_eq!(resolved.pins.len(), 1);
        let pin = &resolved.pins[0];
        assert_eq!(pin.net, "pll0_refclk");
        assert_eq!(pin.location, "N9");
        assert_eq!(pin.platform_port, "CLK0");
        assert_eq!(pin.standard.as_deref(), Some("LVCMOS33"));
        assert_eq!(pin.period_ns, Some(20.0));
    }

    #[test]
    fn unconnected_pins_are_silent() {
        let resolved = resolve_quiet(&design("")).unwrap();
        assert!(resolved.pins.is_empty());
        assert!(resolved.components.is_empty());
    }

    const TWO_CANDIDATES: &str = r#"
[[instances]]
name = "compA"
component = "sink"
[[instances.interfaces]]
name = "bus"
[[instances.interfaces.ports]]
name = "dataIn"

[[instances]]
name = "compB"
component = "sink"
num = 1
[[instances.interfaces]]
name = "bus"
[[instances.interfaces.ports]]
name = "dataIn"
"#;

    #[test]
    fn ambiguous_pin_picks_smallest_label_in_any_order() {
        for (first, second) in [("compB", "compA"), ("compA", "compB")] {
            let d = design(&format!(
                r#"{TWO_CANDIDATES}
[[wires]]
from = "board.fpga.IO0.0"
to = "{first}.bus.dataIn.0"

[[wires]]
from = "board.fpga.IO0.0"
to = "{second}.bus.dataIn.0"
"#
            ));
            let sink = MemorySink::new();
            let resolved = resolve(&d, &sink).unwrap();
            assert_eq!(resolved.pins.len(), 1);
            assert_eq!(resolved.pins[0].net, "compA_dataIn");

            let warnings = sink.messages(Severity::Warning);
            assert_eq!(warnings[0], "several pins connected to IO0");
            assert_eq!(warnings.len(), 3);
        }
    }

    #[test]
    fn fully_connected_vector_uses_indexed_net() {
        let d = design(
            r#"
[[instances]]
name = "led0"
component = "led"
[[instances.interfaces]]
name = "gpio"
[[instances.interfaces.ports]]
name = "data"
size = 2

[[wires]]
from = "board.fpga.IO0.0"
to = "led0.gpio.data.0"

[[wires]]
from = "board.fpga.IO1.0"
to = "led0.gpio.data.1"
"#,
        );
        let nets: Vec<String> = resolve_quiet(&d)
            .unwrap()
            .pins
            .into_iter()
            .map(|p| p.net)
            .collect();
        assert_eq!(nets, vec!["led0_data<0>", "led0_data<1>"]);
    }

    #[test]
    fn partially_connected_vector_uses_scalar_nets() {
        let d = design(
            r#"
[[instances]]
name = "led0"
component = "led"
[[instances.interfaces]]
name = "gpio"
[[instances.interfaces.ports]]
name = "data"
size = 3

[[wires]]
from = "board.fpga.IO0.0"
to = "led0.gpio.data.0"

[[wires]]
from = "board.fpga.IO2.0"
to = "led0.gpio.data.2"
"#,
        );
        let nets: Vec<String> = resolve_quiet(&d)
            .unwrap()
            .pins
            .into_iter()
            .map(|p| p.net)
            .collect();
        assert_eq!(nets, vec!["led0_data_pin0", "led0_data_pin2"]);
    }

    #[test]
    fn destination_attributes_win() {
        let d = design(
            r#"
[[instances]]
name = "uart0"
component = "uart"
[[instances.interfaces]]
name = "serial"
[[instances.interfaces.ports]]
name = "tx"
standard = "LVTTL"
[[instances.interfaces.ports]]
name = "rx"
drive = "12"

[[wires]]
from = "board.fpga.IO0.0"
to = "uart0.serial.tx.0"

[[wires]]
from = "board.fpga.IO2.0"
to = "uart0.serial.rx.0"
"#,
        );
        let resolved = resolve_quiet(&d).unwrap();
        let tx = &resolved.pins[0];
        assert_eq!(tx.standard.as_deref(), Some("LVTTL"));
        assert_eq!(tx.drive.as_deref(), Some("8"));
        assert_eq!(tx.option, None);
        assert_eq!(tx.period_ns, None);

        let rx = &resolved.pins[1];
        assert_eq!(rx.standard.as_deref(), Some("LVCMOS33"));
        assert_eq!(rx.drive.as_deref(), Some("12"));
        assert_eq!(rx.option.as_deref(), Some("PULLUP"));
    }

    #[test]
    fn forced_port_binds_fixed_net() {
        let input = PLATFORM.to_string()
            + r#"
[[platform.interfaces.ports]]
name = "GND"
position = "P2"
standard = "LVCMOS33"
drive = "4"
force = "gnd"
"#;
        let d = Design::from_toml_str(&input).unwrap();
        let resolved = resolve_quiet(&d).unwrap();
        assert_eq!(resolved.pins.len(), 1);
        let gnd = &resolved.pins[0];
        assert_eq!(gnd.net, "force_GND");
        assert_eq!(gnd.location, "P2");
        assert_eq!(gnd.drive.as_deref(), Some("4"));
    }

    #[test]
    fn wide_platform_port_is_malformed() {
        let input = PLATFORM.to_string()
            + r#"
[[platform.interfaces.ports]]
name = "BUS"
position = "B1"
size = 2
"#;
        let d = Design::from_toml_str(&input).unwrap();
        let err = resolve_quiet(&d).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::MalformedPortWidth { ref port, size: 2 } if port == "BUS"
        ));
    }

    #[test]
    fn component_constraints() {
        let d = design(
            r#"
[[instances]]
name = "pll0"
component = "pll"

[[instances.constraints]]
type = "clk"
name = "dcm/clkfx"
frequency = 100000000.0

[[instances.constraints]]
type = "placement"
name = "dcm"
loc = "DCM_X0Y0"
"#,
        );
        let resolved = resolve_quiet(&d).unwrap();
        assert_eq!(
            resolved.components,
            vec![
                ComponentConstraint::Clock {
                    path: "pll0/dcm/clkfx".into(),
                    period_ns: 10.0,
                },
                ComponentConstraint::Placement {
                    path: "pll0/dcm".into(),
                    location: "DCM_X0Y0".into(),
                },
            ]
        );
    }

    #[test]
    fn unknown_constraint_type_aborts() {
        let d = design(
            r#"
[[instances]]
name = "pll0"
component = "pll"

[[instances.constraints]]
type = "area"
name = "dcm"
"#,
        );
        let err = resolve_quiet(&d).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::UnknownConstraintType { ref kind, .. } if kind == "area"
        ));
    }

    #[test]
    fn clock_constraint_without_frequency() {
        let d = design(
            r#"
[[instances]]
name = "pll0"
component = "pll"

[[instances.constraints]]
type = "clk"
name = "clkout"
"#,
        );
        assert!(matches!(
            resolve_quiet(&d),
            Err(SynthesisError::MissingConstraintAttribute {
                attribute: "frequency",
                ..
            })
        ));
    }

    #[test]
    fn period_from_frequency() {
        assert_eq!(period_ns(50_000_000.0), 20.0);
        assert_eq!(period_ns(1_000_000_000.0), 1.0);
    }
}
