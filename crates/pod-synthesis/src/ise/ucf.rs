//! Xilinx UCF rendering.

use std::fmt;

use crate::resolve::{ComponentConstraint, PinAssignment, ResolvedConstraints};

/// A resolved constraint set in UCF syntax.
pub struct UcfFile<'a>(pub &'a ResolvedConstraints);

/// Render `resolved` as UCF text.
pub fn render(resolved: &ResolvedConstraints) -> String {
    UcfFile(resolved).to_string()
}

impl fmt::Display for UcfFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Constraint file, automatically generated by pod")?;
        for pin in &self.0.pins {
            write_pin(f, pin)?;
        }

        writeln!(f, "# components constraints")?;
        for constraint in &self.0.components {
            match constraint {
                ComponentConstraint::Clock { path, period_ns } => {
                    write_timespec(f, path, *period_ns)?;
                }
                ComponentConstraint::Placement { path, location } => {
                    writeln!(f, "INST \"{path}\" LOC={location};")?;
                }
            }
        }
        writeln!(f, "#end")
    }
}

fn write_pin(f: &mut fmt::Formatter<'_>, pin: &PinAssignment) -> fmt::Result {
    write!(f, "NET \"{}\" LOC=\"{}\"", pin.net, pin.location)?;
    if let Some(option) = &pin.option {
        write!(f, " | {option}")?;
    }
    if let Some(standard) = &pin.standard {
        write!(f, " | IOSTANDARD={standard}")?;
    }
    if let Some(drive) = &pin.drive {
        write!(f, " | DRIVE={drive}")?;
    }
    writeln!(f, "; # {}", pin.platform_port)?;

    if let Some(period) = pin.period_ns {
        write_timespec(f, &pin.net, period)?;
    }
    Ok(())
}

fn write_timespec(f: &mut fmt::Formatter<'_>, net: &str, period: f64) -> fmt::Result {
    writeln!(f, "NET \"{net}\" TNM_NET = \"{net}\";")?;
    writeln!(
        f,
        "TIMESPEC \"TS_{}\" = PERIOD \"{net}\" {} ns HIGH 50%;",
        timespec_name(net),
        format_period(period)
    )
}

/// TS identifier for `net`: hierarchy separators and bus brackets become
/// `_`, so `pll0_refclk<0>` gives `pll0_refclk_0`.
pub fn timespec_name(net: &str) -> String {
    let name: String = net
        .chars()
        .map(|c| match c {
            '/' | '<' | '>' => '_',
            c => c,
        })
        .collect();
    name.trim_end_matches('_').to_string()
}

/// C `%g` with six significant digits: `20`, `6.66667`, `0.5`, `1e+06`.
pub fn format_period(ns: f64) -> String {
    if ns == 0.0 || !ns.is_finite() {
        return ns.to_string();
    }
    // Round to six significant digits first; the rounded exponent picks the form.
    let scientific = format!("{ns:.5e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..6).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.unsigned_abs()
        );
    }
    let decimals = (5 - exponent) as usize;
    trim_fraction(&format!("{ns:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
