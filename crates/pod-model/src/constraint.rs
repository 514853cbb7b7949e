//! Constraints authored by components themselves.

/// Kind of a component-declared constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    /// `clk`: a clock net with a known frequency.
    Clock,
    /// `placement`: a location lock for an internal primitive.
    Placement,
    /// Anything else. Kept so generation can reject it explicitly.
    Other(String),
}

impl ConstraintKind {
    pub fn as_str(&self) -> &str {
        match self {
            ConstraintKind::Clock => "clk",
            ConstraintKind::Placement => "placement",
            ConstraintKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for ConstraintKind {
    fn from(kind: &str) -> Self {
        match kind {
            "clk" => ConstraintKind::Clock,
            "placement" => ConstraintKind::Placement,
            other => ConstraintKind::Other(other.to_string()),
        }
    }
}

/// A clock or placement hint attached to an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    /// Target path inside the instance (e.g. `pll/clkout0`).
    pub name: String,
    /// Clock frequency in Hz (`clk`).
    pub frequency: Option<f64>,
    /// Target device location (`placement`).
    pub loc: Option<String>,
}

impl Constraint {
    pub fn clock(name: impl Into<String>, frequency: f64) -> Self {
        Self {
            kind: ConstraintKind::Clock,
            name: name.into(),
            frequency: Some(frequency),
            loc: None,
        }
    }

    pub fn placement(name: impl Into<String>, loc: impl Into<String>) -> Self {
        Self {
            kind: ConstraintKind::Placement,
            name: name.into(),
            frequency: None,
            loc: Some(loc.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_str() {
        assert_eq!(ConstraintKind::from("clk"), ConstraintKind::Clock);
        assert_eq!(ConstraintKind::from("placement"), ConstraintKind::Placement);
        assert_eq!(
            ConstraintKind::from("area"),
            ConstraintKind::Other("area".into())
        );
        assert_eq!(ConstraintKind::from("area").as_str(), "area");
    }
}
