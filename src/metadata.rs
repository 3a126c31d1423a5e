use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

use crate::error::{FieldError, Result};

/// Dimensional/coordinate class of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Geometry {
    OneD,
    Cartesian2D,
    Cartesian3D,
    Cylindrical2D,
    ThetaMode,
}

impl Geometry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Geometry::OneD => "1d",
            Geometry::Cartesian2D => "2dcartesian",
            Geometry::Cartesian3D => "3dcartesian",
            Geometry::Cylindrical2D => "2dcylindrical",
            Geometry::ThetaMode => "thetaMode",
        }
    }

    /// Axis set a field of this geometry carries as stored on disk. thetaMode
    /// fields resolved to a Cartesian volume carry `CARTESIAN_3D_AXES` instead.
    pub fn canonical_axes(&self) -> &'static [AxisName] {
        match self {
            Geometry::OneD => &[AxisName::Z],
            Geometry::Cartesian2D => &[AxisName::Z, AxisName::X],
            Geometry::Cartesian3D => &[AxisName::Z, AxisName::X, AxisName::Y],
            Geometry::Cylindrical2D => &[AxisName::Z, AxisName::R],
            Geometry::ThetaMode => &[AxisName::R, AxisName::Z],
        }
    }
}

pub const CARTESIAN_3D_AXES: [AxisName; 3] = [AxisName::X, AxisName::Y, AxisName::Z];

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Geometry {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1d" => Ok(Geometry::OneD),
            "2dcartesian" => Ok(Geometry::Cartesian2D),
            "3dcartesian" => Ok(Geometry::Cartesian3D),
            "2dcylindrical" => Ok(Geometry::Cylindrical2D),
            "thetaMode" => Ok(Geometry::ThetaMode),
            other => Err(FieldError::UnsupportedGeometry(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisName {
    X,
    Y,
    Z,
    R,
}

impl AxisName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisName::X => "x",
            AxisName::Y => "y",
            AxisName::Z => "z",
            AxisName::R => "r",
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisName {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x" => Ok(AxisName::X),
            "y" => Ok(AxisName::Y),
            "z" => Ok(AxisName::Z),
            "r" => Ok(AxisName::R),
            other => Err(FieldError::InvalidArgument(format!("unknown axis `{other}`"))),
        }
    }
}

/// Coordinates and units of one field axis. `array` is an owned copy, it
/// never borrows from the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisData {
    pub name: AxisName,
    pub units: String,
    pub array: Array1<f64>,
}

impl AxisData {
    /// Axis whose coordinates are the `n_cells + 1` cell edges between `min` and `max`
    pub fn from_bounds(name: AxisName, units: &str, min: f64, max: f64, n_cells: usize) -> AxisData {
        AxisData {
            name,
            units: units.to_string(),
            array: Array1::linspace(min, max, n_cells + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub units: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeData {
    pub value: f64,
    pub units: String,
}

/// Code-agnostic description of a field read.
///
/// * field: units and geometry of the field itself
/// * axes: one entry per array dimension, slowest-varying first
/// * time: simulation time of the dump
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    pub field: FieldInfo,
    pub axes: Vec<AxisData>,
    pub time: TimeData,
}

impl FieldMetadata {
    pub fn axis(&self, name: AxisName) -> Option<&AxisData> {
        self.axes.iter().find(|axis| axis.name == name)
    }

    pub fn axis_names(&self) -> Vec<AxisName> {
        self.axes.iter().map(|axis| axis.name).collect()
    }

    pub fn remove_axis(&mut self, name: AxisName) -> Result<AxisData> {
        let idx = self
            .axes
            .iter()
            .position(|axis| axis.name == name)
            .ok_or(FieldError::AxisNotFound(name))?;
        Ok(self.axes.remove(idx))
    }

    /// Replaces axis `name` by `replacements`, keeping its position in the
    /// axis order.
    pub fn replace_axis(&mut self, name: AxisName, replacements: Vec<AxisData>) -> Result<()> {
        let idx = self
            .axes
            .iter()
            .position(|axis| axis.name == name)
            .ok_or(FieldError::AxisNotFound(name))?;
        self.axes.splice(idx..=idx, replacements);
        Ok(())
    }
}

/// Cleans a unit label read from a file: drops a `b'...'` byte-string marker,
/// turns doubled backslashes into single ones and removes whitespace.
pub fn normalize_units(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("b'")
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(trimmed);
    inner
        .replace("\\\\", "\\")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
