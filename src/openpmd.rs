// openPMD meshes live under `/data/<iteration>/<meshesPath>`

use std::path::Path;

use hdf5::{File, Location};
use ndarray::{Array3, ArrayD, Ix3};
use tracing::{debug, warn};

use crate::circ::CylindricalGrid;
use crate::consts;
use crate::error::{FieldError, Result};
use crate::h5::{self, H5Object};
use crate::metadata::{AxisData, AxisName, FieldInfo, FieldMetadata, Geometry, TimeData};

/// Splits `E/z` into the record `E` and component `z`. Scalar records like `rho` have no
/// component.
pub fn split_field_path(field_path: &str) -> (&str, Option<&str>) {
    let trimmed = field_path.trim_matches('/');
    match trimmed.split_once('/') {
        Some((record, component)) => (record, Some(component)),
        None => (trimmed, None),
    }
}

/// Path of the (single) iteration group stored in a file
fn iteration_path(file: &File) -> Result<String> {
    let base = file
        .group(consts::OPENPMD_BASE_GROUP)
        .map_err(|_| FieldError::FieldNotFound(consts::OPENPMD_BASE_GROUP.to_string()))?;
    let iteration = base
        .member_names()?
        .into_iter()
        .find(|name| name.parse::<u64>().is_ok())
        .ok_or_else(|| FieldError::FieldNotFound(format!("{}/<iteration>", consts::OPENPMD_BASE_GROUP)))?;
    Ok(format!("/{}/{}", consts::OPENPMD_BASE_GROUP, iteration))
}

fn meshes_path(file: &File, iteration: &str) -> Result<String> {
    let meshes = if h5::has_attr(file, "meshesPath") {
        h5::read_string_attr(file, "meshesPath")?
    } else {
        consts::OPENPMD_DEFAULT_MESHES_PATH.to_string()
    };
    Ok(format!("{}/{}", iteration, meshes.trim_matches('/')))
}

/// Record and component a field path points to, resolved inside a file
struct MeshField {
    name: String,
    record: H5Object,
    dataset_path: String,
}

impl MeshField {
    fn open(file: &File, field_path: &str) -> Result<MeshField> {
        let iteration = iteration_path(file)?;
        let meshes = meshes_path(file, &iteration)?;
        let (name, component) = split_field_path(field_path);
        let record = H5Object::open(file, &format!("{meshes}/{name}"))?;
        let dataset_path = match component {
            Some(component) => format!("{meshes}/{name}/{component}"),
            None => format!("{meshes}/{name}"),
        };
        Ok(MeshField {
            name: name.to_string(),
            record,
            dataset_path,
        })
    }

    /// Dataset to take the grid shape from. Cartesian x/y components of thetaMode records
    /// are not stored, their shape is that of the radial component.
    fn shape_dataset_path(&self, file: &File) -> String {
        if file.dataset(&self.dataset_path).is_ok() {
            return self.dataset_path.clone();
        }
        match self.dataset_path.rsplit_once('/') {
            Some((record, "x" | "y")) => format!("{record}/r"),
            _ => self.dataset_path.clone(),
        }
    }
}

fn record_geometry(record: &Location, n_axes: usize) -> Result<Geometry> {
    let geometry = h5::read_string_attr(record, "geometry")?;
    match (geometry.as_str(), n_axes) {
        ("cartesian", 1) => Ok(Geometry::OneD),
        ("cartesian", 2) => Ok(Geometry::Cartesian2D),
        ("cartesian", 3) => Ok(Geometry::Cartesian3D),
        ("thetaMode", 2) => Ok(Geometry::ThetaMode),
        (other, n) => Err(FieldError::UnsupportedGeometry(format!("{other} ({n} axes)"))),
    }
}

/// Whether the per-axis attributes of a record are stored in Fortran order, i.e. reversed
/// with respect to the dataset dimensions
fn fortran_order(record: &Location) -> Result<bool> {
    Ok(h5::has_attr(record, "dataOrder") && h5::read_string_attr(record, "dataOrder")? == "F")
}

/// Per-axis attribute values put in dataset dimension order
fn in_dataset_order<T>(mut values: Vec<T>, fortran: bool) -> Vec<T> {
    if fortran {
        values.reverse();
    }
    values
}

/// Axis labels in the order of the dataset dimensions
fn axis_labels(record: &Location) -> Result<Vec<AxisName>> {
    let labels = h5::read_string_attrs(record, "axisLabels")?
        .iter()
        .map(|label| label.parse::<AxisName>())
        .collect::<Result<Vec<_>>>()?;
    Ok(in_dataset_order(labels, fortran_order(record)?))
}

/// SI units a record is given in. The three common field families are named explicitly,
/// anything else is spelled out from the record's `unitDimension`.
pub fn field_units(name: &str, record: &Location) -> String {
    match name {
        "E" => "V/m".to_string(),
        "B" => "T".to_string(),
        "rho" => "C/m^3".to_string(),
        _ => match h5::read_f64_attrs(record, "unitDimension") {
            Ok(dimension) => units_from_dimension(&dimension),
            Err(_) => {
                warn!(field = name, "no units known for field");
                String::new()
            }
        },
    }
}

/// Spells out an openPMD `unitDimension` (powers of m, kg, s, A, K, mol, cd) as a unit
/// string, e.g. `A m^-2` becomes "m^-2 A".
pub fn units_from_dimension(dimension: &[f64]) -> String {
    dimension
        .iter()
        .zip(consts::SI_BASE_UNITS)
        .filter(|(power, _)| **power != 0.0)
        .map(|(power, symbol)| {
            if *power == 1.0 {
                symbol.to_string()
            } else if power.fract() == 0.0 {
                format!("{symbol}^{}", *power as i64)
            } else {
                format!("{symbol}^{power}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_time(file: &File, iteration: &str) -> Result<TimeData> {
    let group = file.group(iteration)?;
    let time = h5::read_f64_attr(&group, "time")?;
    let unit = h5::read_f64_attr(&group, "timeUnitSI")?;
    Ok(TimeData {
        value: time * unit,
        units: consts::OPENPMD_TIME_UNITS.to_string(),
    })
}

struct GridParameters {
    labels: Vec<AxisName>,
    spacing: Vec<f64>,
    offset: Vec<f64>,
    unit_si: f64,
}

impl GridParameters {
    /// Labels, spacing and offset, all in dataset dimension order
    fn read(record: &Location) -> Result<GridParameters> {
        let fortran = fortran_order(record)?;
        Ok(GridParameters {
            labels: axis_labels(record)?,
            spacing: in_dataset_order(h5::read_f64_attrs(record, "gridSpacing")?, fortran),
            offset: in_dataset_order(h5::read_f64_attrs(record, "gridGlobalOffset")?, fortran),
            unit_si: h5::read_f64_attr(record, "gridUnitSI")?,
        })
    }

    fn spacing(&self, i: usize) -> Result<f64> {
        self.spacing
            .get(i)
            .map(|v| v * self.unit_si)
            .ok_or_else(|| FieldError::missing("gridSpacing", &self.labels[i].to_string()))
    }

    fn offset(&self, i: usize) -> Result<f64> {
        self.offset
            .get(i)
            .map(|v| v * self.unit_si)
            .ok_or_else(|| FieldError::missing("gridGlobalOffset", &self.labels[i].to_string()))
    }
}

/// Geometry, units, axes and time of an openPMD mesh field. `field_path` is relative to the
/// meshes group, e.g. `E/z` or `rho`.
pub fn read_field_metadata(file_path: &Path, field_path: &str) -> Result<FieldMetadata> {
    let file = File::open(file_path)?;
    let iteration = iteration_path(&file)?;
    let mesh = MeshField::open(&file, field_path)?;
    let record = mesh.record.location();

    let grid = GridParameters::read(record)?;
    let geometry = record_geometry(record, grid.labels.len())?;
    let shape = h5::dataset_shape(&file, &mesh.shape_dataset_path(&file))?;
    // thetaMode datasets carry the modes as a leading dimension
    let cells = match geometry {
        Geometry::ThetaMode => shape.get(1..).unwrap_or(&[]).to_vec(),
        _ => shape,
    };
    if cells.len() != grid.labels.len() {
        return Err(FieldError::InvalidArgument(format!(
            "`{field_path}` has {} grid dimensions but {} axis labels",
            cells.len(),
            grid.labels.len()
        )));
    }

    let mut axes = Vec::with_capacity(cells.len());
    for (i, (&name, &n)) in grid.labels.iter().zip(cells.iter()).enumerate() {
        let min = grid.offset(i)?;
        let max = min + grid.spacing(i)? * n as f64;
        let axis = if geometry == Geometry::ThetaMode && name == AxisName::R {
            // both sides of the axis
            AxisData::from_bounds(name, consts::OPENPMD_LENGTH_UNITS, -max, max, 2 * n)
        } else {
            AxisData::from_bounds(name, consts::OPENPMD_LENGTH_UNITS, min, max, n)
        };
        axes.push(axis);
    }

    let metadata = FieldMetadata {
        field: FieldInfo {
            units: field_units(&mesh.name, record),
            geometry,
        },
        axes,
        time: read_time(&file, &iteration)?,
    };
    debug!(field = field_path, %geometry, "read openPMD metadata");
    Ok(metadata)
}

fn unit_si(dataset: &Location) -> Result<f64> {
    if h5::has_attr(dataset, "unitSI") {
        h5::read_f64_attr(dataset, "unitSI")
    } else {
        Ok(1.0)
    }
}

/// Reads a Cartesian mesh component in SI units, dimensions ordered as in the metadata.
pub fn read_field(file_path: &Path, field_path: &str) -> Result<ArrayD<f64>> {
    let file = File::open(file_path)?;
    let mesh = MeshField::open(&file, field_path)?;
    let dataset = file
        .dataset(&mesh.dataset_path)
        .map_err(|_| FieldError::FieldNotFound(field_path.to_string()))?;
    let unit = unit_si(&dataset)?;
    let mut data = dataset.read_dyn::<f64>()?;
    if unit != 1.0 {
        data.mapv_inplace(|v| v * unit);
    }
    Ok(data)
}

/// Reads the mode coefficients (mode, r, z) and the grid of thetaMode components. All
/// components are read from one opening of the file.
pub fn read_circ_components(
    file_path: &Path,
    field_paths: &[String],
) -> Result<Vec<(Array3<f64>, CylindricalGrid)>> {
    let file = File::open(file_path)?;
    field_paths
        .iter()
        .map(|field_path| read_circ_component(&file, field_path))
        .collect()
}

fn read_circ_component(file: &File, field_path: &str) -> Result<(Array3<f64>, CylindricalGrid)> {
    let mesh = MeshField::open(file, field_path)?;
    let record = mesh.record.location();
    let grid = GridParameters::read(record)?;
    if record_geometry(record, grid.labels.len())? != Geometry::ThetaMode {
        return Err(FieldError::InvalidArgument(format!("`{field_path}` is not a thetaMode field")));
    }
    let r_idx = grid
        .labels
        .iter()
        .position(|name| *name == AxisName::R)
        .ok_or(FieldError::AxisNotFound(AxisName::R))?;
    let z_idx = grid
        .labels
        .iter()
        .position(|name| *name == AxisName::Z)
        .ok_or(FieldError::AxisNotFound(AxisName::Z))?;

    let dataset = file
        .dataset(&mesh.dataset_path)
        .map_err(|_| FieldError::FieldNotFound(field_path.to_string()))?;
    let position = in_dataset_order(h5::read_f64_attrs(&dataset, "position")?, fortran_order(record)?);
    let unit = unit_si(&dataset)?;
    let mut coeffs = dataset.read_dyn::<f64>()?.into_dimensionality::<Ix3>()?;
    if unit != 1.0 {
        coeffs.mapv_inplace(|v| v * unit);
    }
    let (_, nr, nz) = coeffs.dim();
    let cylindrical = CylindricalGrid {
        r_start: grid.offset(r_idx)?,
        dr: grid.spacing(r_idx)?,
        nr,
        r_position: position.get(r_idx).copied().unwrap_or(0.0),
        z_start: grid.offset(z_idx)?,
        dz: grid.spacing(z_idx)?,
        nz,
        z_position: position.get(z_idx).copied().unwrap_or(0.0),
    };
    debug!(field = field_path, modes = coeffs.dim().0, nr, nz, "read thetaMode coefficients");
    Ok((coeffs, cylindrical))
}
