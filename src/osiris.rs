use std::path::Path;

use hdf5::File;
use ndarray::ArrayD;
use tracing::debug;

use crate::consts;
use crate::error::{FieldError, Result};
use crate::h5::{self, H5Object};
use crate::metadata::{normalize_units, AxisData, AxisName, FieldInfo, FieldMetadata, Geometry, TimeData};

fn axis_path(n: usize) -> String {
    format!("/{}/AXIS{}", consts::OSIRIS_AXIS_GROUP, n)
}

/// Determines the geometry from the axis description entries. A 2D file whose second
/// axis is named `r` is cylindrical.
pub fn determine_geometry(file: &File) -> Result<Geometry> {
    let axis_group = file
        .group(consts::OSIRIS_AXIS_GROUP)
        .map_err(|_| FieldError::UnsupportedGeometry("no AXIS group".to_string()))?;
    if axis_group.link_exists("AXIS3") {
        Ok(Geometry::Cartesian3D)
    } else if axis_group.link_exists("AXIS2") {
        let axis2 = H5Object::open(file, &axis_path(2))?;
        let radial = h5::has_attr(axis2.location(), consts::OSIRIS_NAME_ATTR)
            && normalize_units(&h5::read_string_attr(axis2.location(), consts::OSIRIS_NAME_ATTR)?) == "r";
        if radial {
            Ok(Geometry::Cylindrical2D)
        } else {
            Ok(Geometry::Cartesian2D)
        }
    } else if axis_group.link_exists("AXIS1") {
        Ok(Geometry::OneD)
    } else {
        Err(FieldError::UnsupportedGeometry("no AXIS1 description".to_string()))
    }
}

/// Names of AXIS1, AXIS2, ... for a geometry, which is its canonical axis order
fn axis_names(geometry: Geometry) -> Result<&'static [AxisName]> {
    match geometry {
        Geometry::ThetaMode => Err(FieldError::UnsupportedGeometry(geometry.to_string())),
        _ => Ok(geometry.canonical_axes()),
    }
}

fn bound(values: &[f64], i: usize, name: &str) -> Result<f64> {
    values
        .get(i)
        .copied()
        .ok_or_else(|| FieldError::missing(&format!("{name}[{i}]"), "/"))
}

/// Axes in dataset order. Datasets are stored with the AXIS numbering reversed, so the
/// last dimension runs along AXIS1.
fn read_axes(file: &File, geometry: Geometry, shape: &[usize]) -> Result<Vec<AxisData>> {
    let names = axis_names(geometry)?;
    if shape.len() != names.len() {
        return Err(FieldError::InvalidArgument(format!(
            "{geometry} field with {} dimensions",
            shape.len()
        )));
    }
    let xmin = h5::read_f64_attrs(file, consts::XMIN_ATTR)?;
    let xmax = h5::read_f64_attrs(file, consts::XMAX_ATTR)?;

    let mut axes = Vec::with_capacity(names.len());
    for (k, &name) in names.iter().enumerate() {
        let axis = H5Object::open(file, &axis_path(k + 1))?;
        let units = normalize_units(&h5::read_string_attr(axis.location(), consts::OSIRIS_UNITS_ATTR)?);
        let n_cells = shape[names.len() - 1 - k];
        axes.push(AxisData::from_bounds(
            name,
            &units,
            bound(&xmin, k, consts::XMIN_ATTR)?,
            bound(&xmax, k, consts::XMAX_ATTR)?,
            n_cells,
        ));
    }
    axes.reverse();
    Ok(axes)
}

fn read_time(file: &File) -> Result<TimeData> {
    Ok(TimeData {
        value: h5::read_f64_attr(file, consts::TIME_ATTR)?,
        units: normalize_units(&h5::read_string_attr(file, consts::OSIRIS_TIME_UNITS_ATTR)?),
    })
}

pub fn read_field_metadata(file_path: &Path, field_path: &str) -> Result<FieldMetadata> {
    let file = File::open(file_path)?;
    let field = file
        .dataset(field_path)
        .map_err(|_| FieldError::FieldNotFound(field_path.to_string()))?;
    let units = normalize_units(&h5::read_string_attr(&field, consts::OSIRIS_UNITS_ATTR)?);
    let geometry = determine_geometry(&file)?;
    let axes = read_axes(&file, geometry, &field.shape())?;
    let time = read_time(&file)?;
    debug!(field = field_path, %geometry, "read Osiris metadata");
    Ok(FieldMetadata {
        field: FieldInfo { units, geometry },
        axes,
        time,
    })
}

/// Reads the whole field, dimensions ordered as the metadata axes
pub fn read_field(file_path: &Path, field_path: &str) -> Result<ArrayD<f64>> {
    let file = File::open(file_path)?;
    h5::read_dataset(&file, field_path)
}
