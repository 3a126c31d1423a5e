// HiPACE files only carry the grid bounds and the time. Units are fixed by the kind of
// quantity, which only the file name tells.

use std::path::Path;

use hdf5::File;
use ndarray::ArrayD;
use tracing::{debug, warn};

use crate::consts;
use crate::error::{FieldError, Result};
use crate::h5;
use crate::metadata::{AxisData, FieldInfo, FieldMetadata, Geometry, TimeData};
use crate::reader::Backend;

// HiPACE only writes 3D fields, dimensions in the canonical (z, x, y) order
const GEOMETRY: Geometry = Geometry::Cartesian3D;

/// Units guessed from the file name. Unknown names give an empty string.
pub fn field_units(file_path: &Path) -> String {
    let name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if name.contains("field") {
        consts::HIPACE_FIELD_UNITS.to_string()
    } else if name.contains("density") {
        consts::HIPACE_DENSITY_UNITS.to_string()
    } else {
        warn!(file = %name, "cannot infer HiPACE units from file name");
        String::new()
    }
}

pub fn read_field_metadata(file_path: &Path, field_path: &str) -> Result<FieldMetadata> {
    let file = File::open(file_path)?;
    let shape = h5::dataset_shape(&file, field_path)?;
    let axes_names = GEOMETRY.canonical_axes();
    if shape.len() != axes_names.len() {
        return match shape.len() {
            1 => Err(FieldError::NotImplemented { backend: Backend::Hipace, geometry: Geometry::OneD }),
            2 => Err(FieldError::NotImplemented { backend: Backend::Hipace, geometry: Geometry::Cartesian2D }),
            n => Err(FieldError::InvalidArgument(format!("`{field_path}` has {n} dimensions"))),
        };
    }
    let xmin = h5::read_f64_attrs(&file, consts::XMIN_ATTR)?;
    let xmax = h5::read_f64_attrs(&file, consts::XMAX_ATTR)?;
    let mut axes = Vec::with_capacity(axes_names.len());
    for (i, &name) in axes_names.iter().enumerate() {
        let (Some(&min), Some(&max)) = (xmin.get(i), xmax.get(i)) else {
            return Err(FieldError::missing(&format!("XMIN/XMAX[{i}]"), "/"));
        };
        axes.push(AxisData::from_bounds(name, consts::HIPACE_LENGTH_UNITS, min, max, shape[i]));
    }
    let time = TimeData {
        value: h5::read_f64_attr(&file, consts::TIME_ATTR)?,
        units: consts::HIPACE_TIME_UNITS.to_string(),
    };
    debug!(field = field_path, "read HiPACE metadata");
    Ok(FieldMetadata {
        field: FieldInfo {
            units: field_units(file_path),
            geometry: GEOMETRY,
        },
        axes,
        time,
    })
}

pub fn read_field(file_path: &Path, field_path: &str) -> Result<ArrayD<f64>> {
    let file = File::open(file_path)?;
    h5::read_dataset(&file, field_path)
}
