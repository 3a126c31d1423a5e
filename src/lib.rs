pub mod consts;
pub mod error;
pub mod metadata;
pub mod utils;
pub mod slicing;
pub mod h5;
pub mod circ;
pub mod osiris;
pub mod hipace;
pub mod openpmd;
pub mod reader;

#[cfg(test)]
mod fixtures;

use std::path::Path;

use hdf5::types::VarLenUnicode;
use hdf5::Location;
use ndarray::{ArrayD, ArrayView1};

pub use crate::circ::{MaxResolution, ModeSelection};
pub use crate::error::{FieldError, Result};
pub use crate::metadata::{AxisData, AxisName, FieldInfo, FieldMetadata, Geometry, TimeData};
pub use crate::reader::{read_field, read_field_metadata, Backend, ReadOptions};

fn unicode(value: &str) -> Result<VarLenUnicode> {
    value
        .parse::<VarLenUnicode>()
        .map_err(|e| FieldError::InvalidArgument(format!("cannot store `{value}`: {e}")))
}

fn write_str_attr(loc: &Location, name: &str, value: &str) -> Result<()> {
    loc.new_attr::<VarLenUnicode>()
        .create(name)?
        .write_scalar(&unicode(value)?)?;
    Ok(())
}

/// Saves a normalized field and its metadata into a new hdf5 file, so that results can
/// be looked at without knowing the layout of the simulation code.
///
/// Layout: `/field` with `units` and `geometry` attributes, `/axes/<name>` per axis with
/// a `units` attribute, the axis order as the `order` attribute of `/axes`, and the time
/// as root attributes.
pub fn save_hdf5(field: &ArrayD<f64>, metadata: &FieldMetadata, filename: impl AsRef<Path>) -> Result<()> {
    let file = hdf5::File::create(filename)?;

    let dataset = file.new_dataset::<f64>()
        .shape(field.shape().to_vec())
        .create("field")?;
    dataset.write(field)?;
    write_str_attr(&dataset, "units", &metadata.field.units)?;
    write_str_attr(&dataset, "geometry", metadata.field.geometry.as_str())?;

    let axes = file.create_group("axes")?;
    for axis in &metadata.axes {
        let axis_dataset = axes.new_dataset::<f64>()
            .shape([axis.array.len()])
            .create(axis.name.as_str())?;
        axis_dataset.write(&axis.array)?;
        write_str_attr(&axis_dataset, "units", &axis.units)?;
    }
    let order = metadata.axes.iter()
        .map(|axis| unicode(axis.name.as_str()))
        .collect::<Result<Vec<_>>>()?;
    axes.new_attr::<VarLenUnicode>()
        .shape((order.len(),))
        .create("order")?
        .write(ArrayView1::from(order.as_slice()))?;

    file.new_attr::<f64>()
        .create("time")?
        .write_scalar(&metadata.time.value)?;
    write_str_attr(&file, "time_units", &metadata.time.units)?;

    Ok(())
}
