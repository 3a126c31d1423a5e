use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Dataset, File, Group, Location};
use ndarray::ArrayD;

use crate::error::{FieldError, Result};

// Longest fixed-length string attribute we expect to find in a header
const MAX_FIXED_STRING: usize = 256;

/// A named object in a file that can carry attributes. openPMD records are
/// groups for vector quantities and datasets for scalar ones.
pub enum H5Object {
    Group(Group),
    Dataset(Dataset),
}

impl H5Object {
    pub fn open(file: &File, path: &str) -> Result<H5Object> {
        if let Ok(group) = file.group(path) {
            return Ok(H5Object::Group(group));
        }
        file.dataset(path)
            .map(H5Object::Dataset)
            .map_err(|_| FieldError::FieldNotFound(path.to_string()))
    }

    pub fn location(&self) -> &Location {
        match self {
            H5Object::Group(group) => group,
            H5Object::Dataset(dataset) => dataset,
        }
    }
}

fn attr(loc: &Location, name: &str) -> Result<Attribute> {
    loc.attr(name)
        .map_err(|_| FieldError::missing(name, &loc.name()))
}

pub fn has_attr(loc: &Location, name: &str) -> bool {
    loc.attr(name).is_ok()
}

/// Reads every element of a numeric attribute, scalars come back as a single
/// element.
pub fn read_f64_attrs(loc: &Location, name: &str) -> Result<Vec<f64>> {
    Ok(attr(loc, name)?.read_raw::<f64>()?)
}

pub fn read_f64_attr(loc: &Location, name: &str) -> Result<f64> {
    read_f64_attrs(loc, name)?
        .first()
        .copied()
        .ok_or_else(|| FieldError::missing(name, &loc.name()))
}

/// Reads a string (or string array) attribute regardless of whether it was
/// written as fixed or variable length, ascii or utf-8.
pub fn read_string_attrs(loc: &Location, name: &str) -> Result<Vec<String>> {
    let attr = attr(loc, name)?;
    let strings = match attr.dtype()?.to_descriptor()? {
        TypeDescriptor::VarLenUnicode => attr
            .read_raw::<VarLenUnicode>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::VarLenAscii => attr
            .read_raw::<VarLenAscii>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::FixedAscii(_) => attr
            .read_raw::<FixedAscii<MAX_FIXED_STRING>>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        TypeDescriptor::FixedUnicode(_) => attr
            .read_raw::<FixedUnicode<MAX_FIXED_STRING>>()?
            .iter()
            .map(|s| s.as_str().to_string())
            .collect(),
        other => {
            return Err(FieldError::InvalidArgument(format!(
                "attribute `{name}` is not a string ({other:?})"
            )))
        }
    };
    Ok(strings)
}

pub fn read_string_attr(loc: &Location, name: &str) -> Result<String> {
    read_string_attrs(loc, name)?
        .into_iter()
        .next()
        .ok_or_else(|| FieldError::missing(name, &loc.name()))
}

/// Reads a whole dataset into memory. The returned array owns its data.
pub fn read_dataset(file: &File, path: &str) -> Result<ArrayD<f64>> {
    let dataset = file
        .dataset(path)
        .map_err(|_| FieldError::FieldNotFound(path.to_string()))?;
    Ok(dataset.read_dyn::<f64>()?)
}

pub fn dataset_shape(file: &File, path: &str) -> Result<Vec<usize>> {
    let dataset = file
        .dataset(path)
        .map_err(|_| FieldError::FieldNotFound(path.to_string()))?;
    Ok(dataset.shape())
}
