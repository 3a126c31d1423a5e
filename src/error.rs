use thiserror::Error;

use crate::metadata::{AxisName, Geometry};
use crate::reader::Backend;

/// Everything that can go wrong while reading and normalizing a field.
///
/// Nothing here is retried, errors go straight back to the caller.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("missing attribute `{name}` on `{location}`")]
    MissingAttribute { name: String, location: String },

    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("mode {requested} requested but the file only stores modes 0..={max_mode}")]
    ModeIndex { requested: usize, max_mode: usize },

    #[error("{geometry} fields are not implemented for {backend} files")]
    NotImplemented { backend: Backend, geometry: Geometry },

    #[error("axis `{0}` is not present in the field metadata")]
    AxisNotFound(AxisName),

    #[error("field `{0}` not found")]
    FieldNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Hdf5(#[from] hdf5::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

impl FieldError {
    pub fn missing(name: &str, location: &str) -> Self {
        FieldError::MissingAttribute {
            name: name.to_string(),
            location: location.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FieldError>;
