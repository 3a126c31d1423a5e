use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::circ::{self, MaxResolution, ModeSelection};
use crate::consts;
use crate::error::{FieldError, Result};
use crate::metadata::{AxisData, AxisName, FieldMetadata, Geometry};
use crate::slicing::{slice_sequence, Positioning};
use crate::utils;
use crate::{hipace, openpmd, osiris};

/// Simulation code that wrote a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Osiris,
    Hipace,
    OpenPmd,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Osiris => "osiris",
            Backend::Hipace => "hipace",
            Backend::OpenPmd => "openpmd",
        }
    }

    /// Reads geometry, units, axes and time of a field without touching its data
    pub fn read_field_metadata(&self, file_path: &Path, field_path: &str) -> Result<FieldMetadata> {
        match self {
            Backend::Osiris => osiris::read_field_metadata(file_path, field_path),
            Backend::Hipace => hipace::read_field_metadata(file_path, field_path),
            Backend::OpenPmd => openpmd::read_field_metadata(file_path, field_path),
        }
    }

    /// Whole gridded (non-thetaMode) field, dimensions in metadata axis order
    fn read_gridded_field(&self, file_path: &Path, field_path: &str) -> Result<ArrayD<f64>> {
        match self {
            Backend::Osiris => osiris::read_field(file_path, field_path),
            Backend::Hipace => hipace::read_field(file_path, field_path),
            Backend::OpenPmd => openpmd::read_field(file_path, field_path),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "osiris" => Ok(Backend::Osiris),
            "hipace" => Ok(Backend::Hipace),
            "openpmd" => Ok(Backend::OpenPmd),
            other => Err(FieldError::InvalidArgument(format!("unknown backend `{other}`"))),
        }
    }
}

/// Options of a field read.
///
/// * slice_dir_i, slice_dir_j: axes to slice across, `slice_i`/`slice_j` being the relative
///   position of each slice in [0, 1]
/// * mode: azimuthal modes to sum (thetaMode only)
/// * theta: angle of the thetaMode cut, `None` to reconstruct a 3D volume
/// * max_resolution_3d: bound on the 3D thetaMode reconstruction
/// * only_metadata: skip reading the data, the returned array is empty
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    pub slice_i: f64,
    pub slice_j: f64,
    pub slice_dir_i: Option<AxisName>,
    pub slice_dir_j: Option<AxisName>,
    pub mode: ModeSelection,
    pub theta: Option<f64>,
    pub max_resolution_3d: Option<MaxResolution>,
    pub only_metadata: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            slice_i: consts::DEFAULT_SLICE_POSITION,
            slice_j: consts::DEFAULT_SLICE_POSITION,
            slice_dir_i: None,
            slice_dir_j: None,
            mode: ModeSelection::All,
            theta: Some(consts::DEFAULT_THETA),
            max_resolution_3d: None,
            only_metadata: false,
        }
    }
}

impl ReadOptions {
    /// Requested slices in the order they are applied
    pub fn slices(&self) -> Vec<(AxisName, f64)> {
        [
            self.slice_dir_i.map(|axis| (axis, self.slice_i)),
            self.slice_dir_j.map(|axis| (axis, self.slice_j)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

type GeometryHandler = fn(Backend, &Path, &str, &FieldMetadata, &ReadOptions) -> Result<ArrayD<f64>>;

/// Every supported (backend, geometry) combination
const HANDLERS: [(Backend, Geometry, GeometryHandler); 9] = [
    (Backend::Osiris, Geometry::OneD, read_gridded),
    (Backend::Osiris, Geometry::Cartesian2D, read_gridded),
    (Backend::Osiris, Geometry::Cylindrical2D, read_gridded),
    (Backend::Osiris, Geometry::Cartesian3D, read_gridded),
    (Backend::Hipace, Geometry::Cartesian3D, read_gridded),
    (Backend::OpenPmd, Geometry::OneD, read_gridded),
    (Backend::OpenPmd, Geometry::Cartesian2D, read_gridded),
    (Backend::OpenPmd, Geometry::Cartesian3D, read_gridded),
    (Backend::OpenPmd, Geometry::ThetaMode, read_theta_mode),
];

fn handler(backend: Backend, geometry: Geometry) -> Option<GeometryHandler> {
    HANDLERS
        .iter()
        .find(|(b, g, _)| *b == backend && *g == geometry)
        .map(|(_, _, handler)| *handler)
}

/// Reads a gridded field and applies the requested slices
fn read_gridded(
    backend: Backend,
    file_path: &Path,
    field_path: &str,
    metadata: &FieldMetadata,
    options: &ReadOptions,
) -> Result<ArrayD<f64>> {
    let field = backend.read_gridded_field(file_path, field_path)?;
    let (field, _) = slice_sequence(
        field,
        &metadata.axis_names(),
        &options.slices(),
        Positioning::Unit,
    )?;
    Ok(field)
}

/// Reconstructs a thetaMode field. Slice positions in [0, 1] are mapped to the [-1, 1]
/// range of the cylindrical slicer.
fn read_theta_mode(
    _backend: Backend,
    file_path: &Path,
    field_path: &str,
    _metadata: &FieldMetadata,
    options: &ReadOptions,
) -> Result<ArrayD<f64>> {
    let slices: Vec<(AxisName, f64)> = options
        .slices()
        .into_iter()
        .map(|(axis, position)| (axis, 2.0 * position - 1.0))
        .collect();
    let (field, _) = circ::read_field_circ(
        file_path,
        field_path,
        &slices,
        options.mode,
        options.theta,
        options.max_resolution_3d,
    )?;
    Ok(field)
}

/// Brings the metadata of a field in line with what the read returns: a thetaMode field
/// rebuilt in 3D swaps its `r` axis for identical `x` and `y` axes (resampled when the
/// resolution is bounded), and sliced axes are dropped.
pub fn adjust_metadata(metadata: &mut FieldMetadata, options: &ReadOptions) -> Result<()> {
    if metadata.field.geometry == Geometry::ThetaMode && options.theta.is_none() {
        let r = metadata
            .axis(AxisName::R)
            .cloned()
            .ok_or(FieldError::AxisNotFound(AxisName::R))?;
        let mut transverse = r.array;
        if let Some(bound) = options.max_resolution_3d {
            // r edges span both sides of the axis
            let nr = transverse.len().saturating_sub(1) / 2;
            let kept = bound.radial_cells(nr);
            if kept < nr {
                transverse = utils::resample_edges(&transverse.to_vec(), 2 * kept).into();
            }
            if let Some(z) = metadata.axes.iter_mut().find(|axis| axis.name == AxisName::Z) {
                let nz = z.array.len().saturating_sub(1);
                let kept = bound.longitudinal_cells(nz);
                if kept < nz {
                    z.array = utils::resample_edges(&z.array.to_vec(), kept).into();
                }
            }
        }
        let x = AxisData {
            name: AxisName::X,
            units: r.units.clone(),
            array: transverse.clone(),
        };
        let y = AxisData {
            name: AxisName::Y,
            ..x.clone()
        };
        metadata.replace_axis(AxisName::R, vec![x, y])?;
    }
    for (axis, _) in options.slices() {
        metadata.remove_axis(axis)?;
    }
    Ok(())
}

/// Reads the metadata of a field
pub fn read_field_metadata(
    backend: Backend,
    file_path: impl AsRef<Path>,
    field_path: &str,
) -> Result<FieldMetadata> {
    backend.read_field_metadata(file_path.as_ref(), field_path)
}

/// Reads a field and its metadata.
///
/// The geometry is resolved first, then the metadata is adjusted to the requested
/// reconstruction and slices, and finally the data is read by the handler registered for
/// this backend and geometry. The file is opened and closed within each step, nothing
/// stays open once this returns.
pub fn read_field(
    backend: Backend,
    file_path: impl AsRef<Path>,
    field_path: &str,
    options: &ReadOptions,
) -> Result<(ArrayD<f64>, FieldMetadata)> {
    let file_path = file_path.as_ref();
    let metadata = backend.read_field_metadata(file_path, field_path)?;
    let geometry = metadata.field.geometry;
    let mut adjusted = metadata.clone();
    adjust_metadata(&mut adjusted, options)?;
    if options.only_metadata {
        return Ok((ArrayD::zeros(IxDyn(&[0])), adjusted));
    }

    let handler = handler(backend, geometry).ok_or(FieldError::NotImplemented { backend, geometry })?;
    debug!(%backend, %geometry, field = field_path, "reading field");
    let field = handler(backend, file_path, field_path, &metadata, options)?;
    Ok((field, adjusted))
}
