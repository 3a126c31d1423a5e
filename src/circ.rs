// thetaMode coefficient layout along the first dimension: index 0 is mode 0, mode m > 0
// lives at 2m-1 (cos part) and 2m (sin part).

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use ndarray::{s, Array1, Array2, Array3, ArrayD, ArrayView3, Axis, Ix3};
use num::complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::consts;
use crate::error::{FieldError, Result};
use crate::metadata::{AxisData, AxisName, CARTESIAN_3D_AXES};
use crate::openpmd;
use crate::slicing::{slice_sequence, Positioning};
use crate::utils;

/// Which azimuthal modes take part in a reconstruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSelection {
    /// sum of every stored mode
    #[default]
    All,
    /// a single harmonic, 0 being the purely radial one
    Single(usize),
}

impl ModeSelection {
    /// Modes to sum for a dataset storing `n_stored` coefficient arrays.
    pub fn modes(&self, n_stored: usize) -> Result<Vec<usize>> {
        if n_stored == 0 {
            return Err(FieldError::InvalidArgument(
                "thetaMode dataset stores no mode coefficients".to_string(),
            ));
        }
        let max_mode = (n_stored - 1) / 2;
        match *self {
            ModeSelection::All => Ok((0..=max_mode).collect()),
            ModeSelection::Single(m) if m <= max_mode => Ok(vec![m]),
            ModeSelection::Single(m) => Err(FieldError::ModeIndex {
                requested: m,
                max_mode,
            }),
        }
    }
}

impl fmt::Display for ModeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeSelection::All => f.write_str("all"),
            ModeSelection::Single(m) => write!(f, "{m}"),
        }
    }
}

impl FromStr for ModeSelection {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            return Ok(ModeSelection::All);
        }
        s.parse::<usize>()
            .map(ModeSelection::Single)
            .map_err(|_| FieldError::InvalidArgument(format!("invalid mode `{s}`")))
    }
}

/// Uniform (r, z) grid of a thetaMode dataset.
///
/// * r_start, z_start: lower cell edge of the first cell
/// * dr, dz: cell sizes
/// * nr, nz: number of cells
/// * r_position, z_position: where inside its cell each value is sampled, in [0, 1)
#[derive(Debug, Clone, PartialEq)]
pub struct CylindricalGrid {
    pub r_start: f64,
    pub dr: f64,
    pub nr: usize,
    pub r_position: f64,
    pub z_start: f64,
    pub dz: f64,
    pub nz: usize,
    pub z_position: f64,
}

impl CylindricalGrid {
    pub fn r(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.nr, |i| self.r_start + (i as f64 + self.r_position) * self.dr)
    }

    pub fn z(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.nz, |i| self.z_start + (i as f64 + self.z_position) * self.dz)
    }

    /// Outer radial edge
    pub fn r_max(&self) -> f64 {
        self.r_start + self.nr as f64 * self.dr
    }

    /// Transverse coordinates of the full diameter: -r reversed followed by r. These are
    /// both the rows of a fixed-angle cut and the x/y coordinates of a 3D volume.
    pub fn transverse(&self) -> Array1<f64> {
        let r = self.r();
        r.iter().rev().map(|v| -v).chain(r.iter().copied()).collect()
    }

    /// Index of the radial cell whose sample point is closest to `r`, clamped to the grid so
    /// points beyond the outer edge take the outermost cell
    fn nearest_r_index(&self, r: f64) -> usize {
        let first = self.r_start + self.r_position * self.dr;
        let i = ((r - first) / self.dr).round();
        i.clamp(0.0, (self.nr - 1) as f64) as usize
    }

    fn with_nr(&self, nr: usize) -> CylindricalGrid {
        CylindricalGrid {
            dr: self.dr * self.nr as f64 / nr as f64,
            nr,
            ..self.clone()
        }
    }

    fn with_nz(&self, nz: usize) -> CylindricalGrid {
        CylindricalGrid {
            dz: self.dz * self.nz as f64 / nz as f64,
            nz,
            ..self.clone()
        }
    }
}

/// Resolution bound for 3D reconstructions, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxResolution {
    pub longitudinal: usize,
    pub transverse: usize,
}

impl MaxResolution {
    pub fn new(longitudinal: usize, transverse: usize) -> Result<MaxResolution> {
        if longitudinal == 0 || transverse == 0 {
            return Err(FieldError::InvalidArgument(
                "maximum 3D resolution must be at least one cell".to_string(),
            ));
        }
        Ok(MaxResolution { longitudinal, transverse })
    }

    /// Number of radial cells kept for a dataset with `nr` radial cells
    pub fn radial_cells(&self, nr: usize) -> usize {
        usize::min(nr, self.transverse)
    }

    /// Number of longitudinal cells kept for a dataset with `nz` cells
    pub fn longitudinal_cells(&self, nz: usize) -> usize {
        usize::min(nz, self.longitudinal)
    }
}

/// Decimates the r and/or z axes of the mode coefficients (mode, r, z) so that they fit
/// in `max_resolution`, with order-1 interpolation. Axes already within the bound are
/// left untouched.
pub fn reduce_resolution(
    coeffs: Array3<f64>,
    grid: &CylindricalGrid,
    max_resolution: MaxResolution,
) -> Result<(Array3<f64>, CylindricalGrid)> {
    let mut grid = grid.clone();
    let mut data = coeffs.into_dyn();
    let nr = max_resolution.radial_cells(grid.nr);
    if nr < grid.nr {
        debug!(from = grid.nr, to = nr, "reducing radial resolution");
        data = utils::zoom_axis(&data.view(), Axis(1), nr);
        grid = grid.with_nr(nr);
    }
    let nz = max_resolution.longitudinal_cells(grid.nz);
    if nz < grid.nz {
        debug!(from = grid.nz, to = nz, "reducing longitudinal resolution");
        data = utils::zoom_axis(&data.view(), Axis(2), nz);
        grid = grid.with_nz(nz);
    }
    Ok((data.into_dimensionality::<Ix3>()?, grid))
}

/// cos(mφ) and sin(mφ) for the azimuth of the point (x, y)
fn mode_phase(x: f64, y: f64, m: usize) -> (f64, f64) {
    let r = x.hypot(y);
    let unit = if r == 0.0 {
        Complex64::new(1.0, 0.0)
    } else {
        Complex64::new(x / r, y / r)
    };
    let rotated = unit.powu(m as u32);
    (rotated.re, rotated.im)
}

/// Evaluates the mode sum on the Cartesian grid x = y = `grid.transverse()`. Output is
/// indexed (x, y, z). Corner voxels beyond the outer radial edge take the values of the
/// outermost radial cell.
pub fn reconstruct_3d(
    coeffs: ArrayView3<f64>,
    grid: &CylindricalGrid,
    modes: &[usize],
) -> Result<Array3<f64>> {
    let nz = coeffs.len_of(Axis(2));
    let coords = grid.transverse();
    let n = coords.len();
    let mut out = vec![0.0; n * n * nz];
    if out.is_empty() {
        return Ok(Array3::from_shape_vec((n, n, nz), out)?);
    }

    out.par_chunks_mut(n * nz).enumerate().for_each(|(ix, plane)| {
        let x = coords[ix];
        for (iy, &y) in coords.iter().enumerate() {
            let ir = grid.nearest_r_index(x.hypot(y));
            let column = &mut plane[iy * nz..(iy + 1) * nz];
            for &m in modes {
                if m == 0 {
                    column
                        .iter_mut()
                        .zip(coeffs.slice(s![0, ir, ..]))
                        .for_each(|(v, f)| *v += f);
                } else {
                    let (cos, sin) = mode_phase(x, y, m);
                    let f_cos = coeffs.slice(s![2 * m - 1, ir, ..]);
                    let f_sin = coeffs.slice(s![2 * m, ir, ..]);
                    for (k, v) in column.iter_mut().enumerate() {
                        *v += f_cos[k] * cos + f_sin[k] * sin;
                    }
                }
            }
        }
    });
    Ok(Array3::from_shape_vec((n, n, nz), out)?)
}

/// Evaluates the mode sum on the plane at angle `theta`. The output has 2*nr rows: rows
/// nr.. are the half-plane at `theta`, rows ..nr the half-plane at `theta`+π, reversed
/// so the row coordinate runs from -r_max to r_max.
///
/// At `theta`+π the m-th mode picks up a factor (-1)^m, which is how the lower half is
/// recovered from one-sided data.
pub fn reconstruct_at_angle(coeffs: ArrayView3<f64>, modes: &[usize], theta: f64) -> Array2<f64> {
    let (_, nr, nz) = coeffs.dim();
    let mut out = Array2::zeros((2 * nr, nz));
    for &m in modes {
        let (field, parity) = if m == 0 {
            (coeffs.index_axis(Axis(0), 0).to_owned(), 1.0)
        } else {
            let cos = (m as f64 * theta).cos();
            let sin = (m as f64 * theta).sin();
            let field = &coeffs.index_axis(Axis(0), 2 * m - 1) * cos
                + &coeffs.index_axis(Axis(0), 2 * m) * sin;
            (field, if m % 2 == 0 { 1.0 } else { -1.0 })
        };
        trace!(mode = m, theta, "adding mode");
        out.slice_mut(s![nr.., ..]).scaled_add(1.0, &field);
        out.slice_mut(s![..nr;-1, ..]).scaled_add(parity, &field);
    }
    out
}

/// Reconstructs one scalar component from its mode coefficients: a fixed-angle cut when
/// `theta` is given, the full 3D volume otherwise. Returns the array and its axes.
pub fn reconstruct(
    coeffs: Array3<f64>,
    grid: &CylindricalGrid,
    mode: ModeSelection,
    theta: Option<f64>,
    max_resolution: Option<MaxResolution>,
) -> Result<(ArrayD<f64>, Vec<AxisData>)> {
    let modes = mode.modes(coeffs.len_of(Axis(0)))?;
    let units = consts::OPENPMD_LENGTH_UNITS.to_string();
    match theta {
        Some(theta) => {
            let cut = reconstruct_at_angle(coeffs.view(), &modes, theta);
            let axes = vec![
                AxisData { name: AxisName::R, units: units.clone(), array: grid.transverse() },
                AxisData { name: AxisName::Z, units, array: grid.z() },
            ];
            Ok((cut.into_dyn(), axes))
        }
        None => {
            let (coeffs, grid) = match max_resolution {
                Some(max_resolution) => reduce_resolution(coeffs, grid, max_resolution)?,
                None => (coeffs, grid.clone()),
            };
            debug!(nr = grid.nr, nz = grid.nz, r_max = grid.r_max(), ?modes, "reconstructing 3D volume");
            let volume = reconstruct_3d(coeffs.view(), &grid, &modes)?;
            let transverse = grid.transverse();
            let axes = CARTESIAN_3D_AXES
                .iter()
                .map(|&name| AxisData {
                    name,
                    units: units.clone(),
                    array: if name == AxisName::Z { grid.z() } else { transverse.clone() },
                })
                .collect();
            Ok((volume.into_dyn(), axes))
        }
    }
}

/// Cartesian component of a vector field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartesianComponent {
    X,
    Y,
}

/// Builds the x or y component from reconstructed r and t components.
///
/// For a fixed-angle cut the rotation uses `theta`, and the sign is reverted on the rows
/// below the axis, which lie at `theta`+π. For a 3D volume every voxel is rotated by its
/// own azimuth.
pub fn cartesian_component(
    f_r: &ArrayD<f64>,
    f_t: &ArrayD<f64>,
    transverse: &Array1<f64>,
    component: CartesianComponent,
    theta: Option<f64>,
) -> Result<ArrayD<f64>> {
    let weights = |cos: f64, sin: f64| match component {
        CartesianComponent::X => (cos, -sin),
        CartesianComponent::Y => (sin, cos),
    };
    match theta {
        Some(theta) => {
            let (w_r, w_t) = weights(theta.cos(), theta.sin());
            let mut out = f_r * w_r + f_t * w_t;
            let half = out.len_of(Axis(0)) / 2;
            out.slice_axis_mut(Axis(0), (..half).into())
                .mapv_inplace(|v| -v);
            Ok(out)
        }
        None => {
            let f_r = f_r.view().into_dimensionality::<Ix3>()?;
            let f_t = f_t.view().into_dimensionality::<Ix3>()?;
            let mut out = Array3::zeros(f_r.dim());
            for (ix, &x) in transverse.iter().enumerate() {
                for (iy, &y) in transverse.iter().enumerate() {
                    let (cos, sin) = mode_phase(x, y, 1);
                    let (w_r, w_t) = weights(cos, sin);
                    let mut column = out.slice_mut(s![ix, iy, ..]);
                    column.scaled_add(w_r, &f_r.slice(s![ix, iy, ..]));
                    column.scaled_add(w_t, &f_t.slice(s![ix, iy, ..]));
                }
            }
            Ok(out.into_dyn())
        }
    }
}

/// Reads a thetaMode field from an openPMD file and reconstructs it.
///
/// * slices: axes to slice across after the reconstruction, each with a relative
///   position in [-1, 1]; every sliced axis is dropped from the returned axes
/// * mode: modes to sum
/// * theta: angle of the 2D cut, `None` for a full 3D volume
/// * max_resolution: bound on the 3D volume resolution, ignored for 2D cuts
///
/// The file is closed before this returns, the array owns its data.
pub fn read_field_circ(
    file_path: &Path,
    field_path: &str,
    slices: &[(AxisName, f64)],
    mode: ModeSelection,
    theta: Option<f64>,
    max_resolution: Option<MaxResolution>,
) -> Result<(ArrayD<f64>, Vec<AxisData>)> {
    let (record, component) = openpmd::split_field_path(field_path);
    let cartesian = match component {
        Some("x") => Some(CartesianComponent::X),
        Some("y") => Some(CartesianComponent::Y),
        _ => None,
    };

    let (field, axes) = match cartesian {
        Some(cartesian) => {
            let paths = [format!("{record}/r"), format!("{record}/t")];
            let mut components = openpmd::read_circ_components(file_path, &paths)?.into_iter();
            let (Some((c_r, grid)), Some((c_t, _))) = (components.next(), components.next()) else {
                return Err(FieldError::FieldNotFound(field_path.to_string()));
            };
            let (f_r, axes) = reconstruct(c_r, &grid, mode, theta, max_resolution)?;
            let (f_t, _) = reconstruct(c_t, &grid, mode, theta, max_resolution)?;
            let transverse = axes[0].array.clone();
            let field = cartesian_component(&f_r, &f_t, &transverse, cartesian, theta)?;
            (field, axes)
        }
        None => {
            let mut components =
                openpmd::read_circ_components(file_path, &[field_path.to_string()])?;
            let (coeffs, grid) = components
                .pop()
                .ok_or_else(|| FieldError::FieldNotFound(field_path.to_string()))?;
            reconstruct(coeffs, &grid, mode, theta, max_resolution)?
        }
    };

    if slices.is_empty() {
        return Ok((field, axes));
    }
    let order: Vec<AxisName> = axes.iter().map(|axis| axis.name).collect();
    let (field, remaining) = slice_sequence(field, &order, slices, Positioning::Centered)?;
    let axes = axes
        .into_iter()
        .filter(|axis| remaining.contains(&axis.name))
        .collect();
    Ok((field, axes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn grid(nr: usize, nz: usize) -> CylindricalGrid {
        CylindricalGrid {
            r_start: 0.0,
            dr: 1.0,
            nr,
            r_position: 0.5,
            z_start: 0.0,
            dz: 0.5,
            nz,
            z_position: 0.5,
        }
    }

    /// 3 modes (5 coefficient arrays) with a different smooth profile per coefficient
    fn coefficients(nr: usize, nz: usize) -> Array3<f64> {
        Array3::from_shape_fn((5, nr, nz), |(m, i, k)| {
            let r = i as f64 + 0.5;
            let z = k as f64;
            (1.0 + m as f64) * (1.0 + 0.1 * r) * (1.0 + 0.01 * z)
        })
    }

    #[test]
    fn mode_selection() {
        assert_eq!(ModeSelection::All.modes(5).unwrap(), vec![0, 1, 2]);
        assert_eq!(ModeSelection::Single(2).modes(5).unwrap(), vec![2]);
        assert!(matches!(
            ModeSelection::Single(3).modes(5),
            Err(FieldError::ModeIndex { requested: 3, max_mode: 2 })
        ));
        assert_eq!("all".parse::<ModeSelection>().unwrap(), ModeSelection::All);
        assert_eq!("1".parse::<ModeSelection>().unwrap(), ModeSelection::Single(1));
        assert!("one".parse::<ModeSelection>().is_err());
    }

    #[test]
    fn cut_at_pi_mirrors_cut_at_zero() {
        // the point at angle π and radius r is the point at angle 0 and radius -r
        let (nr, nz) = (6, 4);
        let coeffs = coefficients(nr, nz);
        for mode in [ModeSelection::All, ModeSelection::Single(1), ModeSelection::Single(2)] {
            let modes = mode.modes(5).unwrap();
            let at_zero = reconstruct_at_angle(coeffs.view(), &modes, 0.0);
            let at_pi = reconstruct_at_angle(coeffs.view(), &modes, PI);
            for i in 0..2 * nr {
                for k in 0..nz {
                    let mirrored = at_zero[[2 * nr - 1 - i, k]];
                    assert!((at_pi[[i, k]] - mirrored).abs() < 1e-9, "{mode} {i} {k}");
                }
            }
        }
    }

    #[test]
    fn odd_mode_flips_sign_below_axis() {
        let (nr, nz) = (4, 3);
        let coeffs = coefficients(nr, nz);
        let cut = reconstruct_at_angle(coeffs.view(), &[1], 0.0);
        for i in 0..nr {
            for k in 0..nz {
                assert_eq!(cut[[nr + i, k]], coeffs[[1, i, k]]);
                assert_eq!(cut[[nr - 1 - i, k]], -coeffs[[1, i, k]]);
            }
        }
        let even = reconstruct_at_angle(coeffs.view(), &[2], 0.0);
        assert_eq!(even[[nr - 1, 0]], even[[nr, 0]]);
    }

    #[test]
    fn mode_zero_volume_is_radially_symmetric() {
        let (nr, nz) = (5, 3);
        let g = grid(nr, nz);
        let coeffs = coefficients(nr, nz);
        let volume = reconstruct_3d(coeffs.view(), &g, &[0]).unwrap();
        let n = 2 * nr;
        assert_eq!(volume.dim(), (n, n, nz));
        for ix in 0..n {
            for iy in 0..n {
                assert_eq!(volume[[ix, iy, 1]], volume[[iy, ix, 1]]);
                assert_eq!(volume[[ix, iy, 1]], volume[[n - 1 - ix, iy, 1]]);
            }
        }
        // on the +x axis next to the center we sit on the first radial cell
        assert_eq!(volume[[nr, nr, 2]], coeffs[[0, 0, 2]]);
    }

    #[test]
    fn volume_matches_cut_on_the_x_axis() {
        // the row through y ≈ 0 of the volume is close to the θ=0 cut
        let (nr, nz) = (4, 2);
        let g = grid(nr, nz);
        let coeffs = coefficients(nr, nz);
        let modes = ModeSelection::All.modes(5).unwrap();
        let volume = reconstruct_3d(coeffs.view(), &g, &modes).unwrap();
        // the voxel at x = r, y = 0.5 has cos φ, sin φ close to 1, 0 for the outer cell
        let ix = 2 * nr - 1;
        let x = 3.5;
        let y = 0.5;
        let mut expected = coeffs[[0, 3, 1]];
        for m in 1..=2 {
            let phi = (y / x).atan();
            expected += coeffs[[2 * m - 1, 3, 1]] * (m as f64 * phi).cos()
                + coeffs[[2 * m, 3, 1]] * (m as f64 * phi).sin();
        }
        assert!((volume[[ix, nr, 1]] - expected).abs() < 1e-9);
    }

    #[test]
    fn corners_outside_r_max_take_the_outer_cell() {
        let g = grid(3, 1);
        let coeffs = Array3::from_elem((1, 3, 1), 7.0);
        let volume = reconstruct_3d(coeffs.view(), &g, &[0]).unwrap();
        // corner at (-2.5, -2.5) lies beyond r_max = 3
        assert!(g.r_max() < 2.5f64.hypot(2.5));
        assert_eq!(volume[[0, 0, 0]], 7.0);
        assert!(volume.iter().all(|v| *v == 7.0));

        let coeffs = coefficients(3, 1);
        let volume = reconstruct_3d(coeffs.view(), &g, &[0]).unwrap();
        assert_eq!(volume[[0, 0, 0]], coeffs[[0, 2, 0]]);
    }

    #[test]
    fn empty_mode_axis_is_an_error() {
        assert!(matches!(
            ModeSelection::All.modes(0),
            Err(FieldError::InvalidArgument(_))
        ));
        assert!(ModeSelection::Single(0).modes(0).is_err());
        let g = grid(3, 2);
        let coeffs = Array3::<f64>::zeros((0, 3, 2));
        assert!(reconstruct(coeffs.clone(), &g, ModeSelection::All, Some(0.0), None).is_err());
        assert!(reconstruct(coeffs, &g, ModeSelection::All, None, None).is_err());
    }

    #[test]
    fn reduced_volume_fits_the_bound() {
        let (nr, nz) = (100, 200);
        let g = grid(nr, nz);
        let coeffs = coefficients(nr, nz);
        let bound = MaxResolution::new(50, 25).unwrap();
        let (volume, axes) =
            reconstruct(coeffs, &g, ModeSelection::All, None, Some(bound)).unwrap();
        assert_eq!(volume.shape(), &[50, 50, 50]);
        assert_eq!(axes.len(), 3);
        assert_eq!(axes[0].array.len(), 50);
        assert_eq!(axes[2].array.len(), 50);
        assert!(volume.iter().any(|v| *v != 0.0));
        assert!(axes[0].array.windows(2).into_iter().all(|w| w[1] > w[0]));
    }

    #[test]
    fn loose_bound_keeps_native_data() {
        let (nr, nz) = (6, 8);
        let g = grid(nr, nz);
        let coeffs = coefficients(nr, nz);
        let bound = MaxResolution::new(8, 6).unwrap();
        let (reduced, reduced_grid) = reduce_resolution(coeffs.clone(), &g, bound).unwrap();
        assert_eq!(reduced, coeffs);
        assert_eq!(reduced_grid, g);

        let (native, _) = reconstruct(coeffs.clone(), &g, ModeSelection::All, None, None).unwrap();
        let (bounded, _) =
            reconstruct(coeffs, &g, ModeSelection::All, None, Some(bound)).unwrap();
        assert_eq!(native, bounded);
    }

    #[test]
    fn reduced_grid_covers_the_same_extent() {
        let g = grid(10, 20);
        let (_, reduced) =
            reduce_resolution(coefficients(10, 20), &g, MaxResolution::new(5, 4).unwrap()).unwrap();
        assert_eq!(reduced.nr, 4);
        assert_eq!(reduced.nz, 5);
        assert!((reduced.r_max() - g.r_max()).abs() < 1e-12);
        assert!((reduced.dz * 5.0 - g.dz * 20.0).abs() < 1e-12);
    }

    #[test]
    fn cut_axes_follow_the_array() {
        let g = grid(4, 3);
        let (cut, axes) = reconstruct(
            coefficients(4, 3),
            &g,
            ModeSelection::Single(1),
            Some(0.3),
            None,
        )
        .unwrap();
        assert_eq!(cut.shape(), &[8, 3]);
        assert_eq!(axes[0].name, AxisName::R);
        assert_eq!(axes[0].array.len(), 8);
        assert_eq!(axes[0].array[0], -3.5);
        assert_eq!(axes[1].array.len(), 3);
    }

    #[test]
    fn x_component_on_the_cut_at_zero_is_the_radial_one() {
        let f_r = Array2::from_shape_fn((4, 2), |(i, k)| (i + k) as f64 + 1.0).into_dyn();
        let f_t = Array2::from_elem((4, 2), 7.0).into_dyn();
        let transverse = Array1::from(vec![-1.5, -0.5, 0.5, 1.5]);
        let x = cartesian_component(&f_r, &f_t, &transverse, CartesianComponent::X, Some(0.0))
            .unwrap();
        assert_eq!(x[[3, 1]], f_r[[3, 1]]);
        assert_eq!(x[[0, 1]], -f_r[[0, 1]]);
        let y = cartesian_component(&f_r, &f_t, &transverse, CartesianComponent::Y, Some(0.0))
            .unwrap();
        assert_eq!(y[[2, 0]], 7.0);
        assert_eq!(y[[1, 0]], -7.0);
    }

    #[test]
    fn x_component_in_a_volume_rotates_per_voxel() {
        let n = 2;
        let f_r = Array3::from_elem((n, n, 1), 1.0).into_dyn();
        let f_t = Array3::zeros((n, n, 1)).into_dyn();
        let transverse = Array1::from(vec![-1.0, 1.0]);
        let x = cartesian_component(&f_r, &f_t, &transverse, CartesianComponent::X, None).unwrap();
        // a purely radial unit field has x component x/r
        let expected = 1.0 / 2f64.sqrt();
        assert!((x[[1, 1, 0]] - expected).abs() < 1e-12);
        assert!((x[[0, 1, 0]] + expected).abs() < 1e-12);
    }
}
