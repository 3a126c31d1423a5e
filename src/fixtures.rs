// Small files in the Osiris, HiPACE and openPMD layouts for the reader tests

use std::path::{Path, PathBuf};
use std::str::FromStr;

use hdf5::types::VarLenUnicode;
use hdf5::{Dataset, File, Group, Location};
use ndarray::{Array, Array1, ArrayD, ArrayView1, Dimension, IxDyn};

pub fn set_str(loc: &Location, name: &str, value: &str) {
    let value = VarLenUnicode::from_str(value).unwrap();
    loc.new_attr::<VarLenUnicode>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn set_strs(loc: &Location, name: &str, values: &[&str]) {
    let values: Vec<VarLenUnicode> = values
        .iter()
        .map(|v| VarLenUnicode::from_str(v).unwrap())
        .collect();
    let attr = loc
        .new_attr::<VarLenUnicode>()
        .shape((values.len(),))
        .create(name)
        .unwrap();
    attr.write(ArrayView1::from(values.as_slice())).unwrap();
}

pub fn set_f64s(loc: &Location, name: &str, values: &[f64]) {
    let attr = loc
        .new_attr::<f64>()
        .shape((values.len(),))
        .create(name)
        .unwrap();
    attr.write(ArrayView1::from(values)).unwrap();
}

pub fn set_f64(loc: &Location, name: &str, value: f64) {
    loc.new_attr::<f64>()
        .create(name)
        .unwrap()
        .write_scalar(&value)
        .unwrap();
}

pub fn write_dataset(group: &Group, name: &str, data: &ArrayD<f64>) -> Dataset {
    let dataset = group
        .new_dataset::<f64>()
        .shape(data.shape().to_vec())
        .create(name)
        .unwrap();
    dataset.write(data).unwrap();
    dataset
}

/// Field whose value encodes its index, so slices can be checked against it
pub fn indexed_field(shape: &[usize]) -> ArrayD<f64> {
    Array::from_shape_fn(IxDyn(shape), |idx| {
        idx.slice().iter().fold(0.0, |acc, i| acc * 100.0 + *i as f64)
    })
}

// ===
// Osiris
// ===

fn osiris_header(file: &File, n_axes: usize, with_time: bool) {
    let xmin = [0.0, -1.0, -2.0];
    let xmax = [10.0, 1.0, 2.0];
    set_f64s(file, "XMIN", &xmin[..n_axes]);
    set_f64s(file, "XMAX", &xmax[..n_axes]);
    if with_time {
        set_f64s(file, "TIME", &[12.5]);
        set_strs(file, "TIME UNITS", &["1 / \\omega_p"]);
    }
}

fn osiris_axes(file: &File, names: &[&str]) {
    let axis_group = file.create_group("AXIS").unwrap();
    for (i, name) in names.iter().enumerate() {
        let axis = write_dataset(
            &axis_group,
            &format!("AXIS{}", i + 1),
            &Array1::from(vec![0.0, 1.0]).into_dyn(),
        );
        set_strs(&axis, "UNITS", &["c / \\omega_p"]);
        set_strs(&axis, "NAME", &[*name]);
    }
}

/// `shape` is in dataset order, i.e. AXIS numbering reversed
pub fn osiris(dir: &Path, axis_names: &[&str], shape: &[usize], with_time: bool) -> PathBuf {
    let path = dir.join("osiris-e1-000100.h5");
    let file = File::create(&path).unwrap();
    osiris_header(&file, axis_names.len(), with_time);
    osiris_axes(&file, axis_names);
    let field = write_dataset(&file, "e1", &indexed_field(shape));
    set_strs(&field, "UNITS", &["m_e c \\omega_p e^{-1}"]);
    path
}

// ===
// HiPACE
// ===

pub fn hipace(dir: &Path, file_name: &str, shape: (usize, usize, usize)) -> PathBuf {
    hipace_with_shape(dir, file_name, &[shape.0, shape.1, shape.2])
}

/// HiPACE header with an `Ez` dataset of any dimensionality
pub fn hipace_with_shape(dir: &Path, file_name: &str, shape: &[usize]) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).unwrap();
    set_f64s(&file, "XMIN", &[-5.0, -2.0, -3.0]);
    set_f64s(&file, "XMAX", &[5.0, 2.0, 3.0]);
    set_f64s(&file, "TIME", &[40.0]);
    write_dataset(&file, "Ez", &indexed_field(shape));
    path
}

// ===
// openPMD
// ===

fn openpmd_iteration(file: &File, with_time: bool) -> Group {
    set_str(file, "openPMD", "1.1.0");
    set_str(file, "basePath", "/data/%T/");
    set_str(file, "meshesPath", "fields/");
    let iteration = file.create_group("data").unwrap().create_group("200").unwrap();
    if with_time {
        set_f64(&iteration, "time", 200.0);
        set_f64(&iteration, "timeUnitSI", 1.0e-15);
    }
    iteration.create_group("fields").unwrap()
}

fn grid_attrs(record: &Location, geometry: &str, labels: &[&str], spacing: &[f64]) {
    set_str(record, "geometry", geometry);
    set_strs(record, "axisLabels", labels);
    set_f64s(record, "gridSpacing", spacing);
    set_f64s(record, "gridGlobalOffset", &vec![0.0; labels.len()]);
    set_f64(record, "gridUnitSI", 1.0);
    set_str(record, "dataOrder", "C");
}

/// Scalar Cartesian record `rho`. `labels`, `spacing` and `offset` are given in dataset
/// order and stored reversed when `data_order` is "F".
pub fn openpmd_scalar(
    dir: &Path,
    labels: &[&str],
    shape: &[usize],
    spacing: &[f64],
    offset: &[f64],
    data_order: &str,
) -> PathBuf {
    let path = dir.join(format!("data{}d{}.h5", shape.len(), data_order));
    let file = File::create(&path).unwrap();
    let fields = openpmd_iteration(&file, true);
    let rho = write_dataset(&fields, "rho", &indexed_field(shape));
    let stored = |values: &[f64]| -> Vec<f64> {
        if data_order == "F" {
            values.iter().rev().copied().collect()
        } else {
            values.to_vec()
        }
    };
    let mut stored_labels = labels.to_vec();
    if data_order == "F" {
        stored_labels.reverse();
    }
    set_str(&rho, "geometry", "cartesian");
    set_strs(&rho, "axisLabels", &stored_labels);
    set_f64s(&rho, "gridSpacing", &stored(spacing));
    set_f64s(&rho, "gridGlobalOffset", &stored(offset));
    set_f64(&rho, "gridUnitSI", 1.0);
    set_str(&rho, "dataOrder", data_order);
    set_f64s(&rho, "position", &vec![0.5; shape.len()]);
    set_f64(&rho, "unitSI", 1.0);
    path
}

/// Value of the thetaMode test coefficients at (coefficient, r cell, z cell)
pub fn circ_coefficient(component: usize, m: usize, i: usize, k: usize) -> f64 {
    (1.0 + component as f64) * (1.0 + m as f64) * (1.0 + 0.1 * i as f64) * (1.0 + 0.01 * k as f64)
}

/// thetaMode record `E` with components r, t and z, each storing `n_coeffs` coefficient
/// arrays of `nr` x `nz` cells with dr = 1e-6 m and dz = 0.5e-6 m.
pub fn openpmd_thetamode(dir: &Path, n_coeffs: usize, nr: usize, nz: usize) -> PathBuf {
    let path = dir.join("data00000200.h5");
    let file = File::create(&path).unwrap();
    let fields = openpmd_iteration(&file, true);
    let record = fields.create_group("E").unwrap();
    grid_attrs(&record, "thetaMode", &["r", "z"], &[1.0e-6, 0.5e-6]);
    set_f64s(&record, "unitDimension", &[1.0, 1.0, -3.0, -1.0, 0.0, 0.0, 0.0]);
    for (c, component) in ["r", "t", "z"].iter().enumerate() {
        let data = Array::from_shape_fn(IxDyn(&[n_coeffs, nr, nz]), |idx| {
            circ_coefficient(c, idx[0], idx[1], idx[2])
        });
        let dataset = write_dataset(&record, component, &data);
        set_f64s(&dataset, "position", &[0.5, 0.5]);
        set_f64(&dataset, "unitSI", 1.0);
    }
    path
}

/// Cartesian record `J` (a current density) with an `x` component of the given shape
pub fn openpmd_cartesian_3d(dir: &Path, shape: (usize, usize, usize)) -> PathBuf {
    let path = dir.join("data00000200.h5");
    let file = File::create(&path).unwrap();
    let fields = openpmd_iteration(&file, true);
    let record = fields.create_group("J").unwrap();
    grid_attrs(&record, "cartesian", &["x", "y", "z"], &[1.0e-6, 1.0e-6, 0.5e-6]);
    set_f64s(&record, "unitDimension", &[-2.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    let dataset = write_dataset(&record, "x", &indexed_field(&[shape.0, shape.1, shape.2]));
    set_f64s(&dataset, "position", &[0.5, 0.5, 0.5]);
    set_f64(&dataset, "unitSI", 2.0);
    path
}

/// 2D scalar record `rho` in an iteration that lacks its time attributes
pub fn openpmd_without_time(dir: &Path) -> PathBuf {
    let path = dir.join("data00000200.h5");
    let file = File::create(&path).unwrap();
    let fields = openpmd_iteration(&file, false);
    let rho = write_dataset(&fields, "rho", &indexed_field(&[4, 6]));
    grid_attrs(&rho, "cartesian", &["x", "z"], &[1.0e-6, 1.0e-6]);
    set_f64s(&rho, "position", &[0.5, 0.5]);
    path
}
