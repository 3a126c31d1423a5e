use ndarray::{ArrayD, Axis};
use tracing::trace;

use crate::error::{FieldError, Result};
use crate::metadata::AxisName;

/// How a relative slice position maps onto a cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positioning {
    /// position in [0, 1] along the axis
    Unit,
    /// position in [-1, 1], as used for cylindrical data
    Centered,
}

impl Positioning {
    pub fn cell_index(&self, relative_position: f64, n_cells: usize) -> usize {
        match self {
            Positioning::Unit => cell_index(relative_position, n_cells),
            Positioning::Centered => centered_cell_index(relative_position, n_cells),
        }
    }
}

fn clamp_index(i: f64, n_cells: usize) -> usize {
    let last = n_cells.saturating_sub(1) as f64;
    i.clamp(0.0, last) as usize
}

/// round(relative_position * n_cells), clamped so that a position of 1.0 still lands on
/// the last cell.
pub fn cell_index(relative_position: f64, n_cells: usize) -> usize {
    clamp_index((relative_position * n_cells as f64).round(), n_cells)
}

/// round(0.5*(relative_position+1) * n_cells) clamped to the array.
pub fn centered_cell_index(relative_position: f64, n_cells: usize) -> usize {
    clamp_index((0.5 * (relative_position + 1.0) * n_cells as f64).round(), n_cells)
}

/// Fixes `axis` to the cell at `relative_position` (in [0, 1]) and returns the array with
/// that dimension removed. `axis_order` names the dimensions of `array`.
///
/// Does not touch any metadata, removing the axis entry is up to the caller.
pub fn slice_field(
    array: &ArrayD<f64>,
    axis_order: &[AxisName],
    axis: AxisName,
    relative_position: f64,
) -> Result<ArrayD<f64>> {
    slice_at(array, axis_order, axis, relative_position, Positioning::Unit)
}

fn slice_at(
    array: &ArrayD<f64>,
    axis_order: &[AxisName],
    axis: AxisName,
    relative_position: f64,
    positioning: Positioning,
) -> Result<ArrayD<f64>> {
    if axis_order.len() != array.ndim() {
        return Err(FieldError::InvalidArgument(format!(
            "{} axis names given for a {}-dimensional array",
            axis_order.len(),
            array.ndim()
        )));
    }
    let axis_idx = axis_order
        .iter()
        .position(|name| *name == axis)
        .ok_or(FieldError::AxisNotFound(axis))?;
    let n_cells = array.len_of(Axis(axis_idx));
    if n_cells == 0 {
        return Err(FieldError::InvalidArgument(format!("cannot slice empty axis `{axis}`")));
    }
    let i_cell = positioning.cell_index(relative_position, n_cells);
    trace!(%axis, relative_position, i_cell, n_cells, "slicing field");
    Ok(array.index_axis(Axis(axis_idx), i_cell).to_owned())
}

/// Applies several slices one after the other. Each slice is located in the axis order
/// left over by the previous ones. Returns the sliced array and its remaining axis order.
pub fn slice_sequence(
    array: ArrayD<f64>,
    axis_order: &[AxisName],
    slices: &[(AxisName, f64)],
    positioning: Positioning,
) -> Result<(ArrayD<f64>, Vec<AxisName>)> {
    let mut order = axis_order.to_vec();
    let mut array = array;
    for &(axis, relative_position) in slices {
        array = slice_at(&array, &order, axis, relative_position, positioning)?;
        order.retain(|name| *name != axis);
    }
    Ok((array, order))
}
