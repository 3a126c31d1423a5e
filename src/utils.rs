use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

/// Linear interpolation of the points (x(i), y(i)) at xp, where the points are given by
/// closures so that callers can interpolate over index space or over a column of an array
/// without copying it first.
///
/// Assumes x either monotonically increases or decreases. Values outside the range of x
/// are clamped to the first/last y.
pub fn interp_closure<F1, F2>(y: F1, x: F2, size: usize, xp: f64) -> f64
where
    F1: Fn(usize) -> f64,
    F2: Fn(usize) -> f64
{
    if size == 1 {
        return y(0);
    }
    let increasing = x(0) <= x(size-1);
    let before = |a: f64, b: f64| if increasing { a <= b } else { a >= b };

    if before(xp, x(0)) {
        return y(0);
    } else if before(x(size-1), xp) {
        return y(size-1);
    }

    // binary search for the interval containing xp
    let mut low = 0;
    let mut high = size-1;
    while low < high-1 {
        let mid = (low+high)>>1;
        if before(x(mid), xp) {
            low = mid;
        } else {
            high = mid;
        }
    }
    y(low) + (y(high)-y(low)) / (x(high)-x(low)) * (xp-x(low))
}

/// Resamples an array of n+1 cell edges to `n_cells`+1 edges. The first and last edge
/// are kept and the inner ones are linearly interpolated in index space, so monotonic
/// input stays monotonic.
pub fn resample_edges(edges: &[f64], n_cells: usize) -> Vec<f64> {
    let n_old = edges.len().saturating_sub(1);
    if n_old == 0 || n_cells == 0 {
        return edges.to_vec();
    }
    let step = n_old as f64 / n_cells as f64;
    (0..=n_cells)
        .map(|j| interp_closure(|i| edges[i], |i| i as f64, edges.len(), j as f64 * step))
        .collect()
}

/// Order-1 zoom of `data` along `axis` to `n_out` cells.
///
/// Cells are treated as covering the same extent before and after the zoom: output cell
/// j samples the input at cell coordinate (j+0.5)*n_in/n_out - 0.5, linearly
/// interpolating between the two nearest input cells and clamping at the ends.
pub fn zoom_axis(data: &ArrayViewD<f64>, axis: Axis, n_out: usize) -> ArrayD<f64> {
    let n_in = data.len_of(axis);
    let mut shape = data.shape().to_vec();
    shape[axis.index()] = n_out;
    let mut out = ArrayD::zeros(IxDyn(&shape));
    if n_in == 0 {
        return out;
    }

    let scale = n_in as f64 / n_out as f64;
    let last = (n_in - 1) as f64;
    for (j, mut lane) in out.axis_iter_mut(axis).enumerate() {
        let pos = ((j as f64 + 0.5) * scale - 0.5).clamp(0.0, last);
        let i0 = pos.floor() as usize;
        let i1 = usize::min(i0 + 1, n_in - 1);
        let w = pos - i0 as f64;
        lane.assign(&data.index_axis(axis, i0));
        if w > 0.0 {
            lane *= 1.0 - w;
            lane.scaled_add(w, &data.index_axis(axis, i1));
        }
    }
    out
}
