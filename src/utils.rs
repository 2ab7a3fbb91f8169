use ndarray::Array1;

/// A picked location in model coordinates (horizontal `x`, depth `z`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickedPoint {
    pub x: f64,
    pub z: f64,
}

impl PickedPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// `n` evenly spaced samples from `start` to `stop`, both ends included.
/// A single sample sits at `start`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Array1<f64> {
    let mut axis = Array1::linspace(start, stop, n);
    if n > 1 {
        // endpoint exact regardless of accumulated rounding
        axis[n - 1] = stop;
    }
    axis
}
