/// Per-frame flap rendering.
pub mod animator;
/// Offset fields and resampling.
pub mod field;
/// Interpolation kernels.
pub mod kernel;
/// Region weights.
pub mod weight;
