/// Color conversions.
pub mod color;
/// Core value types.
pub mod core;
/// Error type.
pub mod error;
pub(crate) mod math;
