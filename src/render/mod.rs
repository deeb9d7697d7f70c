//! Frame type and the render pipeline.

/// Rendered frame buffers.
pub mod frame;
/// Recipe-driven frame rendering.
pub mod pipeline;
