//! GPU seams used by binders.
//!
//! Binders never talk to wgpu directly; they go through these traits so the
//! same code drives the wgpu backend ([`super::wgpu_context`]) and the
//! recording doubles used in tests.

use super::attributes::PaintAttributeLayout;
use crate::style::Color;

/// A vertex buffer created from a paint array.
pub trait PaintBuffer {
    /// Release GPU memory. The handle must not be used afterwards.
    fn destroy(&self);

    /// Size in bytes.
    fn size(&self) -> u64;
}

/// Creates and updates paint vertex buffers.
pub trait GpuContext {
    /// Buffer handle type.
    type Buffer: PaintBuffer;

    /// Create a vertex buffer initialized with `contents`.
    fn create_vertex_buffer(
        &self,
        label: &str,
        contents: &[u8],
        layout: &PaintAttributeLayout,
    ) -> Self::Buffer;

    /// Overwrite an existing buffer from offset 0. `contents` never exceeds
    /// the buffer size.
    fn update_vertex_buffer(&self, buffer: &Self::Buffer, contents: &[u8]);
}

/// Uniform writes against the active shader program.
///
/// Names the program does not declare are ignored.
pub trait UniformSink {
    /// Write a scalar uniform.
    fn set_uniform_f32(&mut self, name: &str, value: f32);

    /// Write a 4-component color uniform.
    fn set_uniform_color(&mut self, name: &str, color: Color);
}
