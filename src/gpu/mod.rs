//! GPU resource seams and the wgpu backend.
//!
//! Binders talk to the GPU only through [`context`]. The remaining modules
//! provide the wgpu implementation: vertex layouts, buffer creation, the
//! paint uniform block and define-driven shader composition.

/// Paint vertex layouts and the layout exception table.
pub mod attributes;
/// GPU context, buffer and uniform traits.
pub mod context;
/// WGSL shader composition with paint defines via naga-oil.
pub mod shader_composer;
/// Paint uniform staging block.
pub mod uniforms;
/// wgpu-backed context and vertex buffers.
pub mod wgpu_context;

pub use attributes::{PaintAttribute, PaintAttributeLayout, PaintLayout, PaintVertexLayout, PatternVertex};
pub use context::{GpuContext, PaintBuffer, UniformSink};
pub use uniforms::ProgramUniforms;
pub use wgpu_context::{WgpuContext, WgpuVertexBuffer};
