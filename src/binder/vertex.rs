//! Vertex-buffer state shared by source and composite binders.

use super::paint_array::PaintVertexArray;
use crate::{
    error::BindError,
    gpu::{GpuContext, PaintAttributeLayout, PaintBuffer, PaintLayout},
    options::BindingOptions,
    style::PaintProperty,
};

/// CPU paint array, its attribute layout and, once uploaded, the GPU buffer.
#[derive(Debug)]
pub(crate) struct VertexBinding<B> {
    pub(crate) property: PaintProperty,
    pub(crate) names: Vec<String>,
    /// `a_<name>_t` interpolation uniforms, one per name.
    pub(crate) uniform_names: Vec<String>,
    pub(crate) layout: PaintLayout,
    pub(crate) attribute_layout: PaintAttributeLayout,
    pub(crate) array: PaintVertexArray,
    buffer: Option<B>,
    /// Array contents changed since the buffer was written.
    dirty: bool,
    /// CPU array was dropped after upload.
    released: bool,
}

impl<B: PaintBuffer> VertexBinding<B> {
    pub(crate) fn new(property: PaintProperty, layout: PaintLayout, reserve: usize) -> Self {
        let names = property.attribute_names();
        let attribute_layout = PaintAttributeLayout::new(layout, &names);
        let uniform_names = names.iter().map(|n| format!("a_{n}_t")).collect();
        Self {
            property,
            names,
            uniform_names,
            layout,
            attribute_layout,
            array: PaintVertexArray::with_capacity(layout.stride(), reserve),
            buffer: None,
            dirty: false,
            released: false,
        }
    }

    /// Pad the array to `length` vertices with `vertex`.
    pub(crate) fn extend_to(&mut self, length: usize, vertex: &[u8]) -> Result<(), BindError> {
        if self.released {
            return Err(BindError::PaintArrayReleased(self.property));
        }
        self.array.extend_to(length, vertex);
        self.dirty = true;
        Ok(())
    }

    /// Overwrite a vertex range. Returns `false` when the CPU array is gone.
    pub(crate) fn write_range(&mut self, start: usize, end: usize, vertex: &[u8]) -> bool {
        if self.released {
            log::warn!(
                "'{}': paint array released after upload; feature-state update skipped",
                self.property.name()
            );
            return false;
        }
        self.array.write_range(start, end, vertex);
        self.dirty = true;
        true
    }

    pub(crate) fn upload<C>(&mut self, context: &C, options: &BindingOptions)
    where
        C: GpuContext<Buffer = B>,
    {
        if self.released || !self.dirty || self.array.is_empty() {
            return;
        }
        match &self.buffer {
            Some(buffer) => {
                context.update_vertex_buffer(buffer, self.array.as_bytes());
                log::trace!(
                    "'{}': rewrote {} paint bytes",
                    self.property.name(),
                    self.array.as_bytes().len()
                );
            }
            None => {
                let label = format!("{} {}", options.buffer_label_prefix, self.property.name());
                let buffer = context.create_vertex_buffer(
                    &label,
                    self.array.as_bytes(),
                    &self.attribute_layout,
                );
                log::trace!(
                    "'{}': uploaded {} vertices ({} bytes)",
                    self.property.name(),
                    self.array.len(),
                    buffer.size()
                );
                self.buffer = Some(buffer);
            }
        }
        self.dirty = false;
        if !options.retain_paint_arrays {
            self.array.release();
            self.released = true;
        }
    }

    pub(crate) fn destroy(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.destroy();
        }
    }

    pub(crate) fn buffer(&self) -> Option<&B> {
        self.buffer.as_ref()
    }
}
