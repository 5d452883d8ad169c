//! Paint uniform block for wgpu programs.
//!
//! wgpu has no per-name uniform locations, so paint uniforms are staged in a
//! CPU block of `vec4<f32>` slots, one per uniform name in binder order, and
//! written to a uniform buffer before drawing. Shaders declare the matching
//! struct with one `vec4<f32>` field per slot; scalars live in `.x`.

use wgpu::util::DeviceExt;

use super::context::UniformSink;
use crate::style::Color;

/// Bytes per uniform slot.
const SLOT_SIZE: u64 = 16;

/// Staged paint uniforms of one program variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramUniforms {
    names: Vec<String>,
    slots: Vec<[f32; 4]>,
}

impl ProgramUniforms {
    /// Zeroed block with one slot per name.
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let slots = vec![[0.0; 4]; names.len()];
        Self { names, slots }
    }

    /// Uniform names in slot order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Current contents of a slot.
    #[must_use]
    pub fn slot(&self, name: &str) -> Option<[f32; 4]> {
        self.index_of(name).map(|i| self.slots[i])
    }

    /// Raw bytes of all slots.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    /// Buffer size in bytes. Never zero; empty blocks keep one padding slot.
    #[must_use]
    pub fn size(&self) -> u64 {
        (self.slots.len() as u64).max(1) * SLOT_SIZE
    }

    /// Create a uniform buffer sized for this block.
    #[must_use]
    pub fn create_buffer(&self, device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        let padding = [[0.0f32; 4]];
        let contents: &[u8] = if self.slots.is_empty() {
            bytemuck::cast_slice(&padding)
        } else {
            self.as_bytes()
        };
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Write the staged slots to `buffer`.
    pub fn write(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        if self.slots.is_empty() {
            return;
        }
        queue.write_buffer(buffer, 0, self.as_bytes());
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn set_slot(&mut self, name: &str, value: [f32; 4]) {
        match self.index_of(name) {
            Some(i) => self.slots[i] = value,
            None => log::trace!("uniform '{name}' not declared by program"),
        }
    }
}

impl UniformSink for ProgramUniforms {
    fn set_uniform_f32(&mut self, name: &str, value: f32) {
        self.set_slot(name, [value, 0.0, 0.0, 0.0]);
    }

    fn set_uniform_color(&mut self, name: &str, color: Color) {
        self.set_slot(name, color.to_array());
    }
}
