//! Recording doubles for the GPU seams, shared by unit tests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    gpu::{GpuContext, PaintAttributeLayout, PaintBuffer, UniformSink},
    style::Color,
};

/// Decode native-endian `f32`s from a byte slice.
pub(crate) fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// One `create_vertex_buffer` call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CreatedBuffer {
    pub(crate) id: usize,
    pub(crate) label: String,
    pub(crate) attributes: Vec<String>,
    pub(crate) stride: u64,
    pub(crate) bytes: usize,
}

#[derive(Debug, Default)]
struct Log {
    created: RefCell<Vec<CreatedBuffer>>,
    updated: RefCell<Vec<(usize, usize)>>,
    destroyed: Cell<usize>,
}

/// Buffer handle produced by [`RecordingContext`].
#[derive(Debug)]
pub(crate) struct RecordingBuffer {
    pub(crate) id: usize,
    size: u64,
    log: Rc<Log>,
}

impl PaintBuffer for RecordingBuffer {
    fn destroy(&self) {
        self.log.destroyed.set(self.log.destroyed.get() + 1);
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// GPU context that records buffer traffic instead of touching a device.
#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    log: Rc<Log>,
}

impl RecordingContext {
    pub(crate) fn created(&self) -> Vec<CreatedBuffer> {
        self.log.created.borrow().clone()
    }

    /// `(buffer id, bytes)` per update.
    pub(crate) fn updated(&self) -> Vec<(usize, usize)> {
        self.log.updated.borrow().clone()
    }

    pub(crate) fn destroyed(&self) -> usize {
        self.log.destroyed.get()
    }
}

impl GpuContext for RecordingContext {
    type Buffer = RecordingBuffer;

    fn create_vertex_buffer(
        &self,
        label: &str,
        contents: &[u8],
        layout: &PaintAttributeLayout,
    ) -> RecordingBuffer {
        let mut created = self.log.created.borrow_mut();
        let id = created.len();
        created.push(CreatedBuffer {
            id,
            label: label.to_owned(),
            attributes: layout.attributes.iter().map(|a| a.name.clone()).collect(),
            stride: layout.stride,
            bytes: contents.len(),
        });
        RecordingBuffer {
            id,
            size: contents.len() as u64,
            log: Rc::clone(&self.log),
        }
    }

    fn update_vertex_buffer(&self, buffer: &RecordingBuffer, contents: &[u8]) {
        self.log.updated.borrow_mut().push((buffer.id, contents.len()));
    }
}

/// Uniform sink that keeps every write in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingUniforms {
    pub(crate) floats: Vec<(String, f32)>,
    pub(crate) colors: Vec<(String, Color)>,
}

impl UniformSink for RecordingUniforms {
    fn set_uniform_f32(&mut self, name: &str, value: f32) {
        self.floats.push((name.to_owned(), value));
    }

    fn set_uniform_color(&mut self, name: &str, color: Color) {
        self.colors.push((name.to_owned(), color));
    }
}
