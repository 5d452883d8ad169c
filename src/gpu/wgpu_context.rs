//! wgpu implementation of [`GpuContext`].

use wgpu::util::DeviceExt;

use super::{
    attributes::PaintAttributeLayout,
    context::{GpuContext, PaintBuffer},
};

/// Borrowed device and queue of the render thread.
pub struct WgpuContext<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> WgpuContext<'a> {
    /// Wrap a device and queue.
    #[must_use]
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

/// A paint vertex buffer on the GPU together with its attribute layout.
#[derive(Debug)]
pub struct WgpuVertexBuffer {
    buffer: wgpu::Buffer,
    layout: PaintAttributeLayout,
}

impl WgpuVertexBuffer {
    /// The wgpu buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// The attribute layout the buffer was created with.
    #[must_use]
    pub fn layout(&self) -> &PaintAttributeLayout {
        &self.layout
    }
}

impl PaintBuffer for WgpuVertexBuffer {
    fn destroy(&self) {
        self.buffer.destroy();
    }

    fn size(&self) -> u64 {
        self.buffer.size()
    }
}

impl GpuContext for WgpuContext<'_> {
    type Buffer = WgpuVertexBuffer;

    fn create_vertex_buffer(
        &self,
        label: &str,
        contents: &[u8],
        layout: &PaintAttributeLayout,
    ) -> WgpuVertexBuffer {
        let buffer =
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage: wgpu::BufferUsages::VERTEX
                        | wgpu::BufferUsages::COPY_DST,
                });
        WgpuVertexBuffer {
            buffer,
            layout: layout.clone(),
        }
    }

    fn update_vertex_buffer(&self, buffer: &WgpuVertexBuffer, contents: &[u8]) {
        if contents.is_empty() {
            return;
        }
        self.queue.write_buffer(&buffer.buffer, 0, contents);
    }
}
