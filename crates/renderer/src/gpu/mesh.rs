use bytemuck::{Pod, Zeroable};
use earthmap::PlaneGeometry;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub(crate) struct GpuVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl GpuVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Vertex and index buffers for the plane, tagged with the geometry
/// generation they were built from.
pub(crate) struct PlaneMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    generation: u64,
}

impl PlaneMesh {
    pub fn upload(device: &wgpu::Device, geometry: &PlaneGeometry) -> Self {
        let vertices = geometry.vertices().map(|vertex| GpuVertex {
            position: vertex.position,
            uv: vertex.uv,
        });
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane vertex buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("plane index buffer"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        tracing::debug!(
            generation = geometry.generation(),
            width = geometry.width(),
            height = geometry.height(),
            "uploaded plane mesh"
        );
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices().len() as u32,
            generation: geometry.generation(),
        }
    }

    /// Rebuilds the buffers when the geometry has been replaced.
    pub fn sync(&mut self, device: &wgpu::Device, geometry: &PlaneGeometry) {
        if self.generation != geometry.generation() {
            *self = Self::upload(device, geometry);
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
