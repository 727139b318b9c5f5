use anyhow::Result;
use earthmap::{EarthMap, World};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use tracing::{debug, info};
use winit::dpi::PhysicalSize;

use crate::camera::Camera;
use crate::types::ViewerConfig;

use super::context::GpuContext;
use super::mesh::PlaneMesh;
use super::pipeline::FadePipeline;
use super::textures::MaterialTexture;
use super::uniforms::{FadeUniforms, ModelCache};

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// GPU objects that only exist once the earth map has been built.
struct EarthMapBindings {
    pipeline: FadePipeline,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    _texture: MaterialTexture,
    mesh: PlaneMesh,
}

impl EarthMapBindings {
    fn new(context: &GpuContext, uniform_buffer: &wgpu::Buffer, map: &EarthMap) -> Self {
        let device = &context.device;
        let material = map.surface().material();
        let pipeline = FadePipeline::new(
            device,
            material,
            context.surface_format,
            context.sample_count,
        );
        let texture = MaterialTexture::upload(
            device,
            &context.queue,
            &material.texture,
            &material.sampling,
            context.color_space,
        );
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fade uniform bind group"),
            layout: &pipeline.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fade texture bind group"),
            layout: &pipeline.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });
        let mesh = PlaneMesh::upload(device, map.surface().geometry());
        info!("earth map pipeline ready");
        Self {
            pipeline,
            uniform_bind_group,
            texture_bind_group,
            _texture: texture,
            mesh,
        }
    }
}

pub(crate) struct GpuState {
    context: GpuContext,
    camera: Camera,
    uniforms: FadeUniforms,
    uniform_buffer: wgpu::Buffer,
    model_cache: ModelCache,
    earth_map: Option<EarthMapBindings>,
    multisample_target: Option<MultisampleTarget>,
}

impl GpuState {
    pub(crate) fn new<T>(target: &T, size: PhysicalSize<u32>, config: &ViewerConfig) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, size, config.antialiasing, config.color_space)?;
        let aspect = context.size.width as f32 / context.size.height.max(1) as f32;
        let camera = Camera::new(&config.scene.camera, aspect);
        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fade uniforms"),
            size: std::mem::size_of::<FadeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });

        Ok(Self {
            context,
            camera,
            uniforms: FadeUniforms::new(),
            uniform_buffer,
            model_cache: ModelCache::default(),
            earth_map: None,
            multisample_target,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.context.resize(new_size);
        self.camera
            .set_aspect(new_size.width as f32 / new_size.height as f32);
        if self.context.sample_count > 1 {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                new_size,
                self.context.sample_count,
            ));
        }
    }

    /// Uploads the world's current state and draws one frame.
    pub(crate) fn render(&mut self, world: &World) -> Result<(), wgpu::SurfaceError> {
        if let Some(map) = world.earth_map() {
            self.sync_earth_map(world, map);
        }

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        let [r, g, b, a] = world
            .environment()
            .map(|environment| environment.background())
            .unwrap_or([0.0, 0.0, 0.0, 1.0]);
        let clear = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };

        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(&view)),
            None => (&view, None),
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("earth map pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            if let Some(bindings) = self.earth_map.as_ref() {
                render_pass.set_pipeline(&bindings.pipeline.pipeline);
                render_pass.set_bind_group(0, &bindings.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, &bindings.texture_bind_group, &[]);
                bindings.mesh.draw(&mut render_pass);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Builds GPU resources on first sight of the earth map, rebuilds the mesh
    /// after a resize and writes this frame's uniforms.
    fn sync_earth_map(&mut self, world: &World, map: &EarthMap) {
        let surface = map.surface();
        match self.earth_map.as_mut() {
            Some(bindings) => bindings.mesh.sync(&self.context.device, surface.geometry()),
            None => {
                self.earth_map = Some(EarthMapBindings::new(
                    &self.context,
                    &self.uniform_buffer,
                    map,
                ));
            }
        }

        let model = world.root_transform() * self.model_cache.model_matrix(surface.placement());
        self.uniforms
            .set_matrices(self.camera.view_projection(), model);
        let material = surface.material();
        self.uniforms
            .set_uniforms(&material.program.uniforms(&material.params));
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );
        debug!(
            time = self.uniforms.time,
            max_distance = self.uniforms.max_distance,
            strength = self.uniforms.strength,
            "uniforms uploaded"
        );
    }
}
