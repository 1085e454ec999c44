//! Central GPU and window context.
//!
//! Owns the device, queue, surface and the camera/light GPU residency, and
//! mirrors the relevant parts of a [`Scene`] into uniforms each frame. The
//! scene stays pure data; this is the only place where its state meets wgpu.

use std::sync::Arc;

use cgmath::EuclideanSpace;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::{self, CameraResources, CameraUniform, FreeCamera, Projection};
use crate::scene::light::LightKind;
use crate::scene::{Environment, Scene};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Uniform block for the single key light the forward pass shades with.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct KeyLightUniform {
    pub position: [f32; 3],
    // uniforms want fields spaced by 16 bytes
    _padding: u32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl KeyLightUniform {
    pub fn new(position: [f32; 3], color: [f32; 3], intensity: f32) -> Self {
        Self {
            position,
            _padding: 0,
            color,
            intensity,
        }
    }
}

/// Key light uniform plus its GPU residency.
pub struct KeyLightResources {
    pub uniform: KeyLightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl KeyLightResources {
    fn new(device: &wgpu::Device, uniform: KeyLightUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Key Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("key_light_bind_group_layout"),
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("key_light_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group_layout,
            bind_group,
        }
    }
}

pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_view: wgpu::TextureView,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub key_light: KeyLightResources,
    pub clear_colour: wgpu::Color,
    /// Right mouse button held, gating mouse-look.
    pub(crate) mouse_look: bool,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        log::warn!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::warn!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        log::warn!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface; on anything else the colours
        // come out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Scene assembly overwrites this once the builders have run.
        let camera = camera::Camera::from_free(&FreeCamera::default());
        let projection =
            camera::Projection::new(config.width, config.height, cgmath::Deg(45.0), 0.1, 500.0);
        let camera_controller = camera::CameraController::new(1.0, 0.4);

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera, &projection);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let camera = CameraResources {
            camera,
            controller: camera_controller,
            uniform: camera_uniform,
            buffer: camera_buffer,
            bind_group: camera_bind_group,
            bind_group_layout: camera_bind_group_layout,
        };

        let depth_view = create_depth_view(&device, [config.width, config.height]);

        let key_light = KeyLightResources::new(
            &device,
            KeyLightUniform::new([8.0, 80.0, 50.0], [1.0, 1.0, 1.0], 1.0),
        );

        Ok(Self {
            window,
            depth_view,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            key_light,
            clear_colour: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.08,
                a: 1.0,
            },
            mouse_look: false,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, [width, height]);
        self.projection.resize(width, height);
    }

    /// Adopts a scene's declarative camera for the live one.
    pub(crate) fn sync_camera(&mut self, free: &FreeCamera) {
        self.camera.camera = camera::Camera::from_free(free);
        self.camera.controller.speed = free.speed;
    }

    /// Picks the scene's key light and writes it into the uniform. Shadowing
    /// lights win over plain ones; without any light the stock overhead
    /// light stays.
    pub(crate) fn sync_lights(&mut self, scene: &Scene) {
        let lights = scene.lights();
        let Some(light) = lights
            .iter()
            .find(|light| light.shadow_enabled)
            .or_else(|| lights.first())
        else {
            return;
        };
        let position = match &light.kind {
            LightKind::Point { position } | LightKind::Spot { position, .. } => {
                let mut position = *position;
                if let Some(parent) = &light.parent {
                    if let Some(offset) = scene.find(parent).and_then(|id| scene.world_position(id))
                    {
                        position += offset;
                    }
                }
                position.to_vec().into()
            }
            LightKind::Hemispheric { direction, .. } => (direction * 50.0).into(),
            LightKind::Directional { direction } => (direction * -50.0).into(),
        };
        self.key_light.uniform = KeyLightUniform::new(position, light.diffuse, light.intensity);
        self.queue.write_buffer(
            &self.key_light.buffer,
            0,
            bytemuck::cast_slice(&[self.key_light.uniform]),
        );
    }

    /// Derives the clear colour from the environment's average tone, or
    /// falls back to the configured one.
    pub(crate) fn sync_environment(&mut self, environment: Option<&Environment>, fallback: wgpu::Color) {
        self.clear_colour = match environment {
            Some(environment) => {
                let [r, g, b] = environment.ambient;
                wgpu::Color {
                    r: (r * environment.intensity) as f64,
                    g: (g * environment.intensity) as f64,
                    b: (b * environment.intensity) as f64,
                    a: 1.0,
                }
            }
            None => fallback,
        };
    }
}

pub(crate) fn create_depth_view(device: &wgpu::Device, size: [u32; 2]) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
