//! The stage: scene assembly sequencing and the run loop.
//!
//! A showcase implements [`SceneBuilder`] and hands it to [`run`]. The stage
//! owns the window, the GPU context and a tokio runtime; builders only see
//! the [`Scene`](crate::scene::Scene) they assemble and patch.
//!
//! # Lifecycle
//!
//! 1. The window and GPU context come up.
//! 2. Every builder's `assemble` runs, synchronously and in order. An error
//!    here is fatal and surfaces from [`run`].
//! 3. Patch futures returned from `assemble` are spawned on the runtime.
//!    They resolve whenever their awaited loads finish.
//! 4. The render loop starts and never waits for a load. Each frame drains
//!    the patch inbox, applies resolved patches to the live scene, calls the
//!    builders' `on_frame` hooks, and presents.
//!
//! A patch future that resolves to an error is logged and dropped; the loop
//! keeps presenting whatever scene state exists. [`run_headless`] drives the
//! same sequencing without a window or GPU and returns the final scene, which
//! is what the scenario tests inspect.

use std::sync::Arc;

use instant::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::context::Context;
use crate::render::SceneRenderer;
use crate::resources::AssetRoot;
use crate::scene::Scene;
use crate::scene::patch::ScenePatch;

/// Async work a builder hands to the stage, resolving to the scene patch its
/// continuation built.
pub type PatchFuture = futures::future::BoxFuture<'static, anyhow::Result<ScenePatch>>;

/// Output of the builder hooks.
///
/// `Patches` carries futures the stage spawns; each resolves to a
/// [`ScenePatch`] that is applied to the live scene between two frames.
/// `Configure` adjusts the stage settings at runtime, for instance the
/// fallback clear colour. `Empty` is the default when a hook has nothing
/// asynchronous to do.
pub enum Out {
    Patches(Vec<PatchFuture>),
    Configure(Box<dyn FnOnce(&mut StageSettings)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

/// A showcase scene: synchronous assembly plus an optional per-frame hook.
pub trait SceneBuilder {
    /// Builds the initial scene state: camera, environment, materials,
    /// primitives, lights. Returned patch futures carry the asynchronous
    /// part, typically a model import and its follow-up configuration.
    ///
    /// Runs exactly once, before the first frame. Errors abort the stage.
    fn assemble(&mut self, scene: &mut Scene) -> anyhow::Result<Out>;

    /// Called every frame with the elapsed time since the previous one.
    fn on_frame(&mut self, _scene: &mut Scene, _dt: Duration) -> Out {
        Out::Empty
    }
}

/// Stage-level knobs shared by the windowed and the headless driver.
pub struct StageSettings {
    /// Base directory of the asset tree.
    pub assets: AssetRoot,
    pub title: String,
    /// Clear colour used while no environment dictates one.
    pub clear_colour: wgpu::Color,
    /// Stop after this many presented frames. Used by the gated smoke tests;
    /// interactive runs leave it unset.
    pub max_frames: Option<u64>,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            assets: AssetRoot::default(),
            title: "diorama".to_string(),
            clear_colour: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.08,
                a: 1.0,
            },
            max_frames: None,
        }
    }
}

type PatchSender = mpsc::UnboundedSender<anyhow::Result<ScenePatch>>;
type PatchReceiver = mpsc::UnboundedReceiver<anyhow::Result<ScenePatch>>;

/// Spawns the async part of a hook's output and routes resolved patches into
/// the inbox. `Configure` applies immediately.
fn handle_out(
    runtime: &Runtime,
    inbox: &PatchSender,
    settings: &mut StageSettings,
    out: Out,
    in_flight: &mut Vec<tokio::task::JoinHandle<()>>,
) {
    match out {
        Out::Patches(futures) => {
            for future in futures {
                let inbox = inbox.clone();
                in_flight.push(runtime.spawn(async move {
                    // A closed inbox means the stage is gone; nothing left
                    // to patch.
                    let _ = inbox.send(future.await);
                }));
            }
        }
        Out::Configure(configure) => configure(settings),
        Out::Empty => (),
    }
}

/// Applies everything the inbox holds right now. Failed imports are logged
/// and dropped so the loop keeps ticking on the partial scene.
fn drain_inbox(inbox: &mut PatchReceiver, scene: &mut Scene) {
    while let Ok(result) = inbox.try_recv() {
        match result {
            Ok(patch) => scene.apply(patch),
            Err(error) => log::error!("import failed, scene stays partial: {error:#}"),
        }
    }
}

/// The live window-backed half of the stage.
struct StageState {
    ctx: Context,
    renderer: SceneRenderer,
    scene: Scene,
    inbox: PatchReceiver,
    inbox_sender: PatchSender,
    surface_configured: bool,
    frames_presented: u64,
}

struct App {
    runtime: Runtime,
    builders: Vec<Box<dyn SceneBuilder>>,
    settings: StageSettings,
    state: Option<StageState>,
    in_flight: Vec<tokio::task::JoinHandle<()>>,
    last_time: Instant,
    /// Assembly or surface failure carried out of the event loop so [`run`]
    /// can return it.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(builders: Vec<Box<dyn SceneBuilder>>, settings: StageSettings) -> anyhow::Result<Self> {
        Ok(Self {
            runtime: Runtime::new()?,
            builders,
            settings,
            state: None,
            in_flight: Vec::new(),
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &mut self.state else {
            return;
        };
        let dt = self.last_time.elapsed();
        self.last_time = Instant::now();

        drain_inbox(&mut state.inbox, &mut state.scene);

        for builder in &mut self.builders {
            let out = builder.on_frame(&mut state.scene, dt);
            handle_out(
                &self.runtime,
                &state.inbox_sender,
                &mut self.settings,
                out,
                &mut self.in_flight,
            );
        }

        let camera = &mut state.ctx.camera;
        camera.controller.update(&mut camera.camera, dt);
        camera
            .uniform
            .update_view_proj(&camera.camera, &state.ctx.projection);
        state.ctx.queue.write_buffer(
            &state.ctx.camera.buffer,
            0,
            bytemuck::cast_slice(&[state.ctx.camera.uniform]),
        );
        state.ctx.sync_lights(&state.scene);
        state
            .ctx
            .sync_environment(state.scene.environment(), self.settings.clear_colour);

        if !state.surface_configured {
            state.ctx.window.request_redraw();
            return;
        }

        state.renderer.prepare(&state.ctx, &state.scene);
        match Self::present(state) {
            Ok(()) => {
                state.frames_presented += 1;
                if let Some(max_frames) = self.settings.max_frames {
                    if state.frames_presented >= max_frames {
                        event_loop.exit();
                        return;
                    }
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = state.ctx.window.inner_size();
                state.ctx.resize(size.width, size.height);
            }
            Err(error) => log::error!("unable to render: {error}"),
        }
        state.ctx.window.request_redraw();
    }

    fn present(state: &mut StageState) -> Result<(), wgpu::SurfaceError> {
        let output = state.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Stage Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(state.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            state.renderer.record(&state.ctx, &mut render_pass);
        }
        state.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes().with_title(self.settings.title.clone());
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(error) => return self.fail(event_loop, error.into()),
        };

        let mut ctx = match self.runtime.block_on(Context::new(window)) {
            Ok(ctx) => ctx,
            Err(error) => return self.fail(event_loop, error),
        };

        let mut scene = Scene::new(self.settings.assets.clone());
        let (inbox_sender, inbox) = mpsc::unbounded_channel();
        for builder in &mut self.builders {
            match builder.assemble(&mut scene) {
                Ok(out) => handle_out(
                    &self.runtime,
                    &inbox_sender,
                    &mut self.settings,
                    out,
                    &mut self.in_flight,
                ),
                Err(error) => return self.fail(event_loop, error),
            }
        }
        log::info!("scene assembled, {} nodes at start", scene.node_count());

        ctx.sync_camera(scene.camera());
        ctx.sync_environment(scene.environment(), self.settings.clear_colour);
        let renderer = SceneRenderer::new(&ctx);

        ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(StageState {
            ctx,
            renderer,
            scene,
            inbox,
            inbox_sender,
            surface_configured: false,
            frames_presented: 0,
        });
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            // Mouse look only while the right button is held, and only when
            // the scene asked for camera control.
            let speed_factor = 5.0;
            if state.ctx.mouse_look && state.scene.camera().controllable {
                state
                    .ctx
                    .camera
                    .controller
                    .handle_mouse(dx * speed_factor, dy * speed_factor);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        if state.scene.camera().controllable {
            state.ctx.camera.controller.handle_window_events(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.ctx.resize(size.width, size.height);
                state.surface_configured = size.width > 0 && size.height > 0;
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Right,
                ..
            } => {
                state.ctx.mouse_look = button_state.is_pressed();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }
}

/// Runs the builders against a window until it closes, an error occurs, or
/// `max_frames` is reached.
pub fn run(builders: Vec<Box<dyn SceneBuilder>>, settings: StageSettings) -> anyhow::Result<()> {
    if let Err(error) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {error}");
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::builder()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::builder()
            .with_any_thread(true)
            .build()
            .expect("Failed to create an event loop")
    };

    #[cfg(not(feature = "integration-tests"))]
    let event_loop = EventLoop::new()?;

    let mut app = App::new(builders, settings)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Drives the same assembly/patch sequencing without a window or GPU.
///
/// Ticks `frames` frames with a short cooperative sleep each, so spawned
/// imports get a chance to land between frames exactly like in the windowed
/// loop. After the last frame every still-outstanding patch future is
/// awaited and its patch applied, so callers get the settled scene back for
/// inspection. Assembly errors are fatal here too; failed imports are
/// logged and dropped.
pub fn run_headless(
    mut builders: Vec<Box<dyn SceneBuilder>>,
    mut settings: StageSettings,
    frames: u64,
) -> anyhow::Result<Scene> {
    if let Err(error) = env_logger::try_init() {
        log::debug!("logger already initialized: {error}");
    }

    let runtime = Runtime::new()?;
    let mut scene = Scene::new(settings.assets.clone());
    let (inbox_sender, mut inbox) = mpsc::unbounded_channel();
    let mut in_flight = Vec::new();

    for builder in &mut builders {
        let out = builder.assemble(&mut scene)?;
        handle_out(&runtime, &inbox_sender, &mut settings, out, &mut in_flight);
    }
    log::info!("scene assembled, {} nodes at start", scene.node_count());

    let dt = Duration::from_millis(16);
    for _ in 0..frames {
        runtime.block_on(async { tokio::time::sleep(Duration::from_millis(1)).await });
        drain_inbox(&mut inbox, &mut scene);
        for builder in &mut builders {
            let out = builder.on_frame(&mut scene, dt);
            handle_out(&runtime, &inbox_sender, &mut settings, out, &mut in_flight);
        }
    }

    runtime.block_on(futures::future::join_all(in_flight));
    drain_inbox(&mut inbox, &mut scene);
    Ok(scene)
}
