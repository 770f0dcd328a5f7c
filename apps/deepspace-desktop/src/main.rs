use anyhow::{Context, Result};
use clap::Parser;
use deepspace_assets::SpriteSheet;
use deepspace_common::{DemoConfig, Rgb};
use deepspace_input::{Action, InputState, Key};
use deepspace_kernel::{World, WorldBounds};
use deepspace_render::{DrawSurface, Palette};
use deepspace_render_wgpu::{ShapeBatch, ShapeRenderer};
use deepspace_tools::{WorldInspector, WorldSummary};
use deepspace_view::{FrameLimiter, FrameStats, FrameTimer, IntervalTimer, ViewController};
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Icon, Window, WindowId};

const ICON_SIZE: u32 = 32;
const MAX_FRAME_DT: Duration = Duration::from_millis(100);
const MAX_INSTANCES: usize = 1 << 20;

#[derive(Parser)]
#[command(name = "deepspace-desktop", about = "Fly through a projected 3D star field")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of generated objects
    #[arg(long)]
    count: Option<usize>,

    /// Start with forward drift disabled
    #[arg(long)]
    no_drift: bool,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyQ => Some(Key::Forward),
        KeyCode::KeyE => Some(Key::Back),
        KeyCode::Escape => Some(Key::Quit),
        _ => None,
    }
}

/// Instance capacity for every frame of `world`, decorative rows included.
fn frame_capacity(world: &World) -> u32 {
    ViewController::max_frame_shapes(world).min(MAX_INSTANCES) as u32
}

fn rgb_to_egui(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.0, c.1, c.2)
}

/// Application state.
struct AppState {
    world: World,
    summary: WorldSummary,
    controller: ViewController,
    palette: Palette,
    input: InputState,
    drift: IntervalTimer,
    status: IntervalTimer,
    frame_times: FrameTimer,
    last_stats: FrameStats,
    last_frame: Instant,
    show_inspector: bool,
    quit: bool,
}

impl AppState {
    fn new(config: &DemoConfig) -> Self {
        let w = &config.world;
        let world = World::generate(
            WorldBounds::new(w.width, w.height, w.depth),
            w.object_count,
            w.seed,
        );
        let m = &config.movement;
        Self {
            summary: WorldInspector::summary(&world),
            world,
            controller: ViewController::from_config(config),
            palette: Palette::flat(),
            input: InputState::new(),
            drift: IntervalTimer::new(Duration::from_millis(m.drift_interval_ms)),
            status: IntervalTimer::new(Duration::from_millis(m.status_interval_ms)),
            frame_times: FrameTimer::new(config.display.frame_rate as usize),
            last_stats: FrameStats::default(),
            last_frame: Instant::now(),
            show_inspector: false,
            quit: false,
        }
    }

    fn update(&mut self, dt: Duration) {
        for action in self.input.held_actions() {
            self.controller.apply(action);
        }
        for _ in 0..self.drift.advance(dt) {
            self.controller.tick();
        }

        self.frame_times.record(dt);
        if self.status.advance(dt) > 0 {
            let p = self.controller.position();
            tracing::debug!(
                x = p.x,
                y = p.y,
                z = p.z,
                visible = self.last_stats.visible,
                avg_ms = self.frame_times.average().as_secs_f32() * 1000.0,
                fps = self.frame_times.fps(),
                "status"
            );
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if code == KeyCode::F1 && pressed {
            self.show_inspector = !self.show_inspector;
            return;
        }
        let Some(key) = map_key(code) else {
            return;
        };
        if !pressed {
            self.input.release(key);
            return;
        }
        match self.input.press(key) {
            Some(Action::Quit) => self.quit = true,
            Some(action) => self.controller.apply(action),
            None => {}
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        let p = self.controller.position();
        egui::Area::new(egui::Id::new("position_hud"))
            .fixed_pos(egui::pos2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::Frame::default()
                    .fill(rgb_to_egui(Rgb::DARK_GREY))
                    .inner_margin(4.0)
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!("Pos:({}, {}, {})", p.x, p.y, p.z))
                                .color(rgb_to_egui(Rgb::GOLD))
                                .monospace(),
                        );
                    });
            });

        if !self.show_inspector {
            return;
        }

        let summary = &self.summary;
        let stats = self.last_stats;
        let motion = self.controller.motion();
        egui::Window::new("Inspector")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "World {}x{}x{}  Seed: {}",
                    summary.bounds.width, summary.bounds.height, summary.bounds.depth, summary.seed
                ));
                ui.label(format!("Placements: {}", summary.placements));
                ui.label(format!("Hash: {:016x}", summary.state_hash));
                for (kind, count) in &summary.kinds {
                    ui.label(format!("  type({kind}): {count}"));
                }
                ui.separator();
                ui.label(format!(
                    "Visible: {}  Buckets: {}  Drawn: {}  Skipped: {}",
                    stats.visible, stats.buckets, stats.drawn, stats.skipped
                ));
                ui.label(format!(
                    "Frame: {:.2} ms ({:.0} fps)",
                    self.frame_times.average().as_secs_f32() * 1000.0,
                    self.frame_times.fps()
                ));
                ui.label(format!(
                    "Drift: {}  Wrap at z > {}",
                    if motion.auto_drift { "on" } else { "off" },
                    motion.wrap_depth
                ));
                ui.separator();
                ui.small("F1: Toggle Inspector | Arrows: Move | Q/E: Step | Esc: Quit");
            });
    }
}

/// Window, GPU and overlay resources; created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: ShapeRenderer,
    batch: ShapeBatch,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    config: DemoConfig,
    state: AppState,
    limiter: FrameLimiter,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(config: DemoConfig) -> Self {
        Self {
            state: AppState::new(&config),
            limiter: FrameLimiter::new(config.display.frame_rate, Instant::now()),
            config,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let display = &self.config.display;
        let mut attrs = Window::default_attributes()
            .with_title(display.title.clone())
            .with_inner_size(PhysicalSize::new(display.width, display.height));
        if let Some(path) = &display.icon {
            match deepspace_assets::load_icon(path, ICON_SIZE)
                .map_err(anyhow::Error::from)
                .and_then(|icon| Ok(Icon::from_rgba(icon.rgba, icon.width, icon.height)?))
            {
                Ok(icon) => attrs = attrs.with_window_icon(Some(icon)),
                Err(e) => tracing::warn!(path = %path.display(), "window icon not loaded: {e:#}"),
            }
        }
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("deepspace_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let capacity = frame_capacity(&self.state.world);
        let mut renderer = ShapeRenderer::new(
            &device,
            &queue,
            surface_format,
            config.width,
            config.height,
            capacity,
        );
        let mut batch = ShapeBatch::new(capacity as usize);

        if let Some(path) = &display.sprite_sheet {
            match SpriteSheet::load(path, display.sprite_cell) {
                Ok(sheet) => {
                    renderer.upload_atlas(&device, &queue, sheet.width(), sheet.height(), sheet.pixels());
                    batch.set_sprite_uvs(sheet.uvs().to_vec());
                    let count = sheet.len().min(u16::MAX as usize) as u16;
                    self.state.palette = Palette::with_sprites(count);
                }
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    "sprite sheet not loaded, using flat shapes: {e}"
                ),
            }
        }

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.gpu = Some(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            batch,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).min(MAX_FRAME_DT);
        self.state.last_frame = now;
        self.limiter.begin_frame(now);
        self.state.update(dt);

        let Self {
            state,
            gpu,
            egui_ctx,
            ..
        } = self;
        let Some(gpu) = gpu.as_mut() else {
            return;
        };

        match state
            .controller
            .draw_frame(&state.world, &state.palette, &mut gpu.batch)
        {
            Ok(stats) => state.last_stats = stats,
            Err(e) => tracing::error!("frame composition failed: {e}"),
        }
        if let Err(e) = gpu.batch.present() {
            tracing::error!("frame dropped: {e}");
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &gpu.batch);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop) {
            tracing::error!("failed to initialise graphics: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.queue, gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(code, key_state == ElementState::Pressed);
                if self.state.quit {
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.limiter.is_due(Instant::now()) {
            if let Some(gpu) = &self.gpu {
                gpu.window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.limiter.deadline()));
    }
}

fn load_config(cli: &Cli) -> Result<DemoConfig> {
    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }
    if let Some(count) = cli.count {
        config.world.object_count = count;
    }
    if cli.no_drift {
        config.movement.auto_drift = false;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = load_config(&cli)?;
    tracing::info!(
        seed = config.world.seed,
        objects = config.world.object_count,
        "deepspace-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
