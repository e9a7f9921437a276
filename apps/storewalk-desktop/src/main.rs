use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use storewalk_commerce::{InMemoryCommerce, perform};
use storewalk_controls::{ControlEvent, ndc_from_screen};
use storewalk_render_wgpu::{WgpuRenderer, store_instances};
use storewalk_store::card::PRODUCTS_PAGE;
use storewalk_store::{
    Assortment, CardAction, Catalog, INSTRUCTIONS, ProductCard, StoreConfig, Walkthrough,
};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "storewalk-desktop", about = "Walk through the virtual store")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Store config (YAML, or JSON by extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Product catalog JSON
    #[arg(long)]
    catalog: Option<PathBuf>,
}

/// Browsers report roughly this many pixels per wheel line.
const WHEEL_LINE_PIXELS: f32 = 100.0;

/// Application state.
struct AppState {
    walk: Walkthrough,
    shop: InMemoryCommerce,
    card: Option<(usize, ProductCard)>,
    toast: Option<String>,
    cursor: PhysicalPosition<f64>,
    size: PhysicalSize<u32>,
    last_frame: Instant,
    scene_dirty: bool,
    leave: bool,
    title: String,
}

impl AppState {
    fn new(walk: Walkthrough) -> Self {
        Self {
            walk,
            shop: InMemoryCommerce::new(),
            card: None,
            toast: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            size: PhysicalSize::new(1280, 720),
            last_frame: Instant::now(),
            scene_dirty: true,
            leave: false,
            title: String::new(),
        }
    }

    fn highlight(&self) -> Option<usize> {
        self.card.as_ref().map(|(index, _)| *index)
    }

    /// Left click on the store. Unlocked clicks inspect the product under
    /// the cursor, or enter the store when there is none.
    fn click(&mut self, window: &Window) {
        if self.walk.is_locked() {
            return;
        }
        let ndc = ndc_from_screen(
            self.cursor.x as f32,
            self.cursor.y as f32,
            self.size.width.max(1) as f32,
            self.size.height.max(1) as f32,
        );
        if self.inspect(ndc) {
            return;
        }
        self.walk.request_lock();
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.walk.resolve_lock(true);
            }
            Err(e) => {
                tracing::warn!("cursor grab failed: {e}");
                self.walk.resolve_lock(false);
            }
        }
    }

    fn inspect(&mut self, ndc: Vec2) -> bool {
        let Some(slot) = self.walk.pick(ndc) else {
            return false;
        };
        let Some(card) = self.walk.card(slot) else {
            return false;
        };
        tracing::info!(slot = slot.index, title = %card.title, "inspecting product");
        self.card = Some((slot.index, card));
        self.toast = None;
        self.scene_dirty = true;
        true
    }

    fn release(&mut self, window: &Window) {
        if self.walk.lock_released() {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("cursor release failed: {e}");
            }
            window.set_cursor_visible(true);
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, window: &Window) {
        if key == KeyCode::Escape && pressed {
            if self.walk.is_locked() {
                self.release(window);
            } else {
                self.close_card();
            }
            return;
        }
        self.walk.key(&format!("{key:?}"), pressed);
    }

    fn close_card(&mut self) {
        if self.card.take().is_some() {
            self.scene_dirty = true;
        }
    }

    fn act(&mut self, action: CardAction) {
        let Some((_, card)) = &self.card else {
            return;
        };
        match action {
            CardAction::AddToCart | CardAction::AddToWishlist => {
                self.toast = Some(match perform(&mut self.shop, action, card) {
                    Ok(Some((list, receipt))) => receipt.message(list).to_string(),
                    Ok(None) => String::new(),
                    Err(e) => {
                        tracing::error!("commerce request failed: {e}");
                        format!("Error: {e}")
                    }
                });
            }
            CardAction::Close => self.close_card(),
            CardAction::ReturnToProducts => self.leave = true,
        }
    }

    fn update(&mut self, dt: f32) {
        for event in self.walk.step(dt) {
            match event {
                ControlEvent::Lock => tracing::info!("entered the store"),
                ControlEvent::Unlock => tracing::info!("pointer released"),
                ControlEvent::Change => {}
            }
        }
    }

    fn status(&self) -> String {
        let (pos, look) = self.walk.pose();
        format!(
            "Store Walk [{}] pos=({:.1}, {:.1}, {:.1}) yaw={:.0}° pitch={:.0}°",
            if self.walk.is_locked() { "locked" } else { "unlocked" },
            pos.x,
            pos.y,
            pos.z,
            look.yaw.to_degrees(),
            look.pitch.to_degrees()
        )
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        egui::Area::new(egui::Id::new("return"))
            .fixed_pos(egui::pos2(24.0, 24.0))
            .show(ctx, |ui| {
                if ui.button("← Return to Products").clicked() {
                    self.leave = true;
                }
            });

        if self.walk.show_instructions() && self.card.is_none() {
            egui::Area::new(egui::Id::new("instructions"))
                .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 20.0))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(INSTRUCTIONS);
                    });
                });
        }

        let mut chosen = None;
        if let Some((_, card)) = &self.card {
            egui::Window::new(card.title.as_str())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(card.description.as_str());
                    ui.strong(card.price_label.as_str());
                    if !card.image.is_empty() {
                        ui.hyperlink_to("Product photo", card.image.as_str());
                    }
                    ui.separator();
                    ui.horizontal(|ui| {
                        for action in [CardAction::AddToCart, CardAction::AddToWishlist] {
                            if ui.button(action.label()).clicked() {
                                chosen = Some(action);
                            }
                        }
                    });
                    for action in [CardAction::Close, CardAction::ReturnToProducts] {
                        if ui.button(action.label()).clicked() {
                            chosen = Some(action);
                        }
                    }
                    if let Some(toast) = &self.toast {
                        ui.label(toast.as_str());
                    }
                });
        }
        if let Some(action) = chosen {
            self.act(action);
        }
    }
}

/// Window plus everything that draws into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Store Walk")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("storewalk_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface has no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct App {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn frame(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        let state = &mut self.state;

        let now = Instant::now();
        let dt = (now - state.last_frame).as_secs_f32().min(0.1);
        state.last_frame = now;
        state.update(dt);

        let title = state.status();
        if title != state.title {
            gpu.window.set_title(&title);
            state.title = title;
        }

        if state.scene_dirty {
            let boxes = store_instances(state.walk.plan(), state.highlight());
            gpu.renderer.upload(&gpu.queue, &boxes);
            state.scene_dirty = false;
        }

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        let camera = state.walk.camera();
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            camera.view_projection(),
            camera.position,
        );

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
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

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.size = gpu.window.inner_size();
                self.state.walk.camera_mut().set_aspect(
                    self.state.size.width,
                    self.state.size.height,
                );
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to start: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };
        // While locked the cursor is hidden and input belongs to the store.
        if !self.state.walk.is_locked() {
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
                gpu.resize(new_size);
                self.state.size = new_size;
                self.state
                    .walk
                    .camera_mut()
                    .set_aspect(new_size.width, new_size.height);
            }
            WindowEvent::Focused(false) => {
                self.state.release(&gpu.window);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed, &gpu.window);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = position;
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.click(&gpu.window);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Wheel down pulls the camera back, as in a browser.
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PIXELS,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.state.walk.zoom(delta_y);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if self.state.leave {
                    tracing::info!(page = PRODUCTS_PAGE, "leaving the store");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.walk.is_locked() {
                self.state
                    .walk
                    .pointer_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    let assortment = match &cli.catalog {
        Some(path) => Assortment::from_catalog(
            &Catalog::load(path).with_context(|| format!("loading catalog {}", path.display()))?,
        ),
        None => Assortment::featured(),
    };

    tracing::info!("storewalk-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        state: AppState::new(Walkthrough::new(config, &assortment)),
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
