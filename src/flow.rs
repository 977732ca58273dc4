//! Window, event loop and frame driving.
//!
//! [`run`] opens the window and drives [`App`] through winit's
//! [`ApplicationHandler`]. The GPU context, renderer and control panel are
//! created on the first `resumed` event; any failure there ends the event loop
//! and is returned from [`run`].
//!
//! # Keys
//!
//! All keys act on release.
//!
//! - `Escape` quits
//! - `G` shows or hides the control panel
//! - `PrintScreen` writes `screenshot-<unix-seconds>.png` to the working directory

use std::{
    collections::VecDeque,
    iter,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;
use instant::{Duration, Instant};
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    context::Context,
    filter::FilterParameterState,
    pipelines::gui::PanelPipeline,
    render::Renderer,
    resources::{load_glyph_atlas, load_scene_assets},
    settings::{WINDOW_SIZE, WINDOW_TITLE},
    ui::{ControlPanel, filter_controls},
};

/// Everything that exists once the window is up.
pub struct AppState {
    ctx: Context,
    renderer: Renderer,
    panel: ControlPanel,
    panel_pipeline: PanelPipeline,
    params: FilterParameterState,
    stats: FrameStats,
}

impl AppState {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let (ctx, assets, atlas) = futures::try_join!(
            Context::new(window),
            load_scene_assets(),
            load_glyph_atlas()
        )?;
        let renderer = Renderer::initialize(
            &ctx.device,
            &ctx.queue,
            ctx.config.format,
            &assets,
            ctx.size(),
        )
        .context("failed to initialise the renderer")?;
        let panel_pipeline = PanelPipeline::new(&ctx.device, &ctx.queue, ctx.config.format, atlas);

        Ok(Self {
            ctx,
            renderer,
            panel: ControlPanel::new(),
            panel_pipeline,
            params: FilterParameterState::default(),
            stats: FrameStats::new(),
        })
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if self.params.ui_visible {
            self.panel.begin_frame();
            filter_controls(&mut self.panel, &mut self.params, self.stats.average());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let size = self.ctx.size();
        self.renderer.render_frame(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &view,
            size,
            &self.params,
        );
        if self.params.ui_visible {
            self.panel.render(
                &mut self.panel_pipeline,
                &self.ctx.device,
                &self.ctx.queue,
                &mut encoder,
                &view,
                size,
            );
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        self.stats.frame();
        Ok(())
    }

    /// Render the current scene offscreen and save it as a PNG.
    fn screenshot(&mut self, async_runtime: &Runtime) -> anyhow::Result<PathBuf> {
        let size = self.ctx.size();
        let img = async_runtime.block_on(self.renderer.capture(
            &self.ctx.device,
            &self.ctx.queue,
            size,
            &self.params,
        ))?;
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let path = PathBuf::from(format!("screenshot-{secs}.png"));
        img.save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    fn handle_key(&mut self, code: KeyCode, event_loop: &ActiveEventLoop, async_runtime: &Runtime) {
        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyG => {
                self.params.toggle_ui();
                if !self.params.ui_visible {
                    self.panel.reset_input();
                }
                log::info!(
                    "control panel {}",
                    if self.params.ui_visible { "shown" } else { "hidden" }
                );
            }
            KeyCode::PrintScreen => match self.screenshot(async_runtime) {
                Ok(path) => log::info!("saved screenshot to {}", path.display()),
                Err(e) => log::error!("screenshot failed: {e:#}"),
            },
            _ => {}
        }
    }
}

/// Frame timing: a rolling average for the panel readout, also logged at
/// `debug` every few seconds.
#[derive(Debug)]
pub struct FrameStats {
    last_frame: Instant,
    recent: VecDeque<Duration>,
    since: Instant,
    frames: u32,
}

impl FrameStats {
    /// Number of frames the average spans.
    pub const WINDOW: usize = 120;
    const LOG_INTERVAL: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            recent: VecDeque::with_capacity(Self::WINDOW),
            since: now,
            frames: 0,
        }
    }

    /// Mark the end of a presented frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        self.record(now - self.last_frame);
        self.last_frame = now;

        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Self::LOG_INTERVAL {
            log::debug!("{:.1} fps", self.frames as f64 / elapsed.as_secs_f64());
            self.since = now;
            self.frames = 0;
        }
    }

    pub fn record(&mut self, frame_time: Duration) {
        if self.recent.len() == Self::WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(frame_time);
    }

    /// Mean of the last [`FrameStats::WINDOW`] frame times, zero before the first frame.
    pub fn average(&self) -> Duration {
        if self.recent.is_empty() {
            return Duration::ZERO;
        }
        self.recent.iter().sum::<Duration>() / self.recent.len() as u32
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    async_runtime: Runtime,
    state: Option<AppState>,
    /// Set when setup failed; returned from [`run`] after the loop exits.
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new() -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .context("failed to start the async runtime")?;
        Ok(Self {
            async_runtime,
            state: None,
            fatal: None,
        })
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<AppState> {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create the window")?,
        );
        self.async_runtime.block_on(AppState::new(window))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.setup(event_loop) {
            Ok(state) => {
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("setup failed: {e:#}");
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.params.ui_visible && state.panel.handle_window_event(&event) {
            // Pointer input that lands on the panel goes no further.
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Released,
                        ..
                    },
                ..
            } => state.handle_key(code, event_loop, &self.async_runtime),
            WindowEvent::RedrawRequested => {
                let size = state.ctx.window.inner_size();
                if size.width == 0 || size.height == 0 {
                    return;
                }
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.ctx.resize(size);
                        state.ctx.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Unable to render {e}"),
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.fatal.is_none() {
            log::info!("shutting down");
        }
        self.state = None;
    }
}

/// Open the window and run the demo until it is closed.
pub fn run() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        eprintln!("Warning: Could not initialize logger: {e}");
    }

    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    let mut app = App::new()?;
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
