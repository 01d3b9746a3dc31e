use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::assembler::{assemble, AssembledScene};
use crate::assets::{AssetLoader, AssetSource, PumpReport};
use crate::config::SceneConfig;
use crate::controls::CameraControls;
use crate::driver::{run_frame, TickReport};
use crate::frame::{FpsCounter, FrameIterator};
use crate::input::InputState;
use crate::render::{HudStats, NullRenderer, Renderer, SceneRenderer};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;

/// Scene, loader and the pieces the frame loop mutates
pub struct Session {
    pub assembled: AssembledScene,
    pub loader: AssetLoader,
    pub input: InputState,
    /// Latest frame rate shown on the HUD
    pub fps: f32,
}

impl Session {
    pub fn new(config: &SceneConfig, source: Arc<dyn AssetSource>, aspect: f32) -> Self {
        let mut loader = AssetLoader::new(source);
        let assembled = assemble(config, &mut loader, aspect);
        Self {
            assembled,
            loader,
            input: InputState::new(),
            fps: 0.0,
        }
    }

    /// Route wheel travel to the scroll camera, if the scene has one
    pub fn on_scroll(&mut self, pixels: f32) {
        let AssembledScene {
            scene,
            camera,
            scroll,
            ..
        } = &mut self.assembled;
        if let Some(rig) = scroll {
            rig.scroll(pixels, camera, scene);
        }
    }

    /// Apply finished loads, feed input to the controls, then run one frame
    pub fn tick(&mut self, renderer: &mut dyn Renderer, viewport_height: f32) -> (PumpReport, TickReport) {
        let pumped = self.loader.pump(&mut self.assembled.scene);
        renderer.set_stats(self.stats(self.fps));

        let input = self.input.take_frame();
        let AssembledScene {
            scene,
            camera,
            driver,
            controls,
            ..
        } = &mut self.assembled;

        let controls = controls.as_mut().map(|controls| {
            controls.handle_input(&input, viewport_height);
            controls as &mut dyn CameraControls
        });
        let report = run_frame(driver, scene, camera, controls, renderer);
        (pumped, report)
    }

    pub fn stats(&self, fps: f32) -> HudStats {
        HudStats {
            fps,
            frame: self.assembled.driver.frame(),
            slots_loaded: self.assembled.loaded_slots(),
            slots_total: self.assembled.slots.len(),
            pending_loads: self.loader.pending(),
        }
    }
}

struct Running {
    renderer: SceneRenderer,
    session: Session,
}

/// Windowed viewer driven by the winit event loop
pub struct App {
    config: SceneConfig,
    source: Arc<dyn AssetSource>,
    show_hud: bool,
    frame_limit: Option<u64>,
    running: Option<Running>,
    frames: FrameIterator,
    fps: FpsCounter,
    error: Option<anyhow::Error>,
}

impl App {
    pub fn new(config: SceneConfig, source: Arc<dyn AssetSource>, show_hud: bool, frame_limit: Option<u64>) -> Self {
        Self {
            config,
            source,
            show_hud,
            frame_limit,
            running: None,
            frames: FrameIterator::new(),
            fps: FpsCounter::new(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let window = event_loop.create_window(
            Window::default_attributes()
                .with_title("Planet Scene")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        )?;
        let window = Arc::new(window);

        let renderer = pollster::block_on(SceneRenderer::new(window.clone(), self.show_hud))?;
        let (width, height) = renderer.size();
        let session = Session::new(&self.config, self.source.clone(), width as f32 / height as f32);

        Ok(Running { renderer, session })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        let Some(frame) = self.frames.next() else {
            return;
        };
        if let Some(fps) = self.fps.tick(frame.delta) {
            log::debug!("FPS: {:.1}", fps);
        }

        running.session.fps = self.fps.fps();
        let height = running.renderer.size().1 as f32;
        let (pumped, _) = running.session.tick(&mut running.renderer, height);
        if !pumped.is_empty() {
            log::debug!("Frame {}: {:?}", frame.number, pumped);
        }

        if self.frame_limit.is_some_and(|limit| frame.number + 1 >= limit) {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                log::error!("Failed to start viewer: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(running) = self.running.as_mut() {
            if running.renderer.handle_window_event(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(running) = self.running.as_mut() {
                    running.renderer.resize(size.width, size.height);
                    running
                        .session
                        .assembled
                        .camera
                        .set_aspect(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(running) = self.running.as_mut() {
                    if let Some(pixels) = running.session.input.process_event(&other) {
                        running.session.on_scroll(pixels);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.renderer.window().request_redraw();
        }
    }
}

/// Open a window and run until it is closed (or `frame_limit` frames have been drawn)
pub fn run(config: SceneConfig, source: Arc<dyn AssetSource>, show_hud: bool, frame_limit: Option<u64>) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, source, show_hud, frame_limit);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// What a headless run ended with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub slots_loaded: usize,
    pub slots_total: usize,
    pub root_children: usize,
    pub static_children: usize,
    pub failed_loads: Vec<String>,
}

/// Run the frame loop against a [`NullRenderer`], sleeping `interval` between ticks
pub fn run_headless(config: &SceneConfig, source: Arc<dyn AssetSource>, frames: u64, interval: Duration) -> Result<HeadlessSummary> {
    if frames == 0 {
        return Err(anyhow!("Headless run needs at least one frame"));
    }
    let mut session = Session::new(config, source, 16.0 / 9.0);
    let mut renderer = NullRenderer::new();
    let mut failed_loads = Vec::new();

    for _ in 0..frames {
        let (pumped, _) = session.tick(&mut renderer, INITIAL_WINDOW_HEIGHT as f32);
        failed_loads.extend(pumped.failed);
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    let summary = HeadlessSummary {
        frames: renderer.frames,
        slots_loaded: session.assembled.loaded_slots(),
        slots_total: session.assembled.slots.len(),
        root_children: session.assembled.scene.child_count(),
        static_children: session.assembled.static_children,
        failed_loads,
    };
    log::info!(
        "Headless run finished: {} frames, {}/{} models loaded, {} failed loads",
        summary.frames,
        summary.slots_loaded,
        summary.slots_total,
        summary.failed_loads.len()
    );
    Ok(summary)
}
