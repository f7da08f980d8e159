//! Glimpse Viewer -- window setup and the winit side of the frame loop.
//!
//! winit owns the blocking wait: after each tick the loop asks for
//! `ControlFlow::WaitUntil(now + wait_timeout)`, so the thread sleeps until
//! input arrives or the timeout passes. Window events delivered during that
//! wake-up are converted to `InputEvent`s and queued; `about_to_wait` then
//! hands the whole batch to `FrameLoop::ingest` (coalescing) and runs one
//! `FrameLoop::tick` (continuous motion + render).
//!
//! Shader hot reload: with `assets.hot_reload` enabled, the two shader files
//! are polled by mtime at tick boundaries, and `R` forces a reload. A reload
//! builds a fresh program and only replaces the current one on success.

mod keymap;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use gv_core::config::AssetSettings;
use gv_core::{
    load_config_or_default, FileWatcher, FlyCamera, FrameLoop, InputEvent, Key, ViewerConfig,
};
use gv_platform::PlatformConfig;
use gv_render::{
    checkerboard, load_image_from_path, GpuContext, ImageData, Projection, SceneLayouts,
    SceneProgram, SceneRenderer, ShaderProgram,
};

const DEFAULT_CONFIG_PATH: &str = "assets/viewer.json";
const TITLE_REFRESH: Duration = Duration::from_secs(1);

/// Everything that lives between window creation and teardown.
///
/// Field order is drop order: the scene and program hold GPU objects and must
/// go before `gpu`.
struct ViewerState {
    scene: SceneRenderer,
    program: SceneProgram,
    layouts: SceneLayouts,
    gpu: GpuContext,
    window: Arc<Window>,

    camera: FlyCamera,
    frame_loop: FrameLoop,
    projection: Projection,
    pending: Vec<InputEvent>,

    assets: AssetSettings,
    shader_watcher: Option<FileWatcher>,
    title: String,
    last_title_refresh: Instant,
}

impl ViewerState {
    fn new(window: Arc<Window>, config: &ViewerConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let layouts = SceneLayouts::new(&gpu.device);

        let assets = config.assets.clone();
        let mut program = ShaderProgram::new(layouts.shader_backend(&gpu));
        if !program.init_with_paths(&assets.vertex_shader, &assets.fragment_shader) {
            return Err(format!("Shader program setup failed: {}", program.error()));
        }
        log::info!(
            "Shader program linked from {} + {}",
            assets.vertex_shader.display(),
            assets.fragment_shader.display()
        );

        let image = load_scene_image(&assets)?;
        let scene = SceneRenderer::new(&gpu, &layouts, &image);

        let projection = Projection::new(
            gpu.size.0,
            gpu.size.1,
            config.projection.near,
            config.projection.far,
        );
        let shader_watcher = assets.hot_reload.then(|| {
            FileWatcher::new([assets.vertex_shader.clone(), assets.fragment_shader.clone()])
        });

        Ok(Self {
            scene,
            program,
            layouts,
            gpu,
            window,
            camera: FlyCamera::with_settings(config.camera),
            frame_loop: FrameLoop::new(config.frame_loop, Instant::now()),
            projection,
            pending: Vec::new(),
            assets,
            shader_watcher,
            title: config.window.title.clone(),
            last_title_refresh: Instant::now(),
        })
    }

    fn reload_shaders(&mut self, reason: &str) {
        let mut candidate = ShaderProgram::new(self.layouts.shader_backend(&self.gpu));
        if candidate.init_with_paths(&self.assets.vertex_shader, &self.assets.fragment_shader) {
            self.program = candidate;
            self.frame_loop.request_render();
            log::info!("Shaders reloaded ({reason})");
        } else {
            log::error!(
                "Shader reload failed ({reason}), keeping previous program: {}",
                candidate.error()
            );
        }
    }

    fn shaders_changed(&mut self) -> bool {
        self.shader_watcher
            .as_mut()
            .is_some_and(|watcher| watcher.poll_changed())
    }

    fn handle_shortcuts(&mut self) {
        let keys = self.frame_loop.keys();
        let force_reload = keys.is_just_pressed(Key::R);
        let toggle_redraw = keys.is_just_pressed(Key::F5);

        // Poll even on a forced reload so the watcher records the new mtimes.
        let changed_on_disk = self.shaders_changed();
        if force_reload {
            self.reload_shaders("manual trigger (R)");
        } else if changed_on_disk {
            self.reload_shaders("file watcher");
        }

        if toggle_redraw {
            let policy = self.frame_loop.redraw_policy().toggled();
            self.frame_loop.set_redraw_policy(policy);
            log::info!("Redraw policy: {:?}", policy);
        }
    }

    fn refresh_title(&mut self, now: Instant) {
        if now.duration_since(self.last_title_refresh) < TITLE_REFRESH {
            return;
        }
        self.last_title_refresh = now;
        let fps = self.frame_loop.clock().smoothed_fps;
        self.window.set_title(&format!("{} - {:.0} fps", self.title, fps));
    }

    /// One wake-up: drain the queued batch, then tick.
    fn pump(&mut self) {
        let batch = std::mem::take(&mut self.pending);
        self.frame_loop.ingest(batch, &mut self.camera);
        if !self.frame_loop.is_running() {
            return;
        }

        self.handle_shortcuts();

        if self.gpu.is_minimized() {
            self.frame_loop.end_input_frame();
            return;
        }

        let now = Instant::now();
        let scene = &self.scene;
        let gpu = &self.gpu;
        let program = &self.program;
        let projection = self.projection;
        self.frame_loop.tick(now, &mut self.camera, |frame| {
            scene.render(gpu, program, &projection.build_uniform(frame));
        });
        self.refresh_title(now);
    }
}

fn load_scene_image(assets: &AssetSettings) -> Result<ImageData, String> {
    if assets.texture.exists() {
        return load_image_from_path(&assets.texture);
    }
    log::warn!(
        "Texture '{}' not found, using a checkerboard",
        assets.texture.display()
    );
    Ok(checkerboard(256, 8))
}

struct App {
    config: ViewerConfig,
    state: Option<ViewerState>,
    failed: bool,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            state: None,
            failed: false,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig {
            title: self.config.window.title.clone(),
            width: self.config.window.width,
            height: self.config.window.height,
        };
        let created = gv_platform::create_window(event_loop, &platform)
            .and_then(|window| ViewerState::new(window, &self.config));
        match created {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                log::error!("{err}");
                self.failed = true;
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        state.pump();

        if !state.frame_loop.is_running() {
            event_loop.exit();
            return;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(
            Instant::now() + state.frame_loop.wait_timeout(),
        ));
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                state.pending.push(InputEvent::Quit);
            }

            WindowEvent::Resized(physical_size) => {
                let (w, h) = (physical_size.width, physical_size.height);
                state.gpu.resize(w, h);
                if w > 0 && h > 0 {
                    state.projection.resize(w, h);
                    state.frame_loop.request_render();
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.frame_loop.reset_input(),

            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = keymap::map_key(key_code) {
                        state.pending.push(match event.state {
                            ElementState::Pressed => InputEvent::KeyDown(key),
                            ElementState::Released => InputEvent::KeyUp(key),
                        });
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.pending.push(InputEvent::MouseMove {
                    x: position.x,
                    y: position.y,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                state.pending.push(InputEvent::MouseWheel {
                    delta_y: keymap::wheel_lines(delta),
                });
            }

            WindowEvent::RedrawRequested => state.frame_loop.request_render(),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            log::info!(
                "Tearing down after {} frames ({:?})",
                state.frame_loop.clock().frame_count,
                state.frame_loop.stop_reason()
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Glimpse Viewer starting...");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = match load_config_or_default(&config_path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("Failed to create event loop: {err}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {err}");
        std::process::exit(1);
    }
    if app.failed {
        std::process::exit(1);
    }
    log::info!("Glimpse Viewer exited cleanly");
}
