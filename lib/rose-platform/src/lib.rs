use std::{
    ffi::CString,
    num::NonZeroU32,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use eyre::{eyre, Context, Result};
use glam::{vec2, Vec2};
use glutin::{
    config::{Api, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use histo::Histogram;
use raw_window_handle::HasRawWindowHandle;
pub use winit::dpi::{LogicalSize, PhysicalSize};
pub use winit::event as events;
pub use winit::window::{Fullscreen, WindowBuilder};
use winit::{
    event::{
        DeviceEvent, ElementState, Event, KeyboardInput, StartCause, VirtualKeyCode, WindowEvent,
    },
    event_loop::{ControlFlow, EventLoopBuilder},
    window::{CursorGrabMode, Window},
};

use crate::circbuffer::CircBuffer;

pub mod circbuffer;
pub mod prelude;
pub mod tracing_hook;

const TICK_PERIOD: Duration = Duration::from_nanos(4_166_167); // 240 Hz
const FRAME_PERIOD: Duration = Duration::from_nanos(16_666_667); // 60 Hz

#[derive(Debug, Copy, Clone)]
pub struct TickContext {
    pub dt: Duration,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct RenderStats {
    fps_circ: CircBuffer<f32>,
    fps_hist: Histogram,
}

impl Default for RenderStats {
    fn default() -> Self {
        Self {
            fps_circ: CircBuffer::new(60),
            fps_hist: Histogram::with_buckets(100),
        }
    }
}

impl RenderStats {
    pub fn percentile(&self, pc: usize) -> u64 {
        self.fps_hist
            .buckets()
            .nth(pc)
            .map(|bucket| bucket.start())
            .unwrap_or(0)
    }

    /// Average FPS over the last 60 frames, 0 before the first frame.
    pub fn fps_average(&self) -> f32 {
        if self.fps_circ.is_empty() {
            return 0.0;
        }
        self.fps_circ.iter().sum::<f32>() / self.fps_circ.len() as f32
    }

    pub fn fps_history(&self) -> impl '_ + Iterator<Item = f32> {
        self.fps_circ.iter().copied()
    }

    fn add_frame_time(&mut self, fps: f32) {
        self.fps_hist.add(fps as _);
        self.fps_circ.add(fps);
    }
}

pub struct RenderContext<'a> {
    pub elapsed: Duration,
    pub stats: &'a RenderStats,
    pub dt: Duration,
    window: &'a Window,
    control_flow: &'a mut ControlFlow,
}

impl<'a> RenderContext<'a> {
    pub fn quit(&mut self) {
        self.control_flow.set_exit();
    }

    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }

    pub fn window_size(&self) -> PhysicalSize<u32> {
        self.window.inner_size()
    }

    /// Capture (and hide) or release the cursor. Falls back to locking the cursor on platforms
    /// without confinement support.
    pub fn set_cursor_grab(&self, grab: bool) {
        let result = if grab {
            self.window
                .set_cursor_grab(CursorGrabMode::Confined)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Locked))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(err) = result {
            tracing::warn!(message = "Cannot change cursor grab", %err);
        }
        self.window.set_cursor_visible(!grab);
    }
}

#[allow(unused_variables)]
pub trait Application: Sized + Send {
    /// When set, pressing Escape closes the window before the application sees the key.
    const QUIT_ON_ESCAPE: bool = true;

    fn window_features(wb: WindowBuilder) -> WindowBuilder {
        wb
    }
    fn new(size: PhysicalSize<f32>) -> Result<Self>;
    fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        Ok(())
    }
    fn interact(&mut self, event: &WindowEvent) -> Result<()> {
        Ok(())
    }
    /// Raw mouse motion, reported even while the cursor is grabbed.
    fn mouse_motion(&mut self, delta: Vec2) -> Result<()> {
        Ok(())
    }
    /// /!\ Does not run on the main thread. OpenGL calls are unsafe here.
    fn tick(&mut self, ctx: TickContext) -> Result<()> {
        Ok(())
    }
    fn render(&mut self, ctx: RenderContext) -> Result<()>;
}

fn log_gl_info() {
    let get = |name| violette::get_string(name).unwrap_or_else(|_| "<None>".to_string());
    let gl_version = get(violette::gl::VERSION);
    let gl_vendor = get(violette::gl::VENDOR);
    let gl_renderer = get(violette::gl::RENDERER);
    let gl_shading_language_version = get(violette::gl::SHADING_LANGUAGE_VERSION);
    tracing::info!(target: "gl", version=%gl_version, vendor=%gl_vendor, render=%gl_renderer, shading_language=%gl_shading_language_version);
}

fn spawn_ticker<App: 'static + Application>(
    app: Arc<Mutex<App>>,
    running: Arc<AtomicBool>,
    start: Instant,
) {
    let thread_running = running.clone();
    let spawned = std::thread::Builder::new()
        .name("tick".into())
        .spawn(move || {
            let running = thread_running;
            let mut last_tick = Instant::now();
            while running.load(Ordering::Relaxed) {
                let _span = tracing::trace_span!("loop_tick").entered();
                let tick_start = Instant::now();
                let result = match app.lock() {
                    Ok(mut app) => app.tick(TickContext {
                        elapsed: start.elapsed(),
                        dt: last_tick.elapsed(),
                    }),
                    Err(_) => Err(eyre!("Application state poisoned")),
                };
                if let Err(err) = result {
                    tracing::error!("Tick failed: {:?}", err);
                    running.store(false, Ordering::Relaxed);
                    break;
                }
                let tick_duration = tick_start.elapsed().as_secs_f32();
                last_tick = Instant::now();
                tracing::trace!(%tick_duration);
                std::thread::sleep(TICK_PERIOD);
            }
        });
    if let Err(err) = spawned {
        tracing::error!(message = "Cannot spawn tick thread", %err);
        running.store(false, Ordering::Relaxed);
    }
}

/// Open a window with an OpenGL 3.3 core context and run the application until it quits.
pub fn run<App: 'static + Application>(title: &str) -> Result<()> {
    tracing_hook::enable()?;

    let event_loop = EventLoopBuilder::new().build();
    let template = ConfigTemplateBuilder::new().with_alpha_size(8);

    let display_builder = DisplayBuilder::new().with_window_builder(Some(
        App::window_features(WindowBuilder::new()).with_title(title),
    ));

    let (window, gl_config) = display_builder
        .build(&event_loop, template, |configs| {
            // glutin only calls this with at least one config; prefer ones with a usable depth
            // buffer.
            configs
                .inspect(|config| tracing::debug!(message="Potential config", api=?config.api(), depth_size=%config.depth_size()))
                .max_by_key(|config| {
                    (
                        config.api().contains(Api::OPENGL),
                        config.depth_size() >= 24,
                    )
                })
                .expect("glutin provided no configuration")
        })
        .map_err(|err| eyre!("Cannot create OpenGL configuration & window: {}", err))?;
    let window = window.ok_or_else(|| eyre!("No window despite configuration"))?;
    if !gl_config.api().contains(Api::OPENGL) || gl_config.depth_size() < 24 {
        return Err(eyre!(
            "No OpenGL configuration with a 24-bit depth buffer available"
        ));
    }
    tracing::debug!(message="Using config", api=?gl_config.api(), depth_size=%gl_config.depth_size());

    let raw_window_handle = window.raw_window_handle();
    let gl_display = gl_config.display();

    let context_attributes = ContextAttributesBuilder::new()
        .with_debug(cfg!(debug_assertions))
        .with_profile(glutin::context::GlProfile::Core)
        .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
        .build(Some(raw_window_handle));

    let not_current_gl_context = unsafe {
        gl_display
            .create_context(&gl_config, &context_attributes)
            .context("Cannot create OpenGL display context")?
    };
    let inner_size = window.inner_size();
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
        raw_window_handle,
        NonZeroU32::new(inner_size.width).ok_or_else(|| eyre!("Window has zero width"))?,
        NonZeroU32::new(inner_size.height).ok_or_else(|| eyre!("Window has zero height"))?,
    );
    let gl_surface = unsafe {
        gl_display
            .create_window_surface(&gl_config, &attrs)
            .context("Cannot create window surface")?
    };
    let context = not_current_gl_context
        .make_current(&gl_surface)
        .context("Cannot make OpenGL context current")?;
    violette::load_with(|sym| match CString::new(sym) {
        Ok(sym) => gl_display.get_proc_address(sym.as_c_str()).cast(),
        Err(_) => std::ptr::null(),
    });
    violette::debug::hook_gl_to_tracing();
    log_gl_info();

    let app = App::new(inner_size.cast()).context("Cannot run app")?;
    let app = Arc::new(Mutex::new(app));
    let running = Arc::new(AtomicBool::new(true));

    let start = Instant::now();
    spawn_ticker(app.clone(), running.clone(), start);

    let mut render_stats = RenderStats::default();
    let mut last_frame_time = Instant::now();
    let mut next_frame_time = Instant::now() + FRAME_PERIOD;
    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait_until(next_frame_time);
        if !running.load(Ordering::Relaxed) {
            control_flow.set_exit();
            return;
        }
        let fail = |control_flow: &mut ControlFlow, err: eyre::Report| {
            tracing::error!("{:?}", err);
            running.store(false, Ordering::Relaxed);
            control_flow.set_exit();
        };

        match event {
            Event::RedrawRequested(_) => {
                let Ok(mut app) = app.lock() else {
                    return fail(control_flow, eyre!("Application state poisoned"));
                };
                let _span = tracing::trace_span!("render").entered();
                let frame_start = Instant::now();
                let result = app.render(RenderContext {
                    elapsed: start.elapsed(),
                    dt: last_frame_time.elapsed(),
                    stats: &render_stats,
                    window: &window,
                    control_flow: &mut *control_flow,
                });
                drop(app);
                if let Err(err) = result {
                    return fail(control_flow, err);
                }
                if let Err(err) = gl_surface.swap_buffers(&context) {
                    return fail(control_flow, eyre!("Cannot swap buffers: {}", err));
                }
                let frame_time = frame_start.elapsed().as_secs_f32();
                render_stats.add_frame_time(frame_time.max(1e-6).recip());
                tracing::trace!(%frame_time);
                next_frame_time = frame_start + FRAME_PERIOD;
                last_frame_time = Instant::now();
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                ..
            } => {
                let result = match app.lock() {
                    Ok(mut app) => app.mouse_motion(vec2(dx as _, dy as _)),
                    Err(_) => Err(eyre!("Application state poisoned")),
                };
                if let Err(err) = result {
                    fail(control_flow, err);
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => control_flow.set_exit(),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } if App::QUIT_ON_ESCAPE => control_flow.set_exit(),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(VirtualKeyCode::F11),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None)
                    } else {
                        window.set_fullscreen(Some(Fullscreen::Borderless(None)))
                    }
                }
                WindowEvent::Resized(new_size) => {
                    // Minimized windows report a zero size; keep the last surface around.
                    if let (Some(width), Some(height)) =
                        (NonZeroU32::new(new_size.width), NonZeroU32::new(new_size.height))
                    {
                        gl_surface.resize(&context, width, height);
                        let result = match app.lock() {
                            Ok(mut app) => app.resize(new_size),
                            Err(_) => Err(eyre!("Application state poisoned")),
                        };
                        if let Err(err) = result {
                            return fail(control_flow, err);
                        }
                        window.request_redraw();
                    }
                }
                event => {
                    let result = match app.lock() {
                        Ok(mut app) => app.interact(&event),
                        Err(_) => Err(eyre!("Application state poisoned")),
                    };
                    if let Err(err) = result {
                        fail(control_flow, err);
                    }
                }
            },
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => window.request_redraw(),
            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::RenderStats;

    #[test]
    fn fps_average_over_window() {
        let mut stats = RenderStats::default();
        assert_eq!(stats.fps_average(), 0.0);
        stats.add_frame_time(30.0);
        stats.add_frame_time(90.0);
        assert_eq!(stats.fps_average(), 60.0);
        for _ in 0..60 {
            stats.add_frame_time(120.0);
        }
        assert_eq!(stats.fps_average(), 120.0);
        assert_eq!(stats.fps_history().count(), 60);
    }
}
