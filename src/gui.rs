use glium::glutin::dpi::PhysicalSize;
use glium::glutin::event::Event;
use glium::glutin::event_loop::{ControlFlow, EventLoop};
use glium::glutin::platform::run_return::EventLoopExtRunReturn;
use glium::glutin::window::WindowBuilder;
use glium::glutin::ContextBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::AppError;
use crate::grid::{AtlasMetadata, TileGrid, Zoom};
use crate::input::InputEvent;
use crate::render::{self, GpuResources, TileBatch};
use crate::session::Session;

/// How often the status line is refreshed.
const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Opens the window and runs the viewer until the window is closed.
pub fn run(config: &Config) -> Result<(), AppError> {
    let mut event_loop = EventLoop::new();
    let (window_w, window_h) = config.window_size;
    let wb = WindowBuilder::new()
        .with_title(crate::TITLE.to_owned())
        .with_inner_size(PhysicalSize::new(window_w, window_h))
        .with_resizable(true);
    let cb = ContextBuilder::new().with_vsync(true);
    let display = glium::Display::new(wb, cb, &event_loop)?;

    let atlas_image = render::load_atlas_image(&config.atlas_path)?;
    let (image_w, image_h) = atlas_image.dimensions();
    let (tile_w, tile_h) = config.tile_size;
    let atlas = AtlasMetadata::new(tile_w, tile_h, image_w, image_h)?;
    log::info!(
        "Loaded atlas {:?}: {}x{} tiles of {}x{} px (shift indexing: {})",
        config.atlas_path,
        atlas.columns(),
        atlas.rows(),
        tile_w,
        tile_h,
        atlas.is_power_of_two_columns(),
    );
    let gpu = GpuResources::new(&display, atlas_image)?;

    let (grid_w, grid_h) = config.grid_size;
    let seed = time_seed();
    log::info!("Filling {}x{} grid with seed {}", grid_w, grid_h, seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = TileGrid::new_random(grid_w, grid_h, atlas.tile_count(), &mut rng)?;

    let mut session = Session::new(
        atlas,
        grid,
        config.zoom_mode,
        display.get_framebuffer_dimensions(),
    );
    let mut batch = TileBatch::new();
    let mut status = StatusCounter::new(Instant::now());
    let mut events = Vec::new();

    loop {
        let frame_start = Instant::now();

        // Poll.
        pump_events(&mut event_loop, &mut events);

        // Update.
        for ev in events.drain(..) {
            if !session.handle_input(ev) {
                log::info!("Window closed");
                return Ok(());
            }
        }

        // Resolve and draw.
        batch.clear();
        let summary = session.emit_frame(&mut batch);
        let mut target = display.draw();
        let drawn = gpu.draw(&mut target, &batch);

        // Present. The frame must be finished even if drawing failed.
        target.finish()?;
        drawn?;

        if let Some(fps) = status.tick(Instant::now()) {
            let line = status_line(fps, session.camera().zoom(), summary.range.stride);
            log::debug!("{} ({} tiles)", line, summary.tiles_drawn);
            display.gl_window().window().set_title(&line);
        }

        // Pace.
        if let Some(remaining) = config.frame_duration.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}

/// Processes every pending window event without blocking, collecting the ones
/// the viewer cares about.
fn pump_events(event_loop: &mut EventLoop<()>, events: &mut Vec<InputEvent>) {
    event_loop.run_return(|ev, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match ev {
            Event::WindowEvent { event, .. } => {
                events.extend(InputEvent::from_window_event(&event));
            }
            Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
            _ => (),
        }
    });
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn status_line(fps: f64, zoom: Zoom, stride: usize) -> String {
    format!(
        "{} - FPS: {:.2} | Zoom: {} | LOD: {}",
        crate::TITLE,
        fps,
        zoom,
        stride,
    )
}

/// Frame counter that reports the average frame rate about once per
/// `STATUS_INTERVAL`.
#[derive(Debug, Copy, Clone)]
struct StatusCounter {
    window_start: Instant,
    frames: u32,
}
impl StatusCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    /// Counts one frame. Returns the frame rate over the last interval once
    /// the interval has elapsed.
    fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < STATUS_INTERVAL {
            return None;
        }
        let fps = self.frames as f64 / elapsed.as_secs_f64();
        *self = Self::new(now);
        Some(fps)
    }
}
