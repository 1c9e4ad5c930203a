//! Windowless runs for snapshots, benchmarks and tests.
//!
//! A headless run replays a scripted stroke (a Lissajous curve through the
//! middle of the canvas, cycling through the palette) and then lets the
//! paint settle. The last frame can be written out as a PNG.

use std::f32::consts::TAU;
use std::path::PathBuf;

use glam::Vec2;
use tracing::{debug, info};

use crate::config::FluidConfig;
use crate::controls::Command;
use crate::error::SimulationError;
use crate::input::DragSegment;
use crate::scene::Scene;

/// Frames spent on each palette color while stroking.
const FRAMES_PER_COLOR: u32 = 40;

/// Settings for [`run_headless`].
#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub width: u32,
    pub height: u32,
    /// Total frames to simulate.
    pub frames: u32,
    /// Frames at the start during which the stroke is drawn.
    pub stroke_frames: u32,
    /// Where to write the final frame, if anywhere.
    pub output: Option<PathBuf>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frames: 300,
            stroke_frames: 200,
            output: None,
        }
    }
}

impl HeadlessOptions {
    /// Run for `frames` frames, stroking for the first two thirds.
    pub fn with_frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self.stroke_frames = frames / 3 * 2;
        self
    }
}

/// Summary of a finished headless run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessReport {
    pub frames: u32,
    /// Particles emitted by the stroke.
    pub emitted: usize,
    /// Particles alive after the last frame.
    pub live: usize,
}

/// Point on the scripted stroke at frame `i`.
pub fn stroke_point(i: u32, width: u32, height: u32) -> Vec2 {
    let t = i as f32 / 120.0 * TAU;
    let center = Vec2::new(width as f32, height as f32) * 0.5;
    let reach = center * 0.6;
    center + Vec2::new((t * 3.0).sin() * reach.x, (t * 2.0).sin() * reach.y)
}

/// Simulate without a window. Returns the final scene and a report.
pub fn run_headless(config: FluidConfig, options: &HeadlessOptions) -> Result<(Scene, HeadlessReport), SimulationError> {
    config.validate()?;

    let mut scene = Scene::new(config, options.width, options.height);
    let mut report = HeadlessReport::default();
    info!(width = options.width, height = options.height, frames = options.frames, "Headless run");

    let mut previous = stroke_point(0, options.width, options.height);
    scene.set_interacting(true);

    for i in 0..options.frames {
        if i < options.stroke_frames {
            if i % FRAMES_PER_COLOR == 0 {
                let index = (i / FRAMES_PER_COLOR) as usize % scene.controls().palette().len();
                scene.apply(Command::SelectColor(index))?;
            }
            let current = stroke_point(i + 1, options.width, options.height);
            report.emitted += scene.drag(DragSegment::new(previous, current));
            previous = current;
        } else if i == options.stroke_frames {
            scene.set_interacting(false);
        }

        let stats = scene.frame();
        report.live = stats.live;
        report.frames = i + 1;

        if (i + 1) % 60 == 0 {
            debug!(frame = i + 1, live = stats.live, culled = stats.culled, "Headless progress");
        }
    }

    if let Some(path) = &options.output {
        scene.canvas().save_png(path, &scene.backdrop())?;
        info!(path = %path.display(), "Wrote snapshot");
    }

    info!(emitted = report.emitted, live = report.live, "Headless run finished");
    Ok((scene, report))
}
