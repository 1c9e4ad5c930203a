//! Everything one canvas needs, bundled.
//!
//! A [`Scene`] owns the raster, the particle field and the controls. The
//! windowed app and the headless runner both drive it through the same three
//! calls: [`Scene::drag`] per pointer segment, [`Scene::apply`] per command
//! and [`Scene::frame`] per tick.

use tracing::info;

use crate::canvas::{Backdrop, Canvas};
use crate::config::FluidConfig;
use crate::controls::{Command, Controls};
use crate::error::ControlError;
use crate::field::{FrameStats, ParticleField};
use crate::input::DragSegment;

#[derive(Debug, Clone)]
pub struct Scene {
    canvas: Canvas,
    field: ParticleField,
    controls: Controls,
}

impl Scene {
    /// A transparent canvas of the given size with no particles.
    pub fn new(config: FluidConfig, width: u32, height: u32) -> Self {
        let field = ParticleField::new(config);
        let controls = Controls::new(*field.palette());
        Self {
            canvas: Canvas::new(width, height),
            field,
            controls,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn config(&self) -> &FluidConfig {
        self.field.config()
    }

    /// Backdrop drawn behind the canvas.
    pub fn backdrop(&self) -> Backdrop {
        let render = &self.config().render;
        Backdrop {
            inner: render.background_inner,
            outer: render.background_outer,
        }
    }

    /// Reallocate the canvas. Paint is discarded, particles keep their
    /// positions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.canvas.width(), self.canvas.height()) {
            return;
        }
        self.canvas.resize(width, height);
        info!(width, height, "Canvas resized");
    }

    pub fn set_interacting(&mut self, interacting: bool) {
        self.controls.set_interacting(interacting);
    }

    /// Emit particles in the selected color along a drag.
    pub fn drag(&mut self, segment: DragSegment) -> usize {
        let color = self.controls.selected_color();
        self.field.emit_swirl(segment.from, segment.to, color)
    }

    pub fn apply(&mut self, command: Command) -> Result<(), ControlError> {
        match command {
            Command::Clear => {
                let removed = self.field.len();
                self.field.clear();
                info!(removed, "Cleared particles");
            }
            Command::TogglePhysics => {
                self.controls.toggle_physics();
            }
            Command::SelectColor(index) => self.controls.select_color(index)?,
        }
        Ok(())
    }

    /// Advance one tick. Nothing moves while the canvas is empty (a minimized
    /// window), since every particle would be clamped to the origin.
    pub fn frame(&mut self) -> FrameStats {
        if self.canvas.width() == 0 || self.canvas.height() == 0 {
            return FrameStats {
                live: self.field.len(),
                ..FrameStats::default()
            };
        }
        let physics_enabled = self.controls.physics_enabled();
        self.field.frame(&mut self.canvas, physics_enabled)
    }
}
