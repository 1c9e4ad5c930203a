//! # Fluid Canvas
//!
//! An interactive painting canvas where dragging the pointer releases swirls
//! of glowing particles that drift, fall under light gravity, bounce off the
//! edges and fade, leaving soft trails behind.
//!
//! ## Quick Start
//!
//! ```ignore
//! use fluid_canvas::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Simulation::new()
//!         .with_config(FluidConfig::default())
//!         .run()
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### The frame loop
//!
//! Every frame the canvas is covered with a translucent dark fill instead of
//! being cleared, then each particle is updated, drawn and culled in one pass.
//! Old paint therefore decays geometrically into trails. See
//! [`ParticleField::frame`].
//!
//! ### Emission
//!
//! A pointer drag from `a` to `b` emits up to 20 particles near `b` whose
//! velocity mixes the drag direction with a random perpendicular swirl. A
//! trickle of ambient particles keeps an idle canvas alive. See
//! [`emitter`].
//!
//! ### Controls
//!
//! [`Scene`] bundles the canvas, the field and the [`Controls`]. The window
//! app, the egui panel and the headless runner all go through
//! [`Scene::apply`] with a [`Command`].
//!
//! ## Headless
//!
//! ```ignore
//! let options = HeadlessOptions { output: Some("fluid.png".into()), ..Default::default() };
//! let (scene, report) = run_headless(FluidConfig::default(), &options)?;
//! ```
//!
//! ## Tuning
//!
//! | Section | Controls |
//! |---------|----------|
//! | `physics` | damping, gravity, restitution, life and size decay |
//! | `particle` | spawn size range, cull size |
//! | `swirl` | drag emission rate, spread, swirl strength |
//! | `ambient` | background spawn chance and cap |
//! | `trail` | fill color and alpha |
//! | `render` | glow alpha, gradient reach, resolution, backdrop |

pub mod canvas;
pub mod config;
pub mod controls;
pub mod emitter;
mod error;
pub mod field;
mod gpu;
pub mod headless;
pub mod input;
pub mod palette;
pub mod particle;
pub mod scene;
mod simulation;
pub mod time;

pub use canvas::{Backdrop, Canvas, GradientStop};
pub use config::{AmbientConfig, FluidConfig, ParticleConfig, PhysicsConfig, RenderConfig, SwirlConfig, TrailConfig};
pub use controls::{Command, Controls};
pub use error::{ColorError, ConfigError, ControlError, ExportError, GpuError, SimulationError};
pub use field::{FrameStats, ParticleField};
pub use glam::Vec2;
pub use headless::{run_headless, HeadlessOptions, HeadlessReport};
pub use input::{CanvasRect, DragSegment, Input, KeyCode, Pointer};
pub use palette::{Color, Palette, Swatch};
pub use particle::Particle;
pub use scene::Scene;
pub use simulation::Simulation;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use fluid_canvas::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Backdrop, Canvas};
    pub use crate::config::FluidConfig;
    pub use crate::controls::{Command, Controls};
    pub use crate::error::SimulationError;
    pub use crate::field::{FrameStats, ParticleField};
    pub use crate::headless::{run_headless, HeadlessOptions};
    pub use crate::input::{DragSegment, KeyCode};
    pub use crate::palette::{Color, Palette};
    pub use crate::particle::Particle;
    pub use crate::scene::Scene;
    pub use crate::simulation::Simulation;
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
    #[cfg(feature = "egui")]
    pub use egui;
}
