//! Tunable constants for the fluid canvas.
//!
//! Every number that shapes the effect lives here with its reference value.
//! None of them come from a physical model; they were tuned by eye and should
//! be preserved, not "corrected". Configs are plain JSON and every field is
//! optional:
//!
//! ```json
//! {
//!   "physics": { "damping": 0.98 },
//!   "ambient": { "cap": 400 },
//!   "seed": 7
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::palette::Color;

/// Per-frame integration constants applied by [`update`](crate::particle::update).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Isotropic velocity multiplier per frame.
    pub damping: f32,
    /// Added to `velocity.y` every frame (canvas y points down).
    pub gravity: f32,
    /// Fraction of speed kept when bouncing off an edge.
    pub restitution: f32,
    /// Subtracted from `life` every frame.
    pub life_decay: f32,
    /// Multiplies `size` every frame.
    pub size_decay: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            damping: 0.985,
            gravity: 0.015,
            restitution: 0.7,
            life_decay: 0.003,
            size_decay: 0.9995,
        }
    }
}

/// Particle birth size and the size below which a particle is culled.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParticleConfig {
    pub min_size: f32,
    pub spawn_size_min: f32,
    pub spawn_size_max: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            min_size: 0.8,
            spawn_size_min: 3.0,
            spawn_size_max: 15.0,
        }
    }
}

/// Drag emission.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwirlConfig {
    /// Particles per pixel of drag distance.
    pub rate: f32,
    /// Upper bound on particles per drag event.
    pub max_per_event: u32,
    /// Angular jitter as a fraction of PI (0.8 = ±0.4π).
    pub jitter: f32,
    /// Max distance from the pointer at which particles appear.
    pub spawn_radius: f32,
    /// How much of the drag delta is inherited as velocity.
    pub drag_coupling: f32,
    /// Upper bound of the random swirl coefficient.
    pub swirl_max: f32,
    /// Speed multiplier applied to the perpendicular swirl term.
    pub swirl_scale: f32,
}

impl Default for SwirlConfig {
    fn default() -> Self {
        Self {
            rate: 0.8,
            max_per_event: 20,
            jitter: 0.8,
            spawn_radius: 40.0,
            drag_coupling: 0.12,
            swirl_max: 0.15,
            swirl_scale: 0.8,
        }
    }
}

/// Upper bound for `ambient.cap`.
pub const MAX_AMBIENT_CAP: usize = 100_000;

/// Upper bound for `swirl.max_per_event`.
pub const MAX_PER_EVENT: u32 = 10_000;

/// Background spawning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AmbientConfig {
    /// Chance per frame of spawning one particle.
    pub probability: f32,
    /// No ambient spawn while the field holds this many particles.
    pub cap: usize,
    /// Velocity components are uniform in `[-max_speed, max_speed)`.
    pub max_speed: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            probability: 0.015,
            cap: 800,
            max_speed: 0.15,
        }
    }
}

/// The translucent fill laid over the canvas each frame.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrailConfig {
    pub color: Color,
    pub alpha: f32,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb(20, 20, 30),
            alpha: 0.08,
        }
    }
}

/// Drawing and presentation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Global alpha multiplier applied to `opacity` when drawing.
    pub glow_alpha: f32,
    /// Gradient radius as a multiple of particle size.
    pub gradient_scale: f32,
    /// Canvas resolution relative to the window's physical pixels.
    pub render_scale: f32,
    /// Backdrop color at the center of the window.
    pub background_inner: Color,
    /// Backdrop color at the corners.
    pub background_outer: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glow_alpha: 0.9,
            gradient_scale: 1.5,
            render_scale: 1.0,
            background_inner: Color::rgb(0x1a, 0x1a, 0x2e),
            background_outer: Color::rgb(0x16, 0x21, 0x3e),
        }
    }
}

/// Complete canvas configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FluidConfig {
    pub physics: PhysicsConfig,
    pub particle: ParticleConfig,
    pub swirl: SwirlConfig,
    pub ambient: AmbientConfig,
    pub trail: TrailConfig,
    pub render: RenderConfig,
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl FluidConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FluidConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break the effect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        unit_interval("physics.damping", p.damping, false)?;
        unit_interval("physics.restitution", p.restitution, true)?;
        unit_interval("physics.size_decay", p.size_decay, false)?;
        finite("physics.gravity", p.gravity)?;
        if !(p.life_decay.is_finite() && p.life_decay >= 0.0) {
            return Err(ConfigError::invalid("physics.life_decay", "must be finite and non-negative"));
        }

        let pc = &self.particle;
        positive("particle.min_size", pc.min_size)?;
        positive("particle.spawn_size_min", pc.spawn_size_min)?;
        if !(pc.spawn_size_max.is_finite() && pc.spawn_size_max > pc.spawn_size_min) {
            return Err(ConfigError::invalid(
                "particle.spawn_size_max",
                format!("must be greater than spawn_size_min ({})", pc.spawn_size_min),
            ));
        }

        let s = &self.swirl;
        non_negative("swirl.rate", s.rate)?;
        non_negative("swirl.jitter", s.jitter)?;
        non_negative("swirl.spawn_radius", s.spawn_radius)?;
        finite("swirl.drag_coupling", s.drag_coupling)?;
        non_negative("swirl.swirl_max", s.swirl_max)?;
        finite("swirl.swirl_scale", s.swirl_scale)?;
        if s.max_per_event > MAX_PER_EVENT {
            return Err(ConfigError::invalid(
                "swirl.max_per_event",
                format!("must be at most {}", MAX_PER_EVENT),
            ));
        }

        let a = &self.ambient;
        unit_interval("ambient.probability", a.probability, true)?;
        non_negative("ambient.max_speed", a.max_speed)?;
        if a.cap > MAX_AMBIENT_CAP {
            return Err(ConfigError::invalid("ambient.cap", format!("must be at most {}", MAX_AMBIENT_CAP)));
        }

        unit_interval("trail.alpha", self.trail.alpha, true)?;

        let r = &self.render;
        unit_interval("render.glow_alpha", r.glow_alpha, true)?;
        positive("render.gradient_scale", r.gradient_scale)?;
        positive("render.render_scale", r.render_scale)?;

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite"))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be non-negative, got {}", value)))
    }
}

/// `[0, 1]` when `allow_zero`, otherwise `(0, 1]`.
fn unit_interval(field: &'static str, value: f32, allow_zero: bool) -> Result<(), ConfigError> {
    let low_ok = if allow_zero { value >= 0.0 } else { value > 0.0 };
    if low_ok && value <= 1.0 {
        Ok(())
    } else {
        let range = if allow_zero { "[0, 1]" } else { "(0, 1]" };
        Err(ConfigError::invalid(field, format!("must be within {}, got {}", range, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_reference_values() {
        let config = FluidConfig::default();
        assert_eq!(config.physics.damping, 0.985);
        assert_eq!(config.physics.gravity, 0.015);
        assert_eq!(config.physics.restitution, 0.7);
        assert_eq!(config.physics.life_decay, 0.003);
        assert_eq!(config.particle.min_size, 0.8);
        assert_eq!(config.swirl.max_per_event, 20);
        assert_eq!(config.swirl.spawn_radius, 40.0);
        assert_eq!(config.ambient.cap, 800);
        assert_eq!(config.ambient.probability, 0.015);
        assert_eq!(config.trail.alpha, 0.08);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = FluidConfig::from_json(r#"{ "physics": { "damping": 0.9 }, "seed": 3 }"#).unwrap();
        assert_eq!(config.physics.damping, 0.9);
        assert_eq!(config.physics.gravity, 0.015);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.ambient, AmbientConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = FluidConfig::default();
        config.trail.color = Color::rgb(1, 2, 3);
        config.ambient.cap = 12;
        let json = config.to_json().unwrap();
        assert!(json.contains("\"#010203\""));
        assert_eq!(FluidConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = FluidConfig::from_json(r#"{ "ambient": { "probability": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ambient.probability", .. }));

        let err = FluidConfig::from_json(r#"{ "physics": { "damping": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "physics.damping", .. }));

        let err = FluidConfig::from_json(r#"{ "particle": { "spawn_size_min": 5.0, "spawn_size_max": 4.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "particle.spawn_size_max", .. }));
    }

    #[test]
    fn test_rejects_oversized_populations() {
        let err = FluidConfig::from_json(r#"{ "ambient": { "cap": 1000000000000 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ambient.cap", .. }));

        let err = FluidConfig::from_json(r#"{ "swirl": { "max_per_event": 4000000000 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "swirl.max_per_event", .. }));

        let at_limit = format!(r#"{{ "ambient": {{ "cap": {} }} }}"#, MAX_AMBIENT_CAP);
        assert_eq!(FluidConfig::from_json(&at_limit).unwrap().ambient.cap, MAX_AMBIENT_CAP);
    }

    #[test]
    fn test_rejects_bad_color() {
        let err = FluidConfig::from_json(r##"{ "trail": { "color": "#12" } }"##).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
