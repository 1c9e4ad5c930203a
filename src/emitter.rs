//! Particle emission.
//!
//! Two sources feed the field:
//!
//! | Source | Trigger | Count |
//! |--------|---------|-------|
//! | [`emit_swirl`] | a pointer drag segment | `min(floor(speed × rate), max_per_event)` |
//! | [`spawn_ambient`] | once per frame, with low probability | 0 or 1, only below the cap |
//!
//! Drag particles inherit part of the drag velocity plus a random swirl
//! perpendicular to their spawn direction, which is what gives strokes their
//! curling look.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::config::{AmbientConfig, ParticleConfig, SwirlConfig};
use crate::palette::{Color, Palette};
use crate::particle::Particle;

/// Number of particles a drag of `speed` pixels emits.
pub fn swirl_count(speed: f32, config: &SwirlConfig) -> usize {
    let wanted = (speed * config.rate).floor();
    if wanted.is_nan() || wanted <= 0.0 {
        return 0;
    }
    (wanted as usize).min(config.max_per_event as usize)
}

/// Emit particles for a drag from `from` to `to` (canvas pixels).
///
/// Returns how many particles were appended to `particles`. A zero-length
/// drag emits nothing.
pub fn emit_swirl<R: Rng + ?Sized>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    from: Vec2,
    to: Vec2,
    color: Color,
    swirl: &SwirlConfig,
    particle: &ParticleConfig,
) -> usize {
    let delta = to - from;
    let speed = delta.length();
    let count = swirl_count(speed, swirl);
    if count == 0 {
        return 0;
    }

    let heading = delta.y.atan2(delta.x);
    particles.reserve(count);

    for _ in 0..count {
        let angle = heading + (rng.gen::<f32>() - 0.5) * PI * swirl.jitter;
        let direction = Vec2::from_angle(angle);
        let distance = rng.gen::<f32>() * swirl.spawn_radius;
        let position = to + direction * distance;

        // perp() is the direction rotated by +90°
        let strength = rng.gen::<f32>() * swirl.swirl_max;
        let velocity = delta * swirl.drag_coupling + direction.perp() * strength * speed * swirl.swirl_scale;

        particles.push(Particle::spawn(rng, position, velocity, color, particle));
    }

    count
}

/// Maybe spawn one background particle somewhere inside `bounds`.
///
/// Rolls against `ambient.probability` and does nothing while the field
/// already holds `ambient.cap` particles. Returns whether a particle was added.
pub fn spawn_ambient<R: Rng + ?Sized>(
    rng: &mut R,
    particles: &mut Vec<Particle>,
    bounds: Vec2,
    palette: &Palette,
    ambient: &AmbientConfig,
    particle: &ParticleConfig,
) -> bool {
    if rng.gen::<f32>() >= ambient.probability || particles.len() >= ambient.cap {
        return false;
    }
    let Some(swatch) = palette.get(rng.gen_range(0..palette.len().max(1))) else {
        return false;
    };

    let position = Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y);
    let velocity = Vec2::new(
        (rng.gen::<f32>() - 0.5) * 2.0 * ambient.max_speed,
        (rng.gen::<f32>() - 0.5) * 2.0 * ambient.max_speed,
    );
    particles.push(Particle::spawn(rng, position, velocity, swatch.color, particle));
    true
}
