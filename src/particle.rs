//! The particle value type and the two functions that operate on it.
//!
//! A particle is plain data. [`update`] integrates it one frame, [`draw`]
//! paints it, [`Particle::is_alive`] decides whether it survives the frame.
//! The owning [`ParticleField`](crate::ParticleField) is the only place
//! particles live.

use glam::Vec2;
use rand::Rng;

use crate::canvas::{Canvas, GradientStop};
use crate::config::{ParticleConfig, PhysicsConfig, RenderConfig};
use crate::palette::Color;

/// A single glowing blob of paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Canvas pixel position.
    pub position: Vec2,
    /// Pixels per frame.
    pub velocity: Vec2,
    /// Disk radius in pixels. Shrinks every frame.
    pub size: f32,
    /// Starts at 1.0 and counts down to 0.0.
    pub life: f32,
    pub color: Color,
    /// `max(0, life)`, refreshed by [`update`].
    pub opacity: f32,
}

impl Particle {
    /// A fresh particle with full life and the given size.
    pub fn new(position: Vec2, velocity: Vec2, size: f32, color: Color) -> Self {
        Self {
            position,
            velocity,
            size,
            life: 1.0,
            color,
            opacity: 1.0,
        }
    }

    /// A fresh particle with a random size drawn from `config`.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        position: Vec2,
        velocity: Vec2,
        color: Color,
        config: &ParticleConfig,
    ) -> Self {
        let size = config.spawn_size_min + rng.gen::<f32>() * (config.spawn_size_max - config.spawn_size_min);
        Self::new(position, velocity, size, color)
    }

    /// Liveness predicate checked once per frame after update and draw.
    #[inline]
    pub fn is_alive(&self, min_size: f32) -> bool {
        self.life > 0.0 && self.size >= min_size
    }
}

/// Advance a particle by one frame inside `[0, bounds.x] × [0, bounds.y]`.
///
/// With physics disabled nothing changes: the particle neither moves nor ages.
pub fn update(particle: &mut Particle, bounds: Vec2, physics_enabled: bool, physics: &PhysicsConfig) {
    if !physics_enabled {
        return;
    }

    particle.position += particle.velocity;
    particle.velocity *= physics.damping;
    particle.velocity.y += physics.gravity;

    if particle.position.x < 0.0 || particle.position.x > bounds.x {
        particle.velocity.x *= -physics.restitution;
        particle.position.x = particle.position.x.clamp(0.0, bounds.x.max(0.0));
    }
    if particle.position.y < 0.0 || particle.position.y > bounds.y {
        particle.velocity.y *= -physics.restitution;
        particle.position.y = particle.position.y.clamp(0.0, bounds.y.max(0.0));
    }

    particle.life -= physics.life_decay;
    particle.opacity = particle.life.max(0.0);
    particle.size *= physics.size_decay;
}

/// Gradient for a particle: opaque at the center, half alpha at 70%,
/// transparent at the rim.
pub fn glow_stops(color: Color) -> [GradientStop; 3] {
    [
        GradientStop::new(0.0, color, 1.0),
        GradientStop::new(0.7, color, 0.5),
        GradientStop::transparent(1.0),
    ]
}

/// Paint a particle onto the canvas.
pub fn draw(particle: &Particle, canvas: &mut Canvas, render: &RenderConfig) {
    canvas.fill_circle_gradient(
        particle.position,
        particle.size,
        particle.size * render.gradient_scale,
        &glow_stops(particle.color),
        particle.opacity * render.glow_alpha,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(800.0, 600.0);

    fn particle_at(position: Vec2, velocity: Vec2) -> Particle {
        Particle::new(position, velocity, 10.0, Color::rgb(255, 107, 157))
    }

    #[test]
    fn test_update_integrates_then_damps() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(100.0, 100.0), Vec2::new(2.0, -1.0));
        update(&mut p, BOUNDS, true, &physics);

        assert_eq!(p.position, Vec2::new(102.0, 99.0));
        assert!((p.velocity.x - 2.0 * 0.985).abs() < 1e-6);
        assert!((p.velocity.y - (-1.0 * 0.985 + 0.015)).abs() < 1e-6);
        assert!((p.life - 0.997).abs() < 1e-6);
        assert_eq!(p.opacity, p.life);
        assert!((p.size - 10.0 * 0.9995).abs() < 1e-5);
    }

    #[test]
    fn test_life_and_size_decay_over_many_frames() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(400.0, 300.0), Vec2::ZERO);
        let n = 200;
        for _ in 0..n {
            update(&mut p, BOUNDS, true, &physics);
        }
        let expected_life = (1.0 - 0.003 * n as f32).max(0.0);
        let expected_size = 10.0 * 0.9995f32.powi(n);
        assert!((p.life - expected_life).abs() < 1e-4);
        assert!((p.size - expected_size).abs() < 1e-3);
    }

    #[test]
    fn test_life_and_size_never_increase() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(5.0, 5.0), Vec2::new(-30.0, 40.0));
        let (mut life, mut size) = (p.life, p.size);
        for _ in 0..500 {
            update(&mut p, BOUNDS, true, &physics);
            assert!(p.life <= life);
            assert!(p.size <= size);
            life = p.life;
            size = p.size;
        }
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn test_reflects_and_clamps_on_left_wall() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(1.0, 300.0), Vec2::new(-5.0, 0.0));
        update(&mut p, BOUNDS, true, &physics);

        assert_eq!(p.position.x, 0.0);
        let damped = -5.0 * 0.985;
        assert!((p.velocity.x - (-damped * 0.7)).abs() < 1e-6);
        assert!(p.velocity.x > 0.0);
    }

    #[test]
    fn test_reflects_and_clamps_on_bottom_wall() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(400.0, 598.0), Vec2::new(0.0, 4.0));
        update(&mut p, BOUNDS, true, &physics);

        assert_eq!(p.position.y, 600.0);
        let before_bounce = 4.0 * 0.985 + 0.015;
        assert!((p.velocity.y - (-before_bounce * 0.7)).abs() < 1e-6);
        // x untouched by the y bounce
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_reflects_and_clamps_on_right_wall() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(798.0, 300.0), Vec2::new(5.0, 0.0));
        update(&mut p, BOUNDS, true, &physics);

        assert_eq!(p.position.x, BOUNDS.x);
        let damped = 5.0 * 0.985;
        assert!((p.velocity.x - (-damped * 0.7)).abs() < 1e-6);
        assert!(p.velocity.x < 0.0);
    }

    #[test]
    fn test_reflects_and_clamps_on_top_wall() {
        let physics = PhysicsConfig::default();
        let mut p = particle_at(Vec2::new(400.0, 1.0), Vec2::new(0.0, -4.0));
        update(&mut p, BOUNDS, true, &physics);

        assert_eq!(p.position.y, 0.0);
        let before_bounce = -4.0 * 0.985 + 0.015;
        assert!((p.velocity.y - (-before_bounce * 0.7)).abs() < 1e-6);
        assert!(p.velocity.y > 0.0);
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_disabled_physics_freezes_everything() {
        let physics = PhysicsConfig::default();
        let original = particle_at(Vec2::new(10.0, 20.0), Vec2::new(3.0, 3.0));
        let mut p = original;
        for _ in 0..50 {
            update(&mut p, BOUNDS, false, &physics);
        }
        assert_eq!(p, original);
    }

    #[test]
    fn test_is_alive() {
        let mut p = particle_at(Vec2::ZERO, Vec2::ZERO);
        assert!(p.is_alive(0.8));
        p.size = 0.79;
        assert!(!p.is_alive(0.8));
        p.size = 5.0;
        p.life = 0.0;
        assert!(!p.is_alive(0.8));
    }

    #[test]
    fn test_spawn_size_in_range() {
        let mut rng = SmallRng::seed_from_u64(9);
        let config = ParticleConfig::default();
        for _ in 0..100 {
            let p = Particle::spawn(&mut rng, Vec2::ZERO, Vec2::ZERO, Color::rgb(0, 0, 0), &config);
            assert!(p.size >= 3.0 && p.size < 15.0);
            assert_eq!(p.life, 1.0);
            assert_eq!(p.opacity, 1.0);
        }
    }

    #[test]
    fn test_draw_uses_particle_color() {
        let mut canvas = Canvas::new(40, 40);
        let p = Particle::new(Vec2::new(20.0, 20.0), Vec2::ZERO, 8.0, Color::rgb(0, 0, 255));
        draw(&p, &mut canvas, &RenderConfig::default());
        let px = canvas.pixel(20, 20).unwrap();
        assert!(px[2] > 0.5);
        assert_eq!(px[0], 0.0);
    }

    #[test]
    fn test_draw_dead_particle_paints_nothing() {
        let mut canvas = Canvas::new(40, 40);
        let mut p = Particle::new(Vec2::new(20.0, 20.0), Vec2::ZERO, 8.0, Color::rgb(0, 0, 255));
        p.opacity = 0.0;
        draw(&p, &mut canvas, &RenderConfig::default());
        assert!(canvas.pixels().iter().all(|px| *px == [0.0; 4]));
    }
}
