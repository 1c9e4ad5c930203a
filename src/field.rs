//! The particle collection and the per-frame driver.
//!
//! [`ParticleField`] owns every live particle together with the RNG that
//! spawns them. One call to [`ParticleField::frame`] is one animation tick:
//!
//! 1. lay the trail fill over the canvas
//! 2. for each particle in insertion order: update, draw, cull if dead
//! 3. maybe spawn one ambient particle
//!
//! Removal happens in the same pass via [`Vec::retain_mut`], so the survivors
//! keep their relative order and every particle is visited exactly once.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::canvas::Canvas;
use crate::config::FluidConfig;
use crate::emitter;
use crate::palette::{Color, Palette};
use crate::particle::{self, Particle};

/// Particles reserved up front, however large the ambient cap.
const INITIAL_CAPACITY: usize = 1024;

/// What happened during one [`ParticleField::frame`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Particles alive after the frame.
    pub live: usize,
    /// Particles removed this frame.
    pub culled: usize,
    /// Whether an ambient particle was spawned.
    pub ambient_spawned: bool,
}

/// Ordered collection of live particles.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    palette: Palette,
    config: FluidConfig,
    rng: SmallRng,
}

impl ParticleField {
    /// An empty field. Seeds from `config.seed`, or from entropy if unset.
    pub fn new(config: FluidConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            particles: Vec::with_capacity(config.ambient.cap.min(INITIAL_CAPACITY)),
            palette: Palette::DEFAULT,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &FluidConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append a particle at the end of the iteration order.
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Remove every particle. Paint already on the canvas stays and fades.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Emit a swirl of `color` particles for a drag from `from` to `to`.
    ///
    /// Not bounded by the ambient cap. Returns the number emitted.
    pub fn emit_swirl(&mut self, from: Vec2, to: Vec2, color: Color) -> usize {
        emitter::emit_swirl(
            &mut self.rng,
            &mut self.particles,
            from,
            to,
            color,
            &self.config.swirl,
            &self.config.particle,
        )
    }

    /// Roll for one ambient particle inside `bounds`.
    pub fn spawn_ambient(&mut self, bounds: Vec2) -> bool {
        emitter::spawn_ambient(
            &mut self.rng,
            &mut self.particles,
            bounds,
            &self.palette,
            &self.config.ambient,
            &self.config.particle,
        )
    }

    /// Run one animation tick against `canvas`.
    ///
    /// With `physics_enabled == false` particles are still drawn (so they stay
    /// visible under the trail) but neither move nor age.
    pub fn frame(&mut self, canvas: &mut Canvas, physics_enabled: bool) -> FrameStats {
        let trail = self.config.trail;
        canvas.fill(trail.color, trail.alpha);

        let bounds = canvas.size();
        let physics = &self.config.physics;
        let render = &self.config.render;
        let min_size = self.config.particle.min_size;
        let before = self.particles.len();

        self.particles.retain_mut(|p| {
            particle::update(p, bounds, physics_enabled, physics);
            particle::draw(p, canvas, render);
            p.is_alive(min_size)
        });

        let culled = before - self.particles.len();
        let ambient_spawned = self.spawn_ambient(bounds);

        FrameStats {
            live: self.particles.len(),
            culled,
            ambient_spawned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmbientConfig;

    const TEAL: Color = Color::rgb(0x4e, 0xcd, 0xc4);

    fn quiet_config() -> FluidConfig {
        FluidConfig {
            ambient: AmbientConfig {
                probability: 0.0,
                ..AmbientConfig::default()
            },
            seed: Some(1),
            ..FluidConfig::default()
        }
    }

    fn still(x: f32, y: f32, size: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, size, TEAL)
    }

    #[test]
    fn test_new_does_not_reserve_whole_cap() {
        let mut config = quiet_config();
        config.ambient.cap = usize::MAX;
        let field = ParticleField::new(config);
        assert!(field.is_empty());
        assert!(field.particles.capacity() <= INITIAL_CAPACITY);
    }

    #[test]
    fn test_frame_culls_small_and_dead_particles() {
        let mut field = ParticleField::new(quiet_config());
        let mut canvas = Canvas::new(100, 100);

        field.push(still(10.0, 10.0, 10.0));
        field.push(still(20.0, 20.0, 0.8)); // drops below 0.8 after one decay
        let mut dying = still(30.0, 30.0, 10.0);
        dying.life = 0.002;
        field.push(dying);

        let stats = field.frame(&mut canvas, true);
        assert_eq!(stats.culled, 2);
        assert_eq!(stats.live, 1);
        assert_eq!(field.particles()[0].position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_dead_particles_are_still_drawn_on_their_last_frame() {
        let mut field = ParticleField::new(quiet_config());
        let mut canvas = Canvas::new(40, 40);
        let mut dying = still(20.0, 20.0, 10.0);
        dying.life = 0.003;
        field.push(dying);

        field.frame(&mut canvas, true);
        assert!(field.is_empty());
        // Opacity was ~0 on the final draw, so only the trail shows; a larger
        // life leaves visible paint.
        let mut visible = still(20.0, 20.0, 10.0);
        visible.life = 0.5;
        field.push(visible);
        field.frame(&mut canvas, true);
        let px = canvas.pixel(20, 20).unwrap();
        assert!(px[1] > 0.3);
    }

    #[test]
    fn test_survivors_keep_insertion_order() {
        let mut field = ParticleField::new(quiet_config());
        let mut canvas = Canvas::new(100, 100);
        for i in 0..6 {
            let size = if i % 2 == 0 { 10.0 } else { 0.5 };
            field.push(still(i as f32 * 10.0, 50.0, size));
        }
        field.frame(&mut canvas, true);
        let xs: Vec<f32> = field.particles().iter().map(|p| p.position.x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_lifetime_is_about_333_frames() {
        let mut field = ParticleField::new(quiet_config());
        let mut canvas = Canvas::new(64, 64);
        field.push(still(32.0, 32.0, 15.0));

        let mut frames = 0;
        while !field.is_empty() {
            field.frame(&mut canvas, true);
            frames += 1;
            assert!(frames < 400);
        }
        assert!((332..=335).contains(&frames), "lived {} frames", frames);
    }

    #[test]
    fn test_frozen_field_resumes_exactly() {
        let mut frozen = ParticleField::new(quiet_config());
        let mut reference = ParticleField::new(quiet_config());
        let mut canvas_a = Canvas::new(200, 200);
        let mut canvas_b = Canvas::new(200, 200);

        frozen.emit_swirl(Vec2::new(50.0, 50.0), Vec2::new(70.0, 60.0), TEAL);
        reference.emit_swirl(Vec2::new(50.0, 50.0), Vec2::new(70.0, 60.0), TEAL);
        let snapshot = frozen.particles().to_vec();

        for _ in 0..25 {
            frozen.frame(&mut canvas_a, false);
        }
        assert_eq!(frozen.particles(), &snapshot[..]);

        for _ in 0..10 {
            frozen.frame(&mut canvas_a, true);
            reference.frame(&mut canvas_b, true);
        }
        assert_eq!(frozen.particles(), reference.particles());
    }

    #[test]
    fn test_ambient_spawn_stops_at_cap() {
        let config = FluidConfig {
            ambient: AmbientConfig {
                probability: 1.0,
                cap: 3,
                ..AmbientConfig::default()
            },
            seed: Some(5),
            ..FluidConfig::default()
        };
        let mut field = ParticleField::new(config);
        let mut canvas = Canvas::new(100, 100);

        let spawned: Vec<bool> = (0..5).map(|_| field.frame(&mut canvas, false).ambient_spawned).collect();
        assert_eq!(spawned, vec![true, true, true, false, false]);
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_drag_emission_can_exceed_cap() {
        let config = FluidConfig {
            ambient: AmbientConfig {
                cap: 5,
                ..AmbientConfig::default()
            },
            seed: Some(5),
            ..FluidConfig::default()
        };
        let mut field = ParticleField::new(config);
        let emitted = field.emit_swirl(Vec2::ZERO, Vec2::new(30.0, 0.0), TEAL);
        assert_eq!(emitted, 20);
        assert_eq!(field.len(), 20);
    }

    #[test]
    fn test_clear_keeps_paint() {
        let mut field = ParticleField::new(quiet_config());
        let mut canvas = Canvas::new(50, 50);
        field.push(still(25.0, 25.0, 10.0));
        field.frame(&mut canvas, true);
        field.clear();
        assert!(field.is_empty());
        assert!(canvas.pixel(25, 25).unwrap()[3] > 0.0);
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = ParticleField::new(quiet_config());
        let mut b = ParticleField::new(quiet_config());
        a.emit_swirl(Vec2::new(0.0, 0.0), Vec2::new(12.0, 5.0), TEAL);
        b.emit_swirl(Vec2::new(0.0, 0.0), Vec2::new(12.0, 5.0), TEAL);
        assert_eq!(a.particles(), b.particles());
    }
}
