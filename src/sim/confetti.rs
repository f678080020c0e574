//! Confetti particle pool
//!
//! A fixed-size pool that rains forever once started. Particles that fall
//! past the bottom edge are replaced in place by fresh ones, so the pool
//! never grows or shrinks. Units are pixels and frames.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::settings::ConfettiSettings;

/// A single confetti piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Width, height
    pub size: Vec2,
    /// Index into the palette
    pub color: usize,
    /// Degrees
    pub rotation: f32,
    /// Degrees per frame
    pub rotation_speed: f32,
}

/// Confetti simulation state
#[derive(Debug, Clone)]
pub struct Confetti {
    particles: Vec<Particle>,
    bounds: Vec2,
    gravity: f32,
    recycle_margin: f32,
    palette_len: usize,
    rng: Pcg32,
    recycled: u64,
}

impl Confetti {
    /// Seed a full pool above a `width` x `height` canvas
    pub fn new(settings: &ConfettiSettings, width: f32, height: f32, rng: Pcg32) -> Self {
        let mut confetti = Self {
            particles: Vec::with_capacity(settings.particle_count),
            bounds: Vec2::new(width, height),
            gravity: settings.gravity,
            recycle_margin: settings.recycle_margin,
            palette_len: settings.palette.len().max(1),
            rng,
            recycled: 0,
        };
        for _ in 0..settings.particle_count {
            let p = confetti.sample();
            confetti.particles.push(p);
        }
        log::info!(
            "Confetti started: {} particles on {}x{}",
            confetti.particles.len(),
            width,
            height
        );
        confetti
    }

    /// A fresh particle somewhere above the canvas
    fn sample(&mut self) -> Particle {
        let rng = &mut self.rng;
        Particle {
            pos: Vec2::new(
                rng.random::<f32>() * self.bounds.x,
                -rng.random::<f32>() * self.bounds.y,
            ),
            vel: Vec2::new((rng.random::<f32>() - 0.5) * 4.0, rng.random::<f32>() * 3.0 + 2.0),
            size: Vec2::new(rng.random::<f32>() * 10.0 + 5.0, rng.random::<f32>() * 6.0 + 3.0),
            color: rng.random_range(0..self.palette_len),
            rotation: rng.random::<f32>() * 360.0,
            rotation_speed: (rng.random::<f32>() - 0.5) * 10.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Total particles replaced so far
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    /// Track a viewport resize
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(width, height);
    }

    /// Advance every particle by one frame
    pub fn step(&mut self) {
        let floor = self.bounds.y + self.recycle_margin;
        for i in 0..self.particles.len() {
            let p = &mut self.particles[i];
            p.pos += p.vel;
            p.vel.y += self.gravity;
            p.rotation += p.rotation_speed;

            if p.pos.y > floor {
                self.particles[i] = self.sample();
                self.recycled += 1;
            }
        }
    }
}
