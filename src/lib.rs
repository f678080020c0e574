//! Roses Gate - a gated, step-by-step reveal page
//!
//! Core modules:
//! - `stages`: Gate state machine and the per-stage validators
//! - `experience`: Routes input to the stages and collects surface effects
//! - `bouquet`: Procedural ring layout for the rose bouquet
//! - `sim`: Frame-driven loops (confetti, evasive button, parallax)
//! - `renderer`: Canvas 2D drawing (wasm only)
//! - `platform`: Browser DOM surface (wasm only)
//! - `settings`: Data-driven configuration

pub mod bouquet;
pub mod experience;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod stages;

pub use bouquet::{BouquetItem, SizeTier, generate_layout};
pub use experience::{Effect, Experience, Input, InputField};
pub use settings::Settings;
pub use stages::{GateId, GateMachine, Region, StageEvent};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Design constants
pub mod consts {
    /// Frames are assumed to arrive at roughly this rate (ms per frame)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Largest bouquet ever laid out
    pub const MAX_ROSES: u32 = 100;
    /// Reveal delay step between consecutive bouquet roses (ms)
    pub const BOUQUET_DELAY_STEP_MS: u32 = 30;
    /// Highest stacking order (ring 0); ring k sits at `BOUQUET_TOP_Z - k`
    pub const BOUQUET_TOP_Z: i32 = 20;

    /// Entrance stagger between quiz buttons (ms)
    pub const QUIZ_STAGGER_MS: u32 = 30;

    /// Hero gallery reveal: first rose delay and per-rose step (ms)
    pub const GALLERY_FIRST_MS: u32 = 400;
    pub const GALLERY_STEP_MS: u32 = 350;

    /// Delay between locking the free-text answer and showing the overlay (ms)
    pub const OVERLAY_DELAY_MS: u32 = 300;

    /// Confetti defaults
    pub const CONFETTI_POOL: usize = 300;
    pub const CONFETTI_GRAVITY: f32 = 0.04;
    pub const CONFETTI_RECYCLE_MARGIN: f32 = 20.0;

    /// Repulsion field around the pointer
    pub const REPEL_RADIUS: f32 = 180.0;
    pub const REPEL_MAX_PUSH: f32 = 60.0;

    /// Parallax easing factor and maximum offsets (px)
    pub const PARALLAX_EASE: f32 = 0.03;
    pub const PARALLAX_RANGE_X: f32 = 20.0;
    pub const PARALLAX_RANGE_Y: f32 = 15.0;
}

/// Session RNG, seeded once and shared by every randomized subsystem
pub fn session_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Singular/plural noun for a count ("1 rose", "2 roses")
#[inline]
pub fn pluralize(count: impl std::fmt::Display, noun: &str) -> String {
    let count = count.to_string();
    if count == "1" {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "rose"), "1 rose");
        assert_eq!(pluralize(12, "rose"), "12 roses");
        assert_eq!(pluralize("40000000000", "rose"), "40000000000 roses");
    }
}
