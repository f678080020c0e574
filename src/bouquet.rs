//! Bouquet ring layout
//!
//! Roses are placed in concentric rings around a single center rose. Ring k
//! holds `6k` roses, rings are squished vertically and lifted so the result
//! reads as a bouquet rather than a target.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::consts::{BOUQUET_DELAY_STEP_MS, BOUQUET_TOP_Z};

/// Per-ring angular offset (radians) so consecutive rings don't line up
const RING_TWIST: f32 = 0.3;
/// Ring spacing as a fraction of the rose width
const RING_SPACING: f32 = 0.55;
/// Vertical squish applied to ring positions
const VERTICAL_SQUISH: f32 = 0.4;
/// Upward lift per ring as a fraction of the rose width
const RING_LIFT: f32 = 0.15;

/// Rose size bucket, chosen by how many roses are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Huge,
    Large,
    Medium,
    Small,
    Tiny,
}

impl SizeTier {
    pub fn for_count(count: u32) -> Self {
        match count {
            0..=5 => SizeTier::Huge,
            6..=15 => SizeTier::Large,
            16..=30 => SizeTier::Medium,
            31..=60 => SizeTier::Small,
            _ => SizeTier::Tiny,
        }
    }

    /// Base rose width (px)
    pub fn base_width(&self) -> f32 {
        match self {
            SizeTier::Huge => 120.0,
            SizeTier::Large => 90.0,
            SizeTier::Medium => 70.0,
            SizeTier::Small => 50.0,
            SizeTier::Tiny => 38.0,
        }
    }

    /// Uniform scale applied to every rose
    pub fn scale(&self) -> f32 {
        match self {
            SizeTier::Huge => 1.2,
            SizeTier::Large => 0.9,
            SizeTier::Medium => 0.7,
            SizeTier::Small => 0.5,
            SizeTier::Tiny => 0.38,
        }
    }
}

/// One positioned rose
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BouquetItem {
    /// Ring index (0 = center)
    pub ring: u32,
    /// Offset from the bouquet center (px)
    pub offset: Vec2,
    pub z_index: i32,
    /// Lean in degrees
    pub rotation: f32,
    pub scale: f32,
    /// Entrance animation delay (ms)
    pub delay_ms: u32,
}

impl BouquetItem {
    /// CSS transform placing the rose relative to the container center
    pub fn css_transform(&self) -> String {
        format!(
            "translate(calc(-50% + {:.2}px), calc(-50% + {:.2}px)) rotate({:.2}deg) scale({})",
            self.offset.x, self.offset.y, self.rotation, self.scale
        )
    }
}

/// Capacity of ring `k`
pub fn ring_capacity(ring: u32) -> u32 {
    if ring == 0 { 1 } else { ring * 6 }
}

/// Lay out `count` roses.
///
/// Positions are fully determined by `count`; only the lean uses `rng`.
pub fn generate_layout<R: Rng + ?Sized>(count: u32, rng: &mut R) -> Vec<BouquetItem> {
    let tier = SizeTier::for_count(count);
    let width = tier.base_width();
    let mut items = Vec::with_capacity(count as usize);

    let mut ring = 0;
    while (items.len() as u32) < count {
        let capacity = ring_capacity(ring);
        let placed = items.len() as u32;
        let in_ring = capacity.min(count - placed);

        let radius = ring as f32 * width * RING_SPACING;
        let lift = -(ring as f32) * width * RING_LIFT;

        for i in 0..in_ring {
            let angle = if ring == 0 {
                0.0
            } else {
                (i as f32 / capacity as f32) * TAU + ring as f32 * RING_TWIST
            };
            let offset = Vec2::new(
                angle.cos() * radius,
                angle.sin() * radius * VERTICAL_SQUISH + lift,
            );
            // Lean in [-17.5, 7.5) degrees
            let rotation = (rng.random::<f32>() - 0.5) * 25.0 - 5.0;
            let index = items.len() as u32;

            items.push(BouquetItem {
                ring,
                offset,
                z_index: BOUQUET_TOP_Z - ring as i32,
                rotation,
                scale: tier.scale(),
                delay_ms: index * BOUQUET_DELAY_STEP_MS,
            });
        }
        ring += 1;
    }

    log::debug!("Bouquet: {} roses over {} rings ({:?})", count, ring, tier);
    items
}
