//! Pointer tracking and hero gallery parallax

use glam::Vec2;

use crate::consts::*;

/// Latest pointer position, written by the mousemove handler only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    /// Position as a fraction of the viewport (0..1)
    pub normalized: Vec2,
    /// Position in client pixels
    pub absolute: Vec2,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self {
            normalized: Vec2::splat(0.5),
            absolute: Vec2::ZERO,
        }
    }
}

impl PointerTracker {
    pub fn update(&mut self, client: Vec2, viewport: Vec2) {
        self.absolute = client;
        if viewport.x > 0.0 && viewport.y > 0.0 {
            self.normalized = client / viewport;
        }
    }
}

/// Eased pointer following for the gallery roses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    current: Vec2,
}

impl Default for Parallax {
    fn default() -> Self {
        Self {
            current: Vec2::splat(0.5),
        }
    }
}

impl Parallax {
    /// Ease toward `target` (normalized) and return the base offset in px
    pub fn step(&mut self, target: Vec2) -> Vec2 {
        self.current += (target - self.current) * PARALLAX_EASE;
        (self.current - Vec2::splat(0.5)) * Vec2::new(PARALLAX_RANGE_X, PARALLAX_RANGE_Y)
    }

    /// Depth multiplier for gallery rose `index` (three layers)
    pub fn depth(index: usize) -> f32 {
        0.5 + (index % 3) as f32 * 0.3
    }
}

/// When gallery rose `index` fades in after load (ms)
pub fn gallery_reveal_delay_ms(index: usize) -> u32 {
    GALLERY_FIRST_MS + index as u32 * GALLERY_STEP_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_normalizes() {
        let mut t = PointerTracker::default();
        t.update(Vec2::new(200.0, 150.0), Vec2::new(800.0, 600.0));
        assert_eq!(t.absolute, Vec2::new(200.0, 150.0));
        assert_eq!(t.normalized, Vec2::new(0.25, 0.25));

        // Degenerate viewport keeps the last normalized value
        t.update(Vec2::new(5.0, 5.0), Vec2::ZERO);
        assert_eq!(t.normalized, Vec2::new(0.25, 0.25));
        assert_eq!(t.absolute, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_parallax_eases() {
        let mut p = Parallax::default();
        assert_eq!(p.step(Vec2::splat(0.5)), Vec2::ZERO);

        let first = p.step(Vec2::new(1.0, 1.0));
        // 0.5 + 0.5 * 0.03 = 0.515 -> (0.015 * 20, 0.015 * 15)
        assert!((first.x - 0.3).abs() < 1e-5);
        assert!((first.y - 0.225).abs() < 1e-5);

        let mut last = first;
        for _ in 0..1_000 {
            last = p.step(Vec2::new(1.0, 1.0));
        }
        assert!((last.x - 10.0).abs() < 1e-3);
        assert!((last.y - 7.5).abs() < 1e-3);
    }

    #[test]
    fn test_depth_layers() {
        assert_eq!(Parallax::depth(0), 0.5);
        assert!((Parallax::depth(1) - 0.8).abs() < 1e-6);
        assert!((Parallax::depth(5) - 1.1).abs() < 1e-6);
        assert_eq!(Parallax::depth(3), 0.5);
    }

    #[test]
    fn test_gallery_delays() {
        assert_eq!(gallery_reveal_delay_ms(0), 400);
        assert_eq!(gallery_reveal_delay_ms(2), 1100);
    }
}
