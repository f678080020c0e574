//! Evasive element repulsion
//!
//! While the pointer is within `radius` of the element's center, the element
//! is pushed directly away from it. Pushes accumulate into an owned offset;
//! the element drifts further on every incursion and is never pulled back.

use glam::Vec2;

use super::frame::LoopControl;
use crate::settings::RepelSettings;

/// Result of one repulsion frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepelStep {
    /// Element pushed by this vector
    Pushed(Vec2),
    /// Pointer outside the field (or exactly on the center)
    Idle,
    /// Element hidden; the loop is over
    Stopped,
}

impl RepelStep {
    /// Whether the repulsion task keeps running after this step
    pub fn control(self) -> LoopControl {
        match self {
            RepelStep::Stopped => LoopControl::Stop,
            RepelStep::Pushed(_) | RepelStep::Idle => LoopControl::Continue,
        }
    }
}

/// Push for an element at `center` with the pointer at `pointer`.
///
/// Magnitude falls off linearly from `max_push` at the center to zero at
/// `radius`. Zero when the pointer is outside the field or exactly on center.
pub fn push_vector(center: Vec2, pointer: Vec2, radius: f32, max_push: f32) -> Vec2 {
    let delta = center - pointer;
    let dist = delta.length();
    if dist <= 0.0 || dist >= radius {
        return Vec2::ZERO;
    }
    let force = (radius - dist) / radius;
    delta / dist * force * max_push
}

/// Repulsion controller state
#[derive(Debug, Clone)]
pub struct Repeller {
    offset: Vec2,
    radius: f32,
    max_push: f32,
    stopped: bool,
}

impl Repeller {
    pub fn new(settings: &RepelSettings) -> Self {
        Self {
            offset: Vec2::ZERO,
            radius: settings.radius,
            max_push: settings.max_push,
            stopped: false,
        }
    }

    /// Accumulated translation of the element
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// CSS transform for the current offset
    pub fn css_transform(&self) -> String {
        format!("translate({:.2}px, {:.2}px)", self.offset.x, self.offset.y)
    }

    /// Run one frame. `center` is where the element is rendered now.
    ///
    /// Once the element is seen hidden the controller stays stopped.
    pub fn tick(&mut self, center: Vec2, pointer: Vec2, visible: bool) -> RepelStep {
        if self.stopped {
            return RepelStep::Stopped;
        }
        if !visible {
            self.stopped = true;
            log::info!("Repulsion stopped (element hidden)");
            return RepelStep::Stopped;
        }

        let push = push_vector(center, pointer, self.radius, self.max_push);
        if push == Vec2::ZERO {
            return RepelStep::Idle;
        }
        self.offset += push;
        RepelStep::Pushed(push)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::FrameDriver;
    use std::cell::Cell;
    use std::rc::Rc;

    fn repeller() -> Repeller {
        Repeller::new(&RepelSettings::default())
    }

    #[test]
    fn test_outside_field_is_idle() {
        let mut r = repeller();
        let center = Vec2::new(500.0, 500.0);
        assert_eq!(r.tick(center, Vec2::new(680.0, 500.0), true), RepelStep::Idle);
        assert_eq!(r.tick(center, Vec2::new(0.0, 0.0), true), RepelStep::Idle);
        assert_eq!(r.offset(), Vec2::ZERO);
    }

    #[test]
    fn test_pointer_on_center_is_idle() {
        let mut r = repeller();
        let center = Vec2::new(10.0, 10.0);
        assert_eq!(r.tick(center, center, true), RepelStep::Idle);
    }

    #[test]
    fn test_half_radius_push() {
        let push = push_vector(Vec2::new(100.0, 0.0), Vec2::new(10.0, 0.0), 180.0, 60.0);
        assert!((push.length() - 30.0).abs() < 1e-4);
        assert!((push - Vec2::new(30.0, 0.0)).length() < 1e-4);

        // Diagonal: same magnitude, pointing from pointer to center
        let push = push_vector(Vec2::new(0.0, 0.0), Vec2::new(-54.0, -72.0), 180.0, 60.0);
        assert!((push.length() - 30.0).abs() < 1e-4);
        assert!(push.x > 0.0 && push.y > 0.0);
    }

    #[test]
    fn test_pushes_accumulate() {
        let mut r = repeller();
        let origin = Vec2::new(300.0, 300.0);
        let pointer = Vec2::new(300.0, 390.0);
        let mut total = Vec2::ZERO;
        for _ in 0..3 {
            match r.tick(origin + r.offset(), pointer, true) {
                RepelStep::Pushed(p) => total += p,
                other => panic!("expected push, got {other:?}"),
            }
        }
        assert_eq!(r.offset(), total);
        // Pushed upward, away from the pointer below
        assert!(r.offset().y < -60.0);
        assert_eq!(r.offset().x, 0.0);
    }

    #[test]
    fn test_hidden_stops_for_good() {
        let mut r = repeller();
        let center = Vec2::new(0.0, 0.0);
        let pointer = Vec2::new(10.0, 0.0);
        assert!(matches!(r.tick(center, pointer, true), RepelStep::Pushed(_)));
        assert_eq!(r.tick(center, pointer, false), RepelStep::Stopped);
        assert!(r.is_stopped());
        let offset = r.offset();
        assert_eq!(r.tick(center, pointer, true), RepelStep::Stopped);
        assert_eq!(r.offset(), offset);
    }

    #[test]
    fn test_css_transform() {
        let mut r = repeller();
        r.tick(Vec2::new(100.0, 0.0), Vec2::new(10.0, 0.0), true);
        assert_eq!(r.css_transform(), "translate(30.00px, 0.00px)");
    }

    #[test]
    fn test_hidden_element_ends_task() {
        let mut driver = FrameDriver::new();
        let hidden = Rc::new(Cell::new(false));
        let mut r = repeller();
        let origin = Vec2::new(200.0, 200.0);
        let pointer = Vec2::new(230.0, 200.0);

        let h = hidden.clone();
        let task = driver.register("repulsion", move |_| {
            r.tick(origin + r.offset(), pointer, !h.get()).control()
        });

        driver.run_frame(0.0);
        driver.run_frame(16.0);
        assert!(driver.is_active(task));

        hidden.set(true);
        driver.run_frame(32.0);
        assert!(!driver.is_active(task));

        // Showing it again does not bring the task back
        hidden.set(false);
        driver.run_frame(48.0);
        assert!(!driver.is_active(task));
        assert!(driver.is_empty());
    }
}
