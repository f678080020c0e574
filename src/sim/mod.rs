//! Frame-driven loops
//!
//! Everything here advances once per display frame through `FrameDriver`.
//! Loops only read shared inputs (pointer, element geometry) and own the
//! rest of their state, so their order within a frame never matters.
//! Randomness always comes from a seeded RNG.

pub mod confetti;
pub mod frame;
pub mod pointer;
pub mod repel;

pub use confetti::{Confetti, Particle};
pub use frame::{FrameDriver, LoopControl, TaskHandle};
pub use pointer::{Parallax, PointerTracker, gallery_reveal_delay_ms};
pub use repel::{RepelStep, Repeller, push_vector};
