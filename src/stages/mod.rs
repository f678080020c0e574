//! Gated stages
//!
//! The gate machine is the single consumer of stage completions. Each
//! validator owns its own state and reports completion as a `StageEvent`.

pub mod favorite;
pub mod gate;
pub mod quiz;
pub mod roses;

pub use favorite::{FavoriteStage, FavoriteSubmit};
pub use gate::{GateId, GateMachine, Region, StageEvent};
pub use quiz::{Polarity, Quiz, QuizClick, QuizItem};
pub use roses::{RoseRejection, RoseStage, RoseSubmit, sanitize_digits};
