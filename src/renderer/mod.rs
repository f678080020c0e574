//! Canvas 2D rendering
//!
//! Only the confetti pool is drawn on a canvas; everything else is DOM.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::ConfettiRenderer;
