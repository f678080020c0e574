//! Confetti canvas renderer

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::Confetti;

/// Draws the confetti pool as filled, rotated rectangles
pub struct ConfettiRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    palette: Vec<String>,
}

impl ConfettiRenderer {
    pub fn new(canvas: HtmlCanvasElement, palette: Vec<String>) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        Ok(Self {
            canvas,
            ctx,
            palette,
        })
    }

    /// Match the canvas backing size to the viewport
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Clear and redraw every particle
    pub fn draw(&self, confetti: &Confetti) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let bounds = confetti.bounds();
        ctx.clear_rect(0.0, 0.0, bounds.x as f64, bounds.y as f64);

        for p in confetti.particles() {
            let color = self
                .palette
                .get(p.color)
                .map(String::as_str)
                .unwrap_or("#ff6b8a");
            let (w, h) = (p.size.x as f64, p.size.y as f64);

            ctx.save();
            ctx.translate(p.pos.x as f64, p.pos.y as f64)?;
            ctx.rotate((p.rotation as f64).to_radians())?;
            ctx.set_fill_style_str(color);
            ctx.fill_rect(-w / 2.0, -h / 2.0, w, h);
            ctx.restore();
        }
        Ok(())
    }
}
