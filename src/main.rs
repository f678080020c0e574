//! Roses Gate entry point
//!
//! In the browser this wires the experience into the page. Natively it runs a
//! headless walkthrough of every stage and loop and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger init failed: {e}")));
    }

    log::info!("Roses Gate starting...");
    let seed = js_sys::Date::now() as u64;
    if let Err(e) = roses_gate::platform::web::run(seed) {
        log::error!("Failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Roses Gate (native) starting...");
    log::info!("The page itself needs a browser - build for wasm32 and serve it");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    walkthrough(seed);
}

/// Drive every stage and loop headlessly
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough(seed: u64) {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use roses_gate::sim::{Confetti, FrameDriver, LoopControl, Repeller};
    use roses_gate::stages::Polarity;
    use roses_gate::{Effect, Experience, Input, Settings, consts::FRAME_MS};

    let mut exp = Experience::new(Settings::load(), seed);
    let mut effects = Vec::new();

    let picks: Vec<usize> = exp
        .quiz()
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| item.polarity == Polarity::Affirming)
        .map(|(i, _)| i)
        .collect();
    for i in picks {
        effects.extend(exp.dispatch(Input::QuizClick(i)));
    }
    effects.extend(exp.dispatch(Input::RoseSubmitted("0".into())));
    effects.extend(exp.dispatch(Input::RoseSubmitted("24".into())));
    effects.extend(exp.dispatch(Input::FavoriteSubmitted("everything".into())));
    effects.extend(exp.dispatch(Input::OverlayDue));
    effects.extend(exp.dispatch(Input::OverlayDismissed));
    effects.extend(exp.dispatch(Input::Accept));

    for effect in &effects {
        match effect {
            Effect::RenderBouquet(items) => println!("  bouquet: {} roses", items.len()),
            other => println!("  {:?}", other),
        }
    }
    println!("Gates open: {}/3", exp.gates().open_count());

    // Loops: confetti forever, repulsion until the element is hidden
    let mut driver = FrameDriver::new();
    let rng = exp.fork_rng();
    let confetti = Rc::new(RefCell::new(Confetti::new(
        &exp.settings().confetti,
        1280.0,
        720.0,
        rng,
    )));
    {
        let confetti = confetti.clone();
        driver.register("confetti", move |_| {
            confetti.borrow_mut().step();
            LoopControl::Continue
        });
    }

    let mut repeller = Repeller::new(&exp.settings().repel);
    let origin = Vec2::new(640.0, 400.0);
    let repel = driver.register("repulsion", move |now| {
        // Pointer creeps toward the button; it gets hidden after two seconds
        let pointer = Vec2::new(640.0 - 150.0 + (now / 40.0) as f32, 400.0);
        let visible = now < 2000.0;
        repeller
            .tick(origin + repeller.offset(), pointer, visible)
            .control()
    });

    for frame in 0..600 {
        driver.run_frame(frame as f64 * FRAME_MS);
    }
    println!(
        "After {} frames: {} particles ({} recycled), repulsion active: {}",
        driver.frames(),
        confetti.borrow().len(),
        confetti.borrow().recycled(),
        driver.is_active(repel)
    );
}
