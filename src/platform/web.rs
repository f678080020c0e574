//! Browser surface
//!
//! Wires page events into `Experience::dispatch`, applies the returned
//! effects to the DOM, and drives every per-frame loop from a single
//! `requestAnimationFrame` callback.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlCanvasElement, HtmlElement,
    HtmlIFrameElement, HtmlInputElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, MouseEvent, Window,
};

use super::{classes, ids};
use crate::bouquet::BouquetItem;
use crate::experience::{Effect, Experience, Input, InputField};
use crate::renderer::ConfettiRenderer;
use crate::settings::Settings;
use crate::sim::{
    Confetti, FrameDriver, LoopControl, Parallax, PointerTracker, RepelStep, Repeller,
    gallery_reveal_delay_ms,
};
use crate::stages::{GateId, Region};

/// Markup for one bouquet rose (drawn entirely in CSS)
const ROSE_HTML: &str = r#"<div class="css-rose"><div class="css-thorns"><div></div><div></div><div></div><div></div></div><div class="css-stem"><div></div></div><div class="css-petals"><div></div><div></div><div></div><div></div><div></div><div></div><div></div></div></div>"#;

/// Everything the event handlers share
struct App {
    window: Window,
    document: Document,
    experience: RefCell<Experience>,
    driver: RefCell<FrameDriver>,
    pointer: Cell<PointerTracker>,
    fade: RevealObserver,
    quiz_buttons: RefCell<Vec<Element>>,
}

/// One-shot "reveal when visible" observer: adds `visible` and unobserves
struct RevealObserver {
    observer: IntersectionObserver,
}

impl RevealObserver {
    fn new(threshold: f64) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if entry.is_intersecting() {
                        let target = entry.target();
                        let _ = target.class_list().add_1(classes::VISIBLE);
                        observer.unobserve(&target);
                    }
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        callback.forget();
        Ok(Self { observer })
    }

    fn observe(&self, el: &Element) {
        self.observer.observe(el);
    }

    /// Watch every fade-in element under `root`
    fn observe_fade_ins(&self, root: &Element) -> Result<u32, JsValue> {
        let list = root.query_selector_all(&format!(".{}", classes::FADE_IN))?;
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                self.observe(&el);
            }
        }
        Ok(list.length())
    }
}

/// Run `f` the first time `el` becomes visible
fn on_first_visible<F>(el: &Element, threshold: f64, f: F) -> Result<(), JsValue>
where
    F: FnOnce() + 'static,
{
    let mut f = Some(f);
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let hit = entries.iter().any(|e| {
                e.unchecked_into::<IntersectionObserverEntry>()
                    .is_intersecting()
            });
            if hit {
                observer.disconnect();
                if let Some(f) = f.take() {
                    f();
                }
            }
        },
    );
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    observer.observe(el);
    callback.forget();
    Ok(())
}

/// Add `class` until the element's current animation ends
fn pulse_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
    let target = el.clone();
    let class = class.to_string();
    let callback = Closure::once_into_js(move || {
        let _ = target.class_list().remove_1(&class);
    });
    let options = AddEventListenerOptions::new();
    options.set_once(true);
    let _ = el.add_event_listener_with_callback_and_add_event_listener_options(
        "animationend",
        callback.unchecked_ref(),
        &options,
    );
}

fn set_timeout<F: FnOnce() + 'static>(window: &Window, delay_ms: u32, f: F) {
    let callback = Closure::once_into_js(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    ) {
        log::warn!("setTimeout failed: {:?}", e);
    }
}

fn add_listener<F>(target: &Element, event: &str, mut handler: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn viewport(window: &Window) -> Vec2 {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Vec2::new(w as f32, h as f32)
}

impl App {
    fn by_id(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            log::warn!("#{} not found", id);
        }
        el
    }

    fn input(&self, field: InputField) -> Option<HtmlInputElement> {
        let id = match field {
            InputField::RoseCount => ids::ROSES_INPUT,
            InputField::Favorite => ids::FAV_INPUT,
        };
        self.by_id(id).and_then(|el| el.dyn_into().ok())
    }

    fn lock_button(&self, field: InputField) -> Option<Element> {
        self.by_id(match field {
            InputField::RoseCount => ids::ROSES_LOCK,
            InputField::Favorite => ids::FAV_LOCK,
        })
    }

    fn region(&self, region: Region) -> Option<Element> {
        match region {
            Region::AfterGate(gate) => self
                .by_id(gate.element_id())?
                .next_element_sibling()
                .filter(|next| next.class_list().contains(classes::GATED_SECTION)),
            Region::Final => self.by_id(ids::FINAL_SECTION),
        }
    }
}

/// Feed one input through the experience and apply the result
fn dispatch(app: &Rc<App>, input: Input) {
    let effects = app.experience.borrow_mut().dispatch(input);
    for effect in effects {
        if let Err(e) = apply(app, effect) {
            log::error!("Failed to apply effect: {:?}", e);
        }
    }
}

fn apply(app: &Rc<App>, effect: Effect) -> Result<(), JsValue> {
    match effect {
        Effect::QuizSelected(index) => {
            if let Some(btn) = app.quiz_buttons.borrow().get(index) {
                btn.class_list().add_1(classes::SELECTED)?;
                if let Some(btn) = btn.dyn_ref::<HtmlElement>() {
                    btn.style().set_property("pointer-events", "none")?;
                }
            }
        }
        Effect::QuizRejected(index) => {
            if let Some(btn) = app.quiz_buttons.borrow().get(index) {
                pulse_class(btn, classes::REJECTED);
            }
        }
        Effect::QuizCompleteShown => {
            if let Some(el) = app.by_id(ids::QUIZ_COMPLETE) {
                el.class_list().add_1(classes::VISIBLE)?;
            }
        }
        Effect::SetInputValue { field, value } => {
            if let Some(input) = app.input(field) {
                input.set_value(&value);
            }
        }
        Effect::ShowRoseError(message) => {
            if let Some(el) = app.by_id(ids::ROSES_ERROR) {
                el.set_text_content(Some(message));
                el.class_list().add_1(classes::VISIBLE)?;
            }
        }
        Effect::ClearRoseError => {
            if let Some(el) = app.by_id(ids::ROSES_ERROR) {
                el.set_text_content(Some(""));
                el.class_list().remove_1(classes::VISIBLE)?;
            }
        }
        Effect::Shake(field) => {
            if let Some(input) = app.input(field) {
                pulse_class(&input, classes::SHAKE);
            }
        }
        Effect::LockInput { field, label } => {
            if let Some(btn) = app.lock_button(field) {
                btn.class_list().add_1(classes::LOCKED)?;
                btn.set_text_content(Some(&label));
            }
            if let Some(input) = app.input(field) {
                input.set_disabled(true);
            }
        }
        Effect::RenderBouquet(items) => render_bouquet(app, &items)?,
        Effect::ScheduleOverlay { delay_ms } => {
            let app_clone = app.clone();
            set_timeout(&app.window, delay_ms, move || {
                dispatch(&app_clone, Input::OverlayDue)
            });
        }
        Effect::ShowOverlay => {
            if let Some(el) = app.by_id(ids::WRONG_OVERLAY) {
                el.class_list().add_1(classes::VISIBLE)?;
            }
        }
        Effect::HideOverlay => {
            if let Some(el) = app.by_id(ids::WRONG_OVERLAY) {
                el.class_list().remove_1(classes::VISIBLE)?;
            }
        }
        Effect::OpenGate(gate) => {
            if let Some(el) = app.by_id(gate.element_id()) {
                el.class_list().add_1(classes::OPEN)?;
            }
        }
        Effect::Unlock(region) => match app.region(region) {
            Some(el) => {
                el.class_list().add_1(classes::UNLOCKED)?;
                let watched = app.fade.observe_fade_ins(&el)?;
                log::info!("Unlocked {:?} ({} fade-in elements)", region, watched);
            }
            None => log::warn!("No content to unlock for {:?}", region),
        },
        Effect::PressAccept => {
            if let Some(el) = app.by_id(ids::ACCEPT) {
                el.class_list().add_1(classes::PRESSED)?;
            }
        }
        Effect::HideEvasive => {
            if let Some(el) = app.by_id(ids::EVASIVE).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
                el.style().set_property("display", "none")?;
            }
        }
        Effect::LaunchConfetti => launch_confetti(app)?,
        Effect::ShowVideo { src } => {
            if let Some(el) = app.by_id(ids::VIDEO_CONTAINER) {
                el.class_list().add_1(classes::VISIBLE)?;
            }
            if let Some(player) = app
                .by_id(ids::VIDEO_PLAYER)
                .and_then(|e| e.dyn_into::<HtmlIFrameElement>().ok())
            {
                player.set_src(&src);
            }
        }
    }
    Ok(())
}

fn render_bouquet(app: &App, items: &[BouquetItem]) -> Result<(), JsValue> {
    let Some(container) = app.by_id(ids::BOUQUET) else {
        return Ok(());
    };
    container.set_inner_html("");

    let wrapper = app.document.create_element("div")?;
    wrapper.set_class_name(classes::BOUQUET_WRAPPER);
    for item in items {
        let rose = app.document.create_element("div")?;
        rose.set_class_name(classes::BOUQUET_ROSE);
        rose.set_inner_html(ROSE_HTML);
        rose.set_attribute(
            "style",
            &format!(
                "position: absolute; left: 50%; top: 50%; z-index: {}; transform: {}; \
                 opacity: 0; animation: bouquetRoseIn 0.4s ease-out {}ms forwards;",
                item.z_index,
                item.css_transform(),
                item.delay_ms
            ),
        )?;
        wrapper.append_child(&rose)?;
    }
    container.append_child(&wrapper)?;
    container.class_list().add_1(classes::VISIBLE)?;
    Ok(())
}

fn launch_confetti(app: &Rc<App>) -> Result<(), JsValue> {
    let Some(canvas) = app
        .by_id(ids::CONFETTI)
        .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
    else {
        return Ok(());
    };
    canvas.class_list().add_1(classes::ACTIVE)?;

    let size = viewport(&app.window);
    let settings = app.experience.borrow().settings().confetti.clone();
    let rng = app.experience.borrow_mut().fork_rng();
    let renderer = Rc::new(ConfettiRenderer::new(canvas, settings.palette.clone())?);
    renderer.resize(size.x as u32, size.y as u32);
    let confetti = Rc::new(RefCell::new(Confetti::new(&settings, size.x, size.y, rng)));

    // Track viewport resizes
    {
        let renderer = renderer.clone();
        let confetti = confetti.clone();
        let window = app.window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let size = viewport(&window);
            renderer.resize(size.x as u32, size.y as u32);
            confetti.borrow_mut().resize(size.x, size.y);
        });
        app.window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    app.driver.borrow_mut().register("confetti", move |_now| {
        let mut confetti = confetti.borrow_mut();
        confetti.step();
        if let Err(e) = renderer.draw(&confetti) {
            log::warn!("Confetti draw failed: {:?}", e);
        }
        LoopControl::Continue
    });
    Ok(())
}

fn start_repulsion(app: &Rc<App>) {
    let Some(el) = app.by_id(ids::EVASIVE) else {
        return;
    };
    let mut repeller = Repeller::new(&app.experience.borrow().settings().repel);
    let window = app.window.clone();
    let app_ref = Rc::downgrade(app);

    app.driver.borrow_mut().register("repulsion", move |_now| {
        let Some(app) = app_ref.upgrade() else {
            return LoopControl::Stop;
        };
        let visible = window
            .get_computed_style(&el)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("display").ok())
            .is_none_or(|display| display != "none");

        let rect = el.get_bounding_client_rect();
        let center = Vec2::new(
            (rect.left() + rect.width() / 2.0) as f32,
            (rect.top() + rect.height() / 2.0) as f32,
        );
        let step = repeller.tick(center, app.pointer.get().absolute, visible);
        if let (RepelStep::Pushed(_), Some(html)) = (step, el.dyn_ref::<HtmlElement>()) {
            let _ = html.style().set_property("transform", &repeller.css_transform());
        }
        step.control()
    });
}

fn start_parallax(app: &Rc<App>, roses: Vec<HtmlElement>) {
    let mut parallax = Parallax::default();
    let app_ref = Rc::downgrade(app);
    app.driver.borrow_mut().register("parallax", move |_now| {
        let Some(app) = app_ref.upgrade() else {
            return LoopControl::Stop;
        };
        let base = parallax.step(app.pointer.get().normalized);
        for (i, rose) in roses.iter().enumerate() {
            let offset = base * Parallax::depth(i);
            let _ = rose
                .style()
                .set_property("translate", &format!("{:.2}px {:.2}px", offset.x, offset.y));
        }
        LoopControl::Continue
    });
}

fn request_frame(app: Rc<App>) {
    let window = app.window.clone();
    let callback = Closure::once_into_js(move |time: f64| {
        app.driver.borrow_mut().run_frame(time);
        request_frame(app);
    });
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

fn build_quiz(app: &Rc<App>) -> Result<(), JsValue> {
    let Some(grid) = app.by_id(ids::QUIZ_GRID) else {
        return Ok(());
    };
    let threshold = app.experience.borrow().settings().thresholds.quiz_button;
    let observer = RevealObserver::new(threshold)?;

    let labels: Vec<(String, &'static str)> = app
        .experience
        .borrow()
        .quiz()
        .items()
        .iter()
        .map(|item| (item.label.clone(), item.polarity.css_modifier()))
        .collect();

    let mut buttons = Vec::with_capacity(labels.len());
    for (index, (label, modifier)) in labels.into_iter().enumerate() {
        let btn = app.document.create_element("button")?;
        btn.set_class_name(&format!(
            "{0} {0}--{1}",
            classes::QUIZ_BUTTON,
            modifier
        ));
        btn.set_text_content(Some(&label));
        btn.set_attribute(
            "style",
            &format!(
                "animation-delay: {}ms",
                crate::stages::Quiz::stagger_delay_ms(index)
            ),
        )?;
        let app_clone = app.clone();
        add_listener(&btn, "click", move || {
            dispatch(&app_clone, Input::QuizClick(index))
        })?;
        grid.append_child(&btn)?;
        observer.observe(&btn);
        buttons.push(btn);
    }
    *app.quiz_buttons.borrow_mut() = buttons;
    Ok(())
}

fn wire_inputs(app: &Rc<App>) -> Result<(), JsValue> {
    if let Some(input) = app.input(InputField::RoseCount) {
        let app_clone = app.clone();
        let source = input.clone();
        add_listener(&input, "input", move || {
            dispatch(&app_clone, Input::RoseEdited(source.value()))
        })?;
    }

    if let (Some(btn), Some(input)) = (
        app.lock_button(InputField::RoseCount),
        app.input(InputField::RoseCount),
    ) {
        let app_clone = app.clone();
        add_listener(&btn, "click", move || {
            dispatch(&app_clone, Input::RoseSubmitted(input.value()))
        })?;
    }

    if let (Some(btn), Some(input)) = (
        app.lock_button(InputField::Favorite),
        app.input(InputField::Favorite),
    ) {
        let app_clone = app.clone();
        add_listener(&btn, "click", move || {
            dispatch(&app_clone, Input::FavoriteSubmitted(input.value()))
        })?;
    }

    if let Some(btn) = app.by_id(ids::WRONG_DISMISS) {
        let app_clone = app.clone();
        add_listener(&btn, "click", move || {
            dispatch(&app_clone, Input::OverlayDismissed)
        })?;
    }

    if let Some(btn) = app.by_id(ids::ACCEPT) {
        let app_clone = app.clone();
        add_listener(&btn, "click", move || {
            dispatch(&app_clone, Input::Accept)
        })?;
    }
    Ok(())
}

fn wire_pointer(app: &Rc<App>) -> Result<(), JsValue> {
    let app_clone = app.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
        let mut pointer = app_clone.pointer.get();
        pointer.update(
            Vec2::new(event.client_x() as f32, event.client_y() as f32),
            viewport(&app_clone.window),
        );
        app_clone.pointer.set(pointer);
    });
    app.document
        .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Hero gallery: staggered reveal plus parallax on pointer devices
fn setup_gallery(app: &Rc<App>) -> Result<(), JsValue> {
    let list = app
        .document
        .query_selector_all(&format!(".{}", classes::GALLERY_ROSE))?;
    let mut roses = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        let Some(rose) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let target = rose.clone();
        set_timeout(&app.window, gallery_reveal_delay_ms(i as usize), move || {
            let _ = target.class_list().add_1(classes::VISIBLE);
        });
        roses.push(rose);
    }

    let touch = js_sys::Reflect::has(&app.window, &JsValue::from_str("ontouchstart"))
        .unwrap_or(false);
    if app.experience.borrow().settings().parallax && !touch {
        start_parallax(app, roses);
    }
    Ok(())
}

/// Entry point: build the experience and wire it into the page
pub fn run(seed: u64) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let settings = Settings::load();
    let fade = RevealObserver::new(settings.thresholds.fade_in)?;
    let final_threshold = settings.thresholds.final_section;

    let app = Rc::new(App {
        window,
        document,
        experience: RefCell::new(Experience::new(settings, seed)),
        driver: RefCell::new(FrameDriver::new()),
        pointer: Cell::new(PointerTracker::default()),
        fade,
        quiz_buttons: RefCell::new(Vec::new()),
    });

    // Content that is visible from the start
    if let Some(body) = app.document.body() {
        app.fade.observe_fade_ins(&body)?;
    }

    setup_gallery(&app)?;
    wire_pointer(&app)?;
    build_quiz(&app)?;
    wire_inputs(&app)?;

    if let Some(final_section) = app.by_id(ids::FINAL_SECTION) {
        let app_clone = app.clone();
        on_first_visible(&final_section, final_threshold, move || {
            start_repulsion(&app_clone)
        })?;
    }

    for gate in GateId::ALL {
        if app.document.get_element_by_id(gate.element_id()).is_none() {
            log::warn!("Gate #{} missing from page", gate.element_id());
        }
    }

    request_frame(app);
    log::info!("Roses Gate running!");
    Ok(())
}
