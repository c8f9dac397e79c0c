#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the page.
//!
//! [`PortfolioRunner`] wraps a [`SiteModel`] over the live document with
//! JS-friendly types. The host page forwards `scroll`, `resize`,
//! `mousedown` and `keydown`, reports element geometry, and calls
//! [`PortfolioRunner::tick`] from `requestAnimationFrame`, applying the
//! returned styles. Only compiled on `wasm32` targets.

use std::fmt::Display;
use std::rc::Rc;
use std::time::Duration;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use folio_core::{KeyCode, Rect};
use folio_runtime::{ContactMessage, DeliveryError, DeliveryOutcome, SiteConfig};

use crate::clock::FrameClock;
use crate::console;
use crate::dom::DomPlatform;
use crate::frame::{FrameOutput, PoseStyle};
use crate::model::{OverlayKind, PageLayout, Region, SiteModel};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
    [x, y, width, height]
        .iter()
        .all(|v| v.is_finite())
        .then(|| Rect::new(x, y, width, height))
}

fn overlay_kind(name: &str) -> Option<OverlayKind> {
    match name {
        "dropdown" => Some(OverlayKind::Dropdown),
        "sidebar" => Some(OverlayKind::Sidebar),
        _ => None,
    }
}

const fn outcome_label(outcome: DeliveryOutcome) -> &'static str {
    match outcome {
        DeliveryOutcome::Delivered => "delivered",
        DeliveryOutcome::ComposeFallback => "compose_fallback",
        DeliveryOutcome::Failed => "failed",
    }
}

fn strings_to_js(values: &[String]) -> JsValue {
    values
        .iter()
        .map(|v| JsValue::from_str(v))
        .collect::<Array>()
        .into()
}

fn poses_to_js(poses: &[PoseStyle]) -> JsValue {
    let out = Array::new();
    for pose in poses {
        let obj = Object::new();
        set_js(&obj, "transform", JsValue::from_str(&pose.transform()));
        set_js(&obj, "opacity", JsValue::from_f64(pose.opacity));
        out.push(&obj.into());
    }
    out.into()
}

fn frame_to_js(frame: &FrameOutput) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "sliderX", JsValue::from_str(&frame.slider_x));
    set_js(&obj, "parallaxTextY", JsValue::from_str(&frame.parallax_text_y));
    set_js(&obj, "parallaxPlanetsY", JsValue::from_str(&frame.parallax_planets_y));
    set_js(&obj, "parallaxStarsX", JsValue::from_str(&frame.parallax_stars_x));
    set_js(&obj, "galleryImagesY", strings_to_js(&frame.gallery_images_y));
    set_js(&obj, "galleryProgress", JsValue::from_f64(frame.gallery_progress));
    set_js(&obj, "dropdownOpen", JsValue::from_bool(frame.dropdown_open));
    set_js(&obj, "sidebarOpen", JsValue::from_bool(frame.sidebar_open));
    set_js(&obj, "heroText", poses_to_js(&frame.hero_text));
    set_js(&obj, "dropdownItems", poses_to_js(&frame.dropdown_items));
    set_js(&obj, "sidebarClip", JsValue::from_str(&frame.sidebar_clip));
    set_js(&obj, "sidebarLinks", poses_to_js(&frame.sidebar_links));
    set_js(&obj, "contactBlocks", poses_to_js(&frame.contact_blocks));
    set_js(&obj, "contactStatus", JsValue::from_str(frame.contact_status));
    obj.into()
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Route `tracing` output to the console. `directives` uses `EnvFilter`
/// syntax (e.g. `"folio.nav=debug,info"`). Returns `false` if a subscriber
/// was already installed.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(directives: Option<String>) -> bool {
    console::init(directives.as_deref()).is_ok()
}

/// The portfolio page engine, driven by the host page.
#[wasm_bindgen]
pub struct PortfolioRunner {
    model: SiteModel<DomPlatform>,
    clock: FrameClock,
}

#[wasm_bindgen]
impl PortfolioRunner {
    /// Mount on the current document. `config_json` is an optional
    /// `SiteConfig` in JSON; `gallery_items` overrides the gallery size.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: Option<String>,
        gallery_items: Option<u32>,
    ) -> Result<PortfolioRunner, JsValue> {
        install_panic_hook();
        let config = match config_json.as_deref() {
            Some(json) => SiteConfig::from_json_str(json).map_err(js_error)?,
            None => SiteConfig::default(),
        };
        let dom = Rc::new(DomPlatform::from_window().ok_or_else(|| js_error("no window document"))?);
        let mut layout = PageLayout::default();
        if let Some(items) = gallery_items {
            layout.gallery_items = items as usize;
        }
        let viewport = dom.viewport();
        let model =
            SiteModel::new(config, Rc::clone(&dom), dom, viewport, layout).map_err(js_error)?;
        Ok(Self {
            model,
            clock: FrameClock::new(),
        })
    }

    pub fn scroll(&mut self, y: f64) {
        self.model.scroll(y);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.model.resize(width, height);
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.model.pointer_down(x, y);
    }

    /// `key` is a DOM `KeyboardEvent.key` value.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, key: &str) {
        self.model.key_down(KeyCode::from_dom_key(key));
    }

    /// Advance the clock by `dt_ms` milliseconds. Timers see the whole
    /// step; animations move at most one frame.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance(&mut self, dt_ms: f64) {
        self.model.advance(millis(dt_ms));
    }

    /// Advance by the wall-clock time since the previous tick and return
    /// the frame. Call once per animation frame.
    pub fn tick(&mut self) -> JsValue {
        let dt = self.clock.tick();
        self.model.advance(dt);
        self.frame()
    }

    /// Restart frame timing, e.g. when the page becomes visible again.
    #[wasm_bindgen(js_name = resetClock)]
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    pub fn navigate(&mut self, section: &str) {
        self.model.navigate(section);
    }

    #[wasm_bindgen(js_name = toggleDropdown)]
    pub fn toggle_dropdown(&mut self) -> bool {
        self.model.toggle(OverlayKind::Dropdown)
    }

    #[wasm_bindgen(js_name = toggleSidebar)]
    pub fn toggle_sidebar(&mut self) -> bool {
        self.model.toggle(OverlayKind::Sidebar)
    }

    /// Client-space bounds of `"dropdown"` or `"sidebar"`. Non-finite
    /// values clear the bounds. Returns `false` for an unknown overlay.
    #[wasm_bindgen(js_name = setOverlayBounds)]
    pub fn set_overlay_bounds(&mut self, overlay: &str, x: f64, y: f64, width: f64, height: f64) -> bool {
        let Some(kind) = overlay_kind(overlay) else {
            return false;
        };
        self.model.set_overlay_bounds(kind, rect(x, y, width, height));
        true
    }

    /// Document-space bounds of a tracked section (`parallax`,
    /// `portfolio`, `gallery-<n>`, `contact`). Non-finite values clear it.
    /// Returns `false` for an unknown name.
    #[wasm_bindgen(js_name = setSectionRect)]
    pub fn set_section_rect(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> bool {
        let Some(region) = Region::from_name(name) else {
            return false;
        };
        self.model.set_region(region, rect(x, y, width, height));
        true
    }

    /// Styles for the current frame.
    pub fn frame(&self) -> JsValue {
        frame_to_js(&self.model.frame())
    }

    #[wasm_bindgen(js_name = frameJson)]
    pub fn frame_json(&self) -> Result<String, JsValue> {
        self.model.frame().to_json().map_err(js_error)
    }

    /// Validate and start a submission. Returns `{ name, email, message }`
    /// for the host to send, or throws with the validation error.
    #[wasm_bindgen(js_name = submitContact)]
    pub fn submit_contact(&mut self, name: String, email: String, message: String) -> Result<JsValue, JsValue> {
        let message = self
            .model
            .begin_contact(ContactMessage::new(name, email, message))
            .map_err(js_error)?;
        let obj = Object::new();
        set_js(&obj, "name", JsValue::from_str(&message.name));
        set_js(&obj, "email", JsValue::from_str(&message.email));
        set_js(&obj, "message", JsValue::from_str(&message.message));
        Ok(obj.into())
    }

    /// Report the email service's answer. `error` is `None` on success.
    /// Returns `"delivered"`, `"compose_fallback"` or `"failed"`.
    #[wasm_bindgen(js_name = contactDeliveryResult)]
    pub fn contact_delivery_result(&mut self, error: Option<String>) -> Result<String, JsValue> {
        let result = match error {
            None => Ok(()),
            Some(reason) => Err(DeliveryError::Rejected(reason)),
        };
        self.model
            .complete_contact(result)
            .map(|outcome| outcome_label(outcome).to_string())
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.model.listener_count()
    }
}
