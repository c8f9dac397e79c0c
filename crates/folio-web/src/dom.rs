#![forbid(unsafe_code)]

//! `web-sys` implementation of the scroll and mail-compose capabilities.
//!
//! Scroll calls are made through `Function.prototype.call` on the looked-up
//! method, so a browser that lacks the method or throws from it surfaces as
//! a [`PlatformError`] and the navigator moves on to its next strategy.

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Window};

use folio_core::Viewport;
use folio_runtime::{ComposeLauncher, PlatformError, ScrollBehavior, ScrollBlock, ScrollPlatform};

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Call `target[operation](arg)`, mapping absence and exceptions to errors.
fn call_method(target: &JsValue, operation: &'static str, arg: &JsValue) -> Result<(), PlatformError> {
    let method = Reflect::get(target, &JsValue::from_str(operation))
        .map_err(|e| PlatformError::failed(operation, describe(&e)))?;
    let Some(method) = method.dyn_ref::<Function>() else {
        return Err(PlatformError::Unsupported { operation });
    };
    method
        .call1(target, arg)
        .map(drop)
        .map_err(|e| PlatformError::failed(operation, describe(&e)))
}

const fn behavior_name(behavior: ScrollBehavior) -> &'static str {
    match behavior {
        ScrollBehavior::Smooth => "smooth",
        ScrollBehavior::Instant => "instant",
    }
}

const fn block_name(block: ScrollBlock) -> &'static str {
    match block {
        ScrollBlock::Start => "start",
        ScrollBlock::Center => "center",
        ScrollBlock::End => "end",
        ScrollBlock::Nearest => "nearest",
    }
}

/// The live browser document.
#[derive(Debug, Clone)]
pub struct DomPlatform {
    window: Window,
    document: Document,
}

impl DomPlatform {
    /// The global window and its document, if running in a page.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Current scroll offset and inner size. Unreadable values read as 0.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            self.scroll_y(),
            read(self.window.inner_width()),
            read(self.window.inner_height()),
        )
    }
}

impl ScrollPlatform for DomPlatform {
    type Element = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        // An invalid selector throws; it matches nothing.
        self.document.query_selector(selector).ok().flatten()
    }

    fn scroll_into_view(
        &self,
        element: &Element,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<(), PlatformError> {
        let options = Object::new();
        set_js(&options, "behavior", JsValue::from_str(behavior_name(behavior)));
        set_js(&options, "block", JsValue::from_str(block_name(block)));
        call_method(element.as_ref(), "scrollIntoView", &options.into())
    }

    fn bounding_top(&self, element: &Element) -> Result<f64, PlatformError> {
        let top = element.get_bounding_client_rect().top();
        if top.is_finite() {
            Ok(top)
        } else {
            Err(PlatformError::failed("getBoundingClientRect", "non-finite top"))
        }
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) -> Result<(), PlatformError> {
        let options = Object::new();
        set_js(&options, "top", JsValue::from_f64(top));
        set_js(&options, "behavior", JsValue::from_str(behavior_name(behavior)));
        call_method(self.window.as_ref(), "scrollTo", &options.into())
    }
}

impl ComposeLauncher for DomPlatform {
    fn open(&self, url: &str) -> Result<(), PlatformError> {
        self.window
            .location()
            .set_href(url)
            .map_err(|e| PlatformError::failed("location.href", describe(&e)))
    }
}
