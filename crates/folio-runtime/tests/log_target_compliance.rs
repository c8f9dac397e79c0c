#![forbid(unsafe_code)]

//! Log target and level compliance.
//!
//! Recoverable failures (a scroll strategy falling through, a delivery
//! falling back to the mail client) log at WARN; unrecoverable ones log at
//! ERROR; routine state changes stay at DEBUG or below. Every record is
//! emitted under a `folio.*` target.
//!
//! Run:
//!   cargo test -p folio-runtime --test log_target_compliance

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::{Event, Rect};
use folio_runtime::{
    ComposeLauncher, ContactConfig, ContactForm, ContactMessage, DeliveryError, EmailTransport,
    EventHub, NavigationResolver, Navigator, Overlay, PlatformError, ScrollBehavior, ScrollBlock,
    ScrollPlatform, SectionRegistry, Timers,
};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    target: String,
    fields: HashMap<String, String>,
    message: String,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields,
            message,
        });
    }
}

fn with_captured_events<F>(f: F) -> Vec<CapturedEvent>
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn at_level(events: &[CapturedEvent], level: Level) -> Vec<&CapturedEvent> {
    events.iter().filter(|e| e.level == level).collect()
}

/// A page where every scroll call fails.
struct BrokenPage;

impl ScrollPlatform for BrokenPage {
    type Element = ();

    fn query(&self, _selector: &str) -> Option<()> {
        Some(())
    }

    fn scroll_into_view(
        &self,
        _element: &(),
        _behavior: ScrollBehavior,
        _block: ScrollBlock,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported {
            operation: "scrollIntoView",
        })
    }

    fn bounding_top(&self, _element: &()) -> Result<f64, PlatformError> {
        Ok(500.0)
    }

    fn scroll_y(&self) -> f64 {
        0.0
    }

    fn scroll_to(&self, _top: f64, _behavior: ScrollBehavior) -> Result<(), PlatformError> {
        Err(PlatformError::failed("scrollTo", "detached window"))
    }
}

struct DownTransport;

impl EmailTransport for DownTransport {
    fn deliver(&self, _message: &ContactMessage) -> Result<(), DeliveryError> {
        Err(DeliveryError::Unreachable("connection reset".into()))
    }
}

struct Launcher(bool);

impl ComposeLauncher for Launcher {
    fn open(&self, _url: &str) -> Result<(), PlatformError> {
        if self.0 {
            Ok(())
        } else {
            Err(PlatformError::Unsupported {
                operation: "window.location",
            })
        }
    }
}

fn message() -> ContactMessage {
    ContactMessage::new("Ada", "ada@example.com", "Hello there")
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn strategy_failures_warn_then_exhaustion_errors() {
    let events = with_captured_events(|| {
        let resolver = NavigationResolver::new(Rc::new(BrokenPage), SectionRegistry::default());
        let report = resolver.navigate("Contact");
        assert!(!report.scrolled());
    });

    let warns = at_level(&events, Level::WARN);
    assert_eq!(warns.len(), 3, "one warning per strategy: {warns:?}");
    for (i, warn) in warns.iter().enumerate() {
        assert_eq!(warn.target, "folio.nav");
        assert_eq!(warn.fields.get("strategy"), Some(&(i + 1).to_string()));
        assert_eq!(warn.fields.get("selector").map(String::as_str), Some("#Contact"));
        assert!(warn.fields.contains_key("error"));
    }

    let errors = at_level(&events, Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].target, "folio.nav");
    assert_eq!(errors[0].message, "all scroll strategies failed");
}

#[test]
fn deferred_navigation_logs_timer_activity() {
    let events = with_captured_events(|| {
        let timers = Timers::new();
        let navigator = Navigator::new(
            NavigationResolver::new(Rc::new(BrokenPage), SectionRegistry::default()),
            &timers,
        );
        navigator.request("Homepage");
        navigator.request("Homepage");
        timers.advance(Duration::from_millis(100));
    });

    assert!(
        events
            .iter()
            .any(|e| e.target == "folio.timer" && e.message == "pending timer superseded")
    );
    let fired: Vec<_> = events
        .iter()
        .filter(|e| e.target == "folio.timer" && e.message == "timer fired")
        .collect();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].fields.get("timer").map(String::as_str), Some("navigate"));
}

// ============================================================================
// Overlays
// ============================================================================

#[test]
fn overlay_transitions_log_at_debug() {
    let events = with_captured_events(|| {
        let hub = EventHub::new();
        let overlay = Overlay::mount(&hub, "dropdown");
        overlay.set_bounds(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
        overlay.toggle();
        hub.dispatch(&Event::pointer_down(500.0, 500.0));
    });

    let transitions: Vec<_> = events
        .iter()
        .filter(|e| e.target == "folio.overlay" && e.message == "overlay transition")
        .collect();
    assert_eq!(transitions.len(), 2);
    assert!(transitions.iter().all(|e| e.level == Level::DEBUG));
    assert_eq!(
        transitions[1].fields.get("cause").map(String::as_str),
        Some("OutsideInteraction")
    );
    assert_eq!(
        transitions[1].fields.get("overlay").map(String::as_str),
        Some("dropdown")
    );
}

// ============================================================================
// Contact
// ============================================================================

#[test]
fn delivery_fallback_warns() {
    let events = with_captured_events(|| {
        let timers = Timers::new();
        let mut form = ContactForm::new(&ContactConfig::default(), &timers, Rc::new(Launcher(true)));
        form.submit(message(), &DownTransport).unwrap();
    });

    let warns = at_level(&events, Level::WARN);
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].target, "folio.contact");
    assert!(at_level(&events, Level::ERROR).is_empty());
}

#[test]
fn failed_fallback_errors() {
    let events = with_captured_events(|| {
        let timers = Timers::new();
        let mut form =
            ContactForm::new(&ContactConfig::default(), &timers, Rc::new(Launcher(false)));
        form.submit(message(), &DownTransport).unwrap();
    });

    let errors = at_level(&events, Level::ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].target, "folio.contact");
}

#[test]
fn every_record_uses_a_folio_target() {
    let events = with_captured_events(|| {
        let hub = EventHub::new();
        let timers = Timers::new();
        let overlay = Overlay::mount(&hub, "sidebar");
        let navigator = Navigator::new(
            NavigationResolver::new(Rc::new(BrokenPage), SectionRegistry::default()),
            &timers,
        );
        navigator.register_overlay(overlay.handle());
        overlay.toggle();
        navigator.request("Portfolio");
        timers.advance(Duration::from_secs(1));
    });

    assert!(!events.is_empty());
    for event in &events {
        assert!(
            event.target.starts_with("folio."),
            "unexpected target {:?} for {:?}",
            event.target,
            event.message
        );
    }
}
