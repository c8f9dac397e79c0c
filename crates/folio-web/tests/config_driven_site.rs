#![forbid(unsafe_code)]

//! A site built from a TOML config: tunables flow through to navigation,
//! contact and motion.
//!
//! Run:
//!   cargo test -p folio-web --test config_driven_site

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use folio_core::Viewport;
use folio_runtime::{
    ComposeLauncher, ContactMessage, DeliveryError, NavigationOutcome, PlatformError,
    ScrollBehavior, ScrollBlock, ScrollPlatform, ScrollStrategy, SiteConfig,
};
use folio_web::{OverlayKind, PageLayout, SiteModel};
use pretty_assertions::assert_eq;

const CONFIG: &str = r#"
[navigation]
header_clearance = 64.0
settle_delay_ms = 250
home_section = "Top"
sections = ["Top", "Work", "Say-Hello"]

[navigation.anchor_overrides]
Work = "work-grid"

[motion]
slider_to_percent = -100.0
slider_half_period_ms = 1000

[contact]
recipient = "hello@example.org"
dismiss_after_ms = 500
"#;

/// Anchors at fixed document offsets; `scrollIntoView` is unavailable.
#[derive(Default)]
struct LegacyBrowser {
    scroll_y: Cell<f64>,
    scrolls: RefCell<Vec<(f64, ScrollBehavior)>>,
    opened: RefCell<Vec<String>>,
}

impl ScrollPlatform for LegacyBrowser {
    type Element = f64;

    fn query(&self, selector: &str) -> Option<f64> {
        match selector {
            "#work-grid" => Some(1500.0),
            "#Say-Hello" => Some(4000.0),
            _ => None,
        }
    }

    fn scroll_into_view(
        &self,
        _element: &f64,
        _behavior: ScrollBehavior,
        _block: ScrollBlock,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported {
            operation: "scrollIntoView",
        })
    }

    fn bounding_top(&self, element: &f64) -> Result<f64, PlatformError> {
        Ok(element - self.scroll_y.get())
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) -> Result<(), PlatformError> {
        self.scrolls.borrow_mut().push((top, behavior));
        Ok(())
    }
}

impl ComposeLauncher for LegacyBrowser {
    fn open(&self, url: &str) -> Result<(), PlatformError> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

fn site() -> (SiteModel<LegacyBrowser>, Rc<LegacyBrowser>) {
    let config = SiteConfig::from_toml_str(CONFIG).unwrap();
    let browser = Rc::new(LegacyBrowser::default());
    let site = SiteModel::new(
        config,
        Rc::clone(&browser),
        Rc::clone(&browser) as Rc<dyn ComposeLauncher>,
        Viewport::new(0.0, 1280.0, 720.0),
        PageLayout::default(),
    )
    .unwrap();
    (site, browser)
}

#[test]
fn overridden_anchor_and_clearance_are_used() {
    let (mut site, browser) = site();
    browser.scroll_y.set(200.0);
    site.navigate("Work");

    site.advance(Duration::from_millis(249));
    assert!(browser.scrolls.borrow().is_empty());
    site.advance(Duration::from_millis(1));

    assert_eq!(*browser.scrolls.borrow(), vec![(1436.0, ScrollBehavior::Smooth)]);
    let reports = site.take_navigation_reports();
    assert_eq!(reports[0].target.selector(), "#work-grid");
    assert_eq!(
        reports[0].outcome,
        NavigationOutcome::Scrolled(ScrollStrategy::SmoothOffset)
    );
}

#[test]
fn configured_home_falls_back_to_top() {
    let (mut site, browser) = site();
    site.navigate("Top");
    site.advance(Duration::from_millis(250));
    assert_eq!(*browser.scrolls.borrow(), vec![(0.0, ScrollBehavior::Smooth)]);
}

#[test]
fn navigation_closes_dropdown_first() {
    let (mut site, browser) = site();
    site.toggle(OverlayKind::Dropdown);
    site.navigate("Say-Hello");
    assert!(!site.frame().dropdown_open);
    assert!(browser.scrolls.borrow().is_empty());
    site.advance(Duration::from_millis(250));
    assert_eq!(browser.scrolls.borrow().len(), 1);
}

#[test]
fn contact_uses_configured_recipient_and_dismissal() {
    let (mut site, browser) = site();
    site.begin_contact(ContactMessage::new("Lin", "lin@example.com", "Hi"))
        .unwrap();
    site.complete_contact(Err(DeliveryError::Rejected("quota".into())))
        .unwrap();
    assert!(browser.opened.borrow()[0].starts_with("mailto:hello@example.org?"));

    site.advance(Duration::from_millis(499));
    assert_eq!(site.frame().contact_status, "compose_opened");
    site.advance(Duration::from_millis(1));
    assert_eq!(site.frame().contact_status, "idle");
}

#[test]
fn slider_uses_configured_loop() {
    let (mut site, _) = site();
    site.advance(Duration::from_millis(1000));
    assert_eq!(site.frame().slider_x, "-100%");
    site.advance(Duration::from_millis(500));
    assert_eq!(site.frame().slider_x, "-50%");
}

#[test]
fn invalid_toml_config_is_an_error() {
    let err = SiteConfig::from_toml_str("[navigation]\nsections = []\n")
        .and_then(SiteConfig::validated)
        .unwrap_err();
    assert!(err.to_string().contains("sections"));
}
