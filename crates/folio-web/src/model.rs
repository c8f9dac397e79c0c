#![forbid(unsafe_code)]

//! The page model: every runtime component of the portfolio page wired
//! together and driven by host input.
//!
//! # Frame protocol
//!
//! 1. Push input: [`SiteModel::scroll`], [`SiteModel::resize`],
//!    [`SiteModel::pointer_down`], [`SiteModel::key_down`], or the direct
//!    calls ([`SiteModel::navigate`], [`SiteModel::toggle`]).
//! 2. Advance time with [`SiteModel::advance`].
//! 3. Read [`SiteModel::frame`] and apply it to the document.
//!
//! Region geometry is pushed by the host with [`SiteModel::set_region`]
//! whenever layout changes; trackers read it lazily.
//!
//! # Invariants
//!
//! 1. Overlay transitions reach their choreographies before the call that
//!    caused them returns.
//! 2. Dropping the model drops every listener and pending timer it owns.
//! 3. One [`SiteModel::advance`] moves timers and the slider by the whole
//!    step but animations by at most [`MAX_FRAME_STEP`], so a long or
//!    hostile step costs one frame of motion.
//!
//! # Failure Modes
//!
//! Construction fails only on an invalid [`SiteConfig`]. After that nothing
//! fails: missing regions read as progress 0, missing anchors are handled
//! by the navigator, and delivery failures fall back to the mail client.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_core::{
    ControlPoints, Event, KeyCode, MirrorLoop, Rect, ScrollRange, TransformError, TransformValue,
    Viewport,
};
use folio_runtime::orchestrator::presets;
use folio_runtime::{
    Choreography, ComposeLauncher, ConfigError, ContactError, ContactForm, ContactMessage,
    DeliveryError, DeliveryOutcome, EventHub, FormStatus, InViewObserver, NavigationReport,
    NavigationResolver, Navigator, Overlay, OverlayState, ProgressSpring, RegionSource,
    ScrollPlatform, ScrollProgressTracker, SiteConfig, Timers,
};
use thiserror::Error;

use crate::clock::MAX_FRAME_STEP;
use crate::frame::{FrameOutput, PoseStyle, sidebar_clip_path, status_label};

/// The model could not be built from its configuration.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid motion layer: {0}")]
    Transform(#[from] TransformError),
}

/// A page region whose geometry drives a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    /// The parallax banner.
    Parallax,
    /// The whole portfolio section, for the progress bar.
    Portfolio,
    /// One gallery item, by index.
    GalleryItem(usize),
    /// The contact section.
    Contact,
}

impl Region {
    /// Parse a host region name: `parallax`, `portfolio`, `contact` or
    /// `gallery-<index>`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "parallax" => Some(Self::Parallax),
            "portfolio" => Some(Self::Portfolio),
            "contact" => Some(Self::Contact),
            other => other
                .strip_prefix("gallery-")?
                .parse()
                .ok()
                .map(Self::GalleryItem),
        }
    }
}

/// Which overlay a host call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Dropdown,
    Sidebar,
}

/// Child counts of the page's animated groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub hero_lines: usize,
    pub dropdown_items: usize,
    pub sidebar_links: usize,
    pub gallery_items: usize,
    pub contact_blocks: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            hero_lines: 3,
            dropdown_items: 3,
            sidebar_links: 3,
            gallery_items: 4,
            contact_blocks: 5,
        }
    }
}

type Regions = Rc<RefCell<BTreeMap<Region, Rect>>>;

fn region_source(regions: &Regions, region: Region) -> RegionSource {
    let regions = Rc::clone(regions);
    Rc::new(move || regions.borrow().get(&region).copied())
}

fn styles(choreography: &Choreography) -> Vec<PoseStyle> {
    choreography
        .poses()
        .into_iter()
        .map(PoseStyle::from)
        .collect()
}

// ---------------------------------------------------------------------------
// SiteModel
// ---------------------------------------------------------------------------

/// The whole page, generic over the document it scrolls.
pub struct SiteModel<P> {
    hub: EventHub,
    timers: Timers,
    regions: Regions,
    dropdown: Overlay,
    sidebar: Overlay,
    navigator: Navigator<P>,
    parallax: ScrollProgressTracker,
    text_y: ControlPoints,
    planets_y: ControlPoints,
    stars_x: ControlPoints,
    gallery: Vec<ScrollProgressTracker>,
    gallery_image_y: ControlPoints,
    gallery_progress: ScrollProgressTracker,
    progress_spring: ProgressSpring,
    contact_view: InViewObserver,
    contact: ContactForm,
    hero_text: Choreography,
    dropdown_items: Choreography,
    sidebar_panel: Choreography,
    sidebar_links: Choreography,
    contact_entrance: Choreography,
    slider: MirrorLoop,
    elapsed: Duration,
}

impl<P> fmt::Debug for SiteModel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteModel")
            .field("dropdown", &self.dropdown.state())
            .field("sidebar", &self.sidebar.state())
            .field("regions", &self.regions.borrow().len())
            .field("listeners", &self.hub.listener_count())
            .field("pending_timers", &self.timers.pending_count())
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

impl<P: ScrollPlatform + 'static> SiteModel<P> {
    /// Build and mount the page. The hero text starts its entrance
    /// immediately.
    pub fn new(
        config: SiteConfig,
        platform: Rc<P>,
        composer: Rc<dyn ComposeLauncher>,
        viewport: Viewport,
        layout: PageLayout,
    ) -> Result<Self, SiteError> {
        let config = config.validated()?;
        let hub = EventHub::new();
        let timers = Timers::new();
        let regions: Regions = Rc::default();

        let dropdown = Overlay::mount(&hub, "dropdown");
        let sidebar = Overlay::mount(&hub, "sidebar");

        let nav = &config.navigation;
        let resolver = NavigationResolver::new(platform, nav.registry())
            .with_header_clearance(nav.header_clearance)
            .with_home_section(nav.home_section.clone());
        let navigator = Navigator::new(resolver, &timers).with_settle_delay(nav.settle_delay());
        navigator.register_overlay(dropdown.handle());
        navigator.register_overlay(sidebar.handle());

        let track = |region: Region, range: ScrollRange| {
            ScrollProgressTracker::mount(&hub, viewport, range, region_source(&regions, region))
        };
        let parallax = track(Region::Parallax, ScrollRange::leaving_top());
        let gallery = (0..layout.gallery_items)
            .map(|i| track(Region::GalleryItem(i), ScrollRange::default()))
            .collect();
        let gallery_progress = track(Region::Portfolio, ScrollRange::gallery());
        let contact_view = InViewObserver::mount(
            &hub,
            viewport,
            config.contact.in_view_margin,
            region_source(&regions, Region::Contact),
        );

        let motion = &config.motion;
        let slider = MirrorLoop::new(
            TransformValue::percent(0.0),
            TransformValue::percent(motion.slider_to_percent),
            motion.slider_half_period(),
        );

        let mut hero_text = presets::hero_text(layout.hero_lines);
        hero_text.mount();

        tracing::debug!(
            target: "folio.motion",
            gallery_items = layout.gallery_items,
            listeners = hub.listener_count(),
            "site model mounted"
        );

        Ok(Self {
            text_y: motion.parallax_text_y.control_points()?,
            planets_y: motion.parallax_planets_y.control_points()?,
            stars_x: motion.parallax_stars_x.control_points()?,
            gallery_image_y: motion.gallery_image_y.control_points()?,
            progress_spring: ProgressSpring::new(motion.progress_spring()),
            contact: ContactForm::new(&config.contact, &timers, composer),
            dropdown_items: presets::dropdown_items(layout.dropdown_items),
            sidebar_panel: presets::sidebar_panel(),
            sidebar_links: presets::sidebar_links(layout.sidebar_links),
            contact_entrance: presets::contact_entrance(layout.contact_blocks),
            hub,
            timers,
            regions,
            dropdown,
            sidebar,
            navigator,
            parallax,
            gallery,
            gallery_progress,
            contact_view,
            hero_text,
            slider,
            elapsed: Duration::ZERO,
        })
    }

    // --- input ---------------------------------------------------------------

    /// Dispatch a host event to every listener. Returns how many listeners
    /// received it.
    pub fn handle_event(&mut self, event: &Event) -> usize {
        let delivered = self.hub.dispatch(event);
        self.sync();
        delivered
    }

    pub fn scroll(&mut self, y: f64) {
        self.handle_event(&Event::Scroll { y });
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.handle_event(&Event::Resize { width, height });
    }

    /// Primary pointer-down at client `(x, y)`.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.handle_event(&Event::pointer_down(x, y));
    }

    pub fn key_down(&mut self, code: KeyCode) {
        self.handle_event(&Event::key(code));
    }

    /// Record (or clear) the document-space bounds of `region` and
    /// recompute every observer.
    pub fn set_region(&mut self, region: Region, rect: Option<Rect>) {
        {
            let mut regions = self.regions.borrow_mut();
            match rect {
                Some(rect) => regions.insert(region, rect),
                None => regions.remove(&region),
            };
        }
        self.parallax.refresh();
        for tracker in &self.gallery {
            tracker.refresh();
        }
        self.gallery_progress.refresh();
        self.contact_view.refresh();
        self.sync();
    }

    /// Client-space bounds of an overlay's root, for outside-click tests.
    pub fn set_overlay_bounds(&self, kind: OverlayKind, bounds: Option<Rect>) {
        self.overlay(kind).set_bounds(bounds);
    }

    /// Press an overlay's toggle button.
    pub fn toggle(&mut self, kind: OverlayKind) -> bool {
        let changed = self.overlay(kind).toggle();
        self.sync();
        changed
    }

    /// A menu item or sidebar link chose `logical_id`. Closes the overlays
    /// now and scrolls after the settle delay.
    pub fn navigate(&mut self, logical_id: &str) {
        self.navigator.request(logical_id);
        self.sync();
    }

    /// Move time forward: fire due timers, then step every animation by at
    /// most [`MAX_FRAME_STEP`].
    pub fn advance(&mut self, dt: Duration) {
        self.timers.advance(dt);
        self.elapsed = self.elapsed.saturating_add(dt);
        self.sync();
        let motion_dt = dt.min(MAX_FRAME_STEP);
        for choreography in [
            &mut self.hero_text,
            &mut self.dropdown_items,
            &mut self.sidebar_panel,
            &mut self.sidebar_links,
            &mut self.contact_entrance,
        ] {
            choreography.tick(motion_dt);
        }
        self.progress_spring
            .follow(self.gallery_progress.progress(), motion_dt);
    }

    // --- contact -------------------------------------------------------------

    /// Validate and start a submission. The host delivers the returned
    /// message and reports back through [`SiteModel::complete_contact`].
    pub fn begin_contact(&mut self, message: ContactMessage) -> Result<ContactMessage, ContactError> {
        self.contact.begin_submit(message).cloned()
    }

    /// Apply the host's delivery result.
    pub fn complete_contact(
        &mut self,
        result: Result<(), DeliveryError>,
    ) -> Result<DeliveryOutcome, ContactError> {
        self.contact.complete(result)
    }

    // --- queries -------------------------------------------------------------

    #[must_use]
    pub fn overlay_state(&self, kind: OverlayKind) -> OverlayState {
        self.overlay(kind).state()
    }

    #[must_use]
    pub fn contact_status(&self) -> FormStatus {
        self.contact.status()
    }

    /// Reports of navigations that ran since the last call.
    pub fn take_navigation_reports(&self) -> Vec<NavigationReport> {
        self.navigator.take_reports()
    }

    #[must_use]
    pub fn is_navigation_pending(&self) -> bool {
        self.navigator.is_pending()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.hub.listener_count()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Styles for the current frame.
    #[must_use]
    pub fn frame(&self) -> FrameOutput {
        let parallax = self.parallax.progress();
        let panel_scale = self.sidebar_panel.pose(0).map_or(0.0, |pose| pose.scale);
        FrameOutput {
            slider_x: self.slider.sample(self.elapsed).to_string(),
            parallax_text_y: self.text_y.map(parallax).to_string(),
            parallax_planets_y: self.planets_y.map(parallax).to_string(),
            parallax_stars_x: self.stars_x.map(parallax).to_string(),
            gallery_images_y: self
                .gallery
                .iter()
                .map(|tracker| self.gallery_image_y.map(tracker.progress()).to_string())
                .collect(),
            gallery_progress: self.progress_spring.value(),
            dropdown_open: self.dropdown.is_open(),
            sidebar_open: self.sidebar.is_open(),
            hero_text: styles(&self.hero_text),
            dropdown_items: styles(&self.dropdown_items),
            sidebar_clip: sidebar_clip_path(panel_scale),
            sidebar_links: styles(&self.sidebar_links),
            contact_blocks: styles(&self.contact_entrance),
            contact_status: status_label(self.contact.status()),
        }
    }

    fn overlay(&self, kind: OverlayKind) -> &Overlay {
        match kind {
            OverlayKind::Dropdown => &self.dropdown,
            OverlayKind::Sidebar => &self.sidebar,
        }
    }

    /// Forward overlay transitions and visibility to the choreographies.
    fn sync(&mut self) {
        for transition in self.dropdown.take_transitions() {
            self.dropdown_items.apply(&transition);
        }
        for transition in self.sidebar.take_transitions() {
            self.sidebar_panel.apply(&transition);
            self.sidebar_links.apply(&transition);
        }
        self.contact_entrance
            .observe_visibility(self.contact_view.is_in_view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use folio_runtime::{PlatformError, ScrollBehavior, ScrollBlock};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Document {
        scroll_y: Cell<f64>,
        scrolled_to: RefCell<Vec<String>>,
        opened: RefCell<Vec<String>>,
    }

    impl ScrollPlatform for Document {
        type Element = String;

        fn query(&self, selector: &str) -> Option<String> {
            ["#Homepage", "#portfolio-content", "#Contact"]
                .contains(&selector)
                .then(|| selector.to_string())
        }

        fn scroll_into_view(
            &self,
            element: &String,
            _behavior: ScrollBehavior,
            _block: ScrollBlock,
        ) -> Result<(), PlatformError> {
            self.scrolled_to.borrow_mut().push(element.clone());
            Ok(())
        }

        fn bounding_top(&self, _element: &String) -> Result<f64, PlatformError> {
            Ok(0.0)
        }

        fn scroll_y(&self) -> f64 {
            self.scroll_y.get()
        }

        fn scroll_to(&self, _top: f64, _behavior: ScrollBehavior) -> Result<(), PlatformError> {
            Ok(())
        }
    }

    impl ComposeLauncher for Document {
        fn open(&self, url: &str) -> Result<(), PlatformError> {
            self.opened.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    fn model() -> (SiteModel<Document>, Rc<Document>) {
        let doc = Rc::new(Document::default());
        let model = SiteModel::new(
            SiteConfig::default(),
            Rc::clone(&doc),
            Rc::clone(&doc) as Rc<dyn ComposeLauncher>,
            Viewport::new(0.0, 1200.0, 800.0),
            PageLayout::default(),
        )
        .unwrap();
        (model, doc)
    }

    fn run(model: &mut SiteModel<Document>, total: Duration) {
        let step = Duration::from_millis(16);
        let mut t = Duration::ZERO;
        while t < total {
            model.advance(step);
            t += step;
        }
    }

    #[test]
    fn region_names_parse() {
        assert_eq!(Region::from_name("parallax"), Some(Region::Parallax));
        assert_eq!(Region::from_name("gallery-2"), Some(Region::GalleryItem(2)));
        assert_eq!(Region::from_name("gallery-x"), None);
        assert_eq!(Region::from_name("footer"), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SiteConfig::default();
        config.navigation.header_clearance = f64::NAN;
        let doc = Rc::new(Document::default());
        let err = SiteModel::new(
            config,
            Rc::clone(&doc),
            doc,
            Viewport::default(),
            PageLayout::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SiteError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn parallax_layers_follow_scroll() {
        let (mut model, _) = model();
        model.set_region(Region::Parallax, Some(Rect::new(0.0, 1000.0, 1200.0, 800.0)));
        model.scroll(1400.0);
        let frame = model.frame();
        assert_eq!(frame.parallax_text_y, "250%");
        assert_eq!(frame.parallax_planets_y, "50%");
        assert_eq!(frame.parallax_stars_x, "50%");
    }

    #[test]
    fn gallery_images_without_geometry_rest_at_start() {
        let (mut model, _) = model();
        model.set_region(Region::GalleryItem(1), Some(Rect::new(0.0, 3000.0, 1200.0, 800.0)));
        model.scroll(2600.0);
        let frame = model.frame();
        assert_eq!(frame.gallery_images_y, vec!["-200px", "50px", "-200px", "-200px"]);
    }

    #[test]
    fn gallery_progress_springs_toward_scroll() {
        let (mut model, _) = model();
        model.set_region(Region::Portfolio, Some(Rect::new(0.0, 2000.0, 1200.0, 4000.0)));
        model.scroll(3600.0);
        assert_eq!(model.frame().gallery_progress, 0.0);
        run(&mut model, Duration::from_secs(4));
        assert!((model.frame().gallery_progress - 0.5).abs() < 0.01);
    }

    #[test]
    fn hero_text_enters_on_mount() {
        let (mut model, _) = model();
        assert!(model.frame().hero_text.iter().all(|s| s.opacity == 0.0));
        run(&mut model, Duration::from_millis(1500));
        assert!(model.frame().hero_text.iter().all(|s| s.opacity == 1.0 && s.x == 0.0));
    }

    #[test]
    fn slider_mirrors() {
        let (mut model, _) = model();
        assert_eq!(model.frame().slider_x, "0%");
        model.advance(Duration::from_secs(20));
        assert_eq!(model.frame().slider_x, "-220%");
        model.advance(Duration::from_secs(20));
        assert_eq!(model.frame().slider_x, "0%");
    }

    #[test]
    fn dropdown_items_follow_overlay() {
        let (mut model, _) = model();
        model.set_overlay_bounds(OverlayKind::Dropdown, Some(Rect::new(900.0, 0.0, 200.0, 300.0)));
        assert!(model.toggle(OverlayKind::Dropdown));
        run(&mut model, Duration::from_secs(1));
        assert!(model.frame().dropdown_open);
        assert!(model.frame().dropdown_items.iter().all(|s| s.opacity == 1.0));

        model.pointer_down(10.0, 700.0);
        assert!(!model.frame().dropdown_open);
        run(&mut model, Duration::from_secs(1));
        assert!(model.frame().dropdown_items.iter().all(|s| s.opacity == 0.0));
        assert!(model.take_navigation_reports().is_empty());
    }

    #[test]
    fn sidebar_clip_stays_between_radii_while_animating() {
        let (mut model, _) = model();
        let radius = |m: &SiteModel<Document>| -> f64 {
            let clip = m.frame().sidebar_clip;
            clip["circle(".len()..clip.find("px").unwrap_or(0)]
                .parse()
                .unwrap()
        };
        let mut seen = Vec::new();
        for open in [true, false] {
            model.set_overlay_bounds(OverlayKind::Sidebar, Some(Rect::new(0.0, 0.0, 400.0, 800.0)));
            model.toggle(OverlayKind::Sidebar);
            assert_eq!(model.overlay_state(OverlayKind::Sidebar).is_open(), open);
            for _ in 0..250 {
                model.advance(Duration::from_millis(16));
                seen.push(radius(&model));
            }
        }
        assert!(seen.iter().all(|r| (30.0..=1500.0).contains(r)), "{seen:?}");
        assert!(seen.contains(&1500.0));
        assert_eq!(seen.last(), Some(&30.0));
    }

    #[test]
    fn sidebar_link_closes_sidebar_then_scrolls() {
        let (mut model, doc) = model();
        model.toggle(OverlayKind::Sidebar);
        run(&mut model, Duration::from_secs(2));
        assert_ne!(model.frame().sidebar_clip, sidebar_clip_path(0.0));

        model.navigate("Portfolio");
        assert_eq!(model.overlay_state(OverlayKind::Sidebar), OverlayState::Closed);
        assert!(model.is_navigation_pending());
        assert!(doc.scrolled_to.borrow().is_empty());

        model.advance(Duration::from_millis(100));
        assert_eq!(*doc.scrolled_to.borrow(), vec!["#portfolio-content".to_string()]);
        assert_eq!(model.take_navigation_reports().len(), 1);

        run(&mut model, Duration::from_secs(3));
        assert_eq!(model.frame().sidebar_clip, sidebar_clip_path(0.0));
    }

    #[test]
    fn escape_closes_open_overlays() {
        let (mut model, _) = model();
        model.toggle(OverlayKind::Dropdown);
        model.toggle(OverlayKind::Sidebar);
        model.key_down(KeyCode::Escape);
        assert_eq!(model.overlay_state(OverlayKind::Dropdown), OverlayState::Closed);
        assert_eq!(model.overlay_state(OverlayKind::Sidebar), OverlayState::Closed);
    }

    #[test]
    fn contact_blocks_enter_once_in_view() {
        let (mut model, _) = model();
        model.set_region(Region::Contact, Some(Rect::new(0.0, 6000.0, 1200.0, 800.0)));
        model.scroll(5200.0);
        run(&mut model, Duration::from_secs(1));
        assert!(model.frame().contact_blocks.iter().all(|s| s.y == 400.0));

        model.scroll(5600.0);
        run(&mut model, Duration::from_secs(2));
        assert!(model.frame().contact_blocks.iter().all(|s| s.y == 0.0));

        model.scroll(0.0);
        run(&mut model, Duration::from_secs(1));
        assert!(model.frame().contact_blocks.iter().all(|s| s.y == 0.0));
    }

    #[test]
    fn contact_fallback_opens_mail_client_then_clears() {
        let (mut model, doc) = model();
        let message = ContactMessage::new("Ada", "ada@example.com", "Hello");
        model.begin_contact(message).unwrap();
        assert_eq!(model.contact_status(), FormStatus::Sending);

        let outcome = model
            .complete_contact(Err(DeliveryError::Unreachable("offline".into())))
            .unwrap();
        assert_eq!(outcome, DeliveryOutcome::ComposeFallback);
        assert_eq!(model.frame().contact_status, "compose_opened");
        assert!(doc.opened.borrow()[0].starts_with("mailto:mark@mayouftech.com"));

        model.advance(Duration::from_secs(2));
        assert_eq!(model.frame().contact_status, "idle");
    }

    #[test]
    fn huge_step_fires_timers_but_moves_animations_one_frame() {
        let doc = Rc::new(Document::default());
        let mut config = SiteConfig::default();
        config.motion.progress_spring_damping = 0.0;
        let mut model = SiteModel::new(
            config,
            Rc::clone(&doc),
            Rc::clone(&doc) as Rc<dyn ComposeLauncher>,
            Viewport::new(0.0, 1200.0, 800.0),
            PageLayout::default(),
        )
        .unwrap();
        model.set_region(Region::Portfolio, Some(Rect::new(0.0, 2000.0, 1200.0, 4000.0)));
        model.scroll(3600.0);
        model.navigate("Contact");

        // An undamped spring never rests; an uncapped step would integrate
        // this in 4ms substeps forever.
        model.advance(Duration::from_secs(1_000_000_000_000));

        assert_eq!(*doc.scrolled_to.borrow(), vec!["#Contact".to_string()]);
        assert!(!model.is_navigation_pending());
        let frame = model.frame();
        assert!(frame.gallery_progress > 0.0 && frame.gallery_progress < 0.5);
        assert!(frame.hero_text[0].opacity > 0.0 && frame.hero_text[0].opacity < 0.1);
        assert_eq!(frame.hero_text[1].opacity, 0.0);
    }

    #[test]
    fn dropping_model_releases_everything() {
        let (model, doc) = model();
        assert!(model.listener_count() > 0);
        drop(model);
        assert_eq!(Rc::strong_count(&doc), 1);
    }

    #[test]
    fn frame_serializes_to_json() {
        let (model, _) = model();
        let json = model.frame().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["contact_status"], "idle");
        assert_eq!(value["gallery_images_y"].as_array().map(Vec::len), Some(4));
    }
}
