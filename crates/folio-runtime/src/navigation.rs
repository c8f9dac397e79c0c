#![forbid(unsafe_code)]

//! Section navigation: logical section ids to smooth scrolls.
//!
//! A request goes through two stages.
//!
//! 1. [`Navigator::request`] closes every registered overlay, then defers
//!    the scroll by a settle delay on a [`DeferredSlot`], so the overlay
//!    exit does not fight the scroll. A newer request supersedes a pending
//!    one.
//! 2. [`NavigationResolver::navigate`] resolves the id to an anchor
//!    selector (applying overrides such as `Portfolio -> portfolio-content`)
//!    and walks the [`ScrollStrategy`] chain until one succeeds.
//!
//! # Strategy chain
//!
//! | # | Strategy        | Action                                              |
//! |---|-----------------|-----------------------------------------------------|
//! | 1 | `IntoView`      | `scroll_into_view(smooth, block: start)`            |
//! | 2 | `SmoothOffset`  | `scroll_to(bounding_top + scroll_y - clearance, smooth)` |
//! | 3 | `InstantOffset` | same offset, instant jump                           |
//!
//! # Failure Modes
//!
//! - Target missing: the home section falls back to `scroll_to(0, smooth)`;
//!   any other id is abandoned with a warning.
//! - A strategy fails: logged at `warn`, the next one runs.
//! - Every strategy fails: logged at `error`; nothing propagates.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;

use crate::overlay::{OverlayEvent, OverlayHandle};
use crate::timer::{DeferredSlot, Timers};

/// Section scrolled to when its anchor is missing.
pub const HOME_SECTION: &str = "Homepage";

/// Height of the fixed header kept clear above a scrolled-to section.
pub const HEADER_CLEARANCE: f64 = 80.0;

/// Delay between closing overlays and scrolling.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// How a programmatic scroll moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Vertical alignment for `scroll_into_view`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollBlock {
    Start,
    Center,
    End,
    Nearest,
}

/// A scroll capability reported failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("{operation} is not supported by this platform")]
    Unsupported { operation: &'static str },
    #[error("{operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },
}

impl PlatformError {
    #[must_use]
    pub fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            operation,
            message: message.into(),
        }
    }
}

/// The document scroll capabilities navigation needs.
pub trait ScrollPlatform {
    /// A resolved element.
    type Element;

    /// Look up the element matching `selector`.
    fn query(&self, selector: &str) -> Option<Self::Element>;

    fn scroll_into_view(
        &self,
        element: &Self::Element,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) -> Result<(), PlatformError>;

    /// Top of the element's bounding box relative to the viewport.
    fn bounding_top(&self, element: &Self::Element) -> Result<f64, PlatformError>;

    /// Current vertical scroll offset of the document.
    fn scroll_y(&self) -> f64;

    fn scroll_to(&self, top: f64, behavior: ScrollBehavior) -> Result<(), PlatformError>;
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// A logical section and the anchor it scrolls to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub logical_id: String,
    pub anchor_override: Option<String>,
}

impl NavigationTarget {
    #[must_use]
    pub fn new(logical_id: impl Into<String>) -> Self {
        Self {
            logical_id: logical_id.into(),
            anchor_override: None,
        }
    }

    #[must_use]
    pub fn with_override(mut self, anchor: impl Into<String>) -> Self {
        self.anchor_override = Some(anchor.into());
        self
    }

    /// The element id scrolled to.
    #[must_use]
    pub fn anchor(&self) -> &str {
        self.anchor_override.as_deref().unwrap_or(&self.logical_id)
    }

    /// CSS id selector for the anchor.
    #[must_use]
    pub fn selector(&self) -> String {
        format!("#{}", self.anchor())
    }
}

/// Known sections and their anchor overrides.
///
/// Unknown ids still resolve, to an anchor equal to the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<String>,
    overrides: BTreeMap<String, String>,
}

impl SectionRegistry {
    #[must_use]
    pub fn new(sections: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            overrides: BTreeMap::new(),
        }
    }

    /// Scroll `logical_id` to `anchor` instead (builder pattern). A later
    /// override for the same id replaces the earlier one.
    #[must_use]
    pub fn with_override(mut self, logical_id: impl Into<String>, anchor: impl Into<String>) -> Self {
        self.overrides.insert(logical_id.into(), anchor.into());
        self
    }

    #[must_use]
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    #[must_use]
    pub fn contains(&self, logical_id: &str) -> bool {
        self.sections.iter().any(|s| s == logical_id)
    }

    #[must_use]
    pub fn resolve(&self, logical_id: &str) -> NavigationTarget {
        let target = NavigationTarget::new(logical_id);
        match self.overrides.get(logical_id) {
            Some(anchor) => target.with_override(anchor.clone()),
            None => target,
        }
    }
}

impl Default for SectionRegistry {
    /// The page's three sections, with the gallery scrolling to its inner
    /// content anchor.
    fn default() -> Self {
        Self::new([HOME_SECTION, "Portfolio", "Contact"]).with_override("Portfolio", "portfolio-content")
    }
}

// ---------------------------------------------------------------------------
// Strategies and reports
// ---------------------------------------------------------------------------

/// One way of scrolling to a resolved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollStrategy {
    IntoView,
    SmoothOffset,
    InstantOffset,
}

impl ScrollStrategy {
    /// The chain, in the order it is tried.
    pub const CHAIN: [Self; 3] = [Self::IntoView, Self::SmoothOffset, Self::InstantOffset];

    /// 1-based position in [`CHAIN`](Self::CHAIN).
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::IntoView => 1,
            Self::SmoothOffset => 2,
            Self::InstantOffset => 3,
        }
    }

    fn attempt<P: ScrollPlatform>(
        self,
        platform: &P,
        element: &P::Element,
        clearance: f64,
    ) -> Result<(), PlatformError> {
        match self {
            Self::IntoView => {
                platform.scroll_into_view(element, ScrollBehavior::Smooth, ScrollBlock::Start)
            }
            Self::SmoothOffset | Self::InstantOffset => {
                let top = platform.bounding_top(element)? + platform.scroll_y() - clearance;
                let behavior = if self == Self::SmoothOffset {
                    ScrollBehavior::Smooth
                } else {
                    ScrollBehavior::Instant
                };
                platform.scroll_to(top, behavior)
            }
        }
    }
}

/// Result of one strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollStrategyResult {
    pub strategy: ScrollStrategy,
    pub succeeded: bool,
    pub error: Option<PlatformError>,
}

/// Why a navigation did not scroll to its target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no element matches {selector} for section {logical_id:?}")]
    TargetNotFound { logical_id: String, selector: String },
    #[error("every scroll strategy failed for {selector}")]
    StrategiesExhausted { selector: String },
    #[error("scroll to top failed: {0}")]
    HomeFallbackFailed(PlatformError),
}

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A strategy scrolled to the target.
    Scrolled(ScrollStrategy),
    /// The home anchor was missing; scrolled to the top instead.
    HomeFallback,
    /// Nothing scrolled. Logged, never surfaced to the page.
    Abandoned(NavigationError),
}

/// Everything one navigation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationReport {
    pub target: NavigationTarget,
    pub attempts: Vec<ScrollStrategyResult>,
    pub outcome: NavigationOutcome,
}

impl NavigationReport {
    /// Whether the page ended up scrolling.
    #[must_use]
    pub fn scrolled(&self) -> bool {
        !matches!(self.outcome, NavigationOutcome::Abandoned(_))
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves section ids and runs the strategy chain on a platform.
pub struct NavigationResolver<P> {
    platform: Rc<P>,
    registry: SectionRegistry,
    header_clearance: f64,
    home_section: String,
}

impl<P> fmt::Debug for NavigationResolver<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationResolver")
            .field("registry", &self.registry)
            .field("header_clearance", &self.header_clearance)
            .field("home_section", &self.home_section)
            .finish_non_exhaustive()
    }
}

impl<P: ScrollPlatform> NavigationResolver<P> {
    #[must_use]
    pub fn new(platform: Rc<P>, registry: SectionRegistry) -> Self {
        Self {
            platform,
            registry,
            header_clearance: HEADER_CLEARANCE,
            home_section: HOME_SECTION.to_string(),
        }
    }

    #[must_use]
    pub fn with_header_clearance(mut self, clearance: f64) -> Self {
        self.header_clearance = clearance;
        self
    }

    #[must_use]
    pub fn with_home_section(mut self, id: impl Into<String>) -> Self {
        self.home_section = id.into();
        self
    }

    #[must_use]
    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn platform(&self) -> &Rc<P> {
        &self.platform
    }

    /// Scroll to `logical_id` now. Never fails; see the report.
    pub fn navigate(&self, logical_id: &str) -> NavigationReport {
        let target = self.registry.resolve(logical_id);
        let selector = target.selector();

        let Some(element) = self.platform.query(&selector) else {
            return self.target_missing(target, selector);
        };

        let mut attempts = Vec::with_capacity(ScrollStrategy::CHAIN.len());
        for strategy in ScrollStrategy::CHAIN {
            match strategy.attempt(self.platform.as_ref(), &element, self.header_clearance) {
                Ok(()) => {
                    attempts.push(ScrollStrategyResult {
                        strategy,
                        succeeded: true,
                        error: None,
                    });
                    tracing::debug!(
                        target: "folio.nav",
                        section = logical_id,
                        %selector,
                        strategy = strategy.number(),
                        "scrolled to section"
                    );
                    return NavigationReport {
                        target,
                        attempts,
                        outcome: NavigationOutcome::Scrolled(strategy),
                    };
                }
                Err(err) => {
                    tracing::warn!(
                        target: "folio.nav",
                        section = logical_id,
                        %selector,
                        strategy = strategy.number(),
                        error = %err,
                        "scroll strategy failed"
                    );
                    attempts.push(ScrollStrategyResult {
                        strategy,
                        succeeded: false,
                        error: Some(err),
                    });
                }
            }
        }

        tracing::error!(target: "folio.nav", section = logical_id, %selector, "all scroll strategies failed");
        NavigationReport {
            target,
            attempts,
            outcome: NavigationOutcome::Abandoned(NavigationError::StrategiesExhausted { selector }),
        }
    }

    fn target_missing(&self, target: NavigationTarget, selector: String) -> NavigationReport {
        if target.logical_id != self.home_section {
            tracing::warn!(
                target: "folio.nav",
                section = %target.logical_id,
                %selector,
                "navigation target not found"
            );
            let logical_id = target.logical_id.clone();
            return NavigationReport {
                target,
                attempts: Vec::new(),
                outcome: NavigationOutcome::Abandoned(NavigationError::TargetNotFound {
                    logical_id,
                    selector,
                }),
            };
        }
        let outcome = match self.platform.scroll_to(0.0, ScrollBehavior::Smooth) {
            Ok(()) => {
                tracing::debug!(target: "folio.nav", %selector, "home anchor missing, scrolled to top");
                NavigationOutcome::HomeFallback
            }
            Err(err) => {
                tracing::error!(target: "folio.nav", error = %err, "scroll to top failed");
                NavigationOutcome::Abandoned(NavigationError::HomeFallbackFailed(err))
            }
        };
        NavigationReport {
            target,
            attempts: Vec::new(),
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Navigator
// ---------------------------------------------------------------------------

/// Front door for navigation requests from menu items and links.
pub struct Navigator<P> {
    resolver: Rc<NavigationResolver<P>>,
    overlays: RefCell<Vec<OverlayHandle>>,
    slot: DeferredSlot,
    settle_delay: Duration,
    reports: Rc<RefCell<Vec<NavigationReport>>>,
}

impl<P> fmt::Debug for Navigator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("overlays", &self.overlays.borrow().len())
            .field("pending", &self.slot.is_pending())
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

impl<P: ScrollPlatform + 'static> Navigator<P> {
    #[must_use]
    pub fn new(resolver: NavigationResolver<P>, timers: &Timers) -> Self {
        Self {
            resolver: Rc::new(resolver),
            overlays: RefCell::new(Vec::new()),
            slot: DeferredSlot::new(timers, "navigate"),
            settle_delay: SETTLE_DELAY,
            reports: Rc::default(),
        }
    }

    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Close this overlay whenever a navigation is requested.
    pub fn register_overlay(&self, handle: OverlayHandle) {
        self.overlays.borrow_mut().push(handle);
    }

    #[must_use]
    pub fn resolver(&self) -> &NavigationResolver<P> {
        &self.resolver
    }

    /// Close overlays now; scroll to `logical_id` after the settle delay.
    pub fn request(&self, logical_id: &str) {
        self.overlays.borrow_mut().retain(|handle| {
            handle.send(OverlayEvent::ItemSelected);
            handle.is_alive()
        });

        let resolver = Rc::clone(&self.resolver);
        let reports = Rc::clone(&self.reports);
        let id = logical_id.to_string();
        let superseded = self.slot.schedule(self.settle_delay, move || {
            let report = resolver.navigate(&id);
            reports.borrow_mut().push(report);
        });
        tracing::debug!(
            target: "folio.nav",
            section = logical_id,
            delay_ms = self.settle_delay.as_millis() as u64,
            superseded,
            "navigation scheduled"
        );
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }

    /// Drop the pending navigation, if any.
    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }

    /// Drain reports of navigations that have run.
    pub fn take_reports(&self) -> Vec<NavigationReport> {
        self.reports.take()
    }
}
