#![forbid(unsafe_code)]

//! folio runtime
//!
//! The stateful, host-driven half of the page engine. Everything here is
//! single-threaded: the host pushes events into an [`EventHub`] and moves a
//! virtual clock with [`Timers::advance`]; nothing blocks and nothing
//! spawns.
//!
//! # Key Components
//!
//! - [`EventHub`] / [`Listener`] - scoped global subscriptions
//! - [`Timers`] / [`TimerHandle`] / [`DeferredSlot`] - single-shot timers
//! - [`Overlay`] / [`OverlayHandle`] - dropdown and sidebar state machines
//! - [`ScrollProgressTracker`] / [`InViewObserver`] / [`ProgressSpring`] -
//!   scroll observers
//! - [`NavigationResolver`] / [`Navigator`] - section navigation
//! - [`Choreography`] - staggered entrance and exit animation
//! - [`ContactForm`] - contact delivery with a mail-compose fallback
//! - [`SiteConfig`] - tunables as data
//!
//! # How it fits in the system
//! `folio-core` supplies the math; this crate owns state and lifecycles;
//! `folio-web` binds both to a browser document.

pub mod config;
pub mod contact;
pub mod logging;
pub mod navigation;
pub mod orchestrator;
pub mod overlay;
pub mod subscription;
pub mod timer;
pub mod tracker;

pub use config::{ConfigError, ContactConfig, MotionConfig, NavigationConfig, SiteConfig};
pub use contact::{
    ComposeLauncher, ContactError, ContactForm, ContactMessage, DeliveryError, DeliveryOutcome,
    EmailTransport, FormStatus, mailto_url,
};
pub use navigation::{
    NavigationError, NavigationOutcome, NavigationReport, NavigationResolver, NavigationTarget,
    Navigator, PlatformError, ScrollBehavior, ScrollBlock, ScrollPlatform, ScrollStrategy,
    ScrollStrategyResult, SectionRegistry,
};
pub use orchestrator::{Choreography, Pose, Transition, Trigger};
pub use overlay::{
    Overlay, OverlayEvent, OverlayHandle, OverlayState, OverlayTransition, transition,
};
pub use subscription::{EventHub, Listener, SubId};
pub use timer::{DeferredSlot, TimerHandle, Timers};
pub use tracker::{InViewObserver, ProgressSpring, RegionSource, ScrollProgressTracker};
