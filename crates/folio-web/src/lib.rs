#![forbid(unsafe_code)]

//! Browser binding for folio.
//!
//! - [`SiteModel`] wires every runtime component of the page together and
//!   is driven by host input; it is generic over the scroll platform so the
//!   whole page runs natively under test.
//! - [`FrameOutput`] is the per-frame snapshot of layer styles.
//! - On `wasm32`, `dom::DomPlatform` implements the scroll and compose
//!   capabilities with `web-sys`, and `PortfolioRunner` exports the model
//!   to JavaScript.

pub mod clock;
pub mod frame;
pub mod model;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use clock::FrameClock;
pub use frame::{FrameOutput, PoseStyle};
pub use model::{OverlayKind, PageLayout, Region, SiteError, SiteModel};

#[cfg(target_arch = "wasm32")]
pub use wasm::{PortfolioRunner, init_logging};
