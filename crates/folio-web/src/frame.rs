#![forbid(unsafe_code)]

//! The per-frame snapshot handed to the host page.
//!
//! Everything is pre-formatted for direct assignment to element styles:
//! transform values carry their unit (`"250%"`, `"-40px"`), poses format to
//! a CSS `transform`, and the sidebar reveal is a ready `clip-path`.

use folio_runtime::{FormStatus, Pose};
use serde::Serialize;

/// Sidebar clip circle radius when closed, in pixels.
pub const SIDEBAR_CLOSED_RADIUS: f64 = 30.0;
/// Sidebar clip circle radius when open, in pixels.
pub const SIDEBAR_OPEN_RADIUS: f64 = 1500.0;

/// One animated child, ready for `style.transform` and `style.opacity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseStyle {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl From<Pose> for PoseStyle {
    fn from(pose: Pose) -> Self {
        Self {
            x: pose.x,
            y: pose.y,
            opacity: pose.opacity.clamp(0.0, 1.0),
            scale: pose.scale,
        }
    }
}

impl PoseStyle {
    /// CSS `transform` value.
    #[must_use]
    pub fn transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.x, self.y, self.scale
        )
    }
}

/// `clip-path` for the sidebar panel at reveal `scale` (0 closed, 1 open).
/// The panel's springs report progress clamped to `[0, 1]`, so the circle
/// stays between the closed and open radii; other inputs are clamped too.
#[must_use]
pub fn sidebar_clip_path(scale: f64) -> String {
    let scale = if scale.is_nan() { 0.0 } else { scale.clamp(0.0, 1.0) };
    let radius =
        SIDEBAR_CLOSED_RADIUS + (SIDEBAR_OPEN_RADIUS - SIDEBAR_CLOSED_RADIUS) * scale;
    format!("circle({}px at 50px 50px)", radius.round())
}

/// Stable host-facing name of a contact form status.
#[must_use]
pub const fn status_label(status: FormStatus) -> &'static str {
    match status {
        FormStatus::Idle => "idle",
        FormStatus::Sending => "sending",
        FormStatus::Sent => "sent",
        FormStatus::ComposeOpened => "compose_opened",
        FormStatus::Failed => "failed",
    }
}

/// Layer transforms and overlay flags for one rendered frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    /// Hero slider `translateX`.
    pub slider_x: String,
    pub parallax_text_y: String,
    pub parallax_planets_y: String,
    pub parallax_stars_x: String,
    /// One `translateY` per gallery item image.
    pub gallery_images_y: Vec<String>,
    /// Smoothed gallery progress, for the progress bar's `scaleX`.
    pub gallery_progress: f64,
    pub dropdown_open: bool,
    pub sidebar_open: bool,
    pub hero_text: Vec<PoseStyle>,
    pub dropdown_items: Vec<PoseStyle>,
    pub sidebar_clip: String,
    pub sidebar_links: Vec<PoseStyle>,
    pub contact_blocks: Vec<PoseStyle>,
    pub contact_status: &'static str,
}

impl FrameOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
