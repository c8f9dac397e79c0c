#![forbid(unsafe_code)]

//! Site configuration as data.
//!
//! Every tunable the page hardcodes (header clearance, settle delay, anchor
//! overrides, parallax control points, slider timing, contact recipient)
//! lives in one [`SiteConfig`] that can be loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! [navigation]
//! header_clearance = 64.0
//! settle_delay_ms = 150
//!
//! [navigation.anchor_overrides]
//! Portfolio = "portfolio-content"
//!
//! [contact]
//! recipient = "hello@example.com"
//! ```
//!
//! ```rust,ignore
//! let config = SiteConfig::from_toml_file("folio.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `SiteConfig::default()` reproduces the page exactly.

use std::collections::BTreeMap;
#[cfg(feature = "config-files")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-files")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_core::animation::SpringConfig;
use folio_core::transform::{ControlPoints, TransformError};

use crate::navigation::{HEADER_CLEARANCE, HOME_SECTION, SETTLE_DELAY, SectionRegistry};

/// Error loading or validating a [`SiteConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "config-files")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[cfg(feature = "config-files")]
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid site config: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Top-level SiteConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct SiteConfig {
    pub navigation: NavigationConfig,
    pub motion: MotionConfig,
    pub contact: ContactConfig,
}

impl SiteConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize to TOML.
    #[cfg(feature = "config-files")]
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Validation(vec![e.to_string()]))
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        self.navigation.validate(&mut errors);
        self.motion.validate(&mut errors);
        self.contact.validate(&mut errors);
        errors
    }

    /// `self` if valid, otherwise [`ConfigError::Validation`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct NavigationConfig {
    /// Pixels kept clear above a scrolled-to section for the fixed header.
    pub header_clearance: f64,
    /// Delay between closing overlays and scrolling.
    pub settle_delay_ms: u64,
    /// Section that falls back to scrolling to the top when missing.
    pub home_section: String,
    /// Logical section ids, in menu order.
    pub sections: Vec<String>,
    /// Logical id -> element id, for sections whose anchor differs.
    pub anchor_overrides: BTreeMap<String, String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let registry = SectionRegistry::default();
        Self {
            header_clearance: HEADER_CLEARANCE,
            settle_delay_ms: SETTLE_DELAY.as_millis() as u64,
            home_section: HOME_SECTION.to_string(),
            sections: registry.sections().to_vec(),
            anchor_overrides: BTreeMap::from([(
                "Portfolio".to_string(),
                "portfolio-content".to_string(),
            )]),
        }
    }
}

impl NavigationConfig {
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn registry(&self) -> SectionRegistry {
        self.anchor_overrides.iter().fold(
            SectionRegistry::new(self.sections.iter().cloned()),
            |registry, (id, anchor)| registry.with_override(id.clone(), anchor.clone()),
        )
    }

    fn validate(&self, errors: &mut Vec<String>) {
        if !self.header_clearance.is_finite() || self.header_clearance < 0.0 {
            errors.push(format!(
                "navigation.header_clearance must be >= 0, got {}",
                self.header_clearance
            ));
        }
        if self.sections.is_empty() {
            errors.push("navigation.sections must not be empty".into());
        }
        for (i, id) in self.sections.iter().enumerate() {
            if !is_anchor_token(id) {
                errors.push(format!("navigation.sections[{i}] {id:?} is not a valid id"));
            }
            if self.sections[..i].contains(id) {
                errors.push(format!("navigation.sections lists {id:?} twice"));
            }
        }
        if !self.sections.contains(&self.home_section) {
            errors.push(format!(
                "navigation.home_section {:?} is not one of the sections",
                self.home_section
            ));
        }
        for (id, anchor) in &self.anchor_overrides {
            if !self.sections.contains(id) {
                errors.push(format!(
                    "navigation.anchor_overrides key {id:?} is not one of the sections"
                ));
            }
            if !is_anchor_token(anchor) {
                errors.push(format!(
                    "navigation.anchor_overrides.{id} {anchor:?} is not a valid element id"
                ));
            }
        }
    }
}

/// Non-empty, no whitespace, no leading `#`.
fn is_anchor_token(s: &str) -> bool {
    !s.is_empty() && !s.starts_with('#') && !s.chars().any(char::is_whitespace)
}

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// Control points as written in config: inputs and CSS-like outputs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
pub struct LayerPoints {
    pub inputs: Vec<f64>,
    pub outputs: Vec<String>,
}

impl LayerPoints {
    fn new(inputs: &[f64], outputs: &[&str]) -> Self {
        Self {
            inputs: inputs.to_vec(),
            outputs: outputs.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    pub fn control_points(&self) -> Result<ControlPoints, TransformError> {
        let outputs: Vec<&str> = self.outputs.iter().map(String::as_str).collect();
        ControlPoints::parse(&self.inputs, &outputs)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct MotionConfig {
    /// Hero slider end displacement, in percent.
    pub slider_to_percent: f64,
    /// Hero slider one-way duration.
    pub slider_half_period_ms: u64,
    pub progress_spring_stiffness: f64,
    pub progress_spring_damping: f64,
    /// Parallax heading, vertical.
    pub parallax_text_y: LayerPoints,
    /// Parallax planets, vertical.
    pub parallax_planets_y: LayerPoints,
    /// Parallax stars, horizontal.
    pub parallax_stars_x: LayerPoints,
    /// Gallery item image, vertical.
    pub gallery_image_y: LayerPoints,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            slider_to_percent: -220.0,
            slider_half_period_ms: 20_000,
            progress_spring_stiffness: 100.0,
            progress_spring_damping: 30.0,
            parallax_text_y: LayerPoints::new(&[0.0, 1.0], &["0%", "500%"]),
            parallax_planets_y: LayerPoints::new(&[0.0, 1.0], &["0%", "100%"]),
            parallax_stars_x: LayerPoints::new(&[0.0, 1.0], &["0%", "100%"]),
            gallery_image_y: LayerPoints::new(&[0.0, 1.0], &["-200px", "300px"]),
        }
    }
}

impl MotionConfig {
    #[must_use]
    pub fn slider_half_period(&self) -> Duration {
        Duration::from_millis(self.slider_half_period_ms)
    }

    #[must_use]
    pub fn progress_spring(&self) -> SpringConfig {
        SpringConfig::new(self.progress_spring_stiffness, self.progress_spring_damping)
    }

    fn validate(&self, errors: &mut Vec<String>) {
        let layers = [
            ("parallax_text_y", &self.parallax_text_y),
            ("parallax_planets_y", &self.parallax_planets_y),
            ("parallax_stars_x", &self.parallax_stars_x),
            ("gallery_image_y", &self.gallery_image_y),
        ];
        for (name, points) in layers {
            if let Err(err) = points.control_points() {
                errors.push(format!("motion.{name}: {err}"));
            }
        }
        if !self.slider_to_percent.is_finite() {
            errors.push("motion.slider_to_percent must be finite".into());
        }
        if self.slider_half_period_ms == 0 {
            errors.push("motion.slider_half_period_ms must be > 0".into());
        }
        if self.progress_spring_stiffness.is_nan() || self.progress_spring_stiffness <= 0.0 {
            errors.push(format!(
                "motion.progress_spring_stiffness must be > 0, got {}",
                self.progress_spring_stiffness
            ));
        }
        if self.progress_spring_damping.is_nan() || self.progress_spring_damping < 0.0 {
            errors.push(format!(
                "motion.progress_spring_damping must be >= 0, got {}",
                self.progress_spring_damping
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-files", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-files", serde(default))]
pub struct ContactConfig {
    /// Address used by the mail-compose fallback.
    pub recipient: String,
    /// How long a status message stays up.
    pub dismiss_after_ms: u64,
    /// Root margin for the section's entrance (negative shrinks).
    pub in_view_margin: f64,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: "mark@mayouftech.com".to_string(),
            dismiss_after_ms: 2_000,
            in_view_margin: -100.0,
        }
    }
}

impl ContactConfig {
    #[must_use]
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }

    fn validate(&self, errors: &mut Vec<String>) {
        if !crate::contact::looks_like_email(&self.recipient) {
            errors.push(format!(
                "contact.recipient {:?} is not an email address",
                self.recipient
            ));
        }
        if self.dismiss_after_ms == 0 {
            errors.push("contact.dismiss_after_ms must be > 0".into());
        }
        if !self.in_view_margin.is_finite() {
            errors.push("contact.in_view_margin must be finite".into());
        }
    }
}
