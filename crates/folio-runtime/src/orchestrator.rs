#![forbid(unsafe_code)]

//! Staggered entrance and exit choreography.
//!
//! A [`Choreography`] animates a group of children between two [`Pose`]s.
//! Each child has a progress `p` in `[0, 1]` (0 = initial pose, 1 = target
//! pose) driven by one track on a [`Timeline`]. Tracks start at
//! [`Stagger`] offsets, so children cascade.
//!
//! # Triggers
//!
//! - [`Trigger::Mount`]: plays toward the target once, on [`mount`](Choreography::mount).
//! - [`Trigger::InView`]: plays once, on the first visible
//!   [`observe_visibility`](Choreography::observe_visibility).
//! - [`Trigger::State`]: follows [`set_open`](Choreography::set_open). Each
//!   change rebuilds every track from the child's current progress, so an
//!   interrupted animation reverses smoothly. Closing uses the close
//!   transition and close stagger (usually reversed).
//!
//! # Invariants
//!
//! 1. `pose(i)` is the linear blend of the two poses at child `i`'s progress.
//! 2. Before any trigger fires every child sits at the initial pose.
//! 3. Mount and in-view choreographies play at most once.

use std::fmt;
use std::time::Duration;

use folio_core::animation::{
    Animation, EasingFn, Fade, Spring, SpringConfig, Stagger, Timeline, delay, ease_out,
};

use crate::overlay::{OverlayState, OverlayTransition};

/// Visual parameters of one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl Pose {
    /// Untransformed and fully visible.
    pub const REST: Self = Self {
        x: 0.0,
        y: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64, opacity: f64, scale: f64) -> Self {
        Self {
            x,
            y,
            opacity,
            scale,
        }
    }

    #[must_use]
    pub const fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    #[must_use]
    pub const fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub const fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Blend from `self` (t = 0) to `other` (t = 1).
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            x: mix(self.x, other.x),
            y: mix(self.y, other.y),
            opacity: mix(self.opacity, other.opacity),
            scale: mix(self.scale, other.scale),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::REST
    }
}

/// How one child moves between poses.
#[derive(Debug, Clone, Copy)]
pub enum Transition {
    Tween {
        duration: Duration,
        delay: Duration,
        easing: EasingFn,
    },
    Spring {
        config: SpringConfig,
        delay: Duration,
    },
}

impl Transition {
    /// Eased tween with no delay.
    #[must_use]
    pub const fn tween(duration: Duration, easing: EasingFn) -> Self {
        Self::Tween {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    /// Spring with no delay.
    #[must_use]
    pub const fn spring(config: SpringConfig) -> Self {
        Self::Spring {
            config,
            delay: Duration::ZERO,
        }
    }

    /// Set the delay (builder pattern).
    #[must_use]
    pub const fn delayed(self, by: Duration) -> Self {
        match self {
            Self::Tween {
                duration, easing, ..
            } => Self::Tween {
                duration,
                delay: by,
                easing,
            },
            Self::Spring { config, .. } => Self::Spring { config, delay: by },
        }
    }

    fn track(&self, from: f64, to: f64) -> Box<dyn Animation> {
        match *self {
            Self::Tween {
                duration,
                delay: wait,
                easing,
            } => Box::new(delay(
                wait,
                Segment {
                    from,
                    to,
                    fade: Fade::new(duration).easing(easing),
                },
            )),
            Self::Spring {
                config,
                delay: wait,
            } => Box::new(delay(wait, Spring::new(from, to).with_config(config))),
        }
    }
}

/// A fade rescaled to run from `from` to `to`.
#[derive(Debug, Clone, Copy)]
struct Segment {
    from: f64,
    to: f64,
    fade: Fade,
}

impl Animation for Segment {
    fn tick(&mut self, dt: Duration) {
        self.fade.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.fade.is_complete()
    }

    fn value(&self) -> f32 {
        (self.from + (self.to - self.from) * f64::from(self.fade.value())) as f32
    }

    fn reset(&mut self) {
        self.fade.reset();
    }
}

/// What starts a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Mount,
    InView,
    State,
}

/// A group of children animated between two poses.
pub struct Choreography {
    name: &'static str,
    initial: Pose,
    target: Pose,
    open_transition: Transition,
    close_transition: Transition,
    open_stagger: Stagger,
    close_stagger: Stagger,
    trigger: Trigger,
    count: usize,
    timeline: Timeline,
    progress: Vec<f64>,
    open: bool,
    played: bool,
}

impl fmt::Debug for Choreography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Choreography")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .field("count", &self.count)
            .field("open", &self.open)
            .field("played", &self.played)
            .field("timeline", &self.timeline)
            .finish_non_exhaustive()
    }
}

impl Choreography {
    /// `count` children at `initial`, animating toward `target` with a
    /// 300ms ease-out tween on mount.
    #[must_use]
    pub fn new(name: &'static str, count: usize, initial: Pose, target: Pose) -> Self {
        let tween = Transition::tween(Duration::from_millis(300), ease_out);
        Self {
            name,
            initial,
            target,
            open_transition: tween,
            close_transition: tween,
            open_stagger: Stagger::default(),
            close_stagger: Stagger::default(),
            trigger: Trigger::Mount,
            count,
            timeline: Timeline::new(),
            progress: vec![0.0; count],
            open: false,
            played: false,
        }
    }

    /// Transition for both directions (builder pattern).
    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.open_transition = transition;
        self.close_transition = transition;
        self
    }

    /// Transition used when closing (builder pattern).
    #[must_use]
    pub fn close_transition(mut self, transition: Transition) -> Self {
        self.close_transition = transition;
        self
    }

    /// Stagger for both directions (builder pattern).
    #[must_use]
    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.open_stagger = stagger;
        self.close_stagger = stagger;
        self
    }

    /// Stagger used when closing (builder pattern).
    #[must_use]
    pub fn close_stagger(mut self, stagger: Stagger) -> Self {
        self.close_stagger = stagger;
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether no track is still moving.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.timeline.track_count() == 0 || self.timeline.is_complete()
    }

    // -- triggers -----------------------------------------------------------

    /// The owning view appeared. Plays a [`Trigger::Mount`] choreography.
    pub fn mount(&mut self) {
        if self.trigger == Trigger::Mount && !self.played {
            self.played = true;
            self.play_toward(true);
        }
    }

    /// Report whether the owning region is in view. Plays a
    /// [`Trigger::InView`] choreography on the first `true`.
    pub fn observe_visibility(&mut self, visible: bool) {
        if self.trigger == Trigger::InView && visible && !self.played {
            self.played = true;
            self.play_toward(true);
        }
    }

    /// Drive a [`Trigger::State`] choreography open or closed.
    pub fn set_open(&mut self, open: bool) {
        if self.trigger == Trigger::State && open != self.open {
            self.play_toward(open);
        }
    }

    /// Follow an overlay state change.
    pub fn apply(&mut self, transition: &OverlayTransition) {
        self.set_open(transition.to == OverlayState::Open);
    }

    fn play_toward(&mut self, open: bool) {
        self.sync_progress();
        self.open = open;
        let (transition, stagger, goal) = if open {
            (self.open_transition, self.open_stagger, 1.0)
        } else {
            (self.close_transition, self.close_stagger, 0.0)
        };
        let mut timeline = Timeline::new();
        for (child, &from) in self.progress.iter().enumerate() {
            timeline.push(stagger.offset(child, self.count), transition.track(from, goal));
        }
        timeline.play();
        self.timeline = timeline;
        tracing::debug!(
            target: "folio.motion",
            choreography = self.name,
            open,
            children = self.count,
            "choreography started"
        );
    }

    fn sync_progress(&mut self) {
        if self.timeline.track_count() == 0 {
            return;
        }
        for (child, p) in self.progress.iter_mut().enumerate() {
            if let Some(value) = self.timeline.track_value_at(child) {
                *p = f64::from(value);
            }
        }
    }

    // -- playback -----------------------------------------------------------

    pub fn tick(&mut self, dt: Duration) {
        self.timeline.tick(dt);
        self.sync_progress();
    }

    /// Progress of `child` between the initial (0) and target (1) poses.
    #[must_use]
    pub fn progress(&self, child: usize) -> Option<f64> {
        self.progress.get(child).copied()
    }

    /// Current pose of `child`.
    #[must_use]
    pub fn pose(&self, child: usize) -> Option<Pose> {
        self.progress(child)
            .map(|p| self.initial.lerp(&self.target, p))
    }

    /// Current poses of every child, in order.
    #[must_use]
    pub fn poses(&self) -> Vec<Pose> {
        self.progress
            .iter()
            .map(|&p| self.initial.lerp(&self.target, p))
            .collect()
    }
}

/// The page's choreographies.
pub mod presets {
    use std::time::Duration;

    use folio_core::animation::{SpringConfig, Stagger, ease_in_out, ease_out, linear};

    use super::{Choreography, Pose, Transition, Trigger};

    /// Hero heading lines slide in from the left, 100ms apart, over 1s.
    #[must_use]
    pub fn hero_text(count: usize) -> Choreography {
        Choreography::new(
            "hero-text",
            count,
            Pose::REST.with_x(-500.0).with_opacity(0.0),
            Pose::REST,
        )
        .transition(Transition::tween(Duration::from_secs(1), ease_in_out))
        .stagger(Stagger::each(Duration::from_millis(100)))
        .trigger(Trigger::Mount)
    }

    /// Dropdown menu items fade in from the left at `i * 50ms + 100ms`.
    #[must_use]
    pub fn dropdown_items(count: usize) -> Choreography {
        Choreography::new(
            "dropdown-items",
            count,
            Pose::REST.with_x(-10.0).with_opacity(0.0),
            Pose::REST,
        )
        .transition(Transition::tween(Duration::from_millis(300), ease_out))
        .close_transition(Transition::tween(Duration::from_millis(200), linear))
        .stagger(Stagger::each(Duration::from_millis(50)).with_base(Duration::from_millis(100)))
        .close_stagger(Stagger::default())
        .trigger(Trigger::State)
    }

    /// Sidebar panel reveal. `scale` is the clip circle's growth from the
    /// closed radius to the open radius. Opens on a soft spring; closes
    /// after 0.5s on a stiff, damped one.
    #[must_use]
    pub fn sidebar_panel() -> Choreography {
        Choreography::new("sidebar-panel", 1, Pose::REST.with_scale(0.0), Pose::REST)
            .transition(Transition::spring(SpringConfig::new(20.0, 10.0)))
            .close_transition(
                Transition::spring(SpringConfig::new(400.0, 40.0))
                    .delayed(Duration::from_millis(500)),
            )
            .trigger(Trigger::State)
    }

    /// Sidebar links rise in 100ms apart; on close they drop out 50ms apart,
    /// last link first.
    #[must_use]
    pub fn sidebar_links(count: usize) -> Choreography {
        Choreography::new(
            "sidebar-links",
            count,
            Pose::REST.with_y(50.0).with_opacity(0.0),
            Pose::REST,
        )
        .transition(Transition::spring(SpringConfig::default()))
        .stagger(Stagger::each(Duration::from_millis(100)))
        .close_stagger(Stagger::each(Duration::from_millis(50)).reversed())
        .trigger(Trigger::State)
    }

    /// Contact blocks rise 400px into place the first time the section is
    /// in view.
    #[must_use]
    pub fn contact_entrance(count: usize) -> Choreography {
        Choreography::new(
            "contact-entrance",
            count,
            Pose::REST.with_y(400.0).with_opacity(0.0),
            Pose::REST,
        )
        .transition(Transition::tween(Duration::from_millis(500), ease_out))
        .stagger(Stagger::each(Duration::from_millis(100)))
        .trigger(Trigger::InView)
    }
}

#[cfg(test)]
mod tests {
    use super::presets::*;
    use super::*;
    use crate::overlay::OverlayEvent;

    const MS_16: Duration = Duration::from_millis(16);

    fn run(choreo: &mut Choreography, total: Duration) {
        let mut elapsed = Duration::ZERO;
        while elapsed < total {
            choreo.tick(MS_16);
            elapsed += MS_16;
        }
    }

    #[test]
    fn starts_at_initial_pose() {
        let choreo = hero_text(3);
        assert_eq!(choreo.pose(0), Some(Pose::REST.with_x(-500.0).with_opacity(0.0)));
        assert_eq!(choreo.pose(3), None);
    }

    #[test]
    fn mount_plays_once_with_stagger() {
        let mut choreo = hero_text(3);
        choreo.mount();
        choreo.tick(Duration::from_millis(150));
        assert!(choreo.progress(0).unwrap() > 0.0);
        assert!(choreo.progress(1).unwrap() > 0.0);
        assert_eq!(choreo.progress(2), Some(0.0));

        run(&mut choreo, Duration::from_millis(1300));
        assert!(choreo.is_settled());
        assert_eq!(choreo.pose(2), Some(Pose::REST));

        choreo.mount();
        assert!(choreo.is_settled());
    }

    #[test]
    fn in_view_waits_for_visibility() {
        let mut choreo = contact_entrance(2);
        choreo.mount();
        choreo.observe_visibility(false);
        run(&mut choreo, Duration::from_millis(500));
        assert_eq!(choreo.progress(0), Some(0.0));
        choreo.observe_visibility(true);
        run(&mut choreo, Duration::from_millis(700));
        assert_eq!(choreo.pose(1), Some(Pose::REST));
    }

    #[test]
    fn state_ignores_mount() {
        let mut choreo = sidebar_links(3);
        choreo.mount();
        assert!(choreo.is_settled());
        assert!(!choreo.is_open());
    }

    #[test]
    fn closing_reverses_stagger() {
        let mut choreo = sidebar_links(3);
        choreo.set_open(true);
        run(&mut choreo, Duration::from_secs(3));
        assert!(choreo.is_settled());

        choreo.set_open(false);
        choreo.tick(Duration::from_millis(40));
        // Last link leaves first.
        assert!(choreo.progress(2).unwrap() < 1.0);
        assert_eq!(choreo.progress(0), Some(1.0));
    }

    #[test]
    fn sidebar_close_waits_half_a_second() {
        let mut panel = sidebar_panel();
        panel.set_open(true);
        run(&mut panel, Duration::from_secs(6));
        let open = panel.progress(0).unwrap();
        assert!(open > 0.9);

        panel.set_open(false);
        run(&mut panel, Duration::from_millis(480));
        assert_eq!(panel.progress(0), Some(open));
        run(&mut panel, Duration::from_millis(800));
        assert!(panel.progress(0).unwrap() < 0.05);
    }

    #[test]
    fn interrupted_open_reverses_from_current_progress() {
        let mut choreo = dropdown_items(1);
        choreo.set_open(true);
        choreo.tick(Duration::from_millis(250));
        let mid = choreo.progress(0).unwrap();
        assert!(mid > 0.0 && mid < 1.0);
        choreo.set_open(false);
        assert_eq!(choreo.progress(0), Some(mid));
        choreo.tick(Duration::from_millis(100));
        assert!(choreo.progress(0).unwrap() < mid);
    }

    #[test]
    fn follows_overlay_transitions() {
        let mut choreo = dropdown_items(2);
        choreo.apply(&OverlayTransition {
            from: OverlayState::Closed,
            to: OverlayState::Open,
            cause: OverlayEvent::ToggleRequested,
        });
        assert!(choreo.is_open());
        choreo.apply(&OverlayTransition {
            from: OverlayState::Open,
            to: OverlayState::Closed,
            cause: OverlayEvent::EscapePressed,
        });
        assert!(!choreo.is_open());
    }
}
