#![forbid(unsafe_code)]

//! Timeline: child tracks started at fixed offsets.
//!
//! A [`Timeline`] holds one boxed [`Animation`] per child, each with a start
//! offset (usually from a [`Stagger`](super::Stagger)). Ticking the timeline
//! forwards time to every track whose offset has been reached, carrying the
//! partial step for tracks that start mid-tick.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use folio_core::animation::{Animation, Fade, Timeline};
//!
//! let mut timeline = Timeline::new();
//! timeline.push(Duration::ZERO, Box::new(Fade::new(Duration::from_millis(500))));
//! timeline.push(Duration::from_millis(100), Box::new(Fade::new(Duration::from_millis(500))));
//! timeline.play();
//! timeline.tick(Duration::from_millis(600));
//! assert!(timeline.is_complete());
//! ```
//!
//! # Invariants
//!
//! 1. Tracks keep insertion order, so index `i` is child `i` regardless of
//!    its offset.
//! 2. `tick()` only advances time after `play()`.
//! 3. The timeline finishes once time has passed every offset and every
//!    track reports complete. Tracks with no natural end (an undamped
//!    spring) keep it playing.
//!
//! # Failure Modes
//!
//! - Empty timeline: finishes on the first tick after `play()`.

use std::time::Duration;

use super::Animation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackState {
    Idle,
    Playing,
    Finished,
}

struct Track {
    offset: Duration,
    animation: Box<dyn Animation>,
}

/// Child tracks scheduled at offsets.
pub struct Timeline {
    tracks: Vec<Track>,
    state: PlaybackState,
    current_time: Duration,
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("track_count", &self.tracks.len())
            .field("state", &self.state)
            .field("current_time", &self.current_time)
            .finish()
    }
}

impl Timeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            state: PlaybackState::Idle,
            current_time: Duration::ZERO,
        }
    }

    /// Append a boxed track.
    pub fn push(&mut self, offset: Duration, animation: Box<dyn Animation>) {
        self.tracks.push(Track { offset, animation });
    }

    fn last_offset(&self) -> Duration {
        self.tracks
            .iter()
            .map(|t| t.offset)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Playback control
// ---------------------------------------------------------------------------

impl Timeline {
    /// Start or restart playback from the beginning.
    pub fn play(&mut self) {
        self.current_time = Duration::ZERO;
        for track in &mut self.tracks {
            track.animation.reset();
        }
        self.state = PlaybackState::Playing;
    }

    /// Stop playback and reset to idle.
    fn stop(&mut self) {
        self.state = PlaybackState::Idle;
        self.current_time = Duration::ZERO;
        for track in &mut self.tracks {
            track.animation.reset();
        }
    }

    #[inline]
    #[must_use]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Value of track `index` (child order).
    #[must_use]
    pub fn track_value_at(&self, index: usize) -> Option<f32> {
        self.tracks.get(index).map(|t| t.animation.value())
    }

    fn all_settled(&self) -> bool {
        self.current_time >= self.last_offset()
            && self.tracks.iter().all(|t| t.animation.is_complete())
    }
}

// ---------------------------------------------------------------------------
// Animation trait implementation
// ---------------------------------------------------------------------------

impl Animation for Timeline {
    fn tick(&mut self, dt: Duration) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let new_time = self.current_time.saturating_add(dt);
        for track in &mut self.tracks {
            if new_time <= track.offset {
                continue;
            }
            if self.current_time >= track.offset {
                track.animation.tick(dt);
            } else {
                // Starts within this tick: forward only the part after the offset.
                track.animation.tick(new_time - track.offset);
            }
        }
        self.current_time = new_time;
        if self.all_settled() {
            self.state = PlaybackState::Finished;
        }
    }

    fn is_complete(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// Mean track value; 1.0 for an empty timeline.
    fn value(&self) -> f32 {
        if self.tracks.is_empty() {
            return 1.0;
        }
        let sum: f32 = self.tracks.iter().map(|t| t.animation.value()).sum();
        sum / self.tracks.len() as f32
    }

    fn reset(&mut self) {
        self.stop();
    }
}
