//! Debounced touch state for noisy per-frame pinch detection.
//!
//! Hand trackers flicker between "touching" and "not touching" for a frame
//! or two. [`TouchDebouncer`] takes a strict majority over the last few
//! samples, and distinguishes a short press (click) from a held one (drag)
//! by how long the debounced touch lasts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use glam::DVec3;

pub const DEFAULT_WINDOW: usize = 5;
pub const DEFAULT_DWELL: Duration = Duration::from_millis(200);
/// Landmark distance, in normalized image units, below which two fingertips
/// count as touching.
pub const DEFAULT_PINCH_THRESHOLD: f64 = 0.05;

/// Whether two landmarks are close enough to count as a pinch.
pub fn pinch(a: DVec3, b: DVec3, threshold: f64) -> bool {
    a.distance(b) < threshold
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEvent {
    None,
    /// Debounced touch began.
    Press,
    /// Touch held past the dwell time; emitted once per touch.
    DragStart,
    /// Touch released before the dwell time.
    Click,
    /// Touch released after a drag started.
    DragEnd,
}

#[derive(Debug, Clone)]
pub struct TouchDebouncer {
    window: usize,
    dwell: Duration,
    samples: VecDeque<bool>,
    touching: bool,
    dragging: bool,
    touch_started: Option<Instant>,
}

impl Default for TouchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_DWELL)
    }
}

impl TouchDebouncer {
    pub fn new(window: usize, dwell: Duration) -> Self {
        assert!(window > 0, "debounce window must be positive");

        Self {
            window,
            dwell,
            samples: VecDeque::with_capacity(window),
            touching: false,
            dragging: false,
            touch_started: None,
        }
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feeds one raw sample taken at `now`.
    pub fn update(&mut self, raw: bool, now: Instant) -> TouchEvent {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(raw);

        let votes = self.samples.iter().filter(|&&s| s).count();
        let touching = votes * 2 > self.samples.len();

        match (self.touching, touching) {
            (false, true) => {
                self.touching = true;
                self.touch_started = Some(now);
                TouchEvent::Press
            }
            (true, false) => {
                self.touching = false;
                self.touch_started = None;
                if std::mem::take(&mut self.dragging) {
                    TouchEvent::DragEnd
                } else {
                    TouchEvent::Click
                }
            }
            (true, true) if !self.dragging => {
                let held = self
                    .touch_started
                    .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
                if held >= self.dwell {
                    self.dragging = true;
                    TouchEvent::DragStart
                } else {
                    TouchEvent::None
                }
            }
            _ => TouchEvent::None,
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.touching = false;
        self.dragging = false;
        self.touch_started = None;
    }
}
