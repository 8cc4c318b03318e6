//! Tracking which region the viewer is looking at.
//!
//! [`RegionTracker`] is a two-state machine (idle, or inside one region)
//! fed with the reference-space point at the screen center. Lookups are
//! rate limited by [`RegionPollThrottle`] so a burst of pan/zoom input does
//! not resolve the region every frame.

use std::time::Duration;

use mapview_geom::ReferencePoint;
use web_time::Instant;

use crate::audio::AudioSink;
use crate::constants::REGION_POLL_INTERVAL;
use crate::region::{Region, resolve};

/// Which region is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionState {
    /// No region under the screen center
    #[default]
    Idle,
    /// The loaded region at `index` is active
    Active { index: usize },
}

/// Region state machine.
#[derive(Debug, Clone, Default)]
pub struct RegionTracker {
    regions: Vec<Region>,
    state: RegionState,
}

impl RegionTracker {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            state: RegionState::Idle,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn state(&self) -> RegionState {
        self.state
    }

    pub fn active_region(&self) -> Option<&Region> {
        match self.state {
            RegionState::Idle => None,
            RegionState::Active { index } => self.regions.get(index),
        }
    }

    /// Resolve `point` and notify `sink` if the active region changed.
    ///
    /// Returns true when a transition happened.
    pub fn update(&mut self, point: &ReferencePoint, sink: &mut dyn AudioSink) -> bool {
        let next = match resolve(point, &self.regions) {
            Some((index, _)) => RegionState::Active { index },
            None => RegionState::Idle,
        };
        if next == self.state {
            return false;
        }

        self.state = next;
        match self.state {
            RegionState::Active { index } => {
                let region = &self.regions[index];
                log::info!("Entered region '{}'", region.name);
                sink.on_region_enter(index, region);
            }
            RegionState::Idle => {
                log::info!("Left all regions");
                sink.on_region_exit();
            }
        }
        true
    }
}

/// Trailing-edge rate limiter for region lookups.
///
/// Changes mark the throttle dirty. A poll is due once the interval has
/// elapsed since the previous poll, so the last change of a burst is
/// always evaluated on a later frame.
#[derive(Debug, Clone)]
pub struct RegionPollThrottle {
    interval: Duration,
    last_poll: Option<Instant>,
    dirty: bool,
}

impl RegionPollThrottle {
    /// A throttle that polls on the first frame.
    pub fn new() -> Self {
        Self {
            interval: REGION_POLL_INTERVAL,
            last_poll: None,
            dirty: true,
        }
    }

    /// Set the minimum interval between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark that the viewed point may have changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check whether a poll should run at `now`.
    pub fn should_poll(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_poll {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Mark that a poll ran at `now`.
    pub fn mark_polled(&mut self, now: Instant) {
        self.last_poll = Some(now);
        self.dirty = false;
    }

    /// Combined check and mark. Returns true if the caller should poll now.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        let due = self.should_poll(now);
        if due {
            self.mark_polled(now);
        }
        due
    }
}

impl Default for RegionPollThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingSink, RegionEvent};
    use crate::region::{AxisRange, RegionArea};

    fn tracker() -> RegionTracker {
        RegionTracker::new(vec![
            Region::new(
                "A",
                RegionArea::new(AxisRange::new(0.0, 960.0), AxisRange::new(0.0, 1080.0)),
            )
            .with_sound("a.mp3"),
            Region::new(
                "B",
                RegionArea::new(AxisRange::new(960.0, 1920.0), AxisRange::new(0.0, 540.0)),
            ),
        ])
    }

    #[test]
    fn test_idle_to_active_to_other_to_idle() {
        let mut tracker = tracker();
        let mut sink = RecordingSink::new();

        assert!(tracker.update(&ReferencePoint::new(100.0, 100.0), &mut sink));
        assert_eq!(tracker.state(), RegionState::Active { index: 0 });

        assert!(tracker.update(&ReferencePoint::new(1500.0, 100.0), &mut sink));
        assert_eq!(tracker.active_region().map(|r| r.name.as_str()), Some("B"));

        assert!(tracker.update(&ReferencePoint::new(1500.0, 900.0), &mut sink));
        assert_eq!(tracker.state(), RegionState::Idle);

        assert_eq!(
            sink.drain(),
            vec![
                RegionEvent::Enter {
                    index: 0,
                    name: "A".to_string(),
                    sound_path: Some("a.mp3".to_string()),
                },
                RegionEvent::Enter {
                    index: 1,
                    name: "B".to_string(),
                    sound_path: None,
                },
                RegionEvent::Exit,
            ]
        );
    }

    #[test]
    fn test_same_region_emits_nothing() {
        let mut tracker = tracker();
        let mut sink = RecordingSink::new();
        tracker.update(&ReferencePoint::new(100.0, 100.0), &mut sink);
        sink.drain();

        assert!(!tracker.update(&ReferencePoint::new(900.0, 1000.0), &mut sink));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_idle_stays_idle() {
        let mut tracker = tracker();
        let mut sink = RecordingSink::new();
        assert!(!tracker.update(&ReferencePoint::new(-10.0, -10.0), &mut sink));
        assert!(sink.events.is_empty());
    }

    #[test]
    fn test_same_name_regions_are_distinct() {
        let area = |min, max| RegionArea::new(AxisRange::new(min, max), AxisRange::new(0.0, 10.0));
        let mut tracker = RegionTracker::new(vec![
            Region::new("Sea", area(0.0, 10.0)),
            Region::new("Sea", area(20.0, 30.0)),
        ]);
        let mut sink = RecordingSink::new();
        tracker.update(&ReferencePoint::new(5.0, 5.0), &mut sink);
        assert!(tracker.update(&ReferencePoint::new(25.0, 5.0), &mut sink));
        assert_eq!(tracker.state(), RegionState::Active { index: 1 });
    }

    #[test]
    fn test_throttle_polls_first_frame() {
        let mut throttle = RegionPollThrottle::new();
        assert!(throttle.poll_due(Instant::now()));
        assert!(!throttle.is_dirty());
    }

    #[test]
    fn test_throttle_waits_for_interval() {
        let start = Instant::now();
        let mut throttle = RegionPollThrottle::new().with_interval(Duration::from_secs(1));
        assert!(throttle.poll_due(start));

        throttle.mark_dirty();
        assert!(!throttle.poll_due(start + Duration::from_millis(300)));
        throttle.mark_dirty();
        assert!(!throttle.poll_due(start + Duration::from_millis(900)));
        // The burst is still pending and is evaluated once the interval passes
        assert!(throttle.poll_due(start + Duration::from_millis(1000)));
        assert!(!throttle.poll_due(start + Duration::from_millis(5000)));
    }

    #[test]
    fn test_throttle_clean_never_polls() {
        let start = Instant::now();
        let mut throttle = RegionPollThrottle::new();
        throttle.mark_polled(start);
        assert!(!throttle.should_poll(start + Duration::from_secs(10)));
    }
}
