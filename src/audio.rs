//! Region transition messages for the external audio player.
//!
//! The viewer never plays sound itself. When the region under the screen
//! center changes it emits a [`RegionEvent`] through an [`AudioSink`]; the
//! audio component decides how to crossfade.

use std::sync::mpsc::Sender;

use crate::region::Region;

/// A change of the active region.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionEvent {
    /// A region became active (possibly replacing another one)
    Enter {
        /// Index among the loaded regions, after invalid ones were dropped
        index: usize,
        /// Region name
        name: String,
        /// Track associated with the region, if any
        sound_path: Option<String>,
    },
    /// No region is under the screen center any more
    Exit,
}

impl RegionEvent {
    pub fn enter(index: usize, region: &Region) -> Self {
        RegionEvent::Enter {
            index,
            name: region.name.clone(),
            sound_path: region.sound_path.clone(),
        }
    }
}

/// Receiver of region transitions.
pub trait AudioSink {
    /// `region` (declared at `index`) is now active.
    fn on_region_enter(&mut self, index: usize, region: &Region);

    /// The previously active region was left and nothing replaced it.
    fn on_region_exit(&mut self);
}

/// Forward transitions over a channel to an audio thread or task.
impl AudioSink for Sender<RegionEvent> {
    fn on_region_enter(&mut self, index: usize, region: &Region) {
        if self.send(RegionEvent::enter(index, region)).is_err() {
            log::debug!("Audio receiver dropped, region '{}' not announced", region.name);
        }
    }

    fn on_region_exit(&mut self) {
        if self.send(RegionEvent::Exit).is_err() {
            log::debug!("Audio receiver dropped, region exit not announced");
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<RegionEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all recorded events, leaving the sink empty.
    pub fn drain(&mut self) -> Vec<RegionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl AudioSink for RecordingSink {
    fn on_region_enter(&mut self, index: usize, region: &Region) {
        self.events.push(RegionEvent::enter(index, region));
    }

    fn on_region_exit(&mut self) {
        self.events.push(RegionEvent::Exit);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::region::{AxisRange, RegionArea};

    fn region() -> Region {
        Region::new(
            "Harbor",
            RegionArea::new(AxisRange::new(0.0, 10.0), AxisRange::new(0.0, 10.0)),
        )
        .with_sound("harbor.mp3")
    }

    #[test]
    fn test_channel_sink_delivers_events() {
        let (mut tx, rx) = mpsc::channel::<RegionEvent>();
        tx.on_region_enter(3, &region());
        tx.on_region_exit();

        assert_eq!(
            rx.try_recv().unwrap(),
            RegionEvent::Enter {
                index: 3,
                name: "Harbor".to_string(),
                sound_path: Some("harbor.mp3".to_string()),
            }
        );
        assert_eq!(rx.try_recv().unwrap(), RegionEvent::Exit);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel::<RegionEvent>();
        drop(rx);
        tx.on_region_enter(0, &region());
        tx.on_region_exit();
    }

    #[test]
    fn test_recording_sink_drain() {
        let mut sink = RecordingSink::new();
        sink.on_region_exit();
        assert_eq!(sink.drain(), vec![RegionEvent::Exit]);
        assert!(sink.events.is_empty());
    }
}
