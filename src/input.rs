//! Input events delivered to the viewer by the host.
//!
//! Positions are in screen pixels relative to the drawing surface. Events
//! are serializable so a session can be recorded and replayed.

use mapview_geom::ScreenPoint;
use serde::{Deserialize, Serialize};

use crate::overlay::OverlayLayer;

/// Pointer button that triggered a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Whether pressing this button starts dragging the map.
    pub fn pans(&self) -> bool {
        matches!(self, PointerButton::Primary | PointerButton::Middle)
    }
}

/// An input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        pos: ScreenPoint,
        button: PointerButton,
    },
    PointerMove {
        pos: ScreenPoint,
    },
    PointerUp {
        pos: ScreenPoint,
    },
    /// The pointer left the drawing surface
    PointerLeave,
    Wheel {
        delta_y: f64,
        pos: ScreenPoint,
    },
    /// The drawing surface changed size
    Resize {
        width: u32,
        height: u32,
    },
    ResetZoom,
    ToggleOverlay {
        layer: OverlayLayer,
    },
    SetMeasurement {
        enabled: bool,
    },
}

impl InputEvent {
    /// Parse a recorded session: a JSON array of events.
    pub fn parse_session(json: &str) -> Result<Vec<InputEvent>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session() {
        let json = r#"[
            { "type": "pointer_down", "pos": { "x": 10, "y": 20 }, "button": "primary" },
            { "type": "wheel", "delta_y": -100, "pos": { "x": 400, "y": 300 } },
            { "type": "toggle_overlay", "layer": "Sea Routes" },
            { "type": "resize", "width": 800, "height": 600 },
            { "type": "pointer_leave" }
        ]"#;
        let events = InputEvent::parse_session(json).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[0],
            InputEvent::PointerDown {
                pos: ScreenPoint::new(10.0, 20.0),
                button: PointerButton::Primary,
            }
        );
        assert_eq!(
            events[2],
            InputEvent::ToggleOverlay {
                layer: OverlayLayer::SeaRoutes
            }
        );
        assert_eq!(events[4], InputEvent::PointerLeave);
    }

    #[test]
    fn test_unknown_event_type_fails() {
        assert!(InputEvent::parse_session(r#"[{ "type": "teleport" }]"#).is_err());
    }

    #[test]
    fn test_pan_buttons() {
        assert!(PointerButton::Primary.pans());
        assert!(PointerButton::Middle.pans());
        assert!(!PointerButton::Secondary.pans());
    }
}
