//! Cross-module tests.
//!
//! These drive the viewer through its public surface: the geometry
//! scenarios, region transitions through the frame loop, and replayed
//! input sessions.
