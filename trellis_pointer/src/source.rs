// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The device-input boundary.
//!
//! Trellis never polls devices itself; the host hands the pointer machine an
//! [`InputSource`] snapshot each tick.

use kurbo::{Point, Vec2};

/// One button's edge and level state for the current tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonSample {
    /// The button went down this tick.
    pub pressed: bool,
    /// The button went up this tick.
    pub released: bool,
    /// The button is currently down.
    pub held: bool,
}

/// Lifecycle phase of a touch contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Contact began this tick.
    Began,
    /// Contact moved since the previous tick.
    Moved,
    /// Contact is down and stationary.
    Stationary,
    /// Contact lifted this tick.
    Ended,
    /// Contact was cancelled by the system this tick.
    Cancelled,
}

/// One touch contact reported by the source.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    /// Device-assigned contact id; non-negative by convention.
    pub id: i32,
    /// Screen position in pixels.
    pub position: Point,
    /// Lifecycle phase this tick.
    pub phase: TouchPhase,
}

/// Snapshot of device input for one tick.
///
/// Implementations read whatever windowing or platform layer the host uses;
/// the pointer machine only consumes this interface.
pub trait InputSource {
    /// Current mouse position in screen pixels.
    fn mouse_position(&self) -> Point;

    /// Edge and level state for a mouse button.
    fn button(&self, button: trellis_scene::PointerButton) -> ButtonSample;

    /// Scroll wheel movement this tick.
    fn scroll_delta(&self) -> Vec2;

    /// Whether the pointer is locked/captured; a locked pointer hovers
    /// nothing.
    fn pointer_locked(&self) -> bool {
        false
    }

    /// Active touch contacts this tick.
    fn touches(&self) -> &[Touch] {
        &[]
    }

    /// Monotonic timestamp of this snapshot, in milliseconds. Drives the
    /// consecutive-click interval.
    fn timestamp_ms(&self) -> u64;

    /// Display the mouse position was reported on.
    fn display(&self) -> u8 {
        0
    }
}
