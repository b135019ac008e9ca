// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer bookkeeping.

use kurbo::{Point, Vec2};
use smallvec::SmallVec;
use trellis_scene::{ElementId, PointerButton, PointerId};

/// Thresholds governing drag starts and consecutive clicks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputConfig {
    /// Pixels a held pointer must travel from its press origin before a drag
    /// starts. `None` starts drags on the first held tick.
    pub drag_threshold: Option<f64>,
    /// Maximum milliseconds between presses for a consecutive click.
    pub click_interval_ms: u64,
    /// Maximum pixel distance between presses for a consecutive click.
    pub click_radius: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_threshold: Some(10.0),
            click_interval_ms: 300,
            click_radius: 10.0,
        }
    }
}

/// Full state of one logical pointer.
///
/// Mouse-button pointers persist for the life of the module; touch pointers
/// are dropped when their contact ends.
#[derive(Clone, Debug)]
pub struct PointerState {
    /// Logical pointer this state belongs to.
    pub pointer: PointerId,
    /// Current screen position.
    pub position: Point,
    /// Screen position at the previous tick.
    pub previous_position: Point,
    /// Movement since the previous tick.
    pub delta: Vec2,
    /// Screen position of the most recent press.
    pub press_position: Point,
    /// Element currently under the pointer.
    pub hovered: Option<ElementId>,
    /// Resolved press target: the element that consumed the press, or the
    /// nearest click handler above the raw hit. Cleared on release.
    pub pressed: Option<ElementId>,
    /// Topmost hit at the most recent press. Kept after release so late
    /// consumers can see what was physically under the pointer.
    pub raw_press: Option<ElementId>,
    /// Press target of the previous press episode; consecutive-click anchor.
    pub last_pressed: Option<ElementId>,
    /// Press position of the previous press episode.
    pub last_press_position: Point,
    /// Element receiving drag notifications, resolved at press time.
    pub dragged: Option<ElementId>,
    /// Elements currently entered, nearest first.
    pub hover_chain: SmallVec<[ElementId; 8]>,
    /// Timestamp of the most recent press, in milliseconds.
    pub click_time_ms: u64,
    /// Consecutive-click count as of the most recent press.
    pub click_count: u32,
    /// A drag episode is in progress.
    pub drag_active: bool,
    /// The current press can still turn into a click on release.
    pub eligible_for_click: bool,
    /// Button identity for mouse pointers.
    pub button: Option<PointerButton>,
}

impl PointerState {
    /// A fresh pointer at `position` with no targets.
    pub fn new(pointer: PointerId, position: Point) -> Self {
        Self {
            pointer,
            position,
            previous_position: position,
            delta: Vec2::ZERO,
            press_position: position,
            hovered: None,
            pressed: None,
            raw_press: None,
            last_pressed: None,
            last_press_position: position,
            dragged: None,
            hover_chain: SmallVec::new(),
            click_time_ms: 0,
            click_count: 0,
            drag_active: false,
            eligible_for_click: false,
            button: None,
        }
    }

    /// Advance position bookkeeping for a new tick.
    pub fn advance_to(&mut self, position: Point) {
        self.previous_position = self.position;
        self.position = position;
        self.delta = position - self.previous_position;
    }
}
