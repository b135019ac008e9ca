// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed event payloads carried through capability dispatch.

use kurbo::{Point, Vec2};

use crate::arena::ElementId;

/// Logical pointer identifier.
///
/// Mouse buttons use reserved negative ids ([`MOUSE_LEFT`], [`MOUSE_RIGHT`],
/// [`MOUSE_MIDDLE`]); touches use their non-negative device-assigned ids.
pub type PointerId = i32;

/// Reserved pointer id for the left mouse button.
pub const MOUSE_LEFT: PointerId = -1;
/// Reserved pointer id for the right mouse button.
pub const MOUSE_RIGHT: PointerId = -2;
/// Reserved pointer id for the middle mouse button.
pub const MOUSE_MIDDLE: PointerId = -3;

/// Mouse button identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button. Drives hover transitions in the standard module.
    Left,
    /// Secondary button.
    Right,
    /// Middle button.
    Middle,
}

impl PointerButton {
    /// The reserved pointer id associated with this button.
    pub const fn pointer_id(self) -> PointerId {
        match self {
            Self::Left => MOUSE_LEFT,
            Self::Right => MOUSE_RIGHT,
            Self::Middle => MOUSE_MIDDLE,
        }
    }
}

/// Payload for pointer-driven capabilities (enter/exit/down/up/click/drag/drop/scroll).
///
/// One instance is reused per pointer per tick; the pointer machine fills the
/// target references in as its state advances.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// Logical pointer this payload describes.
    pub pointer: PointerId,
    /// Button identity, when the notification is button-driven.
    pub button: Option<PointerButton>,
    /// Current screen position.
    pub position: Point,
    /// Screen-space movement since the previous tick.
    pub delta: Vec2,
    /// Screen position at the most recent press.
    pub press_position: Point,
    /// Scroll wheel movement this tick.
    pub scroll_delta: Vec2,
    /// Consecutive-click count as of the most recent press.
    pub click_count: u32,
    /// Element currently hovered by this pointer, if any.
    pub hovered: Option<ElementId>,
    /// Element currently pressed by this pointer, if any.
    pub pressed: Option<ElementId>,
    /// Element currently dragged by this pointer, if any.
    pub dragged: Option<ElementId>,
}

impl PointerEvent {
    /// A fresh payload for the given pointer with zeroed positions.
    pub fn new(pointer: PointerId) -> Self {
        Self {
            pointer,
            button: None,
            position: Point::ZERO,
            delta: Vec2::ZERO,
            press_position: Point::ZERO,
            scroll_delta: Vec2::ZERO,
            click_count: 0,
            hovered: None,
            pressed: None,
            dragged: None,
        }
    }
}

/// Payload for [`Capability::SELECT`](crate::Capability::SELECT) and
/// [`Capability::DESELECT`](crate::Capability::DESELECT).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionEvent {
    /// Element losing selection, if any.
    pub outgoing: Option<ElementId>,
    /// Element gaining selection, if any.
    pub incoming: Option<ElementId>,
}

/// Directional intent for [`CommandEvent::Move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Move focus/selection up.
    Up,
    /// Move focus/selection down.
    Down,
    /// Move focus/selection left.
    Left,
    /// Move focus/selection right.
    Right,
}

/// Payload for the command capabilities (move/submit/cancel), typically routed
/// to the selected element rather than a pointer target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandEvent {
    /// Directional navigation intent.
    Move(MoveDirection),
    /// Submit/confirm intent.
    Submit,
    /// Cancel/back intent.
    Cancel,
}

/// Shape of an [`EventData`] payload, used for the fail-fast configuration check
/// in dispatch: each capability expects exactly one shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// [`EventData::Pointer`].
    Pointer,
    /// [`EventData::Selection`].
    Selection,
    /// [`EventData::Command`].
    Command,
}

/// Typed payload handed to behaviors during dispatch.
#[derive(Clone, Debug)]
pub enum EventData {
    /// Pointer-driven notification data.
    Pointer(PointerEvent),
    /// Selection change notification data.
    Selection(SelectionEvent),
    /// Command (move/submit/cancel) notification data.
    Command(CommandEvent),
}

impl EventData {
    /// The shape of this payload.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Pointer(_) => PayloadKind::Pointer,
            Self::Selection(_) => PayloadKind::Selection,
            Self::Command(_) => PayloadKind::Command,
        }
    }

    /// Borrow the pointer payload, if this is one.
    pub fn as_pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::Pointer(ev) => Some(ev),
            _ => None,
        }
    }

    /// Borrow the pointer payload mutably, if this is one.
    pub fn as_pointer_mut(&mut self) -> Option<&mut PointerEvent> {
        match self {
            Self::Pointer(ev) => Some(ev),
            _ => None,
        }
    }
}
