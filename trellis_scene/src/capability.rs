// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability tags and the behavior (handler) contract.

use alloc::borrow::Cow;

use crate::event::{EventData, PayloadKind};

bitflags::bitflags! {
    /// Notification contracts a behavior may implement.
    ///
    /// A behavior declares its set once via [`Behavior::capabilities`]; dispatch
    /// queries the set instead of probing the behavior's concrete type. Multi-bit
    /// sets are valid for declaration; dispatch is always performed one bit at a
    /// time.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capability: u32 {
        /// Pointer began hovering the element.
        const ENTER = 1 << 0;
        /// Pointer stopped hovering the element.
        const EXIT = 1 << 1;
        /// Button pressed over the element.
        const DOWN = 1 << 2;
        /// Button released.
        const UP = 1 << 3;
        /// Press and release resolved to a click.
        const CLICK = 1 << 4;
        /// Drag threshold crossed; a drag episode starts.
        const BEGIN_DRAG = 1 << 5;
        /// Drag motion while an episode is active.
        const DRAG = 1 << 6;
        /// Drag episode ended.
        const END_DRAG = 1 << 7;
        /// A dragged payload was released over the element.
        const DROP = 1 << 8;
        /// Scroll wheel moved while hovering.
        const SCROLL = 1 << 9;
        /// Element became the selected element.
        const SELECT = 1 << 10;
        /// Element stopped being the selected element.
        const DESELECT = 1 << 11;
        /// Directional navigation command.
        const MOVE = 1 << 12;
        /// Submit command.
        const SUBMIT = 1 << 13;
        /// Cancel command.
        const CANCEL = 1 << 14;
    }
}

impl Capability {
    /// The payload shape this capability expects during dispatch.
    ///
    /// Returns `None` for the empty set and for multi-bit sets, which cannot be
    /// dispatched directly.
    pub fn expected_payload(self) -> Option<PayloadKind> {
        if self.bits().count_ones() != 1 {
            return None;
        }
        let kind = if (Self::SELECT | Self::DESELECT).contains(self) {
            PayloadKind::Selection
        } else if (Self::MOVE | Self::SUBMIT | Self::CANCEL).contains(self) {
            PayloadKind::Command
        } else {
            PayloadKind::Pointer
        };
        Some(kind)
    }
}

/// Fault raised by an individual behavior during dispatch.
///
/// Faults are captured per handler and logged by the dispatcher; they never
/// abort dispatch to the remaining handlers or ancestors.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("behavior fault: {0}")]
pub struct BehaviorFault(pub Cow<'static, str>);

impl BehaviorFault {
    /// A fault with a static message.
    pub const fn new(message: &'static str) -> Self {
        Self(Cow::Borrowed(message))
    }
}

/// A handler attached to a scene element.
///
/// Behaviors are invoked in attachment order. A behavior only ever receives
/// capabilities contained in its declared set, with a payload of the expected
/// shape for that capability.
pub trait Behavior {
    /// The capability set this behavior implements.
    fn capabilities(&self) -> Capability;

    /// Whether this behavior currently participates in dispatch.
    ///
    /// Disabled behaviors are skipped without counting as handlers.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Handle one notification.
    fn on_event(
        &mut self,
        capability: Capability,
        event: &mut EventData,
    ) -> Result<(), BehaviorFault>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_payload_maps_single_bits() {
        assert_eq!(
            Capability::CLICK.expected_payload(),
            Some(PayloadKind::Pointer)
        );
        assert_eq!(
            Capability::SELECT.expected_payload(),
            Some(PayloadKind::Selection)
        );
        assert_eq!(
            Capability::DESELECT.expected_payload(),
            Some(PayloadKind::Selection)
        );
        assert_eq!(
            Capability::SUBMIT.expected_payload(),
            Some(PayloadKind::Command)
        );
        assert_eq!(
            Capability::SCROLL.expected_payload(),
            Some(PayloadKind::Pointer)
        );
    }

    #[test]
    fn expected_payload_rejects_non_singleton_sets() {
        assert_eq!(Capability::empty().expected_payload(), None);
        assert_eq!((Capability::ENTER | Capability::EXIT).expected_payload(), None);
    }
}
