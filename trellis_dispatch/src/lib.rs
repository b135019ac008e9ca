// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Dispatch: capability-based notification delivery over the scene.
//!
//! ## Overview
//!
//! The dispatcher delivers one typed notification to one element
//! ([`Dispatcher::dispatch`]) or walks the element's ancestor chain until some
//! level handles it ([`Dispatcher::dispatch_bubbling`]). "Handles" means the
//! level has at least one enabled behavior whose declared [`Capability`] set
//! contains the dispatched capability; the behaviors run in attachment order.
//!
//! ## Fault model
//!
//! - A payload of the wrong shape for the capability is a configuration error
//!   and fails fast with [`DispatchError::PayloadMismatch`]; no handler runs.
//! - A fault *inside* a handler is captured as a value ([`CapturedFault`]),
//!   logged, and dispatch continues with the remaining handlers and ancestor
//!   levels. Callers inspect [`Dispatcher::faults`] after a call if they care.
//!
//! Scratch buffers (handler indices, captured faults) live on the dispatcher
//! and are reused across calls; they are cleared on entry and never retain
//! references after a call returns.
//!
//! ## Example
//!
//! ```rust
//! use trellis_dispatch::Dispatcher;
//! use trellis_scene::{
//!     Behavior, BehaviorFault, Capability, EventData, PointerEvent, Scene, MOUSE_LEFT,
//! };
//!
//! struct Clickable;
//! impl Behavior for Clickable {
//!     fn capabilities(&self) -> Capability {
//!         Capability::CLICK
//!     }
//!     fn on_event(&mut self, _: Capability, _: &mut EventData) -> Result<(), BehaviorFault> {
//!         Ok(())
//!     }
//! }
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None);
//! let leaf = scene.insert(Some(root));
//! scene.attach(root, Box::new(Clickable)).unwrap();
//!
//! let mut dispatcher = Dispatcher::new();
//! let mut ev = EventData::Pointer(PointerEvent::new(MOUSE_LEFT));
//! // The leaf has no click handler; bubbling settles on the root.
//! let consumer = dispatcher
//!     .dispatch_bubbling(&mut scene, leaf, &mut ev, Capability::CLICK)
//!     .unwrap();
//! assert_eq!(consumer, Some(root));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use smallvec::SmallVec;
use trellis_scene::{BehaviorFault, Capability, ElementId, EventData, PayloadKind, Scene};

/// Errors that indicate a programming mistake at the dispatch call site.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The event payload's shape does not match what the capability expects.
    #[error("capability {capability:?} expects a {expected:?} payload, got {got:?}")]
    PayloadMismatch {
        /// The capability being dispatched.
        capability: Capability,
        /// The payload shape the capability expects.
        expected: PayloadKind,
        /// The payload shape that was passed.
        got: PayloadKind,
    },
    /// Dispatch requires exactly one capability bit.
    #[error("capability {0:?} is not a single flag")]
    NotSingular(Capability),
}

/// One handler fault captured during a dispatch call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFault {
    /// Element whose behavior faulted.
    pub element: ElementId,
    /// Attachment index of the faulting behavior.
    pub behavior_index: usize,
    /// The fault the behavior returned.
    pub fault: BehaviorFault,
}

/// Capability dispatcher with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct Dispatcher {
    handler_indices: SmallVec<[usize; 4]>,
    faults: SmallVec<[CapturedFault; 2]>,
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Faults captured by the most recent dispatch call.
    ///
    /// Cleared at the start of the next call; copy out anything you need to
    /// keep.
    pub fn faults(&self) -> &[CapturedFault] {
        &self.faults
    }

    /// Deliver `capability` to every implementing behavior on `target`.
    ///
    /// Returns whether at least one enabled handler existed. Handler faults
    /// are captured and logged without stopping the remaining handlers.
    /// Inactive elements (locally or through an inactive ancestor) report
    /// `false` without running anything.
    pub fn dispatch(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        event: &mut EventData,
        capability: Capability,
    ) -> Result<bool, DispatchError> {
        Self::check_payload(event, capability)?;
        self.faults.clear();
        Ok(self.dispatch_level(scene, target, event, capability))
    }

    /// Deliver `capability` starting at `target` and bubbling through its
    /// ancestors (root last) until a level handles it.
    ///
    /// Returns the first element where at least one handler ran, or `None`
    /// when no element in the chain implements the capability. Faults from
    /// every visited level accumulate in [`Self::faults`].
    pub fn dispatch_bubbling(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        event: &mut EventData,
        capability: Capability,
    ) -> Result<Option<ElementId>, DispatchError> {
        Self::check_payload(event, capability)?;
        self.faults.clear();
        let mut current = Some(target);
        while let Some(element) = current {
            if self.dispatch_level(scene, element, event, capability) {
                return Ok(Some(element));
            }
            current = scene.parent_of(element);
        }
        Ok(None)
    }

    /// The nearest element, starting at `target` and walking up, that has at
    /// least one enabled handler for `capability`. Does not dispatch.
    pub fn handler_of(
        scene: &Scene,
        target: ElementId,
        capability: Capability,
    ) -> Option<ElementId> {
        let mut current = Some(target);
        while let Some(element) = current {
            if scene.has_handler(element, capability) {
                return Some(element);
            }
            current = scene.parent_of(element);
        }
        None
    }

    fn check_payload(event: &EventData, capability: Capability) -> Result<(), DispatchError> {
        let expected = capability
            .expected_payload()
            .ok_or(DispatchError::NotSingular(capability))?;
        let got = event.kind();
        if got != expected {
            return Err(DispatchError::PayloadMismatch {
                capability,
                expected,
                got,
            });
        }
        Ok(())
    }

    /// Run all handlers at one level. Returns whether any handler existed.
    fn dispatch_level(
        &mut self,
        scene: &mut Scene,
        element: ElementId,
        event: &mut EventData,
        capability: Capability,
    ) -> bool {
        if !scene.is_active_and_enabled(element) {
            return false;
        }
        scene.collect_handler_indices(element, capability, &mut self.handler_indices);
        if self.handler_indices.is_empty() {
            return false;
        }
        for i in 0..self.handler_indices.len() {
            let behavior_index = self.handler_indices[i];
            match scene.run_behavior(element, behavior_index, capability, event) {
                Some(Ok(())) => {}
                Some(Err(fault)) => {
                    tracing::error!(
                        element = ?element,
                        behavior = behavior_index,
                        fault = %fault,
                        "handler fault during dispatch; continuing"
                    );
                    self.faults.push(CapturedFault {
                        element,
                        behavior_index,
                        fault,
                    });
                }
                // The element or behavior vanished mid-dispatch (a handler
                // mutated the scene); skip the remainder of this level.
                None => break,
            }
        }
        true
    }
}
