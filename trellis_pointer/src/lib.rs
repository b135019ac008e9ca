// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer hover/press/drag/click state machine for Trellis.
//!
//! The [`PointerModule`] turns raw device snapshots ([`InputSource`]) into
//! capability notifications delivered through a
//! [`Dispatcher`](trellis_dispatch::Dispatcher):
//!
//! - **Hover**: the topmost aggregated hit becomes the pointer's target;
//!   enter/exit notifications walk the old and new branches up to their
//!   common ancestor, so elements shared by both branches see neither.
//! - **Press**: the press target is the consumer of DOWN bubbling, falling
//!   back to the nearest click handler; consecutive clicks count within a
//!   configured interval and radius.
//! - **Drag**: starts once a held pointer travels past the drag threshold
//!   (or immediately when the threshold is disabled), synthesizing an early
//!   UP when the press target is not the drag target.
//! - **Release**: UP, then click or drop, then end-drag.
//!
//! Mouse buttons are three independent logical pointers sharing one
//! aggregation pass per tick; touches are one pointer per contact. The module
//! reaches the surrounding event system only through the [`InputContext`]
//! interface, never through globals.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod module;
mod source;
mod state;

pub use module::{InputContext, InputModule, PointerModule};
pub use source::{ButtonSample, InputSource, Touch, TouchPhase};
pub use state::{InputConfig, PointerState};
