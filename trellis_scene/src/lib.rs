// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Scene: the element-tree substrate for pointer input and dispatch.
//!
//! This crate provides the three pieces every other Trellis crate builds on:
//!
//! - [`Scene`]: an arena-allocated element tree with generational [`ElementId`]
//!   handles. Parent/child links are explicit index-chasing over slots, so an
//!   ancestor walk never dereferences a removed element.
//! - [`Capability`]: a bitflag set naming the notification contracts an attached
//!   [`Behavior`] implements (enter/exit/down/up/click/drag/…). Dispatch consults
//!   these declared sets instead of probing concrete types at call time.
//! - [`EventData`]: the typed payloads carried through dispatch. Each capability
//!   expects exactly one payload shape; passing the wrong shape is a programming
//!   error surfaced before any handler runs.
//!
//! The scene holds no input or hit-testing state of its own. Hit-test providers
//! read it (`trellis_canvas`), the dispatcher walks it (`trellis_dispatch`), and
//! the pointer machine mutates only its own bookkeeping (`trellis_pointer`).
//!
//! ## Example
//!
//! ```rust
//! use trellis_scene::Scene;
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None);
//! let child = scene.insert(Some(root));
//!
//! assert_eq!(scene.parent_of(child), Some(root));
//! assert_eq!(scene.common_ancestor(child, root), Some(root));
//! assert!(scene.is_active_and_enabled(child));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod arena;
mod capability;
mod event;

pub use arena::{ElementId, RaycastGroup, Scene, SceneError};
pub use capability::{Behavior, BehaviorFault, Capability};
pub use event::{
    CommandEvent, EventData, MoveDirection, PayloadKind, PointerButton, PointerEvent, PointerId,
    SelectionEvent, MOUSE_LEFT, MOUSE_MIDDLE, MOUSE_RIGHT,
};
