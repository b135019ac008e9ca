// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concrete 2D canvas hit-test provider for Trellis.
//!
//! A [`CanvasRaycaster`] represents one canvas surface: either an overlay
//! drawn straight into screen space, or a surface observed through a
//! [`Camera`] in the 2.5D world model (planar world, scalar depth along the
//! camera's forward axis). It implements the
//! [`Raycaster`](trellis_hit::Raycaster) contract over
//! [`ElementId`](trellis_scene::ElementId)s with the [`Scene`](trellis_scene::Scene)
//! as context, so it plugs directly into a
//! [`Registry`](trellis_hit::Registry).
//!
//! Per sample the raycaster rejects positions outside the display and
//! viewport, maps the pick point into world space, caps hit distance by
//! [`BlockingSurface`]s, then tests each registered [`Graphic`] through its
//! rect, its own [`RaycastFilter`], and the ancestor
//! [`RaycastGroup`](trellis_scene::RaycastGroup) chain.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod camera;
mod graphic;
mod raycaster;

pub use camera::{Camera, RenderMode};
pub use graphic::{
    BlockerKind, BlockingPolicy, BlockingSurface, Graphic, LayerTable, RaycastFilter,
};
pub use raycaster::{CanvasConfig, CanvasRaycaster};
