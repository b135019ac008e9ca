// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawable registrations, blocking surfaces, and sorting layers.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};
use trellis_scene::ElementId;

/// Per-element veto hook consulted before a graphic can be hit.
pub trait RaycastFilter {
    /// Whether a world-space location is a valid hit on this element.
    ///
    /// Lets an element reject parts of its rect, for example the transparent
    /// pixels of an alpha-tested image.
    fn is_location_valid(&self, world: Point) -> bool;
}

/// One drawable registered with a canvas.
pub struct Graphic {
    /// The scene element this drawable belongs to.
    pub element: ElementId,
    /// Hit rect in the graphic's local space.
    pub rect: Rect,
    /// Maps local coordinates to world coordinates.
    pub world_from_local: Affine,
    /// Draw order within the canvas; higher draws on top.
    /// [`Graphic::UNDRAWN`] marks a graphic that was not drawn this frame.
    pub draw_depth: i32,
    /// Depth of the graphic's plane along the camera's forward axis.
    pub plane_depth: f64,
    /// Whether this graphic participates in hit-testing at all.
    pub raycast_target: bool,
    /// Whether the renderer culled this graphic this frame.
    pub culled: bool,
    /// Sign of the plane's forward axis; negative faces away from the camera.
    pub facing: f64,
    /// Optional per-element veto hook.
    pub filter: Option<Box<dyn RaycastFilter>>,
}

impl core::fmt::Debug for Graphic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Graphic")
            .field("element", &self.element)
            .field("rect", &self.rect)
            .field("draw_depth", &self.draw_depth)
            .field("plane_depth", &self.plane_depth)
            .field("raycast_target", &self.raycast_target)
            .field("culled", &self.culled)
            .field("filter", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

impl Graphic {
    /// Draw depth of a graphic that was not rendered this frame.
    pub const UNDRAWN: i32 = -1;

    /// A visible, hittable graphic at the given local rect.
    pub fn new(element: ElementId, rect: Rect) -> Self {
        Self {
            element,
            rect,
            world_from_local: Affine::IDENTITY,
            draw_depth: 0,
            plane_depth: 0.0,
            raycast_target: true,
            culled: false,
            facing: 1.0,
            filter: None,
        }
    }
}

bitflags::bitflags! {
    /// Which kinds of blocking surfaces cap hit distances for a canvas.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct BlockingPolicy: u8 {
        /// Flat surfaces such as sprites.
        const TWO_D = 1 << 0;
        /// Volumetric surfaces projected onto the camera plane.
        const THREE_D = 1 << 1;
        /// Both kinds.
        const ALL = Self::TWO_D.bits() | Self::THREE_D.bits();
    }
}

/// Kind of a [`BlockingSurface`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockerKind {
    /// Answers to [`BlockingPolicy::TWO_D`].
    TwoD,
    /// Answers to [`BlockingPolicy::THREE_D`].
    ThreeD,
}

impl BlockerKind {
    pub(crate) fn matches(self, policy: BlockingPolicy) -> bool {
        match self {
            Self::TwoD => policy.contains(BlockingPolicy::TWO_D),
            Self::ThreeD => policy.contains(BlockingPolicy::THREE_D),
        }
    }
}

/// An opaque world-space surface that occludes canvas content behind it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockingSurface {
    /// World-space footprint of the surface.
    pub rect: Rect,
    /// Depth of the surface along the camera's forward axis.
    pub depth: f64,
    /// Which blocking policy bits this surface answers to.
    pub kind: BlockerKind,
}

/// Maps raw sorting-layer ids to globally comparable ordinal values.
///
/// Raw layer ids are opaque; only their position in the table's declaration
/// order is meaningful across canvases.
#[derive(Clone, Debug, Default)]
pub struct LayerTable {
    layers: Vec<i32>,
}

impl LayerTable {
    /// A table with no declared layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a layer; later declarations sort above earlier ones.
    pub fn push_layer(&mut self, id: i32) {
        if !self.layers.contains(&id) {
            self.layers.push(id);
        }
    }

    /// Ordinal value of a raw layer id.
    ///
    /// Unknown ids resolve to -1, below every declared layer, so a declared
    /// layer always outranks an undeclared one at the layer tier.
    pub fn value_of(&self, id: i32) -> i32 {
        self.layers
            .iter()
            .position(|&l| l == id)
            .map_or(-1, |pos| {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_possible_wrap,
                    reason = "layer tables are tiny"
                )]
                {
                    pos as i32
                }
            })
    }
}
