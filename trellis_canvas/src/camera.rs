// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera and render-mode model for canvas surfaces.

use kurbo::{Affine, Point, Rect};

/// How a canvas is positioned relative to the screen.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Drawn directly in screen space, on top of everything. No camera
    /// transform applies and hit distances are always zero.
    #[default]
    Overlay,
    /// Drawn in the plane of a specific camera at a fixed plane depth.
    CameraSpace,
    /// Placed freely in the world and observed through a camera.
    WorldSpace,
}

/// The camera a non-overlay canvas is observed through.
///
/// Trellis uses a 2.5D model: the world is two-dimensional, and depth is a
/// scalar along the camera's forward axis. `screen_from_world` being an
/// [`Affine`] keeps the pick computation a plain inverse transform.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Display this camera renders to.
    pub display: u8,
    /// Inter-camera priority; higher-depth cameras render (and hit) on top.
    pub depth: f32,
    /// Maps world coordinates to screen pixels.
    pub screen_from_world: Affine,
    /// Portion of the screen this camera renders to, in pixels.
    pub viewport: Rect,
    /// Near clip along the forward axis.
    pub near: f64,
    /// Far clip along the forward axis.
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            display: 0,
            depth: 0.0,
            screen_from_world: Affine::IDENTITY,
            viewport: Rect::new(0.0, 0.0, 1920.0, 1080.0),
            near: 0.0,
            far: f64::MAX,
        }
    }
}

impl Camera {
    /// Normalize a screen position against the viewport, to [0, 1]² when the
    /// point lies inside it.
    pub fn screen_to_viewport(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.viewport.x0) / self.viewport.width(),
            (screen.y - self.viewport.y0) / self.viewport.height(),
        )
    }

    /// Map a screen position into world coordinates.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        self.screen_from_world.inverse() * screen
    }

    /// Whether the world transform can be inverted at all.
    pub fn is_valid(&self) -> bool {
        self.screen_from_world.determinant().abs() > f64::EPSILON
            && self.viewport.width() > 0.0
            && self.viewport.height() > 0.0
    }
}
