// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The canvas hit-test provider.

use alloc::vec::Vec;

use kurbo::{Point, Size};
use trellis_hit::{HitRecord, PointerSample, ProviderError, ProviderId, Raycaster};
use trellis_scene::{ElementId, Scene};

use crate::camera::{Camera, RenderMode};
use crate::graphic::{BlockingPolicy, BlockingSurface, Graphic, LayerTable};

/// Static configuration of one canvas surface.
#[derive(Clone, Debug)]
pub struct CanvasConfig {
    /// How the canvas is positioned relative to the screen.
    pub render_mode: RenderMode,
    /// Camera the canvas is observed through; `None` only for overlay.
    pub camera: Option<Camera>,
    /// Display an overlay canvas reads samples from. Camera canvases use the
    /// camera's display instead.
    pub target_display: u8,
    /// Screen size an overlay canvas normalizes samples against, in pixels.
    pub screen: Size,
    /// Raw sorting-layer id, resolved through the [`LayerTable`].
    pub sorting_layer: i32,
    /// Sorting order within the layer.
    pub sorting_order: i32,
    /// Which blocking surface kinds cap hit distances.
    pub blocking: BlockingPolicy,
    /// Drop graphics whose plane faces away from the camera.
    pub ignore_reversed: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Overlay,
            camera: None,
            target_display: 0,
            screen: Size::new(1920.0, 1080.0),
            sorting_layer: 0,
            sorting_order: 0,
            blocking: BlockingPolicy::empty(),
            ignore_reversed: true,
        }
    }
}

/// Hit-test provider for one 2D canvas.
///
/// Holds the graphics currently registered with the canvas plus any blocking
/// surfaces, and emits candidate [`HitRecord`]s topmost-first. Candidates are
/// filtered through the graphic's own [`RaycastFilter`] and then the
/// ancestor [`RaycastGroup`] chain in the scene.
///
/// [`RaycastFilter`]: crate::RaycastFilter
/// [`RaycastGroup`]: trellis_scene::RaycastGroup
pub struct CanvasRaycaster {
    config: CanvasConfig,
    layers: LayerTable,
    graphics: Vec<Graphic>,
    blockers: Vec<BlockingSurface>,
    root: Option<ProviderId>,
    // Reused between passes; (graphic index, hit distance).
    scratch: Vec<(usize, f64)>,
}

impl core::fmt::Debug for CanvasRaycaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasRaycaster")
            .field("config", &self.config)
            .field("graphics", &self.graphics.len())
            .field("blockers", &self.blockers.len())
            .finish_non_exhaustive()
    }
}

impl CanvasRaycaster {
    /// A canvas with no registered graphics.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            layers: LayerTable::new(),
            graphics: Vec::new(),
            blockers: Vec::new(),
            root: None,
            scratch: Vec::new(),
        }
    }

    /// Replace the sorting-layer table.
    pub fn set_layer_table(&mut self, layers: LayerTable) {
        self.layers = layers;
    }

    /// Declare a root provider for nested canvases; draw depths only compare
    /// between canvases sharing a root.
    pub fn set_root(&mut self, root: ProviderId) {
        self.root = Some(root);
    }

    /// Register a graphic, replacing any existing registration for the same
    /// element.
    pub fn upsert_graphic(&mut self, graphic: Graphic) {
        match self.graphics.iter_mut().find(|g| g.element == graphic.element) {
            Some(slot) => *slot = graphic,
            None => self.graphics.push(graphic),
        }
    }

    /// Remove the graphic for an element. Returns whether one was registered.
    pub fn remove_graphic(&mut self, element: ElementId) -> bool {
        let before = self.graphics.len();
        self.graphics.retain(|g| g.element != element);
        self.graphics.len() != before
    }

    /// Mutable access to an element's graphic, for per-frame updates.
    pub fn graphic_mut(&mut self, element: ElementId) -> Option<&mut Graphic> {
        self.graphics.iter_mut().find(|g| g.element == element)
    }

    /// Add a blocking surface.
    pub fn add_blocker(&mut self, surface: BlockingSurface) {
        self.blockers.push(surface);
    }

    /// Remove all blocking surfaces.
    pub fn clear_blockers(&mut self) {
        self.blockers.clear();
    }

    fn is_overlay(&self) -> bool {
        matches!(self.config.render_mode, RenderMode::Overlay)
    }

    /// Minimum depth among policy-selected blockers containing `world`.
    fn blocking_cap(&self, world: Point) -> f64 {
        let Some(cam) = &self.config.camera else {
            return f64::INFINITY;
        };
        let mut cap = f64::INFINITY;
        for blocker in &self.blockers {
            if blocker.kind.matches(self.config.blocking)
                && blocker.rect.contains(world)
                && blocker.depth >= cam.near
                && blocker.depth <= cam.far
                && blocker.depth < cap
            {
                cap = blocker.depth;
            }
        }
        cap
    }

    /// The graphic's own filter, then ancestor groups bottom-up.
    ///
    /// A group with `blocks_raycasts == false` vetoes the hit. A group with
    /// `ignore_parent_groups == true` ends the walk once consulted; no
    /// ancestor above it is asked.
    fn passes_validity(&self, scene: &Scene, graphic: &Graphic, world: Point) -> bool {
        if let Some(filter) = &graphic.filter
            && !filter.is_location_valid(world)
        {
            return false;
        }
        if let Some(group) = scene.group_of(graphic.element) {
            if !group.blocks_raycasts {
                return false;
            }
            if group.ignore_parent_groups {
                return true;
            }
        }
        for ancestor in scene.ancestors(graphic.element) {
            if let Some(group) = scene.group_of(ancestor) {
                if !group.blocks_raycasts {
                    return false;
                }
                if group.ignore_parent_groups {
                    break;
                }
            }
        }
        true
    }
}

impl Raycaster<ElementId, Scene> for CanvasRaycaster {
    fn raycast(
        &mut self,
        scene: &Scene,
        sample: &PointerSample,
        out: &mut Vec<HitRecord<ElementId>>,
    ) -> Result<(), ProviderError> {
        let overlay = self.is_overlay();

        let display = match &self.config.camera {
            Some(cam) => cam.display,
            None => self.config.target_display,
        };
        if sample.display != display {
            return Ok(());
        }

        let viewport_pos = match &self.config.camera {
            Some(cam) => {
                if !cam.is_valid() {
                    return Err(ProviderError::new("degenerate camera"));
                }
                cam.screen_to_viewport(sample.position)
            }
            None => {
                if self.config.screen.width <= 0.0 || self.config.screen.height <= 0.0 {
                    return Err(ProviderError::new("degenerate screen size"));
                }
                Point::new(
                    sample.position.x / self.config.screen.width,
                    sample.position.y / self.config.screen.height,
                )
            }
        };
        if !(0.0..=1.0).contains(&viewport_pos.x) || !(0.0..=1.0).contains(&viewport_pos.y) {
            return Ok(());
        }

        // Overlay canvases draw in screen space, so the screen position is
        // already the pick point.
        let world = match &self.config.camera {
            Some(cam) if !overlay => cam.screen_to_world(sample.position),
            _ => sample.position,
        };

        let cap = if !overlay && !self.config.blocking.is_empty() {
            self.blocking_cap(world)
        } else {
            f64::INFINITY
        };

        let has_camera = self.config.camera.is_some();
        let far = self.config.camera.as_ref().map_or(f64::MAX, |c| c.far);

        let mut scratch = core::mem::take(&mut self.scratch);
        scratch.clear();
        for (idx, graphic) in self.graphics.iter().enumerate() {
            if graphic.draw_depth == Graphic::UNDRAWN
                || !graphic.raycast_target
                || graphic.culled
                || !scene.is_active_and_enabled(graphic.element)
            {
                continue;
            }
            // A singular graphic transform yields NaN local coordinates,
            // which never test inside the rect.
            let local = graphic.world_from_local.inverse() * world;
            if !graphic.rect.contains(local) {
                continue;
            }
            if has_camera && !overlay && graphic.plane_depth > far {
                continue;
            }
            if self.config.ignore_reversed && has_camera && !overlay && graphic.facing < 0.0 {
                continue;
            }
            if !self.passes_validity(scene, graphic, world) {
                continue;
            }
            let distance = if overlay || !has_camera {
                0.0
            } else {
                graphic.plane_depth
            };
            if distance < 0.0 || distance >= cap {
                continue;
            }
            scratch.push((idx, distance));
        }

        let graphics = &self.graphics;
        scratch.sort_by(|a, b| graphics[b.0].draw_depth.cmp(&graphics[a.0].draw_depth));

        for &(idx, distance) in &scratch {
            let graphic = &graphics[idx];
            let mut rec = HitRecord::new(graphic.element);
            rec.distance = distance;
            rec.depth = graphic.draw_depth;
            rec.layer_value = self.layers.value_of(self.config.sorting_layer);
            rec.sorting_order = self.config.sorting_order;
            rec.screen_position = sample.position;
            rec.world_position = Some(world);
            out.push(rec);
        }

        self.scratch = scratch;
        Ok(())
    }

    fn camera_depth(&self) -> Option<f32> {
        if self.is_overlay() {
            None
        } else {
            self.config.camera.as_ref().map(|c| c.depth)
        }
    }

    fn sort_order_priority(&self) -> i32 {
        // Overlay canvases outrank each other by sorting order before any
        // record-level tier runs.
        if self.is_overlay() {
            self.config.sorting_order
        } else {
            0
        }
    }

    fn root_provider(&self) -> Option<ProviderId> {
        self.root
    }
}
