// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value types shared by providers and the registry.

use kurbo::Point;

/// Identifier of a registered hit-test provider.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProviderId(pub(crate) u32);

impl ProviderId {
    /// Sentinel for records not yet stamped by the registry.
    pub const UNSET: Self = Self(u32::MAX);
}

/// Snapshot of a provider's ordering metadata, stamped onto each of its records
/// during aggregation.
///
/// Embedding the snapshot keeps [`crate::order::compare`] a pure function over
/// two records; the sort never has to look back into the registry.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProviderOrder {
    /// Depth of the provider's camera, when it has one. The cross-provider
    /// tier only decides when both records carry a camera depth.
    pub camera_depth: Option<f32>,
    /// Provider-declared sorting priority; higher ranks earlier.
    pub sort_order_priority: i32,
    /// Provider-declared render-order priority; higher ranks earlier.
    pub render_order_priority: i32,
    /// Root provider for nested surfaces. Draw depths are only comparable
    /// between records sharing a root.
    pub root: ProviderId,
}

impl Default for ProviderOrder {
    fn default() -> Self {
        Self {
            camera_depth: None,
            sort_order_priority: 0,
            render_order_priority: 0,
            root: ProviderId::UNSET,
        }
    }
}

/// One pointer sample handed to providers during aggregation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Logical pointer id (reserved negative ids for mouse buttons).
    pub pointer: i32,
    /// Screen-space position in pixels.
    pub position: Point,
    /// Display the position was reported on.
    pub display: u8,
}

/// One candidate intersection between a pointer and an element.
///
/// Records are created fresh each aggregation pass and never persist across
/// ticks. Providers fill the geometric fields; the [`crate::Registry`] stamps
/// `provider`, `provider_order`, and `index`.
#[derive(Clone, Debug)]
pub struct HitRecord<K> {
    /// The element that was hit.
    pub target: K,
    /// Provider that emitted this record (stamped by the registry).
    pub provider: ProviderId,
    /// Distance from the camera along its forward axis; 0 for overlay surfaces.
    pub distance: f64,
    /// Provider-local draw order; higher is drawn on top.
    pub depth: i32,
    /// Resolved sorting-layer value (globally comparable ordinal, not a raw id).
    pub layer_value: i32,
    /// Sorting order within the layer.
    pub sorting_order: i32,
    /// Screen-space position of the sample that produced this record.
    pub screen_position: Point,
    /// World-space position of the hit, when the provider computes one.
    pub world_position: Option<Point>,
    /// Insertion index within one aggregation pass (stamped by the registry).
    ///
    /// Strictly increasing in emission order, which guarantees a total order
    /// even when every other field ties.
    pub index: u32,
    /// Ordering metadata of the owning provider (stamped by the registry).
    pub provider_order: ProviderOrder,
}

impl<K> HitRecord<K> {
    /// A record for `target` with zeroed ordering fields.
    ///
    /// Providers typically override `distance`, `depth`, `layer_value`,
    /// `sorting_order`, and the positions before appending.
    pub fn new(target: K) -> Self {
        Self {
            target,
            provider: ProviderId::UNSET,
            distance: 0.0,
            depth: 0,
            layer_value: 0,
            sorting_order: 0,
            screen_position: Point::ZERO,
            world_position: None,
            index: 0,
            provider_order: ProviderOrder::default(),
        }
    }
}
