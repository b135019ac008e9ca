// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The global ordering comparator over [`HitRecord`]s.

use core::cmp::Ordering;

use crate::record::HitRecord;

/// Compare two hit records; `Less` means `a` ranks nearer/earlier than `b`.
///
/// Tiers are applied in strict sequence; the first decisive tier wins:
///
/// 1. Different providers: camera depth (higher wins; skipped unless both
///    records carry one and they differ), then `sort_order_priority`, then
///    `render_order_priority` (higher wins).
/// 2. `layer_value` — higher wins.
/// 3. `sorting_order` — higher wins.
/// 4. `depth` — higher wins, only when both records share a root provider.
/// 5. `distance` — lower wins.
/// 6. `index` — lower wins.
///
/// Because insertion indices are unique within an aggregation pass, the result
/// is a strict total order: antisymmetric and transitive even under
/// floating-point distance ties.
pub fn compare<K>(a: &HitRecord<K>, b: &HitRecord<K>) -> Ordering {
    if a.provider != b.provider {
        if let (Some(da), Some(db)) = (a.provider_order.camera_depth, b.provider_order.camera_depth)
            && da != db
        {
            // Higher camera depth ranks earlier.
            return db.total_cmp(&da);
        }
        if a.provider_order.sort_order_priority != b.provider_order.sort_order_priority {
            return b
                .provider_order
                .sort_order_priority
                .cmp(&a.provider_order.sort_order_priority);
        }
        if a.provider_order.render_order_priority != b.provider_order.render_order_priority {
            return b
                .provider_order
                .render_order_priority
                .cmp(&a.provider_order.render_order_priority);
        }
    }

    if a.layer_value != b.layer_value {
        return b.layer_value.cmp(&a.layer_value);
    }

    if a.sorting_order != b.sorting_order {
        return b.sorting_order.cmp(&a.sorting_order);
    }

    // Draw depths from unrelated provider roots are meaningless to compare.
    if a.depth != b.depth && a.provider_order.root == b.provider_order.root {
        return b.depth.cmp(&a.depth);
    }

    if a.distance != b.distance {
        return a.distance.total_cmp(&b.distance);
    }

    a.index.cmp(&b.index)
}
