// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provider registry and the aggregation pass.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::order;
use crate::record::{HitRecord, PointerSample, ProviderId, ProviderOrder};

/// Fault raised by a provider during candidate generation.
///
/// A faulting provider's partial contribution is discarded; other providers
/// still run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("provider fault: {0}")]
pub struct ProviderError(pub Cow<'static, str>);

impl ProviderError {
    /// A fault with a static message.
    pub const fn new(message: &'static str) -> Self {
        Self(Cow::Borrowed(message))
    }
}

/// The hit-test provider contract.
///
/// `K` is the element key emitted in records; `C` is the collaborator context
/// the registry threads through to providers (the scene, for the UI provider).
/// Providers fill the geometric record fields; `provider`, `provider_order`,
/// and `index` are stamped by the registry after each call.
pub trait Raycaster<K, C> {
    /// Append candidate hits for `sample` to `out`.
    ///
    /// A provider may append zero, one, or many records, and must append them
    /// in its own topmost-first order; the registry preserves emission order in
    /// the insertion index.
    fn raycast(
        &mut self,
        ctx: &C,
        sample: &PointerSample,
        out: &mut Vec<HitRecord<K>>,
    ) -> Result<(), ProviderError>;

    /// Depth of this provider's camera, when it renders through one.
    fn camera_depth(&self) -> Option<f32> {
        None
    }

    /// Provider-declared sorting priority; higher ranks earlier.
    fn sort_order_priority(&self) -> i32 {
        0
    }

    /// Provider-declared render-order priority; higher ranks earlier.
    fn render_order_priority(&self) -> i32 {
        0
    }

    /// Root provider for nested surfaces; `None` means this provider is its
    /// own root.
    fn root_provider(&self) -> Option<ProviderId> {
        None
    }
}

/// Set of active hit-test providers plus the aggregation pass over them.
///
/// Providers are registered as they activate and unregistered as they
/// deactivate; no ordering is required among them, the comparator imposes
/// order after aggregation.
pub struct Registry<K, C> {
    providers: Vec<Option<Box<dyn Raycaster<K, C>>>>,
    free_list: Vec<usize>,
}

impl<K, C> core::fmt::Debug for Registry<K, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("providers", &self.active_count())
            .field("slots", &self.providers.len())
            .finish_non_exhaustive()
    }
}

impl<K, C> Default for Registry<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> Registry<K, C> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Number of active providers.
    pub fn active_count(&self) -> usize {
        self.providers.iter().filter(|p| p.is_some()).count()
    }

    /// Register a provider; the returned id stays stable until unregistered.
    pub fn register(&mut self, provider: Box<dyn Raycaster<K, C>>) -> ProviderId {
        if let Some(idx) = self.free_list.pop() {
            self.providers[idx] = Some(provider);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ProviderId uses 32-bit indices by design."
            )]
            ProviderId(idx as u32)
        } else {
            self.providers.push(Some(provider));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ProviderId uses 32-bit indices by design."
            )]
            ProviderId((self.providers.len() - 1) as u32)
        }
    }

    /// Remove a provider. Returns whether it was registered.
    pub fn unregister(&mut self, id: ProviderId) -> bool {
        let idx = id.0 as usize;
        match self.providers.get_mut(idx) {
            Some(slot @ Some(_)) => {
                *slot = None;
                self.free_list.push(idx);
                true
            }
            _ => false,
        }
    }

    /// Aggregate candidate hits from every active provider into `out`.
    ///
    /// `out` is a caller-owned reusable buffer: it is cleared first and holds
    /// no references after the call. Each provider appends its candidates, the
    /// registry stamps provider metadata and pass-wide insertion indices, and
    /// the combined buffer is sorted with [`order::compare`]. Provider faults
    /// are isolated: the faulting provider's partial records are dropped and
    /// logged, and aggregation continues.
    pub fn aggregate<'a>(
        &mut self,
        ctx: &C,
        sample: &PointerSample,
        out: &'a mut Vec<HitRecord<K>>,
    ) -> &'a [HitRecord<K>] {
        out.clear();
        for (idx, slot) in self.providers.iter_mut().enumerate() {
            let Some(provider) = slot else {
                continue;
            };
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ProviderId uses 32-bit indices by design."
            )]
            let id = ProviderId(idx as u32);
            let start = out.len();
            match provider.raycast(ctx, sample, out) {
                Ok(()) => {
                    let meta = ProviderOrder {
                        camera_depth: provider.camera_depth(),
                        sort_order_priority: provider.sort_order_priority(),
                        render_order_priority: provider.render_order_priority(),
                        root: provider.root_provider().unwrap_or(id),
                    };
                    for rec in &mut out[start..] {
                        rec.provider = id;
                        rec.provider_order = meta;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        provider = idx,
                        error = %err,
                        "hit-test provider fault; discarding its candidates"
                    );
                    out.truncate(start);
                }
            }
        }
        for (i, rec) in out.iter_mut().enumerate() {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "insertion indices are bounded by the per-pass record count"
            )]
            {
                rec.index = i as u32;
            }
        }
        out.sort_by(order::compare);
        out
    }
}
