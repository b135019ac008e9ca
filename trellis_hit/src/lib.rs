// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Hit: candidate hit records, a deterministic global ordering, and the
//! provider registry that aggregates them.
//!
//! ## Overview
//!
//! Hit testing in Trellis is pluggable: any number of providers implement the
//! [`Raycaster`] contract and append candidate [`HitRecord`]s for a pointer
//! sample. The [`Registry`] runs every active provider, stamps each record with
//! its owning provider's ordering metadata and a pass-wide insertion index, and
//! sorts the combined buffer with [`order::compare`] into a strict total order.
//!
//! ## Ordering
//!
//! [`order::compare`] applies a fixed tier sequence; the first decisive tier
//! wins:
//!
//! 1. Across providers: camera depth (higher wins, only when both present),
//!    then sort-order priority, then render-order priority (higher wins).
//! 2. Resolved sorting-layer value — higher wins.
//! 3. Sorting order — higher wins.
//! 4. Draw depth — higher wins, compared only between records sharing a root
//!    provider.
//! 5. Distance — lower wins.
//! 6. Insertion index — lower wins.
//!
//! The insertion-index fallback makes the order strict even when floating-point
//! distances tie, so aggregation is fully deterministic: the same inputs always
//! produce the same sequence.
//!
//! ## Fault isolation
//!
//! A provider that fails mid-raycast has its partial contribution discarded and
//! the failure logged; the remaining providers still run. A bad provider can
//! degrade one source of candidates but never the whole aggregation pass.
//!
//! The crate is generic over the element key `K` and the collaborator context
//! `C` handed to providers (the scene for the UI provider in `trellis_canvas`),
//! so it depends on no particular tree representation.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod order;
mod record;
mod registry;

pub use record::{HitRecord, PointerSample, ProviderId, ProviderOrder};
pub use registry::{ProviderError, Raycaster, Registry};
