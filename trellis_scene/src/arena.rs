// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena element tree: slots, generations, parent links, attached behaviors.

use alloc::{boxed::Box, vec::Vec};

use smallvec::SmallVec;

use crate::capability::{Behavior, BehaviorFault, Capability};
use crate::event::EventData;

/// Identifier for an element in the scene (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Group-level raycast policy attached to an element.
///
/// Groups participate in the hit-test validity walk: a group with
/// `blocks_raycasts == false` vetoes every descendant graphic, and a group with
/// `ignore_parent_groups == true` stops the walk so no further ancestor is
/// consulted at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RaycastGroup {
    /// Whether graphics under this group can be hit at all.
    pub blocks_raycasts: bool,
    /// Whether ancestor groups above this one are ignored for descendants.
    pub ignore_parent_groups: bool,
}

impl Default for RaycastGroup {
    fn default() -> Self {
        Self {
            blocks_raycasts: true,
            ignore_parent_groups: false,
        }
    }
}

/// Errors from structural scene mutations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The element id refers to a removed slot.
    #[error("stale element id")]
    Stale,
    /// The requested reparent would make an element its own ancestor.
    #[error("reparent would create a cycle")]
    WouldCycle,
}

struct Element {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    active: bool,
    behaviors: Vec<Box<dyn Behavior>>,
    group: Option<RaycastGroup>,
}

impl Element {
    fn new(generation: u32) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            active: true,
            behaviors: Vec::new(),
            group: None,
        }
    }
}

/// Arena-allocated element tree.
///
/// Elements are stored in slots addressed by [`ElementId`] (index, generation).
/// Removing an element frees its whole subtree; a freed slot bumps its
/// generation on reuse, so stale ids are detected rather than dangling.
///
/// The scene is the single source of truth for hierarchy queries consumed by
/// hit-test providers and the dispatcher: parent/child links, active state, and
/// the per-element behavior lists with their capability sets.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Option<Element>>,
    /// Last generation per slot (persists across frees).
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.slots.len();
        let alive = self.slots.iter().filter(|s| s.is_some()).count();
        f.debug_struct("Scene")
            .field("elements_total", &total)
            .field("elements_alive", &alive)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.slots
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .is_some_and(|el| el.generation == id.1)
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.slots
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|el| el.generation == id.1)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|el| el.generation == id.1)
    }

    /// Insert a new element as a child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` id is treated as `None`.
    pub fn insert(&mut self, parent: Option<ElementId>) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(Element::new(generation));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.slots.push(Some(Element::new(generation)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.slots.len() - 1) as u32, generation)
        };
        let id = ElementId::new(idx, generation);
        if let Some(p) = parent.filter(|&p| self.is_alive(p)) {
            self.element_mut(id).expect("just inserted").parent = Some(p);
            self.element_mut(p).expect("checked alive").children.push(id);
        }
        id
    }

    /// Remove an element and its entire subtree. Stale ids are a no-op.
    pub fn remove(&mut self, id: ElementId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.element(id).and_then(|el| el.parent) {
            self.unlink_child(parent, id);
        }
        let mut stack = Vec::new();
        stack.push(id);
        while let Some(cur) = stack.pop() {
            if let Some(el) = self.element(cur) {
                stack.extend(el.children.iter().copied());
                self.slots[cur.idx()] = None;
                self.free_list.push(cur.idx());
            }
        }
    }

    fn unlink_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(p) = self.element_mut(parent)
            && let Some(pos) = p.children.iter().position(|&c| c == child)
        {
            p.children.remove(pos);
        }
    }

    /// Reparent `id` under `new_parent` (or make it a root).
    ///
    /// Fails when `id` is stale or when `new_parent` lies in `id`'s subtree.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> Result<(), SceneError> {
        if !self.is_alive(id) {
            return Err(SceneError::Stale);
        }
        if let Some(p) = new_parent {
            if !self.is_alive(p) {
                return Err(SceneError::Stale);
            }
            if p == id || self.ancestors(p).any(|a| a == id) {
                return Err(SceneError::WouldCycle);
            }
        }
        if let Some(old) = self.element(id).and_then(|el| el.parent) {
            self.unlink_child(old, id);
        }
        self.element_mut(id).expect("checked alive").parent = new_parent;
        if let Some(p) = new_parent {
            self.element_mut(p).expect("checked alive").children.push(id);
        }
        Ok(())
    }

    /// The parent of a live element, or `None` for roots and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|el| el.parent)
    }

    /// Children of a live element, in insertion order.
    pub fn children_of(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(|el| el.children.as_slice()).unwrap_or(&[])
    }

    /// Iterator over strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.parent_of(id),
        }
    }

    /// Nearest shared ancestor of `a` and `b`, inclusive of the elements
    /// themselves.
    ///
    /// Used by hover transitions to bound the enter/exit spans. Returns `None`
    /// when the elements live in different trees or either id is stale.
    pub fn common_ancestor(&self, a: ElementId, b: ElementId) -> Option<ElementId> {
        if !self.is_alive(a) || !self.is_alive(b) {
            return None;
        }
        let depth = |mut id: ElementId| {
            let mut d = 0_usize;
            while let Some(p) = self.parent_of(id) {
                id = p;
                d += 1;
            }
            d
        };
        let (mut x, mut y) = (a, b);
        let (mut dx, mut dy) = (depth(a), depth(b));
        while dx > dy {
            x = self.parent_of(x)?;
            dx -= 1;
        }
        while dy > dx {
            y = self.parent_of(y)?;
            dy -= 1;
        }
        while x != y {
            x = self.parent_of(x)?;
            y = self.parent_of(y)?;
        }
        Some(x)
    }

    /// Set the local active flag. Stale ids are a no-op.
    pub fn set_active(&mut self, id: ElementId, active: bool) {
        if let Some(el) = self.element_mut(id) {
            el.active = active;
        }
    }

    /// Local active flag, without considering ancestors.
    pub fn is_active(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(|el| el.active)
    }

    /// Whether the element and all of its ancestors are active.
    pub fn is_active_and_enabled(&self, id: ElementId) -> bool {
        if !self.is_active(id) {
            return false;
        }
        self.ancestors(id).all(|a| self.is_active(a))
    }

    /// Attach a behavior to an element; returns its attachment index.
    ///
    /// Attachment order is dispatch order.
    pub fn attach(&mut self, id: ElementId, behavior: Box<dyn Behavior>) -> Result<usize, SceneError> {
        let el = self.element_mut(id).ok_or(SceneError::Stale)?;
        el.behaviors.push(behavior);
        Ok(el.behaviors.len() - 1)
    }

    /// Number of behaviors attached to an element.
    pub fn behavior_count(&self, id: ElementId) -> usize {
        self.element(id).map(|el| el.behaviors.len()).unwrap_or(0)
    }

    /// Whether the element is active in the hierarchy and has at least one
    /// enabled behavior implementing `capability`.
    pub fn has_handler(&self, id: ElementId, capability: Capability) -> bool {
        if !self.is_active_and_enabled(id) {
            return false;
        }
        self.element(id).is_some_and(|el| {
            el.behaviors
                .iter()
                .any(|b| b.is_enabled() && b.capabilities().contains(capability))
        })
    }

    /// Collect indices of enabled behaviors implementing `capability`, in
    /// attachment order, into the caller's reusable buffer.
    ///
    /// Elements rarely carry more than a handful of behaviors, so the buffer
    /// is inline-first.
    pub fn collect_handler_indices(
        &self,
        id: ElementId,
        capability: Capability,
        out: &mut SmallVec<[usize; 4]>,
    ) {
        out.clear();
        if let Some(el) = self.element(id) {
            for (i, b) in el.behaviors.iter().enumerate() {
                if b.is_enabled() && b.capabilities().contains(capability) {
                    out.push(i);
                }
            }
        }
    }

    /// Run one attached behavior by index.
    ///
    /// Returns `None` when the id is stale or the index is out of range,
    /// otherwise the behavior's own result.
    pub fn run_behavior(
        &mut self,
        id: ElementId,
        index: usize,
        capability: Capability,
        event: &mut EventData,
    ) -> Option<Result<(), BehaviorFault>> {
        let el = self.element_mut(id)?;
        let behavior = el.behaviors.get_mut(index)?;
        Some(behavior.on_event(capability, event))
    }

    /// Set or clear the raycast group on an element. Stale ids are a no-op.
    pub fn set_group(&mut self, id: ElementId, group: Option<RaycastGroup>) {
        if let Some(el) = self.element_mut(id) {
            el.group = group;
        }
    }

    /// The raycast group attached to an element, if any.
    pub fn group_of(&self, id: ElementId) -> Option<RaycastGroup> {
        self.element(id).and_then(|el| el.group)
    }
}

/// Iterator over an element's strict ancestors, nearest first.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let cur = self.next?;
        self.next = self.scene.parent_of(cur);
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventData, SelectionEvent};

    struct Tag(Capability);

    impl Behavior for Tag {
        fn capabilities(&self) -> Capability {
            self.0
        }

        fn on_event(&mut self, _: Capability, _: &mut EventData) -> Result<(), BehaviorFault> {
            Ok(())
        }
    }

    #[test]
    fn insert_links_parent_and_children() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let b = scene.insert(Some(root));
        assert_eq!(scene.parent_of(a), Some(root));
        assert_eq!(scene.children_of(root), &[a, b]);
    }

    #[test]
    fn remove_frees_subtree_and_detects_stale_ids() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let leaf = scene.insert(Some(a));
        scene.remove(a);
        assert!(scene.is_alive(root));
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(leaf));
        assert_eq!(scene.children_of(root), &[]);
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut scene = Scene::new();
        let a = scene.insert(None);
        scene.remove(a);
        let b = scene.insert(None);
        assert_eq!(a.0, b.0, "slot should be reused");
        assert_ne!(a, b);
        assert!(!scene.is_alive(a));
        assert!(scene.is_alive(b));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let leaf = scene.insert(Some(a));
        assert_eq!(scene.reparent(root, Some(leaf)), Err(SceneError::WouldCycle));
        assert_eq!(scene.reparent(a, Some(a)), Err(SceneError::WouldCycle));
        assert_eq!(scene.reparent(leaf, Some(root)), Ok(()));
        assert_eq!(scene.parent_of(leaf), Some(root));
    }

    #[test]
    fn common_ancestor_is_inclusive() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let a1 = scene.insert(Some(a));
        let b = scene.insert(Some(root));
        assert_eq!(scene.common_ancestor(a1, b), Some(root));
        assert_eq!(scene.common_ancestor(a1, a), Some(a));
        assert_eq!(scene.common_ancestor(a, a), Some(a));
        let island = scene.insert(None);
        assert_eq!(scene.common_ancestor(a, island), None);
    }

    #[test]
    fn active_and_enabled_requires_active_ancestors() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let leaf = scene.insert(Some(a));
        assert!(scene.is_active_and_enabled(leaf));
        scene.set_active(a, false);
        assert!(scene.is_active_and_enabled(root));
        assert!(!scene.is_active_and_enabled(a));
        assert!(!scene.is_active_and_enabled(leaf));
    }

    #[test]
    fn handler_queries_respect_capability_sets_and_order() {
        let mut scene = Scene::new();
        let el = scene.insert(None);
        scene
            .attach(el, Box::new(Tag(Capability::CLICK | Capability::DOWN)))
            .unwrap();
        scene.attach(el, Box::new(Tag(Capability::DRAG))).unwrap();
        scene.attach(el, Box::new(Tag(Capability::CLICK))).unwrap();

        assert!(scene.has_handler(el, Capability::CLICK));
        assert!(!scene.has_handler(el, Capability::SCROLL));

        let mut indices = SmallVec::new();
        scene.collect_handler_indices(el, Capability::CLICK, &mut indices);
        assert_eq!(indices.as_slice(), &[0, 2]);
        scene.collect_handler_indices(el, Capability::DRAG, &mut indices);
        assert_eq!(indices.as_slice(), &[1], "buffer is cleared between collects");
    }

    #[test]
    fn inactive_elements_have_no_handlers() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let el = scene.insert(Some(root));
        scene.attach(el, Box::new(Tag(Capability::CLICK))).unwrap();
        assert!(scene.has_handler(el, Capability::CLICK));
        scene.set_active(root, false);
        assert!(!scene.has_handler(el, Capability::CLICK));
    }

    #[test]
    fn run_behavior_reaches_the_indexed_handler() {
        let mut scene = Scene::new();
        let el = scene.insert(None);
        scene.attach(el, Box::new(Tag(Capability::SELECT))).unwrap();
        let mut ev = EventData::Selection(SelectionEvent::default());
        assert!(matches!(
            scene.run_behavior(el, 0, Capability::SELECT, &mut ev),
            Some(Ok(()))
        ));
        assert!(scene.run_behavior(el, 1, Capability::SELECT, &mut ev).is_none());
    }
}
