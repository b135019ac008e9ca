// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The event coordinator: one explicit context object tying hit-test
//! providers, input modules, and selection together.
//!
//! A [`Coordinator`] owns the provider [`Registry`], the module list, the
//! reusable aggregation buffer, and the selected element. Hosts call
//! [`Coordinator::tick`] once per frame with the current [`InputSource`]
//! snapshot; the coordinator arbitrates which module is active and hands it
//! the scene plus itself as the module's [`InputContext`].
//!
//! Selection changes run under an explicit two-state guard: a change
//! requested while another is still delivering its notifications is rejected
//! with [`SelectionError::Reentrant`] and leaves the selection untouched.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::mem;

use trellis_dispatch::Dispatcher;
use trellis_hit::{HitRecord, PointerSample, ProviderId, Raycaster, Registry};
use trellis_pointer::{InputConfig, InputContext, InputModule, InputSource};
use trellis_scene::{Capability, CommandEvent, ElementId, EventData, Scene, SelectionEvent};

/// Failure to apply a selection change.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A change was requested while another change was still delivering its
    /// select/deselect notifications.
    #[error("selection change rejected: another change is in progress")]
    Reentrant,
}

/// Phase of the selection guard.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SelectionGuard {
    Idle,
    Mutating,
}

/// The event system's context object.
///
/// There is no global instance; hosts create one per scene (or per window)
/// and pass it explicitly. Modules see it only as their [`InputContext`].
pub struct Coordinator {
    registry: Registry<ElementId, Scene>,
    modules: Vec<Box<dyn InputModule>>,
    active_module: Option<usize>,
    hits: Vec<HitRecord<ElementId>>,
    dispatcher: Dispatcher,
    config: InputConfig,
    selected: Option<ElementId>,
    guard: SelectionGuard,
}

impl core::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Coordinator")
            .field("registry", &self.registry)
            .field("modules", &self.modules.len())
            .field("active_module", &self.active_module)
            .field("config", &self.config)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// A coordinator with default thresholds, no providers, and no modules.
    pub fn new() -> Self {
        Self::with_config(InputConfig::default())
    }

    /// A coordinator with explicit thresholds.
    pub fn with_config(config: InputConfig) -> Self {
        Self {
            registry: Registry::new(),
            modules: Vec::new(),
            active_module: None,
            hits: Vec::new(),
            dispatcher: Dispatcher::new(),
            config,
            selected: None,
            guard: SelectionGuard::Idle,
        }
    }

    /// Current thresholds.
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Mutable thresholds.
    pub fn config_mut(&mut self) -> &mut InputConfig {
        &mut self.config
    }

    /// Register a hit-test provider.
    pub fn register_provider(
        &mut self,
        provider: Box<dyn Raycaster<ElementId, Scene>>,
    ) -> ProviderId {
        self.registry.register(provider)
    }

    /// Remove a hit-test provider. Returns whether it was registered.
    pub fn unregister_provider(&mut self, id: ProviderId) -> bool {
        self.registry.unregister(id)
    }

    /// Append an input module. Earlier modules win arbitration ties.
    pub fn add_module(&mut self, module: Box<dyn InputModule>) {
        self.modules.push(module);
    }

    /// Remove the module at `index`, deactivating it first when it is the
    /// active one.
    pub fn remove_module(
        &mut self,
        scene: &mut Scene,
        index: usize,
    ) -> Option<Box<dyn InputModule>> {
        if index >= self.modules.len() {
            return None;
        }
        let mut modules = mem::take(&mut self.modules);
        if self.active_module == Some(index) {
            modules[index].deactivate(scene, self);
            self.active_module = None;
        } else if let Some(active) = self.active_module
            && active > index
        {
            self.active_module = Some(active - 1);
        }
        let removed = modules.remove(index);
        self.modules = modules;
        Some(removed)
    }

    /// Run one aggregation pass over all providers for `sample`.
    ///
    /// The result borrows the coordinator's reusable buffer and is sorted
    /// topmost-first.
    pub fn aggregate(&mut self, scene: &Scene, sample: &PointerSample) -> &[HitRecord<ElementId>] {
        self.registry.aggregate(scene, sample, &mut self.hits)
    }

    /// The currently selected element.
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Change the selection, notifying the outgoing element with DESELECT and
    /// the incoming one with SELECT.
    ///
    /// The selection is updated between the two notifications, so a DESELECT
    /// handler already observes the old element as unselected. A reentrant
    /// call is rejected and changes nothing.
    pub fn set_selected(
        &mut self,
        scene: &mut Scene,
        target: Option<ElementId>,
    ) -> Result<(), SelectionError> {
        if self.guard == SelectionGuard::Mutating {
            tracing::error!(
                current = ?self.selected,
                requested = ?target,
                "reentrant selection change rejected"
            );
            return Err(SelectionError::Reentrant);
        }
        if target == self.selected {
            return Ok(());
        }

        self.guard = SelectionGuard::Mutating;
        let ev = SelectionEvent {
            outgoing: self.selected,
            incoming: target,
        };
        if let Some(outgoing) = self.selected {
            let mut data = EventData::Selection(ev);
            if let Err(err) =
                self.dispatcher
                    .dispatch(scene, outgoing, &mut data, Capability::DESELECT)
            {
                tracing::error!(element = ?outgoing, error = %err, "deselect dispatch failed");
            }
        }
        self.selected = target;
        if let Some(incoming) = target {
            let mut data = EventData::Selection(ev);
            if let Err(err) =
                self.dispatcher
                    .dispatch(scene, incoming, &mut data, Capability::SELECT)
            {
                tracing::error!(element = ?incoming, error = %err, "select dispatch failed");
            }
        }
        self.guard = SelectionGuard::Idle;
        Ok(())
    }

    /// Route a command (move/submit/cancel) to the selected element, bubbling
    /// to its nearest implementing ancestor.
    ///
    /// Returns the element that handled it, or `None` when nothing is
    /// selected or nothing in the chain implements the capability.
    pub fn send_command(&mut self, scene: &mut Scene, command: CommandEvent) -> Option<ElementId> {
        let selected = self.selected?;
        let capability = match command {
            CommandEvent::Move(_) => Capability::MOVE,
            CommandEvent::Submit => Capability::SUBMIT,
            CommandEvent::Cancel => Capability::CANCEL,
        };
        let mut data = EventData::Command(command);
        match self
            .dispatcher
            .dispatch_bubbling(scene, selected, &mut data, capability)
        {
            Ok(consumer) => consumer,
            Err(err) => {
                tracing::error!(element = ?selected, error = %err, "command dispatch failed");
                None
            }
        }
    }

    /// Process one frame of input.
    ///
    /// Arbitration first: the first module reporting
    /// [`should_activate`](InputModule::should_activate) becomes the active
    /// module, deactivating the previous one. When no module claims the tick
    /// the current active module stays. The active module then ticks with
    /// this coordinator as its context.
    pub fn tick(&mut self, scene: &mut Scene, source: &dyn InputSource) {
        let mut modules = mem::take(&mut self.modules);

        let claimant = modules.iter_mut().position(|m| m.should_activate(source));
        if let Some(next) = claimant
            && self.active_module != Some(next)
        {
            if let Some(current) = self.active_module
                && current < modules.len()
            {
                modules[current].deactivate(scene, self);
            }
            modules[next].activate();
            self.active_module = Some(next);
        }

        if let Some(active) = self.active_module
            && active < modules.len()
        {
            modules[active].tick(scene, self, source);
        }

        self.modules = modules;
    }
}

impl InputContext for Coordinator {
    fn config(&self) -> &InputConfig {
        &self.config
    }

    fn hit_test(&mut self, scene: &Scene, sample: &PointerSample) -> &[HitRecord<ElementId>] {
        self.registry.aggregate(scene, sample, &mut self.hits)
    }

    fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    fn request_selection(&mut self, scene: &mut Scene, target: Option<ElementId>) -> bool {
        self.set_selected(scene, target).is_ok()
    }
}
