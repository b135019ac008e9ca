// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The standard pointer input module.

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Vec2;
use trellis_dispatch::Dispatcher;
use trellis_hit::{HitRecord, PointerSample};
use trellis_scene::{
    Capability, ElementId, EventData, PointerButton, PointerEvent, PointerId, Scene, MOUSE_LEFT,
};

use crate::source::{InputSource, TouchPhase};
use crate::state::{InputConfig, PointerState};

/// Services the coordinator exposes to input modules during a tick.
///
/// Modules never reach global state; everything they need from the
/// surrounding event system comes through this interface.
pub trait InputContext {
    /// Thresholds for drag starts and consecutive clicks.
    fn config(&self) -> &InputConfig;

    /// Run the aggregation pass for one sample; the result is sorted
    /// topmost-first and borrows the context's reusable buffer.
    fn hit_test(&mut self, scene: &Scene, sample: &PointerSample) -> &[HitRecord<ElementId>];

    /// The currently selected element.
    fn selected(&self) -> Option<ElementId>;

    /// Request a selection change. Returns whether the change was applied;
    /// a rejected (reentrant) request leaves the selection untouched.
    fn request_selection(&mut self, scene: &mut Scene, target: Option<ElementId>) -> bool;
}

/// An input module the coordinator can arbitrate between.
///
/// At most one module is active per tick; the first module reporting
/// [`should_activate`](Self::should_activate) wins.
pub trait InputModule {
    /// Whether this module has input to process this tick.
    fn should_activate(&mut self, source: &dyn InputSource) -> bool;

    /// Called when the module becomes the active one.
    fn activate(&mut self) {}

    /// Called when another module takes over; the module must leave the
    /// scene without lingering hover or press state.
    fn deactivate(&mut self, scene: &mut Scene, ctx: &mut dyn InputContext) {
        let _ = (scene, ctx);
    }

    /// Process this tick's input.
    fn tick(&mut self, scene: &mut Scene, ctx: &mut dyn InputContext, source: &dyn InputSource);
}

/// The standard mouse-and-touch pointer machine.
///
/// Owns one [`PointerState`] per logical pointer: the three reserved mouse
/// pointers persist across ticks, touch pointers live for the duration of
/// their contact. Every transition is delivered through a [`Dispatcher`], so
/// handler faults are isolated per behavior.
#[derive(Debug, Default)]
pub struct PointerModule {
    states: HashMap<PointerId, PointerState>,
    dispatcher: Dispatcher,
}

impl PointerModule {
    /// A module with no pointer state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a pointer, if it has one.
    pub fn state(&self, pointer: PointerId) -> Option<&PointerState> {
        self.states.get(&pointer)
    }

    fn payload(state: &PointerState) -> PointerEvent {
        let mut ev = PointerEvent::new(state.pointer);
        ev.button = state.button;
        ev.position = state.position;
        ev.delta = state.delta;
        ev.press_position = state.press_position;
        ev.click_count = state.click_count;
        ev.hovered = state.hovered;
        ev.pressed = state.pressed;
        ev.dragged = state.dragged;
        ev
    }

    /// Single-level delivery; payload mismatches are configuration errors and
    /// are logged rather than propagated into the tick.
    fn notify(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        data: &mut EventData,
        capability: Capability,
    ) -> bool {
        match self.dispatcher.dispatch(scene, target, data, capability) {
            Ok(handled) => handled,
            Err(err) => {
                tracing::error!(element = ?target, error = %err, "pointer dispatch misconfigured");
                false
            }
        }
    }

    fn bubble(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        data: &mut EventData,
        capability: Capability,
    ) -> Option<ElementId> {
        match self.dispatcher.dispatch_bubbling(scene, target, data, capability) {
            Ok(consumer) => consumer,
            Err(err) => {
                tracing::error!(element = ?target, error = %err, "pointer dispatch misconfigured");
                None
            }
        }
    }

    /// Exit the old branch up to (excluding) the common ancestor, then enter
    /// the new branch likewise, and rebuild the hover chain.
    fn update_hover(&mut self, scene: &mut Scene, state: &mut PointerState, target: Option<ElementId>) {
        let old = state.hovered;
        if old == target {
            return;
        }
        let common = match (old, target) {
            (Some(o), Some(n)) => scene.common_ancestor(o, n),
            _ => None,
        };
        let mut ev = Self::payload(state);
        ev.hovered = target;

        if let Some(old) = old {
            let mut cursor = Some(old);
            while let Some(element) = cursor {
                if Some(element) == common {
                    break;
                }
                let mut data = EventData::Pointer(ev.clone());
                self.notify(scene, element, &mut data, Capability::EXIT);
                cursor = scene.parent_of(element);
            }
        }
        if let Some(new) = target {
            let mut cursor = Some(new);
            while let Some(element) = cursor {
                if Some(element) == common {
                    break;
                }
                let mut data = EventData::Pointer(ev.clone());
                self.notify(scene, element, &mut data, Capability::ENTER);
                cursor = scene.parent_of(element);
            }
        }

        state.hovered = target;
        state.hover_chain.clear();
        if let Some(new) = target {
            state.hover_chain.push(new);
            state.hover_chain.extend(scene.ancestors(new));
        }
    }

    fn press(
        &mut self,
        scene: &mut Scene,
        ctx: &mut dyn InputContext,
        state: &mut PointerState,
        target: Option<ElementId>,
        time_ms: u64,
    ) {
        // Pressing away from the current selection clears it. The comparison
        // is against the nearest select-capable ancestor of the hit, so
        // pressing a child of the selected element keeps the selection.
        let select_target =
            target.and_then(|t| Dispatcher::handler_of(scene, t, Capability::SELECT));
        if ctx.selected().is_some() && select_target != ctx.selected() {
            ctx.request_selection(scene, None);
        }

        state.eligible_for_click = true;
        state.drag_active = false;
        let previous_press_position = state.last_press_position;
        state.press_position = state.position;
        state.raw_press = target;

        let mut pressed = None;
        if let Some(target) = target {
            let mut data = EventData::Pointer(Self::payload(state));
            pressed = self.bubble(scene, target, &mut data, Capability::DOWN);
            if pressed.is_none() {
                pressed = Dispatcher::handler_of(scene, target, Capability::CLICK);
            }
        }

        let config = ctx.config();
        let within_interval =
            time_ms.saturating_sub(state.click_time_ms) <= config.click_interval_ms;
        let within_radius =
            (state.position - previous_press_position).hypot() <= config.click_radius;
        if pressed.is_some() && pressed == state.last_pressed && within_interval && within_radius {
            state.click_count += 1;
        } else {
            state.click_count = 1;
        }
        state.click_time_ms = time_ms;
        state.last_press_position = state.position;
        state.pressed = pressed;
        state.last_pressed = pressed;

        // The drag target is resolved once, at press time.
        state.dragged = target.and_then(|t| {
            Dispatcher::handler_of(scene, t, Capability::DRAG)
                .or_else(|| Dispatcher::handler_of(scene, t, Capability::BEGIN_DRAG))
        });
    }

    fn drive_drag(&mut self, scene: &mut Scene, ctx: &mut dyn InputContext, state: &mut PointerState) {
        let Some(dragged) = state.dragged else {
            return;
        };
        if !state.drag_active {
            let travelled = (state.position - state.press_position).hypot();
            let past_threshold = match ctx.config().drag_threshold {
                Some(threshold) => travelled > threshold,
                None => true,
            };
            if !past_threshold {
                return;
            }
            // A press that resolved to a different element than the drag
            // target ends early: it gets its UP now and can no longer click.
            if state.pressed != Some(dragged) {
                if let Some(pressed) = state.pressed {
                    let mut data = EventData::Pointer(Self::payload(state));
                    self.notify(scene, pressed, &mut data, Capability::UP);
                }
                state.eligible_for_click = false;
                state.pressed = None;
            }
            let mut data = EventData::Pointer(Self::payload(state));
            self.notify(scene, dragged, &mut data, Capability::BEGIN_DRAG);
            state.drag_active = true;
        }
        let mut data = EventData::Pointer(Self::payload(state));
        self.notify(scene, dragged, &mut data, Capability::DRAG);
    }

    fn release(&mut self, scene: &mut Scene, state: &mut PointerState) {
        if let Some(pressed) = state.pressed {
            let mut data = EventData::Pointer(Self::payload(state));
            self.notify(scene, pressed, &mut data, Capability::UP);
        }

        let click_target = state
            .hovered
            .and_then(|h| Dispatcher::handler_of(scene, h, Capability::CLICK));
        match state.pressed {
            Some(pressed) if state.eligible_for_click && click_target == Some(pressed) => {
                let mut data = EventData::Pointer(Self::payload(state));
                self.notify(scene, pressed, &mut data, Capability::CLICK);
            }
            _ if state.drag_active => {
                if let Some(hovered) = state.hovered {
                    let mut data = EventData::Pointer(Self::payload(state));
                    self.bubble(scene, hovered, &mut data, Capability::DROP);
                }
            }
            _ => {}
        }

        if state.drag_active
            && let Some(dragged) = state.dragged
        {
            let mut data = EventData::Pointer(Self::payload(state));
            self.notify(scene, dragged, &mut data, Capability::END_DRAG);
        }

        state.pressed = None;
        state.dragged = None;
        state.drag_active = false;
        state.eligible_for_click = false;
    }

    fn send_scroll(&mut self, scene: &mut Scene, state: &PointerState, delta: Vec2) {
        let Some(hovered) = state.hovered else {
            return;
        };
        let mut ev = Self::payload(state);
        ev.scroll_delta = delta;
        let mut data = EventData::Pointer(ev);
        self.bubble(scene, hovered, &mut data, Capability::SCROLL);
    }

    fn process_mouse(
        &mut self,
        scene: &mut Scene,
        ctx: &mut dyn InputContext,
        source: &dyn InputSource,
    ) {
        let position = source.mouse_position();
        // One aggregation pass serves all three button pointers.
        let target = if source.pointer_locked() {
            None
        } else {
            let sample = PointerSample {
                pointer: MOUSE_LEFT,
                position,
                display: source.display(),
            };
            ctx.hit_test(scene, &sample).first().map(|r| r.target)
        };
        let time_ms = source.timestamp_ms();
        let scroll = source.scroll_delta();

        for button in [PointerButton::Left, PointerButton::Right, PointerButton::Middle] {
            let id = button.pointer_id();
            let mut state = self
                .states
                .remove(&id)
                .unwrap_or_else(|| PointerState::new(id, position));
            state.button = Some(button);
            state.advance_to(position);

            // Enter/exit is driven by the primary pointer only; the other
            // buttons track the target silently.
            if button == PointerButton::Left {
                self.update_hover(scene, &mut state, target);
            } else {
                state.hovered = target;
            }

            let sample = source.button(button);
            if sample.pressed {
                self.press(scene, ctx, &mut state, target, time_ms);
            }
            if sample.held {
                self.drive_drag(scene, ctx, &mut state);
            }
            if sample.released {
                self.release(scene, &mut state);
            }
            if button == PointerButton::Left && scroll != Vec2::ZERO {
                self.send_scroll(scene, &mut state, scroll);
            }

            self.states.insert(id, state);
        }
    }

    fn process_touches(
        &mut self,
        scene: &mut Scene,
        ctx: &mut dyn InputContext,
        source: &dyn InputSource,
    ) {
        for touch in source.touches() {
            let mut state = self
                .states
                .remove(&touch.id)
                .unwrap_or_else(|| PointerState::new(touch.id, touch.position));
            state.advance_to(touch.position);

            let sample = PointerSample {
                pointer: touch.id,
                position: touch.position,
                display: source.display(),
            };
            let target = ctx.hit_test(scene, &sample).first().map(|r| r.target);

            match touch.phase {
                TouchPhase::Began => {
                    self.update_hover(scene, &mut state, target);
                    self.press(scene, ctx, &mut state, target, source.timestamp_ms());
                    self.states.insert(touch.id, state);
                }
                TouchPhase::Moved | TouchPhase::Stationary => {
                    self.update_hover(scene, &mut state, target);
                    self.drive_drag(scene, ctx, &mut state);
                    self.states.insert(touch.id, state);
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    if touch.phase == TouchPhase::Cancelled {
                        state.eligible_for_click = false;
                    }
                    self.update_hover(scene, &mut state, target);
                    self.release(scene, &mut state);
                    self.update_hover(scene, &mut state, None);
                    // Touch state ends with the contact; the id may be reused
                    // by a later contact.
                }
            }
        }
    }
}

impl InputModule for PointerModule {
    fn should_activate(&mut self, source: &dyn InputSource) -> bool {
        let moved = self
            .states
            .get(&MOUSE_LEFT)
            .is_none_or(|s| s.position != source.mouse_position());
        moved
            || source.scroll_delta() != Vec2::ZERO
            || !source.touches().is_empty()
            || [PointerButton::Left, PointerButton::Right, PointerButton::Middle]
                .into_iter()
                .any(|b| {
                    let s = source.button(b);
                    s.pressed || s.released || s.held
                })
    }

    fn deactivate(&mut self, scene: &mut Scene, _ctx: &mut dyn InputContext) {
        let ids: Vec<PointerId> = self.states.keys().copied().collect();
        for id in ids {
            if let Some(mut state) = self.states.remove(&id) {
                state.eligible_for_click = false;
                // Only pointers that actually entered elements owe exits;
                // secondary buttons track the target without a chain.
                if state.hover_chain.is_empty() {
                    state.hovered = None;
                } else {
                    self.update_hover(scene, &mut state, None);
                }
                if state.pressed.is_some() || state.drag_active {
                    self.release(scene, &mut state);
                }
                // Mouse pointers persist across module switches.
                if id < 0 {
                    self.states.insert(id, state);
                }
            }
        }
    }

    fn tick(&mut self, scene: &mut Scene, ctx: &mut dyn InputContext, source: &dyn InputSource) {
        self.process_mouse(scene, ctx, source);
        self.process_touches(scene, ctx, source);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ButtonSample, Touch};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use kurbo::Point;
    use trellis_scene::{Behavior, BehaviorFault};

    type Log = Rc<RefCell<Vec<(&'static str, Capability)>>>;

    struct Recorder {
        tag: &'static str,
        caps: Capability,
        log: Log,
    }

    impl Behavior for Recorder {
        fn capabilities(&self) -> Capability {
            self.caps
        }

        fn on_event(&mut self, capability: Capability, _data: &mut EventData) -> Result<(), BehaviorFault> {
            self.log.borrow_mut().push((self.tag, capability));
            Ok(())
        }
    }

    fn attach(scene: &mut Scene, id: ElementId, tag: &'static str, caps: Capability, log: &Log) {
        scene
            .attach(
                id,
                alloc::boxed::Box::new(Recorder {
                    tag,
                    caps,
                    log: log.clone(),
                }),
            )
            .unwrap();
    }

    /// Scripted context: one fixed hit target, recorded selection requests.
    struct ScriptedCtx {
        config: InputConfig,
        target: Option<ElementId>,
        selected: Option<ElementId>,
        selection_requests: Vec<Option<ElementId>>,
        hits: Vec<HitRecord<ElementId>>,
    }

    impl ScriptedCtx {
        fn new() -> Self {
            Self {
                config: InputConfig::default(),
                target: None,
                selected: None,
                selection_requests: Vec::new(),
                hits: Vec::new(),
            }
        }
    }

    impl InputContext for ScriptedCtx {
        fn config(&self) -> &InputConfig {
            &self.config
        }

        fn hit_test(&mut self, _scene: &Scene, sample: &PointerSample) -> &[HitRecord<ElementId>] {
            self.hits.clear();
            if let Some(target) = self.target {
                let mut rec = HitRecord::new(target);
                rec.screen_position = sample.position;
                self.hits.push(rec);
            }
            &self.hits
        }

        fn selected(&self) -> Option<ElementId> {
            self.selected
        }

        fn request_selection(&mut self, _scene: &mut Scene, target: Option<ElementId>) -> bool {
            self.selection_requests.push(target);
            self.selected = target;
            true
        }
    }

    #[derive(Default)]
    struct TestSource {
        position: Point,
        left: ButtonSample,
        right: ButtonSample,
        middle: ButtonSample,
        scroll: Vec2,
        locked: bool,
        touches: Vec<Touch>,
        time: u64,
    }

    impl InputSource for TestSource {
        fn mouse_position(&self) -> Point {
            self.position
        }

        fn button(&self, button: PointerButton) -> ButtonSample {
            match button {
                PointerButton::Left => self.left,
                PointerButton::Right => self.right,
                PointerButton::Middle => self.middle,
            }
        }

        fn scroll_delta(&self) -> Vec2 {
            self.scroll
        }

        fn pointer_locked(&self) -> bool {
            self.locked
        }

        fn touches(&self) -> &[Touch] {
            &self.touches
        }

        fn timestamp_ms(&self) -> u64 {
            self.time
        }
    }

    fn press_frame(source: &mut TestSource) {
        source.left = ButtonSample {
            pressed: true,
            released: false,
            held: true,
        };
    }

    fn hold_frame(source: &mut TestSource) {
        source.left = ButtonSample {
            pressed: false,
            released: false,
            held: true,
        };
    }

    fn release_frame(source: &mut TestSource) {
        source.left = ButtonSample {
            pressed: false,
            released: true,
            held: false,
        };
    }

    #[test]
    fn hover_enters_and_exits_relative_to_common_ancestor() {
        let mut scene = Scene::new();
        let root = scene.insert(None);
        let a = scene.insert(Some(root));
        let a1 = scene.insert(Some(a));
        let b = scene.insert(Some(root));
        let log: Log = Rc::default();
        let caps = Capability::ENTER | Capability::EXIT;
        attach(&mut scene, root, "root", caps, &log);
        attach(&mut scene, a, "a", caps, &log);
        attach(&mut scene, a1, "a1", caps, &log);
        attach(&mut scene, b, "b", caps, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();

        ctx.target = Some(a1);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(
            log.borrow().as_slice(),
            [
                ("a1", Capability::ENTER),
                ("a", Capability::ENTER),
                ("root", Capability::ENTER),
            ]
        );
        assert_eq!(
            module.state(MOUSE_LEFT).unwrap().hover_chain.as_slice(),
            [a1, a, root]
        );

        log.borrow_mut().clear();
        ctx.target = Some(b);
        source.position = Point::new(1.0, 0.0);
        module.tick(&mut scene, &mut ctx, &source);
        // Exits stop below the common ancestor (root); enter covers b only.
        assert_eq!(
            log.borrow().as_slice(),
            [
                ("a1", Capability::EXIT),
                ("a", Capability::EXIT),
                ("b", Capability::ENTER),
            ]
        );
        assert_eq!(module.state(MOUSE_LEFT).unwrap().hover_chain.as_slice(), [b, root]);
    }

    #[test]
    fn press_prefers_the_down_consumer_over_the_click_handler() {
        let mut scene = Scene::new();
        let parent = scene.insert(None);
        let child = scene.insert(Some(parent));
        let log: Log = Rc::default();
        attach(&mut scene, parent, "parent", Capability::DOWN, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(child);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // The child has no DOWN handler; bubbling resolves to the parent.
        assert_eq!(module.state(MOUSE_LEFT).unwrap().pressed, Some(parent));
        assert_eq!(module.state(MOUSE_LEFT).unwrap().raw_press, Some(child));
        assert_eq!(log.borrow().as_slice(), [("parent", Capability::DOWN)]);
    }

    #[test]
    fn press_falls_back_to_the_nearest_click_handler() {
        let mut scene = Scene::new();
        let parent = scene.insert(None);
        let child = scene.insert(Some(parent));
        let log: Log = Rc::default();
        attach(&mut scene, parent, "parent", Capability::CLICK, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(child);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        assert_eq!(module.state(MOUSE_LEFT).unwrap().pressed, Some(parent));
    }

    #[test]
    fn click_fires_when_release_lands_on_the_pressed_target() {
        let mut scene = Scene::new();
        let button = scene.insert(None);
        let log: Log = Rc::default();
        attach(
            &mut scene,
            button,
            "button",
            Capability::DOWN | Capability::UP | Capability::CLICK,
            &log,
        );

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(button);

        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        assert_eq!(
            log.borrow().as_slice(),
            [
                ("button", Capability::DOWN),
                ("button", Capability::UP),
                ("button", Capability::CLICK),
            ]
        );
    }

    #[test]
    fn no_click_when_release_lands_elsewhere() {
        let mut scene = Scene::new();
        let button = scene.insert(None);
        let other = scene.insert(None);
        let log: Log = Rc::default();
        let caps = Capability::DOWN | Capability::UP | Capability::CLICK;
        attach(&mut scene, button, "button", caps, &log);
        attach(&mut scene, other, "other", caps, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(button);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        ctx.target = Some(other);
        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        assert!(
            !log.borrow().iter().any(|(_, cap)| *cap == Capability::CLICK),
            "release over a different element must not click"
        );
    }

    #[test]
    fn consecutive_clicks_count_within_interval_and_radius() {
        let mut scene = Scene::new();
        let button = scene.insert(None);
        let log: Log = Rc::default();
        attach(&mut scene, button, "button", Capability::CLICK, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(button);

        for time in [0, 100] {
            source.time = time;
            press_frame(&mut source);
            module.tick(&mut scene, &mut ctx, &source);
            release_frame(&mut source);
            module.tick(&mut scene, &mut ctx, &source);
        }
        assert_eq!(module.state(MOUSE_LEFT).unwrap().click_count, 2);

        // Too late: the interval has expired.
        source.time = 1000;
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(module.state(MOUSE_LEFT).unwrap().click_count, 1);
        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // Too far: outside the click radius.
        source.time = 1100;
        source.position = Point::new(500.0, 0.0);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(module.state(MOUSE_LEFT).unwrap().click_count, 1);
    }

    #[test]
    fn drag_starts_only_past_the_threshold() {
        let mut scene = Scene::new();
        let pane = scene.insert(None);
        let log: Log = Rc::default();
        attach(
            &mut scene,
            pane,
            "pane",
            Capability::BEGIN_DRAG | Capability::DRAG | Capability::END_DRAG,
            &log,
        );

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(pane);

        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // 2px of travel with a 10px threshold: no drag yet.
        source.position = Point::new(2.0, 0.0);
        hold_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert!(log.borrow().is_empty());
        assert!(!module.state(MOUSE_LEFT).unwrap().drag_active);

        // 12px of travel: the drag starts and runs every held tick.
        source.position = Point::new(12.0, 0.0);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(
            log.borrow().as_slice(),
            [("pane", Capability::BEGIN_DRAG), ("pane", Capability::DRAG)]
        );
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().last(), Some(&("pane", Capability::DRAG)));

        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().last(), Some(&("pane", Capability::END_DRAG)));
        assert!(!module.state(MOUSE_LEFT).unwrap().drag_active);
    }

    #[test]
    fn disabled_threshold_starts_the_drag_immediately() {
        let mut scene = Scene::new();
        let pane = scene.insert(None);
        let log: Log = Rc::default();
        attach(&mut scene, pane, "pane", Capability::BEGIN_DRAG | Capability::DRAG, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        ctx.config.drag_threshold = None;
        let mut source = TestSource::default();
        ctx.target = Some(pane);

        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().first(), Some(&("pane", Capability::BEGIN_DRAG)));
    }

    #[test]
    fn drag_on_an_ancestor_synthesizes_up_and_cancels_the_click() {
        let mut scene = Scene::new();
        let pane = scene.insert(None);
        let button = scene.insert(Some(pane));
        let log: Log = Rc::default();
        attach(
            &mut scene,
            button,
            "button",
            Capability::DOWN | Capability::UP | Capability::CLICK,
            &log,
        );
        attach(&mut scene, pane, "pane", Capability::BEGIN_DRAG | Capability::DRAG, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(button);

        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        source.position = Point::new(50.0, 0.0);
        hold_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // The press target got its UP when the drag took over.
        assert_eq!(
            log.borrow().as_slice(),
            [
                ("button", Capability::DOWN),
                ("button", Capability::UP),
                ("pane", Capability::BEGIN_DRAG),
                ("pane", Capability::DRAG),
            ]
        );

        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert!(
            !log.borrow().iter().any(|(_, cap)| *cap == Capability::CLICK),
            "a press that turned into a drag elsewhere must not click"
        );
    }

    #[test]
    fn release_while_dragging_drops_on_the_hovered_element() {
        let mut scene = Scene::new();
        let item = scene.insert(None);
        let bin = scene.insert(None);
        let log: Log = Rc::default();
        attach(
            &mut scene,
            item,
            "item",
            Capability::BEGIN_DRAG | Capability::DRAG | Capability::END_DRAG,
            &log,
        );
        attach(&mut scene, bin, "bin", Capability::DROP, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(item);

        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        source.position = Point::new(100.0, 0.0);
        hold_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // Release over the bin.
        ctx.target = Some(bin);
        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        let log = log.borrow();
        let drop_at = log.iter().position(|e| *e == ("bin", Capability::DROP));
        let end_at = log.iter().position(|e| *e == ("item", Capability::END_DRAG));
        assert!(drop_at.is_some(), "drop must reach the hovered element");
        assert!(drop_at < end_at, "drop precedes end-drag");
    }

    #[test]
    fn scroll_bubbles_from_the_hovered_element() {
        let mut scene = Scene::new();
        let list = scene.insert(None);
        let row = scene.insert(Some(list));
        let log: Log = Rc::default();
        attach(&mut scene, list, "list", Capability::SCROLL, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(row);

        source.scroll = Vec2::new(0.0, -3.0);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().as_slice(), [("list", Capability::SCROLL)]);
    }

    #[test]
    fn pointer_lock_hovers_nothing() {
        let mut scene = Scene::new();
        let el = scene.insert(None);
        let log: Log = Rc::default();
        attach(&mut scene, el, "el", Capability::ENTER | Capability::EXIT, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        ctx.target = Some(el);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().as_slice(), [("el", Capability::ENTER)]);

        source.locked = true;
        source.position = Point::new(1.0, 0.0);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(log.borrow().last(), Some(&("el", Capability::EXIT)));
        assert_eq!(module.state(MOUSE_LEFT).unwrap().hovered, None);
    }

    #[test]
    fn pressing_away_from_the_selection_clears_it() {
        let mut scene = Scene::new();
        let field = scene.insert(None);
        let elsewhere = scene.insert(None);
        let log: Log = Rc::default();
        attach(&mut scene, field, "field", Capability::SELECT, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        ctx.selected = Some(field);
        let mut source = TestSource::default();

        // Pressing the selected element (its select handler) keeps it.
        ctx.target = Some(field);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert!(ctx.selection_requests.is_empty());
        release_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);

        // Pressing elsewhere clears it.
        ctx.target = Some(elsewhere);
        press_frame(&mut source);
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(ctx.selection_requests.as_slice(), [None]);
    }

    #[test]
    fn touch_contact_lives_from_began_to_ended() {
        let mut scene = Scene::new();
        let el = scene.insert(None);
        let log: Log = Rc::default();
        attach(
            &mut scene,
            el,
            "el",
            Capability::ENTER | Capability::EXIT | Capability::DOWN | Capability::UP | Capability::CLICK,
            &log,
        );

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let mut source = TestSource::default();
        // Keep the mouse pointer out of the way of the touch assertions.
        source.locked = true;
        ctx.target = Some(el);

        source.touches = vec![Touch {
            id: 0,
            position: Point::new(5.0, 5.0),
            phase: TouchPhase::Began,
        }];
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(
            log.borrow().as_slice(),
            [("el", Capability::ENTER), ("el", Capability::DOWN)]
        );
        assert!(module.state(0).is_some());

        source.touches = vec![Touch {
            id: 0,
            position: Point::new(5.0, 5.0),
            phase: TouchPhase::Ended,
        }];
        module.tick(&mut scene, &mut ctx, &source);
        assert_eq!(
            &log.borrow()[2..],
            [
                ("el", Capability::UP),
                ("el", Capability::CLICK),
                ("el", Capability::EXIT),
            ]
        );
        assert!(module.state(0).is_none(), "touch state ends with the contact");
    }

    #[test]
    fn deactivation_exits_hover_but_keeps_mouse_state() {
        let mut scene = Scene::new();
        let el = scene.insert(None);
        let log: Log = Rc::default();
        attach(&mut scene, el, "el", Capability::ENTER | Capability::EXIT, &log);

        let mut module = PointerModule::new();
        let mut ctx = ScriptedCtx::new();
        let source = TestSource::default();
        ctx.target = Some(el);
        module.tick(&mut scene, &mut ctx, &source);

        module.deactivate(&mut scene, &mut ctx);
        assert_eq!(log.borrow().last(), Some(&("el", Capability::EXIT)));
        assert!(module.state(MOUSE_LEFT).is_some());
        assert_eq!(module.state(MOUSE_LEFT).unwrap().hovered, None);
    }
}
