// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A complete pointer pipeline: scene + overlay canvas + coordinator.
//!
//! This example shows how to combine:
//! - `trellis_scene` for the element tree and attached behaviors,
//! - `trellis_canvas` as the hit-test provider over screen-space rects,
//! - `trellis_events` + `trellis_pointer` to turn scripted mouse frames
//!   into enter/exit, press, click, and drag notifications.
//!
//! Run:
//! - `cargo run -p trellis_demos --example pointer_canvas`

use kurbo::{Point, Rect, Vec2};
use trellis_canvas::{CanvasConfig, CanvasRaycaster, Graphic};
use trellis_events::Coordinator;
use trellis_pointer::{ButtonSample, InputSource, PointerModule, Touch};
use trellis_scene::{Behavior, BehaviorFault, Capability, EventData, PointerButton, Scene};

/// Prints every notification it receives.
struct Echo {
    name: &'static str,
    caps: Capability,
}

impl Behavior for Echo {
    fn capabilities(&self) -> Capability {
        self.caps
    }

    fn on_event(&mut self, capability: Capability, data: &mut EventData) -> Result<(), BehaviorFault> {
        if let Some(ev) = data.as_pointer() {
            println!(
                "  {:<8} {:?} @ ({:.0}, {:.0})",
                self.name, capability, ev.position.x, ev.position.y
            );
        } else {
            println!("  {:<8} {capability:?}", self.name);
        }
        Ok(())
    }
}

/// One scripted frame of mouse input.
struct ScriptedSource {
    position: Point,
    left: ButtonSample,
    time: u64,
}

impl InputSource for ScriptedSource {
    fn mouse_position(&self) -> Point {
        self.position
    }

    fn button(&self, button: PointerButton) -> ButtonSample {
        if button == PointerButton::Left {
            self.left
        } else {
            ButtonSample::default()
        }
    }

    fn scroll_delta(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn touches(&self) -> &[Touch] {
        &[]
    }

    fn timestamp_ms(&self) -> u64 {
        self.time
    }
}

fn main() {
    // A panel holding a button and a draggable slider knob.
    let mut scene = Scene::new();
    let panel = scene.insert(None);
    let button = scene.insert(Some(panel));
    let knob = scene.insert(Some(panel));

    scene
        .attach(
            panel,
            Box::new(Echo {
                name: "panel",
                caps: Capability::ENTER | Capability::EXIT,
            }),
        )
        .unwrap();
    scene
        .attach(
            button,
            Box::new(Echo {
                name: "button",
                caps: Capability::ENTER
                    | Capability::EXIT
                    | Capability::DOWN
                    | Capability::UP
                    | Capability::CLICK,
            }),
        )
        .unwrap();
    scene
        .attach(
            knob,
            Box::new(Echo {
                name: "knob",
                caps: Capability::BEGIN_DRAG | Capability::DRAG | Capability::END_DRAG,
            }),
        )
        .unwrap();

    // An overlay canvas: screen space is world space, distances are zero.
    let mut canvas = CanvasRaycaster::new(CanvasConfig::default());
    canvas.upsert_graphic(Graphic::new(panel, Rect::new(0.0, 0.0, 400.0, 300.0)));
    let mut g = Graphic::new(button, Rect::new(20.0, 220.0, 180.0, 280.0));
    g.draw_depth = 1;
    canvas.upsert_graphic(g);
    let mut g = Graphic::new(knob, Rect::new(220.0, 100.0, 260.0, 140.0));
    g.draw_depth = 1;
    canvas.upsert_graphic(g);

    let mut coordinator = Coordinator::new();
    coordinator.register_provider(Box::new(canvas));
    coordinator.add_module(Box::new(PointerModule::new()));

    let idle = ButtonSample::default();
    let pressed = ButtonSample {
        pressed: true,
        released: false,
        held: true,
    };
    let held = ButtonSample {
        pressed: false,
        released: false,
        held: true,
    };
    let released = ButtonSample {
        pressed: false,
        released: true,
        held: false,
    };

    let frames = [
        ("hover the panel", Point::new(200.0, 50.0), idle),
        ("hover the button", Point::new(100.0, 250.0), idle),
        ("press", Point::new(100.0, 250.0), pressed),
        ("release (click)", Point::new(100.0, 250.0), released),
        ("hover the knob", Point::new(240.0, 120.0), idle),
        ("press the knob", Point::new(240.0, 120.0), pressed),
        ("drag it right", Point::new(300.0, 120.0), held),
        ("keep dragging", Point::new(340.0, 120.0), held),
        ("drop", Point::new(340.0, 120.0), released),
    ];

    for (i, (label, position, left)) in frames.into_iter().enumerate() {
        println!("\n== Frame {i}: {label} ==");
        let source = ScriptedSource {
            position,
            left,
            time: i as u64 * 16,
        };
        coordinator.tick(&mut scene, &source);
    }
}
