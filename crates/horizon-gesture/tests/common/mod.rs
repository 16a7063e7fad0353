//! Shared harness for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use horizon_gesture::{
    GestureData, GestureEventData, GestureEventListener, GestureHandlerModule, GestureState,
    HandlerTag, ManualClock, Point, Pointer, PointerAction, PointerEvent, Size,
    TouchEventKind, TouchEventPayload, ViewNode, ViewTag, ViewTree,
};
use serde_json::Value;

pub const ROOT: ViewTag = 1;
/// 300x300 at the root origin.
pub const OUTER: ViewTag = 2;
/// 100x100 at (100, 100) inside `OUTER`.
pub const INNER: ViewTag = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    State {
        tag: HandlerTag,
        new: GestureState,
        old: GestureState,
    },
    Update {
        tag: HandlerTag,
        data: GestureData,
    },
    Touch {
        tag: HandlerTag,
        kind: TouchEventKind,
    },
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Recorded>,
}

impl GestureEventListener for Recorder {
    fn on_state_change(
        &mut self,
        event: &GestureEventData,
        new_state: GestureState,
        old_state: GestureState,
    ) {
        self.events.push(Recorded::State {
            tag: event.handler_tag,
            new: new_state,
            old: old_state,
        });
    }

    fn on_handler_update(&mut self, event: &GestureEventData) {
        self.events.push(Recorded::Update {
            tag: event.handler_tag,
            data: event.data,
        });
    }

    fn on_touch_event(&mut self, handler: HandlerTag, payload: &TouchEventPayload) {
        self.events.push(Recorded::Touch {
            tag: handler,
            kind: payload.kind,
        });
    }
}

pub struct Harness {
    pub module: GestureHandlerModule,
    pub clock: ManualClock,
    pub tree: ViewTree,
    pub recorder: Rc<RefCell<Recorder>>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();

        let clock = ManualClock::new();
        let mut module = GestureHandlerModule::with_clock(Arc::new(clock.clone()));
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        module.set_listener(Some(Box::new(recorder.clone())));
        module.register_root(ROOT).unwrap();

        let mut tree = ViewTree::new(ROOT, Size::new(400.0, 400.0));
        tree.insert(ROOT, ViewNode::new(OUTER, Point::ZERO, Size::new(300.0, 300.0)));
        tree.insert(
            OUTER,
            ViewNode::new(INNER, Point::new(100.0, 100.0), Size::new(100.0, 100.0)),
        );

        Self {
            module,
            clock,
            tree,
            recorder,
        }
    }

    pub fn create(&mut self, name: &str, tag: HandlerTag, view: ViewTag, config: Value) {
        self.module.create_gesture_handler(name, tag, &config).unwrap();
        self.module.attach_gesture_handler(tag, view).unwrap();
    }

    /// Move the clock to `millis` after the origin.
    pub fn at(&mut self, millis: u64) -> &mut Self {
        self.clock.set(Duration::from_millis(millis));
        self
    }

    pub fn send(&mut self, event: PointerEvent) -> &mut Self {
        self.module.handle_touch_event(ROOT, &self.tree, &event).unwrap();
        self
    }

    pub fn touch(&mut self, action: PointerAction, x: f32, y: f32) -> &mut Self {
        self.send(PointerEvent::single(action, Point::new(x, y)))
    }

    /// Send an event carrying pointers `0..points.len()`.
    pub fn multi(&mut self, action: PointerAction, action_index: usize, points: &[(f32, f32)]) -> &mut Self {
        let pointers = points
            .iter()
            .enumerate()
            .map(|(id, (x, y))| Pointer::new(id as u32, Point::new(*x, *y)))
            .collect();
        self.send(PointerEvent::new(action, action_index, pointers))
    }

    pub fn tick(&mut self) -> &mut Self {
        self.module.tick();
        self
    }

    pub fn state(&self, tag: HandlerTag) -> GestureState {
        self.module.handler(tag).map(|handler| handler.state()).unwrap()
    }

    /// Reported state changes of `tag`, as `(new, old)`.
    pub fn changes(&self, tag: HandlerTag) -> Vec<(GestureState, GestureState)> {
        self.recorder
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Recorded::State { tag: t, new, old } if *t == tag => Some((*new, *old)),
                _ => None,
            })
            .collect()
    }

    /// States reported for `tag`, in order.
    pub fn reported(&self, tag: HandlerTag) -> Vec<GestureState> {
        self.changes(tag).into_iter().map(|(new, _)| new).collect()
    }

    pub fn updates(&self, tag: HandlerTag) -> Vec<GestureData> {
        self.recorder
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Recorded::Update { tag: t, data } if *t == tag => Some(*data),
                _ => None,
            })
            .collect()
    }

    pub fn touches(&self, tag: HandlerTag) -> Vec<TouchEventKind> {
        self.recorder
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Recorded::Touch { tag: t, kind } if *t == tag => Some(*kind),
                _ => None,
            })
            .collect()
    }

    /// Largest number of handlers reported active at the same time.
    pub fn max_concurrently_active(&self) -> usize {
        let mut active = Vec::new();
        let mut max = 0;
        for event in &self.recorder.borrow().events {
            if let Recorded::State { tag, new, .. } = event {
                active.retain(|t| t != tag);
                if *new == GestureState::Active {
                    active.push(*tag);
                }
                max = max.max(active.len());
            }
        }
        max
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
