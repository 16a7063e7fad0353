//! Per-handler pointer tracking and raw touch payloads.
//!
//! A handler only sees pointers that went down inside its bounds. Those
//! pointers are given compact local ids, in the order they were tracked, and
//! every event is adapted to contain only them.

use horizon_gesture_core::{HandlerTag, Point};
use tracing::warn;

use crate::event::{Pointer, PointerAction, PointerEvent};

/// Maximum number of simultaneously tracked pointers.
pub const MAX_POINTERS_COUNT: usize = 12;

/// Pointer ids tracked by one handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedPointers {
    // Indexed by pointer id; holds the local id.
    local_ids: [Option<u32>; MAX_POINTERS_COUNT],
    count: usize,
}

impl TrackedPointers {
    /// Start tracking `pointer_id`. Already tracked ids are ignored.
    pub fn start_tracking(&mut self, handler: HandlerTag, pointer_id: u32) {
        let Some(slot) = self.local_ids.get(pointer_id as usize) else {
            warn!(
                target: horizon_gesture_core::logging::targets::HANDLER,
                handler,
                pointer_id,
                "pointer id out of range, not tracked"
            );
            return;
        };
        if slot.is_some() {
            return;
        }
        let local = self.next_free_local_id();
        self.local_ids[pointer_id as usize] = Some(local);
        self.count += 1;
    }

    /// Stop tracking `pointer_id`. Untracked ids are ignored.
    pub fn stop_tracking(&mut self, pointer_id: u32) {
        if let Some(slot) = self.local_ids.get_mut(pointer_id as usize)
            && slot.take().is_some()
        {
            self.count -= 1;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_tracking(&self, pointer_id: u32) -> bool {
        self.local_id(pointer_id).is_some()
    }

    pub fn local_id(&self, pointer_id: u32) -> Option<u32> {
        self.local_ids.get(pointer_id as usize).copied().flatten()
    }

    /// Whether both sets share at least one pointer.
    pub fn has_common(&self, other: &TrackedPointers) -> bool {
        self.local_ids
            .iter()
            .zip(other.local_ids.iter())
            .any(|(a, b)| a.is_some() && b.is_some())
    }

    fn next_free_local_id(&self) -> u32 {
        (0..MAX_POINTERS_COUNT as u32)
            .find(|candidate| !self.local_ids.contains(&Some(*candidate)))
            .unwrap_or(0)
    }

    /// Restrict `event` to tracked pointers and renumber them.
    ///
    /// A down or up of an untracked pointer becomes a move, so handlers
    /// never see pointers that started outside them.
    pub fn adapt(&self, event: &PointerEvent) -> PointerEvent {
        let mut pointers = Vec::with_capacity(self.count);
        let mut action_index = None;
        for (index, pointer) in event.pointers.iter().enumerate() {
            if let Some(local) = self.local_id(pointer.id) {
                if index == event.action_index {
                    action_index = Some(pointers.len());
                }
                pointers.push(Pointer {
                    id: local,
                    ..*pointer
                });
            }
        }

        let action = match (event.action, action_index) {
            (PointerAction::Move | PointerAction::Cancel, _) => event.action,
            (action, Some(_)) => {
                // A handler that sees a single pointer sees a full down/up.
                match action {
                    PointerAction::PointerDown if pointers.len() == 1 => PointerAction::Down,
                    PointerAction::PointerUp if pointers.len() == 1 => PointerAction::Up,
                    other => other,
                }
            }
            (_, None) => PointerAction::Move,
        };

        PointerEvent {
            action,
            action_index: action_index.unwrap_or(0),
            pointers,
        }
    }
}

/// Phase of a raw touch payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchEventKind {
    Down,
    Move,
    Up,
    Cancelled,
}

/// One pointer inside a touch payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerData {
    /// Local pointer id.
    pub id: u32,
    /// Position in the handler's view.
    pub position: Point,
    /// Position in screen coordinates.
    pub absolute: Point,
}

impl From<&Pointer> for PointerData {
    fn from(pointer: &Pointer) -> Self {
        Self {
            id: pointer.id,
            position: pointer.position,
            absolute: pointer.raw,
        }
    }
}

/// Raw touch data reported to handlers that request pointer data.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEventPayload {
    pub kind: TouchEventKind,
    /// Pointers this payload is about.
    pub changed: Vec<PointerData>,
    /// Every pointer the handler tracks, including changed ones.
    pub all: Vec<PointerData>,
}

/// Last known data of each tracked pointer, for building payloads.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerDataTracker {
    pointers: [Option<PointerData>; MAX_POINTERS_COUNT],
}

impl PointerDataTracker {
    fn all(&self) -> Vec<PointerData> {
        self.pointers.iter().flatten().copied().collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pointers.iter().all(Option::is_none)
    }

    pub(crate) fn clear(&mut self) {
        self.pointers = Default::default();
    }

    fn store(&mut self, data: PointerData) {
        if let Some(slot) = self.pointers.get_mut(data.id as usize) {
            *slot = Some(data);
        }
    }

    /// Payloads describing `event`, which must already be adapted.
    pub(crate) fn update(&mut self, event: &PointerEvent) -> Vec<TouchEventPayload> {
        let mut payloads = Vec::new();
        match event.action {
            PointerAction::Down | PointerAction::PointerDown => {
                if let Some(pointer) = event.action_pointer() {
                    let data = PointerData::from(pointer);
                    self.store(data);
                    payloads.push(TouchEventPayload {
                        kind: TouchEventKind::Down,
                        changed: vec![data],
                        all: self.all(),
                    });
                }
                payloads.extend(self.moved(event));
            }
            PointerAction::Up | PointerAction::PointerUp => {
                payloads.extend(self.moved(event));
                if let Some(pointer) = event.action_pointer() {
                    let data = PointerData::from(pointer);
                    self.store(data);
                    payloads.push(TouchEventPayload {
                        kind: TouchEventKind::Up,
                        changed: vec![data],
                        all: self.all(),
                    });
                    if let Some(slot) = self.pointers.get_mut(data.id as usize) {
                        *slot = None;
                    }
                }
            }
            PointerAction::Move => payloads.extend(self.moved(event)),
            PointerAction::Cancel => payloads.extend(self.cancel()),
        }
        payloads
    }

    /// A cancellation payload for every pointer still down.
    pub(crate) fn cancel(&mut self) -> Option<TouchEventPayload> {
        if self.is_empty() {
            return None;
        }
        let all = self.all();
        self.clear();
        Some(TouchEventPayload {
            kind: TouchEventKind::Cancelled,
            changed: all.clone(),
            all,
        })
    }

    fn moved(&mut self, event: &PointerEvent) -> Option<TouchEventPayload> {
        let mut changed = Vec::new();
        for (index, pointer) in event.pointers.iter().enumerate() {
            if index == event.action_index && event.action != PointerAction::Move {
                continue;
            }
            let data = PointerData::from(pointer);
            let previous = self.pointers.get(data.id as usize).copied().flatten();
            if let Some(previous) = previous
                && previous.position != data.position
            {
                self.store(data);
                changed.push(data);
            }
        }
        (!changed.is_empty()).then(|| TouchEventPayload {
            kind: TouchEventKind::Move,
            changed,
            all: self.all(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: PointerAction, action_index: usize, ids: &[u32]) -> PointerEvent {
        PointerEvent::new(
            action,
            action_index,
            ids.iter()
                .map(|id| Pointer::new(*id, Point::new(*id as f32 * 10.0, 0.0)))
                .collect(),
        )
    }

    #[test]
    fn test_tracking_assigns_compact_local_ids() {
        let mut tracked = TrackedPointers::default();
        tracked.start_tracking(1, 7);
        tracked.start_tracking(1, 2);
        tracked.start_tracking(1, 7);

        assert_eq!(tracked.count(), 2);
        assert_eq!(tracked.local_id(7), Some(0));
        assert_eq!(tracked.local_id(2), Some(1));

        tracked.stop_tracking(7);
        tracked.start_tracking(1, 4);
        assert_eq!(tracked.local_id(4), Some(0));
    }

    #[test]
    fn test_out_of_range_pointer_ignored() {
        let mut tracked = TrackedPointers::default();
        tracked.start_tracking(1, 40);
        assert_eq!(tracked.count(), 0);
        tracked.stop_tracking(40);
        assert_eq!(tracked.count(), 0);
    }

    #[test]
    fn test_adapt_filters_and_remaps() {
        let mut tracked = TrackedPointers::default();
        tracked.start_tracking(1, 3);

        let adapted = tracked.adapt(&event(PointerAction::PointerDown, 1, &[3, 5]));
        assert_eq!(adapted.action, PointerAction::Move);
        assert_eq!(adapted.pointers.len(), 1);
        assert_eq!(adapted.pointers[0].id, 0);
        assert_eq!(adapted.pointers[0].position, Point::new(30.0, 0.0));

        let adapted = tracked.adapt(&event(PointerAction::PointerUp, 0, &[3, 5]));
        assert_eq!(adapted.action, PointerAction::Up);
    }

    #[test]
    fn test_common_pointers() {
        let mut a = TrackedPointers::default();
        let mut b = TrackedPointers::default();
        a.start_tracking(1, 0);
        b.start_tracking(2, 1);
        assert!(!a.has_common(&b));

        b.start_tracking(2, 0);
        assert!(a.has_common(&b));
    }

    #[test]
    fn test_payload_sequence() {
        let mut tracker = PointerDataTracker::default();

        let down = tracker.update(&event(PointerAction::Down, 0, &[0]));
        assert_eq!(down.len(), 1);
        assert_eq!(down[0].kind, TouchEventKind::Down);

        let second = tracker.update(&event(PointerAction::PointerDown, 1, &[0, 1]));
        assert_eq!(second[0].all.len(), 2);

        let up = tracker.update(&event(PointerAction::PointerUp, 1, &[0, 1]));
        assert_eq!(up.last().map(|p| p.kind), Some(TouchEventKind::Up));

        let cancelled = tracker.cancel().unwrap();
        assert_eq!(cancelled.kind, TouchEventKind::Cancelled);
        assert_eq!(cancelled.changed.len(), 1);
        assert!(tracker.cancel().is_none());
    }
}
