//! Pointer events delivered to orchestrators.
//!
//! Events use a multi-pointer model: every event carries the full set of
//! pointers currently down, and the pointer whose status changed is named by
//! `action_index`. Positions are in root coordinates when the host hands the
//! event over; the orchestrator translates them into each handler's view
//! before delivery. Raw positions are screen coordinates and never change.

use horizon_gesture_core::Point;

/// What happened to the pointer at `action_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerAction {
    /// First pointer went down.
    Down,
    /// One or more pointers moved.
    Move,
    /// Last pointer went up.
    Up,
    /// An additional pointer went down.
    PointerDown,
    /// A pointer other than the last went up.
    PointerUp,
    /// The host aborted the touch stream.
    Cancel,
}

impl PointerAction {
    /// Whether the action adds a pointer to the stream.
    pub fn is_down(self) -> bool {
        matches!(self, Self::Down | Self::PointerDown)
    }

    /// Whether the action removes a pointer from the stream.
    pub fn is_up(self) -> bool {
        matches!(self, Self::Up | Self::PointerUp)
    }
}

/// A single pointer within an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Identifier, stable for the lifetime of the pointer.
    pub id: u32,
    /// Position in the coordinate space of the receiver.
    pub position: Point,
    /// Position in screen coordinates.
    pub raw: Point,
}

impl Pointer {
    /// A pointer whose screen and local positions coincide.
    pub fn new(id: u32, position: Point) -> Self {
        Self {
            id,
            position,
            raw: position,
        }
    }

    /// A pointer with a distinct screen position.
    pub fn with_raw(id: u32, position: Point, raw: Point) -> Self {
        Self { id, position, raw }
    }
}

/// A pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// What happened.
    pub action: PointerAction,
    /// Index into `pointers` of the pointer the action refers to.
    pub action_index: usize,
    /// Every pointer currently down, including one that is lifting.
    pub pointers: Vec<Pointer>,
}

impl PointerEvent {
    /// Create an event.
    pub fn new(action: PointerAction, action_index: usize, pointers: Vec<Pointer>) -> Self {
        Self {
            action,
            action_index,
            pointers,
        }
    }

    /// A single-pointer event with pointer id 0.
    pub fn single(action: PointerAction, position: Point) -> Self {
        Self::new(action, 0, vec![Pointer::new(0, position)])
    }

    /// Number of pointers in the event.
    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// The pointer the action refers to.
    pub fn action_pointer(&self) -> Option<&Pointer> {
        self.pointers.get(self.action_index)
    }

    /// Position of the first pointer.
    pub fn first_position(&self) -> Point {
        self.pointers
            .first()
            .map(|pointer| pointer.position)
            .unwrap_or_default()
    }

    /// Screen position of the first pointer.
    pub fn first_raw(&self) -> Point {
        self.pointers
            .first()
            .map(|pointer| pointer.raw)
            .unwrap_or_default()
    }

    /// Pointers that remain down after this event.
    pub fn remaining_pointers(&self) -> impl Iterator<Item = &Pointer> {
        let lifting = self.action.is_up().then_some(self.action_index);
        self.pointers
            .iter()
            .enumerate()
            .filter(move |(index, _)| Some(*index) != lifting)
            .map(|(_, pointer)| pointer)
    }

    /// Last known pointer position, used for translation tracking.
    ///
    /// With `average` the mean of all pointers is used, otherwise the most
    /// recently added pointer. A pointer lifting with `PointerUp` is
    /// excluded. With `raw` the screen position is used.
    pub fn last_pointer_position(&self, average: bool, raw: bool) -> Point {
        let exclude = (self.action == PointerAction::PointerUp).then_some(self.action_index);
        let pick = |pointer: &Pointer| if raw { pointer.raw } else { pointer.position };

        if average {
            let (sum, count) = self
                .pointers
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != exclude)
                .fold((Point::ZERO, 0usize), |(sum, count), (_, pointer)| {
                    (sum + pick(pointer), count + 1)
                });
            if count == 0 {
                return self.pointers.first().map(pick).unwrap_or_default();
            }
            Point::new(sum.x / count as f32, sum.y / count as f32)
        } else {
            let mut last = self.pointers.len().saturating_sub(1);
            if Some(last) == exclude && last > 0 {
                last -= 1;
            }
            self.pointers.get(last).map(pick).unwrap_or_default()
        }
    }

    /// The same event with every local position shifted by `offset`.
    pub fn translated(&self, offset: Point) -> PointerEvent {
        PointerEvent {
            action: self.action,
            action_index: self.action_index,
            pointers: self
                .pointers
                .iter()
                .map(|pointer| Pointer {
                    position: pointer.position + offset,
                    ..*pointer
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_finger(action: PointerAction, action_index: usize) -> PointerEvent {
        PointerEvent::new(
            action,
            action_index,
            vec![
                Pointer::new(3, Point::new(0.0, 0.0)),
                Pointer::new(5, Point::new(10.0, 20.0)),
            ],
        )
    }

    #[test]
    fn test_average_position() {
        let event = two_finger(PointerAction::Move, 0);
        assert_eq!(event.last_pointer_position(true, false), Point::new(5.0, 10.0));
        assert_eq!(event.last_pointer_position(false, false), Point::new(10.0, 20.0));
    }

    #[test]
    fn test_lifting_pointer_excluded() {
        let event = two_finger(PointerAction::PointerUp, 1);
        assert_eq!(event.last_pointer_position(true, false), Point::new(0.0, 0.0));
        assert_eq!(event.last_pointer_position(false, false), Point::new(0.0, 0.0));
        assert_eq!(event.remaining_pointers().count(), 1);
    }

    #[test]
    fn test_translation_keeps_raw() {
        let event = PointerEvent::single(PointerAction::Down, Point::new(50.0, 50.0));
        let local = event.translated(Point::new(-10.0, -20.0));
        assert_eq!(local.first_position(), Point::new(40.0, 30.0));
        assert_eq!(local.first_raw(), Point::new(50.0, 50.0));
    }
}
