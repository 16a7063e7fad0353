//! Handler states, transitions and direction masks.

use std::fmt;
use std::ops::BitOr;

/// State of a gesture handler.
///
/// The numeric codes match the values exposed to hosts through
/// [`GestureHandlerModule::constants`](crate::GestureHandlerModule::constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum GestureState {
    /// Has not yet decided whether the gesture is occurring.
    #[default]
    Undetermined = 0,
    /// The gesture will never be recognized for this touch stream.
    Failed = 1,
    /// Touch detected, activation criteria not yet satisfied.
    Began = 2,
    /// Aborted externally.
    Cancelled = 3,
    /// Gesture recognized.
    Active = 4,
    /// Gesture completed normally.
    End = 5,
}

impl GestureState {
    /// All states, in code order.
    pub const ALL: [GestureState; 6] = [
        GestureState::Undetermined,
        GestureState::Failed,
        GestureState::Began,
        GestureState::Cancelled,
        GestureState::Active,
        GestureState::End,
    ];

    /// Whether the state is terminal for the current touch sequence.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Cancelled | Self::Failed | Self::End)
    }

    /// The numeric code of this state.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a state by numeric code.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.code() == code)
    }

    /// Upper-case name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undetermined => "UNDETERMINED",
            Self::Failed => "FAILED",
            Self::Began => "BEGAN",
            Self::Cancelled => "CANCELLED",
            Self::Active => "ACTIVE",
            Self::End => "END",
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    /// The state after the change.
    pub new: GestureState,
    /// The state before the change.
    pub old: GestureState,
}

/// A transition requested by a recognizer or the host.
///
/// Transitions are guarded: requesting one from an ineligible state does
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `Undetermined -> Began`.
    Begin,
    /// `Undetermined | Began -> Active`. Without `force`, manual-activation
    /// handlers ignore it.
    Activate { force: bool },
    /// `Began | Active -> End`.
    End,
    /// `Undetermined | Began | Active -> Failed`.
    Fail,
    /// `Undetermined | Began | Active -> Cancelled`.
    Cancel,
}

impl Transition {
    /// Non-forced activation.
    pub const ACTIVATE: Transition = Transition::Activate { force: false };

    /// The state this transition moves to.
    pub fn target(self) -> GestureState {
        match self {
            Self::Begin => GestureState::Began,
            Self::Activate { .. } => GestureState::Active,
            Self::End => GestureState::End,
            Self::Fail => GestureState::Failed,
            Self::Cancel => GestureState::Cancelled,
        }
    }

    /// Whether the transition may be taken from `state`.
    pub fn is_allowed_from(self, state: GestureState) -> bool {
        use GestureState::*;
        match self {
            Self::Begin => state == Undetermined,
            Self::Activate { .. } => matches!(state, Undetermined | Began),
            Self::End => matches!(state, Began | Active),
            Self::Fail | Self::Cancel => matches!(state, Undetermined | Began | Active),
        }
    }
}

/// Transitions produced by one evaluation, applied in order.
pub type Transitions = Vec<Transition>;

/// Bitmask of swipe directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction(u8);

impl Direction {
    /// Towards positive x.
    pub const RIGHT: Direction = Direction(1);
    /// Towards negative x.
    pub const LEFT: Direction = Direction(2);
    /// Towards negative y.
    pub const UP: Direction = Direction(4);
    /// Towards positive y.
    pub const DOWN: Direction = Direction(8);
    /// Every direction.
    pub const ALL: Direction = Direction(15);

    /// Build a mask from raw bits. Returns `None` for an empty mask or
    /// unknown bits.
    pub fn from_bits(bits: u32) -> Option<Direction> {
        if bits == 0 || bits > Self::ALL.0 as u32 {
            None
        } else {
            Some(Direction(bits as u8))
        }
    }

    /// Raw bits of the mask.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every direction in `other` is set in `self`.
    pub fn contains(self, other: Direction) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::RIGHT
    }
}

impl BitOr for Direction {
    type Output = Direction;

    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes_round_trip() {
        for state in GestureState::ALL {
            assert_eq!(GestureState::from_code(state.code()), Some(state));
        }
        assert_eq!(GestureState::from_code(42), None);
    }

    #[test]
    fn test_finished_states() {
        assert!(GestureState::End.is_finished());
        assert!(GestureState::Failed.is_finished());
        assert!(GestureState::Cancelled.is_finished());
        assert!(!GestureState::Active.is_finished());
        assert!(!GestureState::Began.is_finished());
        assert!(!GestureState::Undetermined.is_finished());
    }

    #[test]
    fn test_transition_guards() {
        use GestureState::*;

        assert!(Transition::Begin.is_allowed_from(Undetermined));
        assert!(!Transition::Begin.is_allowed_from(Began));
        assert!(Transition::ACTIVATE.is_allowed_from(Began));
        assert!(!Transition::ACTIVATE.is_allowed_from(Active));
        assert!(!Transition::End.is_allowed_from(Undetermined));
        for terminal in [Failed, Cancelled, End] {
            assert!(!Transition::Fail.is_allowed_from(terminal));
            assert!(!Transition::Cancel.is_allowed_from(terminal));
            assert!(!Transition::ACTIVATE.is_allowed_from(terminal));
        }
    }

    #[test]
    fn test_direction_mask() {
        let mask = Direction::LEFT | Direction::UP;
        assert!(mask.contains(Direction::LEFT));
        assert!(!mask.contains(Direction::RIGHT));
        assert_eq!(Direction::from_bits(0), None);
        assert_eq!(Direction::from_bits(16), None);
        assert_eq!(Direction::from_bits(9), Some(Direction::RIGHT | Direction::DOWN));
    }
}
