//! State machine trait for widget interaction states
//!
//! States are small `Copy` enums; events are a per-machine type. A machine
//! reports the next state for an event, or `None` when the event does not
//! cause a transition in the current state.
//!
//! # Example
//!
//! ```rust
//! use glide_core::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Default)]
//! enum Gesture {
//!     #[default]
//!     Idle,
//!     Tracking,
//! }
//!
//! enum GestureEvent {
//!     Down,
//!     Up,
//! }
//!
//! impl StateTransitions for Gesture {
//!     type Event = GestureEvent;
//!
//!     fn on_event(&self, event: &GestureEvent) -> Option<Self> {
//!         match (self, event) {
//!             (Gesture::Idle, GestureEvent::Down) => Some(Gesture::Tracking),
//!             (Gesture::Tracking, GestureEvent::Up) => Some(Gesture::Idle),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = Gesture::default();
//! assert!(state.transition(&GestureEvent::Down));
//! assert_eq!(state, Gesture::Tracking);
//! assert!(!state.transition(&GestureEvent::Down));
//! ```

use std::fmt::Debug;

/// Trait for defining state transitions
pub trait StateTransitions: Clone + Copy + PartialEq + Debug + Sized {
    /// Events understood by this machine
    type Event;

    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: &Self::Event) -> Option<Self>;

    /// Apply an event in place. Returns true if the state changed.
    fn transition(&mut self, event: &Self::Event) -> bool {
        match self.on_event(event) {
            Some(next) if next != *self => {
                *self = next;
                true
            }
            Some(next) => {
                *self = next;
                false
            }
            None => false,
        }
    }
}
