//! Glide Core
//!
//! Foundational primitives shared by the Glide carousel crates:
//!
//! - **Geometry**: `Point`, `Size` and `Rect` in logical pixels
//! - **State Machines**: the `StateTransitions` trait used by the paging FSM
//!
//! # Example
//!
//! ```rust
//! use glide_core::{Rect, Size};
//!
//! let viewport = Size::new(320.0, 240.0).to_rect();
//! let cell = Rect::new(300.0, 0.0, 320.0, 200.0);
//! assert!(viewport.intersects(&cell));
//! ```

pub mod fsm;
pub mod geometry;

pub use fsm::StateTransitions;
pub use geometry::{Point, Rect, Size};
