//! Interactive region selection.

pub mod state_machine;

pub use state_machine::{
    PointerEvent, SelectionOutcome, SelectionState, SelectionStateMachine,
    LONG_CAPTURE_BOTTOM_MARGIN, MIN_SELECTION_SIZE, SCROLL_THRESHOLD,
};
