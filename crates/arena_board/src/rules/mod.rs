//! Game rules.
//!
//! Pure functions for evaluating a board. Rules are separated from board
//! storage so the session server can run them inside its own critical
//! section without any of them touching shared state.

mod draw;
mod validate;
mod win;

pub use draw::{is_draw, is_full};
pub use validate::validate_move;
pub use win::{LINES, detect_winner};
