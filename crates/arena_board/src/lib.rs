//! Pure tic-tac-toe board rules.
//!
//! Everything in this crate is deterministic and side-effect free: the
//! board representation, move validation, and terminal-condition checks.
//! The session server composes these functions under its own lock; nothing
//! here knows about connections or concurrency.
//!
//! # Example
//!
//! ```
//! use arena_board::{Board, Mark, Role, detect_winner, validate_move};
//!
//! let board = Board::new();
//! let mv = validate_move(Role::Player(Mark::X), "4", &board, Mark::X).unwrap();
//! assert_eq!(mv.position().to_index(), 4);
//! assert_eq!(detect_winner(&board), None);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod position;
mod rules;
mod types;

pub use action::{Move, MoveRejection};
pub use position::Position;
pub use rules::{LINES, detect_winner, is_draw, is_full, validate_move};
pub use types::{Board, Cell, Mark, Role};
