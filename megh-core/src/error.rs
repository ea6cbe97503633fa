use thiserror::Error;

use crate::fsm::{GameState, Trigger};
use crate::maze::{Direction, Pos};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("maze dimensions must be positive (got {cols}x{rows})")]
    EmptyGrid { cols: usize, rows: usize },

    #[error("cell size must be a positive finite number (got {0})")]
    InvalidCellSize(f64),

    #[error("{role} cell {pos} is outside the {cols}x{rows} grid")]
    OutOfBounds { role: &'static str, pos: Pos, cols: usize, rows: usize },

    #[error("illegal move vector ({dx}, {dy}); expected a single cardinal step")]
    IllegalMove { dx: i32, dy: i32 },

    #[error("cannot {trigger:?} while {from:?}")]
    InvalidTransition { from: GameState, trigger: Trigger },

    #[error("cell rows do not match a {cols}x{rows} grid")]
    ShapeMismatch { cols: usize, rows: usize },

    #[error("{dir:?} wall of {at} does not match the cell on its other side")]
    OneSidedWall { at: Pos, dir: Direction },

    #[error("no path from {from} to {to}")]
    Unsolvable { from: Pos, to: Pos },
}

pub type Result<T> = std::result::Result<T, CoreError>;
