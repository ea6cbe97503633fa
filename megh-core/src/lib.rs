//! Maze core: seeded generation, shortest paths, player trails and the
//! countdown that decides a run. No I/O and no globals; a driver owns a
//! [`Session`] and feeds it moves and ticks.

pub mod clock;
pub mod error;
pub mod fsm;
pub mod maze;
pub mod path;
pub mod random;
pub mod session;
pub mod tracker;

pub use clock::{ClockState, GameClock};
pub use error::CoreError;
pub use fsm::{GameFsm, GameState, Trigger};
pub use maze::{Algorithm, Cell, Direction, GameMode, MazeConfig, MazeGrid, Pos, Walls};
pub use path::PathFinder;
pub use random::{daily_seed, SeededRandom};
pub use session::{RunSummary, Session, SessionEvent};
pub use tracker::PlayerPathTracker;
