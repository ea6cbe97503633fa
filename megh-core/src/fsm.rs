use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState { Ready, Playing, Paused, Won, Lost }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger { Start, Pause, Resume, Win, TimeUp, Reset }

use GameState::*;
use Trigger::*;

/// Every legal move of the game state; anything else is rejected.
const TRANSITIONS: &[(GameState, Trigger, GameState)] = &[
    (Ready, Start, Playing),
    (Playing, Pause, Paused),
    (Paused, Resume, Playing),
    (Playing, Win, Won),
    (Playing, TimeUp, Lost),
    (Ready, Reset, Ready),
    (Playing, Reset, Ready),
    (Paused, Reset, Ready),
    (Won, Reset, Ready),
    (Lost, Reset, Ready),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameFsm { state: GameState }

impl Default for GameFsm {
    fn default() -> Self { Self { state: Ready } }
}

impl GameFsm {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> GameState { self.state }

    pub fn next(from: GameState, trigger: Trigger) -> Option<GameState> {
        TRANSITIONS.iter().find(|&&(s, t, _)| s == from && t == trigger).map(|&(_, _, to)| to)
    }

    pub fn can(&self, trigger: Trigger) -> bool { Self::next(self.state, trigger).is_some() }

    pub fn fire(&mut self, trigger: Trigger) -> Result<GameState> {
        let to = Self::next(self.state, trigger).ok_or(CoreError::InvalidTransition { from: self.state, trigger })?;
        self.state = to;
        Ok(to)
    }

    pub fn is_finished(&self) -> bool { matches!(self.state, Won | Lost) }
}
