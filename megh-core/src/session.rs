use std::collections::VecDeque;
use std::rc::Rc;

use log::{info, trace};
use serde::{Deserialize, Serialize};

use crate::clock::GameClock;
use crate::error::{CoreError, Result};
use crate::fsm::{GameFsm, GameState, Trigger};
use crate::maze::{Direction, MazeConfig, MazeGrid, Pos};
use crate::path::PathFinder;
use crate::random::SeededRandom;
use crate::tracker::PlayerPathTracker;

/// What happened since the driver last drained the queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Started,
    Paused,
    Resumed,
    Moved { from: Pos, to: Pos, steps: usize },
    Blocked { at: Pos, dir: Direction },
    /// Player stepped back onto `to`, dropping `abandoned` cells from the route.
    Backtracked { to: Pos, abandoned: usize },
    Won { steps: usize, optimal: bool },
    TimeUp,
    Reset,
}

/// Everything a persistence layer needs to record one attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: i64,
    pub won: bool,
    pub steps: usize,
    pub optimal_length: usize,
    pub optimal: bool,
    pub elapsed_ms: f64,
    pub path: Vec<Pos>,
}

/// One maze being played: grid, solution, player trail, clock and game state.
pub struct Session {
    seed: i64,
    config: MazeConfig,
    grid: Rc<MazeGrid>,
    optimal_path: Vec<Pos>,
    tracker: PlayerPathTracker,
    clock: GameClock,
    fsm: GameFsm,
    time_limit_ms: f64,
    /// Play time, counted whether or not the clock is armed.
    elapsed_ms: f64,
    events: VecDeque<SessionEvent>,
}

impl Session {
    /// A `time_limit_ms` of zero or less means the run is untimed.
    pub fn new(config: MazeConfig, seed: i64, time_limit_ms: f64) -> Result<Self> {
        let mut rng = SeededRandom::new(seed);
        let grid = Rc::new(MazeGrid::generate(&config, &mut rng)?);
        let optimal_path = PathFinder::find_path(&grid, grid.start(), grid.end())
            .ok_or(CoreError::Unsolvable { from: grid.start(), to: grid.end() })?;
        info!(
            "seed {seed}: {}x{} {:?} maze, optimal path {} steps",
            grid.cols(), grid.rows(), grid.algorithm(), optimal_path.len() - 1
        );
        Ok(Self {
            seed,
            config,
            tracker: PlayerPathTracker::new(Rc::clone(&grid)),
            grid,
            optimal_path,
            clock: GameClock::new(time_limit_ms),
            fsm: GameFsm::new(),
            time_limit_ms,
            elapsed_ms: 0.0,
            events: VecDeque::new(),
        })
    }

    pub fn seed(&self) -> i64 { self.seed }
    pub fn config(&self) -> &MazeConfig { &self.config }
    pub fn grid(&self) -> &MazeGrid { &self.grid }
    pub fn tracker(&self) -> &PlayerPathTracker { &self.tracker }
    pub fn clock(&self) -> &GameClock { &self.clock }
    pub fn state(&self) -> GameState { self.fsm.state() }
    pub fn optimal_path(&self) -> &[Pos] { &self.optimal_path }
    pub fn optimal_length(&self) -> usize { self.optimal_path.len() - 1 }
    pub fn is_timed(&self) -> bool { self.time_limit_ms > 0.0 }
    pub fn elapsed_ms(&self) -> f64 { self.elapsed_ms }

    pub fn start(&mut self) -> Result<()> {
        self.fsm.fire(Trigger::Start)?;
        self.clock.start();
        self.events.push_back(SessionEvent::Started);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.fsm.fire(Trigger::Pause)?;
        self.clock.pause();
        self.events.push_back(SessionEvent::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.fsm.fire(Trigger::Resume)?;
        self.clock.resume();
        self.events.push_back(SessionEvent::Resumed);
        Ok(())
    }

    /// Back to the start cell with a fresh clock, same maze.
    pub fn reset(&mut self) -> Result<()> {
        self.fsm.fire(Trigger::Reset)?;
        self.tracker.reset();
        self.clock.set_time(self.time_limit_ms);
        self.elapsed_ms = 0.0;
        self.events.push_back(SessionEvent::Reset);
        Ok(())
    }

    /// One move attempt. Illegal vectors are errors; outside of play, or
    /// into a wall, the answer is simply `Ok(false)`.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<bool> {
        let dir = Direction::from_delta(dx, dy)?;
        if self.fsm.state() != GameState::Playing {
            trace!("ignoring move while {:?}", self.fsm.state());
            return Ok(false);
        }
        let from = self.tracker.position();
        if !self.tracker.step(dir) {
            self.events.push_back(SessionEvent::Blocked { at: from, dir });
            return Ok(false);
        }
        let dead_ends = self.tracker.dead_ends().len();
        let before = self.tracker.active_path().len();
        self.tracker.update_path();
        let to = self.tracker.position();
        if self.tracker.dead_ends().len() > dead_ends {
            let abandoned = before - self.tracker.active_path().len();
            self.events.push_back(SessionEvent::Backtracked { to, abandoned });
        }
        self.events.push_back(SessionEvent::Moved { from, to, steps: self.tracker.steps() });

        let mut finished = None;
        self.tracker.check_win(|steps| finished = Some(steps));
        if let Some(steps) = finished {
            self.fsm.fire(Trigger::Win)?;
            self.clock.stop();
            let optimal = steps == self.optimal_length();
            info!("seed {}: solved in {steps} steps (optimal {})", self.seed, self.optimal_length());
            self.events.push_back(SessionEvent::Won { steps, optimal });
        }
        Ok(true)
    }

    /// Advances the clock; returns true on the tick the run times out.
    /// Only time spent `Playing` counts towards the run.
    pub fn tick(&mut self, delta_seconds: f64) -> bool {
        if self.fsm.state() == GameState::Playing {
            self.elapsed_ms += (delta_seconds * 1000.0).max(0.0);
            if self.is_timed() { self.elapsed_ms = self.elapsed_ms.min(self.time_limit_ms); }
        }
        let mut timed_out = false;
        self.clock.update(delta_seconds, || timed_out = true);
        if timed_out && self.fsm.fire(Trigger::TimeUp).is_ok() {
            info!("seed {}: time up after {} steps", self.seed, self.tracker.steps());
            self.events.push_back(SessionEvent::TimeUp);
            return true;
        }
        false
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> { self.events.drain(..).collect() }

    pub fn summary(&self) -> RunSummary {
        let steps = self.tracker.steps();
        let won = self.fsm.state() == GameState::Won;
        RunSummary {
            seed: self.seed,
            won,
            steps,
            optimal_length: self.optimal_length(),
            optimal: won && steps == self.optimal_length(),
            elapsed_ms: self.elapsed_ms,
            path: self.tracker.active_path().to_vec(),
        }
    }
}
