use std::rc::Rc;

use log::trace;

use crate::error::Result;
use crate::maze::{Direction, MazeGrid, Pos};

/// Player position plus the trail it leaves behind.
///
/// The active path is the route the player is committed to. Whenever the
/// player steps back onto a cell already on that route, everything after it
/// is cut off and kept as a closed dead-end segment for dimmed drawing.
#[derive(Clone, Debug)]
pub struct PlayerPathTracker {
    grid: Rc<MazeGrid>,
    position: Pos,
    active_path: Vec<Pos>,
    dead_ends: Vec<Vec<Pos>>,
    win_reported: bool,
}

impl PlayerPathTracker {
    pub fn new(grid: Rc<MazeGrid>) -> Self {
        let start = grid.start();
        Self { grid, position: start, active_path: vec![start], dead_ends: Vec::new(), win_reported: false }
    }

    pub fn grid(&self) -> &MazeGrid { &self.grid }
    pub fn position(&self) -> Pos { self.position }
    pub fn active_path(&self) -> &[Pos] { &self.active_path }
    pub fn dead_ends(&self) -> &[Vec<Pos>] { &self.dead_ends }

    /// Steps along the active path, i.e. the score of a finished run.
    pub fn steps(&self) -> usize { self.active_path.len() - 1 }

    /// Moves by a unit vector. `Ok(false)` means a wall was in the way.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<bool> {
        let dir = Direction::from_delta(dx, dy)?;
        Ok(self.step(dir))
    }

    /// Position only; callers follow a successful step with [`Self::update_path`].
    pub fn step(&mut self, dir: Direction) -> bool {
        if self.grid.has_wall(self.position, dir) { return false; }
        match self.grid.neighbor(self.position, dir) {
            Some(next) => { self.position = next; true }
            None => false,
        }
    }

    pub fn update_path(&mut self) {
        let here = self.position;
        match self.active_path.iter().position(|&p| p == here) {
            Some(i) if i + 1 < self.active_path.len() => {
                let mut segment = self.active_path.split_off(i);
                if segment.len() > 1 {
                    segment.push(here);
                    trace!("abandoned {} cells back to {here}", segment.len() - 2);
                    self.dead_ends.push(segment);
                }
                self.active_path.push(here);
            }
            Some(_) => {}
            None => self.active_path.push(here),
        }
    }

    pub fn is_at_end(&self) -> bool { self.position == self.grid.end() }

    /// Fires `on_win` with the step count the first time the end is reached.
    pub fn check_win<F: FnOnce(usize)>(&mut self, on_win: F) -> bool {
        if !self.is_at_end() { return false; }
        if !self.win_reported {
            self.win_reported = true;
            on_win(self.steps());
        }
        true
    }

    pub fn reset(&mut self) {
        let start = self.grid.start();
        self.position = start;
        self.active_path.clear();
        self.active_path.push(start);
        self.dead_ends.clear();
        self.win_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::tests::open_grid;

    fn p(x: usize, y: usize) -> Pos { Pos::new(x, y) }

    fn tracker(cols: usize, rows: usize) -> PlayerPathTracker { PlayerPathTracker::new(Rc::new(open_grid(cols, rows))) }

    fn walk(t: &mut PlayerPathTracker, moves: &[(i32, i32)]) {
        for &(dx, dy) in moves {
            assert!(t.try_move(dx, dy).unwrap(), "blocked at {:?} moving ({dx}, {dy})", t.position());
            t.update_path();
        }
    }

    #[test]
    fn step_back_closes_a_dead_end() {
        let mut t = tracker(3, 3);
        walk(&mut t, &[(1, 0)]);
        assert_eq!(t.active_path(), &[p(0, 0), p(1, 0)]);
        walk(&mut t, &[(-1, 0)]);
        assert_eq!(t.active_path(), &[p(0, 0)]);
        assert_eq!(t.dead_ends(), &[vec![p(0, 0), p(1, 0), p(0, 0)]]);
    }

    #[test]
    fn loop_back_trims_to_revisited_cell() {
        let mut t = tracker(3, 3);
        // around a 2x2 block and back onto (1,0)
        walk(&mut t, &[(1, 0), (1, 0), (0, 1), (-1, 0), (0, -1)]);
        assert_eq!(t.active_path(), &[p(0, 0), p(1, 0)]);
        assert_eq!(t.dead_ends(), &[vec![p(1, 0), p(2, 0), p(2, 1), p(1, 1), p(1, 0)]]);
        assert_eq!(t.steps(), 1);
    }

    #[test]
    fn walls_block_without_state_change() {
        let mut t = tracker(2, 2);
        assert_eq!(t.try_move(-1, 0), Ok(false));
        assert_eq!(t.try_move(0, -1), Ok(false));
        assert_eq!(t.position(), p(0, 0));
        assert_eq!(t.active_path(), &[p(0, 0)]);
    }

    #[test]
    fn non_unit_vectors_are_rejected() {
        let mut t = tracker(3, 3);
        for (dx, dy) in [(1, 1), (2, 0), (0, 0), (0, -3)] {
            assert!(t.try_move(dx, dy).is_err());
        }
        assert_eq!(t.position(), p(0, 0));
    }

    #[test]
    fn win_callback_fires_once() {
        let mut t = tracker(2, 1);
        let mut wins = Vec::new();
        assert!(!t.check_win(|s| wins.push(s)));
        walk(&mut t, &[(1, 0)]);
        assert!(t.check_win(|s| wins.push(s)));
        assert!(t.check_win(|s| wins.push(s)));
        assert_eq!(wins, vec![1]);
    }

    #[test]
    fn reset_restores_start() {
        let mut t = tracker(3, 3);
        walk(&mut t, &[(1, 0), (0, 1), (0, -1), (1, 0)]);
        assert!(!t.dead_ends().is_empty());
        t.reset();
        assert_eq!(t.position(), p(0, 0));
        assert_eq!(t.active_path(), &[p(0, 0)]);
        assert!(t.dead_ends().is_empty());
        t.reset();
        assert_eq!(t.active_path(), &[p(0, 0)]);
    }
}
