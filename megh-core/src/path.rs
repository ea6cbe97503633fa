use std::collections::{HashSet, VecDeque};

use log::trace;

use crate::maze::{MazeGrid, Pos};

/// Breadth-first search over open passages.
pub struct PathFinder;

impl PathFinder {
    /// Shortest route from `start` to `end`, both inclusive. Ties go to the
    /// route discovered first in up/right/down/left order. `None` when the
    /// cells are disconnected or either one is off the grid.
    pub fn find_path(grid: &MazeGrid, start: Pos, end: Pos) -> Option<Vec<Pos>> {
        if !grid.contains(start) || !grid.contains(end) { return None; }
        let mut seen: HashSet<Pos> = HashSet::from([start]);
        let mut queue: VecDeque<(Pos, Vec<Pos>)> = VecDeque::from([(start, vec![start])]);
        while let Some((current, path)) = queue.pop_front() {
            if current == end {
                trace!("path {start} -> {end}: {} steps, {} cells explored", path.len() - 1, seen.len());
                return Some(path);
            }
            for next in grid.open_neighbors(current) {
                if !seen.insert(next) { continue; }
                let mut extended = path.clone();
                extended.push(next);
                queue.push_back((next, extended));
            }
        }
        None
    }

    /// Step count of the start-to-end solution.
    pub fn optimal_length(grid: &MazeGrid) -> Option<usize> {
        Self::find_path(grid, grid.start(), grid.end()).map(|p| p.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::tests::open_grid;
    use crate::maze::{Algorithm, MazeConfig};
    use crate::random::SeededRandom;

    #[test]
    fn open_grid_prefers_earlier_directions() {
        // Right is scanned before Down, so the route hugs the top row first
        let g = open_grid(3, 2);
        let path = PathFinder::find_path(&g, Pos::new(0, 0), Pos::new(2, 1)).unwrap();
        assert_eq!(path, vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0), Pos::new(2, 1)]);
    }

    #[test]
    fn same_cell_is_a_zero_step_path() {
        let g = open_grid(2, 2);
        assert_eq!(PathFinder::find_path(&g, Pos::new(1, 1), Pos::new(1, 1)), Some(vec![Pos::new(1, 1)]));
    }

    #[test]
    fn off_grid_endpoints_are_not_found() {
        let g = open_grid(2, 2);
        assert_eq!(PathFinder::find_path(&g, Pos::new(0, 0), Pos::new(2, 0)), None);
    }

    #[test]
    fn walled_off_cell_is_not_found() {
        let g = MazeGrid::blank(&MazeConfig::new(2, 1), Algorithm::Prim).unwrap();
        assert_eq!(PathFinder::find_path(&g, Pos::new(0, 0), Pos::new(1, 0)), None);
        assert_eq!(PathFinder::optimal_length(&g), None);
    }

    #[test]
    fn single_cell_maze_solves_in_zero_steps() {
        let cfg = MazeConfig::new(1, 1);
        let g = MazeGrid::generate_with(&cfg, Algorithm::Prim, &mut SeededRandom::new(1)).unwrap();
        assert_eq!(PathFinder::optimal_length(&g), Some(0));
    }

    #[test]
    fn consecutive_cells_share_an_open_wall() {
        let cfg = MazeConfig::new(8, 8);
        let g = MazeGrid::generate(&cfg, &mut SeededRandom::new(2024)).unwrap();
        let path = PathFinder::find_path(&g, g.start(), g.end()).unwrap();
        for pair in path.windows(2) {
            assert!(g.open_neighbors(pair[0]).contains(&pair[1]));
        }
    }
}
