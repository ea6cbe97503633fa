use std::fmt::{self, Display, Formatter};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::random::SeededRandom;

/// Loop divisor for the daily puzzle.
pub const DAILY_LOOP_DIVISOR: usize = 15;
/// Endless mode adds at most this much to the divisor as levels are solved.
pub const ENDLESS_LEVEL_CAP: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos { pub x: usize, pub y: usize }

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self { Self { x, y } }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "({}, {})", self.x, self.y) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction { Up, Right, Down, Left }

impl Direction {
    /// Visiting order used by every neighbor scan.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// Accepts only the four unit cardinal vectors.
    pub fn from_delta(dx: i32, dy: i32) -> Result<Self> {
        match (dx, dy) {
            (0, -1) => Ok(Direction::Up),
            (1, 0) => Ok(Direction::Right),
            (0, 1) => Ok(Direction::Down),
            (-1, 0) => Ok(Direction::Left),
            _ => Err(CoreError::IllegalMove { dx, dy }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls { pub top: bool, pub right: bool, pub bottom: bool, pub left: bool }

impl Walls {
    pub const CLOSED: Walls = Walls { top: true, right: true, bottom: true, left: true };

    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn clear(&mut self, dir: Direction) {
        match dir {
            Direction::Up => self.top = false,
            Direction::Right => self.right = false,
            Direction::Down => self.bottom = false,
            Direction::Left => self.left = false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub walls: Walls,
    pub visited: bool, // generation bookkeeping only
}

impl Default for Cell {
    fn default() -> Self { Self { walls: Walls::CLOSED, visited: false } }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode { #[default] Daily, Endless }

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm { Backtracker, Prim }

/// Everything needed to lay out one maze.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub cols: usize,
    pub rows: usize,
    /// Rendering hint, never read by generation.
    pub cell_size: f64,
    pub start: Pos,
    pub end: Pos,
    pub mode: GameMode,
    /// Mazes solved so far in an endless run; ignored for the daily puzzle.
    pub difficulty_level: u32,
}

impl MazeConfig {
    /// Corner to corner, daily mode.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cell_size: 20.0,
            start: Pos::new(0, 0),
            end: Pos::new(cols.saturating_sub(1), rows.saturating_sub(1)),
            mode: GameMode::Daily,
            difficulty_level: 0,
        }
    }

    pub fn with_endpoints(mut self, start: Pos, end: Pos) -> Self { self.start = start; self.end = end; self }
    pub fn with_cell_size(mut self, cell_size: f64) -> Self { self.cell_size = cell_size; self }
    pub fn with_mode(mut self, mode: GameMode, difficulty_level: u32) -> Self {
        self.mode = mode;
        self.difficulty_level = difficulty_level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.cols == 0 || self.rows == 0 {
            return Err(CoreError::EmptyGrid { cols: self.cols, rows: self.rows });
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CoreError::InvalidCellSize(self.cell_size));
        }
        for (role, pos) in [("start", self.start), ("end", self.end)] {
            if pos.x >= self.cols || pos.y >= self.rows {
                return Err(CoreError::OutOfBounds { role, pos, cols: self.cols, rows: self.rows });
            }
        }
        Ok(())
    }

    pub fn loop_divisor(&self) -> usize {
        match self.mode {
            GameMode::Daily => DAILY_LOOP_DIVISOR,
            GameMode::Endless => DAILY_LOOP_DIVISOR + self.difficulty_level.min(ENDLESS_LEVEL_CAP) as usize,
        }
    }

    /// Target number of extra passages; the realized count may be lower.
    pub fn loop_count(&self) -> usize { self.cols * self.rows / self.loop_divisor() }
}

impl Default for MazeConfig {
    fn default() -> Self { Self::new(10, 10) }
}

/// Pending Prim's edge: carve `dir` out of `from` to reach `cell`.
#[derive(Clone, Copy, Debug)]
struct Frontier { cell: Pos, from: Pos, dir: Direction }

/// A generated maze. Walls only ever come down, and only during generation.
///
/// Deserializing re-checks the config, the cell array shape and wall
/// symmetry, so a stored grid can never hand the player a one-sided wall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMazeGrid")]
pub struct MazeGrid {
    cols: usize,
    rows: usize,
    cell_size: f64,
    start: Pos,
    end: Pos,
    algorithm: Algorithm,
    loops_added: usize,
    cells: Vec<Vec<Cell>>, // cells[y][x]
}

/// Unchecked wire form of [`MazeGrid`].
#[derive(Deserialize)]
struct RawMazeGrid {
    cols: usize,
    rows: usize,
    cell_size: f64,
    start: Pos,
    end: Pos,
    algorithm: Algorithm,
    loops_added: usize,
    cells: Vec<Vec<Cell>>,
}

impl TryFrom<RawMazeGrid> for MazeGrid {
    type Error = CoreError;

    fn try_from(raw: RawMazeGrid) -> Result<Self> {
        let config = MazeConfig::new(raw.cols, raw.rows)
            .with_cell_size(raw.cell_size)
            .with_endpoints(raw.start, raw.end);
        config.validate()?;
        if raw.cells.len() != raw.rows || raw.cells.iter().any(|row| row.len() != raw.cols) {
            return Err(CoreError::ShapeMismatch { cols: raw.cols, rows: raw.rows });
        }
        let grid = Self {
            cols: raw.cols,
            rows: raw.rows,
            cell_size: raw.cell_size,
            start: raw.start,
            end: raw.end,
            algorithm: raw.algorithm,
            loops_added: raw.loops_added,
            cells: raw.cells,
        };
        match grid.one_sided_wall() {
            Some((at, dir)) => Err(CoreError::OneSidedWall { at, dir }),
            None => Ok(grid),
        }
    }
}

impl MazeGrid {
    /// Builds a maze, letting the stream pick the carving algorithm.
    ///
    /// The algorithm draw comes before any other draw; moving it would change
    /// every seeded layout.
    pub fn generate(config: &MazeConfig, rng: &mut SeededRandom) -> Result<Self> {
        config.validate()?;
        let algorithm = if rng.random() >= 0.5 { Algorithm::Backtracker } else { Algorithm::Prim };
        Self::generate_with(config, algorithm, rng)
    }

    /// Same as [`MazeGrid::generate`] with the algorithm fixed up front.
    pub fn generate_with(config: &MazeConfig, algorithm: Algorithm, rng: &mut SeededRandom) -> Result<Self> {
        let mut maze = Self::blank(config, algorithm)?;
        match algorithm {
            Algorithm::Backtracker => maze.carve_backtracker(rng),
            Algorithm::Prim => maze.carve_prim(rng),
        }
        let target = config.loop_count();
        let added = maze.add_loops(target, rng);
        debug!(
            "generated {}x{} maze with {:?}: {} of {} loops added",
            maze.cols, maze.rows, algorithm, added, target
        );
        Ok(maze)
    }

    pub(crate) fn blank(config: &MazeConfig, algorithm: Algorithm) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cols: config.cols,
            rows: config.rows,
            cell_size: config.cell_size,
            start: config.start,
            end: config.end,
            algorithm,
            loops_added: 0,
            cells: vec![vec![Cell::default(); config.cols]; config.rows],
        })
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn cell_size(&self) -> f64 { self.cell_size }
    pub fn start(&self) -> Pos { self.start }
    pub fn end(&self) -> Pos { self.end }
    pub fn algorithm(&self) -> Algorithm { self.algorithm }
    pub fn loops_added(&self) -> usize { self.loops_added }
    pub fn cells(&self) -> &[Vec<Cell>] { &self.cells }

    pub fn contains(&self, p: Pos) -> bool { p.x < self.cols && p.y < self.rows }

    pub fn cell(&self, p: Pos) -> Option<&Cell> { self.cells.get(p.y).and_then(|row| row.get(p.x)) }

    fn cell_mut(&mut self, p: Pos) -> &mut Cell { &mut self.cells[p.y][p.x] }

    /// In-bounds grid neighbor, walls ignored.
    pub fn neighbor(&self, p: Pos, dir: Direction) -> Option<Pos> {
        if !self.contains(p) { return None; }
        let (dx, dy) = dir.delta();
        let x = p.x.checked_add_signed(dx as isize)?;
        let y = p.y.checked_add_signed(dy as isize)?;
        let n = Pos::new(x, y);
        self.contains(n).then_some(n)
    }

    /// Out-of-bounds positions count as fully walled.
    pub fn has_wall(&self, p: Pos, dir: Direction) -> bool {
        self.cell(p).map_or(true, |c| c.walls.get(dir))
    }

    /// Neighbors reachable in one step, in up/right/down/left order.
    pub fn open_neighbors(&self, p: Pos) -> Vec<Pos> {
        Direction::ALL
            .into_iter()
            .filter(|&d| !self.has_wall(p, d))
            .filter_map(|d| self.neighbor(p, d))
            .collect()
    }

    /// Number of interior walls that have been removed.
    pub fn open_passages(&self) -> usize {
        let mut open = 0;
        for y in 0..self.rows { for x in 0..self.cols {
            let p = Pos::new(x, y);
            for dir in [Direction::Right, Direction::Down] {
                if self.neighbor(p, dir).is_some() && !self.has_wall(p, dir) { open += 1; }
            }
        }}
        open
    }

    /// True when every shared wall agrees on both sides and the border is closed.
    pub fn walls_consistent(&self) -> bool { self.one_sided_wall().is_none() }

    /// First wall, in row-major order, whose other side disagrees. A missing
    /// border wall counts, since it has no other side to agree with.
    pub fn one_sided_wall(&self) -> Option<(Pos, Direction)> {
        (0..self.rows)
            .flat_map(|y| (0..self.cols).map(move |x| Pos::new(x, y)))
            .flat_map(|p| Direction::ALL.into_iter().map(move |dir| (p, dir)))
            .find(|&(p, dir)| match self.neighbor(p, dir) {
                Some(n) => self.has_wall(p, dir) != self.has_wall(n, dir.opposite()),
                None => !self.has_wall(p, dir),
            })
    }

    fn remove_wall(&mut self, p: Pos, dir: Direction) {
        let Some(n) = self.neighbor(p, dir) else { return };
        self.cell_mut(p).walls.clear(dir);
        self.cell_mut(n).walls.clear(dir.opposite());
    }

    fn unvisited_neighbors(&self, p: Pos) -> Vec<(Direction, Pos)> {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbor(p, d).map(|n| (d, n)))
            .filter(|&(_, n)| !self.cells[n.y][n.x].visited)
            .collect()
    }

    fn carve_backtracker(&mut self, rng: &mut SeededRandom) {
        let start = self.start;
        self.cell_mut(start).visited = true;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let mut options = self.unvisited_neighbors(current);
            if options.is_empty() { continue; }
            stack.push(current);
            rng.shuffle(&mut options);
            let (dir, next) = options[0];
            self.remove_wall(current, dir);
            self.cell_mut(next).visited = true;
            stack.push(next);
        }
    }

    fn carve_prim(&mut self, rng: &mut SeededRandom) {
        let start = self.start;
        self.cell_mut(start).visited = true;
        let mut frontier: Vec<Frontier> = self
            .unvisited_neighbors(start)
            .into_iter()
            .map(|(dir, cell)| Frontier { cell, from: start, dir })
            .collect();
        while !frontier.is_empty() {
            // order-preserving removal keeps later picks reproducible
            let Frontier { cell, from, dir } = frontier.remove(rng.index(frontier.len()));
            if self.cells[cell.y][cell.x].visited { continue; }
            self.remove_wall(from, dir);
            self.cell_mut(cell).visited = true;
            frontier.extend(
                self.unvisited_neighbors(cell)
                    .into_iter()
                    .map(|(d, n)| Frontier { cell: n, from: cell, dir: d }),
            );
        }
    }

    /// Knocks out up to `count` extra walls. An iteration that lands on a
    /// cell with no interior wall left is skipped, not retried.
    fn add_loops(&mut self, count: usize, rng: &mut SeededRandom) -> usize {
        let mut removed = 0;
        for _ in 0..count {
            let x = rng.index(self.cols);
            let y = rng.index(self.rows);
            let p = Pos::new(x, y);
            let walled: Vec<Direction> = Direction::ALL
                .into_iter()
                .filter(|&d| self.has_wall(p, d) && self.neighbor(p, d).is_some())
                .collect();
            if walled.is_empty() {
                trace!("no walled neighbor at {p}, skipping loop");
                continue;
            }
            let dir = walled[rng.index(walled.len())];
            self.remove_wall(p, dir);
            removed += 1;
        }
        self.loops_added += removed;
        removed
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Grid with every interior wall removed.
    pub(crate) fn open_grid(cols: usize, rows: usize) -> MazeGrid {
        let mut g = MazeGrid::blank(&MazeConfig::new(cols, rows), Algorithm::Backtracker).unwrap();
        for y in 0..rows { for x in 0..cols {
            g.remove_wall(Pos::new(x, y), Direction::Right);
            g.remove_wall(Pos::new(x, y), Direction::Down);
        }}
        g
    }

    fn spanning_tree(cols: usize, rows: usize, algorithm: Algorithm, seed: i64) -> MazeGrid {
        let mut g = MazeGrid::blank(&MazeConfig::new(cols, rows), algorithm).unwrap();
        let mut rng = SeededRandom::new(seed);
        match algorithm {
            Algorithm::Backtracker => g.carve_backtracker(&mut rng),
            Algorithm::Prim => g.carve_prim(&mut rng),
        }
        g
    }

    #[test]
    fn both_algorithms_build_spanning_trees() {
        for algorithm in [Algorithm::Backtracker, Algorithm::Prim] {
            for seed in 0..20 {
                let g = spanning_tree(9, 7, algorithm, seed);
                assert_eq!(g.open_passages(), 9 * 7 - 1, "{algorithm:?} seed {seed}");
                assert!(g.walls_consistent());
                assert!(g.cells().iter().flatten().all(|c| c.visited));
            }
        }
    }

    #[test]
    fn loops_only_open_walls() {
        for seed in 0..20 {
            let mut g = spanning_tree(12, 12, Algorithm::Prim, seed);
            let before = g.open_passages();
            let mut rng = SeededRandom::new(seed + 1000);
            let removed = g.add_loops(30, &mut rng);
            assert!(removed <= 30);
            assert_eq!(g.open_passages(), before + removed);
            assert!(g.walls_consistent());
        }
    }

    #[test]
    fn loops_skip_fully_open_cells() {
        let mut g = open_grid(3, 3);
        let mut rng = SeededRandom::new(5);
        assert_eq!(g.add_loops(10, &mut rng), 0);
        assert_eq!(g.loops_added(), 0);
    }

    #[test]
    fn single_cell_grid_has_no_passages() {
        let g = spanning_tree(1, 1, Algorithm::Backtracker, 1);
        assert_eq!(g.open_passages(), 0);
        assert_eq!(g.cell(Pos::new(0, 0)).unwrap().walls, Walls::CLOSED);
    }

    #[test]
    fn neighbor_respects_bounds() {
        let g = open_grid(2, 2);
        assert_eq!(g.neighbor(Pos::new(0, 0), Direction::Up), None);
        assert_eq!(g.neighbor(Pos::new(0, 0), Direction::Left), None);
        assert_eq!(g.neighbor(Pos::new(0, 0), Direction::Right), Some(Pos::new(1, 0)));
        assert_eq!(g.neighbor(Pos::new(1, 1), Direction::Down), None);
        assert_eq!(g.neighbor(Pos::new(5, 5), Direction::Up), None);
    }

    #[test]
    fn boundary_walls_survive() {
        let g = open_grid(3, 2);
        assert!(g.has_wall(Pos::new(0, 0), Direction::Up));
        assert!(g.has_wall(Pos::new(2, 1), Direction::Right));
        assert!(!g.has_wall(Pos::new(1, 0), Direction::Down));
    }
}
