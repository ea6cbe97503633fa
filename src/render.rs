use colored::*;
use itertools::Itertools;
use megh_core::{Direction, MazeGrid, Pos};

/// Trails drawn on top of the walls. Later layers win where they overlap.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay<'a> {
    pub solution: &'a [Pos],
    pub dead_ends: &'a [Vec<Pos>],
    pub active: &'a [Pos],
    pub player: Option<Pos>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark { Empty, Solution, DeadEnd, Active, Start, End, Player }

impl Mark {
    fn glyph(self) -> char {
        match self {
            Mark::Empty => ' ',
            Mark::Solution => '·',
            Mark::DeadEnd => 'x',
            Mark::Active => '•',
            Mark::Start => 'S',
            Mark::End => 'E',
            Mark::Player => '@',
        }
    }

    fn paint(self, color: bool) -> String {
        let s = format!(" {} ", self.glyph());
        if !color { return s; }
        match self {
            Mark::Empty => s,
            Mark::Solution => s.cyan().to_string(),
            Mark::DeadEnd => s.dimmed().to_string(),
            Mark::Active => s.green().to_string(),
            Mark::Start | Mark::End => s.yellow().bold().to_string(),
            Mark::Player => s.magenta().bold().to_string(),
        }
    }
}

fn marks(grid: &MazeGrid, overlay: &Overlay) -> Vec<Vec<Mark>> {
    let mut m = vec![vec![Mark::Empty; grid.cols()]; grid.rows()];
    let mut paint = |p: Pos, mark: Mark| { if grid.contains(p) { m[p.y][p.x] = mark; } };
    overlay.solution.iter().for_each(|&p| paint(p, Mark::Solution));
    overlay.dead_ends.iter().flatten().for_each(|&p| paint(p, Mark::DeadEnd));
    overlay.active.iter().for_each(|&p| paint(p, Mark::Active));
    paint(grid.start(), Mark::Start);
    paint(grid.end(), Mark::End);
    if let Some(p) = overlay.player { paint(p, Mark::Player); }
    m
}

/// Text picture of the maze, three characters per cell.
pub fn render(grid: &MazeGrid, overlay: &Overlay, color: bool) -> String {
    let marks = marks(grid, overlay);
    let mut lines = Vec::with_capacity(grid.rows() * 2 + 1);

    let top: String = (0..grid.cols())
        .map(|x| if grid.has_wall(Pos::new(x, 0), Direction::Up) { "---+" } else { "   +" })
        .collect();
    lines.push(format!("+{top}"));

    for y in 0..grid.rows() {
        let mut cells = String::from(if grid.has_wall(Pos::new(0, y), Direction::Left) { "|" } else { " " });
        let mut floor = String::from("+");
        for x in 0..grid.cols() {
            let p = Pos::new(x, y);
            cells.push_str(&marks[y][x].paint(color));
            cells.push(if grid.has_wall(p, Direction::Right) { '|' } else { ' ' });
            floor.push_str(if grid.has_wall(p, Direction::Down) { "---" } else { "   " });
            floor.push('+');
        }
        lines.push(cells);
        lines.push(floor);
    }
    lines.into_iter().join("\n")
}

pub fn legend() -> String {
    [Mark::Start, Mark::End, Mark::Player, Mark::Active, Mark::DeadEnd, Mark::Solution]
        .into_iter()
        .zip(["start", "end", "player", "route", "dead end", "solution"])
        .map(|(m, name)| format!("{} {}", m.glyph(), name))
        .join("   ")
}
