use anyhow::{bail, Result};
use megh_core::{Direction, Pos};

/// Reads a move script such as `"RRD DL"`. Letters are case-insensitive;
/// whitespace and commas are ignored.
pub fn parse_moves(script: &str) -> Result<Vec<Direction>> {
    let mut out = Vec::with_capacity(script.len());
    for (i, ch) in script.chars().enumerate() {
        let dir = match ch.to_ascii_uppercase() {
            'U' => Direction::Up,
            'R' => Direction::Right,
            'D' => Direction::Down,
            'L' => Direction::Left,
            c if c.is_whitespace() || c == ',' => continue,
            _ => bail!("invalid move '{ch}' at position {}", i + 1),
        };
        out.push(dir);
    }
    Ok(out)
}

pub fn letter(dir: Direction) -> char {
    match dir { Direction::Up => 'U', Direction::Right => 'R', Direction::Down => 'D', Direction::Left => 'L' }
}

/// Inverse of [`parse_moves`] for a path of adjacent cells.
pub fn to_script(path: &[Pos]) -> Result<String> {
    path.windows(2)
        .map(|w| -> Result<char> {
            let dx = w[1].x as i32 - w[0].x as i32;
            let dy = w[1].y as i32 - w[0].y as i32;
            Ok(letter(Direction::from_delta(dx, dy)?))
        })
        .collect()
}
