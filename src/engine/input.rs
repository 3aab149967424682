use super::geom::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step on a y-down grid.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Intent produced by the input adapter. Positions are logical canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    Pointer(Vec2),
    Click(Vec2),
    Arrow(Direction),
    Confirm, // Enter
    Cancel,  // Backspace
    /// Space: start/pause, or start the next wave.
    Toggle,
    Reset,      // R
    Select(u8), // digit keys
    Cycle,      // D
}
