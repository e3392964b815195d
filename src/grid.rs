//! # Grid Knowledge
//!
//! The explorer's view of the maze: a flat, row-major buffer of cells with one
//! extra terminator column per row. Horizontal moves off either edge land on
//! the terminator (a wall), so neighbour arithmetic never wraps across rows.

use crate::error::ExplorerError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Wall,
    Floor,
    Unknown,
    ControlRoom,
    Start,
}

impl Cell {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Floor),
            '?' => Some(Cell::Unknown),
            'C' => Some(Cell::ControlRoom),
            'T' => Some(Cell::Start),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => '.',
            Cell::Unknown => '?',
            Cell::ControlRoom => 'C',
            Cell::Start => 'T',
        }
    }

    pub fn is_wall(self) -> bool {
        self == Cell::Wall
    }
}

/// One orthogonal step. The declaration order is the neighbour expansion order
/// of every search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
            Direction::Down => "DOWN",
        }
    }

    /// Direction of the step `from -> to` between two adjacent flat indices.
    pub fn between(from: usize, to: usize) -> Self {
        if from.abs_diff(to) == 1 {
            if from < to {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if from < to {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The neighbouring position, or `None` when the step leaves the first
    /// row or column.
    pub fn step(self, dir: Direction) -> Option<Position> {
        match dir {
            Direction::Up => self.y.checked_sub(1).map(|y| Position::new(self.x, y)),
            Direction::Left => self.x.checked_sub(1).map(|x| Position::new(x, self.y)),
            Direction::Right => Some(Position::new(self.x + 1, self.y)),
            Direction::Down => Some(Position::new(self.x, self.y + 1)),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with every playable cell unknown.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width + 1;
        let mut cells = vec![Cell::Unknown; stride * height];
        for y in 0..height {
            cells[y * stride + width] = Cell::Wall;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride of the flat index, terminator column included.
    pub fn stride(&self) -> usize {
        self.width + 1
    }

    /// Total number of flat cells, terminator column included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn index(&self, pos: Position) -> usize {
        pos.y * self.stride() + pos.x
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index % self.stride(), index / self.stride())
    }

    /// Cell at a flat index; anything outside the buffer reads as a wall.
    pub fn cell(&self, index: usize) -> Cell {
        self.cells.get(index).copied().unwrap_or(Cell::Wall)
    }

    pub fn at(&self, pos: Position) -> Cell {
        if self.contains(pos) {
            self.cell(self.index(pos))
        } else {
            Cell::Wall
        }
    }

    /// Flat index of the neighbour in `dir`, if it lies inside the buffer.
    pub fn neighbor(&self, index: usize, dir: Direction) -> Option<usize> {
        let next = match dir {
            Direction::Up => index.checked_sub(self.stride())?,
            Direction::Left => index.checked_sub(1)?,
            Direction::Right => index + 1,
            Direction::Down => index + self.stride(),
        };
        (next < self.cells.len()).then_some(next)
    }

    /// First cell of the given kind in row-major order.
    pub fn find(&self, target: Cell) -> Option<Position> {
        self.cells
            .iter()
            .position(|&c| c == target)
            .map(|i| self.position(i))
    }

    pub fn count(&self, target: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == target).count()
    }

    /// Validates a full snapshot and lays it out with this grid's stride.
    /// The grid itself is not touched.
    pub fn parse_snapshot<S: AsRef<str>>(
        &self,
        rows: &[S],
    ) -> Result<Vec<Cell>, ExplorerError> {
        if rows.len() != self.height {
            return Err(ExplorerError::MalformedObservation(format!(
                "expected {} rows, got {}",
                self.height,
                rows.len()
            )));
        }
        let stride = self.stride();
        let mut cells = vec![Cell::Wall; self.cells.len()];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len != self.width {
                return Err(ExplorerError::MalformedObservation(format!(
                    "row {} has {} cells, expected {}",
                    y, len, self.width
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    ExplorerError::MalformedObservation(format!(
                        "unexpected symbol {:?} at ({}, {})",
                        c, x, y
                    ))
                })?;
                cells[y * stride + x] = cell;
            }
        }
        Ok(cells)
    }

    /// Replaces every cell with a snapshot from `parse_snapshot`.
    pub fn commit(&mut self, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.cells.len());
        self.cells = cells;
    }

    /// Overwrites the playable cells with a full snapshot, all or nothing.
    pub fn ingest<S: AsRef<str>>(&mut self, rows: &[S]) -> Result<(), ExplorerError> {
        let cells = self.parse_snapshot(rows)?;
        self.commit(cells);
        Ok(())
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.stride())
            .map(|row| row[..self.width].iter().map(|c| c.to_char()).collect())
            .collect()
    }
}
