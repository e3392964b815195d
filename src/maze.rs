//! # Full Mazes
//!
//! A `Maze` is the judge's side of the board: every cell known, exactly one
//! start (`T`) and one control room (`C`). It serializes to JSON as
//! `{"rows": [...]}`.

use crate::grid::{Cell, Direction, Position};
use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeJson", into = "MazeJson")]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    control_room: Position,
}

#[derive(Serialize, Deserialize)]
struct MazeJson {
    rows: Vec<String>,
}

impl TryFrom<MazeJson> for Maze {
    type Error = anyhow::Error;

    fn try_from(json: MazeJson) -> Result<Self> {
        Maze::parse(&json.rows)
    }
}

impl From<Maze> for MazeJson {
    fn from(maze: Maze) -> Self {
        MazeJson { rows: maze.rows() }
    }
}

impl Maze {
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        ensure!(!rows.is_empty(), "maze has no rows");
        let width = rows[0].as_ref().chars().count();
        ensure!(width > 0, "maze has empty rows");
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        let mut start = None;
        let mut control_room = None;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            ensure!(
                row.chars().count() == width,
                "row {} has length {}, expected {}",
                y,
                row.chars().count(),
                width
            );
            for (x, c) in row.chars().enumerate() {
                let cell = match Cell::from_char(c) {
                    Some(Cell::Unknown) | None => {
                        bail!("invalid maze symbol {:?} at ({}, {})", c, x, y)
                    }
                    Some(cell) => cell,
                };
                let slot = match cell {
                    Cell::Start => Some(&mut start),
                    Cell::ControlRoom => Some(&mut control_room),
                    _ => None,
                };
                if let Some(slot) = slot {
                    ensure!(slot.is_none(), "duplicate {:?} at ({}, {})", c, x, y);
                    *slot = Some(Position::new(x, y));
                }
                cells.push(cell);
            }
        }
        let Some(start) = start else {
            bail!("maze has no start cell 'T'");
        };
        let Some(control_room) = control_room else {
            bail!("maze has no control room 'C'");
        };
        Ok(Self {
            width,
            height,
            cells,
            start,
            control_room,
        })
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn control_room(&self) -> Position {
        self.control_room
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Anything outside the maze reads as a wall.
    pub fn at(&self, pos: Position) -> Cell {
        if self.contains(pos) {
            self.cells[pos.y * self.width + pos.x]
        } else {
            Cell::Wall
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.to_char()).collect())
            .collect()
    }

    pub fn passable(&self) -> Vec<Vec<bool>> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| !self.at(Position::new(x, y)).is_wall())
                    .collect()
            })
            .collect()
    }

    /// Number of moves on a shortest walk between two cells.
    pub fn distance(&self, from: Position, to: Position) -> Option<usize> {
        let dist = bfs_distances(&self.passable(), from);
        let d = *dist.get(to.y)?.get(to.x)?;
        (d != usize::MAX).then_some(d)
    }
}

/// Breadth-first distances over a `[row][column]` passability table.
/// Unreachable cells are `usize::MAX`.
pub fn bfs_distances(passable: &[Vec<bool>], from: Position) -> Vec<Vec<usize>> {
    let height = passable.len();
    let width = passable.first().map_or(0, |r| r.len());
    let mut dist = mat![usize::MAX; height; width];
    if from.y >= height || from.x >= width || !passable[from.y][from.x] {
        return dist;
    }
    dist[from.y][from.x] = 0;
    let mut queue = VecDeque::from([from]);
    while let Some(p) = queue.pop_front() {
        for dir in Direction::ALL {
            let Some(q) = p.step(dir) else {
                continue;
            };
            if q.y >= height || q.x >= width || !passable[q.y][q.x] {
                continue;
            }
            if dist[q.y][q.x] == usize::MAX {
                dist[q.y][q.x] = dist[p.y][p.x] + 1;
                queue.push_back(q);
            }
        }
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: [&str; 4] = ["#######", "#T..#.#", "#.#...#", "#######"];

    #[test]
    fn parse_finds_start_and_control_room() {
        let mut rows = ROWS.map(String::from);
        rows[1].replace_range(5..6, "C");
        let maze = Maze::parse(&rows).unwrap();
        assert_eq!(maze.width(), 7);
        assert_eq!(maze.height(), 4);
        assert_eq!(maze.start(), Position::new(1, 1));
        assert_eq!(maze.control_room(), Position::new(5, 1));
        assert_eq!(maze.at(Position::new(4, 1)), Cell::Wall);
        assert_eq!(maze.at(Position::new(9, 9)), Cell::Wall);
        assert_eq!(maze.distance(maze.start(), maze.control_room()), Some(6));
        assert_eq!(maze.rows(), rows);
    }

    #[test]
    fn parse_rejects_invalid_mazes() {
        assert!(Maze::parse(&ROWS).is_err(), "missing control room");
        assert!(Maze::parse(&["TC", "C."]).is_err(), "duplicate control room");
        assert!(Maze::parse(&["TC", "?."]).is_err(), "unknown cell");
        assert!(Maze::parse(&["TC", "..."]).is_err(), "ragged rows");
        assert!(Maze::parse::<&str>(&[]).is_err());
    }

    #[test]
    fn json_round_trip_validates() {
        let maze = Maze::parse(&["#####", "#T.C#", "#####"]).unwrap();
        let json = serde_json::to_string(&maze).unwrap();
        let expected = serde_json::json!({"rows": ["#####", "#T.C#", "#####"]});
        assert_eq!(json, expected.to_string());
        assert_eq!(Maze::from_json(&json).unwrap(), maze);
        assert!(Maze::from_json(r#"{"rows":["T.."]}"#).is_err());
    }

    #[test]
    fn bfs_marks_unreachable_cells() {
        let maze = Maze::parse(&["T#C", "..#"]).unwrap();
        assert_eq!(maze.distance(maze.start(), maze.control_room()), None);
        let dist = bfs_distances(&maze.passable(), maze.start());
        assert_eq!(dist[1][1], 2);
        assert_eq!(dist[0][1], usize::MAX);
    }
}
