//! # Random Maze Generation
//!
//! Carves a perfect maze by randomized depth-first search over the rooms at
//! odd coordinates, optionally knocks out extra walls to create loops, then
//! places the start and the control room at the two ends of a long shortest
//! path so the explorer has to travel.

use crate::grid::{Cell, Position};
use crate::maze::{Maze, bfs_distances};
use anyhow::{Context, Result, ensure};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Generates a `width` x `height` maze.
///
/// # Arguments
/// * `width`, `height` - Outer dimensions including the border walls; at least 5.
/// * `loops` - Number of extra walls to remove between adjacent corridors.
/// * `seed` - An optional seed for reproducibility.
pub fn generate(width: usize, height: usize, loops: usize, seed: Option<u64>) -> Result<Maze> {
    ensure!(
        width >= 5 && height >= 5,
        "maze must be at least 5x5, got {}x{}",
        width,
        height
    );
    let mut rng = match seed {
        Some(s) => ChaCha20Rng::seed_from_u64(s),
        None => ChaCha20Rng::from_os_rng(),
    };

    // Rooms live at (2r + 1, 2c + 1); everything else starts as wall.
    let room_rows = (height - 1) / 2;
    let room_cols = (width - 1) / 2;
    let mut open = mat![false; height; width];
    let mut visited = mat![false; room_rows; room_cols];
    visited[0][0] = true;
    open[1][1] = true;
    let mut stack = vec![(0, 0)];
    while let Some(&(r, c)) = stack.last() {
        let mut next = Vec::with_capacity(4);
        if r > 0 && !visited[r - 1][c] {
            next.push((r - 1, c));
        }
        if c > 0 && !visited[r][c - 1] {
            next.push((r, c - 1));
        }
        if c + 1 < room_cols && !visited[r][c + 1] {
            next.push((r, c + 1));
        }
        if r + 1 < room_rows && !visited[r + 1][c] {
            next.push((r + 1, c));
        }
        match next.choose(&mut rng) {
            Some(&(nr, nc)) => {
                visited[nr][nc] = true;
                open[r + nr + 1][c + nc + 1] = true;
                open[2 * nr + 1][2 * nc + 1] = true;
                stack.push((nr, nc));
            }
            None => {
                stack.pop();
            }
        }
    }

    let mut removed = 0;
    for _ in 0..loops * 20 {
        if removed == loops {
            break;
        }
        let y = rng.random_range(1..height - 1);
        let x = rng.random_range(1..width - 1);
        if open[y][x] {
            continue;
        }
        let horizontal = open[y][x - 1] && open[y][x + 1] && !open[y - 1][x] && !open[y + 1][x];
        let vertical = open[y - 1][x] && open[y + 1][x] && !open[y][x - 1] && !open[y][x + 1];
        if horizontal || vertical {
            open[y][x] = true;
            removed += 1;
        }
    }

    // Start and control room at the ends of a longest shortest path.
    let floors: Vec<Position> = (0..height)
        .flat_map(|y| (0..width).map(move |x| Position::new(x, y)))
        .filter(|p| open[p.y][p.x])
        .collect();
    let seed_cell = *floors.choose(&mut rng).context("no room was carved")?;
    let start = farthest(&open, seed_cell);
    let control_room = farthest(&open, start);

    let rows: Vec<String> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let p = Position::new(x, y);
                    let cell = if p == start {
                        Cell::Start
                    } else if p == control_room {
                        Cell::ControlRoom
                    } else if open[y][x] {
                        Cell::Floor
                    } else {
                        Cell::Wall
                    };
                    cell.to_char()
                })
                .collect()
        })
        .collect();
    Maze::parse(&rows)
}

fn farthest(open: &[Vec<bool>], from: Position) -> Position {
    let dist = bfs_distances(open, from);
    let mut best = (0, from);
    for (y, row) in dist.iter().enumerate() {
        for (x, &d) in row.iter().enumerate() {
            if d != usize::MAX && d > best.0 {
                best = (d, Position::new(x, y));
            }
        }
    }
    best.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_connected_and_bordered() {
        let maze = generate(21, 11, 0, Some(123)).unwrap();
        assert_eq!(maze.width(), 21);
        assert_eq!(maze.height(), 11);
        let rows = maze.rows();
        assert!(rows[0].chars().all(|c| c == '#'));
        assert!(rows[10].chars().all(|c| c == '#'));
        assert!(rows.iter().all(|r| r.starts_with('#') && r.ends_with('#')));

        let dist = bfs_distances(&maze.passable(), maze.start());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c != '#' {
                    assert_ne!(dist[y][x], usize::MAX, "({}, {}) is cut off", x, y);
                }
            }
        }
        assert!(maze.distance(maze.start(), maze.control_room()).unwrap() >= 10);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let a = generate(15, 9, 3, Some(7)).unwrap();
        let b = generate(15, 9, 3, Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_loops_add_floor() {
        let perfect = generate(25, 15, 0, Some(42)).unwrap();
        let braided = generate(25, 15, 10, Some(42)).unwrap();
        let floor = |m: &Maze| m.rows().concat().chars().filter(|&c| c != '#').count();
        assert!(floor(&braided) > floor(&perfect));
    }

    #[test]
    fn test_rejects_tiny_mazes() {
        assert!(generate(3, 9, 0, Some(1)).is_err());
    }
}
