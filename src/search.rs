//! # Path Searches
//!
//! Two searches over the explorer's partial map, sharing one scratch of parent
//! links and path lengths sized to the grid:
//!
//! * [`Search::nearest_unknown`] is a plain breadth-first reachability search
//!   that stops at the first `?` cell it discovers.
//! * [`Search::shortest_route`] is a best-first search keyed on
//!   `manhattan + path length`, where unrevealed cells are walkable but cost
//!   [`UNKNOWN_PENALTY`] extra. Each cell is relaxed at most once, the first
//!   time it is discovered.

use crate::SetMinMax;
use crate::error::ExplorerError;
use crate::grid::{Cell, Direction, Grid, Position};
use itertools::Itertools;
use log::{debug, trace};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

/// Extra priority for stepping onto an unrevealed cell.
pub const UNKNOWN_PENALTY: usize = 5;

const NONE: usize = !0;

/// A planned sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub steps: VecDeque<Direction>,
    /// False when the route crosses at least one unrevealed cell.
    pub confirmed: bool,
}

impl Route {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

pub struct Search {
    parents: Vec<usize>,
    dist: Vec<usize>,
}

impl Search {
    pub fn new(num_cells: usize) -> Self {
        Self {
            parents: vec![NONE; num_cells],
            dist: vec![usize::MAX; num_cells],
        }
    }

    fn reset(&mut self, origin: usize) {
        self.parents.fill(NONE);
        self.dist.fill(usize::MAX);
        self.parents[origin] = origin;
        self.dist[origin] = 0;
    }

    /// Length of the path to `index` found by the last search, if it was reached.
    pub fn distance(&self, index: usize) -> Option<usize> {
        self.dist.get(index).copied().filter(|&d| d != usize::MAX)
    }

    /// Breadth-first search from `from` to the closest reachable unrevealed cell.
    pub fn nearest_unknown(&mut self, grid: &Grid, from: Position) -> Option<Position> {
        let origin = grid.index(from);
        self.reset(origin);
        let mut queue = VecDeque::from([origin]);
        while let Some(u) = queue.pop_front() {
            for dir in Direction::ALL {
                let Some(v) = grid.neighbor(u, dir) else {
                    continue;
                };
                if self.parents[v] != NONE {
                    continue;
                }
                match grid.cell(v) {
                    Cell::Unknown => {
                        let target = grid.position(v);
                        debug!("nearest unknown cell from {} is {}", from, target);
                        return Some(target);
                    }
                    Cell::Wall => {}
                    _ => {
                        self.parents[v] = u;
                        self.dist[v] = self.dist[u] + 1;
                        queue.push_back(v);
                    }
                }
            }
        }
        debug!("no unknown cell reachable from {}", from);
        None
    }

    /// Best-first search from `from` to `to`.
    pub fn shortest_route(
        &mut self,
        grid: &Grid,
        from: Position,
        to: Position,
    ) -> Result<Route, ExplorerError> {
        let src = grid.index(from);
        let dst = grid.index(to);
        self.reset(src);

        // (priority, insertion order, flat index)
        let mut heap = BinaryHeap::new();
        let mut seq = 0;
        heap.push(Reverse((0, seq, src)));
        let mut found = false;
        while let Some(Reverse((priority, _, u))) = heap.pop() {
            trace!("expand {} with priority {}", grid.position(u), priority);
            if u == dst {
                found = true;
                break;
            }
            let len = self.dist[u] + 1;
            for dir in Direction::ALL {
                let Some(v) = grid.neighbor(u, dir) else {
                    continue;
                };
                let cell = grid.cell(v);
                if cell.is_wall() || self.parents[v] != NONE || !self.dist[v].setmin(len) {
                    continue;
                }
                self.parents[v] = u;
                let mut priority = grid.position(v).manhattan(to) + len;
                if cell == Cell::Unknown {
                    priority += UNKNOWN_PENALTY;
                }
                seq += 1;
                heap.push(Reverse((priority, seq, v)));
            }
        }
        if !found {
            debug!("search from {} to {} exhausted", from, to);
            return Err(ExplorerError::SearchExhausted { from, to });
        }
        let route = self.reconstruct(grid, src, dst);
        debug!(
            "route {} -> {} ({} steps, confirmed: {}): {}",
            from,
            to,
            route.len(),
            route.confirmed,
            route.steps.iter().join(" ")
        );
        Ok(route)
    }

    fn reconstruct(&self, grid: &Grid, src: usize, dst: usize) -> Route {
        let mut steps = vec![];
        let mut confirmed = true;
        let mut pos = dst;
        while pos != src {
            if grid.cell(pos) == Cell::Unknown {
                confirmed = false;
            }
            let parent = self.parents[pos];
            steps.push(Direction::between(parent, pos));
            pos = parent;
        }
        steps.reverse();
        Route {
            steps: steps.into(),
            confirmed,
        }
    }
}
