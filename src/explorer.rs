//! # Explorer
//!
//! Turn-driven controller for the labyrinth. Each turn the judge hands over the
//! agent's position and a full snapshot of the maze; the explorer folds the
//! snapshot into its map, advances its phase and keeps a planned route whose
//! head is the next move.
//!
//! Phases only move forward:
//!
//! ```text
//! Start -> SearchingControlRoom -> GoingToControlRoom -> TryingToLeave -> Leaving
//!                                                    \______________________/
//! ```

use crate::error::ExplorerError;
use crate::grid::{Cell, Direction, Grid, Position};
use crate::search::{Route, Search};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Start,
    SearchingControlRoom,
    GoingToControlRoom,
    TryingToLeave,
    Leaving,
}

/// Outcome of one phase handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Stay,
    /// Switch phase and end the turn.
    Enter(Phase),
    /// Switch phase and run the new phase in the same turn.
    Chain(Phase),
}

pub struct Explorer {
    grid: Grid,
    search: Search,
    phase: Phase,
    agent: Option<Position>,
    start: Option<Position>,
    control_room: Option<Position>,
    route: Route,
}

impl Explorer {
    pub fn new(width: usize, height: usize) -> Self {
        let grid = Grid::new(width, height);
        let search = Search::new(grid.len());
        Self {
            grid,
            search,
            phase: Phase::Start,
            agent: None,
            start: None,
            control_room: None,
            route: Route::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agent(&self) -> Option<Position> {
        self.agent
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn control_room(&self) -> Option<Position> {
        self.control_room
    }

    pub fn planned_steps(&self) -> usize {
        self.route.len()
    }

    pub fn route_confirmed(&self) -> bool {
        self.route.confirmed
    }

    /// Ingests one turn of observation and advances the phase machine.
    pub fn observe<S: AsRef<str>>(
        &mut self,
        agent: Position,
        rows: &[S],
    ) -> Result<(), ExplorerError> {
        if !self.grid.contains(agent) {
            return Err(ExplorerError::MalformedObservation(format!(
                "agent {} outside {}x{} grid",
                agent,
                self.grid.width(),
                self.grid.height()
            )));
        }
        let cells = self.grid.parse_snapshot(rows)?;
        if cells[self.grid.index(agent)].is_wall() {
            return Err(ExplorerError::MalformedObservation(format!(
                "agent {} stands on a wall",
                agent
            )));
        }
        self.grid.commit(cells);
        self.agent = Some(agent);
        debug!("agent at {} in phase {:?}", agent, self.phase);

        loop {
            let transition = match self.phase {
                Phase::Start => self.on_start(agent),
                Phase::SearchingControlRoom => self.on_searching(agent),
                Phase::GoingToControlRoom => self.on_going(agent),
                Phase::TryingToLeave => self.on_trying_to_leave(agent),
                Phase::Leaving => self.on_leaving(agent),
            };
            match transition {
                Transition::Stay => break,
                Transition::Enter(next) => {
                    self.enter(next);
                    break;
                }
                Transition::Chain(next) => self.enter(next),
            }
        }
        Ok(())
    }

    /// Pops the next planned move.
    pub fn next_step(&mut self) -> Result<Direction, ExplorerError> {
        self.route.steps.pop_front().ok_or(ExplorerError::EmptyPath)
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "{:?} -> {:?}", self.phase, next);
        info!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn on_start(&mut self, agent: Position) -> Transition {
        self.start = Some(agent);
        info!("start position {}", agent);
        Transition::Chain(Phase::SearchingControlRoom)
    }

    fn on_searching(&mut self, agent: Position) -> Transition {
        if self.control_room.is_none() {
            self.control_room = self.grid.find(Cell::ControlRoom);
            if let Some(room) = self.control_room {
                info!("control room spotted at {}", room);
            }
        }
        if let Some(room) = self.control_room {
            if self.plan(agent, room) {
                return Transition::Enter(Phase::GoingToControlRoom);
            }
        }
        self.explore(agent);
        Transition::Stay
    }

    fn on_going(&mut self, agent: Position) -> Transition {
        let (Some(room), Some(start)) = (self.control_room, self.start) else {
            return Transition::Stay;
        };
        if agent == room {
            info!("reached the control room");
            if self.plan(agent, start) {
                Transition::Enter(Phase::Leaving)
            } else {
                self.route = Route::default();
                Transition::Enter(Phase::TryingToLeave)
            }
        } else {
            if !self.route.confirmed || self.route.is_empty() {
                self.replan(agent, room);
            }
            Transition::Stay
        }
    }

    fn on_trying_to_leave(&mut self, agent: Position) -> Transition {
        let Some(start) = self.start else {
            return Transition::Stay;
        };
        if self.plan(agent, start) {
            Transition::Enter(Phase::Leaving)
        } else {
            Transition::Stay
        }
    }

    fn on_leaving(&mut self, agent: Position) -> Transition {
        if let Some(start) = self.start {
            if agent != start && (!self.route.confirmed || self.route.is_empty()) {
                self.replan(agent, start);
            }
        }
        Transition::Stay
    }

    /// Heads for the closest unrevealed cell.
    fn explore(&mut self, agent: Position) {
        match self.search.nearest_unknown(&self.grid, agent) {
            Some(target) => {
                self.plan(agent, target);
            }
            None => {
                warn!("no unexplored cell reachable from {}", agent);
                self.route = Route::default();
            }
        }
    }

    /// Like `plan`, but drops the stale route when no path exists any more.
    fn replan(&mut self, from: Position, to: Position) {
        if !self.plan(from, to) {
            warn!("lost every path from {} to {}", from, to);
            self.route = Route::default();
        }
    }

    /// Replaces the planned route when a path exists; keeps the old one otherwise.
    fn plan(&mut self, from: Position, to: Position) -> bool {
        match self.search.shortest_route(&self.grid, from, to) {
            Ok(route) => {
                self.route = route;
                true
            }
            Err(err) => {
                debug!("{}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_grid_heads_straight_for_the_control_room() {
        let rows = ["T....", ".....", ".....", ".....", "....C"];
        let mut explorer = Explorer::new(5, 5);
        explorer.observe(Position::new(0, 0), &rows).unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);
        assert_eq!(explorer.start(), Some(Position::new(0, 0)));
        assert_eq!(explorer.control_room(), Some(Position::new(4, 4)));
        assert_eq!(explorer.planned_steps(), 8);
        assert!(explorer.route_confirmed());

        let mut steps = vec![];
        while let Ok(d) = explorer.next_step() {
            steps.push(d);
        }
        assert_eq!(steps.iter().filter(|&&d| d == Direction::Right).count(), 4);
        assert_eq!(steps.iter().filter(|&&d| d == Direction::Down).count(), 4);
        assert_eq!(explorer.next_step(), Err(ExplorerError::EmptyPath));
    }

    #[test]
    fn keeps_searching_until_the_marker_is_revealed() {
        let mut explorer = Explorer::new(7, 3);

        explorer
            .observe(Position::new(1, 1), &["####???", "#T..???", "####???"])
            .unwrap();
        assert_eq!(explorer.phase(), Phase::SearchingControlRoom);
        assert!(!explorer.route_confirmed());
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        explorer
            .observe(Position::new(2, 1), &["#####??", "#T...??", "#####??"])
            .unwrap();
        assert_eq!(explorer.phase(), Phase::SearchingControlRoom);
        assert_eq!(explorer.control_room(), None);
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        explorer
            .observe(Position::new(3, 1), &["######?", "#T...C?", "######?"])
            .unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);
        assert_eq!(explorer.control_room(), Some(Position::new(5, 1)));
        assert_eq!(explorer.planned_steps(), 2);
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        let full = ["#######", "#T...C#", "#######"];
        explorer.observe(Position::new(4, 1), &full).unwrap();
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        explorer.observe(Position::new(5, 1), &full).unwrap();
        assert_eq!(explorer.phase(), Phase::Leaving);
        assert_eq!(explorer.planned_steps(), 4);
        for _ in 0..4 {
            assert_eq!(explorer.next_step(), Ok(Direction::Left));
        }
    }

    #[test]
    fn unreachable_control_room_does_not_advance() {
        let mut explorer = Explorer::new(4, 2);
        explorer
            .observe(Position::new(0, 0), &["T.#C", "..##"])
            .unwrap();
        assert_eq!(explorer.phase(), Phase::SearchingControlRoom);
        assert_eq!(explorer.next_step(), Err(ExplorerError::EmptyPath));
    }

    #[test]
    fn retries_leaving_until_a_path_home_exists() {
        let mut explorer = Explorer::new(5, 1);
        explorer.observe(Position::new(0, 0), &["T...C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);

        explorer.observe(Position::new(4, 0), &["T.#.C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::TryingToLeave);
        assert_eq!(explorer.next_step(), Err(ExplorerError::EmptyPath));

        explorer.observe(Position::new(4, 0), &["T.#.C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::TryingToLeave);

        explorer.observe(Position::new(4, 0), &["T...C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::Leaving);
        assert_eq!(explorer.planned_steps(), 4);
        assert_eq!(explorer.start(), Some(Position::new(0, 0)));
    }

    #[test]
    fn speculative_route_is_replanned_once_revealed() {
        let mut explorer = Explorer::new(5, 1);
        explorer.observe(Position::new(0, 0), &["T?..C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);
        assert!(!explorer.route_confirmed());
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        explorer.observe(Position::new(1, 0), &["T...C"]).unwrap();
        assert!(explorer.route_confirmed());
        assert_eq!(explorer.planned_steps(), 3);
    }

    #[test]
    fn stale_route_is_dropped_when_the_way_closes() {
        let mut explorer = Explorer::new(5, 1);
        explorer.observe(Position::new(0, 0), &["T??.C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);
        assert!(!explorer.route_confirmed());
        assert_eq!(explorer.next_step(), Ok(Direction::Right));

        explorer.observe(Position::new(1, 0), &["T.#.C"]).unwrap();
        assert_eq!(explorer.phase(), Phase::GoingToControlRoom);
        assert_eq!(explorer.planned_steps(), 0);
        assert_eq!(explorer.next_step(), Err(ExplorerError::EmptyPath));
    }

    #[test]
    fn phases_only_move_forward_and_start_is_captured_once() {
        let turns: [(Position, [&str; 3]); 5] = [
            (Position::new(1, 1), ["####???", "#T..???", "####???"]),
            (Position::new(2, 1), ["#####??", "#T...??", "#####??"]),
            (Position::new(3, 1), ["######?", "#T...C?", "######?"]),
            (Position::new(4, 1), ["#######", "#T...C#", "#######"]),
            (Position::new(5, 1), ["#######", "#T...C#", "#######"]),
        ];
        let mut explorer = Explorer::new(7, 3);
        let mut phases = vec![explorer.phase()];
        for (agent, rows) in turns {
            explorer.observe(agent, &rows).unwrap();
            phases.push(explorer.phase());
            assert_eq!(explorer.start(), Some(Position::new(1, 1)));
        }
        assert!(phases.windows(2).all(|w| w[0] <= w[1]), "{:?}", phases);
        assert_eq!(phases.iter().filter(|&&p| p == Phase::Start).count(), 1);
        assert_eq!(phases.last(), Some(&Phase::Leaving));
    }

    #[test]
    fn malformed_observations_are_rejected() {
        let mut explorer = Explorer::new(3, 2);
        assert!(matches!(
            explorer.observe(Position::new(3, 0), &["T..", "..."]),
            Err(ExplorerError::MalformedObservation(_))
        ));
        assert!(matches!(
            explorer.observe(Position::new(0, 0), &["T.."]),
            Err(ExplorerError::MalformedObservation(_))
        ));
        assert!(matches!(
            explorer.observe(Position::new(1, 1), &["T..", ".#."]),
            Err(ExplorerError::MalformedObservation(_))
        ));
        assert_eq!(explorer.phase(), Phase::Start);
        assert_eq!(explorer.start(), None);
    }

    #[test]
    fn rejected_observation_keeps_the_previous_map() {
        let mut explorer = Explorer::new(3, 2);
        explorer.observe(Position::new(0, 0), &["T..", "?.C"]).unwrap();
        assert!(matches!(
            explorer.observe(Position::new(1, 1), &["T..", "###"]),
            Err(ExplorerError::MalformedObservation(_))
        ));
        assert!(matches!(
            explorer.observe(Position::new(1, 0), &["...", "#x#"]),
            Err(ExplorerError::MalformedObservation(_))
        ));
        assert_eq!(explorer.grid().rows(), vec!["T..", "?.C"]);
        assert_eq!(explorer.agent(), Some(Position::new(0, 0)));
    }
}
