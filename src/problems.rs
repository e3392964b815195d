use crate::maze::Maze;
use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub problem_name: &'static str,
    pub rows: &'static [&'static str],
    /// Moves allowed between entering the control room and reaching the start.
    pub alarm_rounds: usize,
}

impl Problem {
    pub fn maze(&self) -> Maze {
        Maze::parse(self.rows)
            .unwrap_or_else(|e| panic!("preset {}: {}", self.problem_name, e))
    }
}

const PROBLEMS_DATA: &[Problem] = &[
    Problem {
        problem_name: "corridor",
        rows: &["##########", "#T......C#", "##########"],
        alarm_rounds: 10,
    },
    Problem {
        problem_name: "open_room",
        rows: &[
            "##########",
            "#T.......#",
            "#........#",
            "#........#",
            "#.......C#",
            "##########",
        ],
        alarm_rounds: 20,
    },
    Problem {
        problem_name: "pillars",
        rows: &[
            "#########",
            "#T......#",
            "#.#.#.#.#",
            "#.......#",
            "#.#.#.#.#",
            "#......C#",
            "#########",
        ],
        alarm_rounds: 16,
    },
    Problem {
        problem_name: "hidden_room",
        rows: &[
            "#############",
            "#T..#.......#",
            "###.#.#####.#",
            "#...#.#...#.#",
            "#.###.#.#.#.#",
            "#.....#.#C..#",
            "#############",
        ],
        alarm_rounds: 40,
    },
];

pub fn all_problems() -> &'static [Problem] {
    PROBLEMS_DATA
}

// Build a name -> problem map once for O(1) lookup.
static PROBLEM_MAP: Lazy<HashMap<&'static str, &'static Problem>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for p in PROBLEMS_DATA.iter() {
        m.insert(p.problem_name, p);
    }
    m
});

pub fn get_problem(name: &str) -> Option<&'static Problem> {
    PROBLEM_MAP.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_problems_contains_expected_entries() {
        let names: Vec<&str> = all_problems().iter().map(|p| p.problem_name).collect();
        assert_eq!(names, vec!["corridor", "open_room", "pillars", "hidden_room"]);
    }

    #[test]
    fn presets_are_valid_and_escapable_in_time() {
        for p in all_problems() {
            let maze = p.maze();
            let home = maze
                .distance(maze.control_room(), maze.start())
                .unwrap_or_else(|| panic!("{}: control room cut off", p.problem_name));
            assert!(
                home <= p.alarm_rounds,
                "{}: {} > {}",
                p.problem_name,
                home,
                p.alarm_rounds
            );
        }
    }

    #[test]
    fn get_problem_returns_expected() {
        let p = get_problem("hidden_room").expect("hidden_room should exist");
        assert_eq!(p.alarm_rounds, 40);
        assert_eq!(p.maze().control_room().y, 5);
        assert!(get_problem("unknown").is_none());
    }
}
