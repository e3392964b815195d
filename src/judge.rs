use crate::explorer::Explorer;
use crate::grid::{Cell, Direction, Position};
use crate::maze::Maze;
use anyhow::{Context, Result, ensure};
use log::{debug, info};
use proconio::input;
use proconio::source::Source;
use proconio::source::line::LineSource;
use std::fmt;
use std::io::{BufRead, Write};

/// Half-width of the square the scanner reveals around the agent.
pub const SCAN_RADIUS: usize = 2;
/// Moves available for the whole run.
pub const FUEL: usize = 1200;

/// One turn of input: where the agent stands and what the map looks like now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Observation {
    pub agent: Position,
    pub rows: Vec<String>,
}

pub trait Judge {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn alarm_rounds(&self) -> usize;
    fn problem_name(&self) -> &str;
    /// The next observation, or `None` once the run is over.
    fn observe(&mut self) -> Result<Option<Observation>>;
    fn act(&mut self, dir: Direction) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Running,
    Escaped,
    WalkedIntoWall,
    AlarmExpired,
    OutOfFuel,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Running => "RUNNING",
            Verdict::Escaped => "AC",
            Verdict::WalkedIntoWall | Verdict::AlarmExpired | Verdict::OutOfFuel => "WA",
        };
        f.write_str(s)
    }
}

/// In-process simulation of the puzzle rules.
pub struct LocalJudge {
    problem_name: String,
    maze: Maze,
    alarm_rounds: usize,
    agent: Position,
    revealed: Vec<bool>,
    /// Moves left before the alarm goes off, once armed.
    alarm: Option<usize>,
    fuel: usize,
    verdict: Verdict,
    trail: Vec<Position>,
}

impl Judge for LocalJudge {
    fn width(&self) -> usize {
        self.maze.width()
    }
    fn height(&self) -> usize {
        self.maze.height()
    }
    fn alarm_rounds(&self) -> usize {
        self.alarm_rounds
    }
    fn problem_name(&self) -> &str {
        &self.problem_name
    }
    fn observe(&mut self) -> Result<Option<Observation>> {
        if self.verdict != Verdict::Running {
            return Ok(None);
        }
        Ok(Some(Observation {
            agent: self.agent,
            rows: self.view(),
        }))
    }
    fn act(&mut self, dir: Direction) -> Result<()> {
        ensure!(
            self.verdict == Verdict::Running,
            "move {} after the run ended ({:?})",
            dir,
            self.verdict
        );
        let next = self
            .agent
            .step(dir)
            .filter(|&p| !self.maze.at(p).is_wall());
        let Some(next) = next else {
            info!("agent at {} walked {} into a wall", self.agent, dir);
            self.verdict = Verdict::WalkedIntoWall;
            return Ok(());
        };
        self.agent = next;
        self.trail.push(next);
        self.fuel -= 1;
        self.reveal();

        match self.alarm {
            None if next == self.maze.control_room() => {
                info!(
                    "control room reached, alarm armed for {} rounds",
                    self.alarm_rounds
                );
                self.alarm = Some(self.alarm_rounds);
            }
            None => {}
            Some(left) => self.alarm = Some(left.saturating_sub(1)),
        }
        if self.alarm.is_some() && next == self.maze.start() {
            self.verdict = Verdict::Escaped;
        } else if self.alarm == Some(0) {
            self.verdict = Verdict::AlarmExpired;
        } else if self.fuel == 0 {
            self.verdict = Verdict::OutOfFuel;
        }
        debug!("agent moved {} to {}, verdict {:?}", dir, next, self.verdict);
        Ok(())
    }
}

impl LocalJudge {
    pub fn new(problem_name: &str, maze: Maze, alarm_rounds: usize) -> Self {
        let agent = maze.start();
        let revealed = vec![false; maze.width() * maze.height()];
        let mut judge = Self {
            problem_name: problem_name.to_string(),
            maze,
            alarm_rounds,
            agent,
            revealed,
            alarm: None,
            fuel: FUEL,
            verdict: Verdict::Running,
            trail: vec![agent],
        };
        judge.reveal();
        judge
    }

    /// A judge for a named preset with its own alarm.
    pub fn from_problem(problem_name: &str) -> Result<Self> {
        let problem = crate::problems::get_problem(problem_name)
            .with_context(|| format!("Unknown problem: {}", problem_name))?;
        Ok(Self::new(problem_name, problem.maze(), problem.alarm_rounds))
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Every cell the agent has stood on, starting cell included.
    pub fn trail(&self) -> &[Position] {
        &self.trail
    }

    pub fn fuel(&self) -> usize {
        self.fuel
    }

    fn reveal(&mut self) {
        let Position { x, y } = self.agent;
        let (width, height) = (self.maze.width(), self.maze.height());
        let xs = x.saturating_sub(SCAN_RADIUS)..=(x + SCAN_RADIUS).min(width - 1);
        let ys = y.saturating_sub(SCAN_RADIUS)..=(y + SCAN_RADIUS).min(height - 1);
        for ry in ys {
            for rx in xs.clone() {
                self.revealed[ry * width + rx] = true;
            }
        }
    }

    fn view(&self) -> Vec<String> {
        let width = self.maze.width();
        (0..self.maze.height())
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if self.revealed[y * width + x] {
                            self.maze.at(Position::new(x, y)).to_char()
                        } else {
                            Cell::Unknown.to_char()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// The judge on the other side of a pipe, speaking the puzzle's text protocol.
pub struct RemoteJudge<R: BufRead, W: Write> {
    source: LineSource<R>,
    out: W,
    width: usize,
    height: usize,
    alarm_rounds: usize,
}

impl<R: BufRead, W: Write> Judge for RemoteJudge<R, W> {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn alarm_rounds(&self) -> usize {
        self.alarm_rounds
    }
    fn problem_name(&self) -> &str {
        "remote"
    }
    fn observe(&mut self) -> Result<Option<Observation>> {
        if self.source.is_empty() {
            return Ok(None);
        }
        let height = self.height;
        input! {
            from &mut self.source,
            row: usize,
            col: usize,
            rows: [String; height],
        }
        Ok(Some(Observation {
            agent: Position::new(col, row),
            rows,
        }))
    }
    fn act(&mut self, dir: Direction) -> Result<()> {
        writeln!(self.out, "{}", dir)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> RemoteJudge<R, W> {
    /// Reads the header line `rows columns alarm_rounds`.
    pub fn new(reader: R, out: W) -> Self {
        let mut source = LineSource::new(reader);
        input! {
            from &mut source,
            height: usize,
            width: usize,
            alarm_rounds: usize,
        }
        info!("{}x{} maze, alarm {} rounds", width, height, alarm_rounds);
        Self {
            source,
            out,
            width,
            height,
            alarm_rounds,
        }
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}

/// Runs the explorer against `judge` until the judge stops sending turns.
/// Returns the number of moves made.
pub fn play(judge: &mut dyn Judge) -> Result<usize> {
    let mut explorer = Explorer::new(judge.width(), judge.height());
    let mut moves = 0;
    while let Some(obs) = judge.observe()? {
        explorer
            .observe(obs.agent, obs.rows.as_slice())
            .with_context(|| format!("turn {}", moves + 1))?;
        let dir = explorer.next_step().with_context(|| {
            format!("turn {} in phase {:?}", moves + 1, explorer.phase())
        })?;
        judge.act(dir)?;
        moves += 1;
    }
    Ok(moves)
}
