use anyhow::Context;
use clap::Parser;
use labyrinth::judge::{LocalJudge, play};
use labyrinth::maze::Maze;
use labyrinth::problems::{self, all_problems};
use labyrinth::{mapgen, svg};
use std::fs;

/// Plays the explorer against the local judge and reports the verdict.
#[derive(Parser, Debug)]
struct Cli {
    /// Name of a preset maze.
    #[clap(long, short = 'p')]
    preset: Option<String>,
    /// Path to a JSON maze written by generate_map.
    #[clap(long, short = 'm', conflicts_with = "preset")]
    map: Option<String>,
    /// Width of a generated maze.
    #[clap(long, short = 'W', default_value_t = 31)]
    width: usize,
    /// Height of a generated maze.
    #[clap(long, short = 'H', default_value_t = 15)]
    height: usize,
    /// Extra walls to knock out of a generated maze.
    #[clap(long, short = 'l', default_value_t = 0)]
    loops: usize,
    #[clap(long, short = 's')]
    seed: Option<u64>,
    /// Alarm rounds. Defaults to the preset's, or twice the shortest way home.
    #[clap(long, short = 'a')]
    alarm: Option<usize>,
    /// Path to write an SVG of the run.
    #[clap(long)]
    svg: Option<String>,
    /// List the presets and exit.
    #[clap(long, default_value_t = false)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    if args.list {
        for p in all_problems() {
            let maze = p.maze();
            println!(
                "{}\t{}x{}\talarm {}",
                p.problem_name,
                maze.width(),
                maze.height(),
                p.alarm_rounds
            );
        }
        return Ok(());
    }

    let (name, maze, preset_alarm) = if let Some(name) = &args.preset {
        let problem = problems::get_problem(name)
            .with_context(|| format!("Unknown problem: {}", name))?;
        (name.clone(), problem.maze(), Some(problem.alarm_rounds))
    } else if let Some(path) = &args.map {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let maze = Maze::from_json(&json).with_context(|| format!("Invalid maze in {}", path))?;
        (path.clone(), maze, None)
    } else {
        let maze = mapgen::random::generate(args.width, args.height, args.loops, args.seed)?;
        ("random".to_string(), maze, None)
    };
    let alarm = match args.alarm.or(preset_alarm) {
        Some(alarm) => alarm,
        None => {
            maze.distance(maze.control_room(), maze.start())
                .context("control room is unreachable from the start")?
                * 2
        }
    };

    let mut judge = LocalJudge::new(&name, maze, alarm);
    let result = play(&mut judge);
    eprintln!("!log status {}", judge.verdict());
    eprintln!("!log verdict {:?}", judge.verdict());
    eprintln!("!log moves {}", judge.trail().len() - 1);
    eprintln!("!log fuel {}", judge.fuel());

    if let Some(path) = &args.svg {
        fs::write(path, svg::render(judge.maze(), judge.trail()))
            .with_context(|| format!("Failed to write {}", path))?;
    }
    result?;
    Ok(())
}
