use anyhow::Result;
use labyrinth::judge::{RemoteJudge, play};
use std::io::{self, BufReader};

/// Interactive solver: reads the puzzle protocol on stdin, answers on stdout.
/// Diagnostics go to stderr, filtered by `RUST_LOG`.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let mut judge = RemoteJudge::new(BufReader::new(io::stdin()), io::stdout());
    let moves = play(&mut judge)?;
    log::info!("judge closed after {} moves", moves);
    Ok(())
}
