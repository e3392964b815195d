use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use labyrinth::{mapgen, svg};
use std::fs;

#[derive(Parser)]
struct Cli {
    /// Maze width, border included.
    #[clap(long, short = 'W', default_value_t = 31)]
    width: usize,
    /// Maze height, border included.
    #[clap(long, short = 'H', default_value_t = 15)]
    height: usize,
    /// Extra walls to knock out, creating loops.
    #[clap(long, short = 'l', default_value_t = 0)]
    loops: usize,
    /// Path to output file. If not provided, outputs to stdout.
    #[clap(long, short = 'o', default_value = "")]
    output: String,
    /// File format: json, text or svg. If not provided, infers from output file extension.
    #[clap(long, short = 'f', default_value = "unspecified")]
    format: Format,
    #[clap(long, short = 'c', default_value_t = false)]
    compact: bool,
    #[clap(long, short = 's')]
    seed: Option<u64>,
}

#[derive(Default, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    #[default]
    Unspecified,
    Json,
    Text,
    Svg,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let maze = mapgen::random::generate(args.width, args.height, args.loops, args.seed)?;
    // Infer format from output file extension if not specified.
    let format = if args.format == Format::Unspecified {
        if args.output.ends_with(".json") {
            Format::Json
        } else if args.output.ends_with(".svg") {
            Format::Svg
        } else if args.output.ends_with(".txt") {
            Format::Text
        } else if args.output.is_empty() {
            Format::Json
        } else {
            bail!("Cannot infer format from output file extension. Specify format with -f option.")
        }
    } else {
        args.format.clone()
    };

    use std::io::Write;

    let mut w: Box<dyn Write> = if args.output.is_empty() {
        Box::new(std::io::stdout())
    } else {
        Box::new(fs::File::create(&args.output)?)
    };

    match format {
        Format::Json => {
            if args.compact {
                serde_json::to_writer(&mut w, &maze)?;
            } else {
                serde_json::to_writer_pretty(&mut w, &maze)?;
            }
            writeln!(w)?;
        }
        Format::Text => {
            for row in maze.rows() {
                writeln!(w, "{}", row)?;
            }
        }
        Format::Svg => {
            let svg_content = svg::render(&maze, &[]);
            w.write_all(svg_content.as_bytes())?;
        }
        Format::Unspecified => {
            unreachable!()
        }
    }
    Ok(())
}
