use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gridfill::{find_fill, FillOptions, FillResult, Puzzle, SelectionStrategy, SupportCheck};
use log::info;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    FirstUnassigned,
    MostConstrained,
    DomOverDegree,
}

impl From<Strategy> for SelectionStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::FirstUnassigned => SelectionStrategy::FirstUnassigned,
            Strategy::MostConstrained => SelectionStrategy::MostConstrained,
            Strategy::DomOverDegree => SelectionStrategy::DomOverDegree,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Support {
    LiveDomain,
    FullClass,
}

impl From<Support> for SupportCheck {
    fn from(support: Support) -> Self {
        match support {
            Support::LiveDomain => SupportCheck::LiveDomain,
            Support::FullClass => SupportCheck::FullClass,
        }
    }
}

/// Fill a crossword grid from a word list.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grid file: one row per line, `_` for open cells, anything else for blocks.
    grid: PathBuf,

    /// Word list file: one word per line, optionally followed by `;score`.
    words: PathBuf,

    #[arg(long, value_enum, default_value = "most-constrained")]
    strategy: Strategy,

    #[arg(long, value_enum, default_value = "live-domain")]
    support_check: Support,

    /// Don't make the grid arc-consistent before searching.
    #[arg(long)]
    skip_initial_ac3: bool,

    /// Don't use the same word in more than one slot.
    #[arg(long)]
    no_duplicates: bool,

    /// Also write the filled grid to this file.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run(args: Args) -> FillResult<bool> {
    let puzzle = Puzzle::load(&args.grid, &args.words)?;
    let options = FillOptions {
        selection: args.strategy.into(),
        support_check: args.support_check.into(),
        initial_arc_consistency: !args.skip_initial_ac3,
        allow_duplicate_words: !args.no_duplicates,
    };

    let result = match find_fill(&puzzle, &options) {
        Ok(result) => result,
        Err(failure) => {
            println!("{failure}");
            return Ok(false);
        }
    };

    let display_grid = puzzle.render_grid(&result.choices);
    println!("{:?}", result.statistics);
    println!("{display_grid}");
    println!();

    for (slot_id, word) in result.words(&puzzle) {
        let slot = &puzzle.slots()[slot_id];
        println!("{} {}: {}", slot.start_cell, slot.direction, word);
    }

    if let Some(output) = &args.output {
        fs::write(output, display_grid)?;
        info!("Wrote fill to {}", output.display());
    }

    Ok(true)
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}
