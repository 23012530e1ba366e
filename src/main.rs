//! Klotski Solver
//!
//! Reads a sliding-block puzzle, finds a shortest sequence of unit moves that
//! brings the target block to its target position, and writes every board
//! along the way to the output file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::LevelFilter;

use klotski::{persistence, Dedup, Solver, SolverConfig};

/// Solves a sliding-block puzzle with breadth-first search.
#[derive(Parser, Debug)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the puzzle file.
    #[arg(short = 'i', long = "inputFile", value_name = "PATH")]
    input_file: PathBuf,

    /// Path of the solution file.
    #[arg(
        short = 'o',
        long = "outputFile",
        value_name = "PATH",
        required_unless_present = "count"
    )]
    output_file: Option<PathBuf>,

    /// Deduplicate boards by their 32-bit hash instead of exactly.
    #[arg(long)]
    hash_dedup: bool,

    /// Give up after seeing this many distinct boards.
    #[arg(long, value_name = "N")]
    max_states: Option<usize>,

    /// Print the number of reachable boards instead of solving.
    #[arg(long)]
    count: bool,

    /// Log more detail (-v for progress, -vv for every search depth).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            dedup: if self.hash_dedup {
                Dedup::Hash32
            } else {
                Dedup::Exact
            },
            max_states: self.max_states,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Sends log output to stderr; `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> klotski::Result<()> {
    let puzzle = persistence::read_puzzle(&cli.input_file)?;
    let solver = Solver::new(&puzzle).with_config(cli.solver_config());

    if cli.count {
        let count = solver.count_reachable()?;
        println!("{} reachable states", count);
        return Ok(());
    }

    let solution = solver.solve()?;
    // clap requires an output file whenever --count is absent
    if let Some(path) = &cli.output_file {
        persistence::write_solution(path, &solution)?;
        println!("Solved in {} moves", solution.steps());
        println!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::try_parse_from(["klotski", "-i", "in.txt", "-o", "out.txt"]).unwrap();
        assert_eq!(cli.input_file, PathBuf::from("in.txt"));
        assert_eq!(cli.output_file, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.solver_config(), SolverConfig::default());

        let cli = Cli::try_parse_from([
            "klotski",
            "--inputFile",
            "in.txt",
            "--outputFile",
            "out.txt",
            "--hash-dedup",
            "--max-states",
            "500",
        ])
        .unwrap();
        assert_eq!(
            cli.solver_config(),
            SolverConfig {
                dedup: Dedup::Hash32,
                max_states: Some(500),
            }
        );
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["klotski", "-i", "in.txt"]).is_err());
        assert!(Cli::try_parse_from(["klotski", "-o", "out.txt"]).is_err());
        assert!(Cli::try_parse_from(["klotski", "-i", "in.txt", "-o"]).is_err());
        assert!(Cli::try_parse_from(["klotski", "-i", "in.txt", "--count"]).is_ok());
    }

    #[test]
    fn test_run_reports_no_solution() {
        let input = std::env::temp_dir().join(format!("klotski-cli-{}.txt", std::process::id()));
        let output = input.with_extension("out");
        std::fs::write(&input, include_str!("../puzzles/jammed.txt")).unwrap();

        let args: Vec<OsString> = vec![
            "klotski".into(),
            "-i".into(),
            input.clone().into_os_string(),
            "-o".into(),
            output.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(matches!(
            err,
            klotski::Error::Solve(klotski::SolveError::NoSolution { .. })
        ));
        assert!(!output.exists(), "no output file on failure");

        let _ = std::fs::remove_file(input);
    }

    #[test]
    fn test_run_writes_solution_file() {
        let input = std::env::temp_dir().join(format!("klotski-run-{}.txt", std::process::id()));
        let output = input.with_extension("out");
        std::fs::write(&input, include_str!("../puzzles/small.txt")).unwrap();

        let args: Vec<OsString> = vec![
            "klotski".into(),
            "--inputFile".into(),
            input.clone().into_os_string(),
            "--outputFile".into(),
            output.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("Solution\n1.\n A A C .\n"));
        assert!(written.contains("\n4.\n"));
        assert!(!written.contains("\n5.\n"));

        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }
}
