use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use megh::{logger::DevLogger, moves, record::RecordBook, render, Overlay, Recorded};
use megh_core::{daily_seed, GameMode, GameState, MazeConfig, Session};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "megh", version, about = "Seeded maze puzzles: daily layouts, replays and devlogs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a maze, optionally with its shortest solution
    Show {
        #[command(flatten)]
        maze: MazeArgs,

        /// Overlay the optimal path and print it as a move script
        #[arg(long)]
        solution: bool,

        /// Colored output
        #[arg(long)]
        color: bool,
    },
    /// Replay a move script (U/R/D/L letters) against a maze
    Play {
        #[command(flatten)]
        maze: MazeArgs,

        /// Move script. If omitted, reads from stdin.
        #[arg(short, long)]
        moves: Option<String>,

        /// Countdown in seconds (0 = untimed)
        #[arg(long, default_value_t = 0.0)]
        time_limit: f64,

        /// Seconds of game time each move takes
        #[arg(long, default_value_t = 0.25)]
        tick: f64,

        /// Daily record file
        #[arg(long, default_value = "megh-records.json")]
        records: PathBuf,

        /// Directory for devlog files
        #[arg(long, default_value = "devlogs")]
        devlogs: PathBuf,

        /// Step-by-step mode (pauses after each devlog). Press Enter to continue.
        #[arg(long)]
        step: bool,

        /// Maximum devlogs to write (0 = unlimited)
        #[arg(long, default_value_t = 0)]
        max_logs: usize,

        /// Colored output
        #[arg(long)]
        color: bool,
    },
    /// List stored daily records
    Records {
        #[arg(long, default_value = "megh-records.json")]
        records: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct MazeArgs {
    /// Explicit seed; overrides the date
    #[arg(long)]
    seed: Option<i64>,

    /// Day of the daily puzzle (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    #[arg(long, default_value_t = 10)]
    cols: usize,

    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(long, value_enum, default_value_t = Mode::Daily)]
    mode: Mode,

    /// Mazes already solved in this endless run (sparser loops as it grows)
    #[arg(long, default_value_t = 0)]
    level: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode { Daily, Endless }

impl MazeArgs {
    fn seed(&self) -> i64 {
        if let Some(seed) = self.seed { return seed; }
        match self.mode {
            Mode::Daily => {
                let day = self.date.unwrap_or_else(|| Local::now().date_naive());
                daily_seed(day.year(), day.month(), day.day())
            }
            Mode::Endless => i64::from(rand::random::<u32>()),
        }
    }

    fn config(&self) -> MazeConfig {
        let mode = match self.mode { Mode::Daily => GameMode::Daily, Mode::Endless => GameMode::Endless };
        MazeConfig::new(self.cols, self.rows).with_mode(mode, self.level)
    }
}

fn read_script(moves: Option<String>) -> Result<String> {
    match moves {
        Some(s) => Ok(s),
        None => {
            use std::io::{self, Read};
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading moves from stdin")?;
            Ok(buf)
        }
    }
}

fn show(maze: MazeArgs, solution: bool, color: bool) -> Result<()> {
    let seed = maze.seed();
    let session = Session::new(maze.config(), seed, 0.0).context("building maze")?;
    let grid = session.grid();
    let overlay = Overlay { solution: if solution { session.optimal_path() } else { &[] }, ..Overlay::default() };
    println!(
        "seed {seed}  {}x{}  {:?}  loops {}/{}",
        grid.cols(), grid.rows(), grid.algorithm(), grid.loops_added(), session.config().loop_count()
    );
    println!("{}", render(grid, &overlay, color));
    println!("optimal path: {} steps", session.optimal_length());
    if solution { println!("solution: {}", moves::to_script(session.optimal_path())?); }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn play(
    maze: MazeArgs,
    script: Option<String>,
    time_limit: f64,
    tick: f64,
    records: PathBuf,
    devlogs: PathBuf,
    step: bool,
    max_logs: usize,
    color: bool,
) -> Result<()> {
    let directions = moves::parse_moves(&read_script(script)?)?;
    let seed = maze.seed();
    let daily = maze.mode == Mode::Daily;
    let mut book = RecordBook::load(&records);
    if daily && book.attempts_left(seed) == 0 { bail!("no attempts left for seed {seed}") }

    let mut session = Session::new(maze.config(), seed, time_limit * 1000.0).context("building maze")?;
    let mut logger = DevLogger::new(devlogs, color, step, max_logs)?;
    session.start()?;
    for dir in directions {
        session.tick(tick);
        if session.state() != GameState::Playing { break; }
        let (dx, dy) = dir.delta();
        session.try_move(dx, dy)?;
        for event in session.drain_events() { logger.log_event(&event, &session)?; }
        if session.state() != GameState::Playing { break; }
    }
    for event in session.drain_events() { logger.log_event(&event, &session)?; }

    let tracker = session.tracker();
    let overlay = Overlay {
        solution: &[],
        dead_ends: tracker.dead_ends(),
        active: tracker.active_path(),
        player: Some(tracker.position()),
    };
    println!("\n{}", render(session.grid(), &overlay, color));
    println!("{}", render::legend());

    let summary = session.summary();
    match session.state() {
        GameState::Won => println!("solved in {} steps (optimal {})", summary.steps, summary.optimal_length),
        GameState::Lost => println!("time up after {} steps", summary.steps),
        _ => println!("not finished: {} steps on the route", summary.steps),
    }
    if session.is_timed() { println!("time {:.1}s of {time_limit}s", summary.elapsed_ms / 1000.0); }
    else { println!("time {:.1}s", summary.elapsed_ms / 1000.0); }
    println!("{} devlogs written", logger.written());

    if daily {
        match book.record(&summary) {
            Recorded::NewBest => println!("new best for seed {seed}"),
            Recorded::Solved => println!("solved; best stays {:?}", book.get(seed).and_then(|r| r.best_score)),
            Recorded::AttemptLost { attempts_left } => println!("{attempts_left} attempts left today"),
        }
        book.save(&records)?;
    }
    Ok(())
}

fn list_records(records: PathBuf) -> Result<()> {
    let book = RecordBook::load(&records);
    if book.iter().next().is_none() { println!("no records in {}", records.display()); }
    for r in book.iter() {
        let best = r.best_score.map_or("-".to_string(), |s| s.to_string());
        let star = if r.solved_optimally() { "*" } else { "" };
        println!("{}  best {best}{star}/{}  attempts left {}", r.seed, r.optimal_length, r.attempts_left);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Show { maze, solution, color } => show(maze, solution, color),
        Command::Play { maze, moves, time_limit, tick, records, devlogs, step, max_logs, color } => {
            play(maze, moves, time_limit, tick, records, devlogs, step, max_logs, color)
        }
        Command::Records { records } => list_records(records),
    }
}
