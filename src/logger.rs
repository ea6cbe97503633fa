use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use megh_core::{Session, SessionEvent};
use std::{fs::{self, File}, io::Write, path::PathBuf};

use crate::moves::letter;

/// Writes one numbered `devlog(N).txt` per session event and echoes it to
/// the console, optionally pausing after each one.
pub struct DevLogger {
    dir: PathBuf,
    color: bool,
    step: bool,
    max_logs: usize,
    counter: usize,
}

impl DevLogger {
    pub fn new(dir: impl Into<PathBuf>, color: bool, step: bool, max_logs: usize) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        Ok(Self { dir, color, step, max_logs, counter: 0 })
    }

    pub fn written(&self) -> usize { self.counter }

    pub fn log(&mut self, title: &str, details: &str) -> Result<()> {
        if self.max_logs != 0 && self.counter >= self.max_logs { return Ok(()); }
        self.counter += 1;
        let path = self.dir.join(format!("devlog({}).txt", self.counter));

        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut f = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        writeln!(f, "[{}] {}\n\n{}", ts, title, details)?;

        if self.color {
            println!("{} {}\n{}", "➤".blue().bold(), title.bold(), details);
        } else {
            println!("➤ {}\n{}", title, details);
        }

        if self.step {
            print!("-- press Enter to continue --");
            use std::io::{self, Write as _};
            io::stdout().flush().ok();
            let mut s = String::new();
            io::stdin().read_line(&mut s).ok();
        }
        Ok(())
    }

    pub fn log_event(&mut self, event: &SessionEvent, session: &Session) -> Result<()> {
        let (title, details) = describe(event, session);
        self.log(&title, &details)
    }
}

fn describe(event: &SessionEvent, session: &Session) -> (String, String) {
    let tracker = session.tracker();
    match event {
        SessionEvent::Started => (
            format!("Start seed {}", session.seed()),
            format!("{}x{} maze, optimal path {} steps", session.grid().cols(), session.grid().rows(), session.optimal_length()),
        ),
        SessionEvent::Paused => ("Paused".into(), String::new()),
        SessionEvent::Resumed => ("Resumed".into(), String::new()),
        SessionEvent::Moved { from, to, steps } => (
            format!("Move {from} -> {to}"),
            format!("route length {steps}, dead ends {}", tracker.dead_ends().len()),
        ),
        SessionEvent::Blocked { at, dir } => (format!("Blocked at {at}"), format!("wall on the {} side", letter(*dir))),
        SessionEvent::Backtracked { to, abandoned } => (
            format!("Backtrack to {to}"),
            format!("{abandoned} cells moved to dead ends"),
        ),
        SessionEvent::Won { steps, optimal } => (
            "Solved".into(),
            format!("{steps} steps ({})", if *optimal { "optimal" } else { "not optimal" }),
        ),
        SessionEvent::TimeUp => ("Time up".into(), format!("{} steps on the route", tracker.steps())),
        SessionEvent::Reset => ("Reset".into(), String::new()),
    }
}
