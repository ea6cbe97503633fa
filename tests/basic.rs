use megh::{moves, render, DailyRecord, Overlay, RecordBook, Recorded};
use megh_core::{Direction, MazeConfig, Pos, RunSummary, Session};
use pretty_assertions::assert_eq;

fn run(seed: i64, won: bool, steps: usize, elapsed_ms: f64) -> RunSummary {
    RunSummary { seed, won, steps, optimal_length: 12, optimal: won && steps == 12, elapsed_ms, path: vec![Pos::new(0, 0)] }
}

#[test]
fn parse_move_script() {
    let dirs = moves::parse_moves("rR d, L\nu").unwrap();
    assert_eq!(dirs, vec![Direction::Right, Direction::Right, Direction::Down, Direction::Left, Direction::Up]);
    assert!(moves::parse_moves("RRX").is_err());
}

#[test]
fn script_round_trips_a_solution() {
    let s = Session::new(MazeConfig::new(7, 7), 20261019, 0.0).unwrap();
    let script = moves::to_script(s.optimal_path()).unwrap();
    assert_eq!(script.len(), s.optimal_length());
    assert_eq!(moves::parse_moves(&script).unwrap().len(), s.optimal_length());
}

#[test]
fn render_draws_every_row() {
    let s = Session::new(MazeConfig::new(4, 3), 8, 0.0).unwrap();
    let text = render(s.grid(), &Overlay::default(), false);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3 * 2 + 1);
    assert_eq!(lines[0], "+---+---+---+---+");
    assert!(lines.iter().all(|l| l.chars().count() == 4 * 4 + 1));
    assert!(lines[1].starts_with("| S "));
    assert!(lines[5].ends_with(" E |"));
}

#[test]
fn render_marks_solution_and_player() {
    let s = Session::new(MazeConfig::new(5, 5), 3, 0.0).unwrap();
    let overlay = Overlay { solution: s.optimal_path(), player: Some(Pos::new(0, 0)), ..Overlay::default() };
    let text = render(s.grid(), &overlay, false);
    assert_eq!(text.matches('@').count(), 1);
    assert!(!text.contains('S'), "player hides the start marker");
    assert_eq!(text.matches('·').count(), s.optimal_path().len() - 2);
}

#[test]
fn losses_spend_attempts() {
    let mut book = RecordBook::default();
    assert_eq!(book.attempts_left(1), 3);
    assert_eq!(book.record(&run(1, false, 4, 100.0)), Recorded::AttemptLost { attempts_left: 2 });
    assert_eq!(book.record(&run(1, false, 4, 100.0)), Recorded::AttemptLost { attempts_left: 1 });
    assert_eq!(book.record(&run(1, false, 4, 100.0)), Recorded::AttemptLost { attempts_left: 0 });
    assert_eq!(book.record(&run(1, false, 4, 100.0)), Recorded::AttemptLost { attempts_left: 0 });
    assert_eq!(book.attempts_left(2), 3);
}

#[test]
fn wins_keep_the_better_result() {
    let mut book = RecordBook::default();
    assert_eq!(book.record(&run(9, true, 20, 5_000.0)), Recorded::NewBest);
    assert_eq!(book.record(&run(9, true, 24, 1_000.0)), Recorded::Solved);
    assert_eq!(book.record(&run(9, true, 20, 4_000.0)), Recorded::NewBest);
    assert_eq!(book.record(&run(9, true, 12, 9_000.0)), Recorded::NewBest);
    let r = book.get(9).unwrap();
    assert_eq!((r.best_score, r.best_time_ms, r.attempts_left), (Some(12), Some(9_000), 3));
    assert!(r.solved_optimally());
}

#[test]
fn record_book_survives_a_save() {
    let dir = std::env::temp_dir().join(format!("megh-records-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("records.json");

    let mut book = RecordBook::default();
    book.record(&run(20261019, true, 14, 2_500.0));
    book.record(&run(20261020, false, 3, 800.0));
    book.save(&path).unwrap();

    let loaded = RecordBook::load(&path);
    assert_eq!(loaded, book);
    assert_eq!(loaded.get(20261020), Some(&DailyRecord { attempts_left: 2, ..DailyRecord::new(20261020, 12) }));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_or_garbled_file_gives_empty_book() {
    let dir = std::env::temp_dir().join(format!("megh-garbled-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("records.json");
    assert_eq!(RecordBook::load(&path), RecordBook::default());
    std::fs::write(&path, "{not json").unwrap();
    assert_eq!(RecordBook::load(&path), RecordBook::default());
    std::fs::remove_dir_all(&dir).ok();
}
