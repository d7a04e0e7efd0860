//! Walk through the bar's behaviours on the real terminal.
//!
//! Run everything with `cargo run --example showcase`, or pick scenarios by
//! name: `cargo run --example showcase -- unix interleaved`.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use anchor_bar::{
    CrosstermTerminal, Layout, LineRecorder, ProgressBar, Result, SessionConfig, Terminal,
};

const TICK: Duration = Duration::from_millis(60);

type Scenario = fn() -> Result<()>;

const SCENARIOS: &[(&str, Scenario)] = &[
    ("default", default_layout),
    ("unix", unix_layout),
    ("percentage", set_progress_with_percentage),
    ("additional", additional_text),
    ("restart", pause_and_restart),
    ("interleaved", interleaved_output),
    ("captured", captured_output),
    ("recorded", recorded_output),
];

fn main() -> Result<()> {
    let requested: Vec<String> = std::env::args().skip(1).collect();
    for (name, scenario) in SCENARIOS {
        if requested.is_empty() || requested.iter().any(|r| r == name) {
            println!("== {name}");
            scenario()?;
        }
    }
    Ok(())
}

fn default_layout() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default())?;
    for _ in 0..100 {
        bar.add_steps(1, None)?;
        thread::sleep(TICK);
    }
    Ok(())
}

fn unix_layout() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default().with_layout(Layout::unix()))?;
    for _ in 0..100 {
        bar.add_steps(1, None)?;
        thread::sleep(TICK);
    }
    Ok(())
}

fn set_progress_with_percentage() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default())?;
    for i in 0..100 {
        bar.report(f64::from(i))?;
        thread::sleep(TICK);
    }
    Ok(())
}

fn additional_text() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default())?;
    for i in 0..100 {
        let label = format!("step {i} of 100");
        if i % 2 == 0 {
            bar.report_with_text(f64::from(i), label)?;
        } else {
            bar.add_steps(1, Some(&label))?;
        }
        thread::sleep(TICK);
    }
    Ok(())
}

fn pause_and_restart() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default().with_auto_start(false))?;
    for i in 0..100 {
        match i {
            20 | 68 => bar.start()?,
            51 => bar.stop()?,
            _ => {}
        }
        bar.report(f64::from(i))?;
        thread::sleep(TICK);
    }
    Ok(())
}

fn interleaved_output() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default())?;
    for i in 0..100 {
        let cursor = bar.terminal_mut().cursor_position()?;
        let size = bar.terminal().size()?;
        bar.write_line(&format!(
            "Line {}. cursor column: {}, cursor row: {}, height: {}",
            i + 1,
            cursor.column,
            cursor.row,
            size.height
        ))?;
        bar.report_with_text(f64::from(i), format!("step {i} of 100"))?;
        thread::sleep(TICK);
    }
    Ok(())
}

fn captured_output() -> Result<()> {
    let mut bar = ProgressBar::stdout(SessionConfig::default().with_capture_output(true))?;
    for i in 0..100 {
        writeln!(bar, "Line {}. written through io::Write", i + 1)?;
        bar.report_with_text(f64::from(i), format!("step {i} of 100"))?;
        thread::sleep(TICK);
    }
    Ok(())
}

/// Output treated as redirected: the bar stays hidden and lines are recorded.
fn recorded_output() -> Result<()> {
    let terminal = CrosstermTerminal::new(LineRecorder::new(io::stdout()), true);
    let mut bar = ProgressBar::new(terminal, SessionConfig::default())?;
    for i in 0..10 {
        bar.write_line(&format!("Line {}", i + 1))?;
        bar.add_steps(10, None)?;
    }
    bar.stop()?;
    let recorded = bar.terminal().get_ref().lines().len();
    drop(bar);
    println!("recorded {recorded} lines");
    Ok(())
}
