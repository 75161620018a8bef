//! arcshell entry point.
//!
//! Opens the data directory, starts on the new-tab page, and reads one
//! command per line from stdin (`help` lists them). Internal-page timers
//! are drained before each prompt. Data is saved on exit.

mod commands;
mod shell;

use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};

use arcshell_store::DataManager;
use arcshell_types::ShellConfig;
use shell::{Flow, Shell};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ShellConfig::discover().context("loading configuration")?;
    let data = match config.paths.data_dir() {
        Some(dir) => DataManager::open(dir)
            .with_context(|| format!("opening data directory {}", dir.display()))?,
        None => {
            log::info!("No data directory -- running in memory");
            DataManager::in_memory()
        },
    };
    let profile = data
        .profiles
        .current()
        .map_or_else(|| "none".to_string(), |p| p.name.clone());
    log::info!("Starting arcshell (profile: {profile})");

    let mut shell = Shell::new(&config, data.into_shared()).context("loading page templates")?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        settle(&mut shell);
        flush_output(&mut shell)?;
        print!("arcshell> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match commands::parse(&line?) {
            Ok(Some(cmd)) => {
                if shell.execute(cmd, Instant::now()) == Flow::Quit {
                    break;
                }
            },
            Ok(None) => {},
            Err(e) => println!("{e}"),
        }
    }

    settle(&mut shell);
    flush_output(&mut shell)?;
    shell.data().borrow().save().context("saving data")?;
    log::info!("Saved; closing {} tab(s)", shell.tabs().len());
    Ok(())
}

/// Run internal-page timers until none remain.
fn settle(shell: &mut Shell) {
    while let Some(deadline) = shell.next_deadline() {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        shell.tick(Instant::now());
    }
}

fn flush_output(shell: &mut Shell) -> Result<()> {
    let mut out = io::stdout().lock();
    for line in shell.take_output() {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
