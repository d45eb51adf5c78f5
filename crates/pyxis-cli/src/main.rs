use anyhow::{Context, Result};
use log::{info, warn};
use pyxis_config::Config;
use pyxis_engine::sync::{DirectoryHooks, PersistenceWorker};
use pyxis_engine::{
    Caret, EditorSession, KeyEvent, Notification, RenderOutput, RopeText, SessionOptions,
};
use std::time::Instant;
use std::{env, fs, path::PathBuf, process};
use uuid::Uuid;

const LOCAL_PEER: u64 = 1;

fn usage(program: &str) {
    eprintln!("Usage: {program} <markdown-file> [caret|start:end] [key...]");
    eprintln!("Keys are host key names (x, Enter, Backspace, ctrl+Delete, ...)");
}

/// `5` or `2:7`.
fn parse_caret(arg: &str) -> Result<Caret> {
    let parse = |s: &str| {
        s.parse::<usize>()
            .with_context(|| format!("Invalid caret offset '{s}'"))
    };
    match arg.split_once(':') {
        Some((start, end)) => Ok(Caret::new(parse(start)?, parse(end)?)),
        None => Ok(Caret::at(parse(arg)?)),
    }
}

fn parse_key(arg: &str) -> KeyEvent {
    match arg.strip_prefix("ctrl+") {
        Some(key) if !key.is_empty() => KeyEvent::new(key, true),
        _ => KeyEvent::new(arg, false),
    }
}

fn session_options(config: &Config) -> SessionOptions {
    SessionOptions {
        word_boundaries: config.word_boundary_chars(),
        snapshot_interval: config.snapshot_interval(),
        update_debounce: config.update_debounce(),
    }
}

fn print_output(output: &RenderOutput) {
    match serde_json::to_string_pretty(output) {
        Ok(json) => println!("{json}"),
        Err(e) => warn!("Failed to serialise render output: {e}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        process::exit(1);
    }

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let file_path = PathBuf::from(&args[1]);
    let caret = match args.get(2) {
        Some(arg) => parse_caret(arg)?,
        None => Caret::default(),
    };
    let keys: Vec<KeyEvent> = args.iter().skip(3).map(|arg| parse_key(arg)).collect();

    let text = fs::read_to_string(&file_path)
        .with_context(|| format!("Failed to read '{}'", file_path.display()))?;

    let container = RopeText::with_text(LOCAL_PEER, &text)?;
    let mut session = EditorSession::new(Uuid::new_v4(), container, session_options(&config));
    if let Some(data_dir) = &config.data_dir {
        info!("Persisting to {}", data_dir.display());
        let worker = PersistenceWorker::spawn(DirectoryHooks::new(data_dir));
        session = session.with_persistence(worker, Instant::now());
    }
    session.set_caret(caret);

    for key in &keys {
        if session.handle_key(key)?.is_none() {
            info!("{} ignored", key.key);
        }
    }
    session.emit(&mut print_output);

    if config.data_dir.is_some() {
        // a snapshot on the way out
        session.poll_persistence(Instant::now() + config.snapshot_interval())?;
    }
    for notification in session.close() {
        match notification {
            Notification::PersistenceFailed { kind, message } => {
                eprintln!("Error: Failed to persist {kind}: {message}");
            }
        }
    }

    Ok(())
}
