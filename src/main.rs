use anyhow::Context;
use log::{info, LevelFilter};
use std::{
    fs::File,
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use worldclock::{
    app::App, config::Config, display::Display, input::TerminalEvents,
};

/// The dashboard owns the terminal, so logs go here instead
const LOG_FILE: &str = "./worldclock.log";

fn main() -> anyhow::Result<()> {
    let log_file = File::create(LOG_FILE)
        .with_context(|| format!("Error creating log file {LOG_FILE}"))?;
    env_logger::builder()
        .filter_module("worldclock", LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let config = Config::load()?;
    let app = App::new(config.selection()?, config.settings());

    // Raw mode swallows Ctrl-C as a key press, but SIGTERM still needs a
    // clean exit so the terminal gets restored
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))
        .context("Error setting termination handler")?;

    let mut display = Display::new(io::stdout(), config.light, config.dark);
    app.run(&mut display, &mut TerminalEvents, &stop)?;
    info!("Goodbye");
    Ok(())
}
