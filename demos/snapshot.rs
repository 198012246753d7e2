//! Print a single dashboard frame, without taking over the terminal

use chrono::Utc;
use log::LevelFilter;
use worldclock::{app::App, config::Config};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_module("worldclock", LevelFilter::Trace)
        .parse_default_env()
        .init();

    let config = Config::load()?;
    let app = App::new(config.selection()?, config.settings());
    for line in app.frame(Utc::now()).lines() {
        println!("{}", line.text);
    }
    Ok(())
}
