use clap::Parser;
use gridsnake::config::Args;
use gridsnake::error::GameError;
use gridsnake::{app, config};
use simplelog::{LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

const LOG_FILE: &str = "gridsnake.log";

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("gridsnake: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), GameError> {
    let config: config::Config = args.into_config()?;
    // Stdout is the game screen, so logs go to a file.
    WriteLogger::init(
        LevelFilter::Info,
        simplelog::Config::default(),
        File::create(LOG_FILE)?,
    )
    .expect("failed to initialize logger");
    log::info!("starting with {config:?}");
    app::run(config)
}
