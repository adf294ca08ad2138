use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{execute, terminal};
use std::{fs::OpenOptions, io, panic, path::PathBuf, sync::Mutex};
use tamagotchi::app::{self, LaunchOptions};
use tamagotchi::config::{project_paths, Overrides};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "tamagotchi")]
#[command(about = "Raise a virtual pet in your terminal")]
struct Cli {
    /// Skip the menu and open this pet (chicken, cat, dog, rabbit)
    #[arg(long)]
    pet: Option<String>,

    /// Milliseconds per simulation tick
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    mono: bool,

    /// Use ASCII pets instead of emoji
    #[arg(long, default_value_t = false)]
    ascii: bool,

    /// Directory for saves, settings and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = project_paths(cli.data_dir.as_deref())?;

    // the UI owns the screen, so logs go to a file
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.log_path)
        .with_context(|| format!("could not open {}", paths.log_path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_target(false)
        .init();

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen);
        original_hook(info);
    }));

    app::run(
        paths,
        LaunchOptions {
            pet: cli.pet,
            overrides: Overrides {
                tick_ms: cli.tick_ms,
                mono: cli.mono,
                ascii: cli.ascii,
            },
        },
    )
}
