use std::io::Write;

use chrono::Local;
use clap::Parser;
use colored::*;
use log::{Level, LevelFilter, SetLoggerError};

mod cache;
mod dirs;
mod error;
mod picsum;
mod theme;
mod wallpaper;
mod xrandr;

use cache::WallpaperCache;
use error::{Error, Result};
use picsum::Picsum;
use theme::{Themer, Wal};
use wallpaper::{Mode, Request};

// ============================================================================
// Command Line
// ============================================================================
/// Fetch a wallpaper from picsum.photos, cache it and theme the desktop from it.
#[derive(Parser, Debug)]
#[command(name = "wal-e", version, about, long_about = None)]
struct Cli {
    /// Takes a random wallpaper
    #[arg(short, long)]
    random: bool,

    /// Use wallpaper identified by the id
    #[arg(short, long, value_name = "ID")]
    id: Option<u32>,

    /// Assume specific resolution (i.e. '1920x1200') instead of asking xrandr
    #[arg(short = 'x', long, value_name = "WxH")]
    resolution: Option<String>,

    /// Only fetch and cache the image, leave colors and desktop alone
    #[arg(long)]
    no_theme: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> Result<Mode> {
        match (self.random, self.id) {
            (true, None) => Ok(Mode::Random),
            (false, Some(id)) => Ok(Mode::ById(id)),
            (true, Some(_)) => Err(Error::Usage(
                "--random and --id cannot be combined".to_string(),
            )),
            (false, None) => Err(Error::Usage(
                "pass --random or --id <ID> to pick a wallpaper".to_string(),
            )),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================
fn init_logger(verbose: bool) -> std::result::Result<(), SetLoggerError> {
    let default_level = if verbose { "debug" } else { "info" };

    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .filter_module("reqwest", LevelFilter::Error)
        .filter_module("hyper", LevelFilter::Error)
        .format(|buf, record| {
            let level = format!("{:<8}", record.level());
            let level = match record.level() {
                Level::Error => level.red(),
                Level::Warn => level.yellow(),
                Level::Info => level.green(),
                Level::Debug => level.cyan(),
                Level::Trace => level.dimmed(),
            };
            writeln!(
                buf,
                "{} {} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                record.target(),
                record.args()
            )
        })
        .build();

    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================
fn run(cli: &Cli) -> Result<()> {
    let request = Request {
        mode: cli.mode()?,
        resolution: cli.resolution.clone(),
    };

    let cache = WallpaperCache::new(dirs::wallpaper_dir());
    let service = Picsum::new()?;
    let wal = Wal::new(dirs::theme_cache_dir());
    let themer: Option<&dyn Themer> = if cli.no_theme { None } else { Some(&wal) };

    let outcome = wallpaper::run(&request, &service, &cache, themer)?;

    println!("{}", format!("-> Wallpaper {} ({})", outcome.id, outcome.resolution).green().bold());
    if let Some(metadata) = &outcome.metadata {
        println!("{}", format!("   by {}", metadata.author).cyan());
    }
    println!("{}", format!("   {}", outcome.path.display()).dimmed());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logger(cli.verbose) {
        eprintln!("{}", format!("[ WARN ] Logging disabled: {}", e).yellow());
    }

    if let Err(e) = run(&cli) {
        eprintln!("{}", format!("[ ERROR ] {}", e).red());
        std::process::exit(e.exit_code());
    }
}
