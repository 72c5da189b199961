use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use feedwatch::session::Session;

/// Get the default config file path (~/.config/feedwatch/feedwatch.conf)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedwatch")
        .join("feedwatch.conf"))
}

#[derive(Parser, Debug)]
#[command(name = "feedwatch", about = "Load and check a feedwatch configuration file")]
struct Args {
    /// Configuration file (default: ~/.config/feedwatch/feedwatch.conf)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the resulting session as JSON
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv); ignored when RUST_LOG is set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_summary(session: &Session) {
    let show_path = |path: &Option<PathBuf>| {
        path.as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string())
    };

    println!("feed url:          {}", session.feed_url.as_deref().unwrap_or("-"));
    println!("interval:          {} min", session.check_interval);
    println!("use transmission:  {}", session.use_transmission);
    println!("transmission home: {}", show_path(&session.transmission_home));
    println!("state file:        {}", show_path(&session.state_file));
    println!("log file:          {}", show_path(&session.log_file));
    println!("max history:       {}", session.max_history);
    println!("patterns ({}):", session.patterns.len());
    for pattern in &session.patterns {
        println!("  {pattern}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    let session = Session::load(&path)
        .with_context(|| format!("Failed to load configuration from '{}'", path.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&session).context("Failed to serialize session")?;
        println!("{json}");
    } else {
        print_summary(&session);
    }

    Ok(())
}
