//! gesture_control — interactive entry point.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use gesture_control::{run, AppConfig, SourceKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    /// Keyboard/mouse simulation in the preview window
    Sim,
    /// JSON-lines landmark frames on stdin
    Stdin,
}

#[derive(Parser, Debug)]
#[command(name = "gesture_control", version, about = "Control the desktop with hand gestures")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where hand landmarks come from
    #[arg(short, long, value_enum, default_value_t = Source::Sim)]
    source: Source,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gesture_control=info,hand_gesture=info")),
        )
        .init();

    let args = Args::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Gesture Control — hands in, keys and volume out       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let cfg = match &args.config {
        Some(path) => match AppConfig::load(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => AppConfig::default(),
    };

    let source = match args.source {
        Source::Sim => {
            println!("  Mode: keyboard/mouse simulation");
            println!("        1-6 poses, P point, C click, V two hands, Q quit");
            SourceKind::Sim
        }
        Source::Stdin => {
            println!("  Mode: landmark frames from stdin");
            SourceKind::Stdin
        }
    };
    println!();

    if let Err(e) = run(cfg, source) {
        error!("{}", e);
        std::process::exit(1);
    }
}
