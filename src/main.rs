//! discfs - inspect and extract optical-disc-structured media
//!
//! Usage:
//!   discfs info <device>               - Show detected backend and volume info
//!   discfs ls <device> [dir]           - List a directory, merged with the overlay
//!   discfs cat <device> <path>         - Write a file's bytes to stdout
//!   discfs extract <device> <path>     - Copy a file off the medium
//!   discfs init-config                 - Write a default config file

use clap::{Parser, Subcommand};
use discfs::config::Config;
use discfs::disc::{Disc, DiscOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "discfs")]
#[command(author = "discfs Contributors")]
#[command(version)]
#[command(about = "Unified access to mounted, imaged and overlaid disc content")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overlay directory that shadows the disc contents
    #[arg(short, long)]
    overlay: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detected backend and volume information
    Info {
        /// Mounted directory, extracted tree, image file or device node
        device: PathBuf,
    },

    /// List a directory, merged across overlay and medium
    Ls {
        /// Mounted directory, extracted tree, image file or device node
        device: PathBuf,

        /// Logical directory on the disc
        #[arg(default_value = "")]
        dir: String,
    },

    /// Write a file's bytes to stdout
    Cat {
        /// Mounted directory, extracted tree, image file or device node
        device: PathBuf,

        /// Logical path on the disc
        path: String,
    },

    /// Copy a file from the medium into the local cache directory
    Extract {
        /// Mounted directory, extracted tree, image file or device node
        device: PathBuf,

        /// Logical path on the disc
        path: String,

        /// Destination file; defaults to the path under the cache directory
        #[arg(short, long)]
        dest: Option<PathBuf>,
    },

    /// Write a default config file
    InitConfig,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Info { device } => {
            let disc = open_disc(device, &cli.overlay, &config)?;
            match disc.root() {
                Some(root) => println!("backend:   mounted directory at {}", root.display()),
                None if disc.has_backend() => println!("backend:   parsed disc image"),
                None => println!("backend:   none detected"),
            }
            if let Some(volume_id) = disc.volume_id() {
                println!("volume id: {}", volume_id);
            }
            Ok(())
        }

        Commands::Ls { device, dir } => {
            let disc = open_disc(device, &cli.overlay, &config)?;
            let mut listing = disc.open_dir(&dir)?;
            while let Some(entry) = listing.read_next() {
                println!("{}", entry.name);
            }
            Ok(())
        }

        Commands::Cat { device, path } => {
            let disc = open_disc(device, &cli.overlay, &config)?;
            let mut fp = disc.open_path(&path)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let mut buf = [0u8; 64 * 1024];
            loop {
                match fp.read(&mut buf)? {
                    0 => break,
                    n => out.write_all(&buf[..n])?,
                }
            }
            Ok(())
        }

        Commands::Extract { device, path, dest } => {
            let disc = open_disc(device, &cli.overlay, &config)?;
            let dest = dest.unwrap_or_else(|| config.cache_dir.join(&path));
            disc.cache_rom_file(&path, &dest)?;
            println!("extracted to {}", dest.display());
            Ok(())
        }

        Commands::InitConfig => {
            let config = Config::default();
            config.save(&config_path)?;
            println!("wrote {}", config_path.display());
            Ok(())
        }
    }
}

fn open_disc(
    device: PathBuf,
    overlay: &Option<PathBuf>,
    config: &Config,
) -> anyhow::Result<Disc> {
    let disc = Disc::open(DiscOptions {
        device_path: Some(device),
        key_file: config.key_file.clone(),
        ..Default::default()
    })?;

    // Command-line overlay beats the configured one.
    let overlay = overlay.clone().or_else(|| config.overlay_root.clone());
    if overlay.is_some() {
        disc.set_overlay(overlay);
    }

    Ok(disc)
}
