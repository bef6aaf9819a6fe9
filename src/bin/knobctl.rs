//! Host tool for the rotary knob.
//!
//! Usage:
//!   knobctl check profiles.json                  # Report how the device would load a file
//!   knobctl migrate old.json -o profiles.json    # Upgrade a file to the current layout
//!   knobctl defaults                             # Print the built-in configuration
//!   knobctl deploy profiles.json --storage /media/KNOB --port /dev/ttyACM0
//!   knobctl reboot --port /dev/ttyACM0

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use rs_knob::config::{self, ConfigOrigin, Configuration, FileSource, GestureSlot};
use rs_knob::host::{self, FixedLocator, RebootStatus};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rotary knob configuration tool
#[derive(Parser)]
#[command(name = "knobctl", version = VERSION, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file the way the device does and summarize it
    Check {
        /// Configuration file
        file: PathBuf,
    },
    /// Upgrade a configuration file to the current layout
    Migrate {
        /// Configuration file in any supported layout
        input: PathBuf,
        /// Where to write the result (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the built-in default configuration
    Defaults {
        /// Where to write the result (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a configuration to the device and reboot it
    Deploy {
        /// Configuration file to deploy
        file: PathBuf,
        /// Directory where the device storage is mounted
        #[arg(short, long)]
        storage: PathBuf,
        /// Device control port; without it the device applies the file on next boot
        #[arg(short, long)]
        port: Option<PathBuf>,
        /// Wait between writing and rebooting, in milliseconds
        #[arg(long, default_value_t = 2000)]
        settle_ms: u64,
    },
    /// Ask the device to reboot
    Reboot {
        /// Device control port
        #[arg(short, long)]
        port: PathBuf,
    },
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn write_output(config: &Configuration, output: Option<&Path>) -> Result<()> {
    let json = config.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn do_check(file: &Path) -> Result<()> {
    let loaded = config::load_detailed(&mut FileSource::new(file));
    match &loaded.origin {
        ConfigOrigin::Current => println!("Layout: current"),
        ConfigOrigin::Migrated(shape) => println!("Layout: {shape:?} (upgraded on load)"),
        ConfigOrigin::Default(reason) => println!("Not usable, device would fall back to defaults: {reason}"),
    }

    let cfg = &loaded.config;
    println!("Active profile: {}", cfg.current_profile);
    println!(
        "Sensitivity: volume {}, scroll {}, mouse {}",
        cfg.sensitivity_volume, cfg.sensitivity_scroll, cfg.sensitivity_mouse
    );
    for (i, profile) in cfg.profiles.iter().enumerate() {
        println!("Profile {}:", i + 1);
        for slot in GestureSlot::ALL {
            println!("  {:<12} {}", slot.key(), describe(profile.slot(slot)));
        }
    }

    if let ConfigOrigin::Default(_) = loaded.origin {
        bail!("{} is not a usable configuration", file.display());
    }
    Ok(())
}

fn describe(action: &config::ActionObject) -> String {
    match action {
        config::ActionObject::Simple { action } => action.clone(),
        config::ActionObject::Macro { keys } => format!("macro [{}]", keys.join(" + ")),
    }
}

fn read_config(file: &Path) -> Result<Configuration> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    config::parse_str(&text).with_context(|| format!("parsing {}", file.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Check { file } => do_check(&file),
        Commands::Migrate { input, output } => {
            let cfg = read_config(&input)?;
            write_output(&cfg, output.as_deref())
        }
        Commands::Defaults { output } => write_output(&Configuration::default(), output.as_deref()),
        Commands::Deploy {
            file,
            storage,
            port,
            settle_ms,
        } => {
            let cfg = read_config(&file)?;
            let mut locator = FixedLocator::new().with_storage(&storage);
            if let Some(port) = port {
                locator = locator.with_port(port);
            }
            let report = host::deploy_and_reboot(&cfg, &locator, Duration::from_millis(settle_ms))
                .with_context(|| format!("deploying to {}", storage.display()))?;

            println!("Saved {}", report.path.display());
            match report.reboot {
                RebootStatus::Sent(port) => println!("Rebooted via {}", port.display()),
                RebootStatus::NoPort => println!("No control port; the device applies it on next boot"),
                RebootStatus::Failed(reason) => println!("Saved, but reboot failed: {reason}"),
            }
            Ok(())
        }
        Commands::Reboot { port } => {
            host::send_reboot(&port)?;
            println!("Reboot sent to {}", port.display());
            Ok(())
        }
    }
}
