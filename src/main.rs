use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use si4703_rs::logging::{init_logger_with_default, DEFAULT_LOG_FILTER};
use si4703_rs::{log_info, Hal, Pull, RadioConfig, SeekDirection, Si4703Driver};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "si4703-cli")]
#[command(about = "CLI tool for the Si4703 FM receiver")]
#[command(
    long_about = "CLI tool for the Si4703 FM receiver. The receiver is powered on by the first \
command and left running; later commands keep its channel, volume and mute state."
)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Select 50 µs de-emphasis instead of the configured value
    #[arg(long)]
    de_emphasis_50us: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
enum Commands {
    /// Power up and print signal status
    Status,
    /// Tune to a channel in 100 kHz units (973 = 97.3 MHz)
    Tune {
        channel: u16,
    },
    /// Seek to the next station
    Seek {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Set the volume (0-15)
    Volume {
        level: u8,
    },
    /// Mute or unmute the audio
    Mute {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Poll for RDS and print the station name and radiotext
    Rds {
        #[arg(short, long, default_value = "500")]
        polls: u32,
    },
}

fn main() -> Result<()> {
    init_logger_with_default(DEFAULT_LOG_FILTER);

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => RadioConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RadioConfig::default(),
    };

    open_and_run(&cli, config)
}

#[cfg(feature = "raspberry-pi")]
fn open_and_run(cli: &Cli, config: RadioConfig) -> Result<()> {
    let hal = si4703_rs::RaspberryPiHal::new(&config).context("initialising Raspberry Pi HAL")?;
    run(hal, cli, config)
}

#[cfg(not(feature = "raspberry-pi"))]
fn open_and_run(_cli: &Cli, _config: RadioConfig) -> Result<()> {
    bail!("no hardware backend: rebuild with --features raspberry-pi")
}

#[cfg_attr(not(feature = "raspberry-pi"), allow(dead_code))]
fn run<H: Hal>(hal: H, cli: &Cli, config: RadioConfig) -> Result<()> {
    let de_emphasis_50us = cli.de_emphasis_50us || config.de_emphasis.is_50us();
    let mut radio = Si4703Driver::new(hal, config)?;
    if !radio.power_on_if_needed(de_emphasis_50us)? {
        log_info("Receiver already running");
    }

    match &cli.command {
        Commands::Status => {
            radio.read_registers()?;
            print_status(&radio);
        }
        Commands::Tune { channel } => {
            let tuned = radio.set_channel(*channel)?;
            log_info(&format!("Tuned to {}.{} MHz", tuned / 10, tuned % 10));
            print_status(&radio);
        }
        Commands::Seek { direction } => {
            let direction = match direction {
                Direction::Up => SeekDirection::Up,
                Direction::Down => SeekDirection::Down,
            };
            match radio.seek(direction)? {
                Some(channel) => println!("Found {}.{} MHz", channel / 10, channel % 10),
                None => println!("No station found"),
            }
        }
        Commands::Volume { level } => {
            if *level > si4703_rs::constants::MAX_VOLUME {
                bail!("volume must be 0-{}", si4703_rs::constants::MAX_VOLUME);
            }
            radio.set_volume(*level)?;
        }
        Commands::Mute { state } => {
            radio.set_mute(matches!(state, Switch::On))?;
        }
        Commands::Rds { polls } => {
            let delay = radio.config().poll_interval_ms;
            for _ in 0..*polls {
                if radio.rds_available()? {
                    if let Pull::Ready(name) = radio.station_name() {
                        println!("Station: {name}");
                    }
                    if let Pull::Ready(text) = radio.radio_text() {
                        println!("Text: {text}");
                    }
                } else {
                    std::thread::sleep(std::time::Duration::from_millis(u64::from(delay)));
                }
            }
            let stats = radio.rds_stats();
            log_info(&format!(
                "RDS: {} groups, {} names, {} texts",
                stats.groups, stats.names_completed, stats.texts_completed
            ));
        }
    }

    Ok(())
}

#[cfg_attr(not(feature = "raspberry-pi"), allow(dead_code))]
fn print_status<H: Hal>(radio: &Si4703Driver<H>) {
    let channel = radio.channel();
    println!(
        "{}.{} MHz  RSSI {}  {}",
        channel / 10,
        channel % 10,
        radio.rssi(),
        if radio.stereo() { "stereo" } else { "mono" }
    );
}
