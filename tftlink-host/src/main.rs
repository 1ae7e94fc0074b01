use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{error, info};

use tftlink_host::config::{self, Overrides};
use tftlink_host::{menu, FileImageSource, Session, SerialPortProvider, TransportDriver};
use tftlink_protocol::CommandBuilder;

/// Drive a TFT display over a serial link
#[derive(Parser, Debug)]
#[command(name = "tftlink", version, long_about = None)]
struct Args {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = "tftlink.toml")]
    config: PathBuf,

    /// Serial port, e.g. /dev/ttyUSB0 or COM3
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Use the 2-byte length field
    #[arg(long, default_value_t = false)]
    narrow: bool,

    /// Image drawn by the image action
    #[arg(long)]
    image: Option<String>,

    /// Run these menu keys in order and exit (e.g. "cbt")
    #[arg(short, long)]
    action: Option<String>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    let mut config = config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.apply(&Overrides {
        port: args.port,
        baud: args.baud,
        narrow: args.narrow,
        image: args.image,
    })?;

    let serial = config.serial_config()?;
    let provider = SerialPortProvider::new(config.write_timeout());
    let driver = match TransportDriver::open(
        &provider,
        &config.serial.port,
        &serial,
        config.transport_config(),
    ) {
        Ok(driver) => driver,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let mut session = Session::new(
        driver,
        CommandBuilder::new(config.length_width()),
        FileImageSource,
        config.session_settings(),
    )?;

    match args.action {
        Some(keys) => menu::run_keys(&mut session, &keys)?,
        None => {
            let stdin = io::stdin();
            menu::run(&mut session, stdin.lock(), io::stdout())?;
        }
    }

    info!("{} closed", config.serial.port);
    Ok(())
}
