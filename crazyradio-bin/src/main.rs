mod carrier;
mod config;
mod info;
mod listen;
mod os_signal;
mod scan;
mod send;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, eyre};
use crazyradio::Crazyradio;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Open one specific Crazyradio, chosen by serial number
    #[arg(short = 'd', long)]
    serial: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Info(info::Cmd),
    Send(send::Cmd),
    Listen(listen::Cmd),
    Scan(scan::Cmd),
    Carrier(carrier::Cmd),
    /// Reboot the dongle into its bootloader, for firmware updates.
    Bootloader,
}

fn open(serial: Option<&str>) -> color_eyre::Result<Crazyradio> {
    let Some(serial) = serial else {
        return crazyradio::open_crazyradio().wrap_err("Failed to open Crazyradio");
    };
    let devices =
        crazyradio::list_crazyradio_devices().wrap_err("Couldn't list Crazyradio devices")?;
    let Some(chosen) = devices.into_iter().find(|d| d.serial() == Some(serial)) else {
        return Err(eyre!("Couldn't locate Crazyradio serial {}", serial));
    };
    chosen.open().wrap_err("Couldn't open selected Crazyradio")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Cli::parse();

    if let Commands::Info(c) = &args.command {
        return c.cmd(args.serial.as_deref());
    }

    let radio = open(args.serial.as_deref())?;

    match args.command {
        Commands::Info(_) => unreachable!("Should've executed the Info command earlier"),
        Commands::Send(c) => c.cmd(radio),
        Commands::Listen(c) => c.cmd(radio),
        Commands::Scan(c) => c.cmd(radio),
        Commands::Carrier(c) => c.cmd(radio),
        Commands::Bootloader => radio
            .launch_bootloader()
            .wrap_err("Failed launching the bootloader"),
    }
}
