use clap::Args;
use color_eyre::eyre::{Context, eyre};
use crazyradio::Crazyradio;

use crate::config::{HexBytes, RadioParams};

/// Look for devices by sending a packet on a range of channels.
#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    params: RadioParams,

    /// First channel to scan.
    #[arg(long, default_value_t = 0)]
    start: u8,

    /// Last channel to scan, inclusive.
    #[arg(long, default_value_t = 125)]
    stop: u8,

    /// Packet to send on each channel, in hex.
    #[arg(default_value = "ff")]
    packet: HexBytes,
}

impl Cmd {
    pub fn cmd(&self, mut radio: Crazyradio) -> color_eyre::Result<()> {
        if self.stop > 125 {
            return Err(eyre!("stop valid range is 0-125, but got {}", self.stop));
        }
        self.params
            .configure(&mut radio)
            .wrap_err("Failed configuring the Crazyradio")?;

        let found = radio
            .scan_channels(self.start, self.stop, &self.packet.0)
            .wrap_err("Failed scanning channels")?;
        if found.is_empty() {
            println!("No devices answered on channels {}-{}", self.start, self.stop);
        }
        for channel in found {
            println!("Device answered on channel {channel}");
        }

        radio.close().wrap_err("Failed releasing the Crazyradio")
    }
}
