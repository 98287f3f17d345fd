use clap::Args;
use color_eyre::eyre::Context;
use crazyradio::Crazyradio;

use crate::config::{HexBytes, RadioParams};

/// Send packets and print the acknowledgment for each.
#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    params: RadioParams,

    /// Number of times to send the whole packet list.
    #[arg(short = 'n', long, default_value_t = 1)]
    repeat: u32,

    /// Packets to send, in hex.
    #[arg(required = true)]
    packets: Vec<HexBytes>,
}

impl Cmd {
    pub fn cmd(&self, mut radio: Crazyradio) -> color_eyre::Result<()> {
        self.params
            .configure(&mut radio)
            .wrap_err("Failed configuring the Crazyradio")?;

        for _ in 0..self.repeat {
            for packet in self.packets.iter() {
                let ack = radio
                    .send_packet(&packet.0)
                    .wrap_err("Failed sending packet")?;
                match ack {
                    Some(ack) => println!("{packet} -> {ack}"),
                    None => println!("{packet} -> no answer from dongle"),
                }
            }
        }

        radio.close().wrap_err("Failed releasing the Crazyradio")
    }
}
