use clap::Args;
use color_eyre::eyre::{Context, eyre};
use crazyradio::{Crazyradio, RadioMode};
use tracing::warn;

use crate::config::{HexBytes, RadioParams};

/// Give up after this many receive errors in a row.
const MAX_ERRORS: u32 = 10;

/// Switch to PRX mode and print every packet received, until interrupted.
#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    params: RadioParams,

    /// Stop after this many packets (default is unlimited).
    #[arg(short = 'n', long)]
    count: Option<u64>,
}

impl Cmd {
    pub fn cmd(&self, mut radio: Crazyradio) -> color_eyre::Result<()> {
        self.params
            .configure(&mut radio)
            .wrap_err("Failed configuring the Crazyradio")?;
        radio
            .set_radio_mode(RadioMode::Prx)
            .wrap_err("Failed switching to PRX mode")?;

        let quit = crate::os_signal::quit_watch().wrap_err("Failed setting up signal handling")?;
        let mut received = 0;
        let mut errors = 0;
        while !quit.is_quit() && self.count.is_none_or(|n| received < n) {
            match radio.receive() {
                Ok(Some(packet)) => {
                    errors = 0;
                    received += 1;
                    println!("{}", HexBytes(packet));
                }
                Ok(None) => (),
                Err(e) => {
                    warn!("Receive error: {e}");
                    errors += 1;
                    if errors >= MAX_ERRORS {
                        return Err(eyre!("Too many receive errors in a row"));
                    }
                }
            }
        }

        radio.close().wrap_err("Failed releasing the Crazyradio")
    }
}
