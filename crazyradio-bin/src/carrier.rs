use std::time::{Duration, Instant};

use clap::Args;
use color_eyre::eyre::Context;
use crazyradio::Crazyradio;

use crate::config::RadioParams;

/// Transmit a continuous carrier on the configured channel.
#[derive(Args, Debug)]
pub struct Cmd {
    #[command(flatten)]
    params: RadioParams,

    /// How long to transmit, in seconds (default is until interrupted).
    #[arg(short, long)]
    seconds: Option<f64>,
}

impl Cmd {
    pub fn cmd(&self, mut radio: Crazyradio) -> color_eyre::Result<()> {
        self.params
            .configure(&mut radio)
            .wrap_err("Failed configuring the Crazyradio")?;

        let quit = crate::os_signal::quit_watch().wrap_err("Failed setting up signal handling")?;
        let deadline = self
            .seconds
            .map(|s| Instant::now() + Duration::from_secs_f64(s.max(0.0)));

        radio
            .set_cont_carrier(true)
            .wrap_err("Failed turning on the carrier")?;
        println!("Carrier on");
        while !quit.is_quit() && deadline.is_none_or(|d| Instant::now() < d) {
            std::thread::sleep(Duration::from_millis(50));
        }
        radio
            .set_cont_carrier(false)
            .wrap_err("Failed turning off the carrier")?;
        println!("Carrier off");

        radio.close().wrap_err("Failed releasing the Crazyradio")
    }
}
