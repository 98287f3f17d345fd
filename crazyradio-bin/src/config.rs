use std::str::FromStr;

use clap::Args;
use color_eyre::eyre::{Context, eyre};
use crazyradio::{Crazyradio, DataRate, Power};

/// A byte string given on the command line as hex, like `3c0102` or
/// `3c:01:02`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl FromStr for HexBytes {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .bytes()
            .filter(|c| !matches!(c, b':' | b' ' | b'_'))
            .collect();
        if digits.len() % 2 != 0 {
            return Err("Odd number of hex digits");
        }
        digits
            .chunks(2)
            .map(|pair| {
                let pair = std::str::from_utf8(pair).map_err(|_| "Not a hex digit")?;
                u8::from_str_radix(pair, 16).map_err(|_| "Not a hex digit")
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(HexBytes)
    }
}

impl std::fmt::Display for HexBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RadioParams {
    /// Radio channel, 0-125. Frequency is 2400 MHz plus the channel number.
    #[arg(short, long)]
    channel: Option<u8>,

    /// 5-byte radio address, in hex.
    #[arg(short, long)]
    address: Option<HexBytes>,

    /// Data rate. 0=250 kbps, 1=1 Mbps, 2=2 Mbps.
    #[arg(short, long)]
    rate: Option<u8>,

    /// Transmit power. 0=-18 dBm, 1=-12 dBm, 2=-6 dBm, 3=0 dBm.
    #[arg(short, long)]
    power: Option<u8>,

    /// Auto-retry count, 0-15.
    #[arg(long)]
    arc: Option<u8>,

    /// Auto-retry delay in microseconds, rounded down to a multiple of 250.
    #[arg(long = "ard_us", conflicts_with = "ard_bytes")]
    ard_us: Option<u32>,

    /// Auto-retry delay, sized for an ack payload of this many bytes.
    #[arg(long = "ard_bytes")]
    ard_bytes: Option<u8>,

    /// Don't wait for acknowledgments.
    #[arg(long = "no_ack")]
    no_ack: bool,
}

impl RadioParams {
    pub fn configure(&self, radio: &mut Crazyradio) -> color_eyre::Result<()> {
        if let Some(channel) = self.channel {
            if channel > 125 {
                return Err(eyre!("channel valid range is 0-125, but got {channel}"));
            }
            radio
                .set_channel(channel)
                .wrap_err("Failed setting channel")?;
        }

        if let Some(address) = self.address.as_ref() {
            radio
                .set_address(&address.0)
                .wrap_err("Failed setting address")?;
        }

        if let Some(rate) = self.rate {
            let rate = match rate {
                0 => DataRate::Rate250K,
                1 => DataRate::Rate1M,
                2 => DataRate::Rate2M,
                i => return Err(eyre!("rate valid range is 0-2, but got {i}")),
            };
            radio
                .set_data_rate(rate)
                .wrap_err("Failed setting data rate")?;
        }

        if let Some(power) = self.power {
            let power = match power {
                0 => Power::Minus18dBm,
                1 => Power::Minus12dBm,
                2 => Power::Minus6dBm,
                3 => Power::Zero,
                i => return Err(eyre!("power valid range is 0-3, but got {i}")),
            };
            radio.set_power(power).wrap_err("Failed setting power")?;
        }

        if let Some(arc) = self.arc {
            radio
                .set_arc(arc)
                .wrap_err("Failed setting auto-retry count")?;
        }

        if let Some(us) = self.ard_us {
            radio
                .set_ard_time(us)
                .wrap_err("Failed setting auto-retry delay")?;
        }

        if let Some(bytes) = self.ard_bytes {
            radio
                .set_ard_bytes(bytes)
                .wrap_err("Failed setting auto-retry delay")?;
        }

        if self.no_ack {
            radio
                .set_ack_enable(false)
                .wrap_err("Failed disabling acknowledgments")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::HexBytes;

    #[test]
    fn parse_hex() {
        assert_eq!(
            "3c0102".parse::<HexBytes>(),
            Ok(HexBytes(vec![0x3c, 0x01, 0x02]))
        );
        assert_eq!(
            "E7:E7:e7:e7:E7".parse::<HexBytes>(),
            Ok(HexBytes(vec![0xe7; 5]))
        );
        assert_eq!("".parse::<HexBytes>(), Ok(HexBytes(vec![])));
        assert!("abc".parse::<HexBytes>().is_err());
        assert!("zz".parse::<HexBytes>().is_err());
    }

    #[test]
    fn display_hex() {
        assert_eq!(HexBytes(vec![0x0a, 0xff, 0x00]).to_string(), "0aff00");
    }
}
