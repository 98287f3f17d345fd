use clap::Args;
use color_eyre::eyre::Context;
use crazyradio::list_crazyradio_devices;

/// List every attached Crazyradio.
#[derive(Args, Debug)]
pub struct Cmd {}

impl Cmd {
    pub fn cmd(&self, filter_serial: Option<&str>) -> color_eyre::Result<()> {
        println!("Binary release {}", env!("CARGO_PKG_VERSION"));

        let mut found = false;
        for dev in list_crazyradio_devices().wrap_err("Couldn't enumerate Crazyradio devices")? {
            let serial = dev.serial().unwrap_or("Unknown");
            if filter_serial.is_some_and(|s| s != serial) {
                continue;
            }
            found = true;

            let (bus, address) = dev.location();
            println!();
            println!("Found Crazyradio, USB serial {serial}");
            println!("Firmware Version: {}", firmware_string(dev.firmware_version()));
            println!("USB bus {bus:03}, device {address:03}");
        }

        if !found {
            if let Some(serial) = filter_serial {
                println!("Unable to locate Crazyradio with serial number {serial}");
            } else {
                println!("Couldn't find any Crazyradio dongles");
            }
        }
        Ok(())
    }
}

/// The device release number is BCD-encoded in both bytes.
fn firmware_string((major, minor): (u8, u8)) -> String {
    format!("{major:x}.{minor:x}")
}

#[cfg(test)]
mod tests {
    use super::firmware_string;

    #[test]
    fn firmware_is_bcd() {
        assert_eq!(firmware_string((0x00, 0x55)), "0.55");
        assert_eq!(firmware_string((0x10, 0x02)), "10.2");
    }
}
