/*!

A blocking host driver for the [Crazyradio][crazyradio] USB dongle, made
using the pure-rust [`nusb`] crate for USB interfacing.

[crazyradio]: https://www.bitcraze.io/products/crazyradio-pa/

The Crazyradio is an nRF24-based radio that is driven entirely over USB: radio
parameters are set with vendor control requests, and packets are exchanged
over a pair of bulk endpoints. After every packet the dongle hands back an
[`Ack`] describing whether the remote device acknowledged it.

The standard entry point for this library is [`open_crazyradio()`], which will
open the first available dongle and apply the default configuration:
2 Mbps, channel 2, address `E7E7E7E7E7`, 0 dBm, 3 retries, and an
auto-retry delay sized for a 32-byte ack payload.

The dongle is released when the [`Crazyradio`] is closed or dropped: it is
put back into PTX mode and the USB device is reset, on every exit path.

```no_run
use anyhow::Result;
use crazyradio::{DataRate, Power};

fn main() -> Result<()> {
    let mut radio = crazyradio::open_crazyradio()?;

    radio.set_channel(80)?;
    radio.set_data_rate(DataRate::Rate250K)?;
    radio.set_power(Power::Minus6dBm)?;
    radio.set_ard_time(1000)?;

    match radio.send_packet(&[0xff, 0x01, 0x02])? {
        Some(ack) if ack.acknowledged => println!("Acked after {} retries", ack.retry_count),
        Some(_) => println!("No ack"),
        None => println!("Dongle didn't answer"),
    }

    radio.close()?;
    Ok(())
}
```

*/

#![warn(missing_docs)]

mod ack;
mod consts;
mod error;
#[cfg(test)]
mod mock;
mod scan;
pub mod transport;

use tracing::{debug, trace, warn};

use crate::consts::*;

pub use crate::ack::Ack;
pub use crate::error::Error;
pub use crate::transport::{Transport, UsbTransport};

/// Radio data rate.
///
/// Use when calling [`Crazyradio::set_data_rate`].
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataRate {
    /// 250 kbps
    Rate250K = 0,
    /// 1 Mbps
    Rate1M = 1,
    /// 2 Mbps
    Rate2M = 2,
}

impl std::fmt::Display for DataRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rate250K => f.write_str("250 kbps"),
            Self::Rate1M => f.write_str("1 Mbps"),
            Self::Rate2M => f.write_str("2 Mbps"),
        }
    }
}

/// Radio transmit power.
///
/// Use when calling [`Crazyradio::set_power`]. The Crazyradio PA adds its own
/// amplifier on top of these levels.
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Power {
    /// -18 dBm
    Minus18dBm = 0,
    /// -12 dBm
    Minus12dBm = 1,
    /// -6 dBm
    Minus6dBm = 2,
    /// 0 dBm
    Zero = 3,
}

impl std::fmt::Display for Power {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minus18dBm => f.write_str("-18 dBm"),
            Self::Minus12dBm => f.write_str("-12 dBm"),
            Self::Minus6dBm => f.write_str("-6 dBm"),
            Self::Zero => f.write_str("0 dBm"),
        }
    }
}

/// Radio operating mode.
///
/// Use when calling [`Crazyradio::set_radio_mode`].
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioMode {
    /// Primary transmitter. This is the default, and the mode the dongle is
    /// returned to on release.
    Ptx = 0,
    /// Primary transmitter, synchronous with the USB requests.
    PtxSynchronous = 1,
    /// Primary receiver. Packets are picked up with [`Crazyradio::receive`].
    Prx = 2,
    /// Hybrid mode, mixing PTX and PRX.
    Hybrid = 3,
}

impl std::fmt::Display for RadioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ptx => f.write_str("PTX"),
            Self::PtxSynchronous => f.write_str("PTX synchronous"),
            Self::Prx => f.write_str("PRX"),
            Self::Hybrid => f.write_str("hybrid"),
        }
    }
}

/// A Crazyradio device descriptor, which can be opened.
///
/// These are mostly returned from calling [`list_crazyradio_devices`], but
/// can also be formed by trying to convert a [`nusb::DeviceInfo`] into one.
pub struct CrazyradioDescriptor {
    info: nusb::DeviceInfo,
}

impl CrazyradioDescriptor {
    /// Get the serial number of this Crazyradio, as a string.
    pub fn serial(&self) -> Option<&str> {
        self.info.serial_number()
    }

    /// Get the firmware version as `(major, minor)`, read from the USB device
    /// release number.
    pub fn firmware_version(&self) -> (u8, u8) {
        let version = self.info.device_version();
        ((version >> 8) as u8, (version & 0xff) as u8)
    }

    /// Get the USB bus number and device address.
    pub fn location(&self) -> (u8, u8) {
        (self.info.bus_number(), self.info.device_address())
    }

    /// Try and open this Crazyradio, applying the default radio configuration.
    ///
    /// # Panics
    ///
    /// The USB transfers run on a private Tokio runtime, so this panics if called
    /// from inside another Tokio runtime. Use `tokio::task::spawn_blocking` there.
    pub fn open(self) -> Result<Crazyradio, Error> {
        debug!(
            "Opening Crazyradio {}",
            self.serial().unwrap_or("(no serial)")
        );
        let transport = UsbTransport::open(&self.info)?;
        Crazyradio::new(transport)
    }
}

/// Try and turn any [`nusb::DeviceInfo`] descriptor into a Crazyradio, failing
/// if the VID and PID don't match.
impl TryFrom<nusb::DeviceInfo> for CrazyradioDescriptor {
    type Error = &'static str;
    fn try_from(value: nusb::DeviceInfo) -> Result<Self, Self::Error> {
        if value.vendor_id() != CRAZYRADIO_USB_VID {
            Err("VID doesn't match for Crazyradio")
        } else if value.product_id() != CRAZYRADIO_USB_PID {
            Err("VID recognized, PID not recognized")
        } else {
            Ok(CrazyradioDescriptor { info: value })
        }
    }
}

/// List all available Crazyradio devices.
pub fn list_crazyradio_devices() -> Result<Vec<CrazyradioDescriptor>, std::io::Error> {
    Ok(nusb::list_devices()?
        .filter(|d| d.vendor_id() == CRAZYRADIO_USB_VID && d.product_id() == CRAZYRADIO_USB_PID)
        .map(|d| CrazyradioDescriptor { info: d })
        .collect::<Vec<CrazyradioDescriptor>>())
}

/// Open the first detected Crazyradio in the system.
///
/// This is a shortcut for calling [`list_crazyradio_devices`] and opening the
/// first one.
///
/// # Panics
///
/// The USB transfers run on a private Tokio runtime, so this panics if called
/// from inside another Tokio runtime. Use `tokio::task::spawn_blocking` there.
pub fn open_crazyradio() -> Result<Crazyradio, Error> {
    list_crazyradio_devices()?
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound)?
        .open()
}

/// Open the first detected Crazyradio, run `f` with it, and release it
/// afterwards, whether or not `f` succeeded.
///
/// An error from `f` takes precedence over an error while releasing.
pub fn with_crazyradio<R>(
    f: impl FnOnce(&mut Crazyradio) -> Result<R, Error>,
) -> Result<R, Error> {
    open_crazyradio()?.scoped(f)
}

/// Convert an auto-retry delay in microseconds into the dongle's 4-bit code.
///
/// Code 0 is 250 us, and each step adds 250 us, up to 4000 us at code 15.
/// The delay is rounded down to a multiple of 250 us, then clamped.
pub fn ard_time_code(us: u32) -> u8 {
    (us / ARD_STEP_US).saturating_sub(1).min(MAX_ARD_CODE as u32) as u8
}

/// A Crazyradio dongle. This is the main struct for talking to the Crazyradio.
///
/// Every radio parameter can be changed at any time. Packets are sent with
/// [`send_packet`][Self::send_packet], which also reads back the dongle's
/// acknowledgment, or with the raw [`send`][Self::send] and
/// [`receive`][Self::receive] pair for modes where there is no ack.
///
/// The handle owns the dongle until it is released, either explicitly with
/// [`close`][Self::close] / [`release`][Self::release] or implicitly when it
/// is dropped. Releasing puts the radio back into PTX mode and resets the USB
/// device. Any operation on a released handle fails with
/// [`Error::InvalidState`].
pub struct Crazyradio<T: Transport = UsbTransport> {
    transport: Option<T>,
    arc: u8,
}

impl<T: Transport> Crazyradio<T> {
    /// Take an opened transport and apply the default radio configuration.
    ///
    /// If any part of the default configuration fails, the dongle is released
    /// again before the error is returned.
    pub fn new(transport: T) -> Result<Self, Error> {
        let mut radio = Self {
            transport: Some(transport),
            arc: 0,
        };
        radio.set_data_rate(DataRate::Rate2M)?;
        radio.set_channel(DEFAULT_CHANNEL)?;
        radio.set_cont_carrier(false)?;
        radio.set_address(&DEFAULT_ADDRESS)?;
        radio.set_power(Power::Zero)?;
        radio.set_arc(DEFAULT_ARC)?;
        radio.set_ard_bytes(DEFAULT_ARD_BYTES)?;
        Ok(radio)
    }

    fn transport(&mut self) -> Result<&mut T, Error> {
        self.transport.as_mut().ok_or(Error::InvalidState)
    }

    fn write_u16(&mut self, req: ControlRequest, idx: u16, val: u16) -> Result<(), Error> {
        debug!("{req:?}: value=0x{val:02x}, index={idx}");
        self.transport()?.control_out(req as u8, val, idx, &[])
    }

    fn write_bytes(&mut self, req: ControlRequest, data: &[u8]) -> Result<(), Error> {
        debug!("{req:?}: {data:02x?}");
        self.transport()?.control_out(req as u8, 0, 0, data)
    }

    /// The auto-retry count last set with [`set_arc`][Self::set_arc].
    pub fn arc(&self) -> u8 {
        self.arc
    }

    /// Set the radio channel, as an offset in MHz from 2400 MHz.
    ///
    /// The channel isn't range-checked here; the nRF24 supports 0-125.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        self.write_u16(ControlRequest::SetRadioChannel, 0, channel as u16)
    }

    /// Set the 5-byte radio address.
    pub fn set_address(&mut self, address: &[u8]) -> Result<(), Error> {
        if address.len() != ADDRESS_LEN {
            return Err(Error::InvalidArgument(
                "Crazyradio address must be exactly 5 bytes long",
            ));
        }
        self.write_bytes(ControlRequest::SetRadioAddress, address)
    }

    /// Set the radio data rate.
    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Error> {
        self.write_u16(ControlRequest::SetDataRate, 0, rate as u16)
    }

    /// Set the radio transmit power.
    pub fn set_power(&mut self, power: Power) -> Result<(), Error> {
        self.write_u16(ControlRequest::SetRadioPower, 0, power as u16)
    }

    /// Set the auto-retry count: how many times the dongle retransmits a
    /// packet that wasn't acknowledged. Valid range is 0-15.
    pub fn set_arc(&mut self, arc: u8) -> Result<(), Error> {
        if arc > MAX_ARC {
            return Err(Error::ValueRange {
                range: 0..(MAX_ARC as u32 + 1),
                val: arc as u32,
            });
        }
        self.write_u16(ControlRequest::SetRadioArc, 0, arc as u16)?;
        self.arc = arc;
        Ok(())
    }

    /// Set the auto-retry delay as a time, in microseconds.
    ///
    /// The delay is rounded down to a multiple of 250 us and clamped to
    /// 250-4000 us. See [`ard_time_code`].
    pub fn set_ard_time(&mut self, us: u32) -> Result<(), Error> {
        let code = ard_time_code(us);
        trace!("ARD of {us} us uses code {code}");
        self.write_u16(ControlRequest::SetRadioArd, 0, code as u16)
    }

    /// Set the auto-retry delay as the length of the ack payload, in bytes.
    /// The dongle works out the delay needed to receive an ack that long.
    ///
    /// The count is passed through as is; the dongle decides what it accepts.
    pub fn set_ard_bytes(&mut self, bytes: u8) -> Result<(), Error> {
        self.write_u16(ControlRequest::SetRadioArd, 0, ARD_BYTES_FLAG | bytes as u16)
    }

    /// Turn the continuous carrier test mode on or off.
    ///
    /// While active, the radio transmits an unmodulated carrier on the
    /// current channel.
    pub fn set_cont_carrier(&mut self, active: bool) -> Result<(), Error> {
        self.write_u16(ControlRequest::SetContCarrier, 0, active as u16)
    }

    /// Set the radio operating mode.
    pub fn set_radio_mode(&mut self, mode: RadioMode) -> Result<(), Error> {
        self.write_u16(ControlRequest::RadioMode, 0, mode as u16)
    }

    /// Enable or disable waiting for acknowledgments. With acks disabled,
    /// packets are sent once and never reported as acknowledged.
    pub fn set_ack_enable(&mut self, enable: bool) -> Result<(), Error> {
        self.write_u16(ControlRequest::AckEnable, 0, enable as u16)
    }

    /// Send a packet and read back the dongle's acknowledgment.
    ///
    /// Returns `None` if the dongle didn't answer before the timeout. That is
    /// distinct from an [`Ack`] reporting that the remote device didn't
    /// acknowledge the packet.
    pub fn send_packet(&mut self, data: &[u8]) -> Result<Option<Ack>, Error> {
        self.transport()?
            .bulk_write(TX_ENDPOINT_ADDRESS, data, SEND_TIMEOUT)?;
        let Some(response) = self.read_packet(SEND_TIMEOUT)? else {
            return Ok(None);
        };
        Ok(Ack::decode(&response, self.arc))
    }

    /// Send a packet without reading back any acknowledgment.
    pub fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        self.transport()?
            .bulk_write(TX_ENDPOINT_ADDRESS, data, SEND_TIMEOUT)
    }

    /// Wait up to a second for a raw packet from the dongle, as used in PRX
    /// mode. Returns `None` if nothing arrived.
    pub fn receive(&mut self) -> Result<Option<Vec<u8>>, Error> {
        self.read_packet(RECEIVE_TIMEOUT)
    }

    fn read_packet(&mut self, timeout: std::time::Duration) -> Result<Option<Vec<u8>>, Error> {
        match self
            .transport()?
            .bulk_read(RX_ENDPOINT_ADDRESS, MAX_PACKET_LEN, timeout)
        {
            Ok(data) if data.is_empty() => Ok(None),
            Ok(data) => Ok(Some(data)),
            Err(Error::Timeout) => {
                trace!("No response within {timeout:?}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Run `f` with this Crazyradio, then release it, whether or not `f`
    /// succeeded.
    ///
    /// An error from `f` takes precedence over an error while releasing. If
    /// `f` already released the dongle, it isn't released again.
    pub fn scoped<R>(mut self, f: impl FnOnce(&mut Self) -> Result<R, Error>) -> Result<R, Error> {
        let ret = f(&mut self);
        let released = if self.transport.is_some() {
            self.release()
        } else {
            Ok(())
        };
        let ret = ret?;
        released?;
        Ok(ret)
    }

    /// Release the dongle: switch back to PTX mode, then reset the USB device.
    ///
    /// The reset is attempted even if switching modes failed, and the first
    /// error is returned. Afterwards the handle is unusable, and every other
    /// operation, including another release, returns
    /// [`Error::InvalidState`].
    pub fn release(&mut self) -> Result<(), Error> {
        let mode = self.set_radio_mode(RadioMode::Ptx);
        let reset = self.transport()?.reset();
        self.transport = None;
        debug!("Released Crazyradio");
        mode.and(reset)
    }

    /// Release the dongle and consume the handle. See
    /// [`release`][Self::release].
    pub fn close(mut self) -> Result<(), Error> {
        self.release()
    }

    /// Reboot the dongle into its bootloader.
    ///
    /// The dongle leaves the bus and comes back as a different USB device, so
    /// the usual release sequence is skipped.
    pub fn launch_bootloader(mut self) -> Result<(), Error> {
        self.write_u16(ControlRequest::LaunchBootloader, 0, 0)?;
        self.transport = None;
        Ok(())
    }
}

impl<T: Transport> Drop for Crazyradio<T> {
    fn drop(&mut self) {
        if self.transport.is_some() {
            if let Err(e) = self.release() {
                warn!("Failed to release Crazyradio: {e}");
            }
        }
    }
}
