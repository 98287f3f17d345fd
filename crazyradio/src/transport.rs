//! The USB operations the Crazyradio driver is built on.
//!
//! [`Crazyradio`][crate::Crazyradio] only talks to the dongle through the
//! [`Transport`] trait: vendor control transfers for configuration, bulk
//! transfers for packet data, and a device reset on release. [`UsbTransport`]
//! is the real implementation, running on top of [`nusb`].

use std::{future::Future, time::Duration};

use nusb::transfer::{ControlIn, ControlOut, ControlType, Recipient, RequestBuffer};
use tracing::{debug, trace};

use crate::{Error, consts::CONTROL_TIMEOUT};

/// USB primitives needed to drive a Crazyradio.
///
/// All operations block until the transfer completes, fails, or times out.
/// A timed-out bulk transfer must be reported as [`Error::Timeout`] and leave
/// the transport usable.
pub trait Transport {
    /// Issue a vendor control-out request to the device.
    fn control_out(&mut self, request: u8, value: u16, index: u16, data: &[u8])
    -> Result<(), Error>;

    /// Issue a vendor control-in request, reading up to `length` bytes.
    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error>;

    /// Write `data` to a bulk OUT endpoint.
    fn bulk_write(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<(), Error>;

    /// Read up to `max_len` bytes from a bulk IN endpoint.
    fn bulk_read(&mut self, endpoint: u8, max_len: usize, timeout: Duration)
    -> Result<Vec<u8>, Error>;

    /// Reset the USB device.
    fn reset(&mut self) -> Result<(), Error>;
}

/// A claimed Crazyradio USB interface.
///
/// `nusb` transfers are futures; this drives them to completion on a private
/// single-threaded runtime so that every call stays blocking and bounded by a
/// timeout. Don't call into it from inside another async runtime's worker
/// thread.
pub struct UsbTransport {
    device: nusb::Device,
    interface: nusb::Interface,
    runtime: tokio::runtime::Runtime,
}

impl UsbTransport {
    /// Open a USB device, make sure configuration 1 is active, and claim
    /// interface 0.
    pub fn open(info: &nusb::DeviceInfo) -> Result<Self, Error> {
        let device = info.open()?;
        #[cfg(not(target_os = "windows"))]
        {
            let active = device
                .active_configuration()
                .map_err(std::io::Error::from)?
                .configuration_value();
            if active != 1 {
                debug!("Switching from configuration {active} to configuration 1");
                #[cfg(target_os = "linux")]
                device.detach_kernel_driver(0)?;
                device.set_configuration(1)?;
            }
        }
        let interface = device.detach_and_claim_interface(0)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        Ok(Self {
            device,
            interface,
            runtime,
        })
    }

    fn block_on<F: Future>(&self, timeout: Duration, fut: F) -> Result<F::Output, Error> {
        // Dropping the transfer future on timeout cancels the transfer.
        self.runtime
            .block_on(async { tokio::time::timeout(timeout, fut).await })
            .map_err(|_| Error::Timeout)
    }
}

impl Transport for UsbTransport {
    fn control_out(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), Error> {
        let completion = self.block_on(
            CONTROL_TIMEOUT,
            self.interface.control_out(ControlOut {
                control_type: ControlType::Vendor,
                recipient: Recipient::Device,
                request,
                value,
                index,
                data,
            }),
        )?;
        Ok(completion.status?)
    }

    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error> {
        let completion = self.block_on(
            CONTROL_TIMEOUT,
            self.interface.control_in(ControlIn {
                control_type: ControlType::Vendor,
                recipient: Recipient::Device,
                request,
                value,
                index,
                length,
            }),
        )?;
        Ok(completion.into_result()?)
    }

    fn bulk_write(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<(), Error> {
        trace!("bulk out 0x{endpoint:02x}: {data:02x?}");
        let completion = self.block_on(timeout, self.interface.bulk_out(endpoint, data.to_vec()))?;
        Ok(completion.status?)
    }

    fn bulk_read(
        &mut self,
        endpoint: u8,
        max_len: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, Error> {
        let completion = self.block_on(
            timeout,
            self.interface.bulk_in(endpoint, RequestBuffer::new(max_len)),
        )?;
        let data = completion.into_result()?;
        trace!("bulk in 0x{endpoint:02x}: {data:02x?}");
        Ok(data)
    }

    fn reset(&mut self) -> Result<(), Error> {
        debug!("Resetting USB device");
        Ok(self.device.reset()?)
    }
}
