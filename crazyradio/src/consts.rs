use std::time::Duration;

pub const CRAZYRADIO_USB_VID: u16 = 0x1915;
pub const CRAZYRADIO_USB_PID: u16 = 0x7777;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlRequest {
    SetRadioChannel = 0x01,
    SetRadioAddress = 0x02,
    SetDataRate = 0x03,
    SetRadioPower = 0x04,
    SetRadioArd = 0x05,
    SetRadioArc = 0x06,
    AckEnable = 0x10,
    SetContCarrier = 0x20,
    ScanChannels = 0x21,
    RadioMode = 0x22,
    LaunchBootloader = 0xFF,
}

pub const TX_ENDPOINT_ADDRESS: u8 = 0x01;
pub const RX_ENDPOINT_ADDRESS: u8 = 0x81;

/// Largest packet the dongle will hand back on the IN endpoint.
pub const MAX_PACKET_LEN: usize = 64;

/// Bulk timeout for a packet exchange, on both the write and the ack read.
pub const SEND_TIMEOUT: Duration = Duration::from_millis(10);
/// Bulk timeout for a raw receive.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_millis(1000);
pub const CONTROL_TIMEOUT: Duration = Duration::from_millis(1000);

pub const ADDRESS_LEN: usize = 5;
pub const MAX_ARC: u8 = 15;

/// ARD byte-count mode flag, set in the value field of `SetRadioArd`.
pub const ARD_BYTES_FLAG: u16 = 0x80;
/// Length of one ARD time step, in microseconds.
pub const ARD_STEP_US: u32 = 250;
pub const MAX_ARD_CODE: u8 = 15;

/// Largest payload an nRF24 packet can carry.
pub const MAX_PAYLOAD_LEN: usize = 32;

pub const DEFAULT_CHANNEL: u8 = 2;
pub const DEFAULT_ADDRESS: [u8; ADDRESS_LEN] = [0xE7; ADDRESS_LEN];
pub const DEFAULT_ARC: u8 = 3;
pub const DEFAULT_ARD_BYTES: u8 = 32;
