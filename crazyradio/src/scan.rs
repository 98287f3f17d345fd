use tracing::debug;

use crate::{
    Crazyradio, Error, Transport,
    consts::{ControlRequest, MAX_PACKET_LEN, MAX_PAYLOAD_LEN},
};

impl<T: Transport> Crazyradio<T> {
    /// Scan a range of channels for devices that acknowledge `packet`.
    ///
    /// The dongle sends the packet once on every channel from `start` to
    /// `stop`, inclusive, using the current address and data rate, and
    /// returns the channels where an ack came back. The current channel
    /// setting is left untouched.
    pub fn scan_channels(&mut self, start: u8, stop: u8, packet: &[u8]) -> Result<Vec<u8>, Error> {
        if start > stop {
            return Err(Error::InvalidArgument(
                "Scan start channel must not be above the stop channel",
            ));
        }
        if packet.len() > MAX_PAYLOAD_LEN {
            return Err(Error::InvalidArgument(
                "Scan packet must be at most 32 bytes long",
            ));
        }
        debug!("Scanning channels {start}..={stop}");
        let transport = self.transport()?;
        transport.control_out(
            ControlRequest::ScanChannels as u8,
            start as u16,
            stop as u16,
            packet,
        )?;
        let found = transport.control_in(
            ControlRequest::ScanChannels as u8,
            0,
            0,
            MAX_PACKET_LEN as u16,
        )?;
        debug!("Found {} channels: {found:?}", found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Crazyradio, Error,
        mock::{Call, MockTransport},
    };

    #[test]
    fn scan_requests() {
        let (mock, state) = MockTransport::new();
        let mut radio = Crazyradio::new(mock).unwrap();
        state.borrow_mut().clear();
        state.borrow_mut().control_reads.push_back(vec![4, 80]);

        let found = radio.scan_channels(0, 125, &[0xff]).unwrap();
        assert_eq!(found, vec![4, 80]);
        assert_eq!(
            state.borrow().calls,
            vec![
                Call::ControlOut {
                    request: 0x21,
                    value: 0,
                    index: 125,
                    data: vec![0xff],
                },
                Call::ControlIn {
                    request: 0x21,
                    value: 0,
                    index: 0,
                    length: 64,
                },
            ]
        );
    }

    #[test]
    fn scan_nothing_found() {
        let (mock, _state) = MockTransport::new();
        let mut radio = Crazyradio::new(mock).unwrap();
        assert!(radio.scan_channels(10, 10, &[]).unwrap().is_empty());
    }

    #[test]
    fn scan_bad_arguments() {
        let (mock, state) = MockTransport::new();
        let mut radio = Crazyradio::new(mock).unwrap();
        state.borrow_mut().clear();
        assert!(matches!(
            radio.scan_channels(20, 10, &[0xff]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            radio.scan_channels(0, 10, &[0; 33]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(state.borrow().calls.is_empty());
    }
}
