/// The acknowledgment envelope the Crazyradio returns after sending a packet.
///
/// The dongle reports whether the remote device acknowledged the packet, how
/// many retransmissions it took, and any payload the remote attached to its
/// ack. The payload contents are not interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ack {
    /// The remote device acknowledged the packet.
    pub acknowledged: bool,
    /// The nRF24 received power detector fired while receiving the ack.
    pub power_detector: bool,
    /// Number of retransmissions the dongle performed, 0-15.
    pub retry_count: u8,
    /// Payload attached to the ack, possibly empty.
    pub payload: Vec<u8>,
}

impl Ack {
    /// Decode a response read from the dongle's IN endpoint.
    ///
    /// Returns `None` for an empty response. A zero status byte means the
    /// firmware reported no status at all; in that case the retry count is
    /// taken from `arc`, the currently configured auto-retry count, and the
    /// packet is reported as not acknowledged.
    pub fn decode(data: &[u8], arc: u8) -> Option<Self> {
        let (&status, payload) = data.split_first()?;
        if status == 0 {
            return Some(Self {
                retry_count: arc,
                ..Self::default()
            });
        }
        Some(Self {
            acknowledged: status & 0x01 != 0,
            power_detector: status & 0x02 != 0,
            retry_count: status >> 4,
            payload: payload.to_vec(),
        })
    }
}

impl std::fmt::Display for Ack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (retries: {}{})",
            if self.acknowledged { "ack" } else { "no ack" },
            self.retry_count,
            if self.power_detector { ", power detected" } else { "" },
        )?;
        if !self.payload.is_empty() {
            write!(f, " payload: {:02x?}", self.payload)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Ack;

    #[test]
    fn status_byte() {
        let ack = Ack::decode(&[0x1B, 0xAA, 0xBB], 3).unwrap();
        assert!(ack.acknowledged);
        assert!(ack.power_detector);
        assert_eq!(ack.retry_count, 1);
        assert_eq!(ack.payload, vec![0xAA, 0xBB]);
    }

    #[test]
    fn retry_count_uses_high_nibble() {
        let ack = Ack::decode(&[0xF1], 3).unwrap();
        assert!(ack.acknowledged);
        assert!(!ack.power_detector);
        assert_eq!(ack.retry_count, 15);
        assert!(ack.payload.is_empty());

        let ack = Ack::decode(&[0x30], 0).unwrap();
        assert!(!ack.acknowledged);
        assert_eq!(ack.retry_count, 3);
    }

    #[test]
    fn zero_status_falls_back_to_arc() {
        let ack = Ack::decode(&[0x00, 0x12, 0x34], 7).unwrap();
        assert_eq!(
            ack,
            Ack {
                acknowledged: false,
                power_detector: false,
                retry_count: 7,
                payload: Vec::new(),
            }
        );
    }

    #[test]
    fn empty_response() {
        assert_eq!(Ack::decode(&[], 3), None);
    }
}
