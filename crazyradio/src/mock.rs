use std::{cell::RefCell, collections::VecDeque, rc::Rc, time::Duration};

use crate::{Error, transport::Transport};

/// One recorded call on a [`MockTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    ControlOut {
        request: u8,
        value: u16,
        index: u16,
        data: Vec<u8>,
    },
    ControlIn {
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    },
    BulkWrite {
        endpoint: u8,
        data: Vec<u8>,
        timeout: Duration,
    },
    BulkRead {
        endpoint: u8,
        max_len: usize,
        timeout: Duration,
    },
    Reset,
}

/// Scripted answers and the record of calls, shared between a test and the
/// [`MockTransport`] it handed to the driver.
///
/// Bulk reads with nothing queued time out. Control-out requests can be made
/// to fail by request id, bulk writes can be made to time out.
#[derive(Default)]
pub(crate) struct MockState {
    pub calls: Vec<Call>,
    pub bulk_reads: VecDeque<Result<Vec<u8>, Error>>,
    pub control_reads: VecDeque<Vec<u8>>,
    pub fail_request: Option<u8>,
    pub fail_reset: bool,
    pub write_timeout: bool,
}

pub(crate) type Shared = Rc<RefCell<MockState>>;

pub(crate) struct MockTransport {
    state: Shared,
}

impl MockTransport {
    pub fn new() -> (Self, Shared) {
        let state = Shared::default();
        (
            Self {
                state: state.clone(),
            },
            state,
        )
    }
}

impl MockState {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn control_outs(&self) -> Vec<(u8, u16, u16, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ControlOut {
                    request,
                    value,
                    index,
                    data,
                } => Some((*request, *value, *index, data.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Transport for MockTransport {
    fn control_out(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ControlOut {
            request,
            value,
            index,
            data: data.to_vec(),
        });
        if state.fail_request == Some(request) {
            return Err(Error::Transfer(nusb::transfer::TransferError::Stall));
        }
        Ok(())
    }

    fn control_in(
        &mut self,
        request: u8,
        value: u16,
        index: u16,
        length: u16,
    ) -> Result<Vec<u8>, Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ControlIn {
            request,
            value,
            index,
            length,
        });
        Ok(state.control_reads.pop_front().unwrap_or_default())
    }

    fn bulk_write(&mut self, endpoint: u8, data: &[u8], timeout: Duration) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BulkWrite {
            endpoint,
            data: data.to_vec(),
            timeout,
        });
        if state.write_timeout {
            return Err(Error::Timeout);
        }
        Ok(())
    }

    fn bulk_read(
        &mut self,
        endpoint: u8,
        max_len: usize,
        timeout: Duration,
    ) -> Result<Vec<u8>, Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BulkRead {
            endpoint,
            max_len,
            timeout,
        });
        state.bulk_reads.pop_front().unwrap_or(Err(Error::Timeout))
    }

    fn reset(&mut self) -> Result<(), Error> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Reset);
        if state.fail_reset {
            return Err(Error::Io(std::io::Error::other("reset failed")));
        }
        Ok(())
    }
}
