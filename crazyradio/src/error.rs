use std::ops::Range;

/// An error from operating the Crazyradio.
///
/// Some errors are recoverable:
///
/// - `Transfer` & `Timeout` may just be a failed packet operation on the USB
///   cable, and the dongle is usually still usable afterwards. A `Timeout`
///   means nothing was transferred, while `Transfer` means the USB stack
///   reported an actual failure (stall, disconnect, rejected request).
/// - `InvalidArgument` and `ValueRange` mean the arguments to a function were
///   rejected before anything was sent to the dongle.
/// - `InvalidState` means the handle was already released. This is a bug in
///   the calling code, not something the dongle did.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Underlying OS I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// Transfer error from `nusb`.
    #[error("USB transfer error")]
    Transfer(#[from] nusb::transfer::TransferError),

    /// A USB transfer didn't complete within its time budget.
    #[error("USB transfer timed out")]
    Timeout,

    /// The provided argument value is out of range.
    #[error("Value ({val}) out of range ({}..{})", .range.start, .range.end)]
    #[allow(missing_docs)]
    ValueRange { range: Range<u32>, val: u32 },

    /// Some argument to a function is invalid in a way not easily expressed as
    /// a range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The Crazyradio handle has already been released.
    #[error("Crazyradio handle was already released")]
    InvalidState,

    /// No Crazyradio was found on the system.
    #[error("No Crazyradio devices")]
    DeviceNotFound,
}
