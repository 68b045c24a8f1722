//! This is the lowest-level module. It describes the USB adapter that the
//! emulated parallel port sits on: a device which can be opened, placed into
//! synchronous bitbang mode, and then written to and read from one byte per
//! pin sample. The engine only ever talks to a `Transport`; the FTDI D2XX
//! implementation lives in the `ftd2xx` module.

use thiserror::Error;
use crate::config::DeviceConfig;
use crate::pins;

#[derive(Error, Debug)]
pub enum Error {
    #[error("specified adapter not found.")]
    NotFound,
    #[error("adapter has already been closed.")]
    Closed,
    #[error("short read from adapter: expected {expected} bytes, got {actual}.")]
    ShortRead { expected: usize, actual: usize },
    #[error("short write to adapter: expected {expected} bytes, wrote {actual}.")]
    ShortWrite { expected: usize, actual: usize },
    #[cfg(feature = "ftd2xx")]
    #[error("FTDI error")]
    Ftdi(#[from] libftd2xx::FtStatus),
    #[cfg(feature = "ftd2xx")]
    #[error("FTDI timeout")]
    Timeout(#[from] libftd2xx::TimeoutError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// What to do with a request whose address is neither the data nor the
/// status register.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UnknownRegister {
    /// Fail the batch at that request.
    Reject,
    /// Leave the request untouched and carry on.
    Ignore,
}

/// Adapter and emulation parameters applied when a session is opened.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// USB transfer chunk size, which also bounds the engine's output buffer.
    pub chunk_size: usize,
    /// Bitbang clock rate.
    pub baud_rate: u32,
    /// Adapter pins driven as outputs in bitbang mode.
    pub pin_mask: u8,
    /// I/O address of the emulated port's data register.
    pub base_address: u32,
    pub unknown_register: UnknownRegister,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chunk_size: 1 << 20,
            baud_rate: 100_000,
            pin_mask: pins::TCK | pins::TDI | pins::TMS | pins::LED,
            base_address: 0x378,
            unknown_register: UnknownRegister::Reject,
        }
    }
}

/// A USB adapter capable of synchronous bitbang.
///
/// All methods block until the adapter has completed the operation.
pub trait Transport {
    /// Open the adapter described by `device`.
    fn open(device: &DeviceConfig) -> Result<Self> where Self: Sized;

    /// Set chunk sizes, enter synchronous bitbang mode with `settings.pin_mask`
    /// as outputs, and set the bitbang clock rate.
    fn configure(&mut self, settings: &Settings) -> Result<()>;

    /// Program the adapter's latency timer, in milliseconds.
    fn set_latency(&mut self, level: u8) -> Result<()>;

    /// Write all of `buf` to the adapter.
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Fill all of `buf` from the adapter.
    fn read(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discard anything pending in the adapter's receive and transmit buffers.
    fn purge_buffers(&mut self) -> Result<()>;

    /// Leave bitbang mode and release the device.
    ///
    /// Calling this more than once must not fail.
    fn close(&mut self) -> Result<()>;
}
