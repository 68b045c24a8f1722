//! The transfer engine turns batches of parallel port register accesses
//! into bitbang traffic on the adapter.
//!
//! Each data register write queues one pin byte in the output buffer. The
//! buffer is only sent when a status register read needs a round trip to
//! sample TDO, or when it is one byte short of the transfer chunk size.

use thiserror::Error;
use crate::latency::{Latency, LatencyLevel};
use crate::monitor::{Event, Monitor};
use crate::pins;
use crate::port::ParallelPort;
use crate::request::{Direction, Register, Transfer};
use crate::transport::{Settings, Transport, UnknownRegister, Error as TransportError};

#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to initialise adapter")]
    Init(#[source] TransportError),
    #[error("adapter I/O failed")]
    Io(#[from] TransportError),
    #[error("unable to set latency timer to {level}ms")]
    Latency { level: u8, #[source] source: TransportError },
    #[error("unrecognised register address {0:#x}")]
    UnknownRegister(u32),
    #[error("output buffer capacity of {0} bytes is too small")]
    InvalidCapacity(usize),
    #[error("no configuration for device {0}")]
    UnknownDevice(usize),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A batch stopped at request `index`.
///
/// Requests before `index` have completed and their results are written;
/// requests from `index` on were not processed.
#[derive(Error, Debug)]
#[error("transfer aborted at request {index}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub source: Error,
}

pub struct Engine<T: Transport> {
    transport: T,
    latency: Latency,
    port: ParallelPort,
    writebuf: Vec<u8>,
    capacity: usize,
    readbuf: u8,
    base_address: u32,
    unknown_register: UnknownRegister,
    monitor: Option<Box<dyn Monitor>>,
}

impl<T: Transport> Engine<T> {
    pub fn new(transport: T, settings: &Settings) -> Result<Self> {
        // Room for at least one pin byte before the forced flush.
        if settings.chunk_size < 2 {
            return Err(Error::InvalidCapacity(settings.chunk_size));
        }

        Ok(Engine {
            transport,
            latency: Latency::new(),
            port: ParallelPort::new(),
            writebuf: Vec::with_capacity(settings.chunk_size),
            capacity: settings.chunk_size,
            readbuf: 0,
            base_address: settings.base_address,
            unknown_register: settings.unknown_register,
            monitor: None,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Current emulated register state.
    pub fn port(&self) -> &ParallelPort {
        &self.port
    }

    /// Pin bytes queued but not yet sent.
    pub fn pending(&self) -> &[u8] {
        &self.writebuf[..]
    }

    pub fn set_monitor(&mut self, monitor: Option<Box<dyn Monitor>>) {
        self.monitor = monitor;
    }

    pub fn set_latency(&mut self, level: LatencyLevel) -> Result<()> {
        self.latency.set(&mut self.transport, level)
            .map_err(|source| Error::Latency { level: level.into(), source })
    }

    pub(crate) fn forget_latency(&mut self) {
        self.latency.forget();
    }

    /// Process `batch` in order, writing results into read requests.
    ///
    /// Register state starts from zero for every batch. Queued pin bytes
    /// are not flushed at the end of the batch.
    pub fn transfer(&mut self, batch: &mut [Transfer]) -> std::result::Result<(), BatchError> {
        log::trace!("Processing batch of {} requests", batch.len());
        self.port.reset();
        self.port.derive_status();

        for (index, request) in batch.iter_mut().enumerate() {
            if let Err(source) = self.process(request) {
                log::debug!("Batch aborted at request {}: {}", index, source);
                return Err(BatchError { index, source });
            }
        }
        Ok(())
    }

    /// Send any queued pin bytes without reading back.
    pub fn flush(&mut self) -> Result<()> {
        if self.writebuf.is_empty() {
            return Ok(());
        }
        self.run(false)
    }

    fn process(&mut self, request: &mut Transfer) -> Result<()> {
        let mut must_write = false;

        match Register::decode(request.address, self.base_address) {
            Some(Register::Data) => match request.direction {
                Direction::Read => {
                    self.port.derive_status();
                    request.data = self.port.data().value();
                    self.notify(&Event::DataRead(request.data));
                },
                Direction::Write => {
                    self.port.write_data(request.data);
                    must_write = true;
                },
            },
            Some(Register::Status) => match request.direction {
                Direction::Read => {
                    self.port.derive_status();
                    self.mark_read();
                    self.run(true)?;
                    self.port.set_tdo(pins::tdo(self.readbuf));
                    request.data = self.port.status().value();
                    self.notify(&Event::StatusRead(request.data));
                },
                Direction::Write => self.port.write_status(request.data),
            },
            None => match self.unknown_register {
                UnknownRegister::Reject => return Err(Error::UnknownRegister(request.address)),
                UnknownRegister::Ignore => {
                    log::trace!("Ignoring access to address {:#x}", request.address);
                },
            },
        }

        if must_write {
            let data = self.port.data();
            let pins = pins::encode(data);
            self.notify(&Event::StoreWrite { data: data.value(), pins });
            // A failed flush leaves the buffer full; never grow it past the bound.
            if self.writebuf.len() >= self.capacity - 1 {
                self.run(false)?;
            }
            self.writebuf.push(pins);
        }

        if self.writebuf.len() >= self.capacity - 1 {
            self.run(false)?;
        }

        Ok(())
    }

    /// Ask the adapter to sample its inputs along with the latest pin byte.
    fn mark_read(&mut self) {
        match self.writebuf.last_mut() {
            Some(last) => *last |= pins::RD,
            None => self.writebuf.push(pins::RD),
        }
    }

    /// Send the output buffer, then read back one byte if `must_read`.
    fn run(&mut self, must_read: bool) -> Result<()> {
        self.set_latency(LatencyLevel::Interactive)?;

        log::trace!("TX: {:02X?}", truncated(&self.writebuf));
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.event(&Event::Flush { bytes: &self.writebuf, read: must_read });
        }
        let result = self.transport.write(&self.writebuf);
        self.writebuf.clear();
        result?;

        if must_read {
            self.transport.read(std::slice::from_mut(&mut self.readbuf))?;
            log::trace!("RX: {:02X}", self.readbuf);
            self.notify(&Event::Response(self.readbuf));
        }

        Ok(())
    }

    fn notify(&mut self, event: &Event<'_>) {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.event(event);
        }
    }
}

/// Limit logged buffers to their first few bytes.
fn truncated(buf: &[u8]) -> &[u8] {
    &buf[..buf.len().min(16)]
}
