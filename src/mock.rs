//! In-memory `Transport` for tests, recording every call it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use crate::config::DeviceConfig;
use crate::transport::{Error, Result, Settings, Transport};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    Configure(Settings),
    SetLatency(u8),
    Write(Vec<u8>),
    Read(usize),
    Purge,
    Close,
}

#[derive(Default)]
pub struct MockTransport {
    log: Arc<Mutex<Vec<Call>>>,
    responses: VecDeque<u8>,
    writes: usize,
    fail_write: Option<usize>,
    fail_latency: usize,
    fail_configure: bool,
    closed: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle on the call log, which outlives the transport.
    pub fn log(&self) -> Arc<Mutex<Vec<Call>>> {
        self.log.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    /// Queue a byte to be returned by the next read.
    pub fn respond(&mut self, byte: u8) {
        self.responses.push_back(byte);
    }

    /// Fail the `n`th write call, counting from zero.
    pub fn fail_write(&mut self, n: usize) {
        self.fail_write = Some(n);
    }

    /// Fail the next `n` latency timer updates.
    pub fn fail_latency(&mut self, n: usize) {
        self.fail_latency = n;
    }

    pub fn fail_configure(&mut self) {
        self.fail_configure = true;
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

/// All calls in `log` that wrote or read bytes.
pub fn traffic(log: &[Call]) -> Vec<Call> {
    log.iter()
        .filter(|c| matches!(c, Call::Write(_) | Call::Read(_)))
        .cloned()
        .collect()
}

impl Transport for MockTransport {
    fn open(device: &DeviceConfig) -> Result<Self> {
        if device.vid == 0 {
            Err(Error::NotFound)
        } else {
            Ok(Self::new())
        }
    }

    fn configure(&mut self, settings: &Settings) -> Result<()> {
        self.record(Call::Configure(settings.clone()));
        if self.fail_configure {
            return Err(anyhow::anyhow!("configure failed").into());
        }
        Ok(())
    }

    fn set_latency(&mut self, level: u8) -> Result<()> {
        self.record(Call::SetLatency(level));
        if self.fail_latency > 0 {
            self.fail_latency -= 1;
            return Err(anyhow::anyhow!("latency failed").into());
        }
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        self.record(Call::Write(buf.to_vec()));
        let n = self.writes;
        self.writes += 1;
        if self.fail_write == Some(n) {
            return Err(Error::ShortWrite { expected: buf.len(), actual: 0 });
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }
        let expected = buf.len();
        self.record(Call::Read(expected));
        for (actual, byte) in buf.iter_mut().enumerate() {
            *byte = self.responses.pop_front()
                .ok_or(Error::ShortRead { expected, actual })?;
        }
        Ok(())
    }

    fn purge_buffers(&mut self) -> Result<()> {
        self.record(Call::Purge);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.record(Call::Close);
        self.closed = true;
        Ok(())
    }
}
