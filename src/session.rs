//! Adapter lifecycle. A `Session` opens and initialises an adapter, runs
//! transfer batches through its engine, and closes the adapter again when
//! asked or when dropped. `SharedSession` puts a session behind a mutex so
//! several threads can share one adapter, one batch at a time.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::config::DeviceTable;
use crate::engine::{BatchError, Engine, Error, Result};
use crate::latency::LatencyLevel;
use crate::monitor::Monitor;
use crate::request::Transfer;
use crate::transport::{Settings, Transport, Error as TransportError};

/// An open adapter emulating one parallel port.
///
/// The adapter is closed by `close` or when the session is dropped.
pub struct Session<T: Transport> {
    engine: Option<Engine<T>>,
}

impl<T: Transport> Session<T> {
    /// Open the adapter configured for device `index` in `table`.
    pub fn open<D>(table: &D, index: usize, settings: &Settings) -> Result<Self>
        where D: DeviceTable + ?Sized
    {
        let device = table.lookup(index).ok_or(Error::UnknownDevice(index))?;
        log::debug!("Opening device {}: {}", index, device);
        let transport = T::open(&device).map_err(Error::Init)?;
        Self::with_transport(transport, settings)
    }

    /// Bring up an already opened transport.
    pub fn with_transport(transport: T, settings: &Settings) -> Result<Self> {
        let mut session = Session { engine: Some(Engine::new(transport, settings)?) };
        if let Err(e) = session.init(settings) {
            log::debug!("Adapter initialisation failed: {}", e);
            session.close();
            return Err(e);
        }
        Ok(session)
    }

    fn init(&mut self, settings: &Settings) -> Result<()> {
        let engine = self.engine_mut()?;
        engine.set_latency(LatencyLevel::Interactive)?;

        // Drive every pin low before entering bitbang mode.
        let transport = engine.transport_mut();
        transport.write(&[0x00]).map_err(Error::Init)?;
        log::debug!("Entering bitbang mode at {} baud, {} byte chunks",
                    settings.baud_rate, settings.chunk_size);
        transport.configure(settings).map_err(Error::Init)?;
        transport.purge_buffers().map_err(Error::Init)?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&Engine<T>> {
        self.engine.as_ref()
    }

    fn engine_mut(&mut self) -> Result<&mut Engine<T>> {
        self.engine.as_mut().ok_or(Error::Io(TransportError::Closed))
    }

    /// Process a batch of register accesses. See `Engine::transfer`.
    pub fn transfer(&mut self, batch: &mut [Transfer]) -> std::result::Result<(), BatchError> {
        match self.engine_mut() {
            Ok(engine) => engine.transfer(batch),
            Err(source) => Err(BatchError { index: 0, source }),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.engine_mut()?.flush()
    }

    pub fn set_latency(&mut self, level: LatencyLevel) -> Result<()> {
        self.engine_mut()?.set_latency(level)
    }

    pub fn set_monitor(&mut self, monitor: Option<Box<dyn Monitor>>) -> Result<()> {
        self.engine_mut()?.set_monitor(monitor);
        Ok(())
    }

    /// Send any pending pin bytes, leave bitbang mode and release the adapter.
    ///
    /// Failures are logged and do not stop the adapter being released.
    /// Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            log::debug!("Closing adapter");
            if let Err(e) = engine.flush() {
                log::warn!("Unable to send pending pin bytes while closing: {}", e);
            }
            engine.forget_latency();
            if let Err(e) = engine.transport_mut().close() {
                log::warn!("Error while closing adapter: {}", e);
            }
        }
    }
}

impl<T: Transport> std::ops::Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// A session shared between threads, one caller at a time.
pub struct SharedSession<T: Transport> {
    inner: Arc<Mutex<Session<T>>>,
}

impl<T: Transport> Clone for SharedSession<T> {
    fn clone(&self) -> Self {
        SharedSession { inner: self.inner.clone() }
    }
}

impl<T: Transport> SharedSession<T> {
    pub fn new(session: Session<T>) -> Self {
        SharedSession { inner: Arc::new(Mutex::new(session)) }
    }

    /// Take exclusive ownership of the session until the guard is dropped.
    pub fn lock(&self) -> Result<MutexGuard<'_, Session<T>>> {
        self.inner.lock().map_err(|_| anyhow::anyhow!("session lock poisoned").into())
    }

    pub fn transfer(&self, batch: &mut [Transfer]) -> std::result::Result<(), BatchError> {
        let mut session = self.lock().map_err(|source| BatchError { index: 0, source })?;
        session.transfer(batch)
    }

    pub fn close(&self) -> Result<()> {
        self.lock()?.close();
        Ok(())
    }
}
