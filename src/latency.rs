//! Tracks the adapter's latency timer so that it is only reprogrammed when
//! the requested level changes.

use num_enum::IntoPrimitive;
use crate::transport::{Transport, Result};

/// Latency timer operating points, in milliseconds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, IntoPrimitive)]
#[repr(u8)]
pub enum LatencyLevel {
    Bulk = 2,
    Interactive = 1,
}

#[derive(Debug, Default)]
pub struct Latency {
    current: Option<u8>,
}

impl Latency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level last applied to the adapter, if any.
    pub fn current(&self) -> Option<u8> {
        self.current
    }

    /// Ensure the adapter's latency timer is `level`.
    ///
    /// The tracked level is only updated once the adapter has accepted it.
    pub fn set<T: Transport>(&mut self, transport: &mut T, level: LatencyLevel) -> Result<()> {
        let level: u8 = level.into();
        if self.current != Some(level) {
            log::debug!("Switching latency timer to {}ms", level);
            transport.set_latency(level)?;
            self.current = Some(level);
        }
        Ok(())
    }

    /// Forget the tracked level, so the next `set` always programs the adapter.
    pub fn forget(&mut self) {
        self.current = None;
    }
}
