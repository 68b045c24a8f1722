//! Optional runtime diagnostics for the transfer engine.
//!
//! A `Monitor` installed on the engine is called for every register access
//! and every flush. `LogMonitor` forwards events to the `log` crate at trace
//! level; without a monitor the engine only emits its own terse traces.

use crate::pins;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event<'a> {
    /// Data register read, with the returned value.
    DataRead(u8),
    /// Status register read, with the returned value.
    StatusRead(u8),
    /// Data register write, with the adapter pin byte queued for it.
    StoreWrite { data: u8, pins: u8 },
    /// Output buffer sent to the adapter.
    Flush { bytes: &'a [u8], read: bool },
    /// Byte read back from the adapter.
    Response(u8),
}

pub trait Monitor: Send {
    fn event(&mut self, event: &Event<'_>);
}

#[derive(Copy, Clone, Debug, Default)]
pub struct LogMonitor;

impl Monitor for LogMonitor {
    fn event(&mut self, event: &Event<'_>) {
        match event {
            Event::DataRead(value) => log::trace!("< data-read {:02x}", value),
            Event::StatusRead(value) => log::trace!("< status-read {:02x}", value),
            Event::StoreWrite { data, pins } => {
                log::trace!("> store-write {:02x} of {:02x}", pins, data);
                log::trace!("Pins high: {}", pins::describe(*pins));
            },
            Event::Flush { bytes, read } => {
                log::trace!("--> write {}{}", bytes.len(), if *read { ", read 1" } else { "" });
            },
            Event::Response(byte) => {
                log::trace!("<-- read {:02x}{}", byte, if pins::tdo(*byte) { " (TDO)" } else { "" });
            },
        }
    }
}
