// Copyright 2026 jtagkey contributors
// Licensed under the Apache-2.0 and MIT licenses.

//! jtagkey
//!
//! Parallel port JTAG cable emulation on FTDI adapters in synchronous
//! bitbang mode. Client code issues data and status register accesses as if
//! a parallel port cable were attached; the `engine` turns them into pin
//! bytes for the adapter and feeds TDO back into the status register.

pub mod config;
pub mod transport;
pub mod latency;
pub mod port;
pub mod pins;
pub mod request;
pub mod monitor;
pub mod engine;
pub mod session;

#[cfg(feature = "ftd2xx")]
pub mod ftd2xx;

#[cfg(test)]
mod mock;

pub use config::{DeviceConfig, DeviceTable, Interface};
pub use engine::{BatchError, Engine, Error, Result};
pub use latency::LatencyLevel;
pub use monitor::{Event, LogMonitor, Monitor};
pub use request::{Direction, Register, Transfer};
pub use session::{Session, SharedSession};
pub use transport::{Settings, Transport, UnknownRegister};

#[cfg(feature = "ftd2xx")]
pub use crate::ftd2xx::Ftd2xxTransport;
