//! Per-device adapter configuration, looked up by a numeric device index.

use std::convert::TryFrom;
use num_enum::TryFromPrimitive;

/// Adapter interface on multi-channel FTDI parts.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u16)]
pub enum Interface {
    Any = 0,
    A = 1,
    B = 2,
    C = 3,
    D = 4,
}

impl Interface {
    pub fn try_from_raw(raw: u16) -> Option<Self> {
        Self::try_from(raw).ok()
    }

    /// Zero-based channel index, with `Any` selecting the first channel.
    pub fn index(&self) -> usize {
        match self {
            Interface::Any | Interface::A => 0,
            Interface::B => 1,
            Interface::C => 2,
            Interface::D => 3,
        }
    }
}

/// USB identity of one configured adapter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DeviceConfig {
    pub vid: u16,
    pub pid: u16,
    pub interface: Interface,
}

impl DeviceConfig {
    pub fn new(vid: u16, pid: u16, interface: Interface) -> Self {
        DeviceConfig { vid, pid, interface }
    }
}

impl std::fmt::Display for DeviceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:04x} interface {:?}", self.vid, self.pid, self.interface)
    }
}

/// Source of device configuration.
pub trait DeviceTable {
    fn lookup(&self, index: usize) -> Option<DeviceConfig>;
}

impl DeviceTable for [DeviceConfig] {
    fn lookup(&self, index: usize) -> Option<DeviceConfig> {
        self.get(index).copied()
    }
}

impl DeviceTable for Vec<DeviceConfig> {
    fn lookup(&self, index: usize) -> Option<DeviceConfig> {
        self.as_slice().lookup(index)
    }
}
