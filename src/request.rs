//! Register access requests, as issued by parallel port client code.

use std::convert::TryFrom;
use num_enum::TryFromPrimitive;

/// Registers of the emulated port, by offset from its base address.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u32)]
pub enum Register {
    Data = 0,
    Status = 1,
}

impl Register {
    /// Decode a raw I/O address relative to the port's `base` address.
    pub fn decode(address: u32, base: u32) -> Option<Self> {
        address.checked_sub(base).and_then(|offset| Self::try_from(offset).ok())
    }
}

/// Transfer direction, using the legacy byte read/write command codes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, TryFromPrimitive)]
#[repr(u32)]
pub enum Direction {
    Read = 10,
    Write = 13,
}

/// One register access in a batch.
///
/// For reads, `data` is overwritten with the register value. Writes leave it
/// alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Transfer {
    pub address: u32,
    pub direction: Direction,
    pub data: u8,
}

impl Transfer {
    pub fn read(address: u32) -> Self {
        Transfer { address, direction: Direction::Read, data: 0 }
    }

    pub fn write(address: u32, data: u8) -> Self {
        Transfer { address, direction: Direction::Write, data }
    }

    /// Build a transfer from a raw command code, if the code is recognised.
    pub fn from_raw(address: u32, command: u32, data: u8) -> Option<Self> {
        let direction = Direction::try_from(command).ok()?;
        Some(Transfer { address, direction, data })
    }
}
