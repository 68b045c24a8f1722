//! Adapter pin assignments and the mapping between the emulated data
//! register and the byte clocked out to the adapter.

use crate::port::DataRegister;

// To the adapter
pub const TCK: u8 = 0x01;
pub const TMS: u8 = 0x02;
pub const TDI: u8 = 0x10;
pub const LED: u8 = 0x20;
/// Requests that the adapter sample the input pins for this byte.
pub const RD: u8 = 0x40;

// From the adapter
pub const TDO: u8 = 0x01;

/// Map the TDI, TCK and TMS bits of `data` onto their adapter pins.
pub fn encode(data: DataRegister) -> u8 {
    let mut pins = 0;
    if data.tdi() {
        pins |= TDI;
    }
    if data.tck() {
        pins |= TCK;
    }
    if data.tms() {
        pins |= TMS;
    }
    pins
}

/// Recover the data register bits that are wired to adapter pins.
pub fn decode(pins: u8) -> DataRegister {
    DataRegister::default()
        .with_tdi(pins & TDI != 0)
        .with_tck(pins & TCK != 0)
        .with_tms(pins & TMS != 0)
}

/// Sample TDO from a byte read back from the adapter.
pub fn tdo(response: u8) -> bool {
    response & TDO != 0
}

/// Names of the output pins set in `pins`, for diagnostics.
pub fn describe(pins: u8) -> String {
    let names = [(TCK, "TCK"), (TDI, "TDI"), (TMS, "TMS"), (LED, "LED"), (RD, "RD")];
    let high: Vec<&str> = names.iter().filter(|(mask, _)| pins & mask != 0).map(|(_, n)| *n).collect();
    high.join(" ")
}
