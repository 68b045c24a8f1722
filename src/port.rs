//! Register state of the emulated parallel port.
//!
//! The port has a data register, written by the host to drive the JTAG
//! lines, and a status register, read by the host to sample them. Some
//! status bits are not stored at all but follow data register bits, the
//! way a real cable wires its sense and loopback lines.

macro_rules! bit_accessors {
    ($($get:ident, $set:ident, $bit:expr;)*) => {
        $(
            pub fn $get(&self) -> bool {
                self.0 & (1 << $bit) != 0
            }

            pub fn $set(self, state: bool) -> Self {
                if state {
                    Self(self.0 | (1 << $bit))
                } else {
                    Self(self.0 & !(1 << $bit))
                }
            }
        )*
    };
}

/// Data register: TDI, TCK, TMS, CTRL and PROG in bits 0 to 4.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DataRegister(u8);

impl DataRegister {
    /// Bits that are wired through to adapter pins.
    pub const WIRED: u8 = 0b0000_0111;

    pub fn new(value: u8) -> Self {
        DataRegister(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    bit_accessors! {
        tdi, with_tdi, 0;
        tck, with_tck, 1;
        tms, with_tms, 2;
        ctrl, with_ctrl, 3;
        prog, with_prog, 4;
        d6, with_d6, 6;
    }
}

/// Status register: SENSE and TDO in bits 3 and 4, loopback lines in 5 and 7.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusRegister(u8);

impl StatusRegister {
    pub fn new(value: u8) -> Self {
        StatusRegister(value)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    bit_accessors! {
        sense, with_sense, 3;
        tdo, with_tdo, 4;
        b5, with_b5, 5;
        b7, with_b7, 7;
    }
}

/// Recompute the status bits that follow the data register.
///
/// D6 is looped back to PE (bit 5) and, inverted, to BUSY (bit 7). SENSE and
/// TDO both read as the inverse of PROG, which emulates the cable's VREF line.
pub fn derive_status(data: DataRegister, status: StatusRegister) -> StatusRegister {
    status
        .with_b7(!data.d6())
        .with_b5(data.d6())
        .with_sense(!data.prog())
        .with_tdo(!data.prog())
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ParallelPort {
    data: DataRegister,
    status: StatusRegister,
}

impl ParallelPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.data = DataRegister::default();
        self.status = StatusRegister::default();
    }

    pub fn derive_status(&mut self) {
        self.status = derive_status(self.data, self.status);
    }

    pub fn data(&self) -> DataRegister {
        self.data
    }

    pub fn status(&self) -> StatusRegister {
        self.status
    }

    pub fn write_data(&mut self, value: u8) {
        self.data = DataRegister(value);
    }

    /// Store `value` verbatim; derived bits are restored by the next
    /// `derive_status`.
    pub fn write_status(&mut self, value: u8) {
        self.status = StatusRegister(value);
    }

    /// Latch the TDO level sampled from the adapter.
    pub fn set_tdo(&mut self, state: bool) {
        self.status = self.status.with_tdo(state);
    }
}
