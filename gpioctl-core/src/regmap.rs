//! register map
//! 
//! fixed, word-addressed register layout of the controller.
//! offsets are relative to the peripheral base; the 3-bit register
//! select is address bits [4:2]

use bitflags::bitflags;

/// width of the transaction address seen by the controller
pub const ADDRESS_BITS: u32 = 9;
pub const ADDRESS_MASK: u16 = (1u16 << ADDRESS_BITS) - 1;

/// chip-select window: the last word the register decoder answers for
pub const WINDOW_END: u16 = 0x1f;

pub const DATA1: u16 = 0x00;
pub const TRI1: u16 = 0x04;
pub const DATA2: u16 = 0x08;
pub const TRI2: u16 = 0x0c;
pub const IN1: u16 = 0x10;
pub const IN2: u16 = 0x14;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u8 {
        const R = 0b0100;    // read
        const W = 0b0010;    // write

        const RW = Self::R.bits() | Self::W.bits();
    }
}

/// addressable registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// channel 1 output value
    Data1,
    /// channel 1 direction, set bit = input
    Tri1,
    /// channel 2 output value
    Data2,
    /// channel 2 direction, set bit = input
    Tri2,
    /// synchronized channel 1 input snapshot
    In1,
    /// synchronized channel 2 input snapshot
    In2,
}

impl Register {
    pub const ALL: [Register; 6] = [
        Register::Data1,
        Register::Tri1,
        Register::Data2,
        Register::Tri2,
        Register::In1,
        Register::In2,
    ];

    /// look up the register addressed by a 3-bit select value
    pub fn from_select(select: u8) -> Option<Self> {
        match select {
            0 => Some(Register::Data1),
            1 => Some(Register::Tri1),
            2 => Some(Register::Data2),
            3 => Some(Register::Tri2),
            4 => Some(Register::In1),
            5 => Some(Register::In2),
            _ => None,
        }
    }

    /// byte offset from the peripheral base
    pub fn offset(&self) -> u16 {
        match self {
            Register::Data1 => DATA1,
            Register::Tri1 => TRI1,
            Register::Data2 => DATA2,
            Register::Tri2 => TRI2,
            Register::In1 => IN1,
            Register::In2 => IN2,
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Register::In1 | Register::In2 => Access::R,
            _ => Access::RW,
        }
    }

    /// channel (1 or 2) the register belongs to
    pub fn channel(&self) -> u8 {
        match self {
            Register::Data1 | Register::Tri1 | Register::In1 => 1,
            Register::Data2 | Register::Tri2 | Register::In2 => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Register::Data1 => "DATA1",
            Register::Tri1 => "TRI1",
            Register::Data2 => "DATA2",
            Register::Tri2 => "TRI2",
            Register::In1 => "IN1",
            Register::In2 => "IN2",
        }
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{:#04x}", self.name(), self.offset())
    }
}
