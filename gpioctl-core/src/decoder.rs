//! address decoder
//! 
//! turns a transaction address into a chip-select, a one-hot
//! write-enable and the composed 32-bit read word

use bitflags::bitflags;

use crate::regfile::RegisterFile;
use crate::regmap::{ self, Access, Register };

bitflags! {
    /// per-register write-enable, at most one bit is ever set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WriteEnable: u8 {
        const DATA1 = 0b0001;
        const TRI1  = 0b0010;
        const DATA2 = 0b0100;
        const TRI2  = 0b1000;
    }
}

impl WriteEnable {
    /// register targeted by a one-hot enable
    pub fn register(&self) -> Option<Register> {
        const ONE_HOT: [(WriteEnable, Register); 4] = [
            (WriteEnable::DATA1, Register::Data1),
            (WriteEnable::TRI1, Register::Tri1),
            (WriteEnable::DATA2, Register::Data2),
            (WriteEnable::TRI2, Register::Tri2),
        ];
        ONE_HOT.iter()
            .find(|(enable, _)| enable == self)
            .map(|(_, register)| *register)
    }
}

/// result of decoding a transaction address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// a defined register inside the chip-select window
    Register(Register),
    /// an undefined select value inside the window
    Reserved(u8),
    /// outside the window: nothing answers
    Unmapped(u16),
}

/// decode a bus address; only the low `ADDRESS_BITS` participate and
/// bits [1:0] are ignored
pub fn decode(address: u16) -> Selection {
    let address = address & regmap::ADDRESS_MASK;
    if address > regmap::WINDOW_END {
        return Selection::Unmapped(address);
    }
    let select = ((address >> 2) & 0x7) as u8;
    match Register::from_select(select) {
        Some(register) => Selection::Register(register),
        None => Selection::Reserved(select),
    }
}

impl Selection {

    /// true when the register side will acknowledge the access
    pub fn chip_select(&self) -> bool {
        !matches!(self, Selection::Unmapped(_))
    }

    /// one-hot write-enable; empty for read-only, reserved and
    /// unmapped selections
    pub fn write_enable(&self) -> WriteEnable {
        match self {
            Selection::Register(register) if register.access().contains(Access::W) => {
                match register {
                    Register::Data1 => WriteEnable::DATA1,
                    Register::Tri1 => WriteEnable::TRI1,
                    Register::Data2 => WriteEnable::DATA2,
                    Register::Tri2 => WriteEnable::TRI2,
                    _ => WriteEnable::empty(),
                }
            }
            _ => WriteEnable::empty(),
        }
    }

    /// compose the read word; undefined bits always read zero
    pub fn read_data(&self, regs: &RegisterFile) -> u32 {
        match self {
            Selection::Register(register) => regs.read(*register) & regs.mask(*register),
            _ => 0,
        }
    }
}

/// commit a write through its enable; returns the register written
pub fn apply(enable: WriteEnable, value: u32, regs: &mut RegisterFile) -> Option<Register> {
    let register = enable.register()?;
    regs.commit(register, value).then_some(register)
}
