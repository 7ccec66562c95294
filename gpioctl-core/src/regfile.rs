//! register file
//! 
//! current value of every addressable register of both channels.
//! DATA/TRI change only through `commit`, driven by the handshake
//! state machine's write-enable pulse; the input snapshots change only
//! through `capture`, driven by the synchronizers

use crate::config::GpioConfig;
use crate::regmap::Register;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterFile {
    mask1: u32,
    mask2: u32,
    data1: u32,
    tri1: u32,
    data2: u32,
    tri2: u32,
    in1: u32,
    in2: u32,
}

impl RegisterFile {

    /// create a register file holding the configured reset values
    pub fn new_with(config: &GpioConfig) -> Self {
        let mask1 = config.mask();
        let mask2 = config.mask2();
        Self {
            mask1,
            mask2,
            data1: config.dout_default & mask1,
            tri1: config.tri_default & mask1,
            data2: config.dout_default2 & mask2,
            tri2: config.tri_default2 & mask2,
            in1: 0,
            in2: 0,
        }
    }

    /// width mask of a register
    pub fn mask(&self, register: Register) -> u32 {
        match register.channel() {
            1 => self.mask1,
            _ => self.mask2,
        }
    }

    /// value seen on the read path; bits above the register width are zero
    pub fn read(&self, register: Register) -> u32 {
        match register {
            Register::Data1 => self.data1,
            Register::Tri1 => self.tri1,
            Register::Data2 => self.data2,
            Register::Tri2 => self.tri2,
            Register::In1 => self.in1,
            Register::In2 => self.in2,
        }
    }

    /// apply a write-enable pulse; only the low bits of `value` are kept.
    /// returns false for read-only registers, which are left untouched
    pub fn commit(&mut self, register: Register, value: u32) -> bool {
        let value = value & self.mask(register);
        let slot = match register {
            Register::Data1 => &mut self.data1,
            Register::Tri1 => &mut self.tri1,
            Register::Data2 => &mut self.data2,
            Register::Tri2 => &mut self.tri2,
            Register::In1 | Register::In2 => return false,
        };
        log::trace!("commit {register} <- {value:#x}");
        *slot = value;
        true
    }

    /// load the synchronized input values into the snapshot registers
    pub fn capture(&mut self, in1: u32, in2: u32) {
        self.in1 = in1 & self.mask1;
        self.in2 = in2 & self.mask2;
    }

    pub fn data1(&self) -> u32 { self.data1 }
    pub fn tri1(&self) -> u32 { self.tri1 }
    pub fn data2(&self) -> u32 { self.data2 }
    pub fn tri2(&self) -> u32 { self.tri2 }
    pub fn in1(&self) -> u32 { self.in1 }
    pub fn in2(&self) -> u32 { self.in2 }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reset_values() {
        let regs = RegisterFile::new_with(&GpioConfig::default());
        assert_eq!(regs.read(Register::Data1), 0);
        assert_eq!(regs.read(Register::Tri1), 0x7f);
        assert_eq!(regs.read(Register::Data2), 0);
        assert_eq!(regs.read(Register::Tri2), 0x1);
        assert_eq!(regs.read(Register::In1), 0);
    }

    #[test]
    fn test_commit_masks_to_width() {
        let mut regs = RegisterFile::new_with(&GpioConfig::default());
        assert!(regs.commit(Register::Data1, 0xffff_ffaa));
        assert_eq!(regs.read(Register::Data1), 0x2a);
        assert!(regs.commit(Register::Tri2, 0xfffe));
        assert_eq!(regs.read(Register::Tri2), 0);

        assert!(!regs.commit(Register::In1, 0x55));
        assert_eq!(regs.read(Register::In1), 0);
    }

    #[test]
    fn test_data_kept_while_input() {
        // the stored value survives a direction change untouched
        let mut regs = RegisterFile::new_with(&GpioConfig::default());
        regs.commit(Register::Data1, 0x15);
        assert_eq!(regs.tri1(), 0x7f);
        regs.commit(Register::Tri1, 0);
        assert_eq!(regs.data1(), 0x15);
    }
}
