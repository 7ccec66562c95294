//! bus and pad signals
//! 
//! semantic (not wire-exact) view of the controller's ports, sampled or
//! produced once per tick

use gpioctl_sim::Time;
use gpioctl_sim::channel::Digital;

/// response code carried with every write acknowledgment and read
/// response; the controller never reports anything but OKAY
pub const RESP_OKAY: u8 = 0b00;

/// master-driven signals sampled at a rising edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusInputs {
    pub reset: bool,
    pub write_address: u16,
    pub write_address_valid: bool,
    pub write_data: u32,
    pub write_data_valid: bool,
    pub write_ack_accept: bool,
    pub read_address: u16,
    pub read_address_valid: bool,
    pub read_data_accept: bool,
}

impl BusInputs {
    /// only reset asserted
    pub fn reset() -> Self {
        Self { reset: true, ..Self::default() }
    }

    /// a write request with both valid strobes raised
    pub fn write(address: u16, data: u32) -> Self {
        Self {
            write_address: address,
            write_address_valid: true,
            write_data: data,
            write_data_valid: true,
            ..Self::default()
        }
    }

    /// a read request
    pub fn read(address: u16) -> Self {
        Self {
            read_address: address,
            read_address_valid: true,
            ..Self::default()
        }
    }

    /// raise both response-accept signals
    pub fn accepting(mut self) -> Self {
        self.write_ack_accept = true;
        self.read_data_accept = true;
        self
    }
}

/// controller-driven signals after a rising edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusOutputs {
    pub write_address_ready: bool,
    pub write_data_ready: bool,
    pub write_ack_valid: bool,
    pub write_resp: u8,
    pub read_address_ready: bool,
    pub read_data: u32,
    pub read_data_valid: bool,
    pub read_resp: u8,
}

/// raw, asynchronous pin levels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PinInputs {
    pub gpio: u32,
    pub gpio2: u32,
}

impl PinInputs {
    pub fn new_with(gpio: u32, gpio2: u32) -> Self {
        Self { gpio, gpio2 }
    }
}

/// output driver state of one channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelPads {
    /// value presented to the output drivers
    pub output: u32,
    /// driver enables, set bit = high impedance
    pub tri: u32,
    pub width: u32,
}

impl ChannelPads {
    /// level driven on a pad, None while it is an input
    pub fn driven(&self, bit: u32) -> Option<bool> {
        if bit >= self.width || (self.tri >> bit) & 1 != 0 {
            None
        } else {
            Some((self.output >> bit) & 1 != 0)
        }
    }

    /// mask of pads that are actively driven
    pub fn drive_mask(&self) -> u32 {
        !self.tri & crate::config::width_mask(self.width)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pads {
    pub gpio: ChannelPads,
    pub gpio2: ChannelPads,
}

/// change of a single pad's driver state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadEvent {
    /// the pad is driven to a level
    Driven { channel: u8, bit: u32, level: Digital },
    /// the pad stopped driving and is high impedance
    Released { channel: u8, bit: u32, time: Time },
}

impl PadEvent {
    /// events for every pad whose driven level differs between two states
    pub fn diff(channel: u8, before: &ChannelPads, after: &ChannelPads, time: Time) -> Vec<PadEvent> {
        (0..after.width)
            .filter_map(|bit| {
                let now = after.driven(bit);
                if before.driven(bit) == now {
                    return None;
                }
                Some(match now {
                    Some(level) => PadEvent::Driven { channel, bit, level: Digital::from_level(level, time) },
                    None => PadEvent::Released { channel, bit, time },
                })
            })
            .collect()
    }
}
