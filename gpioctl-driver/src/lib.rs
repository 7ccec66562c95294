//! gpioctl driver
//! 
//! a bus master that speaks the controller's valid/ready/accept
//! handshake one tick at a time and exposes whole transactions, plus the
//! discrete read/write/direction helpers firmware uses on top of them

pub mod error;
pub use error::Error;

use gpioctl_core::regmap::{ self, Register };
use gpioctl_core::{ BusInputs, BusOutputs, Controller, Kind, Phase, PinInputs };
use gpioctl_sim::Time;

/// default bound on the ticks a single transaction may take
pub const DEFAULT_MAX_WAIT: Time = 64;

/// gpio channel selector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    One,
    Two,
}

impl TryFrom<u8> for Channel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            n => Err(Error::InvalidChannel(n)),
        }
    }
}

impl Channel {
    fn data(&self) -> Register {
        match self {
            Channel::One => Register::Data1,
            Channel::Two => Register::Data2,
        }
    }

    fn tri(&self) -> Register {
        match self {
            Channel::One => Register::Tri1,
            Channel::Two => Register::Tri2,
        }
    }

    fn input(&self) -> Register {
        match self {
            Channel::One => Register::In1,
            Channel::Two => Register::In2,
        }
    }
}

/// transaction-level bus master bound to one controller
pub struct Driver<'a> {
    ctl: &'a mut Controller,
    pins: PinInputs,
    max_wait: Time,
    last_latency: Time,
}

impl<'a> Driver<'a> {

    pub fn new(ctl: &'a mut Controller) -> Self {
        Self::new_with(ctl, DEFAULT_MAX_WAIT)
    }

    /// create a driver giving up on transactions after `max_wait` ticks
    pub fn new_with(ctl: &'a mut Controller, max_wait: Time) -> Self {
        Self {
            ctl,
            pins: PinInputs::default(),
            max_wait,
            last_latency: 0,
        }
    }

    pub fn controller(&self) -> &Controller {
        &*self.ctl
    }

    /// pin levels presented on every following tick
    pub fn set_pins(&mut self, pins: PinInputs) {
        self.pins = pins;
    }

    pub fn pins(&self) -> &PinInputs {
        &self.pins
    }

    /// ticks taken by the last completed transaction, accept included
    pub fn last_latency(&self) -> Time {
        self.last_latency
    }

    /// tick with no request on the bus
    pub fn idle(&mut self, cycles: Time) -> Result<(), Error> {
        for _ in 0..cycles {
            self.ctl.tick(&BusInputs::default(), &self.pins)?;
        }
        Ok(())
    }

    /// hold reset for `cycles` ticks
    pub fn reset(&mut self, cycles: Time) -> Result<(), Error> {
        for _ in 0..cycles {
            self.ctl.tick(&BusInputs::reset(), &self.pins)?;
        }
        Ok(())
    }

    /// absolute and controller-side address of a register offset. the
    /// interconnect strips the base, so the controller sees the offset only
    fn bus_address(&self, offset: u16) -> Result<(u64, u16), Error> {
        let base = self.ctl.config().base_address;
        let absolute = base.checked_add(offset as u64)
            .filter(|_| offset <= regmap::ADDRESS_MASK)
            .ok_or(Error::InvalidAddress { base, offset })?;
        Ok((absolute, offset))
    }

    /// write a register offset, returns once the write is acknowledged
    pub fn write(&mut self, offset: u16, value: u32) -> Result<(), Error> {
        let (absolute, address) = self.bus_address(offset)?;
        self.transact(BusInputs::write(address, value), Kind::Write, absolute)
            .map(|_| ())
    }

    /// read a register offset
    pub fn read(&mut self, offset: u16) -> Result<u32, Error> {
        let (absolute, address) = self.bus_address(offset)?;
        self.transact(BusInputs::read(address), Kind::Read, absolute)
            .map(|out| out.read_data)
    }

    /// accept whatever response the controller still owes until it is
    /// back in `Idle`; the timeout guard bounds how long that takes
    fn drain(&mut self) -> Result<(), Error> {
        let config = self.ctl.config();
        let bound = config.ack_latency.max(config.timeout_threshold) as Time + 2;
        let bus = BusInputs::default().accepting();

        for _ in 0..bound {
            if self.ctl.phase() == Phase::Idle {
                return Ok(());
            }
            if let Some(transaction) = self.ctl.in_flight() {
                log::debug!("draining {transaction}");
            }
            self.ctl.tick(&bus, &self.pins)?;
        }

        if self.ctl.phase() == Phase::Idle {
            Ok(())
        } else {
            Err(Error::Stuck(self.ctl.phase()))
        }
    }

    fn transact(&mut self, request: BusInputs, kind: Kind, absolute: u64) -> Result<BusOutputs, Error> {
        self.drain()?;

        let start = self.ctl.now();
        let mut bus = request.accepting();
        let mut accepted = false;

        while self.ctl.now() - start < self.max_wait {
            let out = self.ctl.tick(&bus, &self.pins)?;
            if out.write_address_ready || out.read_address_ready {
                accepted = true;
                bus = BusInputs::default().accepting();
            }
            // a response only counts once this request has been latched
            let responded = accepted && match kind {
                Kind::Write => out.write_ack_valid,
                Kind::Read => out.read_data_valid,
            };
            if responded {
                // accept is already up; one more edge hands the response over
                self.ctl.tick(&bus, &self.pins)?;
                self.last_latency = self.ctl.now() - start;
                log::trace!("{kind:?} @ {absolute:#x} done in {} ticks", self.last_latency);
                return Ok(out);
            }
        }

        let waited = self.ctl.now() - start;
        log::warn!("{kind:?} @ {absolute:#x}: no response after {waited} ticks");
        // leave the controller idle for whoever issues the next request
        self.drain()?;
        Err(Error::NoResponse { kind, address: absolute, waited })
    }

    /// set the direction of a channel's pins, set bit = input
    pub fn set_data_direction(&mut self, channel: u8, mask: u32) -> Result<(), Error> {
        let channel = Channel::try_from(channel)?;
        self.write(channel.tri().offset(), mask)
    }

    pub fn data_direction(&mut self, channel: u8) -> Result<u32, Error> {
        let channel = Channel::try_from(channel)?;
        self.read(channel.tri().offset())
    }

    /// synchronized level of a channel's pins
    pub fn discrete_read(&mut self, channel: u8) -> Result<u32, Error> {
        let channel = Channel::try_from(channel)?;
        self.read(channel.input().offset())
    }

    /// write a channel's output register
    pub fn discrete_write(&mut self, channel: u8, value: u32) -> Result<(), Error> {
        let channel = Channel::try_from(channel)?;
        self.write(channel.data().offset(), value)
    }

    /// set the masked output bits, leaving the others untouched
    pub fn discrete_set(&mut self, channel: u8, mask: u32) -> Result<(), Error> {
        let channel = Channel::try_from(channel)?;
        let current = self.read(channel.data().offset())?;
        self.write(channel.data().offset(), current | mask)
    }

    /// clear the masked output bits, leaving the others untouched
    pub fn discrete_clear(&mut self, channel: u8, mask: u32) -> Result<(), Error> {
        let channel = Channel::try_from(channel)?;
        let current = self.read(channel.data().offset())?;
        self.write(channel.data().offset(), current & !mask)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gpioctl_core::GpioConfig;

    #[test]
    fn test_write_read() {
        let mut ctl = Controller::new();
        let mut drv = Driver::new(&mut ctl);
        drv.write(regmap::DATA1, 0x2a).expect("write failed");
        assert_eq!(drv.last_latency(), 4);
        assert_eq!(drv.read(regmap::DATA1).expect("read failed"), 0x2a);
    }

    #[test]
    fn test_invalid_channel() {
        let mut ctl = Controller::new();
        let mut drv = Driver::new(&mut ctl);
        let err = drv.discrete_read(3).unwrap_err();
        assert!(matches!(err, Error::InvalidChannel(3)), "{err}");
        assert_eq!(drv.controller().now(), 0);
    }

    #[test]
    fn test_invalid_offset() {
        let mut ctl = Controller::new();
        let mut drv = Driver::new(&mut ctl);
        let err = drv.read(0x200).unwrap_err();
        assert!(matches!(err, Error::InvalidAddress { base: 0x4000_0000, offset: 0x200 }), "{err}");
        assert_eq!(drv.controller().now(), 0);
    }

    #[test]
    fn test_gives_up_when_slower_than_max_wait() {
        let config = GpioConfig { timeout_threshold: 40, ..GpioConfig::default() };
        let mut ctl = Controller::new_with(config).expect("valid config");
        let mut drv = Driver::new_with(&mut ctl, 8);
        let err = drv.read(0x100).unwrap_err();
        assert!(matches!(err, Error::NoResponse { kind: Kind::Read, waited: 8, .. }), "{err}");
    }
}
