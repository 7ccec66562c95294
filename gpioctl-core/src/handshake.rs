//! bus handshake state machine
//! 
//! sequences one transaction at a time through address latch, register
//! access and response, against the address decoder and the timeout guard.
//! 
//! ```text
//!   Idle --valid--> AddressPhase --> AccessPhase --ack | timeout--> BResponsePending --accept--> Idle
//!                                                                  RResponsePending --accept--> Idle
//! ```

use gpioctl_sim::Time;

use crate::config::GpioConfig;
use crate::decoder::{ self, Selection };
use crate::regfile::RegisterFile;
use crate::regmap::{ self, Register };
use crate::signals::{ BusInputs, BusOutputs, RESP_OKAY };
use crate::timeout::TimeoutGuard;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Read,
    Write,
}

/// a request latched from the bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub kind: Kind,
    /// address as seen by the controller (low 9 bits)
    pub address: u16,
    /// write payload, zero for reads
    pub write_data: u32,
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            Kind::Read => write!(f, "read @ {:#05x}", self.address),
            Kind::Write => write!(f, "write @ {:#05x} <- {:#x}", self.address, self.write_data),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    AddressPhase,
    AccessPhase,
    BResponsePending,
    RResponsePending,
}

/// a transaction the master has taken the response of
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub transaction: Transaction,
    /// register written by the write-enable pulse, if any
    pub written: Option<Register>,
    /// value returned to the master for reads
    pub read_data: Option<u32>,
    /// the timeout guard forced the response
    pub timed_out: bool,
    /// tick the address was latched on
    pub issued: Time,
    /// tick the response became valid
    pub responded: Time,
    /// tick the master accepted the response
    pub completed: Time,
}

#[derive(Clone, Debug)]
struct Session {
    transaction: Transaction,
    selection: Selection,
    issued: Time,
    access_cycles: u32,
    written: Option<Register>,
    timed_out: bool,
    responded: Time,
}

/// what happened on one edge
#[derive(Clone, Debug, Default)]
pub struct Step {
    /// transaction latched on this edge; drives the ready pulse
    pub accepted: Option<Transaction>,
    /// register updated by this edge's write-enable pulse
    pub written: Option<Register>,
    /// the response became valid on this edge
    pub responded: bool,
    pub completed: Option<Completion>,
}

#[derive(Clone, Debug)]
pub struct Handshake {
    phase: Phase,
    session: Option<Session>,
    timeout: TimeoutGuard,
    ack_latency: u32,
    read_data: u32,
}

impl Handshake {

    pub fn new_with(config: &GpioConfig) -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
            timeout: TimeoutGuard::new_with(config.timeout_threshold),
            ack_latency: config.ack_latency,
            read_data: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// the transaction in flight, if any
    pub fn transaction(&self) -> Option<&Transaction> {
        self.session.as_ref().map(|s| &s.transaction)
    }

    pub fn timeout(&self) -> &TimeoutGuard {
        &self.timeout
    }

    /// the read-data register
    pub fn read_data(&self) -> u32 {
        self.read_data
    }

    /// synchronous reset; returns the transaction abandoned in flight
    pub fn reset(&mut self) -> Option<Transaction> {
        self.phase = Phase::Idle;
        self.timeout.clear();
        self.read_data = 0;
        self.session.take().map(|s| s.transaction)
    }

    /// advance one rising edge. `regs` is read with its pre-edge contents
    /// and receives the write-enable pulse of this edge, if any
    pub fn step(&mut self, bus: &BusInputs, regs: &mut RegisterFile, now: Time) -> Step {
        let mut step = Step::default();

        match self.phase {
            Phase::Idle => {
                // write wins a tie; it needs both address and data
                let transaction = if bus.write_address_valid && bus.write_data_valid {
                    Some(Transaction {
                        kind: Kind::Write,
                        address: bus.write_address & regmap::ADDRESS_MASK,
                        write_data: bus.write_data,
                    })
                } else if bus.read_address_valid {
                    Some(Transaction {
                        kind: Kind::Read,
                        address: bus.read_address & regmap::ADDRESS_MASK,
                        write_data: 0,
                    })
                } else {
                    None
                };

                if let Some(transaction) = transaction {
                    log::debug!("tick {now}: accepted {transaction}");
                    self.session = Some(Session {
                        transaction,
                        selection: decoder::decode(transaction.address),
                        issued: now,
                        access_cycles: 0,
                        written: None,
                        timed_out: false,
                        responded: now,
                    });
                    self.phase = Phase::AddressPhase;
                    step.accepted = Some(transaction);
                }
            }
            Phase::AddressPhase => {
                self.phase = Phase::AccessPhase;
            }
            Phase::AccessPhase => {
                let Some(session) = self.session.as_mut() else {
                    // unreachable by construction; recover rather than stall
                    self.phase = Phase::Idle;
                    return step;
                };
                session.access_cycles += 1;
                let acked = session.selection.chip_select()
                    && session.access_cycles >= self.ack_latency;

                let respond = if acked {
                    if session.transaction.kind == Kind::Write {
                        let enable = session.selection.write_enable();
                        session.written = decoder::apply(enable, session.transaction.write_data, regs);
                        step.written = session.written;
                    }
                    true
                } else if self.timeout.step() {
                    log::warn!(
                        "tick {now}: {} not acknowledged after {} ticks, forcing response",
                        session.transaction,
                        self.timeout.threshold(),
                    );
                    session.timed_out = true;
                    true
                } else {
                    false
                };

                if respond {
                    if session.transaction.kind == Kind::Read {
                        self.read_data = session.selection.read_data(regs);
                    }
                    session.responded = now;
                    self.timeout.clear();
                    self.phase = match session.transaction.kind {
                        Kind::Write => Phase::BResponsePending,
                        Kind::Read => Phase::RResponsePending,
                    };
                    step.responded = true;
                }
            }
            Phase::BResponsePending if bus.write_ack_accept => {
                step.completed = self.complete(now);
            }
            Phase::RResponsePending if bus.read_data_accept => {
                step.completed = self.complete(now);
            }
            Phase::BResponsePending | Phase::RResponsePending => (),
        }

        if log::log_enabled!(log::Level::Trace) {
            log::trace!("tick {now}: phase {:?}, timeout {}", self.phase, self.timeout.count());
        }

        step
    }

    fn complete(&mut self, now: Time) -> Option<Completion> {
        self.phase = Phase::Idle;
        let session = self.session.take()?;
        let completion = Completion {
            transaction: session.transaction,
            written: session.written,
            read_data: match session.transaction.kind {
                Kind::Read => Some(self.read_data),
                Kind::Write => None,
            },
            timed_out: session.timed_out,
            issued: session.issued,
            responded: session.responded,
            completed: now,
        };
        log::debug!("tick {now}: completed {}", completion.transaction);
        Some(completion)
    }

    /// registered outputs after the edge described by `step`
    pub fn outputs(&self, step: &Step) -> BusOutputs {
        let accepted = step.accepted.map(|t| t.kind);
        BusOutputs {
            write_address_ready: accepted == Some(Kind::Write),
            write_data_ready: accepted == Some(Kind::Write),
            write_ack_valid: self.phase == Phase::BResponsePending,
            write_resp: RESP_OKAY,
            read_address_ready: accepted == Some(Kind::Read),
            read_data: self.read_data,
            read_data_valid: self.phase == Phase::RResponsePending,
            read_resp: RESP_OKAY,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn setup(config: &GpioConfig) -> (Handshake, RegisterFile) {
        (Handshake::new_with(config), RegisterFile::new_with(config))
    }

    #[test]
    fn test_write_sequence() {
        let config = GpioConfig::default();
        let (mut hs, mut regs) = setup(&config);

        let step = hs.step(&BusInputs::write(0x00, 0x2a), &mut regs, 1);
        assert_eq!(step.accepted.map(|t| t.kind), Some(Kind::Write));
        assert!(hs.outputs(&step).write_address_ready);
        assert!(hs.outputs(&step).write_data_ready);
        assert_eq!(hs.phase(), Phase::AddressPhase);

        let step = hs.step(&BusInputs::default(), &mut regs, 2);
        assert_eq!(hs.phase(), Phase::AccessPhase);
        assert!(!hs.outputs(&step).write_address_ready);
        assert_eq!(regs.data1(), 0);

        let step = hs.step(&BusInputs::default(), &mut regs, 3);
        assert_eq!(step.written, Some(Register::Data1));
        assert_eq!(regs.data1(), 0x2a);
        assert!(hs.outputs(&step).write_ack_valid);

        // response held until the master accepts it
        let step = hs.step(&BusInputs::default(), &mut regs, 4);
        assert!(step.completed.is_none());
        assert_eq!(hs.phase(), Phase::BResponsePending);

        let step = hs.step(&BusInputs::default().accepting(), &mut regs, 5);
        let completion = step.completed.expect("write should complete");
        assert_eq!(completion.issued, 1);
        assert_eq!(completion.responded, 3);
        assert_eq!(completion.completed, 5);
        assert!(!completion.timed_out);
        assert_eq!(hs.phase(), Phase::Idle);
    }

    #[test]
    fn test_write_takes_priority() {
        let config = GpioConfig::default();
        let (mut hs, mut regs) = setup(&config);

        let mut bus = BusInputs::write(0x04, 0);
        bus.read_address = 0x10;
        bus.read_address_valid = true;

        let step = hs.step(&bus, &mut regs, 1);
        let outputs = hs.outputs(&step);
        assert!(outputs.write_address_ready);
        assert!(!outputs.read_address_ready);
        assert_eq!(hs.transaction().map(|t| t.kind), Some(Kind::Write));
    }

    #[test]
    fn test_half_write_is_not_started() {
        let config = GpioConfig::default();
        let (mut hs, mut regs) = setup(&config);

        // data without address, then address without data
        let mut bus = BusInputs::write(0x00, 0x11);
        bus.write_address_valid = false;
        hs.step(&bus, &mut regs, 1);
        assert_eq!(hs.phase(), Phase::Idle);

        let mut bus = BusInputs::write(0x00, 0x11);
        bus.write_data_valid = false;
        hs.step(&bus, &mut regs, 2);
        assert_eq!(hs.phase(), Phase::Idle);

        // a read alongside a half write proceeds
        bus.read_address_valid = true;
        bus.read_address = 0x04;
        let step = hs.step(&bus, &mut regs, 3);
        assert_eq!(step.accepted.map(|t| t.kind), Some(Kind::Read));
        assert_eq!(regs, RegisterFile::new_with(&config));
    }

    #[test]
    fn test_unmapped_read_times_out() {
        let config = GpioConfig { timeout_threshold: 5, ..GpioConfig::default() };
        let (mut hs, mut regs) = setup(&config);

        hs.step(&BusInputs::read(0x100), &mut regs, 1);
        hs.step(&BusInputs::default(), &mut regs, 2);
        for now in 3..7 {
            let step = hs.step(&BusInputs::default(), &mut regs, now);
            assert!(!step.responded, "tick {now}");
            assert_eq!(hs.timeout().count(), (now - 2) as u32);
        }
        let step = hs.step(&BusInputs::default(), &mut regs, 7);
        assert!(step.responded);
        assert_eq!(hs.phase(), Phase::RResponsePending);
        assert_eq!(hs.timeout().count(), 0);
        assert_eq!(hs.outputs(&step).read_data, 0);

        let step = hs.step(&BusInputs::default().accepting(), &mut regs, 8);
        let completion = step.completed.expect("read should complete");
        assert!(completion.timed_out);
        assert_eq!(completion.read_data, Some(0));
    }

    #[test]
    fn test_slow_register_write_times_out_uncommitted() {
        let config = GpioConfig { timeout_threshold: 2, ack_latency: 4, ..GpioConfig::default() };
        let (mut hs, mut regs) = setup(&config);

        hs.step(&BusInputs::write(0x04, 0), &mut regs, 1);
        hs.step(&BusInputs::default(), &mut regs, 2);
        hs.step(&BusInputs::default(), &mut regs, 3);
        let step = hs.step(&BusInputs::default(), &mut regs, 4);
        assert!(step.responded);
        assert_eq!(step.written, None);
        assert_eq!(regs.tri1(), 0x7f);
    }

    #[test]
    fn test_reset_abandons_transaction() {
        let config = GpioConfig::default();
        let (mut hs, mut regs) = setup(&config);

        hs.step(&BusInputs::read(0x04), &mut regs, 1);
        let aborted = hs.reset().expect("read should be in flight");
        assert_eq!(aborted.kind, Kind::Read);
        assert_eq!(hs.phase(), Phase::Idle);
        assert!(hs.transaction().is_none());
        assert!(hs.reset().is_none());
    }
}
