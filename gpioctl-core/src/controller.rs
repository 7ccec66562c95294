//! top-level controller
//! 
//! ties the handshake state machine, register file, synchronizers and
//! pads together behind a single `tick`. one call is one rising edge of
//! the global clock; every stateful element is updated from the state
//! left by the previous edge, so the result does not depend on the
//! order the elements are visited in

use gpioctl_sim::{ Channel, ChannelLogger, Clock, Clocked, Simulation, Time };

use crate::config::GpioConfig;
use crate::error::Error;
use crate::handshake::{ Handshake, Phase, Step, Transaction };
use crate::observer::TransactionObserver;
use crate::regfile::RegisterFile;
use crate::regmap::Register;
use crate::signals::{ BusInputs, BusOutputs, ChannelPads, PadEvent, Pads, PinInputs };
use crate::sync::InputSynchronizer;

#[derive(Clone)]
pub struct Controller {
    config: GpioConfig,
    clock: Clock,
    sync: InputSynchronizer,
    sync2: InputSynchronizer,
    regs: RegisterFile,
    handshake: Handshake,
    outputs: BusOutputs,
    pads: Pads,
    // inputs used by `Clocked::step`
    bus_inputs: BusInputs,
    pin_inputs: PinInputs,
    observers: Vec<Box<dyn TransactionObserver>>,
    pad_channel: Option<Channel<PadEvent>>,
}

impl Controller {

    /// create a controller in its reset state
    pub fn new_with(config: GpioConfig) -> Result<Self, Error> {
        config.validate()?;
        log::debug!(
            "controller: {}+{} bits, {} sync stages, timeout {} ticks",
            config.gpio_width,
            config.gpio2_width,
            config.sync_stages,
            config.timeout_threshold,
        );
        let regs = RegisterFile::new_with(&config);
        let mut controller = Self {
            clock: Clock::new(),
            sync: InputSynchronizer::new_with(config.gpio_width, config.sync_stages),
            sync2: InputSynchronizer::new_with(config.gpio2_width, config.sync_stages),
            handshake: Handshake::new_with(&config),
            outputs: BusOutputs::default(),
            pads: Pads::default(),
            bus_inputs: BusInputs::default(),
            pin_inputs: PinInputs::default(),
            observers: Vec::new(),
            pad_channel: None,
            regs,
            config,
        };
        controller.pads = controller.drive_pads();
        Ok(controller)
    }

    /// create a controller with the default configuration
    pub fn new() -> Self {
        Self::new_with(GpioConfig::default())
            .expect("default configuration is valid")
    }

    pub fn config(&self) -> &GpioConfig {
        &self.config
    }

    /// ticks elapsed since creation
    pub fn now(&self) -> Time {
        self.clock.ticks_elapsed()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn phase(&self) -> Phase {
        self.handshake.phase()
    }

    pub fn in_flight(&self) -> Option<&Transaction> {
        self.handshake.transaction()
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// debug access to a register, bypassing the bus
    pub fn peek(&self, register: Register) -> u32 {
        self.regs.read(register)
    }

    /// current timeout guard count
    pub fn timeout_count(&self) -> u32 {
        self.handshake.timeout().count()
    }

    /// outputs produced by the last edge
    pub fn outputs(&self) -> &BusOutputs {
        &self.outputs
    }

    pub fn pads(&self) -> &Pads {
        &self.pads
    }

    /// register an observer for finished and abandoned transactions
    pub fn register_observer(&mut self, observer: Box<dyn TransactionObserver>) {
        self.observers.push(observer);
    }

    /// subscribe to pad driver changes
    pub fn pad_events(&mut self) -> ChannelLogger<PadEvent> {
        self.pad_channel
            .get_or_insert_with(|| Channel::new_with("pad"))
            .get_logger()
    }

    /// latch the bus inputs presented on subsequent `Clocked::step`s
    pub fn set_bus_inputs(&mut self, inputs: BusInputs) {
        self.bus_inputs = inputs;
    }

    /// latch the pin levels presented on subsequent `Clocked::step`s
    pub fn set_pin_inputs(&mut self, pins: PinInputs) {
        self.pin_inputs = pins;
    }

    /// copy of the complete controller state, observers included
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// return to a state captured with `fork`
    pub fn restore(&mut self, other: &Self) {
        *self = other.clone();
    }

    /// advance one rising edge
    pub fn tick(&mut self, bus: &BusInputs, pins: &PinInputs) -> Result<BusOutputs, Error> {
        self.clock.tick();
        let now = self.clock.ticks_elapsed();

        let step = if bus.reset {
            self.apply_reset(now)?;
            Step::default()
        } else {
            // the handshake reads the snapshot left by the previous edge
            let step = self.handshake.step(bus, &mut self.regs, now);
            self.sync.step(pins.gpio);
            self.sync2.step(pins.gpio2);
            self.regs.capture(self.sync.output(), self.sync2.output());
            step
        };

        self.outputs = self.handshake.outputs(&step);
        self.update_pads(now);

        if let Some(completion) = step.completed.as_ref() {
            for observer in self.observers.iter_mut() {
                observer.update(completion)
                    .map_err(|e| Error::Observer(e, now))?;
            }
        }

        Ok(self.outputs)
    }

    fn apply_reset(&mut self, now: Time) -> Result<(), Error> {
        if let Some(transaction) = self.handshake.reset() {
            log::warn!("tick {now}: reset abandoned {transaction}");
            for observer in self.observers.iter_mut() {
                observer.aborted(&transaction, now)
                    .map_err(|e| Error::Observer(e, now))?;
            }
        }
        self.regs = RegisterFile::new_with(&self.config);
        self.sync.reset();
        self.sync2.reset();
        Ok(())
    }

    fn drive_pads(&self) -> Pads {
        let tri2 = if self.config.all_inputs2 {
            self.config.mask2()
        } else {
            self.regs.tri2()
        };
        Pads {
            gpio: ChannelPads {
                output: self.regs.data1(),
                tri: self.regs.tri1(),
                width: self.config.gpio_width,
            },
            gpio2: ChannelPads {
                output: self.regs.data2(),
                tri: tri2,
                width: self.config.gpio2_width,
            },
        }
    }

    // pad events are best effort: a subscriber that went away is forgotten
    fn update_pads(&mut self, now: Time) {
        let pads = self.drive_pads();
        if let Some(channel) = self.pad_channel.as_mut() {
            let events = PadEvent::diff(1, &self.pads.gpio, &pads.gpio, now)
                .into_iter()
                .chain(PadEvent::diff(2, &self.pads.gpio2, &pads.gpio2, now));
            for event in events {
                channel.broadcast(&event);
            }
        }
        self.pads = pads;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Clocked for Controller {

    fn step(&mut self) -> Result<(), gpioctl_sim::Error> {
        let (bus, pins) = (self.bus_inputs, self.pin_inputs);
        self.tick(&bus, &pins)
            .map(|_| ())
            .map_err(|err| gpioctl_sim::Error::clocked(err, self.now()))
    }
}

impl Simulation for Controller {

    fn run_for(&mut self, cycles: Time) -> Result<(), gpioctl_sim::Error> {
        for _ in 0..cycles {
            Clocked::step(self)?;
        }
        Ok(())
    }
}
