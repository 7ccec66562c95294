//! gpioctl core
//! 
//! cycle-level model of a two-channel memory-mapped GPIO controller:
//! a valid/ready bus handshake state machine, the address decoder and
//! register file it drives, per-bit input synchronizers and a timeout
//! guard that keeps every transaction bounded in time.
//! 
//! everything advances in lock-step through [`Controller::tick`]

pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod handshake;
pub mod observer;
pub mod regfile;
pub mod regmap;
pub mod signals;
pub mod sync;
pub mod timeout;

pub use config::GpioConfig;
pub use controller::Controller;
pub use error::Error;
pub use handshake::{ Completion, Kind, Phase, Transaction };
pub use regmap::Register;
pub use signals::{ BusInputs, BusOutputs, ChannelPads, PadEvent, Pads, PinInputs };
