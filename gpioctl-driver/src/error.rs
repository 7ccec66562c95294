//! driver errors

use thiserror::Error;

use gpioctl_core::{ Kind, Phase };
use gpioctl_sim::Time;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no response to {kind:?} @ {address:#x} after {waited} ticks")]
    NoResponse { kind: Kind, address: u64, waited: Time },
    #[error("invalid gpio channel {0}, expected 1 or 2")]
    InvalidChannel(u8),
    #[error("offset {offset:#x} from base {base:#x} is outside the peripheral")]
    InvalidAddress { base: u64, offset: u16 },
    #[error("controller did not return to idle, stuck in {0:?}")]
    Stuck(Phase),
    #[error(transparent)]
    Controller(#[from] gpioctl_core::Error),
}
