//! controller errors
//! 
//! the bus protocol itself never fails; these cover configuration and
//! the observers attached to a controller

use thiserror::Error;

use gpioctl_sim::Time;

use crate::config;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error("tick {1} | observer error: {0}")]
    Observer(anyhow::Error, Time),
}
