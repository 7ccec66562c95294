//! simulation errors

use thiserror::Error;

use crate::channel;

#[derive(Error, Debug)]
pub enum Error {
    #[error("simulation time: {1} | clocked element error: {0}")]
    Clocked(anyhow::Error, crate::Time),
    #[error("clock error: {0}")]
    Clock(String),
    #[error(transparent)]
    Channel(#[from] channel::Error),
}

impl Error {
    /// wrap an arbitrary error raised by a clocked element at the given time
    pub fn clocked<E>(err: E, time: crate::Time) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Clocked(anyhow::Error::new(err), time)
    }
}
