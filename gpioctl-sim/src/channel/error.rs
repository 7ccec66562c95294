//! channel errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} channel: receiver {1} disconnected")]
    Disconnected(&'static str, usize),
}
