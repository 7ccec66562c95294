//! simulation module
//! 
//! the simulation crate contains functionality for 
//! managing clocked simulation components

pub mod channel;
pub mod traits;
pub mod error;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;

pub use channel::{ Channel, ChannelLogger };

/// global minimum simulation time resolution
pub const MIN_QUANT: f64 = 1e-9;
