//! channel events
//! 
//! specifies events for particular channel types

use crate::Time;

/// events that can be sent over a digital channel
/// 
/// Hi represents logic high (1) that occurs at Time
/// Lo represents logic low (0) that occurs at Time
#[derive(Clone, Copy, PartialEq, Eq, std::fmt::Debug)]
pub enum Digital {
    Hi(Time),
    Lo(Time),
}

impl Digital {
    /// build an event from a logic level
    pub fn from_level(level: bool, time: Time) -> Self {
        if level { Self::Hi(time) } else { Self::Lo(time) }
    }

    /// logic level carried by the event
    pub fn level(&self) -> bool {
        matches!(self, Self::Hi(_))
    }

    /// time the event occurred at
    pub fn time(&self) -> Time {
        match self {
            Self::Hi(t) | Self::Lo(t) => *t,
        }
    }
}
