//! channel module
//! 
//! implements broadcast channels that carry simulation events from
//! one emitter to any number of receivers

use std::sync::mpsc;

pub mod event;
pub use event::*;
pub mod error;
pub use error::Error;
pub mod logger;
pub use logger::ChannelLogger;

/// a broadcast channel
/// 
/// events emitted on the channel are cloned to every registered receiver.
/// receivers are registered by handing out the receiving half of an
/// mpsc pair. `emit` treats a dropped receiver as an error, `broadcast`
/// forgets it
#[derive(Clone)]
pub struct Channel<T: Clone + std::fmt::Debug> {
    name: &'static str,
    receivers: Vec<mpsc::Sender<T>>,
}

impl<T: Clone + std::fmt::Debug> Channel<T> {
    /// create a new named channel with no receivers
    pub fn new_with(name: &'static str) -> Self {
        Self {
            name,
            receivers: Vec::new(),
        }
    }

    /// channel name, used in error messages
    pub fn name(&self) -> &str {
        self.name
    }

    /// number of registered receivers
    pub fn receivers(&self) -> usize {
        self.receivers.len()
    }

    /// create a channel logger
    pub fn get_logger(&mut self) -> ChannelLogger<T> {
        ChannelLogger::new_with(self.receiver())
    }

    /// emit a reference to an event to all receivers
    pub fn emit(&self, data: &T) -> Result<(), crate::Error> {
        log::trace!("{} channel emit: {:?}", self.name, data);
        for (i, tx) in self.receivers.iter().enumerate() {
            tx.send(data.clone()).map_err(|_| Error::Disconnected(self.name, i))?;
        }
        Ok(())
    }

    /// deliver an event to every live receiver, dropping the receivers
    /// that have gone away. returns the number of deliveries
    pub fn broadcast(&mut self, data: &T) -> usize {
        log::trace!("{} channel broadcast: {:?}", self.name, data);
        let before = self.receivers.len();
        self.receivers.retain(|tx| tx.send(data.clone()).is_ok());
        if self.receivers.len() < before {
            log::debug!(
                "{} channel: dropped {} disconnected receiver(s)",
                self.name,
                before - self.receivers.len(),
            );
        }
        self.receivers.len()
    }

    /// add a receiver by registering a mspc::Sender
    /// and returning a mpsc::Receiver
    pub fn receiver(&mut self) -> mpsc::Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.receivers.push(tx);
        rx
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_broadcast_to_all_receivers() {
        let mut channel = Channel::<Digital>::new_with("digital");
        let rx = channel.receiver();
        let mut logger = channel.get_logger();
        assert_eq!(channel.receivers(), 2);

        channel.emit(&Digital::Hi(3)).expect("emit failed");
        channel.emit(&Digital::Lo(7)).expect("emit failed");

        let received: Vec<Digital> = rx.try_iter().collect();
        assert_eq!(received, vec![Digital::Hi(3), Digital::Lo(7)]);

        logger.collect_pending();
        assert_eq!(logger.log(), &[Digital::Hi(3), Digital::Lo(7)]);
    }

    #[test]
    fn test_emit_to_dropped_receiver() {
        let mut channel = Channel::<Digital>::new_with("digital");
        drop(channel.receiver());

        let err = channel.emit(&Digital::Hi(0))
            .expect_err("emit to a dropped receiver should fail");
        assert!(matches!(err, crate::Error::Channel(Error::Disconnected("digital", 0))), "{err}");
    }

    #[test]
    fn test_broadcast_prunes_dropped_receivers() {
        let mut channel = Channel::<Digital>::new_with("digital");
        let rx = channel.receiver();
        drop(channel.receiver());
        assert_eq!(channel.receivers(), 2);

        assert_eq!(channel.broadcast(&Digital::Lo(1)), 1);
        assert_eq!(channel.receivers(), 1);
        channel.emit(&Digital::Hi(2)).expect("emit failed");
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Digital::Lo(1), Digital::Hi(2)]);

        drop(rx);
        assert_eq!(channel.broadcast(&Digital::Lo(3)), 0);
        assert_eq!(channel.receivers(), 0);
    }
}
