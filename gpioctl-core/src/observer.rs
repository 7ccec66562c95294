//! transaction observers
//! 
//! observers are notified of every transaction the controller finishes
//! or abandons. they are cloned along with the controller, so a
//! snapshot keeps its observers

use std::sync::Arc;

use dyn_clone::{ DynClone, clone_trait_object };
use parking_lot::Mutex;

use gpioctl_sim::Time;

use crate::handshake::{ Completion, Kind, Transaction };

/// transaction observer trait
pub trait TransactionObserver: DynClone {

    /// called once the master has accepted a response
    fn update(&mut self, completion: &Completion) -> Result<(), anyhow::Error>;

    /// called when reset abandons a transaction in flight
    fn aborted(&mut self, _transaction: &Transaction, _time: Time) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

clone_trait_object!(TransactionObserver);

/// transaction logging observer
#[derive(Clone)]
pub struct TransactionLogger;

impl TransactionLogger {
    /// return a new boxed instance of TransactionLogger
    pub fn new_boxed() -> Box<Self> {
        Box::new(TransactionLogger)
    }
}

impl TransactionObserver for TransactionLogger {

    fn update(&mut self, completion: &Completion) -> Result<(), anyhow::Error> {
        let latency = completion.completed - completion.issued;
        let timed_out = if completion.timed_out { " (timed out)" } else { "" };
        match completion.transaction.kind {
            Kind::Read => log::info!(
                "read  @ {:#05x}: {:#010x} in {} ticks{}",
                completion.transaction.address,
                completion.read_data.unwrap_or_default(),
                latency,
                timed_out,
            ),
            Kind::Write => log::info!(
                "write @ {:#05x}: {:#010x} in {} ticks{}",
                completion.transaction.address,
                completion.transaction.write_data,
                latency,
                timed_out,
            ),
        }
        Ok(())
    }

    fn aborted(&mut self, transaction: &Transaction, time: Time) -> Result<(), anyhow::Error> {
        log::info!("{} abandoned by reset at tick {}", transaction, time);
        Ok(())
    }
}

/// observer that keeps every completion in memory
/// 
/// clones share one record, so a handle kept by the test bench sees
/// what the copy registered with the controller collects
#[derive(Clone, Default)]
pub struct TransactionRecorder {
    record: Arc<Mutex<Record>>,
}

#[derive(Default)]
struct Record {
    completions: Vec<Completion>,
    aborted: Vec<(Transaction, Time)>,
}

impl TransactionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// boxed clone sharing this recorder's record
    pub fn boxed(&self) -> Box<Self> {
        Box::new(self.clone())
    }

    pub fn completions(&self) -> Vec<Completion> {
        self.record.lock().completions.clone()
    }

    pub fn aborted_transactions(&self) -> Vec<(Transaction, Time)> {
        self.record.lock().aborted.clone()
    }
}

impl TransactionObserver for TransactionRecorder {

    fn update(&mut self, completion: &Completion) -> Result<(), anyhow::Error> {
        self.record.lock().completions.push(*completion);
        Ok(())
    }

    fn aborted(&mut self, transaction: &Transaction, time: Time) -> Result<(), anyhow::Error> {
        self.record.lock().aborted.push((*transaction, time));
        Ok(())
    }
}
