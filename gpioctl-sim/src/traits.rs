//! simulation traits
//! 
//! defines the traits shared by everything that advances with the
//! simulation clock

use crate::{ Error, Time };

/// simulation trait
/// 
/// a simulation owns a clock and a set of clocked elements and
/// advances all of them in lock-step
pub trait Simulation {

    /// run the simulation for the given number of clock cycles
    fn run_for(
        &mut self,
        cycles: Time,
    ) -> Result<(), Error>;
}

/// clocked trait
/// 
/// implementation implies that actions must be taken
/// at each rising edge of the simulation clock.
/// elements are stepped in the order they were registered,
/// each step sees the state left by the previous edge only
pub trait Clocked {
    
    /// the step method is invoked once per simulation clock cycle
    fn step(&mut self) -> Result<(), Error> {
        Ok(())
    }
}
