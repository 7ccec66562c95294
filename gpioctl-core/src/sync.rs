//! input synchronizer
//! 
//! imports asynchronous pin levels into the controller clock domain.
//! every input bit owns an independent chain of single-bit stages;
//! stage[0] samples the raw pin, stage[k] samples stage[k-1], and only
//! the final stage is visible outside this module

use crate::config::MAX_SYNC_STAGES;

/// one fixed-depth shift register, stage k held in bit k
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncChain {
    stages: u8,
}

impl SyncChain {

    /// clock the chain once with the current raw level
    #[inline]
    pub fn step(&mut self, raw: bool, depth: usize) {
        let mask = (1u16 << depth) - 1;
        self.stages = (((self.stages as u16) << 1 | raw as u16) & mask) as u8;
    }

    /// level of the final stage
    #[inline]
    pub fn output(&self, depth: usize) -> bool {
        (self.stages >> (depth - 1)) & 1 != 0
    }

    pub fn clear(&mut self) {
        self.stages = 0;
    }
}

/// a bank of synchronizer chains, one per channel bit
#[derive(Clone, Debug)]
pub struct InputSynchronizer {
    depth: usize,
    chains: Vec<SyncChain>,
}

impl InputSynchronizer {

    /// create a synchronizer for `width` input bits with `depth` stages each
    pub fn new_with(width: u32, depth: usize) -> Self {
        debug_assert!(depth >= 1 && depth <= MAX_SYNC_STAGES);
        Self {
            depth,
            chains: vec![SyncChain::default(); width as usize],
        }
    }

    /// clock every chain once; `raw` bit i feeds chain i, bits above the
    /// channel width are ignored
    pub fn step(&mut self, raw: u32) {
        let depth = self.depth;
        for (i, chain) in self.chains.iter_mut().enumerate() {
            chain.step((raw >> i) & 1 != 0, depth);
        }
    }

    /// synchronized value: the final stage of every chain
    pub fn output(&self) -> u32 {
        self.chains.iter()
            .enumerate()
            .fold(0u32, |acc, (i, chain)| acc | (chain.output(self.depth) as u32) << i)
    }

    /// synchronous reset: all stages low
    pub fn reset(&mut self) {
        self.chains.iter_mut().for_each(SyncChain::clear)
    }
}
