//! controller configuration
//! 
//! the parameters a netlist would bake in as synthesis generics:
//! synchronizer depth, timeout threshold, channel widths and reset values.
//! all of them have defaults matching the standard register map, so an
//! empty yaml document is a valid configuration

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{ Deserialize, Serialize };

use crate::regmap;

pub mod error;
pub use error::Error;

/// bounds on the synchronizer chain depth
pub const MIN_SYNC_STAGES: usize = 2;
pub const MAX_SYNC_STAGES: usize = 8;

/// all-ones mask for a channel of the given width
#[inline]
pub fn width_mask(width: u32) -> u32 {
    if width >= 32 { u32::MAX } else { (1u32 << width) - 1 }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpioConfig {
    /// stages per input synchronizer chain
    pub sync_stages: usize,
    /// ticks spent in the access phase before the timeout guard fires
    pub timeout_threshold: u32,
    /// ticks a decoded register takes to acknowledge an access
    pub ack_latency: u32,
    /// channel 1 width in bits
    pub gpio_width: u32,
    /// channel 2 width in bits
    pub gpio2_width: u32,
    pub dout_default: u32,
    pub tri_default: u32,
    pub dout_default2: u32,
    pub tri_default2: u32,
    /// channel 2 never drives its pads
    pub all_inputs2: bool,
    /// peripheral base address on the master's bus
    pub base_address: u64,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            sync_stages: 4,
            timeout_threshold: 16,
            ack_latency: 1,
            gpio_width: 7,
            gpio2_width: 1,
            dout_default: 0,
            tri_default: u32::MAX,
            dout_default2: 0,
            tri_default2: u32::MAX,
            all_inputs2: true,
            base_address: 0x4000_0000,
        }
    }
}

impl GpioConfig {

    /// check every parameter against its documented range
    pub fn validate(&self) -> Result<(), Error> {
        if !(MIN_SYNC_STAGES..=MAX_SYNC_STAGES).contains(&self.sync_stages) {
            return Err(Error::SyncStages(self.sync_stages, MIN_SYNC_STAGES, MAX_SYNC_STAGES));
        }
        if self.timeout_threshold == 0 {
            return Err(Error::TimeoutThreshold);
        }
        if self.ack_latency == 0 {
            return Err(Error::AckLatency);
        }
        for (channel, width) in [(1u8, self.gpio_width), (2u8, self.gpio2_width)] {
            if !(1..=32).contains(&width) {
                return Err(Error::Width(channel, width));
            }
        }
        // the base must not overlap the address bits the controller decodes
        if self.base_address & regmap::ADDRESS_MASK as u64 != 0 {
            return Err(Error::UnalignedBase(self.base_address));
        }
        Ok(())
    }

    /// channel 1 bit mask
    pub fn mask(&self) -> u32 {
        width_mask(self.gpio_width)
    }

    /// channel 2 bit mask
    pub fn mask2(&self) -> u32 {
        width_mask(self.gpio2_width)
    }

    /// parse and validate a yaml configuration
    pub fn from_yaml_str(input: impl AsRef<str>) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(input.as_ref()).map_err(Error::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_reader(reader).map_err(Error::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::Open(path.to_owned(), e))?;
        let config: Self = serde_yaml::from_reader(file)
            .map_err(|e| Error::ParseFile(path.to_owned(), e))?;
        config.validate()?;
        log::debug!("loaded controller configuration from {}", path.display());
        Ok(config)
    }
}
