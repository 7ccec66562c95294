//! configuration errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("synchronizer depth {0} out of range [{1}, {2}]")]
    SyncStages(usize, usize, usize),
    #[error("timeout threshold must be at least 1")]
    TimeoutThreshold,
    #[error("acknowledgment latency must be at least 1")]
    AckLatency,
    #[error("channel {0} width {1} out of range [1, 32]")]
    Width(u8, u32),
    #[error("base address {0:#x} is not aligned to the 0x200 byte register window")]
    UnalignedBase(u64),
    #[error(transparent)]
    Parse(serde_yaml::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFile(PathBuf, serde_yaml::Error),
    #[error("failed to open {0}: {1}")]
    Open(PathBuf, std::io::Error),
}
