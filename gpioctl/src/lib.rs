#[cfg(feature = "driver")]
pub use gpioctl_driver as driver;

pub use gpioctl_core as core;
pub use gpioctl_sim as sim;
