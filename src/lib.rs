#![no_std]
//! Board support for the Adafruit Monster M4SK
//!
//! - **board**: power-on sequence and the [`MonsterM4sk`] controller
//! - **display**: the two ST7789 eye panels
//! - **backlight**, **touch**: right backlight PWM and the nose pad
//! - **platform**: the host peripherals a HAL binding provides
//! - **registry**: process-wide display ownership
//!
//! I2C peripherals (seesaw expander, LIS3DH) live in the `drivers` crate.

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod backlight;
pub mod board;
pub mod display;
pub mod error;
pub mod pins;
pub mod platform;
pub mod registry;
pub mod touch;


pub use board::{BoardConfig, MonsterM4sk, Parts};
pub use display::{DisplayBuffers, Eye, EyeDisplay};
pub use drivers::lis3dh::Acceleration;
pub use error::BoardError;
pub use pins::HostPin;
pub use platform::{share_i2c, Platform, Pull, SharedI2c};
pub use touch::{CapacitiveSensor, NoseTouch};
