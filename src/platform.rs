//! Host peripherals the board layer is built from
//!
//! A [`Platform`] is the board's HAL binding: it maps [`HostPin`]s to real
//! peripherals and hands each one out as an `embedded-hal` implementation.

use alloc::rc::Rc;
use core::cell::RefCell;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiBus;

use crate::pins::{HostPin, SpiPins};
use crate::touch::CapacitiveSensor;

/// I2C bus shared by the expander and the accelerometer.
///
/// Drivers get an [`embedded_hal_bus::i2c::RcDevice`] each. The bus is not
/// `Send`; everything runs on one thread.
pub type SharedI2c<I2C> = Rc<RefCell<I2C>>;

/// Wrap an owned bus for sharing.
pub fn share_i2c<I2C: I2c>(i2c: I2C) -> SharedI2c<I2C> {
    Rc::new(RefCell::new(i2c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

pub trait Platform {
    /// Why the platform could not hand out a peripheral
    type Error: core::fmt::Debug;

    type I2c: I2c;
    type SpiBus: SpiBus;
    type Output: OutputPin;
    type Input: InputPin;
    type Pwm: SetDutyCycle;
    type Touch: CapacitiveSensor<Error = Self::Error>;
    type Delay: DelayNs;

    /// The board's default I2C bus.
    fn default_i2c(&mut self) -> Result<Self::I2c, Self::Error>;

    /// A write-only SPI bus on an explicit pin pair.
    fn spi(&mut self, pins: SpiPins) -> Result<Self::SpiBus, Self::Error>;

    fn output(&mut self, pin: HostPin) -> Result<Self::Output, Self::Error>;

    fn input(&mut self, pin: HostPin, pull: Pull) -> Result<Self::Input, Self::Error>;

    /// A PWM channel running at `frequency_hz`, starting at `duty_cycle`.
    fn pwm(
        &mut self,
        pin: HostPin,
        frequency_hz: u32,
        duty_cycle: u16,
    ) -> Result<Self::Pwm, Self::Error>;

    fn touch(&mut self, pin: HostPin) -> Result<Self::Touch, Self::Error>;

    /// A blocking delay. May be called any number of times.
    fn delay(&mut self) -> Self::Delay;
}
