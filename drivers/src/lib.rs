#![no_std]
//! Drivers for the I2C peripherals of the Monster M4SK
//!
//! - **seesaw**: Adafruit seesaw GPIO/ADC/PWM expander (SAMD09 or ATtiny8x7 firmware)
//! - **lis3dh**: ST LIS3DH 3-axis accelerometer
//!
//! All drivers are blocking and built on the `embedded-hal` 1.0 traits.

use embedded_hal::i2c::I2c;

/// LIS3DH 3-axis accelerometer driver.
pub mod lis3dh;

/// Adafruit seesaw GPIO expander driver.
pub mod seesaw;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod testing;

/// Plain 8-bit register access over I2C.
#[derive(Debug)]
pub(crate) struct BlockingRegisterDevice<I2C> {
    i2c: I2C,
    pub(crate) adr: u8,
}

impl<I2C> BlockingRegisterDevice<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, adr: u8) -> Self {
        Self { i2c, adr }
    }

    pub fn read_register(&mut self, reg: u8) -> Result<u8, I2C::Error> {
        let mut buffer = [0u8; 1];
        self.i2c.write_read(self.adr, &[reg], &mut buffer)?;
        Ok(buffer[0])
    }

    pub fn read_register_buffer(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.write_read(self.adr, &[reg], buffer)
    }

    /// Writes `[register, value, ...]` in a single transfer.
    pub fn write_register(&mut self, buffer: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.adr, buffer)
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}
