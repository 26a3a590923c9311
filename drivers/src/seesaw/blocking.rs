use super::{
    adc, base, gpio, pin_mask, status, timer, ChipId, PinMode, PwmWidth, SeesawError,
    COMMAND_DELAY_US, MAX_PAYLOAD, READ_DELAY_US, RESET_SETTLE_MS,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Adafruit seesaw expander.
///
/// Every command is a write of `[module base, function, payload...]`.
/// Reads select the register first, wait for the firmware to prepare the
/// answer, then read it back in a separate transfer.
#[derive(Debug)]
pub struct Seesaw<I2C, DELAY> {
    i2c: I2C,
    address: u8,
    delay: DELAY,
    chip: Option<ChipId>,
}

impl<I2C, DELAY> Seesaw<I2C, DELAY>
where
    I2C: I2c,
    DELAY: DelayNs,
{
    pub fn new(i2c: I2C, address: u8, delay: DELAY) -> Self {
        Self {
            i2c,
            address,
            delay,
            chip: None,
        }
    }

    /// Reset the firmware and identify the chip.
    pub fn begin(&mut self) -> Result<ChipId, SeesawError> {
        self.software_reset()?;
        let id = self.read_u8(base::STATUS, status::HW_ID)?;
        let chip = ChipId::try_from(id).map_err(|_| SeesawError::WrongHardwareId(id))?;

        #[cfg(feature = "defmt")]
        defmt::info!("seesaw {} at {:#x}", chip, self.address);
        #[cfg(feature = "log-04")]
        log::info!("seesaw {} at {:#04x}", chip, self.address);

        self.chip = Some(chip);
        Ok(chip)
    }

    pub fn software_reset(&mut self) -> Result<(), SeesawError> {
        self.write(base::STATUS, status::SWRST, &[0xFF])?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    /// Chip identified by `begin`, if it ran.
    pub fn chip_id(&self) -> Option<ChipId> {
        self.chip
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Firmware version word: product code in the upper half, date code in
    /// the lower half.
    pub fn get_version(&mut self) -> Result<u32, SeesawError> {
        let mut buffer = [0u8; 4];
        self.read(base::STATUS, status::VERSION, &mut buffer)?;
        Ok(u32::from_be_bytes(buffer))
    }

    pub fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), SeesawError> {
        let mask = pin_mask(pin)?;
        self.pin_mode_bulk(mask, mode)
    }

    pub fn pin_mode_bulk(&mut self, pins: u32, mode: PinMode) -> Result<(), SeesawError> {
        let cmd = pins.to_be_bytes();
        match mode {
            PinMode::Output => {
                self.write(base::GPIO, gpio::DIRSET_BULK, &cmd)?;
            }
            PinMode::Input => {
                self.write(base::GPIO, gpio::DIRCLR_BULK, &cmd)?;
                self.write(base::GPIO, gpio::PULLENCLR, &cmd)?;
            }
            PinMode::InputPullup => {
                self.write(base::GPIO, gpio::DIRCLR_BULK, &cmd)?;
                self.write(base::GPIO, gpio::PULLENSET, &cmd)?;
                self.write(base::GPIO, gpio::BULK_SET, &cmd)?;
            }
            PinMode::InputPulldown => {
                self.write(base::GPIO, gpio::DIRCLR_BULK, &cmd)?;
                self.write(base::GPIO, gpio::PULLENSET, &cmd)?;
                self.write(base::GPIO, gpio::BULK_CLR, &cmd)?;
            }
        }
        Ok(())
    }

    pub fn digital_write(&mut self, pin: u8, value: bool) -> Result<(), SeesawError> {
        let mask = pin_mask(pin)?;
        self.digital_write_bulk(mask, value)
    }

    pub fn digital_write_bulk(&mut self, pins: u32, value: bool) -> Result<(), SeesawError> {
        let func = if value { gpio::BULK_SET } else { gpio::BULK_CLR };
        self.write(base::GPIO, func, &pins.to_be_bytes())
    }

    pub fn digital_read(&mut self, pin: u8) -> Result<bool, SeesawError> {
        let mask = pin_mask(pin)?;
        Ok(self.digital_read_bulk(mask)? != 0)
    }

    /// Levels of the pins in `pins`; every other bit is zero.
    pub fn digital_read_bulk(&mut self, pins: u32) -> Result<u32, SeesawError> {
        let mut buffer = [0u8; 4];
        self.read(base::GPIO, gpio::BULK, &mut buffer)?;
        // the top two bits are not pins
        buffer[0] &= 0x3F;
        Ok(u32::from_be_bytes(buffer) & pins)
    }

    /// Raw ADC reading of an analog pin (10 bit on both firmwares).
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, SeesawError> {
        let chip = self.chip.ok_or(SeesawError::NotStarted)?;
        let channel = chip
            .adc_channel(pin)
            .ok_or(SeesawError::InvalidAnalogPin(pin))?;
        let mut buffer = [0u8; 2];
        self.read(base::ADC, adc::CHANNEL_OFFSET + channel, &mut buffer)?;
        self.delay.delay_us(COMMAND_DELAY_US);
        Ok(u16::from_be_bytes(buffer))
    }

    /// Set the PWM duty of a pin, 0 (off) to 255 (fully on).
    ///
    /// 16-bit firmwares get the value stretched to the full 16-bit range.
    pub fn analog_write(&mut self, pin: u8, value: u8) -> Result<(), SeesawError> {
        let chip = self.chip.ok_or(SeesawError::NotStarted)?;
        let channel = chip
            .pwm_channel(pin)
            .ok_or(SeesawError::InvalidPwmPin(pin))?;
        match chip.pin_mapping().pwm_width {
            PwmWidth::Bits8 => self.write(base::TIMER, timer::PWM, &[channel, value])?,
            PwmWidth::Bits16 => {
                let [hi, lo] = (u16::from(value) * 257).to_be_bytes();
                self.write(base::TIMER, timer::PWM, &[channel, hi, lo])?
            }
        }
        self.delay.delay_us(COMMAND_DELAY_US);
        Ok(())
    }

    pub fn release(self) -> (I2C, DELAY) {
        (self.i2c, self.delay)
    }

    fn write(&mut self, base: u8, func: u8, data: &[u8]) -> Result<(), SeesawError> {
        debug_assert!(data.len() <= MAX_PAYLOAD);
        let mut buffer = [0u8; 2 + MAX_PAYLOAD];
        let len = 2 + data.len();
        buffer[0] = base;
        buffer[1] = func;
        buffer[2..len].copy_from_slice(data);
        self.i2c.write(self.address, &buffer[..len])?;
        Ok(())
    }

    fn read(&mut self, base: u8, func: u8, buffer: &mut [u8]) -> Result<(), SeesawError> {
        self.i2c.write(self.address, &[base, func])?;
        self.delay.delay_us(READ_DELAY_US);
        self.i2c.read(self.address, buffer)?;
        Ok(())
    }

    fn read_u8(&mut self, base: u8, func: u8) -> Result<u8, SeesawError> {
        let mut buffer = [0u8; 1];
        self.read(base, func, &mut buffer)?;
        Ok(buffer[0])
    }
}
