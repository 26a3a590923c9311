use super::{
    reg, Acceleration, ClickConfig, DataRate, Lis3dhError, Range, TapMode, TapTiming,
    AUTO_INCREMENT, BOOT_DELAY_MS, DEVICE_ID,
};
use crate::BlockingRegisterDevice;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal::i2c::{Error, I2c};

/// LIS3DH accelerometer on I2C.
///
/// `new` does no I/O. `init` checks the identity register and configures
/// 400 Hz normal mode, high resolution, block data update and ±2 G.
#[derive(Debug)]
pub struct Lis3dh<I2C, INT, DELAY> {
    dev: BlockingRegisterDevice<I2C>,
    int1: Option<INT>,
    delay: DELAY,
}

impl<I2C, INT, DELAY> Lis3dh<I2C, INT, DELAY>
where
    I2C: I2c,
    INT: InputPin,
    DELAY: DelayNs,
{
    pub fn new(i2c: I2C, address: u8, int1: Option<INT>, delay: DELAY) -> Self {
        Self {
            dev: BlockingRegisterDevice::new(i2c, address),
            int1,
            delay,
        }
    }

    pub fn init(&mut self) -> Result<(), Lis3dhError> {
        let id = self
            .dev
            .read_register(reg::WHO_AM_I)
            .map_err(|e| Lis3dhError::from_probe(e.kind()))?;
        if id != DEVICE_ID {
            return Err(Lis3dhError::WrongDevice(id));
        }

        // reboot memory content
        self.dev.write_register(&[reg::CTRL5, 0x80])?;
        self.delay.delay_ms(BOOT_DELAY_MS);

        // all axes, normal mode
        self.dev.write_register(&[reg::CTRL1, 0x07])?;
        self.set_data_rate(DataRate::Hz400)?;
        // block data update, high resolution
        self.dev.write_register(&[reg::CTRL4, 0x88])?;
        // ADC enable
        self.dev.write_register(&[reg::TEMP_CFG, 0x80])?;
        // latch INT1
        self.dev.write_register(&[reg::CTRL5, 0x08])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("LIS3DH ready at {:#x}", self.dev.adr);
        #[cfg(feature = "log-04")]
        log::debug!("LIS3DH ready at {:#04x}", self.dev.adr);

        Ok(())
    }

    pub fn address(&self) -> u8 {
        self.dev.adr
    }

    pub fn get_range(&mut self) -> Result<Range, Lis3dhError> {
        let ctl4 = self.dev.read_register(reg::CTRL4)?;
        // two bits always map to a variant
        Ok(Range::try_from((ctl4 >> 4) & 0x03).unwrap_or(Range::G2))
    }

    pub fn set_range(&mut self, range: Range) -> Result<(), Lis3dhError> {
        let mut ctl4 = self.dev.read_register(reg::CTRL4)?;
        ctl4 &= !0x30;
        ctl4 |= u8::from(range) << 4;
        self.dev.write_register(&[reg::CTRL4, ctl4])?;
        Ok(())
    }

    pub fn get_data_rate(&mut self) -> Result<DataRate, Lis3dhError> {
        let ctl1 = self.dev.read_register(reg::CTRL1)?;
        DataRate::try_from(ctl1 >> 4).map_err(|e| Lis3dhError::InvalidRegisterValue(e.number))
    }

    pub fn set_data_rate(&mut self, rate: DataRate) -> Result<(), Lis3dhError> {
        let mut ctl1 = self.dev.read_register(reg::CTRL1)?;
        ctl1 &= !0xF0;
        ctl1 |= u8::from(rate) << 4;
        self.dev.write_register(&[reg::CTRL1, ctl1])?;
        Ok(())
    }

    /// Current acceleration in m/s², scaled by the configured range.
    pub fn acceleration(&mut self) -> Result<Acceleration, Lis3dhError> {
        let range = self.get_range()?;
        let mut buffer = [0u8; 6];
        self.dev
            .read_register_buffer(reg::OUT_X_L | AUTO_INCREMENT, &mut buffer)?;
        let raw = [
            i16::from_le_bytes([buffer[0], buffer[1]]),
            i16::from_le_bytes([buffer[2], buffer[3]]),
            i16::from_le_bytes([buffer[4], buffer[5]]),
        ];
        Ok(Acceleration::from_raw(raw, range))
    }

    /// Averages `samples` readings spread over `total_delay_ms` and reports
    /// whether the mean magnitude exceeds `threshold` (m/s²).
    pub fn shake(
        &mut self,
        threshold: f32,
        samples: u16,
        total_delay_ms: u32,
    ) -> Result<bool, Lis3dhError> {
        let samples = samples.max(1);
        let step_us = u64::from(total_delay_ms) * 1000 / u64::from(samples);
        // both parts fit: step_us / 1000 <= total_delay_ms
        let step_ms = (step_us / 1000) as u32;
        let step_rem_us = (step_us % 1000) as u32;
        let mut sum = Acceleration::default();
        for _ in 0..samples {
            let a = self.acceleration()?;
            sum.x += a.x;
            sum.y += a.y;
            sum.z += a.z;
            self.delay.delay_ms(step_ms);
            self.delay.delay_us(step_rem_us);
        }
        let n = f32::from(samples);
        let avg = Acceleration {
            x: sum.x / n,
            y: sum.y / n,
            z: sum.z / n,
        };
        Ok(avg.magnitude() > threshold)
    }

    /// Configure click detection and route it to INT1.
    ///
    /// `threshold` is in counts of the current range (about 80 for ±2 G).
    pub fn set_tap(
        &mut self,
        mode: TapMode,
        threshold: u8,
        timing: TapTiming,
    ) -> Result<(), Lis3dhError> {
        let config = match mode {
            TapMode::Disabled => {
                self.dev.write_register(&[reg::CTRL3, 0x00])?;
                self.dev.write_register(&[reg::CLICK_CFG, 0x00])?;
                return Ok(());
            }
            TapMode::Single => ClickConfig::SINGLE,
            TapMode::Double => ClickConfig::DOUBLE,
            TapMode::Custom(config) => config,
        };
        // I1_CLICK
        self.dev.write_register(&[reg::CTRL3, 0x80])?;
        self.dev.write_register(&[reg::CTRL5, 0x08])?;
        self.dev.write_register(&[reg::CLICK_CFG, config.bits()])?;
        self.dev.write_register(&[reg::CLICK_THS, threshold])?;
        self.dev.write_register(&[reg::TIME_LIMIT, timing.time_limit])?;
        self.dev
            .write_register(&[reg::TIME_LATENCY, timing.time_latency])?;
        self.dev.write_register(&[reg::TIME_WINDOW, timing.time_window])?;
        Ok(())
    }

    /// True once after a tap. An idle INT1 line skips the bus read.
    pub fn tapped(&mut self) -> Result<bool, Lis3dhError> {
        if let Some(int1) = self.int1.as_mut() {
            if int1.is_low().map_err(|_| Lis3dhError::PinError)? {
                return Ok(false);
            }
        }
        let src = self.dev.read_register(reg::CLICK_SRC)?;
        Ok(src & 0x40 != 0)
    }

    /// Give back the bus, interrupt pin and delay, e.g. to retry at another
    /// address.
    pub fn release(self) -> (I2C, Option<INT>, DELAY) {
        (self.dev.release(), self.int1, self.delay)
    }
}
