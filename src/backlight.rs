use embedded_hal::pwm::SetDutyCycle;

/// PWM frequency of the right backlight
pub const BACKLIGHT_FREQUENCY_HZ: u32 = 5000;

/// Full brightness for the left (expander, 8 bit) backlight
pub const LEFT_FULL: u8 = u8::MAX;

/// Full brightness for the right (host PWM, 16 bit) backlight
pub const RIGHT_FULL: u16 = u16::MAX;

/// Backlight on a host PWM channel.
///
/// Duty is given on a 0 to 65535 scale and mapped onto whatever resolution
/// the channel has.
#[derive(Debug)]
pub struct PwmBacklight<P> {
    pwm: P,
    frequency_hz: u32,
    duty: u16,
}

impl<P> PwmBacklight<P>
where
    P: SetDutyCycle,
{
    /// Wrap a channel the platform already started at `duty`.
    pub fn new(pwm: P, frequency_hz: u32, duty: u16) -> Self {
        Self {
            pwm,
            frequency_hz,
            duty,
        }
    }

    pub fn set_duty_cycle(&mut self, duty: u16) -> Result<(), P::Error> {
        self.pwm.set_duty_cycle_fraction(duty, u16::MAX)?;
        self.duty = duty;
        Ok(())
    }

    pub fn duty_cycle(&self) -> u16 {
        self.duty
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }
}
