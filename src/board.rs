//! Board bring-up and sensor access
//!
//! [`MonsterM4sk::new`] runs the whole power-on sequence: expander, both
//! eyes with their backlights, accelerometer and nose. Afterwards the
//! controller owns every peripheral and offers the simple sensor reads.

use drivers::lis3dh::blocking::Lis3dh;
use drivers::lis3dh::{Acceleration, Lis3dhError, ALTERNATE_ADDRESS, DEFAULT_ADDRESS};
use drivers::seesaw::blocking::Seesaw;
use drivers::seesaw::{pin_mask, ChipId, PinMode, SEESAW_DEFAULT_ADDRESS};
use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::Error as _;
use embedded_hal_bus::i2c::RcDevice;
use log::{debug, info, warn};

use crate::backlight::{PwmBacklight, BACKLIGHT_FREQUENCY_HZ, LEFT_FULL, RIGHT_FULL};
use crate::display::{self, DisplayBuffers, LeftDisplay, RightDisplay};
use crate::error::BoardError;
use crate::pins::{seesaw, HostPin};
use crate::platform::{share_i2c, Platform, Pull, SharedI2c};
use crate::registry::{self, DisplayClaim};
use crate::touch::{NoseTouch, NOSE_THRESHOLD};

/// Time the left panel's reset line is held in each state
pub const RESET_PULSE_MS: u32 = 10;

/// Seesaw expander on the shared bus
pub type Expander<P> = Seesaw<RcDevice<<P as Platform>::I2c>, <P as Platform>::Delay>;

/// LIS3DH on the shared bus, INT1 wired to a host input
pub type Accelerometer<P> =
    Lis3dh<RcDevice<<P as Platform>::I2c>, <P as Platform>::Input, <P as Platform>::Delay>;

/// Which optional parts are populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Probe for the accelerometer. When false it is left out entirely and
    /// [`MonsterM4sk::acceleration`] reports `None`.
    pub accelerometer: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            accelerometer: true,
        }
    }
}

/// Everything the controller owns, handed back by [`MonsterM4sk::into_parts`].
///
/// The displays are `None` when a newer controller has released them.
pub struct Parts<'a, P: Platform> {
    pub i2c: SharedI2c<P::I2c>,
    pub expander: Expander<P>,
    pub left_display: Option<LeftDisplay<'a, P>>,
    pub right_display: Option<RightDisplay<'a, P>>,
    pub right_backlight: PwmBacklight<P::Pwm>,
    pub accelerometer: Option<Accelerometer<P>>,
    pub nose: NoseTouch<P::Touch>,
}

/// Monster M4SK board controller.
pub struct MonsterM4sk<'a, P: Platform> {
    i2c: SharedI2c<P::I2c>,
    expander: Expander<P>,
    left_display: LeftDisplay<'a, P>,
    right_display: RightDisplay<'a, P>,
    left_backlight: u8,
    right_backlight: PwmBacklight<P::Pwm>,
    accelerometer: Option<Accelerometer<P>>,
    nose: NoseTouch<P::Touch>,
    claim: DisplayClaim,
}

impl<'a, P> MonsterM4sk<'a, P>
where
    P: Platform,
{
    /// Bring up the board with every part populated.
    ///
    /// Uses `i2c` when given, otherwise the platform's default bus.
    pub fn new(
        platform: &mut P,
        i2c: Option<SharedI2c<P::I2c>>,
        buffers: DisplayBuffers<'a>,
    ) -> Result<Self, BoardError<P::Error>> {
        Self::with_config(platform, i2c, buffers, BoardConfig::default())
    }

    pub fn with_config(
        platform: &mut P,
        i2c: Option<SharedI2c<P::I2c>>,
        buffers: DisplayBuffers<'a>,
        config: BoardConfig,
    ) -> Result<Self, BoardError<P::Error>> {
        // Displays held by an earlier controller must be freed first
        registry::release_all();
        let claim = registry::claim();
        debug!("display claim generation {}", claim.generation());

        let i2c = match i2c {
            Some(bus) => bus,
            None => {
                debug!("using default I2C bus");
                share_i2c(platform.default_i2c().map_err(BoardError::Bus)?)
            }
        };

        let mut expander = Self::init_expander(platform, &i2c)?;

        let mut delay = platform.delay();
        Self::reset_left_panel(&mut expander, &mut delay)?;

        expander.pin_mode(seesaw::BACKLIGHT, PinMode::Output)?;
        expander.analog_write(seesaw::BACKLIGHT, LEFT_FULL)?;
        debug!("left backlight on");

        let left_display = display::init_left(platform, buffers.left, &mut delay)?;
        debug!("left display ready");

        // created dark, then switched on
        let pwm = platform
            .pwm(HostPin::RightTftLite, BACKLIGHT_FREQUENCY_HZ, 0)
            .map_err(|e| BoardError::Peripheral(HostPin::RightTftLite, e))?;
        let mut right_backlight = PwmBacklight::new(pwm, BACKLIGHT_FREQUENCY_HZ, 0);
        right_backlight
            .set_duty_cycle(RIGHT_FULL)
            .map_err(|e| BoardError::Backlight(e.kind()))?;
        debug!("right backlight on");

        let right_display = display::init_right(platform, buffers.right, &mut delay)?;
        debug!("right display ready");

        let accelerometer = if config.accelerometer {
            Some(Self::init_accelerometer(platform, &i2c)?)
        } else {
            debug!("accelerometer not populated");
            None
        };

        let touch = platform
            .touch(HostPin::Nose)
            .map_err(|e| BoardError::Peripheral(HostPin::Nose, e))?;
        let mut nose = NoseTouch::new(touch).map_err(BoardError::Touch)?;
        nose.set_threshold(NOSE_THRESHOLD);
        debug!("nose touch threshold {}", NOSE_THRESHOLD);

        info!("Monster M4SK ready");

        Ok(Self {
            i2c,
            expander,
            left_display,
            right_display,
            left_backlight: LEFT_FULL,
            right_backlight,
            accelerometer,
            nose,
            claim,
        })
    }

    fn init_expander(
        platform: &mut P,
        i2c: &SharedI2c<P::I2c>,
    ) -> Result<Expander<P>, BoardError<P::Error>> {
        let mut expander = Seesaw::new(
            RcDevice::new(i2c.clone()),
            SEESAW_DEFAULT_ADDRESS,
            platform.delay(),
        );
        let chip = expander.begin()?;
        info!("expander {} at {:#04x}", chip, SEESAW_DEFAULT_ADDRESS);

        expander.pin_mode(seesaw::TFT_RESET, PinMode::Output)?;
        for pin in seesaw::SWITCHES {
            expander.pin_mode(pin, PinMode::InputPullup)?;
        }
        expander.pin_mode(seesaw::LIGHT_SENSOR, PinMode::Input)?;
        Ok(expander)
    }

    /// The left panel's reset line sits on the expander, so the panel driver
    /// cannot pulse it itself.
    fn reset_left_panel<D: DelayNs>(
        expander: &mut Expander<P>,
        delay: &mut D,
    ) -> Result<(), BoardError<P::Error>> {
        expander.digital_write(seesaw::TFT_RESET, false)?;
        delay.delay_ms(RESET_PULSE_MS);
        expander.digital_write(seesaw::TFT_RESET, true)?;
        delay.delay_ms(RESET_PULSE_MS);
        debug!("left display reset");
        Ok(())
    }

    /// Probe the alternate address first. Only "nothing answered" moves on
    /// to the default address; any other failure is final.
    fn init_accelerometer(
        platform: &mut P,
        i2c: &SharedI2c<P::I2c>,
    ) -> Result<Accelerometer<P>, BoardError<P::Error>> {
        let int1 = platform
            .input(HostPin::AccelerometerInterrupt, Pull::None)
            .map_err(|e| BoardError::Peripheral(HostPin::AccelerometerInterrupt, e))?;

        let mut accelerometer = Lis3dh::new(
            RcDevice::new(i2c.clone()),
            ALTERNATE_ADDRESS,
            Some(int1),
            platform.delay(),
        );
        match accelerometer.init() {
            Ok(()) => {}
            Err(Lis3dhError::NotFound) => {
                warn!(
                    "no accelerometer at {:#04x}, trying {:#04x}",
                    ALTERNATE_ADDRESS, DEFAULT_ADDRESS
                );
                let (bus, int1, delay) = accelerometer.release();
                accelerometer = Lis3dh::new(bus, DEFAULT_ADDRESS, int1, delay);
                accelerometer.init()?;
            }
            Err(e) => return Err(e.into()),
        }
        info!("accelerometer at {:#04x}", accelerometer.address());
        Ok(accelerometer)
    }

    /// Acceleration in m/s², or `None` when the board has no accelerometer.
    pub fn acceleration(&mut self) -> Result<Option<Acceleration>, BoardError<P::Error>> {
        match self.accelerometer.as_mut() {
            Some(accelerometer) => Ok(Some(accelerometer.acceleration()?)),
            None => Ok(None),
        }
    }

    /// Raw light sensor reading, unscaled.
    pub fn light(&mut self) -> Result<u16, BoardError<P::Error>> {
        Ok(self.expander.analog_read(seesaw::LIGHT_SENSOR)?)
    }

    /// Whether the nose is being touched.
    pub fn boop(&mut self) -> Result<bool, BoardError<P::Error>> {
        self.nose.is_touched().map_err(BoardError::Touch)
    }

    /// Pressed state of the three top switches. They pull up, so pressed
    /// reads low.
    pub fn switches(&mut self) -> Result<[bool; 3], BoardError<P::Error>> {
        let mut mask = 0;
        for pin in seesaw::SWITCHES {
            mask |= pin_mask(pin)?;
        }
        let levels = self.expander.digital_read_bulk(mask)?;
        Ok(seesaw::SWITCHES.map(|pin| levels & (1 << pin) == 0))
    }

    /// Display access fails with [`BoardError::Released`] once a newer
    /// controller has claimed the panels.
    pub fn left_display(&self) -> Result<&LeftDisplay<'a, P>, BoardError<P::Error>> {
        self.check_claim()?;
        Ok(&self.left_display)
    }

    pub fn left_display_mut(&mut self) -> Result<&mut LeftDisplay<'a, P>, BoardError<P::Error>> {
        self.check_claim()?;
        Ok(&mut self.left_display)
    }

    pub fn right_display(&self) -> Result<&RightDisplay<'a, P>, BoardError<P::Error>> {
        self.check_claim()?;
        Ok(&self.right_display)
    }

    pub fn right_display_mut(
        &mut self,
    ) -> Result<&mut RightDisplay<'a, P>, BoardError<P::Error>> {
        self.check_claim()?;
        Ok(&mut self.right_display)
    }

    fn check_claim(&self) -> Result<(), BoardError<P::Error>> {
        if self.claim.is_current() {
            Ok(())
        } else {
            warn!("display claim {} was released", self.claim.generation());
            Err(BoardError::Released)
        }
    }

    pub fn left_backlight(&self) -> u8 {
        self.left_backlight
    }

    pub fn set_left_backlight(&mut self, value: u8) -> Result<(), BoardError<P::Error>> {
        self.expander.analog_write(seesaw::BACKLIGHT, value)?;
        self.left_backlight = value;
        Ok(())
    }

    pub fn right_backlight(&self) -> u16 {
        self.right_backlight.duty_cycle()
    }

    pub fn set_right_backlight(&mut self, duty: u16) -> Result<(), BoardError<P::Error>> {
        self.right_backlight
            .set_duty_cycle(duty)
            .map_err(|e| BoardError::Backlight(e.kind()))
    }

    pub fn expander_chip(&self) -> Option<ChipId> {
        self.expander.chip_id()
    }

    pub fn expander_mut(&mut self) -> &mut Expander<P> {
        &mut self.expander
    }

    pub fn accelerometer_mut(&mut self) -> Option<&mut Accelerometer<P>> {
        self.accelerometer.as_mut()
    }

    pub fn nose_mut(&mut self) -> &mut NoseTouch<P::Touch> {
        &mut self.nose
    }

    /// The shared bus, e.g. for other devices on the STEMMA connector.
    pub fn i2c(&self) -> &SharedI2c<P::I2c> {
        &self.i2c
    }

    /// False once a newer controller has taken over the displays.
    pub fn displays_current(&self) -> bool {
        self.claim.is_current()
    }

    pub fn into_parts(self) -> Parts<'a, P> {
        let current = self.claim.is_current();
        Parts {
            i2c: self.i2c,
            expander: self.expander,
            left_display: current.then_some(self.left_display),
            right_display: current.then_some(self.right_display),
            right_backlight: self.right_backlight,
            accelerometer: self.accelerometer,
            nose: self.nose,
        }
    }
}
