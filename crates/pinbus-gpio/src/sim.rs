use std::collections::HashMap;

use pinbus_proto::{PinMode, PinPud, PwmConfig};

use crate::backend::GpioBackend;
use crate::status;

/// The Raspberry Pi header's usable GPIO lines, BCM numbering.
pub const DEFAULT_PINS: &[u16] = &[
    2, 3, 4, 14, 15, 17, 18, 27, 22, 23, 24, 10, 9, 25, 11, 8, 7, 5, 6, 12, 13, 19, 16, 26, 20, 21,
];

/// Pins with a hardware PWM channel behind them.
const PWM_PINS: &[u16] = &[12, 13, 18, 19];

/// PLLD clock feeding the PWM peripheral, after the divider.
const PLLD_CLOCK: u64 = 500_000_000;

#[derive(Debug, Clone, Copy)]
struct PinState {
    mode: PinMode,
    pud: PinPud,
    level: u8,
    pwm: Option<PwmConfig>,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            mode: PinMode::Input,
            pud: PinPud::Floating,
            level: 0,
            pwm: None,
        }
    }
}

/// In-memory backend: tracks per-pin mode, bias, level, and PWM config.
///
/// Mirrors the validation rules of a real chip backend (pin membership,
/// PWM-capable pin set, range/duty bounds) so tests exercise the same
/// status codes clients see against hardware.
pub struct SimBackend {
    pins: HashMap<u16, PinState>,
}

impl SimBackend {
    /// A simulator over the default Raspberry Pi pin set.
    pub fn new() -> Self {
        Self::with_pins(DEFAULT_PINS)
    }

    /// A simulator over an explicit supported-pin set.
    pub fn with_pins(pins: &[u16]) -> Self {
        Self {
            pins: pins.iter().map(|&p| (p, PinState::default())).collect(),
        }
    }

    /// Force the level a subsequent `read` observes, as if an external
    /// signal drove the pin.
    pub fn force_level(&mut self, pin: u16, level: u8) {
        if let Some(state) = self.pins.get_mut(&pin) {
            state.level = u8::from(level != 0);
        }
    }

    fn pwm_capable(pin: u16) -> bool {
        PWM_PINS.contains(&pin)
    }
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioBackend for SimBackend {
    fn set_mode(&mut self, pin: u16, mode: PinMode) -> i32 {
        let Some(state) = self.pins.get_mut(&pin) else {
            return status::NO_SUCH_DEVICE;
        };

        match mode {
            PinMode::Input | PinMode::OutputPushPull => {
                state.mode = mode;
                status::OK
            }
            PinMode::OutputOpenDrain | PinMode::OutputOpenSource => status::NOT_SUPPORTED,
            PinMode::Pwm => {
                if !Self::pwm_capable(pin) {
                    return status::NOT_SUPPORTED;
                }
                state.mode = mode;
                status::OK
            }
        }
    }

    fn set_pud(&mut self, pin: u16, pud: PinPud) -> i32 {
        let Some(state) = self.pins.get_mut(&pin) else {
            return status::NO_SUCH_DEVICE;
        };
        state.pud = pud;
        status::OK
    }

    fn read(&mut self, pin: u16) -> (u8, i32) {
        match self.pins.get(&pin) {
            Some(state) => (state.level, status::OK),
            None => (0, status::NO_SUCH_DEVICE),
        }
    }

    fn write(&mut self, pin: u16, level: u8) -> i32 {
        let Some(state) = self.pins.get_mut(&pin) else {
            return status::NO_SUCH_DEVICE;
        };
        state.level = u8::from(level != 0);
        status::OK
    }

    fn set_pwm(&mut self, pin: u16, frequency: u32, range: u32, duty: u32) -> i32 {
        let Some(state) = self.pins.get_mut(&pin) else {
            return status::NO_SUCH_DEVICE;
        };
        if !Self::pwm_capable(pin) {
            return status::NOT_SUPPORTED;
        }

        // Zero frequency means "off": clamp to the slowest clock, no duty.
        let (frequency, duty) = if frequency == 0 {
            (1, 0)
        } else {
            (frequency, duty)
        };

        if range == 0 {
            return status::INVALID_ARGUMENT;
        }

        // The requested range must fit inside what the PWM clock can
        // resolve at this frequency.
        let real_range = PLLD_CLOCK / (2 * u64::from(frequency));
        let real_duty = real_range * u64::from(duty) / u64::from(range);
        if real_range < u64::from(range) || real_duty < u64::from(duty) {
            return status::INVALID_ARGUMENT;
        }

        state.pwm = Some(PwmConfig {
            frequency,
            range,
            duty,
        });
        status::OK
    }

    fn deinit(&mut self, pin: u16) -> i32 {
        let Some(state) = self.pins.get_mut(&pin) else {
            return status::NO_SUCH_DEVICE;
        };
        *state = PinState::default();
        status::OK
    }
}
